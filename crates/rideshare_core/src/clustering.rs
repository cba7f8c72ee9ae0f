//! Spatial grouping of pickup points with seeded k-means.
//!
//! Pickups are partitioned by `linfa-clustering` k-means on raw (lat, lon)
//! degrees: k-means++ initialization, `n_init` runs keeping the lowest
//! inertia. The RNG is a `Xoshiro256Plus` seeded from
//! [`ClusteringConfig::seed`], so identical input always yields identical
//! clusters.

use std::collections::HashMap;

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Seed for RNG (for reproducibility).
    pub seed: u64,
    /// Number of independent k-means++ runs.
    pub n_init: usize,
    /// Lloyd iteration cap per run.
    pub max_iterations: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_init: 10,
            max_iterations: 300,
        }
    }
}

/// A group of nearby pickups. `members` are indices into the clustered
/// point slice, in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub label: usize,
    pub members: Vec<usize>,
    pub centroid: Coordinate,
}

/// Partition `points` into at most `k` non-empty clusters.
///
/// Returns clusters ordered by label with labels `0..len`. Every point index
/// appears in exactly one cluster. Empty input or `k == 0` yields no clusters.
/// With no more distinct locations than `k`, each distinct location becomes
/// its own cluster.
pub fn cluster_points(points: &[Coordinate], k: usize, config: &ClusteringConfig) -> Vec<Cluster> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }
    let k = k.min(points.len());
    if k == 1 {
        return build_clusters(points, &vec![0; points.len()], 1);
    }

    let (distinct, labels) = distinct_locations(points);
    if distinct.len() <= k {
        return build_clusters(points, &labels, distinct.len());
    }

    match fit_kmeans(points, k, config) {
        Ok(labels) => build_clusters(points, &labels, k),
        Err(err) => {
            warn!(%err, k, "k-means failed, grouping by nearest seed location");
            let seeds = &distinct[..k];
            let labels: Vec<usize> = points.iter().map(|p| nearest(p, seeds)).collect();
            build_clusters(points, &labels, k)
        }
    }
}

fn fit_kmeans(
    points: &[Coordinate],
    k: usize,
    config: &ClusteringConfig,
) -> Result<Vec<usize>, linfa_clustering::KMeansError> {
    let observations = Array2::from_shape_fn((points.len(), 2), |(row, col)| {
        if col == 0 {
            points[row].lat
        } else {
            points[row].lon
        }
    });
    let dataset = Dataset::from(observations);

    let rng = Xoshiro256Plus::seed_from_u64(config.seed);
    let model = KMeans::params_with_rng(k, rng)
        .n_runs(config.n_init.max(1))
        .max_n_iterations(config.max_iterations.max(1) as u64)
        .fit(&dataset)?;
    debug!(k, inertia = model.inertia(), "k-means fitted");

    Ok(model.predict(dataset.records()).to_vec())
}

/// Distinct coordinates in first-seen order, and each point's index among them.
fn distinct_locations(points: &[Coordinate]) -> (Vec<Coordinate>, Vec<usize>) {
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut distinct = Vec::new();
    let labels = points
        .iter()
        .map(|p| {
            *index.entry((p.lat.to_bits(), p.lon.to_bits())).or_insert_with(|| {
                distinct.push(*p);
                distinct.len() - 1
            })
        })
        .collect();
    (distinct, labels)
}

fn nearest(point: &Coordinate, seeds: &[Coordinate]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (idx, seed) in seeds.iter().enumerate() {
        let d = point.euclidean_sq(seed);
        if d < best_d {
            best = idx;
            best_d = d;
        }
    }
    best
}

/// Group point indices by label, dropping empty labels and compacting the
/// remaining ones to `0..`.
fn build_clusters(points: &[Coordinate], labels: &[usize], k: usize) -> Vec<Cluster> {
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (idx, &label) in labels.iter().enumerate() {
        groups[label].push(idx);
    }
    groups
        .into_iter()
        .filter(|members| !members.is_empty())
        .enumerate()
        .filter_map(|(label, members)| {
            let centroid = Coordinate::centroid(members.iter().map(|&i| points[i]))?;
            Some(Cluster {
                label,
                members,
                centroid,
            })
        })
        .collect()
}
