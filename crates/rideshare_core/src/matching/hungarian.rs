//! Hungarian (Kuhn-Munkres) assignment of vehicles to clusters.
//!
//! Minimizes the summed haversine distance from each assigned vehicle to its
//! cluster centroid across the whole batch.

use pathfinding::kuhn_munkres::{kuhn_munkres, Weights};

use crate::clustering::Cluster;
use crate::geo::haversine_km;
use crate::model::Vehicle;

use super::algorithm::{vehicles_by_id, ClusterAssignment};
use super::types::Assignment;

/// Scale factor to convert f64 kilometers to i64 weights (millimeter precision).
const SCALE: f64 = 1_000_000.0;

/// Simple matrix type implementing pathfinding's Weights for i64.
struct I64Weights(Vec<Vec<i64>>);

impl Weights<i64> for I64Weights {
    fn rows(&self) -> usize {
        self.0.len()
    }

    fn columns(&self) -> usize {
        self.0.first().map_or(0, |r| r.len())
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.0[row][col]
    }

    fn neg(&self) -> Self {
        I64Weights(
            self.0
                .iter()
                .map(|r| r.iter().map(|&x| x.saturating_neg()).collect())
                .collect(),
        )
    }
}

/// Convert a distance to a maximization weight (closer = larger).
fn distance_to_weight(distance_km: f64) -> i64 {
    let w = -distance_km * SCALE;
    if w.is_nan() || w <= i64::MIN as f64 / 4.0 {
        // Keep headroom so summing weights inside kuhn_munkres cannot overflow.
        i64::MIN / 4
    } else {
        w as i64
    }
}

/// Globally optimal vehicle-to-cluster assignment.
#[derive(Debug, Default, Clone, Copy)]
pub struct HungarianAssignment;

impl ClusterAssignment for HungarianAssignment {
    fn assign(&self, vehicles: &[Vehicle], clusters: &[Cluster]) -> Vec<Assignment> {
        if vehicles.is_empty() || clusters.is_empty() {
            return Vec::new();
        }

        let vehicle_order = vehicles_by_id(vehicles);
        let mut cluster_order: Vec<&Cluster> = clusters.iter().collect();
        cluster_order.sort_by_key(|c| c.label);

        let distance = |v: usize, c: usize| {
            distance_to_weight(haversine_km(
                vehicles[vehicle_order[v]].location,
                cluster_order[c].centroid,
            ))
        };

        // Kuhn-Munkres requires rows <= columns, so the smaller side goes on rows.
        let vehicles_on_rows = vehicle_order.len() <= cluster_order.len();
        let matrix: Vec<Vec<i64>> = if vehicles_on_rows {
            (0..vehicle_order.len())
                .map(|v| (0..cluster_order.len()).map(|c| distance(v, c)).collect())
                .collect()
        } else {
            (0..cluster_order.len())
                .map(|c| (0..vehicle_order.len()).map(|v| distance(v, c)).collect())
                .collect()
        };

        let (_total, columns) = kuhn_munkres(&I64Weights(matrix));

        let mut pairs: Vec<(usize, usize)> = columns
            .into_iter()
            .enumerate()
            .map(|(row, col)| if vehicles_on_rows { (row, col) } else { (col, row) })
            .collect();
        pairs.sort_unstable();

        pairs
            .into_iter()
            .map(|(v, c)| Assignment {
                vehicle_index: vehicle_order[v],
                cluster_label: cluster_order[c].label,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::matching::GreedyAssignment;

    fn cluster(label: usize, lat: f64, lon: f64) -> Cluster {
        Cluster {
            label,
            members: vec![label],
            centroid: Coordinate::new(lat, lon),
        }
    }

    fn total_distance(vehicles: &[Vehicle], clusters: &[Cluster], result: &[Assignment]) -> f64 {
        result
            .iter()
            .map(|a| {
                let c = clusters.iter().find(|c| c.label == a.cluster_label).expect("cluster");
                haversine_km(vehicles[a.vehicle_index].location, c.centroid)
            })
            .sum()
    }

    #[test]
    fn beats_greedy_when_greedy_is_myopic() {
        // Greedy gives vehicle 1 the middle cluster, forcing vehicle 2 far away.
        let vehicles = vec![
            Vehicle::new(1, Coordinate::new(40.750, -73.980), 4),
            Vehicle::new(2, Coordinate::new(40.745, -73.980), 4),
        ];
        let clusters = vec![cluster(0, 40.748, -73.980), cluster(1, 40.800, -73.980)];

        let greedy = GreedyAssignment.assign(&vehicles, &clusters);
        let optimal = HungarianAssignment.assign(&vehicles, &clusters);
        assert_eq!(optimal.len(), 2);
        assert!(
            total_distance(&vehicles, &clusters, &optimal)
                <= total_distance(&vehicles, &clusters, &greedy) + 1e-9
        );
    }

    #[test]
    fn more_vehicles_than_clusters() {
        let vehicles: Vec<Vehicle> = (0..4)
            .map(|i| Vehicle::new(i, Coordinate::new(40.70 + i as f64 * 0.02, -73.98), 4))
            .collect();
        let clusters = vec![cluster(0, 40.70, -73.98), cluster(1, 40.76, -73.98)];

        let result = HungarianAssignment.assign(&vehicles, &clusters);
        assert_eq!(result.len(), 2);
        let mut labels: Vec<usize> = result.iter().map(|a| a.cluster_label).collect();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1]);
        // The vehicles sitting on the centroids take them.
        assert!(result.contains(&Assignment { vehicle_index: 0, cluster_label: 0 }));
        assert!(result.contains(&Assignment { vehicle_index: 3, cluster_label: 1 }));
    }

    #[test]
    fn more_clusters_than_vehicles() {
        let vehicles = vec![Vehicle::new(9, Coordinate::new(40.80, -73.96), 4)];
        let clusters = vec![
            cluster(0, 40.70, -74.00),
            cluster(1, 40.80, -73.96),
            cluster(2, 40.75, -73.98),
        ];
        let result = HungarianAssignment.assign(&vehicles, &clusters);
        assert_eq!(result, vec![Assignment { vehicle_index: 0, cluster_label: 1 }]);
    }
}
