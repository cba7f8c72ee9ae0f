use crate::clustering::Cluster;
use crate::geo::haversine_km;
use crate::model::Vehicle;

use super::algorithm::{vehicles_by_id, ClusterAssignment};
use super::types::Assignment;

/// Greedy nearest-centroid assignment.
///
/// Vehicles are visited in ascending id order; each claims the closest
/// (haversine) cluster centroid nobody has claimed yet. Equal distances go to
/// the lowest cluster label.
///
/// Time complexity: O(V * C). This approximates a min-cost bipartite matching;
/// route quality matters far more than assignment quality here.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAssignment;

impl ClusterAssignment for GreedyAssignment {
    fn assign(&self, vehicles: &[Vehicle], clusters: &[Cluster]) -> Vec<Assignment> {
        if vehicles.is_empty() || clusters.is_empty() {
            return Vec::new();
        }

        let mut by_label: Vec<&Cluster> = clusters.iter().collect();
        by_label.sort_by_key(|c| c.label);
        let mut claimed = vec![false; by_label.len()];
        let mut results = Vec::new();

        for vehicle_index in vehicles_by_id(vehicles) {
            let location = vehicles[vehicle_index].location;
            let mut best: Option<(usize, f64)> = None;

            for (pos, cluster) in by_label.iter().enumerate() {
                if claimed[pos] {
                    continue;
                }
                let distance = haversine_km(location, cluster.centroid);
                if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                    best = Some((pos, distance));
                }
            }

            match best {
                Some((pos, _)) => {
                    claimed[pos] = true;
                    results.push(Assignment {
                        vehicle_index,
                        cluster_label: by_label[pos].label,
                    });
                }
                None => break,
            }
        }
        results
    }
}
