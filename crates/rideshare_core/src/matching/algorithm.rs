use crate::clustering::Cluster;
use crate::model::Vehicle;

use super::types::Assignment;

/// Pairs vehicles with clusters of requests.
///
/// Implementations must never hand the same cluster to two vehicles nor give
/// one vehicle two clusters. Vehicles or clusters left over once the other
/// side is exhausted stay unassigned. Results are ordered by ascending
/// vehicle id so callers see a stable order.
pub trait ClusterAssignment: Send + Sync {
    fn assign(&self, vehicles: &[Vehicle], clusters: &[Cluster]) -> Vec<Assignment>;
}

/// Vehicle indices sorted by ascending id (index breaks ties).
pub(crate) fn vehicles_by_id(vehicles: &[Vehicle]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..vehicles.len()).collect();
    order.sort_by_key(|&idx| (vehicles[idx].id, idx));
    order
}
