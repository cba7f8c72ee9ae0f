/// A vehicle paired with the cluster it will serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Index into the vehicle slice passed to the assigner.
    pub vehicle_index: usize,
    pub cluster_label: usize,
}
