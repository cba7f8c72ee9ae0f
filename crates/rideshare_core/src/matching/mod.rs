//! Vehicle-to-cluster assignment.
//!
//! Each assigned vehicle serves exactly one cluster. [`GreedyAssignment`] is
//! the default; [`HungarianAssignment`] minimizes the summed vehicle-to-centroid
//! distance instead.

pub mod algorithm;
pub mod greedy;
pub mod hungarian;
pub mod types;

use serde::{Deserialize, Serialize};

pub use algorithm::ClusterAssignment;
pub use greedy::GreedyAssignment;
pub use hungarian::HungarianAssignment;
pub use types::Assignment;

/// Which assignment algorithm the optimizer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    #[default]
    Greedy,
    Hungarian,
}

impl AssignmentStrategy {
    pub fn build(self) -> Box<dyn ClusterAssignment> {
        match self {
            AssignmentStrategy::Greedy => Box::new(GreedyAssignment),
            AssignmentStrategy::Hungarian => Box::new(HungarianAssignment),
        }
    }
}
