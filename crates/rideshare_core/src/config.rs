//! Optimizer configuration.
//!
//! Every knob has a default matching the reference behaviour (seed 42, ten
//! k-means restarts, 5 s route budget, 2.5 per km). Builder-style `with_*`
//! methods adjust single values.

use serde::{Deserialize, Serialize};

use crate::clustering::ClusteringConfig;
use crate::matching::AssignmentStrategy;
use crate::pricing::PricingConfig;
use crate::routing::RouteSolverConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub clustering: ClusteringConfig,
    pub routing: RouteSolverConfig,
    pub pricing: PricingConfig,
    pub assignment: AssignmentStrategy,
    /// Solve vehicle routes on the rayon thread pool.
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            routing: RouteSolverConfig::default(),
            pricing: PricingConfig::default(),
            assignment: AssignmentStrategy::default(),
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.clustering.seed = seed;
        self
    }

    pub fn with_cost_per_km(mut self, cost_per_km: f64) -> Self {
        self.pricing.cost_per_km = cost_per_km;
        self
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.routing.time_budget_ms = time_budget_ms;
        self
    }

    pub fn with_assignment(mut self, assignment: AssignmentStrategy) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
