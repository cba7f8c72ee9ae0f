//! Single-vehicle pickup-and-delivery routing.
//!
//! [`RouteSolver::solve`] turns one vehicle and its cluster of requests into
//! an ordered route that:
//!
//! - starts at the vehicle's origin,
//! - visits each request's pickup before its dropoff,
//! - never carries more than `capacity` requests at once,
//!
//! and tries to minimize the open path length (no return leg). The initial
//! route comes from cheapest pair insertion and is then improved by guided
//! local search within a wall-clock budget.

pub mod construction;
pub mod local_search;
pub mod problem;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cancel::CancellationToken;
use crate::error::RouteError;
use crate::model::{Request, Stop, Vehicle};

pub use local_search::{Move, SearchLimits, StopReason};
pub use problem::{DistanceMatrix, RoutingProblem};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSolverConfig {
    /// Wall-clock budget per vehicle for the improvement phase.
    pub time_budget_ms: u64,
    /// Search iteration cap (moves plus penalty rounds).
    pub max_iterations: usize,
    /// Consecutive local optima without a new best route before stopping.
    pub stall_limit: usize,
    /// Guided local search penalty factor. 0 turns the search into plain descent.
    pub penalty_factor: f64,
}

impl Default for RouteSolverConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 5_000,
            max_iterations: 10_000,
            stall_limit: 50,
            penalty_factor: 0.1,
        }
    }
}

impl RouteSolverConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// How the returned route was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveQuality {
    /// Search finished on its own (exhausted, stalled or iteration cap).
    Optimized,
    /// Time budget ran out; best route found so far.
    TimeLimited,
    /// Pickups then dropoffs in assignment order.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvedRoute {
    /// Origin first, then every pickup and dropoff.
    pub stops: Vec<Stop>,
    pub distance_km: f64,
    /// The route serves the first `served` requests passed to the solver.
    pub served: usize,
    pub quality: SolveQuality,
}

#[derive(Debug, Clone, Default)]
pub struct RouteSolver {
    config: RouteSolverConfig,
}

impl RouteSolver {
    pub fn new(config: RouteSolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteSolverConfig {
        &self.config
    }

    /// Route `vehicle` through `requests`, truncated to the vehicle capacity
    /// in input order. Requests past the capacity are not served.
    ///
    /// The time budget covers construction and search. If it runs out or
    /// `cancel` fires before a first route is built, the fallback order is
    /// returned.
    #[instrument(
        level = "debug",
        skip_all,
        fields(vehicle_id = vehicle.id, requests = requests.len())
    )]
    pub fn solve(
        &self,
        vehicle: &Vehicle,
        requests: &[Request],
        cancel: &CancellationToken,
    ) -> Result<SolvedRoute, RouteError> {
        let deadline = Instant::now() + self.config.time_budget();
        if vehicle.capacity == 0 {
            return Err(RouteError::ZeroCapacity {
                vehicle_id: vehicle.id,
            });
        }
        let served = requests.len().min(vehicle.capacity as usize);
        let problem = RoutingProblem::new(vehicle, &requests[..served]);

        // Zero or one request has exactly one feasible order.
        if served <= 1 {
            let sequence = problem.fallback_sequence();
            return Ok(self.finish(&problem, &sequence, SolveQuality::Optimized));
        }

        let out_of_time = || cancel.is_cancelled() || Instant::now() >= deadline;
        let fallback = problem.fallback_sequence();
        let initial = match construction::cheapest_insertion(&problem, out_of_time) {
            Some(built) if problem.path_cost(&built) <= problem.path_cost(&fallback) => built,
            Some(_) => fallback,
            None if out_of_time() => {
                debug!(cancelled = cancel.is_cancelled(), "no time to build a route");
                return Ok(self.fallback(&problem));
            }
            None => fallback,
        };

        let limits = SearchLimits {
            deadline,
            max_iterations: self.config.max_iterations,
            stall_limit: self.config.stall_limit.max(1),
            penalty_factor: self.config.penalty_factor,
        };
        let outcome =
            local_search::guided_local_search(&problem, initial, &limits, || cancel.is_cancelled());
        debug!(
            iterations = outcome.iterations,
            reason = ?outcome.reason,
            cost_km = outcome.cost,
            "route search finished"
        );

        let quality = match outcome.reason {
            StopReason::Cancelled => return Ok(self.fallback(&problem)),
            StopReason::Deadline => SolveQuality::TimeLimited,
            StopReason::Exhausted | StopReason::Stalled | StopReason::IterationCap => {
                SolveQuality::Optimized
            }
        };
        Ok(self.finish(&problem, &outcome.sequence, quality))
    }

    fn fallback(&self, problem: &RoutingProblem) -> SolvedRoute {
        self.finish(problem, &problem.fallback_sequence(), SolveQuality::Fallback)
    }

    fn finish(
        &self,
        problem: &RoutingProblem,
        sequence: &[usize],
        quality: SolveQuality,
    ) -> SolvedRoute {
        debug_assert!(problem.is_feasible(sequence));
        SolvedRoute {
            stops: problem.materialize(sequence),
            distance_km: problem.path_cost(sequence),
            served: problem.request_count(),
            quality,
        }
    }
}
