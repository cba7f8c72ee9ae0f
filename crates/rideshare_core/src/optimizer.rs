//! End-to-end optimization run.
//!
//! The pipeline is a single batch: validate the input, cluster pickups into
//! `min(#vehicles, #requests)` groups, pair vehicles with groups, route every
//! paired vehicle independently, then aggregate distance and cost figures
//! against the solo (pickup straight to dropoff) baseline.

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::cancel::CancellationToken;
use crate::clustering::{cluster_points, Cluster};
use crate::config::OptimizerConfig;
use crate::error::{InputError, RouteError};
use crate::geo::{haversine_km, Coordinate};
use crate::input::validate;
use crate::matching::Assignment;
use crate::model::{Request, Vehicle, VehicleId};
use crate::routing::{RouteSolver, SolvedRoute};
use crate::summary::{Metrics, OptimizationSummary, VehicleMatch};

/// Per-run arena: results stored by request and vehicle index.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Vehicle serving each request, by request index.
    pub assigned_vehicle: Vec<Option<VehicleId>>,
    /// Route and served request indices, by vehicle index.
    pub routes: Vec<Option<(SolvedRoute, Vec<usize>)>>,
}

impl RunContext {
    pub fn new(requests: usize, vehicles: usize) -> Self {
        Self {
            assigned_vehicle: vec![None; requests],
            routes: vec![None; vehicles],
        }
    }

    fn record(
        &mut self,
        vehicle_index: usize,
        vehicle_id: VehicleId,
        route: SolvedRoute,
        members: &[usize],
    ) {
        let served = members[..route.served].to_vec();
        for &request_index in &served {
            self.assigned_vehicle[request_index] = Some(vehicle_id);
        }
        self.routes[vehicle_index] = Some((route, served));
    }
}

struct VehicleOutcome {
    vehicle_index: usize,
    members: Vec<usize>,
    result: Result<SolvedRoute, RouteError>,
}

/// Sum of direct pickup-to-dropoff distances over all requests.
pub fn solo_distance_km(requests: &[Request]) -> f64 {
    requests
        .iter()
        .map(|r| haversine_km(r.pickup, r.dropoff))
        .sum()
}

/// Run the full pipeline.
pub fn optimize(
    requests: &[Request],
    vehicles: &[Vehicle],
    config: &OptimizerConfig,
) -> Result<OptimizationSummary, InputError> {
    optimize_with_cancel(requests, vehicles, config, &CancellationToken::new())
}

/// Run the full pipeline; cancelling `cancel` makes every route solve still in
/// flight return its fallback route.
#[instrument(
    level = "info",
    skip_all,
    fields(requests = requests.len(), vehicles = vehicles.len())
)]
pub fn optimize_with_cancel(
    requests: &[Request],
    vehicles: &[Vehicle],
    config: &OptimizerConfig,
    cancel: &CancellationToken,
) -> Result<OptimizationSummary, InputError> {
    validate(requests, vehicles)?;

    let k = vehicles.len().min(requests.len());
    let pickups: Vec<Coordinate> = requests.iter().map(|r| r.pickup).collect();
    let clusters = cluster_points(&pickups, k, &config.clustering);
    info!(k, clusters = clusters.len(), "clustered pickups");

    let assignments = config.assignment.build().assign(vehicles, &clusters);
    info!(assigned_vehicles = assignments.len(), "assigned vehicles to clusters");

    let solver = RouteSolver::new(config.routing);
    let solve = |assignment: &Assignment| {
        solve_assignment(&solver, assignment, &clusters, requests, vehicles, cancel)
    };
    let outcomes: Vec<VehicleOutcome> = if config.parallel {
        assignments.par_iter().map(solve).collect()
    } else {
        assignments.iter().map(solve).collect()
    };

    let mut context = RunContext::new(requests.len(), vehicles.len());
    for outcome in outcomes {
        let vehicle = &vehicles[outcome.vehicle_index];
        match outcome.result {
            Ok(route) => context.record(outcome.vehicle_index, vehicle.id, route, &outcome.members),
            Err(err) => warn!(vehicle_id = vehicle.id, %err, "vehicle left unmatched"),
        }
    }

    let summary = summarize(requests, vehicles, config, context);
    info!(
        matched = summary.metrics.requests_matched,
        total_km = summary.metrics.total_distance,
        solo_km = summary.metrics.solo_distance,
        savings_percent = summary.metrics.savings_percent,
        "optimization finished"
    );
    Ok(summary)
}

fn solve_assignment(
    solver: &RouteSolver,
    assignment: &Assignment,
    clusters: &[Cluster],
    requests: &[Request],
    vehicles: &[Vehicle],
    cancel: &CancellationToken,
) -> VehicleOutcome {
    let members = clusters
        .iter()
        .find(|c| c.label == assignment.cluster_label)
        .map(|c| c.members.clone())
        .unwrap_or_default();
    let cluster_requests: Vec<Request> = members.iter().map(|&i| requests[i].clone()).collect();
    let result = solver.solve(&vehicles[assignment.vehicle_index], &cluster_requests, cancel);
    VehicleOutcome {
        vehicle_index: assignment.vehicle_index,
        members,
        result,
    }
}

fn summarize(
    requests: &[Request],
    vehicles: &[Vehicle],
    config: &OptimizerConfig,
    context: RunContext,
) -> OptimizationSummary {
    let mut matches = Vec::new();
    let mut total_distance = 0.0;
    let mut requests_matched = 0;

    for (vehicle, slot) in vehicles.iter().zip(context.routes) {
        let Some((route, served)) = slot else {
            continue;
        };
        total_distance += route.distance_km;
        requests_matched += served.len();
        matches.push(VehicleMatch {
            vehicle_id: vehicle.id,
            vehicle_location: vehicle.location,
            requests: served.iter().map(|&i| requests[i].clone()).collect(),
            cost: config.pricing.cost_for(route.distance_km),
            distance_km: route.distance_km,
            quality: route.quality,
            route: route.stops,
        });
    }

    let unmatched_request_ids = requests
        .iter()
        .zip(&context.assigned_vehicle)
        .filter(|(_, assigned)| assigned.is_none())
        .map(|(r, _)| r.id)
        .collect();

    let metrics = Metrics::from_totals(
        requests.len(),
        vehicles.len(),
        requests_matched,
        total_distance,
        solo_distance_km(requests),
        config.pricing.cost_for(total_distance),
    );

    OptimizationSummary {
        matches,
        metrics,
        assigned_vehicle: context.assigned_vehicle,
        unmatched_request_ids,
    }
}
