//! Run results and their wire form.
//!
//! [`OptimizationSummary`] holds raw values. [`OptimizeResponse`] is what goes
//! over the wire: distances and costs rounded to two decimals, and a tagged
//! `success` flag with a `reason` on failure.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geo::Coordinate;
use crate::model::{Request, RequestId, Stop, StopKind, VehicleId};
use crate::routing::SolveQuality;

/// One vehicle's share of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleMatch {
    pub vehicle_id: VehicleId,
    pub vehicle_location: Coordinate,
    /// Requests served, in assignment order.
    pub requests: Vec<Request>,
    pub route: Vec<Stop>,
    pub distance_km: f64,
    pub cost: f64,
    pub quality: SolveQuality,
}

/// Aggregate efficiency figures for a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub total_requests: usize,
    pub total_vehicles: usize,
    pub requests_matched: usize,
    pub total_distance: f64,
    pub solo_distance: f64,
    pub savings_percent: f64,
    pub total_cost: f64,
    pub cost_per_matched_request: f64,
}

impl Metrics {
    /// Derive percentages and per-request cost from the raw totals.
    ///
    /// `savings_percent` is 0 when `solo_distance` is 0 and
    /// `cost_per_matched_request` is 0 when nothing was matched.
    pub fn from_totals(
        total_requests: usize,
        total_vehicles: usize,
        requests_matched: usize,
        total_distance: f64,
        solo_distance: f64,
        total_cost: f64,
    ) -> Self {
        let savings_percent = if solo_distance > 0.0 {
            (solo_distance - total_distance) / solo_distance * 100.0
        } else {
            0.0
        };
        let cost_per_matched_request = if requests_matched > 0 {
            total_cost / requests_matched as f64
        } else {
            0.0
        };
        Self {
            total_requests,
            total_vehicles,
            requests_matched,
            total_distance,
            solo_distance,
            savings_percent,
            total_cost,
            cost_per_matched_request,
        }
    }

    fn rounded(&self) -> Self {
        Self {
            total_distance: round2(self.total_distance),
            solo_distance: round2(self.solo_distance),
            savings_percent: round2(self.savings_percent),
            total_cost: round2(self.total_cost),
            cost_per_matched_request: round2(self.cost_per_matched_request),
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationSummary {
    /// Vehicles with a route, in input order.
    pub matches: Vec<VehicleMatch>,
    pub metrics: Metrics,
    /// Vehicle serving each input request (request-indexed).
    pub assigned_vehicle: Vec<Option<VehicleId>>,
    pub unmatched_request_ids: Vec<RequestId>,
}

impl OptimizationSummary {
    pub fn vehicle_match(&self, vehicle_id: VehicleId) -> Option<&VehicleMatch> {
        self.matches.iter().find(|m| m.vehicle_id == vehicle_id)
    }

    pub fn to_response(&self) -> OptimizeResponse {
        OptimizeResponse {
            success: true,
            reason: None,
            matches: self.matches.iter().map(|m| self.match_view(m)).collect(),
            metrics: Some(self.metrics.rounded()),
            unmatched_request_ids: self.unmatched_request_ids.clone(),
        }
    }

    fn match_view(&self, m: &VehicleMatch) -> MatchView {
        MatchView {
            vehicle_id: m.vehicle_id,
            vehicle_location: Stop::new(m.vehicle_location, StopKind::Origin, m.vehicle_id),
            requests: m
                .requests
                .iter()
                .map(|r| RequestView {
                    id: r.id,
                    pickup: r.pickup_stop(),
                    dropoff: r.dropoff_stop(),
                    max_wait_minutes: r.max_wait_minutes,
                    assigned_vehicle: Some(m.vehicle_id),
                })
                .collect(),
            route: m.route.clone(),
            distance: round2(m.distance_km),
            cost: round2(m.cost),
            quality: m.quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestView {
    pub id: RequestId,
    pub pickup: Stop,
    pub dropoff: Stop,
    pub max_wait_minutes: u32,
    pub assigned_vehicle: Option<VehicleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub vehicle_id: VehicleId,
    pub vehicle_location: Stop,
    pub requests: Vec<RequestView>,
    pub route: Vec<Stop>,
    pub distance: f64,
    pub cost: f64,
    pub quality: SolveQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub matches: Vec<MatchView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default)]
    pub unmatched_request_ids: Vec<RequestId>,
}

impl OptimizeResponse {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
            matches: Vec::new(),
            metrics: None,
            unmatched_request_ids: Vec::new(),
        }
    }
}

impl From<Result<OptimizationSummary, InputError>> for OptimizeResponse {
    fn from(result: Result<OptimizationSummary, InputError>) -> Self {
        match result {
            Ok(summary) => summary.to_response(),
            Err(err) => OptimizeResponse::failure(err.to_string()),
        }
    }
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
