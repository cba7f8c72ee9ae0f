#![allow(dead_code)]

use std::collections::HashSet;

use rideshare_core::model::{Request, Stop, StopKind, Vehicle};
use rideshare_core::summary::OptimizationSummary;

/// Check one route: origin first, each owner's pickup before its dropoff,
/// every pickup and dropoff exactly once, and load within capacity.
pub fn assert_route_is_valid(route: &[Stop], vehicle: &Vehicle, served: &[Request]) {
    assert_eq!(route.len(), 1 + 2 * served.len(), "route length");
    assert_eq!(route[0].kind, StopKind::Origin);
    assert_eq!(route[0].coordinate(), vehicle.location);

    let mut picked = HashSet::new();
    let mut dropped = HashSet::new();
    let mut load: i32 = 0;
    for stop in &route[1..] {
        match stop.kind {
            StopKind::Pickup => {
                assert!(picked.insert(stop.owner_id), "request {} picked twice", stop.owner_id);
            }
            StopKind::Dropoff => {
                assert!(
                    picked.contains(&stop.owner_id),
                    "request {} dropped before pickup",
                    stop.owner_id
                );
                assert!(dropped.insert(stop.owner_id), "request {} dropped twice", stop.owner_id);
            }
            StopKind::Origin => panic!("origin in the middle of a route"),
        }
        load += stop.kind.load_delta();
        assert!(load >= 0 && load <= vehicle.capacity as i32, "load {load} out of bounds");
    }

    let expected: HashSet<u64> = served.iter().map(|r| r.id).collect();
    assert_eq!(picked, expected);
    assert_eq!(dropped, expected);
}

/// Check every route in a summary and that no request is served twice.
pub fn assert_summary_is_valid(summary: &OptimizationSummary, vehicles: &[Vehicle]) {
    let mut seen = HashSet::new();
    for m in &summary.matches {
        let vehicle = vehicles
            .iter()
            .find(|v| v.id == m.vehicle_id)
            .expect("match references a known vehicle");
        assert_route_is_valid(&m.route, vehicle, &m.requests);
        for request in &m.requests {
            assert!(seen.insert(request.id), "request {} served twice", request.id);
        }
    }
    assert_eq!(seen.len(), summary.metrics.requests_matched);
}
