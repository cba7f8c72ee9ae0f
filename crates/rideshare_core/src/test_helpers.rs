//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures for unit tests, integration tests and benchmarks. Sample
//! data is drawn around midtown Manhattan with a seeded RNG so every caller
//! sees the same instance for the same seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::OptimizerConfig;
use crate::geo::Coordinate;
use crate::model::{Request, Vehicle};
use crate::routing::RouteSolverConfig;

/// Bounding box of the sample area (roughly Manhattan).
pub const SAMPLE_LAT_RANGE: (f64, f64) = (40.70, 40.80);
pub const SAMPLE_LON_RANGE: (f64, f64) = (-74.02, -73.93);

/// Dropoffs land within this many degrees of their pickup (about 2 km).
const DROPOFF_SPREAD_DEG: f64 = 0.02;

/// Config with a short route budget and sequential solving, for tests that
/// must stay fast and reproducible.
pub fn fast_config() -> OptimizerConfig {
    OptimizerConfig {
        routing: RouteSolverConfig {
            time_budget_ms: 2_000,
            max_iterations: 2_000,
            stall_limit: 20,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_parallel(false)
}

/// A request near Times Square; ids shift the pickup slightly so a handful of
/// them stay tightly grouped.
pub fn manhattan_request(id: u64) -> Request {
    let offset = id as f64 * 0.0005;
    Request::new(
        id,
        Coordinate::new(40.7589 - offset, -73.9851 + offset * 0.5),
        Coordinate::new(40.7614 + offset, -73.9776 + offset),
    )
}

/// The three riders of the classic midtown example.
pub fn midtown_riders() -> Vec<Request> {
    vec![
        Request::new(1, Coordinate::new(40.7589, -73.9851), Coordinate::new(40.7614, -73.9776)),
        Request::new(2, Coordinate::new(40.7580, -73.9855), Coordinate::new(40.7620, -73.9700)),
        Request::new(3, Coordinate::new(40.7500, -73.9900), Coordinate::new(40.7650, -73.9750)),
    ]
}

/// The two drivers of the classic midtown example.
pub fn midtown_drivers() -> Vec<Vehicle> {
    vec![
        Vehicle::new(1, Coordinate::new(40.7550, -73.9870), 4),
        Vehicle::new(2, Coordinate::new(40.7490, -73.9920), 3),
    ]
}

/// Random requests and vehicles inside the sample area.
pub fn sample_problem(
    num_requests: usize,
    num_vehicles: usize,
    seed: u64,
) -> (Vec<Request>, Vec<Vehicle>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let point = |rng: &mut StdRng| {
        Coordinate::new(
            rng.gen_range(SAMPLE_LAT_RANGE.0..SAMPLE_LAT_RANGE.1),
            rng.gen_range(SAMPLE_LON_RANGE.0..SAMPLE_LON_RANGE.1),
        )
    };

    let requests = (0..num_requests)
        .map(|i| {
            let pickup = point(&mut rng);
            let dropoff = Coordinate::new(
                pickup.lat + rng.gen_range(-DROPOFF_SPREAD_DEG..DROPOFF_SPREAD_DEG),
                pickup.lon + rng.gen_range(-DROPOFF_SPREAD_DEG..DROPOFF_SPREAD_DEG),
            );
            Request::new(i as u64 + 1, pickup, dropoff)
        })
        .collect();
    let vehicles = (0..num_vehicles)
        .map(|i| Vehicle::new(i as u64 + 1, point(&mut rng), rng.gen_range(3..=5)))
        .collect();
    (requests, vehicles)
}
