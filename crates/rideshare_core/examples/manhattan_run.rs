//! Optimize the midtown sample plus a random batch and print the metrics.
//!
//! Run with: cargo run -p rideshare_core --example manhattan_run

use rideshare_core::summary::round2;
use rideshare_core::test_helpers::{midtown_drivers, midtown_riders, sample_problem};
use rideshare_core::{optimize, OptimizationSummary, OptimizerConfig};

fn print_summary(title: &str, summary: &OptimizationSummary) {
    let m = &summary.metrics;
    println!("--- {title} ---");
    println!("Requests matched: {}/{}", m.requests_matched, m.total_requests);
    println!("Vehicles used: {}/{}", summary.matches.len(), m.total_vehicles);
    println!("Total distance: {:.2} km (solo {:.2} km)", m.total_distance, m.solo_distance);
    println!("Savings: {:.2}%", m.savings_percent);
    println!("Total cost: ${:.2} (${:.2} per request)", m.total_cost, m.cost_per_matched_request);
    for vm in &summary.matches {
        let ids: Vec<u64> = vm.requests.iter().map(|r| r.id).collect();
        println!(
            "  vehicle {} -> requests {:?}  {} stops  {} km  {:?}",
            vm.vehicle_id,
            ids,
            vm.route.len(),
            round2(vm.distance_km),
            vm.quality,
        );
    }
    if !summary.unmatched_request_ids.is_empty() {
        println!("Unmatched: {:?}", summary.unmatched_request_ids);
    }
    println!();
}

fn main() {
    let config = OptimizerConfig::default().with_time_budget_ms(1_000);

    let riders = midtown_riders();
    let drivers = midtown_drivers();
    match optimize(&riders, &drivers, &config) {
        Ok(summary) => print_summary("Midtown sample (3 riders, 2 drivers)", &summary),
        Err(err) => eprintln!("midtown sample failed: {err}"),
    }

    const NUM_REQUESTS: usize = 200;
    const NUM_VEHICLES: usize = 50;
    let (requests, vehicles) = sample_problem(NUM_REQUESTS, NUM_VEHICLES, 123);
    match optimize(&requests, &vehicles, &config) {
        Ok(summary) => print_summary(
            &format!("Random batch ({NUM_REQUESTS} requests, {NUM_VEHICLES} vehicles, seed 123)"),
            &summary,
        ),
        Err(err) => eprintln!("random batch failed: {err}"),
    }
}
