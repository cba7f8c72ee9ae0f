mod support;

use rideshare_core::matching::AssignmentStrategy;
use rideshare_core::routing::SolveQuality;
use rideshare_core::test_helpers::{fast_config, sample_problem};
use rideshare_core::{optimize, optimize_with_cancel, CancellationToken};
use support::assert_summary_is_valid;

#[test]
fn identical_input_gives_identical_result() {
    let (requests, vehicles) = sample_problem(24, 5, 42);
    // Iteration-bounded search keeps the comparison independent of timing.
    let config = fast_config().with_time_budget_ms(60_000);

    let first = optimize(&requests, &vehicles, &config).expect("first");
    let second = optimize(&requests, &vehicles, &config).expect("second");
    assert_eq!(first.assigned_vehicle, second.assigned_vehicle);
    assert_eq!(first.matches, second.matches);
    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn parallel_and_sequential_agree() {
    let (requests, vehicles) = sample_problem(20, 4, 3);
    let config = fast_config().with_time_budget_ms(60_000);

    let sequential =
        optimize(&requests, &vehicles, &config.clone().with_parallel(false)).expect("seq");
    let parallel = optimize(&requests, &vehicles, &config.with_parallel(true)).expect("par");
    assert_eq!(sequential.matches, parallel.matches);
}

#[test]
fn hungarian_assignment_is_valid() {
    let (requests, vehicles) = sample_problem(30, 6, 9);
    let config = fast_config().with_assignment(AssignmentStrategy::Hungarian);

    let summary = optimize(&requests, &vehicles, &config).expect("summary");
    assert_summary_is_valid(&summary, &vehicles);
    assert_eq!(summary.matches.len(), 6);
}

#[test]
fn cancelled_run_returns_fallback_routes() {
    let (requests, vehicles) = sample_problem(16, 3, 5);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary =
        optimize_with_cancel(&requests, &vehicles, &fast_config(), &cancel).expect("summary");
    assert_summary_is_valid(&summary, &vehicles);
    assert!(summary
        .matches
        .iter()
        .filter(|m| m.requests.len() > 1)
        .all(|m| m.quality == SolveQuality::Fallback));
}
