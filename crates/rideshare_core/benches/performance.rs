//! Performance benchmarks for rideshare_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rideshare_core::clustering::{cluster_points, ClusteringConfig};
use rideshare_core::geo::Coordinate;
use rideshare_core::matching::{ClusterAssignment, GreedyAssignment, HungarianAssignment};
use rideshare_core::model::Vehicle;
use rideshare_core::optimize;
use rideshare_core::routing::{RouteSolver, RouteSolverConfig};
use rideshare_core::test_helpers::{fast_config, sample_problem};
use rideshare_core::CancellationToken;

fn bench_optimize(c: &mut Criterion) {
    let scenarios = vec![("small", 20, 5), ("medium", 100, 25), ("large", 400, 100)];

    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);
    for (name, requests, vehicles) in scenarios {
        let (requests, vehicles) = sample_problem(requests, vehicles, 42);
        let config = fast_config().with_parallel(true);
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(requests, vehicles),
            |b, (r, v)| b.iter(|| black_box(optimize(r, v, &config))),
        );
    }
    group.finish();
}

fn bench_clustering(c: &mut Criterion) {
    let (requests, _) = sample_problem(500, 0, 7);
    let pickups: Vec<Coordinate> = requests.iter().map(|r| r.pickup).collect();
    let config = ClusteringConfig::default();

    let mut group = c.benchmark_group("clustering");
    for k in [5, 25, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(cluster_points(&pickups, k, &config)));
        });
    }
    group.finish();
}

fn bench_assignment(c: &mut Criterion) {
    let (requests, vehicles) = sample_problem(400, 100, 11);
    let pickups: Vec<Coordinate> = requests.iter().map(|r| r.pickup).collect();
    let clusters = cluster_points(&pickups, vehicles.len(), &ClusteringConfig::default());

    let mut group = c.benchmark_group("assignment");
    group.bench_function("greedy_100x100", |b| {
        b.iter(|| black_box(GreedyAssignment.assign(&vehicles, &clusters)));
    });
    group.bench_function("hungarian_100x100", |b| {
        b.iter(|| black_box(HungarianAssignment.assign(&vehicles, &clusters)));
    });
    group.finish();
}

fn bench_route_solver(c: &mut Criterion) {
    let (requests, vehicles) = sample_problem(6, 1, 3);
    let solver = RouteSolver::new(RouteSolverConfig {
        max_iterations: 1_000,
        ..Default::default()
    });
    let cancel = CancellationToken::new();
    let vehicle = Vehicle::new(1, vehicles[0].location, 6);

    c.bench_function("route_solver_6_requests", |b| {
        b.iter(|| black_box(solver.solve(&vehicle, &requests, &cancel)));
    });
}

criterion_group!(
    benches,
    bench_optimize,
    bench_clustering,
    bench_assignment,
    bench_route_solver
);
criterion_main!(benches);
