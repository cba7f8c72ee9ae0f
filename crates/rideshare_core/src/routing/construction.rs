//! Cheapest pair insertion.
//!
//! Starting from an empty sequence, repeatedly inserts the (request, pickup
//! position, dropoff position) triple that adds the least distance while
//! keeping the partial route feasible. The pickup is always placed before
//! its dropoff, so precedence holds by construction; capacity is checked
//! against the running load of the partial route.

use super::problem::RoutingProblem;

/// Position pair and added distance of one candidate insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Insertion {
    request: usize,
    /// Pickup goes before index `pickup_at` of the current sequence.
    pickup_at: usize,
    /// Dropoff goes before index `dropoff_at` of the current sequence
    /// (`pickup_at <= dropoff_at`).
    dropoff_at: usize,
    delta: f64,
}

impl Insertion {
    fn apply(&self, problem: &RoutingProblem, sequence: &mut Vec<usize>) {
        sequence.insert(self.dropoff_at, problem.dropoff_of(self.request));
        sequence.insert(self.pickup_at, problem.pickup_of(self.request));
    }
}

/// Onboard count after each stop of `sequence`.
fn loads_after(problem: &RoutingProblem, sequence: &[usize]) -> Vec<i64> {
    let mut load = 0;
    sequence
        .iter()
        .map(|&stop| {
            load += i64::from(problem.kind(stop).load_delta());
            load
        })
        .collect()
}

/// Cheapest feasible insertion of `request` into `sequence`.
fn best_insertion(
    problem: &RoutingProblem,
    sequence: &[usize],
    loads: &[i64],
    request: usize,
) -> Option<Insertion> {
    let d = problem.distances();
    let capacity = i64::from(problem.capacity());
    let pickup = problem.pickup_of(request);
    let dropoff = problem.dropoff_of(request);
    let prev = |at: usize| if at == 0 { 0 } else { sequence[at - 1] };
    let mut best: Option<Insertion> = None;

    for i in 0..=sequence.len() {
        let load_before = if i == 0 { 0 } else { loads[i - 1] };
        if load_before + 1 > capacity {
            continue;
        }
        let before = prev(i);
        let pickup_delta = match sequence.get(i) {
            Some(&next) => d.get(before, pickup) + d.get(pickup, next) - d.get(before, next),
            None => d.get(before, pickup),
        };

        for j in i..=sequence.len() {
            // Stops between the pickup and the dropoff carry one more rider.
            if j > i && loads[j - 1] + 1 > capacity {
                break;
            }
            let delta = if j == i {
                match sequence.get(i) {
                    Some(&next) => {
                        d.get(before, pickup) + d.get(pickup, dropoff) + d.get(dropoff, next)
                            - d.get(before, next)
                    }
                    None => d.get(before, pickup) + d.get(pickup, dropoff),
                }
            } else {
                let last = sequence[j - 1];
                let dropoff_delta = match sequence.get(j) {
                    Some(&next) => d.get(last, dropoff) + d.get(dropoff, next) - d.get(last, next),
                    None => d.get(last, dropoff),
                };
                pickup_delta + dropoff_delta
            };
            if best.map_or(true, |b| delta < b.delta) {
                best = Some(Insertion {
                    request,
                    pickup_at: i,
                    dropoff_at: j,
                    delta,
                });
            }
        }
    }
    best
}

/// Builds a full feasible sequence.
///
/// Returns `None` when some request cannot be inserted anywhere (only
/// possible with zero capacity) or when `should_stop` fires; `should_stop`
/// is polled before every candidate request is evaluated.
pub fn cheapest_insertion(
    problem: &RoutingProblem,
    should_stop: impl Fn() -> bool,
) -> Option<Vec<usize>> {
    let mut sequence = Vec::with_capacity(2 * problem.request_count());
    let mut pending: Vec<usize> = (0..problem.request_count()).collect();

    while !pending.is_empty() {
        let loads = loads_after(problem, &sequence);
        let mut best: Option<(usize, Insertion)> = None;
        for (slot, &request) in pending.iter().enumerate() {
            if should_stop() {
                return None;
            }
            if let Some(candidate) = best_insertion(problem, &sequence, &loads, request) {
                if best.map_or(true, |(_, b)| candidate.delta < b.delta) {
                    best = Some((slot, candidate));
                }
            }
        }
        let (slot, insertion) = best?;
        pending.remove(slot);
        insertion.apply(problem, &mut sequence);
    }
    Some(sequence)
}
