//! Guided local search over a single vehicle's visit order.
//!
//! The search descends with first-improvement moves on an augmented cost
//! (distance plus arc penalties). Whenever it reaches a local optimum, the
//! arcs with the highest utility `d / (1 + penalty)` in the current route get
//! penalized, pushing the search elsewhere. The best route by real distance
//! seen at any point is what gets returned. Infeasible neighbours are skipped.

use std::time::Instant;

use super::problem::RoutingProblem;

const EPSILON: f64 = 1e-9;

/// A structural change to a visit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Remove a request's pickup and dropoff, then reinsert them at the given
    /// positions of the shortened sequence (`pickup_at < dropoff_at`, counted
    /// after the pickup has been inserted).
    RelocatePair {
        request: usize,
        pickup_at: usize,
        dropoff_at: usize,
    },
    /// Move the stop at `from` so that it ends up at index `to`.
    Relocate { from: usize, to: usize },
    /// Swap the stops at two positions.
    Exchange { a: usize, b: usize },
    /// Reverse the segment `start..=end`.
    TwoOpt { start: usize, end: usize },
}

impl Move {
    pub fn apply(&self, problem: &RoutingProblem, sequence: &[usize]) -> Vec<usize> {
        match *self {
            Move::RelocatePair {
                request,
                pickup_at,
                dropoff_at,
            } => {
                let pickup = problem.pickup_of(request);
                let dropoff = problem.dropoff_of(request);
                let mut out: Vec<usize> = sequence
                    .iter()
                    .copied()
                    .filter(|&s| s != pickup && s != dropoff)
                    .collect();
                out.insert(pickup_at, pickup);
                out.insert(dropoff_at, dropoff);
                out
            }
            Move::Relocate { from, to } => {
                let mut out = sequence.to_vec();
                let stop = out.remove(from);
                out.insert(to, stop);
                out
            }
            Move::Exchange { a, b } => {
                let mut out = sequence.to_vec();
                out.swap(a, b);
                out
            }
            Move::TwoOpt { start, end } => {
                let mut out = sequence.to_vec();
                out[start..=end].reverse();
                out
            }
        }
    }
}

/// Every move applicable to a sequence of `2 * requests` stops, in the
/// order they are tried. Moves are generated on demand; the neighbourhood
/// grows cubically with the request count.
pub fn neighbourhood(requests: usize) -> impl Iterator<Item = Move> {
    let requests = if requests < 2 { 0 } else { requests };
    let len = 2 * requests;

    let pairs = (0..requests).flat_map(move |request| {
        (0..len.saturating_sub(1)).flat_map(move |pickup_at| {
            ((pickup_at + 1)..len).map(move |dropoff_at| Move::RelocatePair {
                request,
                pickup_at,
                dropoff_at,
            })
        })
    });
    let relocations = (0..len).flat_map(move |from| {
        (0..len)
            .filter(move |&to| to != from)
            .map(move |to| Move::Relocate { from, to })
    });
    let exchanges =
        (0..len).flat_map(move |a| ((a + 1)..len).map(move |b| Move::Exchange { a, b }));
    let reversals = (0..len).flat_map(move |start| {
        ((start + 2)..len).map(move |end| Move::TwoOpt { start, end })
    });

    pairs.chain(relocations).chain(exchanges).chain(reversals)
}

/// Limits for one search run.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub deadline: Instant,
    pub max_iterations: usize,
    /// Local optima in a row without a new best before giving up.
    pub stall_limit: usize,
    /// GLS penalty factor (alpha). Zero disables penalties: plain descent.
    pub penalty_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No improving move left (plain descent only).
    Exhausted,
    Stalled,
    IterationCap,
    Deadline,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub sequence: Vec<usize>,
    pub cost: f64,
    pub iterations: usize,
    pub reason: StopReason,
}

struct ArcPenalties {
    size: usize,
    counts: Vec<u32>,
    lambda: f64,
}

impl ArcPenalties {
    fn new(size: usize) -> Self {
        Self {
            size,
            counts: vec![0; size * size],
            lambda: 0.0,
        }
    }

    fn get(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.size + to]
    }

    fn augmented_cost(&self, problem: &RoutingProblem, sequence: &[usize]) -> f64 {
        let mut prev = 0;
        let mut total = 0.0;
        for &stop in sequence {
            total += problem.distances().get(prev, stop)
                + self.lambda * f64::from(self.get(prev, stop));
            prev = stop;
        }
        total
    }

    /// Penalize the maximum-utility arcs of `sequence`.
    fn penalize(&mut self, problem: &RoutingProblem, sequence: &[usize]) {
        let arcs: Vec<(usize, usize)> = std::iter::once(0)
            .chain(sequence.iter().copied())
            .zip(sequence.iter().copied())
            .collect();
        let utility = |&(a, b): &(usize, usize)| {
            problem.distances().get(a, b) / (1.0 + f64::from(self.get(a, b)))
        };
        let max_utility = arcs.iter().map(utility).fold(0.0, f64::max);
        let worst: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|arc| utility(arc) >= max_utility - EPSILON)
            .copied()
            .collect();
        for (a, b) in worst {
            self.counts[a * self.size + b] += 1;
        }
    }
}

/// Candidates evaluated between two deadline and cancellation checks.
const CHECK_INTERVAL: usize = 128;

fn interruption(limits: &SearchLimits, is_cancelled: &impl Fn() -> bool) -> Option<StopReason> {
    if is_cancelled() {
        Some(StopReason::Cancelled)
    } else if Instant::now() >= limits.deadline {
        Some(StopReason::Deadline)
    } else {
        None
    }
}

enum Scan {
    Improved(Vec<usize>),
    LocalOptimum,
    Interrupted(StopReason),
}

/// First-improvement scan of the neighbourhood on the augmented cost.
fn scan(
    problem: &RoutingProblem,
    current: &[usize],
    penalties: &ArcPenalties,
    limits: &SearchLimits,
    is_cancelled: &impl Fn() -> bool,
) -> Scan {
    let current_aug = penalties.augmented_cost(problem, current);
    for (evaluated, mv) in neighbourhood(problem.request_count()).enumerate() {
        if evaluated % CHECK_INTERVAL == 0 {
            if let Some(reason) = interruption(limits, is_cancelled) {
                return Scan::Interrupted(reason);
            }
        }
        let candidate = mv.apply(problem, current);
        if problem.is_feasible(&candidate)
            && penalties.augmented_cost(problem, &candidate) < current_aug - EPSILON
        {
            return Scan::Improved(candidate);
        }
    }
    Scan::LocalOptimum
}

/// Improve a feasible `initial` sequence until a limit is hit.
///
/// The deadline and `is_cancelled` are checked before every iteration and
/// every [`CHECK_INTERVAL`] candidates inside a neighbourhood scan.
pub fn guided_local_search(
    problem: &RoutingProblem,
    initial: Vec<usize>,
    limits: &SearchLimits,
    is_cancelled: impl Fn() -> bool,
) -> SearchOutcome {
    let mut penalties = ArcPenalties::new(problem.stop_count());

    let mut current = initial;
    let mut best_cost = problem.path_cost(&current);
    let mut best = current.clone();
    let mut iterations = 0;
    let mut stalled = 0;

    let reason = loop {
        if let Some(reason) = interruption(limits, &is_cancelled) {
            break reason;
        }
        if iterations >= limits.max_iterations {
            break StopReason::IterationCap;
        }
        iterations += 1;

        match scan(problem, &current, &penalties, limits, &is_cancelled) {
            Scan::Interrupted(reason) => break reason,
            Scan::Improved(next) => {
                current = next;
                let cost = problem.path_cost(&current);
                if cost < best_cost - EPSILON {
                    best_cost = cost;
                    best = current.clone();
                    stalled = 0;
                }
            }
            Scan::LocalOptimum => {
                if limits.penalty_factor <= 0.0 {
                    break StopReason::Exhausted;
                }
                if penalties.lambda == 0.0 {
                    let arcs = current.len().max(1) as f64;
                    penalties.lambda = limits.penalty_factor * problem.path_cost(&current) / arcs;
                    if penalties.lambda <= 0.0 {
                        // Every stop coincides; nothing left to improve.
                        break StopReason::Exhausted;
                    }
                }
                penalties.penalize(problem, &current);
                stalled += 1;
                if stalled >= limits.stall_limit {
                    break StopReason::Stalled;
                }
            }
        }
    };

    SearchOutcome {
        sequence: best,
        cost: best_cost,
        iterations,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::geo::Coordinate;
    use crate::model::{Request, Vehicle};

    fn limits(penalty_factor: f64) -> SearchLimits {
        SearchLimits {
            deadline: Instant::now() + Duration::from_secs(5),
            max_iterations: 5_000,
            stall_limit: 30,
            penalty_factor,
        }
    }

    fn line_problem() -> RoutingProblem {
        let vehicle = Vehicle::new(1, Coordinate::new(40.70, -74.00), 4);
        let requests = vec![
            Request::new(1, Coordinate::new(40.72, -74.00), Coordinate::new(40.75, -74.00)),
            Request::new(2, Coordinate::new(40.71, -74.00), Coordinate::new(40.74, -74.00)),
            Request::new(3, Coordinate::new(40.73, -74.00), Coordinate::new(40.76, -74.00)),
        ];
        RoutingProblem::new(&vehicle, &requests)
    }

    #[test]
    fn moves_preserve_the_stop_multiset() {
        let problem = line_problem();
        let sequence = problem.fallback_sequence();
        for mv in neighbourhood(problem.request_count()) {
            let mut out = mv.apply(&problem, &sequence);
            out.sort_unstable();
            assert_eq!(out, (1..=6).collect::<Vec<_>>(), "{mv:?}");
        }
    }

    #[test]
    fn improves_fallback_to_the_straight_line() {
        let problem = line_problem();
        // Fallback visits 40.72, 40.71, 40.73, ... which backtracks.
        let initial = problem.fallback_sequence();
        let outcome = guided_local_search(&problem, initial.clone(), &limits(0.1), || false);

        assert!(problem.is_feasible(&outcome.sequence));
        assert!(outcome.cost <= problem.path_cost(&initial));
        // Monotone along the meridian: 0.06 degrees of latitude.
        let straight = vec![2, 1, 3, 5, 4, 6];
        assert!((outcome.cost - problem.path_cost(&straight)).abs() < 1e-9);
    }

    #[test]
    fn plain_descent_stops_when_exhausted() {
        let problem = line_problem();
        let outcome =
            guided_local_search(&problem, problem.fallback_sequence(), &limits(0.0), || false);
        assert_eq!(outcome.reason, StopReason::Exhausted);
        assert!(problem.is_feasible(&outcome.sequence));
    }

    #[test]
    fn cancellation_returns_initial() {
        let problem = line_problem();
        let initial = problem.fallback_sequence();
        let outcome = guided_local_search(&problem, initial.clone(), &limits(0.1), || true);
        assert_eq!(outcome.reason, StopReason::Cancelled);
        assert_eq!(outcome.sequence, initial);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn past_deadline_does_no_work() {
        let problem = line_problem();
        let mut expired = limits(0.1);
        expired.deadline = Instant::now();
        let outcome =
            guided_local_search(&problem, problem.fallback_sequence(), &expired, || false);
        assert_eq!(outcome.reason, StopReason::Deadline);
    }

    #[test]
    fn neighbourhood_size() {
        assert_eq!(neighbourhood(0).count(), 0);
        assert_eq!(neighbourhood(1).count(), 0);
        // 3 * 15 pair relocations, 30 relocations, 15 exchanges, 10 reversals.
        assert_eq!(neighbourhood(3).count(), 100);
    }

    #[test]
    fn cancellation_inside_a_scan() {
        let problem = line_problem();
        let initial = problem.fallback_sequence();
        let polls = Cell::new(0);
        let outcome = guided_local_search(&problem, initial.clone(), &limits(0.1), || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        });
        assert_eq!(outcome.reason, StopReason::Cancelled);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.sequence, initial);
    }
}
