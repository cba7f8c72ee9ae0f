//! Stop layout, distance matrix and feasibility checks for one vehicle.
//!
//! Stops are laid out as: origin at index 0, pickups at `1..=m`, dropoffs at
//! `m+1..=2m`, where request `r` owns pickup `1 + r` and dropoff `1 + m + r`.
//! A candidate route is a sequence of the `2m` non-origin stop indices; the
//! origin is always visited first and never appears in the sequence.

use crate::geo::{haversine_km, Coordinate};
use crate::model::{Request, Stop, StopKind, Vehicle};

/// Dense symmetric matrix of haversine distances (km).
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_coordinates(points: &[Coordinate]) -> Self {
        let size = points.len();
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = haversine_km(points[i], points[j]);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }
}

#[derive(Debug, Clone)]
pub struct RoutingProblem {
    stops: Vec<Stop>,
    distances: DistanceMatrix,
    capacity: u32,
    requests: usize,
}

impl RoutingProblem {
    /// Builds the stop set for `vehicle` serving every request in `requests`.
    pub fn new(vehicle: &Vehicle, requests: &[Request]) -> Self {
        let mut stops = Vec::with_capacity(2 * requests.len() + 1);
        stops.push(vehicle.origin_stop());
        stops.extend(requests.iter().map(Request::pickup_stop));
        stops.extend(requests.iter().map(Request::dropoff_stop));

        let coordinates: Vec<Coordinate> = stops.iter().map(Stop::coordinate).collect();
        Self {
            distances: DistanceMatrix::from_coordinates(&coordinates),
            stops,
            capacity: vehicle.capacity,
            requests: requests.len(),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests
    }

    pub fn stop(&self, idx: usize) -> &Stop {
        &self.stops[idx]
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn pickup_of(&self, request: usize) -> usize {
        1 + request
    }

    pub fn dropoff_of(&self, request: usize) -> usize {
        1 + self.requests + request
    }

    /// Request index owning a non-origin stop.
    pub fn request_of(&self, stop: usize) -> Option<usize> {
        match stop {
            0 => None,
            s if s <= self.requests => Some(s - 1),
            s if s <= 2 * self.requests => Some(s - 1 - self.requests),
            _ => None,
        }
    }

    /// Open path length: origin, then every stop of `sequence` in order.
    pub fn path_cost(&self, sequence: &[usize]) -> f64 {
        let mut prev = 0;
        let mut total = 0.0;
        for &stop in sequence {
            total += self.distances.get(prev, stop);
            prev = stop;
        }
        total
    }

    /// Running load stays within `0..=capacity` over the whole sequence.
    pub fn respects_capacity(&self, sequence: &[usize]) -> bool {
        let mut load: i64 = 0;
        for &stop in sequence {
            load += i64::from(self.stops[stop].kind.load_delta());
            if load < 0 || load > i64::from(self.capacity) {
                return false;
            }
        }
        true
    }

    /// Full route check: every non-origin stop exactly once, each pickup
    /// before its dropoff, and capacity never exceeded.
    pub fn is_feasible(&self, sequence: &[usize]) -> bool {
        if sequence.len() != 2 * self.requests {
            return false;
        }
        let mut position = vec![usize::MAX; self.stops.len()];
        for (pos, &stop) in sequence.iter().enumerate() {
            if stop == 0 || stop >= self.stops.len() || position[stop] != usize::MAX {
                return false;
            }
            position[stop] = pos;
        }
        let ordered = (0..self.requests)
            .all(|r| position[self.pickup_of(r)] < position[self.dropoff_of(r)]);
        ordered && self.respects_capacity(sequence)
    }

    /// Origin followed by the stops of `sequence`.
    pub fn materialize(&self, sequence: &[usize]) -> Vec<Stop> {
        std::iter::once(0)
            .chain(sequence.iter().copied())
            .map(|idx| self.stops[idx])
            .collect()
    }

    /// Visit order used when no search result is available: all pickups in
    /// assignment order, then all dropoffs in assignment order.
    pub fn fallback_sequence(&self) -> Vec<usize> {
        (1..=2 * self.requests).collect()
    }

    pub fn kind(&self, idx: usize) -> StopKind {
        self.stops[idx].kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(capacity: u32, requests: usize) -> RoutingProblem {
        let vehicle = Vehicle::new(1, Coordinate::new(40.7550, -73.9870), capacity);
        let requests: Vec<Request> = (0..requests)
            .map(|i| {
                let f = i as f64 * 0.003;
                Request::new(
                    i as u64 + 1,
                    Coordinate::new(40.7589 + f, -73.9851),
                    Coordinate::new(40.7614 + f, -73.9776),
                )
            })
            .collect();
        RoutingProblem::new(&vehicle, &requests)
    }

    #[test]
    fn stop_layout() {
        let p = problem(4, 2);
        assert_eq!(p.stop_count(), 5);
        assert_eq!(p.kind(0), StopKind::Origin);
        assert_eq!(p.kind(p.pickup_of(1)), StopKind::Pickup);
        assert_eq!(p.kind(p.dropoff_of(0)), StopKind::Dropoff);
        assert_eq!(p.request_of(p.dropoff_of(1)), Some(1));
        assert_eq!(p.request_of(0), None);
        assert_eq!(p.stop(p.pickup_of(1)).owner_id, 2);
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let p = problem(4, 3);
        let m = p.distances();
        for i in 0..m.size() {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn feasibility_rejects_dropoff_first() {
        let p = problem(4, 2);
        assert!(p.is_feasible(&[1, 2, 3, 4]));
        assert!(p.is_feasible(&[1, 3, 2, 4]));
        assert!(!p.is_feasible(&[3, 1, 2, 4]));
        assert!(!p.is_feasible(&[1, 1, 3, 4]));
        assert!(!p.is_feasible(&[1, 2, 3]));
    }

    #[test]
    fn feasibility_rejects_overload() {
        let p = problem(1, 2);
        assert!(!p.is_feasible(&[1, 2, 3, 4]));
        assert!(p.is_feasible(&[1, 3, 2, 4]));
    }

    #[test]
    fn fallback_is_feasible_within_capacity() {
        let p = problem(3, 3);
        assert!(p.is_feasible(&p.fallback_sequence()));
    }

    #[test]
    fn path_cost_starts_at_origin() {
        let p = problem(4, 1);
        let expected = p.distances().get(0, 1) + p.distances().get(1, 2);
        assert!((p.path_cost(&[1, 2]) - expected).abs() < 1e-12);
    }
}
