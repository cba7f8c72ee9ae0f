//! Requests, vehicles and the stops a route is made of.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Default number of requests a vehicle may carry at once.
pub const DEFAULT_CAPACITY: u32 = 4;

/// Default maximum wait carried on a request (minutes).
pub const DEFAULT_MAX_WAIT_MINUTES: u32 = 15;

pub type RequestId = u64;
pub type VehicleId = u64;

/// A rider asking to travel from `pickup` to `dropoff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    /// Carried through to the result; the route solver does not use it yet.
    #[serde(default = "default_max_wait", alias = "max_wait_time")]
    pub max_wait_minutes: u32,
}

impl Request {
    pub fn new(id: RequestId, pickup: Coordinate, dropoff: Coordinate) -> Self {
        Self {
            id,
            pickup,
            dropoff,
            max_wait_minutes: DEFAULT_MAX_WAIT_MINUTES,
        }
    }

    pub fn with_max_wait_minutes(mut self, minutes: u32) -> Self {
        self.max_wait_minutes = minutes;
        self
    }

    pub fn pickup_stop(&self) -> Stop {
        Stop::new(self.pickup, StopKind::Pickup, self.id)
    }

    pub fn dropoff_stop(&self) -> Stop {
        Stop::new(self.dropoff, StopKind::Dropoff, self.id)
    }
}

/// A vehicle starting at `location` that can hold `capacity` requests at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub location: Coordinate,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl Vehicle {
    pub fn new(id: VehicleId, location: Coordinate, capacity: u32) -> Self {
        Self {
            id,
            location,
            capacity,
        }
    }

    pub fn origin_stop(&self) -> Stop {
        Stop::new(self.location, StopKind::Origin, self.id)
    }
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

fn default_max_wait() -> u32 {
    DEFAULT_MAX_WAIT_MINUTES
}

/// Role of a stop inside a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Origin,
    Pickup,
    Dropoff,
}

impl StopKind {
    /// Change of the onboard count when the stop is visited.
    pub fn load_delta(self) -> i32 {
        match self {
            StopKind::Origin => 0,
            StopKind::Pickup => 1,
            StopKind::Dropoff => -1,
        }
    }
}

/// A visited location. `owner_id` is the request id for pickups and dropoffs
/// and the vehicle id for the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub owner_id: u64,
}

impl Stop {
    pub fn new(coordinate: Coordinate, kind: StopKind, owner_id: u64) -> Self {
        Self {
            lat: coordinate.lat,
            lon: coordinate.lon,
            kind,
            owner_id,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}
