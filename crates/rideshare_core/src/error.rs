use std::fmt;

use crate::model::{RequestId, VehicleId};

/// Which input list an invalid entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Request,
    Vehicle,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Request => f.write_str("request"),
            EntityKind::Vehicle => f.write_str("vehicle"),
        }
    }
}

/// Errors that reject a whole optimization run before any work is done.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NoRequests,
    NoVehicles,
    InvalidCoordinate {
        entity: EntityKind,
        id: u64,
        field: &'static str,
    },
    DuplicateRequestId(RequestId),
    DuplicateVehicleId(VehicleId),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NoRequests => f.write_str("no requests provided"),
            InputError::NoVehicles => f.write_str("no vehicles provided"),
            InputError::InvalidCoordinate { entity, id, field } => {
                write!(f, "{entity} {id} has an invalid {field} coordinate")
            }
            InputError::DuplicateRequestId(id) => {
                write!(f, "request id {id} appears more than once")
            }
            InputError::DuplicateVehicleId(id) => {
                write!(f, "vehicle id {id} appears more than once")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Errors from a single vehicle's route solve. Never aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    ZeroCapacity { vehicle_id: VehicleId },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::ZeroCapacity { vehicle_id } => {
                write!(f, "vehicle {vehicle_id} has zero capacity")
            }
        }
    }
}

impl std::error::Error for RouteError {}
