//! Problem input and validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, InputError};
use crate::model::{Request, Vehicle};

/// Requests and vehicles for one run, as received from a caller.
///
/// Missing lists deserialize as empty so that validation, not parsing,
/// reports them. `riders`/`drivers` are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemInput {
    #[serde(default, alias = "riders")]
    pub requests: Vec<Request>,
    #[serde(default, alias = "drivers")]
    pub vehicles: Vec<Vehicle>,
}

impl ProblemInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Reject inputs that cannot be optimized at all.
///
/// Empty lists are reported first (requests before vehicles), then invalid
/// coordinates, then duplicate ids.
pub fn validate(requests: &[Request], vehicles: &[Vehicle]) -> Result<(), InputError> {
    if requests.is_empty() {
        return Err(InputError::NoRequests);
    }
    if vehicles.is_empty() {
        return Err(InputError::NoVehicles);
    }

    for request in requests {
        for (field, coordinate) in [("pickup", request.pickup), ("dropoff", request.dropoff)] {
            if !coordinate.is_valid() {
                return Err(InputError::InvalidCoordinate {
                    entity: EntityKind::Request,
                    id: request.id,
                    field,
                });
            }
        }
    }
    if let Some(vehicle) = vehicles.iter().find(|v| !v.location.is_valid()) {
        return Err(InputError::InvalidCoordinate {
            entity: EntityKind::Vehicle,
            id: vehicle.id,
            field: "location",
        });
    }

    let mut seen = HashSet::new();
    if let Some(dup) = requests.iter().find(|r| !seen.insert(r.id)) {
        return Err(InputError::DuplicateRequestId(dup.id));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = vehicles.iter().find(|v| !seen.insert(v.id)) {
        return Err(InputError::DuplicateVehicleId(dup.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn request(id: u64) -> Request {
        Request::new(id, Coordinate::new(40.75, -73.98), Coordinate::new(40.76, -73.97))
    }

    fn vehicle(id: u64) -> Vehicle {
        Vehicle::new(id, Coordinate::new(40.75, -73.99), 4)
    }

    #[test]
    fn parses_original_field_names() {
        let input = ProblemInput::from_json(
            r#"{"riders": [
                    {"id": 1, "pickup": [40.7589, -73.9851], "dropoff": [40.7614, -73.9776]}
                ],
                "drivers": [{"id": 1, "location": [40.7550, -73.9870], "capacity": 4}]}"#,
        )
        .expect("input");
        assert_eq!(input.requests.len(), 1);
        assert_eq!(input.vehicles[0].capacity, 4);
    }

    #[test]
    fn missing_lists_are_empty() {
        let input = ProblemInput::from_json("{}").expect("input");
        assert!(input.requests.is_empty());
        assert!(input.vehicles.is_empty());
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        let result = ProblemInput::from_json(
            r#"{"vehicles": [{"id": 1, "location": [40.0, -73.0], "capacity": "four"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_requests_reported_before_vehicles() {
        assert_eq!(validate(&[], &[]), Err(InputError::NoRequests));
        assert_eq!(validate(&[request(1)], &[]), Err(InputError::NoVehicles));
        assert_eq!(validate(&[request(1)], &[vehicle(1)]), Ok(()));
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let mut bad = request(5);
        bad.dropoff = Coordinate::new(f64::NAN, 0.0);
        assert_eq!(
            validate(&[bad], &[vehicle(1)]),
            Err(InputError::InvalidCoordinate {
                entity: EntityKind::Request,
                id: 5,
                field: "dropoff",
            })
        );

        let mut lost = vehicle(2);
        lost.location = Coordinate::new(120.0, 0.0);
        assert!(matches!(
            validate(&[request(1)], &[lost]),
            Err(InputError::InvalidCoordinate { entity: EntityKind::Vehicle, id: 2, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        assert_eq!(
            validate(&[request(1), request(1)], &[vehicle(1)]),
            Err(InputError::DuplicateRequestId(1))
        );
        assert_eq!(
            validate(&[request(1)], &[vehicle(3), vehicle(3)]),
            Err(InputError::DuplicateVehicleId(3))
        );
    }
}
