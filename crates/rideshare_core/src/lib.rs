pub mod cancel;
pub mod clustering;
pub mod config;
pub mod error;
pub mod geo;
pub mod input;
pub mod matching;
pub mod model;
pub mod optimizer;
pub mod pricing;
pub mod routing;
pub mod summary;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use cancel::CancellationToken;
pub use config::OptimizerConfig;
pub use error::{InputError, RouteError};
pub use geo::{haversine_km, Coordinate};
pub use input::ProblemInput;
pub use model::{Request, Stop, StopKind, Vehicle};
pub use optimizer::{optimize, optimize_with_cancel};
pub use summary::{Metrics, OptimizationSummary, OptimizeResponse};
