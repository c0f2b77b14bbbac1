//! The routing-engine boundary.
//!
//! The planner never computes paths itself.  It hands two coordinates to a
//! [`RoutingEngine`] and gets back distance, duration, a step list in the
//! engine's own maneuver vocabulary, and optionally a polyline.

use std::future::Future;

use thiserror::Error;

use fm_core::GeoPoint;

/// One maneuver as reported by the engine, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineStep {
    /// Native maneuver code, e.g. `"SlightRight"`.
    pub code:       String,
    pub text:       String,
    pub distance_m: f64,
}

impl EngineStep {
    pub fn new(code: impl Into<String>, text: impl Into<String>, distance_m: f64) -> Self {
        Self { code: code.into(), text: text.into(), distance_m }
    }
}

/// Raw engine response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineRoute {
    pub distance_m:    f64,
    pub duration_secs: f64,
    pub steps:         Vec<EngineStep>,
    pub geometry:      Vec<GeoPoint>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine ran and found no connecting path.
    #[error("no path: {0}")]
    NoPath(String),

    /// The engine could not be reached or failed to answer.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected the coordinates.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A black-box route computation between two coordinates.
///
/// Implementations must be `Send + Sync + 'static`: the adapter shares the
/// engine with every in-flight request through an `Arc`, and requests are
/// driven on whatever task the caller chooses.
pub trait RoutingEngine: Send + Sync + 'static {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Compute a route from `from` to `to`.
    fn route(
        &self,
        from: GeoPoint,
        to:   GeoPoint,
    ) -> impl Future<Output = Result<EngineRoute, EngineError>> + Send;
}
