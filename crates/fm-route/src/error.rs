//! Route-planning error taxonomy.
//!
//! Both enums are recoverable by design of the planner: a `SelectionError`
//! leaves every piece of state untouched, a `RoutingError` keeps the
//! selection so the user can retry.

use thiserror::Error;

use crate::EngineError;

/// The endpoint selection cannot be routed as it stands.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionError {
    #[error("select both a starting point and a destination")]
    IncompleteSelection,

    #[error("device location is not available; enable location or choose a starting facility")]
    DeviceLocationUnavailable,

    #[error("starting point and destination are the same facility")]
    SameEndpoint,
}

/// A route computation was attempted and did not produce a route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("no route connects the selected points")]
    NoRouteFound,

    #[error("routing engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("an endpoint has no usable coordinate")]
    InvalidCoordinates,
}

impl From<EngineError> for RoutingError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::NoPath(_)       => RoutingError::NoRouteFound,
            EngineError::Unavailable(m)  => RoutingError::EngineUnavailable(m),
            EngineError::InvalidInput(_) => RoutingError::InvalidCoordinates,
        }
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
