//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! configuration or coordinate problem surfaces through them.

use thiserror::Error;

use crate::{FacilityId, GeoPoint};

/// The top-level error type for `fm-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("facility {0} not found")]
    FacilityNotFound(FacilityId),

    #[error("coordinate {0} is outside the WGS-84 range")]
    InvalidCoordinate(GeoPoint),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
