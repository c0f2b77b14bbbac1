use fm_core::CoreError;
use fm_route::{RoutingError, SelectionError};
use thiserror::Error;

/// Anything the planner reports back to the user.
///
/// None of these are fatal: each one leaves the coordinator in a
/// well-defined state the user can continue from.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// Inline validation message; the selection is unchanged.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Panel message; the selection is kept for a retry.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("planner configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("planner session has shut down")]
    SessionClosed,
}

pub type PlanResult<T> = Result<T, PlanError>;
