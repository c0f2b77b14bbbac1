//! Coordinator observer trait for UI notifications.

use fm_route::RouteResult;

use crate::{PlanError, PlannerState};

/// Callbacks invoked by the [`Coordinator`][crate::Coordinator] whenever its
/// observable state changes.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Completions of superseded routing
/// requests never reach the observer.
///
/// # Example: status line
///
/// ```rust,ignore
/// struct StatusLine;
///
/// impl PlannerObserver for StatusLine {
///     fn on_state_change(&mut self, _from: PlannerState, to: PlannerState) {
///         eprintln!("planner: {to}");
///     }
/// }
/// ```
pub trait PlannerObserver: Send {
    /// Called after every state transition, with `from != to`.
    fn on_state_change(&mut self, _from: PlannerState, _to: PlannerState) {}

    /// Called once per applied route, right after entering `Routed`.
    fn on_route_ready(&mut self, _route: &RouteResult) {}

    /// Called for every selection or routing error reported to the user.
    fn on_error(&mut self, _error: &PlanError) {}
}

/// A [`PlannerObserver`] that does nothing.
pub struct NoopObserver;

impl PlannerObserver for NoopObserver {}
