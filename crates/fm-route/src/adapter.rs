//! Routing-engine adapter: one request in flight, stale results dropped.
//!
//! # Generations
//!
//! Every call to [`RouteAdapter::compute_route`] and every effective
//! [`RouteAdapter::cancel`] bumps a monotonically increasing generation
//! counter.  A [`PendingRoute`] carries the generation it was issued under
//! into its [`RouteCompletion`].  [`RouteAdapter::accept`] only returns an
//! outcome when the completion's generation is still the current one and the
//! request has not been accepted yet, so a slow answer to an old request can
//! never overwrite the result of a newer one, regardless of the order in
//! which the futures finish.
//!
//! # Cancellation
//!
//! Superseded requests are also told to stop via their
//! `CancellationToken`.  That is an optimisation only: a request that
//! finishes anyway is still rejected by its generation.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fm_core::GeoPoint;

use crate::{RouteResult, RoutingEngine, RoutingError};

// ── RouteAdapter ──────────────────────────────────────────────────────────────

/// Owns the request lifecycle against one [`RoutingEngine`].
pub struct RouteAdapter<E: RoutingEngine> {
    engine:     Arc<E>,
    timeout:    Duration,
    generation: u64,
    in_flight:  Option<CancellationToken>,
}

impl<E: RoutingEngine> RouteAdapter<E> {
    /// `timeout` bounds each engine call; when it elapses the request
    /// completes with [`RoutingError::EngineUnavailable`].
    pub fn new(engine: E, timeout: Duration) -> Self {
        Self::from_arc(Arc::new(engine), timeout)
    }

    pub fn from_arc(engine: Arc<E>, timeout: Duration) -> Self {
        Self { engine, timeout, generation: 0, in_flight: None }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Generation of the most recent request or cancellation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issue a new request, cancelling any outstanding one.
    ///
    /// A missing or out-of-range coordinate does not reach the engine: the
    /// returned request completes immediately with
    /// [`RoutingError::InvalidCoordinates`].
    pub fn compute_route(
        &mut self,
        origin:      Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> PendingRoute<E> {
        self.cancel();
        self.generation += 1;

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let endpoints = match (origin, destination) {
            (Some(a), Some(b)) if a.is_valid() && b.is_valid() => Some((a, b)),
            _ => None,
        };
        match endpoints {
            Some((a, b)) => debug!(
                generation = self.generation,
                engine = self.engine.name(),
                from = %a,
                to = %b,
                "routing request issued"
            ),
            None => warn!(
                generation = self.generation,
                ?origin,
                ?destination,
                "routing request without usable coordinates"
            ),
        }

        PendingRoute {
            generation: self.generation,
            engine:     Arc::clone(&self.engine),
            endpoints,
            timeout:    self.timeout,
            token,
        }
    }

    /// Cancel the outstanding request, if any.  Its completion will be
    /// rejected by [`accept`](Self::accept).
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            debug!(generation = self.generation, "routing request cancelled");
            self.generation += 1;
        }
    }

    /// Hand a finished request back to the adapter.
    ///
    /// Returns the outcome when `completion` belongs to the current request,
    /// `None` when it is stale (superseded, cancelled, or already accepted).
    pub fn accept(&mut self, completion: RouteCompletion) -> Option<Result<RouteResult, RoutingError>> {
        if completion.generation != self.generation || self.in_flight.is_none() {
            debug!(
                generation = completion.generation,
                current = self.generation,
                "dropping stale routing completion"
            );
            return None;
        }
        self.in_flight = None;
        match completion.outcome {
            Outcome::Finished(result) => Some(result),
            // The token is only cancelled together with a generation bump,
            // so a current completion cannot be a cancelled one.
            Outcome::Cancelled => None,
        }
    }
}

// ── PendingRoute ──────────────────────────────────────────────────────────────

/// A request issued by [`RouteAdapter::compute_route`] that has not run yet.
///
/// Drive it with [`run`](Self::run), typically inside a spawned task, and
/// feed the result to [`RouteAdapter::accept`].
#[must_use = "a pending route does nothing until it is run"]
pub struct PendingRoute<E: RoutingEngine> {
    generation: u64,
    engine:     Arc<E>,
    endpoints:  Option<(GeoPoint, GeoPoint)>,
    timeout:    Duration,
    token:      CancellationToken,
}

impl<E: RoutingEngine> PendingRoute<E> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Call the engine (bounded by the timeout) unless the request is
    /// cancelled first.
    pub async fn run(self) -> RouteCompletion {
        if self.token.is_cancelled() {
            debug!(generation = self.generation, "routing request cancelled before it ran");
            return RouteCompletion { generation: self.generation, outcome: Outcome::Cancelled };
        }
        let outcome = match self.endpoints {
            None => Outcome::Finished(Err(RoutingError::InvalidCoordinates)),
            Some((from, to)) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Outcome::Cancelled,
                    res = tokio::time::timeout(self.timeout, self.engine.route(from, to)) => {
                        Outcome::Finished(match res {
                            Ok(Ok(route)) => Ok(RouteResult::from_engine(route)),
                            Ok(Err(e)) => {
                                debug!(generation = self.generation, error = %e, "routing engine failed");
                                Err(RoutingError::from(e))
                            }
                            Err(_) => {
                                warn!(
                                    generation = self.generation,
                                    timeout = ?self.timeout,
                                    "routing engine timed out"
                                );
                                Err(RoutingError::EngineUnavailable(format!(
                                    "no response within {} ms",
                                    self.timeout.as_millis()
                                )))
                            }
                        })
                    }
                }
            }
        };
        RouteCompletion { generation: self.generation, outcome }
    }
}

// ── RouteCompletion ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Outcome {
    Finished(Result<RouteResult, RoutingError>),
    Cancelled,
}

/// The tagged result of running a [`PendingRoute`].
#[derive(Debug, Clone)]
pub struct RouteCompletion {
    generation: u64,
    outcome:    Outcome,
}

impl RouteCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` if the request stopped because it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Outcome::Cancelled)
    }
}
