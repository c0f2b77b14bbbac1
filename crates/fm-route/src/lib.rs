//! `fm-route`: route endpoints, routing engines, and the engine adapter.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`endpoint`] | `RouteEndpoint`, `RouteSelection`, `validate`                   |
//! | [`result`]   | `RouteResult`, `Instruction`, `Maneuver`                        |
//! | [`engine`]   | `RoutingEngine` trait, `EngineRoute`, `EngineStep`, `EngineError` |
//! | [`graph`]    | `GraphEngine`: local engine over an `fm-network` road graph     |
//! | [`osrm`]     | `OsrmEngine`: HTTP engine (feature = `"osrm"` only)             |
//! | [`adapter`]  | `RouteAdapter`, `PendingRoute`, `RouteCompletion`               |
//! | [`error`]    | `SelectionError`, `RoutingError`                                |
//!
//! # Request lifecycle
//!
//! ```text
//! adapter.compute_route(a, b) ──► PendingRoute { generation: g }
//!                                      │  .run().await  (engine call, timeout,
//!                                      ▼                 cancellation token)
//!                                RouteCompletion { generation: g, outcome }
//! adapter.accept(completion) ──► Some(outcome)  if g is still current
//!                                None           if a newer request or a
//!                                               cancel happened meanwhile
//! ```
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osrm`  | Enables [`OsrmEngine`] via `reqwest`.                        |
//! | `serde` | Derives `Serialize`/`Deserialize` on public data types.      |

pub mod adapter;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod graph;
pub mod result;

#[cfg(feature = "osrm")]
pub mod osrm;

#[cfg(test)]
mod tests;

pub use adapter::{PendingRoute, RouteAdapter, RouteCompletion};
pub use endpoint::{validate, EndpointRole, RouteEndpoint, RouteSelection};
pub use engine::{EngineError, EngineRoute, EngineStep, RoutingEngine};
pub use error::{RoutingError, RoutingResult, SelectionError};
pub use graph::GraphEngine;
pub use result::{Instruction, Maneuver, RouteResult};

#[cfg(feature = "osrm")]
pub use osrm::OsrmEngine;
