//! `fm-core`: foundational types for the facility map route planner.
//!
//! This crate is a dependency of every other `fm-*` crate.  It has no `fm-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `FacilityId`, `NodeId`, `EdgeId`                      |
//! | [`geo`]      | `GeoPoint`, haversine distance, initial bearing       |
//! | [`facility`] | `Facility`, `Category`                                |
//! | [`config`]   | `PlannerConfig`                                       |
//! | [`error`]    | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod facility;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlannerConfig;
pub use error::{CoreError, CoreResult};
pub use facility::{Category, Facility};
pub use geo::GeoPoint;
pub use ids::{EdgeId, FacilityId, NodeId};
