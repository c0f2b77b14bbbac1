//! `fm-network`: road network, spatial indexing, and shortest paths.
//!
//! Backs the local routing engine in `fm-route`.  Nothing here knows about
//! facilities or endpoints; it only answers "which node is nearest to this
//! coordinate" and "what is the fastest edge sequence between two nodes".
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`path`]    | `PathFinder` trait, `Path`, `Dijkstra`                      |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Path`.                 |

pub mod error;
pub mod network;
pub mod path;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use path::{Dijkstra, Path, PathFinder};
