//! `fm-planner`: the route planning core of the facility map.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`coordinator`] | `Coordinator`: selection/route state machine              |
//! | [`builder`]     | `PlannerBuilder`                                          |
//! | [`state`]       | `PlannerState`                                            |
//! | [`observer`]    | `PlannerObserver` callbacks, `NoopObserver`               |
//! | [`present`]     | presentation resolver and device-location marker          |
//! | [`theme`]       | `MarkerTheme`: icon assets per render                     |
//! | [`summary`]     | `RouteSummary`: formatted directions panel                |
//! | [`session`]     | `Session` event loop, `UiEvent`, `Snapshot`               |
//! | [`error`]       | `PlanError`, `PlanResult<T>`                              |
//!
//! # Data flow
//!
//! ```text
//! UiEvent ─► Session ─► Coordinator ─► RouteAdapter ─► RoutingEngine
//!               │            │
//!               │            └─► PlannerObserver
//!               └─► present::resolve ─► Snapshot (watch) ─► renderer + MarkerTheme
//! ```
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to presentation and theme types. |

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod observer;
pub mod present;
pub mod session;
pub mod state;
pub mod summary;
pub mod theme;


pub use builder::PlannerBuilder;
pub use coordinator::Coordinator;
pub use error::{PlanError, PlanResult};
pub use observer::{NoopObserver, PlannerObserver};
pub use present::{
    device_marker, resolve, DeviceIcon, DeviceMarker, IconClass, Presentation, PresentationEntry,
};
pub use session::{Session, SessionHandle, Snapshot, UiEvent, Viewport};
pub use state::PlannerState;
pub use summary::RouteSummary;
pub use theme::{MarkerIcon, MarkerTheme};
