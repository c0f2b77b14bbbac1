//! Planner-wide configuration.

use std::time::Duration;

use crate::{CoreError, CoreResult, GeoPoint};

/// Global configuration shared by the routing adapter and the session.
///
/// # Defaults
///
/// | Field                  | Default                  |
/// |------------------------|--------------------------|
/// | `engine_timeout_ms`    | 10 000 (10 s)            |
/// | `home_center`          | (3.5952, 98.6722)        |
/// | `overview_zoom`        | 13                       |
/// | `focus_zoom`           | 16                       |
/// | `device_location_label`| `"My Current Location"`  |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Upper bound on a single routing-engine call.  When it elapses the
    /// adapter reports the engine as unavailable.
    pub engine_timeout_ms: u64,

    /// Map center shown at start-up and after a search reset.
    pub home_center: GeoPoint,

    /// Zoom level for the overview of all facilities.
    pub overview_zoom: u8,

    /// Zoom level used when focusing a single searched facility.
    pub focus_zoom: u8,

    /// Display name of the device-location endpoint in route summaries.
    pub device_location_label: String,
}

impl PlannerConfig {
    #[inline]
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    /// Reject configurations the session cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.engine_timeout_ms == 0 {
            return Err(CoreError::Config("engine_timeout_ms must be > 0".into()));
        }
        if !self.home_center.is_valid() {
            return Err(CoreError::InvalidCoordinate(self.home_center));
        }
        if self.overview_zoom > self.focus_zoom {
            return Err(CoreError::Config(format!(
                "overview_zoom ({}) must not exceed focus_zoom ({})",
                self.overview_zoom, self.focus_zoom
            )));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            engine_timeout_ms:     10_000,
            home_center:           GeoPoint::new(3.5952, 98.6722),
            overview_zoom:         13,
            focus_zoom:            16,
            device_location_label: "My Current Location".to_owned(),
        }
    }
}
