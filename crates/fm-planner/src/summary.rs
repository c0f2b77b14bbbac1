//! Human-readable route summary for the directions panel.

use std::fmt;

use fm_catalog::Catalog;
use fm_core::FacilityId;
use fm_route::{Maneuver, RouteEndpoint, RouteResult, RouteSelection};

/// Total distance in kilometres, one decimal: `2400.0` → `"2.4 km"`.
pub fn format_distance_km(metres: f64) -> String {
    format!("{:.1} km", metres / 1000.0)
}

/// Whole minutes, rounded: `360.0` → `"6 min"`.
pub fn format_duration_min(secs: f64) -> String {
    format!("{} min", (secs / 60.0).round() as i64)
}

/// Per-instruction distance: metres below one kilometre, kilometres above.
pub fn format_step_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{metres:.0} m")
    } else {
        format_distance_km(metres)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepLine {
    pub maneuver: Maneuver,
    pub text:     String,
    pub distance: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Empty when the endpoint no longer resolves to a facility.
    pub origin:      String,
    pub destination: String,
    pub distance:    String,
    pub duration:    String,
    pub steps:       Vec<StepLine>,
}

impl RouteSummary {
    pub fn new(
        route:        &RouteResult,
        selection:    &RouteSelection,
        catalog:      &Catalog,
        device_label: &str,
    ) -> Self {
        let name_of = |id: &FacilityId| catalog.get(id).map(|f| f.name.clone()).unwrap_or_default();
        let origin = match &selection.origin {
            Some(RouteEndpoint::DeviceLocation)  => device_label.to_owned(),
            Some(RouteEndpoint::FacilityRef(id)) => name_of(id),
            None                                 => String::new(),
        };
        let destination = selection.destination.as_ref().map(name_of).unwrap_or_default();

        let steps = route
            .instructions
            .iter()
            .map(|i| StepLine {
                maneuver: i.maneuver,
                text:     i.text.clone(),
                distance: format_step_distance(i.distance_m),
            })
            .collect();

        Self {
            origin,
            destination,
            distance: format_distance_km(route.distance_m),
            duration: format_duration_min(route.duration_secs),
            steps,
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} → {}", self.origin, self.destination)?;
        writeln!(f, "Distance: {}", self.distance)?;
        writeln!(f, "Duration: {}", self.duration)?;
        for step in &self.steps {
            let arrow = match step.maneuver {
                Maneuver::Left  => '←',
                Maneuver::Right => '→',
                _               => '↑',
            };
            writeln!(f, "  {arrow} {} ({})", step.text, step.distance)?;
        }
        Ok(())
    }
}
