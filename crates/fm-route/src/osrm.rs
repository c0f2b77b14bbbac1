//! HTTP routing engine for an OSRM `route/v1` service.
//!
//! Requests `steps=true&overview=full&geometries=geojson` and translates
//! OSRM's `type`/`modifier` pairs into the routing-machine codes that
//! [`Maneuver::from_code`](crate::Maneuver::from_code) understands.

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use fm_core::GeoPoint;

use crate::engine::{EngineError, EngineRoute, EngineStep, RoutingEngine};

/// Public demo server used by the web map's routing control.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

pub struct OsrmEngine {
    client:   reqwest::Client,
    base_url: String,
    profile:  String,
}

impl OsrmEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            profile:  "driving".to_owned(),
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    fn url(&self, from: GeoPoint, to: GeoPoint) -> String {
        // OSRM takes lon,lat order.
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url, self.profile, from.lon, from.lat, to.lon, to.lat
        )
    }

    async fn fetch(&self, from: GeoPoint, to: GeoPoint) -> Result<EngineRoute, EngineError> {
        let url = self.url(from, to);
        debug!(%url, "requesting OSRM route");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        let status = resp.status();
        // OSRM answers 400 with a JSON body for NoRoute/InvalidQuery; only
        // other failures mean the service itself is unhealthy.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            return Err(EngineError::Unavailable(format!("HTTP {status}")));
        }
        let body: OsrmResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Unavailable(format!("malformed response: {e}")))?;

        body.into_route()
    }
}

impl RoutingEngine for OsrmEngine {
    fn name(&self) -> &str {
        "osrm"
    }

    fn route(
        &self,
        from: GeoPoint,
        to:   GeoPoint,
    ) -> impl Future<Output = Result<EngineRoute, EngineError>> + Send {
        self.fetch(from, to)
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OsrmResponse {
    code:    String,
    message: Option<String>,
    #[serde(default)]
    routes:  Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs:     Vec<OsrmLeg>,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    /// `[lon, lat]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Deserialize)]
struct OsrmStep {
    distance: f64,
    #[serde(default)]
    name:     String,
    maneuver: OsrmManeuver,
}

#[derive(Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind:     String,
    modifier: Option<String>,
}

impl OsrmResponse {
    fn into_route(self) -> Result<EngineRoute, EngineError> {
        let detail = || self.message.clone().unwrap_or_else(|| self.code.clone());
        match self.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => return Err(EngineError::NoPath(detail())),
            "InvalidQuery" | "InvalidValue" | "InvalidUrl" => {
                return Err(EngineError::InvalidInput(detail()));
            }
            _ => return Err(EngineError::Unavailable(detail())),
        }

        let Some(route) = self.routes.into_iter().next() else {
            return Err(EngineError::NoPath("response contained no routes".to_owned()));
        };

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|s| {
                let code = native_code(&s.maneuver.kind, s.maneuver.modifier.as_deref());
                let text = step_text(code, &s.name);
                EngineStep::new(code, text, s.distance)
            })
            .collect();

        let geometry = route
            .geometry
            .map(|g| g.coordinates.into_iter().map(|[lon, lat]| GeoPoint::new(lat, lon)).collect())
            .unwrap_or_default();

        Ok(EngineRoute {
            distance_m: route.distance,
            duration_secs: route.duration,
            steps,
            geometry,
        })
    }
}

/// Map an OSRM `type`/`modifier` pair to a routing-machine code.
fn native_code(kind: &str, modifier: Option<&str>) -> &'static str {
    match kind {
        "depart" => return "Head",
        "arrive" => return "DestinationReached",
        "roundabout" | "rotary" | "roundabout turn" => return "Roundabout",
        _ => {}
    }
    match modifier {
        Some("uturn")        => "TurnAround",
        Some("sharp right")  => "SharpRight",
        Some("right")        => "Right",
        Some("slight right") => "SlightRight",
        Some("straight")     => if kind == "turn" { "Straight" } else { "Continue" },
        Some("slight left")  => "SlightLeft",
        Some("left")         => "Left",
        Some("sharp left")   => "SharpLeft",
        _                    => "Continue",
    }
}

fn step_text(code: &str, street: &str) -> String {
    let lead = match code {
        "Head"               => "Head out",
        "DestinationReached" => return "You have arrived at your destination".to_owned(),
        "Roundabout"         => "Enter the roundabout",
        "TurnAround"         => "Make a U-turn",
        "SharpRight"         => "Sharp right",
        "Right"              => "Turn right",
        "SlightRight"        => "Slight right",
        "SlightLeft"         => "Slight left",
        "Left"               => "Turn left",
        "SharpLeft"          => "Sharp left",
        "Straight"           => "Go straight",
        _                    => "Continue",
    };
    if street.is_empty() {
        lead.to_owned()
    } else {
        format!("{lead} onto {street}")
    }
}
