//! Engine-independent route result.

use fm_core::GeoPoint;

use crate::engine::{EngineRoute, EngineStep};

/// Direction of travel at an instruction, reduced to what the instruction
/// list can draw an arrow for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maneuver {
    Left,
    Right,
    Straight,
    Unknown,
}

impl Maneuver {
    /// Normalize a native maneuver code.
    ///
    /// Codes follow the routing-machine vocabulary (`Head`, `Continue`,
    /// `SlightLeft`, `SharpRight`, `TurnAround`, `DestinationReached`, …).
    /// Matching ignores ASCII case, spaces, underscores, and hyphens, so
    /// `"slight left"` and `"SLIGHT_LEFT"` are the same code.  Anything not
    /// listed below is `Unknown`.
    ///
    /// | Codes                                   | Maneuver   |
    /// |-----------------------------------------|------------|
    /// | `Left`, `SlightLeft`, `SharpLeft`       | `Left`     |
    /// | `Right`, `SlightRight`, `SharpRight`    | `Right`    |
    /// | `Straight`, `Continue`, `Head`          | `Straight` |
    pub fn from_code(code: &str) -> Self {
        let key: String = code
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "left" | "slightleft" | "sharpleft"    => Maneuver::Left,
            "right" | "slightright" | "sharpright" => Maneuver::Right,
            "straight" | "continue" | "head"       => Maneuver::Straight,
            _ => Maneuver::Unknown,
        }
    }
}

/// One line of turn-by-turn directions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub maneuver:   Maneuver,
    pub text:       String,
    /// Length of the segment this instruction covers, in metres.
    pub distance_m: f64,
}

impl Instruction {
    pub fn new(maneuver: Maneuver, text: impl Into<String>, distance_m: f64) -> Self {
        Self { maneuver, text: text.into(), distance_m }
    }
}

impl From<EngineStep> for Instruction {
    fn from(step: EngineStep) -> Self {
        Self {
            maneuver:   Maneuver::from_code(&step.code),
            text:       step.text,
            distance_m: step.distance_m,
        }
    }
}

/// A computed route.  Replaced wholesale, never patched.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    pub distance_m:    f64,
    pub duration_secs: f64,
    pub instructions:  Vec<Instruction>,
    /// Polyline to draw, origin first.  May be empty if the engine does not
    /// report geometry.
    pub geometry:      Vec<GeoPoint>,
}

impl RouteResult {
    pub fn from_engine(route: EngineRoute) -> Self {
        Self {
            distance_m:    route.distance_m,
            duration_secs: route.duration_secs,
            instructions:  route.steps.into_iter().map(Instruction::from).collect(),
            geometry:      route.geometry,
        }
    }
}
