use std::fmt;

/// Coordinator state.
///
/// ```text
///            set_*                 create_route           complete_route(Ok)
///   Idle ───────────► Partially ─────────────► Routing ───────────────────► Routed
///    ▲                Selected  ◄─────────────    │                            │
///    │                    ▲     complete(Err)     │ set_*                      │ set_*
///    │  clear_route       └───────────────────────┴────────────────────────────┘
///    └──────────────── (from any state)
/// ```
///
/// `Validating` is only observable from inside `create_route`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlannerState {
    /// No endpoint selected.
    #[default]
    Idle,
    /// At least one endpoint selected, no route requested or the last request
    /// failed.
    PartiallySelected,
    Validating,
    /// A computation is in flight.
    Routing,
    /// A route result is available.
    Routed,
}

impl PlannerState {
    #[inline]
    pub fn is_busy(self) -> bool {
        matches!(self, PlannerState::Validating | PlannerState::Routing)
    }
}

impl fmt::Display for PlannerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlannerState::Idle              => "idle",
            PlannerState::PartiallySelected => "partially-selected",
            PlannerState::Validating        => "validating",
            PlannerState::Routing           => "routing",
            PlannerState::Routed            => "routed",
        };
        f.write_str(s)
    }
}
