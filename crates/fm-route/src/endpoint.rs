//! Route endpoints and selection validation.

use fm_core::{FacilityId, GeoPoint};

use crate::SelectionError;

/// One side of a planned route.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteEndpoint {
    /// The live device position, looked up when the route is created.  The
    /// fix may be missing at that moment.
    DeviceLocation,
    /// A facility from the catalog.
    FacilityRef(FacilityId),
}

impl RouteEndpoint {
    pub fn facility(id: impl Into<FacilityId>) -> Self {
        RouteEndpoint::FacilityRef(id.into())
    }

    pub fn facility_id(&self) -> Option<&FacilityId> {
        match self {
            RouteEndpoint::FacilityRef(id) => Some(id),
            RouteEndpoint::DeviceLocation  => None,
        }
    }

    #[inline]
    pub fn is_device(&self) -> bool {
        matches!(self, RouteEndpoint::DeviceLocation)
    }

    /// Coordinate of this endpoint right now.
    ///
    /// `lookup` maps a facility id to its position; it returns `None` for ids
    /// the catalog does not know.
    pub fn resolve(
        &self,
        device: Option<GeoPoint>,
        lookup: impl FnOnce(&FacilityId) -> Option<GeoPoint>,
    ) -> Option<GeoPoint> {
        match self {
            RouteEndpoint::DeviceLocation  => device,
            RouteEndpoint::FacilityRef(id) => lookup(id),
        }
    }
}

/// Which side of the route a facility sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    Origin,
    Destination,
}

/// The pair of endpoints currently picked by the user.
///
/// The destination slot holds a facility id rather than a [`RouteEndpoint`]:
/// the device position is only ever a valid origin, and the type says so.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSelection {
    pub origin:      Option<RouteEndpoint>,
    pub destination: Option<FacilityId>,
}

impl RouteSelection {
    pub fn new(origin: Option<RouteEndpoint>, destination: Option<FacilityId>) -> Self {
        Self { origin, destination }
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.destination.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.origin.is_some() && self.destination.is_some()
    }

    /// Number of endpoints set (0, 1 or 2).
    pub fn endpoint_count(&self) -> usize {
        usize::from(self.origin.is_some()) + usize::from(self.destination.is_some())
    }

    pub fn origin_is_device(&self) -> bool {
        self.origin.as_ref().is_some_and(RouteEndpoint::is_device)
    }

    /// Role of facility `id` in this selection, origin checked first.
    pub fn role_of(&self, id: &FacilityId) -> Option<EndpointRole> {
        if self.origin.as_ref().and_then(RouteEndpoint::facility_id) == Some(id) {
            Some(EndpointRole::Origin)
        } else if self.destination.as_ref() == Some(id) {
            Some(EndpointRole::Destination)
        } else {
            None
        }
    }
}

/// Check whether `selection` may be routed.
///
/// Rules are applied in order and the first failure is returned:
///
/// 1. both endpoints set, else [`SelectionError::IncompleteSelection`];
/// 2. a device-location origin needs a fix, else
///    [`SelectionError::DeviceLocationUnavailable`];
/// 3. origin and destination must be different facilities, else
///    [`SelectionError::SameEndpoint`].
pub fn validate(
    selection: &RouteSelection,
    device_location_available: bool,
) -> Result<(), SelectionError> {
    let (Some(origin), Some(destination)) = (&selection.origin, &selection.destination) else {
        return Err(SelectionError::IncompleteSelection);
    };
    match origin {
        RouteEndpoint::DeviceLocation if !device_location_available => {
            Err(SelectionError::DeviceLocationUnavailable)
        }
        RouteEndpoint::FacilityRef(id) if id == destination => Err(SelectionError::SameEndpoint),
        _ => Ok(()),
    }
}
