//! Map presentation: which facility markers are visible and which icon each
//! one carries.
//!
//! # Decision table
//!
//! Evaluated per facility, first matching row wins:
//!
//! | Search selection | Route active | Facility is …        | Visible | Icon               |
//! |------------------|--------------|----------------------|---------|--------------------|
//! | `Some(s)`        | any          | `s`                  | yes     | `SearchHighlight`  |
//! | `Some(s)`        | any          | anything else        | no      | -                  |
//! | `None`           | yes          | the origin           | yes     | `RouteOrigin`      |
//! | `None`           | yes          | the destination      | yes     | `RouteDestination` |
//! | `None`           | yes          | anything else        | no      | -                  |
//! | `None`           | no           | recognized category  | yes     | `Category(c)`      |
//! | `None`           | no           | `Category::Other`    | yes     | `Default`          |
//!
//! The device-location marker is not a facility and is resolved separately
//! by [`device_marker`].

use std::collections::HashMap;

use fm_core::{Category, Facility, FacilityId, GeoPoint};
use fm_route::{EndpointRole, RouteSelection};

// ── Icon classes ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IconClass {
    Default,
    Category(Category),
    SearchHighlight,
    RouteOrigin,
    RouteDestination,
}

impl IconClass {
    /// Category icon, degraded to `Default` for unrecognized categories.
    pub fn for_category(category: Category) -> Self {
        if category.is_recognized() {
            IconClass::Category(category)
        } else {
            IconClass::Default
        }
    }
}

/// How one facility marker is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationEntry {
    pub visible: bool,
    /// Meaningful only when `visible`.
    pub icon:    IconClass,
}

impl PresentationEntry {
    pub const HIDDEN: Self = Self { visible: false, icon: IconClass::Default };

    #[inline]
    pub fn shown(icon: IconClass) -> Self {
        Self { visible: true, icon }
    }
}

// ── Presentation ──────────────────────────────────────────────────────────────

/// Per-facility presentation, in the order the facilities were given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Presentation {
    entries: Vec<(FacilityId, PresentationEntry)>,
    index:   HashMap<FacilityId, usize>,
}

impl Presentation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &FacilityId) -> Option<PresentationEntry> {
        self.index.get(id).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FacilityId, PresentationEntry)> {
        self.entries.iter().map(|(id, e)| (id, *e))
    }

    /// Visible facilities with their icons.
    pub fn visible(&self) -> impl Iterator<Item = (&FacilityId, IconClass)> {
        self.iter().filter(|(_, e)| e.visible).map(|(id, e)| (id, e.icon))
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|(_, e)| e.visible).count()
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Resolve the presentation of every facility in `facilities`.
///
/// `route_active` is set once the user asked for a route over a valid
/// selection, whether or not the computation succeeded.
pub fn resolve<'a>(
    facilities:   impl IntoIterator<Item = &'a Facility>,
    search:       Option<&FacilityId>,
    selection:    &RouteSelection,
    route_active: bool,
) -> Presentation {
    let mut out = Presentation::default();
    for facility in facilities {
        let entry = decide(facility, search, selection, route_active);
        // A repeated id keeps its first entry, like the catalog does.
        if out.index.contains_key(&facility.id) {
            continue;
        }
        out.index.insert(facility.id.clone(), out.entries.len());
        out.entries.push((facility.id.clone(), entry));
    }
    out
}

fn decide(
    facility:     &Facility,
    search:       Option<&FacilityId>,
    selection:    &RouteSelection,
    route_active: bool,
) -> PresentationEntry {
    match (search, route_active) {
        (Some(s), _) if *s == facility.id => PresentationEntry::shown(IconClass::SearchHighlight),
        (Some(_), _)                      => PresentationEntry::HIDDEN,
        (None, true) => match selection.role_of(&facility.id) {
            Some(EndpointRole::Origin)      => PresentationEntry::shown(IconClass::RouteOrigin),
            Some(EndpointRole::Destination) => PresentationEntry::shown(IconClass::RouteDestination),
            None                            => PresentationEntry::HIDDEN,
        },
        (None, false) => PresentationEntry::shown(IconClass::for_category(facility.category)),
    }
}

// ── Device-location marker ────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceIcon {
    /// Plain "you are here" marker.
    Location,
    /// The device is the origin of the active route.
    RouteOrigin,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceMarker {
    pub position: GeoPoint,
    pub icon:     DeviceIcon,
}

/// Resolve the device-location marker.
///
/// Shown whenever a fix exists, except while a route between two facilities
/// is active.  It turns into the origin marker once a route starting at the
/// device is active.
pub fn device_marker(
    device:       Option<GeoPoint>,
    selection:    &RouteSelection,
    route_active: bool,
) -> Option<DeviceMarker> {
    let position = device?;
    let icon = match (route_active, selection.origin_is_device()) {
        (false, _)    => DeviceIcon::Location,
        (true, true)  => DeviceIcon::RouteOrigin,
        (true, false) => return None,
    };
    Some(DeviceMarker { position, icon })
}
