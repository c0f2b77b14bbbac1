//! Marker appearance, passed to the renderer with every frame.
//!
//! A [`MarkerTheme`] maps the resolver's abstract [`IconClass`] and
//! [`DeviceIcon`] to concrete image assets.  It is a plain value: two maps
//! can render with different themes side by side, and nothing is installed
//! globally.

use fm_core::Category;

use crate::present::{DeviceIcon, IconClass};

/// One marker image plus its Leaflet-style geometry (pixels).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerIcon {
    pub url:          String,
    pub retina_url:   Option<String>,
    pub shadow_url:   Option<String>,
    pub size:         [u32; 2],
    pub anchor:       [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size:  Option<[u32; 2]>,
}

const SHADOW: &str = "/leaflet/marker-shadow.png";

impl MarkerIcon {
    /// Standard 25×41 pin with shadow.
    pub fn pin(url: impl Into<String>, retina_url: impl Into<String>) -> Self {
        Self {
            url:          url.into(),
            retina_url:   Some(retina_url.into()),
            shadow_url:   Some(SHADOW.to_owned()),
            size:         [25, 41],
            anchor:       [12, 41],
            popup_anchor: [1, -34],
            shadow_size:  Some([41, 41]),
        }
    }

    /// Coloured pin from the `/marker/` asset set.
    pub fn coloured_pin(colour: &str) -> Self {
        Self::pin(
            format!("/marker/marker-icon-{colour}.png"),
            format!("/marker/marker-icon-2x-{colour}.png"),
        )
    }
}

/// Icon set for one render.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerTheme {
    pub default:           MarkerIcon,
    pub primary:           MarkerIcon,
    pub lower_secondary:   MarkerIcon,
    pub upper_secondary:   MarkerIcon,
    pub search_highlight:  MarkerIcon,
    pub route_origin:      MarkerIcon,
    pub route_destination: MarkerIcon,
    pub device_location:   MarkerIcon,
}

impl MarkerTheme {
    pub fn icon(&self, class: IconClass) -> &MarkerIcon {
        match class {
            IconClass::Default                            => &self.default,
            IconClass::Category(Category::Primary)        => &self.primary,
            IconClass::Category(Category::LowerSecondary) => &self.lower_secondary,
            IconClass::Category(Category::UpperSecondary) => &self.upper_secondary,
            IconClass::Category(Category::Other)          => &self.default,
            IconClass::SearchHighlight                    => &self.search_highlight,
            IconClass::RouteOrigin                        => &self.route_origin,
            IconClass::RouteDestination                   => &self.route_destination,
        }
    }

    pub fn device_icon(&self, icon: DeviceIcon) -> &MarkerIcon {
        match icon {
            DeviceIcon::Location    => &self.device_location,
            DeviceIcon::RouteOrigin => &self.route_origin,
        }
    }
}

impl Default for MarkerTheme {
    fn default() -> Self {
        Self {
            default:           MarkerIcon::pin("/leaflet/marker-icon.png", "/leaflet/marker-icon-2x.png"),
            primary:           MarkerIcon::coloured_pin("blue"),
            lower_secondary:   MarkerIcon::coloured_pin("green"),
            upper_secondary:   MarkerIcon::coloured_pin("violet"),
            search_highlight:  MarkerIcon::coloured_pin("red"),
            route_origin:      MarkerIcon::coloured_pin("green"),
            route_destination: MarkerIcon::coloured_pin("green"),
            device_location:   MarkerIcon {
                url:          "/marker/location.png".to_owned(),
                retina_url:   None,
                shadow_url:   Some(SHADOW.to_owned()),
                size:         [32, 32],
                anchor:       [16, 16],
                popup_anchor: [0, -16],
                shadow_size:  None,
            },
        }
    }
}
