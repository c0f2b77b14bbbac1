//! Facility records as loaded from the catalog.

use crate::{FacilityId, GeoPoint};

/// Education level of a facility.
///
/// The data source tags records with short Indonesian codes (`SD`, `SMP`,
/// `SMA`).  Codes outside that set are preserved as [`Category::Other`] so
/// that presentation can fall back to the default marker instead of failing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Primary school (`SD`).
    Primary,
    /// Lower secondary school (`SMP`).
    LowerSecondary,
    /// Upper secondary school (`SMA`).
    UpperSecondary,
    /// Unrecognized category code.
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Primary,
        Category::LowerSecondary,
        Category::UpperSecondary,
    ];

    /// Parse a category code.  Matching is case-insensitive and accepts both
    /// the source codes and the English variant names.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "SD" | "PRIMARY" => Category::Primary,
            "SMP" | "LOWERSECONDARY" | "LOWER_SECONDARY" => Category::LowerSecondary,
            "SMA" | "UPPERSECONDARY" | "UPPER_SECONDARY" => Category::UpperSecondary,
            _ => Category::Other,
        }
    }

    /// Source code for the category, as written by the data source.
    pub fn code(self) -> &'static str {
        match self {
            Category::Primary        => "SD",
            Category::LowerSecondary => "SMP",
            Category::UpperSecondary => "SMA",
            Category::Other          => "other",
        }
    }

    #[inline]
    pub fn is_recognized(self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A geo-located facility.  Immutable once the catalog is loaded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    pub id:       FacilityId,
    pub name:     String,
    pub address:  String,
    pub position: GeoPoint,
    pub category: Category,
}

impl Facility {
    pub fn new(
        id:       impl Into<FacilityId>,
        name:     impl Into<String>,
        address:  impl Into<String>,
        position: GeoPoint,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            position,
            category,
        }
    }
}
