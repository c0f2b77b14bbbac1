//! In-memory facility catalog.

use std::collections::HashMap;

use tracing::warn;

use fm_core::{Category, CoreError, Facility, FacilityId, GeoPoint};

// ── CategoryCounts ────────────────────────────────────────────────────────────

/// Number of facilities per category, as shown in the statistics panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub primary:         usize,
    pub lower_secondary: usize,
    pub upper_secondary: usize,
    pub other:           usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Primary        => self.primary,
            Category::LowerSecondary => self.lower_secondary,
            Category::UpperSecondary => self.upper_secondary,
            Category::Other          => self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.primary + self.lower_secondary + self.upper_secondary + self.other
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Ordered, immutable collection of facilities with an id index.
///
/// Iteration order is the source order of the loaded records; the index only
/// accelerates lookups.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    facilities: Vec<Facility>,
    index:      HashMap<FacilityId, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from already-parsed facilities.
    ///
    /// A facility whose id was already seen is logged and skipped; the first
    /// occurrence wins.
    pub fn from_facilities(facilities: impl IntoIterator<Item = Facility>) -> Self {
        let mut catalog = Catalog::empty();
        for facility in facilities {
            if catalog.index.contains_key(&facility.id) {
                warn!(id = %facility.id, name = %facility.name, "skipping duplicate facility id");
                continue;
            }
            catalog.index.insert(facility.id.clone(), catalog.facilities.len());
            catalog.facilities.push(facility);
        }
        catalog
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Facility> {
        self.facilities.iter()
    }

    pub fn as_slice(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn contains(&self, id: &FacilityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &FacilityId) -> Option<&Facility> {
        self.index.get(id).map(|&i| &self.facilities[i])
    }

    /// Like [`get`](Self::get) but reports a missing id as an error.
    pub fn require(&self, id: &FacilityId) -> Result<&Facility, CoreError> {
        self.get(id).ok_or_else(|| CoreError::FacilityNotFound(id.clone()))
    }

    pub fn position_of(&self, id: &FacilityId) -> Option<GeoPoint> {
        self.get(id).map(|f| f.position)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Case-insensitive substring search over name and address.
    ///
    /// An empty (or all-whitespace) query matches nothing; the search box
    /// treats that as "reset" rather than "show everything".
    pub fn search(&self, query: &str) -> Vec<&Facility> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.facilities
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&needle)
                    || f.address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Facilities of one category, or all of them when `category` is `None`.
    pub fn filtered(&self, category: Option<Category>) -> Vec<&Facility> {
        self.facilities
            .iter()
            .filter(|f| category.is_none_or(|c| f.category == c))
            .collect()
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for f in &self.facilities {
            match f.category {
                Category::Primary        => counts.primary += 1,
                Category::LowerSecondary => counts.lower_secondary += 1,
                Category::UpperSecondary => counts.upper_secondary += 1,
                Category::Other          => counts.other += 1,
            }
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Facility;
    type IntoIter = std::slice::Iter<'a, Facility>;

    fn into_iter(self) -> Self::IntoIter {
        self.facilities.iter()
    }
}
