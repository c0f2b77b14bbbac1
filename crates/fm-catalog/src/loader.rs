//! CSV and JSON catalog loaders.
//!
//! # CSV format
//!
//! One row per facility, with a header row.  `category` holds the source
//! code (`SD`, `SMP`, `SMA`); anything else loads as `Category::Other`.
//!
//! ```csv
//! id,name,address,lat,lon,category
//! 7f3c,SD Negeri 060843,Jl. Sei Batang Hari,3.5901,98.6553,SD
//! 9a11,SMA Negeri 1 Medan,Jl. Teuku Cik Ditiro,3.5829,98.6694,SMA
//! ```
//!
//! # JSON format
//!
//! The facility API returns an array of objects keyed the way the source
//! database names its columns:
//!
//! ```json
//! [{"uuid": "7f3c", "nama": "SD Negeri 060843", "alamat": "Jl. Sei Batang Hari",
//!   "lat": 3.5901, "lng": 98.6553, "bentuk_pendidikan": "SD"}]
//! ```
//!
//! English keys (`id`, `name`, `address`, `lon`, `category`) are accepted as
//! aliases.  `lat`/`lng` may be numbers or numeric strings.
//!
//! # Malformed records
//!
//! A record missing its id or either coordinate, or whose coordinates are out
//! of range, is logged at `warn` level and skipped.  The load never fails
//! because of a single record.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use fm_core::{Category, Facility, GeoPoint};

use crate::{Catalog, CatalogError, CatalogResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// Lenient CSV row: every field optional so that one bad cell excludes the
/// record instead of aborting the reader.
#[derive(Deserialize)]
struct CsvRecord {
    id:       Option<String>,
    name:     Option<String>,
    address:  Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    lat:      Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    lon:      Option<f64>,
    category: Option<String>,
}

#[derive(Deserialize)]
struct JsonRecord {
    #[serde(alias = "id")]
    uuid:              Option<String>,
    #[serde(alias = "name")]
    nama:              Option<String>,
    #[serde(alias = "address")]
    alamat:            Option<String>,
    lat:               Option<serde_json::Value>,
    #[serde(alias = "lon")]
    lng:               Option<serde_json::Value>,
    #[serde(alias = "category")]
    bentuk_pendidikan: Option<String>,
}

/// Fields common to both formats, before validation.
struct RawFacility {
    id:       Option<String>,
    name:     Option<String>,
    address:  Option<String>,
    lat:      Option<f64>,
    lon:      Option<f64>,
    category: Option<String>,
}

impl From<CsvRecord> for RawFacility {
    fn from(r: CsvRecord) -> Self {
        Self {
            id:       r.id,
            name:     r.name,
            address:  r.address,
            lat:      r.lat,
            lon:      r.lon,
            category: r.category,
        }
    }
}

impl From<JsonRecord> for RawFacility {
    fn from(r: JsonRecord) -> Self {
        Self {
            id:       r.uuid,
            name:     r.nama,
            address:  r.alamat,
            lat:      r.lat.as_ref().and_then(json_number),
            lon:      r.lng.as_ref().and_then(json_number),
            category: r.bentuk_pendidikan,
        }
    }
}

impl RawFacility {
    fn into_facility(self, record: usize) -> CatalogResult<Facility> {
        let reject = |reason: &str| CatalogError::Record { record, reason: reason.to_owned() };

        let id = self
            .id
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| reject("missing id"))?;
        let (lat, lon) = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(reject("missing coordinates")),
        };
        let position = GeoPoint::new(lat, lon);
        if !position.is_valid() {
            return Err(reject("coordinates out of range"));
        }

        Ok(Facility::new(
            id,
            self.name.unwrap_or_default(),
            self.address.unwrap_or_default(),
            position,
            self.category.as_deref().map_or(Category::Other, Category::from_code),
        ))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a catalog from a CSV file.
pub fn load_catalog_csv(path: &Path) -> CatalogResult<Catalog> {
    let file = std::fs::File::open(path)?;
    load_catalog_reader(file)
}

/// Like [`load_catalog_csv`] but accepts any `Read` source.
pub fn load_catalog_reader<R: Read>(reader: R) -> CatalogResult<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut facilities = Vec::new();
    let mut skipped = 0usize;
    for (i, row) in csv_reader.deserialize::<CsvRecord>().enumerate() {
        let parsed = row
            .map_err(|e| CatalogError::Record { record: i, reason: e.to_string() })
            .and_then(|r| RawFacility::from(r).into_facility(i));
        match parsed {
            Ok(f) => facilities.push(f),
            Err(e) => {
                warn!(error = %e, "skipping malformed facility record");
                skipped += 1;
            }
        }
    }

    let catalog = Catalog::from_facilities(facilities);
    info!(loaded = catalog.len(), skipped, "loaded facility catalog from CSV");
    Ok(catalog)
}

/// Load a catalog from the JSON array served by the facility API.
///
/// Fails only when the document is not a JSON array; individual bad
/// elements are skipped.
pub fn load_catalog_json<R: Read>(reader: R) -> CatalogResult<Catalog> {
    let items: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let mut facilities = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (i, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<JsonRecord>(item)
            .map_err(|e| CatalogError::Record { record: i, reason: e.to_string() })
            .and_then(|r| RawFacility::from(r).into_facility(i));
        match parsed {
            Ok(f) => facilities.push(f),
            Err(e) => {
                warn!(error = %e, "skipping malformed facility record");
                skipped += 1;
            }
        }
    }

    let catalog = Catalog::from_facilities(facilities);
    info!(loaded = catalog.len(), skipped, "loaded facility catalog from JSON");
    Ok(catalog)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn json_number(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
