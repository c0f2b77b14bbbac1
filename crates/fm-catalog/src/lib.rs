//! `fm-catalog`: the read-only facility catalog.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`catalog`] | `Catalog`: ordered facilities + id index, search, counts    |
//! | [`loader`]  | `load_catalog_csv`, `load_catalog_reader`, `load_catalog_json` |
//! | [`error`]   | `CatalogError`, `CatalogResult<T>`                          |
//!
//! Malformed records never abort a load: they are logged at `warn` level
//! and excluded, and the remaining records are kept in source order.

pub mod catalog;
pub mod error;
pub mod loader;


pub use catalog::{Catalog, CategoryCounts};
pub use error::{CatalogError, CatalogResult};
pub use loader::{load_catalog_csv, load_catalog_json, load_catalog_reader};
