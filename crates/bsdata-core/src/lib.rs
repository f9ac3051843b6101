//! bsdata-core: Core library for extracting and reconciling BSData catalogs
//!
//! This library provides functionality to:
//! - Locate catalog files in a BSData repo checkout
//! - Parse catalog XML into normalized, typed datasets
//! - Resolve per-model-count point costs from costs and modifiers
//! - Compare a fresh extraction against stored application data
//! - Sync point values onto the stored data, preserving everything else
//! - Render Markdown reference documents

pub mod catalog;
pub mod error;
pub mod extract;
pub mod fields;
pub mod model;
pub mod points;
pub mod reconcile;
pub mod report;
pub mod scanner;
pub mod text;

mod xml;

pub use catalog::{parse_catalog, parse_catalog_str};
pub use error::{Error, Result};
pub use model::{
    Ability, Dataset, Detachment, Enhancement, PointsTable, StatValue, Unit, UnitStats, Weapon,
    WeaponKind, WeaponStats,
};
pub use points::resolve_points;
pub use reconcile::{
    diff, sync_points, DiffReport, MissingPoints, MissingRecord, PointsMismatch, RecordKind,
    StoredDetachment, StoredEnhancement, StoredFile, StoredUnit,
};
pub use report::render_markdown;
pub use scanner::{faction_slug, find_catalog, list_catalogs};
