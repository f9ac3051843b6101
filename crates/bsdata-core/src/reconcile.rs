//! Reconciliation between a fresh extraction and stored application data
//!
//! The stored side is a JSON file owned by the consuming application: a
//! flat `units` list plus a `detachments` object keyed by arbitrary ids,
//! each value carrying its own `enhancements` list. Only the names and
//! point values are understood here; every other field rides along
//! untouched so a sync rewrite changes nothing else.

use crate::error::{Error, Result};
use crate::model::{Dataset, PointsTable, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// A unit in the stored file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUnit {
    pub name: String,
    pub points: PointsTable,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// An enhancement nested in a stored detachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEnhancement {
    pub name: String,
    pub points: i64,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A detachment in the stored file; only its enhancement list is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDetachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancements: Option<Vec<StoredEnhancement>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The stored data file as a whole
///
/// `units` and `detachments` are both optional; a file without them
/// compares as empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<StoredUnit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detachments: Option<IndexMap<String, StoredDetachment>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl StoredFile {
    /// Load stored data from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save stored data back as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// A point-value disagreement for one named record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsMismatch {
    pub name: String,
    pub stored: i64,
    pub fresh: i64,
}

/// Which kind of record a missing entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Unit,
    Enhancement,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Unit => write!(f, "unit"),
            RecordKind::Enhancement => write!(f, "enhancement"),
        }
    }
}

/// Fresh points carried on a record the stored side lacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissingPoints {
    /// Per-model-count table, for units
    PerCount(PointsTable),
    /// Flat cost, for enhancements
    Flat(i64),
}

/// A record present on only one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingRecord {
    pub name: String,
    pub kind: RecordKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<MissingPoints>,
}

/// Outcome of comparing a fresh extraction against stored data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub unit_mismatches: Vec<PointsMismatch>,
    pub enhancement_mismatches: Vec<PointsMismatch>,
    /// Records the fresh catalog has but the stored file lacks, units first
    pub missing_in_stored: Vec<MissingRecord>,
    /// Stored units the fresh catalog no longer has (enhancements are not
    /// tracked in this direction)
    pub missing_in_fresh: Vec<MissingRecord>,
    pub matching_units: usize,
    pub matching_enhancements: usize,
}

/// Compare a fresh extraction against the stored dataset by name
///
/// Units compare at the stored side's base model count (its numerically
/// smallest count key) against the fresh value at that count, falling back
/// to the fresh minimum when the count is absent. Enhancements compare
/// flat costs, flattened across the stored detachments.
pub fn diff(fresh: &Dataset, stored: &StoredFile) -> Result<DiffReport> {
    let fresh_units: HashMap<&str, &Unit> =
        fresh.units.iter().map(|u| (u.name.as_str(), u)).collect();
    let fresh_enhancements: HashMap<&str, i64> = fresh
        .enhancements
        .iter()
        .map(|e| (e.name.as_str(), e.points))
        .collect();

    // Name-keyed views of the stored side, in file order. Later duplicates
    // overwrite earlier values without moving position, so each name is
    // compared once.
    let mut stored_units: IndexMap<&str, &StoredUnit> = IndexMap::new();
    for unit in stored.units.iter().flatten() {
        stored_units.insert(unit.name.as_str(), unit);
    }
    let mut stored_enhancements: IndexMap<&str, i64> = IndexMap::new();
    for (_, det) in stored.detachments.iter().flatten() {
        for enh in det.enhancements.iter().flatten() {
            stored_enhancements.insert(enh.name.as_str(), enh.points);
        }
    }

    let mut report = DiffReport::default();

    for (name, stored_unit) in &stored_units {
        match fresh_units.get(name) {
            Some(fresh_unit) => {
                let (base_count, stored_points) = stored_base(stored_unit)?;
                let fresh_points = match fresh_unit.points.get(&base_count) {
                    Some(points) => points,
                    None => fresh_unit.points.min_points().unwrap_or(0),
                };
                if stored_points != fresh_points {
                    report.unit_mismatches.push(PointsMismatch {
                        name: stored_unit.name.clone(),
                        stored: stored_points,
                        fresh: fresh_points,
                    });
                } else {
                    report.matching_units += 1;
                }
            }
            None => report.missing_in_fresh.push(MissingRecord {
                name: stored_unit.name.clone(),
                kind: RecordKind::Unit,
                points: None,
            }),
        }
    }

    for unit in &fresh.units {
        if !stored_units.contains_key(unit.name.as_str()) {
            report.missing_in_stored.push(MissingRecord {
                name: unit.name.clone(),
                kind: RecordKind::Unit,
                points: Some(MissingPoints::PerCount(unit.points.clone())),
            });
        }
    }

    for (name, &stored_points) in &stored_enhancements {
        if let Some(&fresh_points) = fresh_enhancements.get(name) {
            if stored_points != fresh_points {
                report.enhancement_mismatches.push(PointsMismatch {
                    name: (*name).to_string(),
                    stored: stored_points,
                    fresh: fresh_points,
                });
            } else {
                report.matching_enhancements += 1;
            }
        }
    }

    for enhancement in &fresh.enhancements {
        if !stored_enhancements.contains_key(enhancement.name.as_str()) {
            report.missing_in_stored.push(MissingRecord {
                name: enhancement.name.clone(),
                kind: RecordKind::Enhancement,
                points: Some(MissingPoints::Flat(enhancement.points)),
            });
        }
    }

    Ok(report)
}

/// The stored unit's base entry: its numerically smallest model count key
/// and the points at that count
fn stored_base(unit: &StoredUnit) -> Result<(String, i64)> {
    let mut base: Option<(i64, &str, i64)> = None;
    for (count, points) in unit.points.iter() {
        let parsed: i64 = count.parse().map_err(|_| {
            Error::StoredData(format!(
                "unit '{}' has a non-numeric model count '{}'",
                unit.name, count
            ))
        })?;
        if base.is_none_or(|(smallest, _, _)| parsed < smallest) {
            base = Some((parsed, count, points));
        }
    }
    match base {
        Some((_, count, points)) => Ok((count.to_string(), points)),
        None => Err(Error::StoredData(format!(
            "unit '{}' has an empty points table",
            unit.name
        ))),
    }
}

/// Apply fresh point values onto the stored dataset in place
///
/// Every count in a fresh unit's table is written through, adding counts
/// the stored unit lacks; enhancement costs are patched inside their
/// detachments. Returns the ordered change log. Writing the file back, and
/// asking anyone whether that is a good idea, stays with the caller.
pub fn sync_points(fresh: &Dataset, stored: &mut StoredFile) -> Vec<String> {
    let fresh_units: HashMap<&str, &Unit> =
        fresh.units.iter().map(|u| (u.name.as_str(), u)).collect();
    let fresh_enhancements: HashMap<&str, i64> = fresh
        .enhancements
        .iter()
        .map(|e| (e.name.as_str(), e.points))
        .collect();

    let mut changes = Vec::new();

    for unit in stored.units.iter_mut().flatten() {
        let fresh_unit = match fresh_units.get(unit.name.as_str()) {
            Some(fresh_unit) => fresh_unit,
            None => continue,
        };
        for (count, points) in fresh_unit.points.iter() {
            let old = unit.points.get(count);
            if old == Some(points) {
                continue;
            }
            let old_label = match old {
                Some(value) => value.to_string(),
                None => "none".to_string(),
            };
            changes.push(format!(
                "Unit '{}' ({} models): {} -> {}",
                unit.name, count, old_label, points
            ));
            unit.points.insert(count, points);
        }
    }

    for (_, det) in stored.detachments.iter_mut().flatten() {
        for enh in det.enhancements.iter_mut().flatten() {
            let fresh_points = match fresh_enhancements.get(enh.name.as_str()) {
                Some(&points) => points,
                None => continue,
            };
            if enh.points != fresh_points {
                changes.push(format!(
                    "Enhancement '{}': {} -> {}",
                    enh.name, enh.points, fresh_points
                ));
                enh.points = fresh_points;
            }
        }
    }

    changes
}
