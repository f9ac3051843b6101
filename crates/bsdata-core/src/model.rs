//! Typed records for normalized catalog data

use crate::error::{Error, Result};
use crate::fields::{UnitStat, WeaponStat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A stat value with type detection
///
/// Serializes untagged, so a value is a bare JSON number or string exactly
/// like the source characteristic it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Integer value
    Int(i64),
    /// Literal token that is not a plain number (e.g. "2+", "D6", "N/A")
    Text(String),
}

impl StatValue {
    /// Parse a characteristic value, handling things like `6"` -> 6, `2+` -> `2+`
    ///
    /// Empty input yields `Int(0)`, the sentinel for an absent stat; callers
    /// must not read it as a real zero.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return StatValue::Int(0);
        }

        // Movement values carry inch marks
        let cleaned = s.replace(['"', '\''], "");
        let trimmed = cleaned.trim();

        match trimmed.parse::<i64>() {
            Ok(n) => StatValue::Int(n),
            Err(_) => StatValue::Text(trimmed.to_string()),
        }
    }
}

/// A unit's stat block
///
/// Absent stats are omitted from JSON; wire keys are the short codes the
/// consuming application expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub movement: Option<StatValue>,
    #[serde(rename = "t", skip_serializing_if = "Option::is_none")]
    pub toughness: Option<StatValue>,
    #[serde(rename = "sv", skip_serializing_if = "Option::is_none")]
    pub save: Option<StatValue>,
    #[serde(rename = "w", skip_serializing_if = "Option::is_none")]
    pub wounds: Option<StatValue>,
    #[serde(rename = "ld", skip_serializing_if = "Option::is_none")]
    pub leadership: Option<StatValue>,
    #[serde(rename = "oc", skip_serializing_if = "Option::is_none")]
    pub objective_control: Option<StatValue>,
}

impl UnitStats {
    /// Write a stat; a later write to the same key overwrites
    pub fn set(&mut self, stat: UnitStat, value: StatValue) {
        match stat {
            UnitStat::Movement => self.movement = Some(value),
            UnitStat::Toughness => self.toughness = Some(value),
            UnitStat::Save => self.save = Some(value),
            UnitStat::Wounds => self.wounds = Some(value),
            UnitStat::Leadership => self.leadership = Some(value),
            UnitStat::ObjectiveControl => self.objective_control = Some(value),
        }
    }
}

/// A weapon's stat line
///
/// Ranged profiles fill `ballistic_skill`, melee profiles `weapon_skill`;
/// the other columns are shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<StatValue>,
    #[serde(rename = "a", skip_serializing_if = "Option::is_none")]
    pub attacks: Option<StatValue>,
    #[serde(rename = "bs", skip_serializing_if = "Option::is_none")]
    pub ballistic_skill: Option<StatValue>,
    #[serde(rename = "ws", skip_serializing_if = "Option::is_none")]
    pub weapon_skill: Option<StatValue>,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub strength: Option<StatValue>,
    #[serde(rename = "ap", skip_serializing_if = "Option::is_none")]
    pub armor_penetration: Option<StatValue>,
    #[serde(rename = "d", skip_serializing_if = "Option::is_none")]
    pub damage: Option<StatValue>,
}

impl WeaponStats {
    /// Write a stat; a later write to the same key overwrites
    pub fn set(&mut self, stat: WeaponStat, value: StatValue) {
        match stat {
            WeaponStat::Range => self.range = Some(value),
            WeaponStat::Attacks => self.attacks = Some(value),
            WeaponStat::BallisticSkill => self.ballistic_skill = Some(value),
            WeaponStat::WeaponSkill => self.weapon_skill = Some(value),
            WeaponStat::Strength => self.strength = Some(value),
            WeaponStat::ArmorPenetration => self.armor_penetration = Some(value),
            WeaponStat::Damage => self.damage = Some(value),
        }
    }

    /// True when no stat was recognized on the profile
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
            && self.attacks.is_none()
            && self.ballistic_skill.is_none()
            && self.weapon_skill.is_none()
            && self.strength.is_none()
            && self.armor_penetration.is_none()
            && self.damage.is_none()
    }
}

/// Whether a weapon profile is ranged or melee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Ranged,
    Melee,
}

/// A weapon extracted from a unit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    /// Always empty in extraction, kept for the output shape
    pub abilities: Vec<String>,
}

/// A unit or weapon ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Points cost by model count
///
/// Keys are model counts in string form ("3", "10"); values are points.
/// JSON key order follows the map (lexicographic); anything that needs size
/// order sorts by the numeric key value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(BTreeMap<String, i64>);

impl PointsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no cost was resolved
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of model-count entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Points at an exact model count
    pub fn get(&self, count: &str) -> Option<i64> {
        self.0.get(count).copied()
    }

    /// Write a cost; a later write to the same count overwrites
    pub fn insert(&mut self, count: impl Into<String>, points: i64) {
        self.0.insert(count.into(), points);
    }

    /// Iterate entries in map order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(count, points)| (count.as_str(), *points))
    }

    /// Entries sorted by numeric model count
    ///
    /// Counts that fail to parse sort last; extraction never produces them.
    pub fn by_count(&self) -> Vec<(&str, i64)> {
        let mut entries: Vec<(&str, i64)> = self.iter().collect();
        entries.sort_by_key(|(count, _)| count.parse::<i64>().unwrap_or(i64::MAX));
        entries
    }

    /// Smallest points value in the table
    pub fn min_points(&self) -> Option<i64> {
        self.0.values().copied().min()
    }
}

/// A unit extracted from a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub points: PointsTable,
    pub stats: UnitStats,
    /// Raw invulnerable-save token (e.g. "4+"), uncoerced
    pub invuln: Option<String>,
    pub weapons: Vec<Weapon>,
    pub abilities: Vec<Ability>,
    pub keywords: Vec<String>,
}

/// A detachment enhancement with its point cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub description: String,
}

/// A detachment with its rule and enhancements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detachment {
    pub id: String,
    pub name: String,
    pub rule_name: String,
    pub rule_description: String,
    pub enhancements: Vec<Enhancement>,
    /// Never populated by extraction, kept for the output shape
    pub stratagems: Vec<String>,
}

/// A complete normalized dataset extracted from one catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Source catalog path
    pub source: String,
    /// Units sorted by name, deduplicated by first-seen name
    pub units: Vec<Unit>,
    /// Enhancements sorted by name, deduplicated by first-seen name
    pub enhancements: Vec<Enhancement>,
    /// Detachments sorted by name
    pub detachments: Vec<Detachment>,
}

impl Dataset {
    /// Load a dataset from pretty JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the dataset as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_value_parse_strips_inch_marks() {
        assert_eq!(StatValue::parse("6\""), StatValue::Int(6));
        assert_eq!(StatValue::parse("14\""), StatValue::Int(14));
    }

    #[test]
    fn test_stat_value_parse_keeps_tokens() {
        assert_eq!(StatValue::parse("2+"), StatValue::Text("2+".to_string()));
        assert_eq!(StatValue::parse("D6"), StatValue::Text("D6".to_string()));
        assert_eq!(StatValue::parse("N/A"), StatValue::Text("N/A".to_string()));
    }

    #[test]
    fn test_stat_value_parse_plain_integers() {
        assert_eq!(StatValue::parse("10"), StatValue::Int(10));
        assert_eq!(StatValue::parse(" 5 "), StatValue::Int(5));
    }

    #[test]
    fn test_stat_value_parse_empty_is_zero_sentinel() {
        assert_eq!(StatValue::parse(""), StatValue::Int(0));
    }

    #[test]
    fn test_stat_value_serde_untagged() {
        assert_eq!(
            serde_json::to_string(&StatValue::Int(6)).unwrap(),
            "6"
        );
        assert_eq!(
            serde_json::to_string(&StatValue::Text("2+".to_string())).unwrap(),
            "\"2+\""
        );

        let n: StatValue = serde_json::from_str("6").unwrap();
        assert_eq!(n, StatValue::Int(6));
        let t: StatValue = serde_json::from_str("\"2+\"").unwrap();
        assert_eq!(t, StatValue::Text("2+".to_string()));
    }

    #[test]
    fn test_unit_stats_omit_absent_keys() {
        let mut stats = UnitStats::default();
        stats.set(crate::fields::UnitStat::Movement, StatValue::Int(6));
        stats.set(crate::fields::UnitStat::Save, StatValue::Text("2+".to_string()));

        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"m":6,"sv":"2+"}"#);
    }

    #[test]
    fn test_weapon_stats_empty_detection() {
        let mut stats = WeaponStats::default();
        assert!(stats.is_empty());
        stats.set(crate::fields::WeaponStat::Damage, StatValue::Int(2));
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_points_table_numeric_order() {
        let mut points = PointsTable::new();
        points.insert("10", 190);
        points.insert("5", 100);

        // Map order is lexicographic, size order is numeric.
        let map_order: Vec<&str> = points.iter().map(|(c, _)| c).collect();
        assert_eq!(map_order, vec!["10", "5"]);

        let size_order: Vec<(&str, i64)> = points.by_count();
        assert_eq!(size_order, vec![("5", 100), ("10", 190)]);

        assert_eq!(points.min_points(), Some(100));
        assert_eq!(points.get("5"), Some(100));
        assert_eq!(points.get("6"), None);
    }

    #[test]
    fn test_dataset_round_trip() {
        let dataset = Dataset {
            source: "custodes.cat".to_string(),
            units: vec![Unit {
                id: "u1".to_string(),
                name: "Custodian Guard".to_string(),
                points: {
                    let mut p = PointsTable::new();
                    p.insert("4", 170);
                    p
                },
                stats: {
                    let mut s = UnitStats::default();
                    s.set(crate::fields::UnitStat::Toughness, StatValue::Int(6));
                    s
                },
                invuln: Some("4+".to_string()),
                weapons: vec![Weapon {
                    id: "w1".to_string(),
                    name: "Guardian spear".to_string(),
                    kind: WeaponKind::Melee,
                    stats: {
                        let mut s = WeaponStats::default();
                        s.set(crate::fields::WeaponStat::Damage, StatValue::Int(2));
                        s
                    },
                    abilities: Vec::new(),
                }],
                abilities: vec![Ability {
                    id: "a1".to_string(),
                    name: "Stand Vigil".to_string(),
                    description: "Re-roll wound rolls of 1.".to_string(),
                }],
                keywords: vec!["Adeptus Custodes".to_string(), "Infantry".to_string()],
            }],
            enhancements: vec![Enhancement {
                id: "e1".to_string(),
                name: "Veiled Blade".to_string(),
                points: 25,
                description: "Once per battle...".to_string(),
            }],
            detachments: vec![Detachment {
                id: "d1".to_string(),
                name: "Shield Host".to_string(),
                rule_name: "Martial Mastery".to_string(),
                rule_description: "Each time...".to_string(),
                enhancements: Vec::new(),
                stratagems: Vec::new(),
            }],
        };

        let json = serde_json::to_string_pretty(&dataset).unwrap();
        let loaded: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_weapon_kind_wire_format() {
        let json = serde_json::to_string(&WeaponKind::Ranged).unwrap();
        assert_eq!(json, "\"ranged\"");
        let kind: WeaponKind = serde_json::from_str("\"melee\"").unwrap();
        assert_eq!(kind, WeaponKind::Melee);
    }
}
