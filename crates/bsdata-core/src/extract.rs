//! Record extraction from catalog entry sub-trees
//!
//! Each function takes one selection entry (or profile) node and produces a
//! typed record, or nothing when the node fails its gate. Walking the
//! document and deciding which extractor applies is catalog's job.

use crate::fields;
use crate::model::{
    Ability, Detachment, Enhancement, StatValue, Unit, UnitStats, Weapon, WeaponKind, WeaponStats,
};
use crate::points::{parse_points, resolve_points};
use crate::text;
use crate::xml::{attr, children, descendants};
use roxmltree::Node;

/// Extract a unit from a unit or model selection entry
///
/// Requires a name and a non-empty resolved points table; everything else
/// is optional. Stat blocks come from "Unit" profiles (a later profile
/// replaces an earlier one wholesale), weapons and abilities accumulate
/// across their profiles.
pub fn extract_unit(entry: Node) -> Option<Unit> {
    let name = attr(entry, "name");
    if name.is_empty() {
        return None;
    }

    let points = resolve_points(entry);
    if points.is_empty() {
        return None;
    }

    let mut stats = UnitStats::default();
    let mut invuln = None;
    let mut weapons = Vec::new();
    let mut abilities = Vec::new();

    for profile in descendants(entry, "profile") {
        match attr(profile, "typeName") {
            "Unit" => stats = unit_stats(profile),
            "Ranged Weapons" => {
                if let Some(weapon) = extract_weapon(profile, WeaponKind::Ranged) {
                    weapons.push(weapon);
                }
            }
            "Melee Weapons" => {
                if let Some(weapon) = extract_weapon(profile, WeaponKind::Melee) {
                    weapons.push(weapon);
                }
            }
            "Abilities" => {
                if let Some(ability) = extract_ability(profile) {
                    abilities.push(ability);
                }
            }
            "Invulnerable Save" => {
                for ch in descendants(profile, "characteristic") {
                    if attr(ch, "name") == "Invulnerable Save" {
                        invuln = ch.text().map(str::to_string);
                    }
                }
            }
            _ => {}
        }
    }

    Some(Unit {
        id: attr(entry, "id").to_string(),
        name: name.to_string(),
        points,
        stats,
        invuln,
        weapons,
        abilities,
        keywords: extract_keywords(entry),
    })
}

/// Extract a weapon from a weapon profile
///
/// Profiles without a name, or whose characteristics match none of the
/// weapon stat fields, produce no record.
pub fn extract_weapon(profile: Node, kind: WeaponKind) -> Option<Weapon> {
    let name = attr(profile, "name");
    if name.is_empty() {
        return None;
    }

    let lookup = match kind {
        WeaponKind::Ranged => fields::ranged_weapon_stat,
        WeaponKind::Melee => fields::melee_weapon_stat,
    };

    let mut stats = WeaponStats::default();
    for ch in descendants(profile, "characteristic") {
        if let Some(stat) = lookup(attr(ch, "typeId")) {
            stats.set(stat, StatValue::parse(ch.text().unwrap_or("")));
        }
    }

    if stats.is_empty() {
        return None;
    }

    Some(Weapon {
        id: attr(profile, "id").to_string(),
        name: name.to_string(),
        kind,
        stats,
        abilities: Vec::new(),
    })
}

/// Extract an ability from an "Abilities" profile
///
/// Requires a name; the description comes from the first characteristic
/// named "Description", normalized.
pub fn extract_ability(profile: Node) -> Option<Ability> {
    let name = attr(profile, "name");
    if name.is_empty() {
        return None;
    }

    let description = descendants(profile, "characteristic")
        .find(|ch| attr(*ch, "name") == "Description")
        .map(|ch| text::clean(ch.text().unwrap_or("")))
        .unwrap_or_default();

    Some(Ability {
        id: attr(profile, "id").to_string(),
        name: name.to_string(),
        description,
    })
}

/// Extract an enhancement from an upgrade selection entry
///
/// Requires a name and a strictly positive points cost. The cost is taken
/// from the first descendant cost matching the points type; the description
/// from the "Abilities" profiles (a later profile's description wins).
pub fn extract_enhancement(entry: Node) -> Option<Enhancement> {
    let name = attr(entry, "name");
    if name.is_empty() {
        return None;
    }

    let points = descendants(entry, "cost")
        .find(|c| {
            attr(*c, "typeId") == fields::POINTS_TYPE_ID || attr(*c, "name") == "pts"
        })
        .map(|c| parse_points(attr(c, "value")))
        .unwrap_or(0);
    if points <= 0 {
        return None;
    }

    let mut description = String::new();
    for profile in descendants(entry, "profile") {
        if attr(profile, "typeName") != "Abilities" {
            continue;
        }
        if let Some(ch) = descendants(profile, "characteristic")
            .find(|ch| attr(*ch, "name") == "Description")
        {
            description = text::clean(ch.text().unwrap_or(""));
        }
    }

    Some(Enhancement {
        id: attr(entry, "id").to_string(),
        name: name.to_string(),
        points,
        description,
    })
}

/// Extract a detachment from an upgrade selection entry
///
/// The rule comes from the first descendant rule element (absent rule
/// leaves both rule fields empty; the caller decides whether that makes
/// the record worth keeping). Enhancements are gathered from every nested
/// upgrade entry that passes the enhancement gates.
pub fn extract_detachment(entry: Node) -> Option<Detachment> {
    let name = attr(entry, "name");
    if name.is_empty() {
        return None;
    }

    let (rule_name, rule_description) = match descendants(entry, "rule").next() {
        Some(rule) => {
            let description = children(rule, "description")
                .next()
                .and_then(|d| d.text())
                .map(text::clean)
                .unwrap_or_default();
            (attr(rule, "name").to_string(), description)
        }
        None => (String::new(), String::new()),
    };

    let enhancements = descendants(entry, "selectionEntry")
        .filter(|e| attr(*e, "type") == "upgrade")
        .filter_map(extract_enhancement)
        .collect();

    Some(Detachment {
        id: attr(entry, "id").to_string(),
        name: name.to_string(),
        rule_name,
        rule_description,
        enhancements,
        stratagems: Vec::new(),
    })
}

/// Collect keyword tags from an entry's category links
///
/// The "Configuration" housekeeping category and a bare "Faction:" label
/// are dropped; a "Faction:" prefix is stripped from kept tags.
pub fn extract_keywords(entry: Node) -> Vec<String> {
    let mut keywords = Vec::new();
    for link in descendants(entry, "categoryLink") {
        let name = attr(link, "name");
        if name.is_empty() || name == "Configuration" || name == "Faction:" {
            continue;
        }
        keywords.push(strip_faction_prefix(name).to_string());
    }
    keywords
}

fn strip_faction_prefix(name: &str) -> &str {
    match name.strip_prefix("Faction:") {
        Some(rest) => rest.trim_start(),
        None => name,
    }
}

/// Extract a unit's stat block from a "Unit" profile
fn unit_stats(profile: Node) -> UnitStats {
    let mut stats = UnitStats::default();
    for ch in descendants(profile, "characteristic") {
        if let Some(stat) = fields::unit_stat(attr(ch, "typeId")) {
            stats.set(stat, StatValue::parse(ch.text().unwrap_or("")));
        }
    }
    stats
}
