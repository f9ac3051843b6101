//! Catalog document parsing
//!
//! Walks every selection entry in a catalog file, classifies it by its
//! `type` attribute and hands it to the matching extractor, then sorts and
//! deduplicates the results into a Dataset.

use crate::error::{Error, Result};
use crate::extract::{extract_detachment, extract_enhancement, extract_unit};
use crate::model::Dataset;
use crate::points::parse_points;
use crate::xml::{attr, children, descendants, is_element};
use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a catalog file into a normalized dataset
pub fn parse_catalog<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog_str(&content, &path.display().to_string())
}

/// Parse catalog XML from a string (useful for testing)
pub fn parse_catalog_str(content: &str, source_name: &str) -> Result<Dataset> {
    let doc = Document::parse(content).map_err(|e| Error::Xml {
        path: PathBuf::from(source_name),
        source: e,
    })?;

    let mut units = Vec::new();
    let mut enhancements = Vec::new();
    let mut detachments = Vec::new();

    // Shared entries can appear more than once under the same id; the first
    // successful extraction claims it.
    let mut processed: HashSet<String> = HashSet::new();

    for entry in doc
        .descendants()
        .filter(|n| is_element(*n, "selectionEntry"))
    {
        let entry_id = attr(entry, "id");
        if processed.contains(entry_id) {
            continue;
        }

        match attr(entry, "type") {
            "unit" => {
                if let Some(unit) = extract_unit(entry) {
                    units.push(unit);
                    processed.insert(entry_id.to_string());
                }
            }
            "model" => {
                // Wargear sub-models share the type but carry no cost of
                // their own; only costed models (characters) are units.
                if model_has_points(entry) {
                    if let Some(unit) = extract_unit(entry) {
                        units.push(unit);
                        processed.insert(entry_id.to_string());
                    }
                }
            }
            "upgrade" => {
                if attr(entry, "name") == "Detachments" {
                    for candidate in descendants(entry, "selectionEntry") {
                        if attr(candidate, "type") != "upgrade" {
                            continue;
                        }
                        if let Some(det) = extract_detachment(candidate) {
                            // Entries without a rule are option groups, not
                            // detachments.
                            if !det.rule_name.is_empty() {
                                detachments.push(det);
                            }
                        }
                    }
                } else if let Some(enhancement) = extract_enhancement(entry) {
                    enhancements.push(enhancement);
                    processed.insert(entry_id.to_string());
                }
            }
            _ => {}
        }
    }

    units.sort_by(|a, b| a.name.cmp(&b.name));
    enhancements.sort_by(|a, b| a.name.cmp(&b.name));
    detachments.sort_by(|a, b| a.name.cmp(&b.name));

    // The sort is stable, so first-seen keeps the record earliest in
    // document order among same-named ones.
    dedup_by_name(&mut units, |u| u.name.as_str());
    dedup_by_name(&mut enhancements, |e| e.name.as_str());

    Ok(Dataset {
        source: source_name.to_string(),
        units,
        enhancements,
        detachments,
    })
}

/// Check if a model entry carries its own positive points cost
///
/// Decided by the first direct cost named "pts".
fn model_has_points(entry: Node) -> bool {
    children(entry, "costs")
        .flat_map(|costs| children(costs, "cost"))
        .find(|cost| attr(*cost, "name") == "pts")
        .map(|cost| parse_points(attr(cost, "value")) > 0)
        .unwrap_or(false)
}

/// Drop later records sharing a name with an earlier one
fn dedup_by_name<T>(records: &mut Vec<T>, name: impl Fn(&T) -> &str) {
    let mut seen: HashSet<String> = HashSet::new();
    records.retain(|record| seen.insert(name(record).to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_catalog() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<catalogue xmlns="http://www.battlescribe.net/schema/catalogueSchema" name="Test" revision="1">
    <sharedSelectionEntries>
        <selectionEntry id="u1" name="Custodian Guard" type="unit">
            <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="170"/></costs>
            <constraints><constraint type="min" field="selections" value="4"/></constraints>
        </selectionEntry>
        <selectionEntry id="e1" name="Veiled Blade" type="upgrade">
            <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="25"/></costs>
        </selectionEntry>
    </sharedSelectionEntries>
</catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(data.source, "test.cat");
        assert_eq!(data.units.len(), 1);
        assert_eq!(data.units[0].name, "Custodian Guard");
        assert_eq!(data.units[0].points.get("4"), Some(170));
        assert_eq!(data.enhancements.len(), 1);
        assert_eq!(data.enhancements[0].points, 25);
    }

    #[test]
    fn test_model_without_points_skipped() {
        let xml = r#"<catalogue>
            <selectionEntry id="m1" name="Shield-Captain" type="model">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="130"/></costs>
            </selectionEntry>
            <selectionEntry id="m2" name="Misericordia" type="model">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="0"/></costs>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(data.units.len(), 1);
        assert_eq!(data.units[0].name, "Shield-Captain");
    }

    #[test]
    fn test_duplicate_ids_claimed_once() {
        let xml = r#"<catalogue>
            <selectionEntry id="u1" name="First" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="100"/></costs>
            </selectionEntry>
            <selectionEntry id="u1" name="Second" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="200"/></costs>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(data.units.len(), 1);
        assert_eq!(data.units[0].name, "First");
    }

    #[test]
    fn test_duplicate_names_first_in_document_wins() {
        let xml = r#"<catalogue>
            <selectionEntry id="u1" name="Custodian Guard" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="170"/></costs>
            </selectionEntry>
            <selectionEntry id="u2" name="Custodian Guard" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="180"/></costs>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(data.units.len(), 1);
        assert_eq!(data.units[0].id, "u1");
        assert_eq!(data.units[0].points.get("1"), Some(170));
    }

    #[test]
    fn test_units_sorted_by_name() {
        let xml = r#"<catalogue>
            <selectionEntry id="u1" name="Venerable Guard" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="200"/></costs>
            </selectionEntry>
            <selectionEntry id="u2" name="Allarus Custodians" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="130"/></costs>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        let names: Vec<&str> = data.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Allarus Custodians", "Venerable Guard"]);
    }

    #[test]
    fn test_detachments_container() {
        let xml = r#"<catalogue>
            <selectionEntry id="dc" name="Detachments" type="upgrade">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="0"/></costs>
                <selectionEntries>
                    <selectionEntry id="d1" name="Shield Host" type="upgrade">
                        <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="0"/></costs>
                        <rules>
                            <rule id="r1" name="Martial Mastery">
                                <description>Re-roll 1s to wound.</description>
                            </rule>
                        </rules>
                        <selectionEntries>
                            <selectionEntry id="e1" name="Veiled Blade" type="upgrade">
                                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="25"/></costs>
                            </selectionEntry>
                        </selectionEntries>
                    </selectionEntry>
                </selectionEntries>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(data.detachments.len(), 1);
        let det = &data.detachments[0];
        assert_eq!(det.name, "Shield Host");
        assert_eq!(det.rule_name, "Martial Mastery");
        assert_eq!(det.enhancements.len(), 1);

        // The walk also reaches the nested enhancement entry on its own.
        assert_eq!(data.enhancements.len(), 1);
        assert_eq!(data.enhancements[0].name, "Veiled Blade");
    }

    #[test]
    fn test_detachment_candidates_without_rule_dropped() {
        let xml = r#"<catalogue>
            <selectionEntry id="dc" name="Detachments" type="upgrade">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="0"/></costs>
                <selectionEntries>
                    <selectionEntry id="x1" name="Some Option" type="upgrade">
                        <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="0"/></costs>
                    </selectionEntry>
                </selectionEntries>
            </selectionEntry>
        </catalogue>"#;

        let data = parse_catalog_str(xml, "test.cat").unwrap();
        assert!(data.detachments.is_empty());
    }

    #[test]
    fn test_empty_catalogue() {
        let data = parse_catalog_str("<catalogue/>", "empty.cat").unwrap();
        assert!(data.units.is_empty());
        assert!(data.enhancements.is_empty());
        assert!(data.detachments.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = parse_catalog_str("<catalogue><selectionEntry", "bad.cat");
        assert!(matches!(result, Err(Error::Xml { .. })));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let xml = r#"<catalogue>
            <selectionEntry id="u1" name="Guard" type="unit">
                <costs><cost name="pts" typeId="51b2-306e-1021-d207" value="170"/></costs>
            </selectionEntry>
        </catalogue>"#;

        let a = parse_catalog_str(xml, "test.cat").unwrap();
        let b = parse_catalog_str(xml, "test.cat").unwrap();
        assert_eq!(a, b);
    }
}
