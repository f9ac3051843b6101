//! Points cost resolution for selection entries
//!
//! BSData expresses "100 points at 5 models, 190 at 10" as a base cost plus
//! conditional set-modifiers rather than a lookup table. This module
//! rebuilds the table from both representations.

use crate::fields::POINTS_TYPE_ID;
use crate::model::PointsTable;
use crate::xml::{attr, children, descendants};
use roxmltree::Node;

/// Resolve the per-model-count points table for a selection entry
///
/// The base cost comes from the entry's direct `costs/cost` children that
/// match the points cost type (by type id, or by the literal name "pts"),
/// keyed by the entry's minimum-selections constraint. Scaled costs come
/// from `set` modifiers on the points field, keyed by the value of their
/// selections condition. Non-positive costs are dropped.
pub fn resolve_points(entry: Node) -> PointsTable {
    let mut points = PointsTable::new();

    for costs in children(entry, "costs") {
        for cost in children(costs, "cost") {
            if attr(cost, "typeId") != POINTS_TYPE_ID && attr(cost, "name") != "pts" {
                continue;
            }
            let base = parse_points(attr(cost, "value"));
            if base > 0 {
                points.insert(min_selections(entry).to_string(), base);
            }
        }
    }

    for modifier in descendants(entry, "modifier") {
        if attr(modifier, "type") != "set" || attr(modifier, "field") != POINTS_TYPE_ID {
            continue;
        }
        let pts = parse_points(attr(modifier, "value"));
        let count = descendants(modifier, "condition")
            .find(|c| attr(*c, "field").contains("selections"))
            .map(|c| attr(c, "value"))
            .unwrap_or("");
        if !count.is_empty() && pts > 0 {
            points.insert(count, pts);
        }
    }

    points
}

/// Model count the base cost applies to
///
/// Taken from the first `min` constraint on `selections`. Entries without
/// one are keyed at 1; that is right for single-model entries but is only
/// an approximation for units whose true minimum is never written down.
fn min_selections(entry: Node) -> i64 {
    descendants(entry, "constraint")
        .find(|c| attr(*c, "type") == "min" && attr(*c, "field") == "selections")
        .and_then(|c| attr(c, "value").parse::<i64>().ok())
        .unwrap_or(1)
}

/// Parse a cost value, truncating fractional points ("110.0" -> 110)
///
/// Unparseable values read as 0 and fall to the positive-cost guards.
pub(crate) fn parse_points(value: &str) -> i64 {
    value.parse::<f64>().map(|v| v as i64).unwrap_or(0)
}
