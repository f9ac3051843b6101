//! Markdown reference rendering
//!
//! Produces the human-readable companion to the JSON dataset: a unit and
//! enhancement price list, detachment summaries, and (when a diff report is
//! supplied) a comparison section up top.

use crate::model::Dataset;
use crate::reconcile::{DiffReport, MissingPoints, PointsMismatch};

/// Render a dataset as a Markdown reference document
///
/// With a comparison report, a summary section leads the document; the
/// "missing in fresh" direction is deliberately left out of it.
pub fn render_markdown(data: &Dataset, comparison: Option<&DiffReport>) -> String {
    let mut lines: Vec<String> = vec!["# BSData Reference".to_string(), String::new()];

    if let Some(report) = comparison {
        lines.push("## Comparison Summary".to_string());
        lines.push(format!("- ✅ Matching units: {}", report.matching_units));
        lines.push(format!(
            "- ✅ Matching enhancements: {}",
            report.matching_enhancements
        ));

        if !report.unit_mismatches.is_empty() {
            lines.push(String::new());
            lines.push("### ❌ Unit Point Differences".to_string());
            push_mismatches(&mut lines, &report.unit_mismatches);
        }

        if !report.enhancement_mismatches.is_empty() {
            lines.push(String::new());
            lines.push("### ❌ Enhancement Point Differences".to_string());
            push_mismatches(&mut lines, &report.enhancement_mismatches);
        }

        if !report.missing_in_stored.is_empty() {
            lines.push(String::new());
            lines.push("### ⚠️ Missing in stored data (available in BSData)".to_string());
            for record in &report.missing_in_stored {
                let points = match &record.points {
                    Some(p) => render_points(p),
                    None => String::new(),
                };
                lines.push(format!("- {} ({}): {} pts", record.name, record.kind, points));
            }
        }

        lines.push(String::new());
    }

    lines.push("## Units".to_string());
    for unit in &data.units {
        let costs: Vec<String> = unit
            .points
            .by_count()
            .iter()
            .map(|(count, points)| format!("{}: {}", count, points))
            .collect();
        lines.push(format!("- **{}**: {} pts", unit.name, costs.join(", ")));
    }

    lines.push(String::new());
    lines.push("## Enhancements".to_string());
    for enhancement in &data.enhancements {
        lines.push(format!("- **{}**: {} pts", enhancement.name, enhancement.points));
    }

    if !data.detachments.is_empty() {
        lines.push(String::new());
        lines.push("## Detachments".to_string());
        for det in &data.detachments {
            lines.push(format!("### {}", det.name));
            if !det.rule_name.is_empty() {
                lines.push(format!(
                    "**{}**: {}...",
                    det.rule_name,
                    truncate(&det.rule_description, 200)
                ));
            }
            if !det.enhancements.is_empty() {
                lines.push(String::new());
                lines.push("Enhancements:".to_string());
                for enhancement in &det.enhancements {
                    lines.push(format!("- {}: {} pts", enhancement.name, enhancement.points));
                }
            }
        }
    }

    lines.join("\n")
}

fn push_mismatches(lines: &mut Vec<String>, mismatches: &[PointsMismatch]) {
    for mismatch in mismatches {
        lines.push(format!(
            "- {}: stored={}, BSData={}",
            mismatch.name, mismatch.stored, mismatch.fresh
        ));
    }
}

fn render_points(points: &MissingPoints) -> String {
    match points {
        MissingPoints::PerCount(table) => {
            let parts: Vec<String> = table
                .by_count()
                .iter()
                .map(|(count, points)| format!("{}: {}", count, points))
                .collect();
            parts.join(", ")
        }
        MissingPoints::Flat(value) => value.to_string(),
    }
}

/// First `limit` characters of a description
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
