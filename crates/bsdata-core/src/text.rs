//! Text normalization for BSData free-text fields

/// Clean up BSData text formatting
///
/// Removes the `^^` / `**` markup pairs, decodes the two entity references
/// BSData leaves in attribute-sourced text, and collapses whitespace runs
/// to single spaces.
pub fn clean(text: &str) -> String {
    let stripped = strip_markup(text);
    let decoded = stripped.replace("&quot;", "\"").replace("&apos;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `^^` and `**` markup sequences in a single pass
///
/// A single pass over the input: removals must not pair up leftover
/// delimiters (`*^^*` keeps both asterisks).
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if (c == '^' || c == '*') && chars.peek() == Some(&c) {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
