// Keysvg Report
// Console summaries of a capture run

use std::fmt::Write;

use crate::pairing::RowCapture;

/// How the captures were recorded
pub const CAPTURE_NOTE: &str = "keycode were captured by tapping each key once, starting from the top left going to the right, then doing the next row and so on. If a key sits in two rows, only the first row presses it.";

/// Down codes of every row, tab separated, one line per row
pub fn down_code_table(captures: &[RowCapture]) -> String {
    let mut out = String::from("Keycodes, down:\n");
    for capture in captures {
        for key in capture.keys() {
            out.push_str(key.down());
            out.push('\t');
        }
        out.push('\n');
    }
    out
}

/// Rows that lost an incomplete key group, or `None` when every row paired cleanly
pub fn pairing_summary(captures: &[RowCapture]) -> Option<String> {
    let truncated: Vec<&RowCapture> = captures.iter().filter(|c| c.dropped_groups() > 0).collect();
    if truncated.is_empty() {
        return None;
    }

    let mut out = String::from("Incomplete key groups dropped:\n");
    for capture in truncated {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "  row {}: {} keys paired, {} group(s) dropped",
            capture.row(),
            capture.len(),
            capture.dropped_groups()
        );
    }
    Some(out)
}
