use chrono::NaiveDate;
use tracing::debug;

// ── Completion-date parsing ───────────────────────────────────────────────────

/// Date formats observed across transcript report variants.
///
/// Covers `01-Feb-2024`, `2024-Oct-10`, `2024-05-28` and `05/28/2024`.
const FMTS: &[&str] = &["%d-%b-%Y", "%Y-%b-%d", "%Y-%m-%d", "%m/%d/%Y"];

/// Parse a completion-date string into a calendar date.
///
/// Spaces are stripped first because extracted PDF text frequently pads
/// tokens (e.g. `"01 - Feb - 2024"`).  Month abbreviations match
/// case-insensitively, so the lowercased forms produced by the transcript
/// scanner (`"2024-oct-10"`) parse as well.  Returns `None` for empty or
/// unrecognised strings.
pub fn parse_completion_date(date_str: &str) -> Option<NaiveDate> {
    if date_str.is_empty() {
        return None;
    }

    let compact: String = date_str.chars().filter(|c| !c.is_whitespace()).collect();

    for fmt in FMTS {
        if let Ok(date) = NaiveDate::parse_from_str(&compact, fmt) {
            return Some(date);
        }
    }

    debug!("Could not parse completion date \"{}\"", date_str);
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
