//! Display-width aware text helpers shared by the table views.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate `s` to at most `max_width` terminal columns.
///
/// When truncation occurs the last column is used for an ellipsis so the
/// cut is visible.  Width is measured in display columns, not chars, so
/// wide (CJK) glyphs count as two.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1; // reserve one column for the ellipsis
    let mut out = String::new();
    let mut used = 0usize;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_unchanged() {
        assert_eq!(truncate_to_width("Navigation", 20), "Navigation");
    }

    #[test]
    fn test_exact_width_unchanged() {
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
    }

    #[test]
    fn test_long_string_gets_ellipsis() {
        let out = truncate_to_width("Aviation Weather Theory", 10);
        assert_eq!(out.width(), 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_wide_chars_counted_by_columns() {
        // Each CJK glyph is two columns wide.
        let out = truncate_to_width("航空気象理論", 5);
        assert!(out.width() <= 5);
        assert!(out.ends_with('…'));
    }
}
