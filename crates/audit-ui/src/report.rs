//! Plain-text report output for non-interactive runs.
//!
//! Produces the same subject and course breakdown as the TUI views, but as
//! a single string suitable for piping or logging.

use std::fmt::Write as _;

use audit_core::catalog::Catalog;
use audit_data::analysis::AuditResult;
use chrono::NaiveDate;

use crate::subject_view::build_subject_rows;

/// Render the full audit result as a plain-text report.
pub fn render_report(
    result: &AuditResult,
    catalog: &Catalog,
    likely_threshold: f64,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let sep = "=".repeat(78);

    writeln!(out, "{}", sep).ok();
    writeln!(out, "TRANSCRIPT AUDIT").ok();
    writeln!(out, "{}", sep).ok();
    writeln!(
        out,
        "Files: {}   Subjects matched: {}   Generated: {}",
        result.metadata.files_processed,
        result.metadata.subjects_matched,
        result.metadata.generated_at
    )
    .ok();
    if result.metadata.condensed {
        writeln!(out, "Note: super-condensed report detected").ok();
    }

    // ── Subjects ──────────────────────────────────────────────────────────────
    writeln!(out).ok();
    writeln!(out, "Subject Completions").ok();
    writeln!(out, "{}", "-".repeat(78)).ok();
    writeln!(
        out,
        "{:<34} {:<7} {:<7} {:<13} {:<12}",
        "Subject", "Status", "Score", "Date", "Base Month"
    )
    .ok();

    let rows = build_subject_rows(&result.records, catalog, today);
    for row in &rows {
        let status = if row.expired {
            format!("{}*", row.status)
        } else {
            row.status.to_string()
        };
        writeln!(
            out,
            "{:<34} {:<7} {:<7} {:<13} {:<12}",
            row.subject,
            status,
            row.score.as_deref().unwrap_or("-"),
            row.completion_date.as_deref().unwrap_or("-"),
            row.base_month.as_deref().unwrap_or("-"),
        )
        .ok();
    }
    if rows.iter().any(|r| r.expired) {
        writeln!(out, "  * validity period has lapsed").ok();
    }

    // ── Courses ───────────────────────────────────────────────────────────────
    writeln!(out).ok();
    writeln!(out, "Course Completion").ok();
    writeln!(out, "{}", "-".repeat(78)).ok();
    for course in &result.courses {
        writeln!(
            out,
            "{:<40} {:>3}/{:<3} {:>6.1}%",
            course.course, course.passed_subjects, course.total_subjects, course.percentage
        )
        .ok();
    }

    let likely: Vec<&str> = result
        .courses
        .iter()
        .filter(|c| c.is_likely(likely_threshold))
        .map(|c| c.course.as_str())
        .collect();
    writeln!(out).ok();
    if likely.is_empty() {
        writeln!(
            out,
            "No course reaches the {:.0}% likely threshold.",
            likely_threshold
        )
        .ok();
    } else {
        writeln!(out, "Likely courses: {}", likely.join(", ")).ok();
    }

    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
