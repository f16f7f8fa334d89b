//! Per-course completion table for the transcript audit TUI.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use audit_core::catalog::Catalog;
use audit_core::models::{CompletionRecord, CourseCompletion};

use crate::text::truncate_to_width;
use crate::themes::Theme;

const COURSE_COL_WIDTH: usize = 34;
const MISSING_COL_WIDTH: usize = 44;

/// Data for a single row in the course table.
#[derive(Debug, Clone)]
pub struct CourseRowData {
    /// Aggregated completion for this course.
    pub completion: CourseCompletion,
    /// Member subjects not yet passed (or whose pass has expired).
    pub missing: Vec<String>,
}

/// Build display rows with membership detail for each course.
///
/// The missing list names the member subjects that keep the course below
/// 100 %, in catalog order.
pub fn build_course_rows(
    courses: &[CourseCompletion],
    catalog: &Catalog,
    records: &BTreeMap<String, CompletionRecord>,
    today: NaiveDate,
) -> Vec<CourseRowData> {
    let membership = catalog.courses();
    courses
        .iter()
        .map(|completion| {
            let missing = membership
                .get(&completion.course)
                .map(|members| {
                    members
                        .iter()
                        .filter(|subject| {
                            !records.get(*subject).is_some_and(|rec| {
                                let valid_months = catalog
                                    .subjects
                                    .get(*subject)
                                    .and_then(|e| e.valid_months);
                                rec.is_pass() && rec.is_current(valid_months, today)
                            })
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            CourseRowData {
                completion: completion.clone(),
                missing,
            }
        })
        .collect()
}

/// Render the course table into `area`.
///
/// The completion column is coloured by band and courses meeting the
/// `likely_threshold` carry a marker, so a quick scan shows which courses
/// the transcript most plausibly belongs to.
pub fn render_course_view(
    frame: &mut Frame,
    area: Rect,
    rows: &[CourseRowData],
    likely_threshold: f64,
    theme: &Theme,
) {
    let header_cells = ["Course", "Passed", "Completion", "Likely", "Missing Subjects"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let course = &row.completion;
            let likely = if course.is_likely(likely_threshold) {
                "yes"
            } else {
                ""
            };
            Row::new(vec![
                Cell::from(truncate_to_width(&course.course, COURSE_COL_WIDTH)),
                Cell::from(format!(
                    "{}/{}",
                    course.passed_subjects, course.total_subjects
                )),
                Cell::from(format!("{:.1}%", course.percentage))
                    .style(theme.completion_style(course.percentage)),
                Cell::from(likely),
                Cell::from(truncate_to_width(&row.missing.join(", "), MISSING_COL_WIDTH)),
            ])
            .style(style)
        })
        .collect();

    // Totals row – styled separately to stand out.
    let passed: usize = rows.iter().map(|r| r.completion.passed_subjects).sum();
    let total: usize = rows.iter().map(|r| r.completion.total_subjects).sum();
    let likely_count = rows
        .iter()
        .filter(|r| r.completion.is_likely(likely_threshold))
        .count();
    let total_row = Row::new(vec![
        Cell::from("TOTAL").style(theme.table_total),
        Cell::from(format!("{}/{}", passed, total)),
        Cell::from(format!("{} courses", rows.len())),
        Cell::from(format!("{} likely", likely_count)),
        Cell::from(""),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(COURSE_COL_WIDTH as u16),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(MISSING_COL_WIDTH as u16),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Course Completion "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
