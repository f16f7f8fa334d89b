//! Per-subject completion table for the transcript audit TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per matched
//! subject plus a highlighted totals row at the bottom.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use audit_core::catalog::Catalog;
use audit_core::models::{CompletionRecord, SubjectStatus};

use crate::text::truncate_to_width;
use crate::themes::Theme;

const SUBJECT_COL_WIDTH: usize = 34;

/// Data for a single row in the subject table.
#[derive(Debug, Clone)]
pub struct SubjectRowData {
    /// Catalog subject name.
    pub subject: String,
    /// Pass/fail status of the selected record.
    pub status: SubjectStatus,
    /// Raw score string, e.g. `"85%"`.
    pub score: Option<String>,
    /// Completion date as found in the transcript.
    pub completion_date: Option<String>,
    /// Base month as found in the transcript.
    pub base_month: Option<String>,
    /// End of the validity period, for subjects that carry one.
    pub valid_until: Option<NaiveDate>,
    /// Whether the validity period has lapsed.
    pub expired: bool,
}

/// Build display rows from the selected records, one per matched subject.
///
/// Validity is resolved against the catalog entry for each subject; rows
/// are returned in subject-name order.
pub fn build_subject_rows(
    records: &BTreeMap<String, CompletionRecord>,
    catalog: &Catalog,
    today: NaiveDate,
) -> Vec<SubjectRowData> {
    records
        .values()
        .map(|rec| {
            let valid_months = catalog
                .subjects
                .get(&rec.subject)
                .and_then(|e| e.valid_months);
            SubjectRowData {
                subject: rec.subject.clone(),
                status: rec.status,
                score: rec.score.clone(),
                completion_date: rec.completion_date.clone(),
                base_month: rec.base_month.clone(),
                valid_until: rec.valid_until(valid_months),
                expired: !rec.is_current(valid_months, today),
            }
        })
        .collect()
}

/// Render the subject table into `area`.
///
/// Expired completions are rendered in the theme's `expired` style and
/// tagged in the Valid Until column.
pub fn render_subject_view(frame: &mut Frame, area: Rect, rows: &[SubjectRowData], theme: &Theme) {
    let header_cells = [
        "Subject",
        "Status",
        "Score",
        "Date",
        "Base Month",
        "Valid Until",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if row.expired {
                theme.expired
            } else if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let valid_until = match (row.valid_until, row.expired) {
                (Some(d), true) => format!("{} (expired)", d),
                (Some(d), false) => d.to_string(),
                (None, _) => "-".to_string(),
            };
            Row::new(vec![
                Cell::from(truncate_to_width(&row.subject, SUBJECT_COL_WIDTH)),
                Cell::from(row.status.to_string()).style(theme.status_style(row.status)),
                Cell::from(row.score.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(row.completion_date.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(row.base_month.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(valid_until),
            ])
            .style(style)
        })
        .collect();

    // Totals row – styled separately to stand out.
    let passed = rows
        .iter()
        .filter(|r| r.status == SubjectStatus::Pass && !r.expired)
        .count();
    let total_row = Row::new(vec![
        Cell::from("TOTAL").style(theme.table_total),
        Cell::from(format!("{} / {} current", passed, rows.len())),
        Cell::from(""),
        Cell::from(""),
        Cell::from(""),
        Cell::from(""),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(SUBJECT_COL_WIDTH as u16),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(20),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Subject Completions "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when no subjects matched.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No completion records found",
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the transcript contains known subject names.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Transcript Audit "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::catalog::SubjectEntry;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_catalog() -> Catalog {
        let mut c = Catalog::default();
        c.subjects.insert(
            "Weather".to_string(),
            SubjectEntry {
                search_terms: vec!["weather".to_string()],
                courses: vec!["Module 1".to_string()],
                valid_months: None,
            },
        );
        c.subjects.insert(
            "Hazmat".to_string(),
            SubjectEntry {
                search_terms: vec!["hazmat".to_string()],
                courses: vec!["Dangerous Goods".to_string()],
                valid_months: Some(24),
            },
        );
        c
    }

    fn make_record(subject: &str, status: SubjectStatus, date: Option<NaiveDate>) -> CompletionRecord {
        CompletionRecord {
            subject: subject.to_string(),
            status,
            score: Some("85%".to_string()),
            base_month: Some("January".to_string()),
            completion_date: date.map(|d| d.to_string()),
            parsed_date: date,
        }
    }

    // ── build_subject_rows ────────────────────────────────────────────────────

    #[test]
    fn test_build_rows_basic() {
        let mut records = BTreeMap::new();
        records.insert(
            "Weather".to_string(),
            make_record("Weather", SubjectStatus::Pass, Some(ymd(2024, 5, 1))),
        );

        let rows = build_subject_rows(&records, &make_catalog(), ymd(2025, 1, 1));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "Weather");
        assert!(!rows[0].expired);
        assert!(rows[0].valid_until.is_none());
    }

    #[test]
    fn test_build_rows_expired_validity() {
        let mut records = BTreeMap::new();
        records.insert(
            "Hazmat".to_string(),
            make_record("Hazmat", SubjectStatus::Pass, Some(ymd(2022, 1, 1))),
        );

        let rows = build_subject_rows(&records, &make_catalog(), ymd(2025, 6, 1));
        assert!(rows[0].expired);
        assert_eq!(rows[0].valid_until, Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_build_rows_current_validity() {
        let mut records = BTreeMap::new();
        records.insert(
            "Hazmat".to_string(),
            make_record("Hazmat", SubjectStatus::Pass, Some(ymd(2024, 6, 1))),
        );

        let rows = build_subject_rows(&records, &make_catalog(), ymd(2025, 6, 1));
        assert!(!rows[0].expired);
        assert_eq!(rows[0].valid_until, Some(ymd(2026, 6, 1)));
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_subject_view_does_not_panic() {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let mut records = BTreeMap::new();
        records.insert(
            "Weather".to_string(),
            make_record("Weather", SubjectStatus::Pass, Some(ymd(2024, 5, 1))),
        );
        records.insert(
            "Hazmat".to_string(),
            make_record("Hazmat", SubjectStatus::Fail, None),
        );
        let rows = build_subject_rows(&records, &make_catalog(), ymd(2025, 1, 1));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_subject_view(frame, area, &rows, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_subject_view_empty_rows_does_not_panic() {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_subject_view(frame, area, &[], &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();
    }
}
