//! Day-by-day completion history table for the transcript audit TUI.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use audit_data::aggregator::HistoryDay;

use crate::text::truncate_to_width;
use crate::themes::Theme;

const SUBJECTS_COL_WIDTH: usize = 70;

/// Render the completion-history table into `area`, newest day first.
pub fn render_history_view(frame: &mut Frame, area: Rect, days: &[HistoryDay], theme: &Theme) {
    let header_cells = ["Date", "Count", "Subjects"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(day.date.to_string()),
                Cell::from(day.count().to_string()),
                Cell::from(truncate_to_width(
                    &day.subjects.join(", "),
                    SUBJECTS_COL_WIDTH,
                )),
            ])
            .style(style)
        })
        .collect();

    // Totals row – styled separately to stand out.
    let total_subjects: usize = days.iter().map(|d| d.count()).sum();
    let total_row = Row::new(vec![
        Cell::from("TOTAL").style(theme.table_total),
        Cell::from(total_subjects.to_string()),
        Cell::from(format!("{} training days", days.len())),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(SUBJECTS_COL_WIDTH as u16),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Completion History "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_days() -> Vec<HistoryDay> {
        vec![
            HistoryDay {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                subjects: vec!["Sea Survival".to_string()],
            },
            HistoryDay {
                date: NaiveDate::from_ymd_opt(2024, 5, 28).unwrap(),
                subjects: vec![
                    "Aviation Weather Theory".to_string(),
                    "Navigation".to_string(),
                ],
            },
        ]
    }

    #[test]
    fn test_render_history_view_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let days = make_days();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_history_view(frame, area, &days, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_history_view_empty_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_history_view(frame, area, &[], &theme);
            })
            .unwrap();
    }
}
