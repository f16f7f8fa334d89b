//! Main application state and TUI event loop for the transcript audit.
//!
//! [`App`] owns the theme, the current view mode, and the display rows
//! precomputed from an [`AuditResult`].  The event loop is synchronous:
//! the audit runs once up front and the UI only switches between views.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use audit_core::catalog::Catalog;
use audit_data::aggregator::HistoryDay;
use audit_data::analysis::AuditResult;

use crate::course_view::{self, CourseRowData};
use crate::history_view;
use crate::subject_view::{self, SubjectRowData};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Per-subject completion table.
    Subjects,
    /// Per-course completion table.
    Courses,
    /// Day-by-day completion history.
    History,
}

impl ViewMode {
    /// Parse a view name from the CLI.  Unknown names fall back to
    /// `Subjects`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "courses" => ViewMode::Courses,
            "history" => ViewMode::History,
            _ => ViewMode::Subjects,
        }
    }

    /// The view reached by cycling forward (Tab).
    pub fn next(self) -> Self {
        match self {
            ViewMode::Subjects => ViewMode::Courses,
            ViewMode::Courses => ViewMode::History,
            ViewMode::History => ViewMode::Subjects,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the transcript audit TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Current view mode.
    pub view_mode: ViewMode,
    /// Course "likely" threshold in percent.
    pub likely_threshold: f64,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    subject_rows: Vec<SubjectRowData>,
    course_rows: Vec<CourseRowData>,
    history: Vec<HistoryDay>,
}

impl App {
    /// Construct the application from a finished audit.
    ///
    /// Display rows are computed once here; the event loop only rerenders.
    pub fn new(
        theme_name: &str,
        view_mode: ViewMode,
        result: &AuditResult,
        catalog: &Catalog,
        likely_threshold: f64,
    ) -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            likely_threshold,
            should_quit: false,
            subject_rows: subject_view::build_subject_rows(&result.records, catalog, today),
            course_rows: course_view::build_course_rows(
                &result.courses,
                catalog,
                &result.records,
                today,
            ),
            history: result.history.clone(),
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the TUI until the user quits.
    ///
    /// Keys: `1`/`2`/`3` jump to a view, `Tab` cycles, `q` or `Ctrl+C`
    /// exits.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('1') => self.view_mode = ViewMode::Subjects,
            KeyCode::Char('2') => self.view_mode = ViewMode::Courses,
            KeyCode::Char('3') => self.view_mode = ViewMode::History,
            KeyCode::Tab => self.view_mode = self.view_mode.next(),
            _ => {}
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Render the current view into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        match self.view_mode {
            ViewMode::Subjects => {
                if self.subject_rows.is_empty() {
                    subject_view::render_no_data(frame, area, &self.theme);
                } else {
                    subject_view::render_subject_view(frame, area, &self.subject_rows, &self.theme);
                }
            }
            ViewMode::Courses => {
                course_view::render_course_view(
                    frame,
                    area,
                    &self.course_rows,
                    self.likely_threshold,
                    &self.theme,
                );
            }
            ViewMode::History => {
                history_view::render_history_view(frame, area, &self.history, &self.theme);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
