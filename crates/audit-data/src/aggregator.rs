//! Course-completion and history aggregation over selected records.

use std::collections::BTreeMap;

use audit_core::catalog::Catalog;
use audit_core::models::{CompletionRecord, CourseCompletion};
use chrono::NaiveDate;

// ── HistoryDay ────────────────────────────────────────────────────────────────

/// All subjects completed on one calendar day.
#[derive(Debug, Clone)]
pub struct HistoryDay {
    /// The completion date.
    pub date: NaiveDate,
    /// Subjects completed on that day, sorted by name.
    pub subjects: Vec<String>,
}

impl HistoryDay {
    /// Number of subjects completed on this day.
    pub fn count(&self) -> usize {
        self.subjects.len()
    }
}

// ── CourseAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that turns per-subject records into per-course progress.
pub struct CourseAggregator;

impl CourseAggregator {
    /// Compute completion percentages for every course in the catalog.
    ///
    /// A member subject counts as complete when its best record is a pass
    /// and the completion is still current as of `today` (subjects without
    /// a validity period or without a parseable date always count).
    ///
    /// Returns courses sorted by percentage descending, then by name.
    pub fn analyze(
        catalog: &Catalog,
        records: &BTreeMap<String, CompletionRecord>,
        today: NaiveDate,
    ) -> Vec<CourseCompletion> {
        let mut results: Vec<CourseCompletion> = catalog
            .courses()
            .into_iter()
            .map(|(course, members)| {
                let total = members.len();
                let passed = members
                    .iter()
                    .filter(|subject| {
                        records.get(*subject).is_some_and(|rec| {
                            let valid_months =
                                catalog.subjects.get(*subject).and_then(|e| e.valid_months);
                            rec.is_pass() && rec.is_current(valid_months, today)
                        })
                    })
                    .count();
                let percentage = if total > 0 {
                    passed as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                CourseCompletion {
                    course,
                    total_subjects: total,
                    passed_subjects: passed,
                    percentage,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.course.cmp(&b.course))
        });
        results
    }

    /// Filter courses meeting the "likely" completion threshold.
    pub fn likely(courses: &[CourseCompletion], threshold: f64) -> Vec<CourseCompletion> {
        courses
            .iter()
            .filter(|c| c.is_likely(threshold))
            .cloned()
            .collect()
    }

    /// Group completion dates by calendar day within the trailing window.
    ///
    /// `window_years` bounds how far back history reaches (365 days per
    /// year, matching the calendar-heatmap source data).  Days are returned
    /// newest first.
    pub fn aggregate_history(
        records: &BTreeMap<String, CompletionRecord>,
        window_years: u32,
        today: NaiveDate,
    ) -> Vec<HistoryDay> {
        let start = today - chrono::Duration::days(i64::from(window_years) * 365);

        let mut by_day: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for rec in records.values() {
            let Some(date) = rec.parsed_date else {
                continue;
            };
            if date < start {
                continue;
            }
            by_day.entry(date).or_default().push(rec.subject.clone());
        }

        let mut days: Vec<HistoryDay> = by_day
            .into_iter()
            .map(|(date, mut subjects)| {
                subjects.sort();
                HistoryDay { date, subjects }
            })
            .collect();
        days.reverse();
        days
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
