use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Minimum numeric score (in percent) treated as a pass when the transcript
/// carries no explicit pass/fail word.
pub const DEFAULT_PASS_THRESHOLD: u32 = 70;

/// Completion percentage at or above which a course is flagged as a likely
/// match for the trainee.
pub const DEFAULT_LIKELY_THRESHOLD: f64 = 70.0;

// ── SubjectStatus ─────────────────────────────────────────────────────────────

/// Pass/fail outcome recovered for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectStatus::Pass => write!(f, "PASS"),
            SubjectStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Parse a score string such as `"85%"` into its numeric percentage.
///
/// Returns `None` when the string carries no leading integer.
///
/// # Examples
///
/// ```
/// use audit_core::models::score_percent;
///
/// assert_eq!(score_percent("85%"), Some(85));
/// assert_eq!(score_percent("100%"), Some(100));
/// assert_eq!(score_percent("N/A"), None);
/// ```
pub fn score_percent(score: &str) -> Option<u32> {
    score.trim_end_matches('%').trim().parse().ok()
}

// ── CompletionRecord ──────────────────────────────────────────────────────────

/// A single subject-completion record recovered from transcript text.
///
/// All fields besides the subject name and status are best-effort: the
/// heuristics may find a score without a date, a date without a score, or
/// neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Catalog subject name this record belongs to.
    pub subject: String,
    /// Pass/fail outcome.
    pub status: SubjectStatus,
    /// Score string as it appeared in the transcript, e.g. `"85%"`.
    pub score: Option<String>,
    /// Base-month label found near the entry, e.g. `"October"`.
    pub base_month: Option<String>,
    /// Raw completion-date string as matched in the text.
    pub completion_date: Option<String>,
    /// Calendar date parsed from `completion_date`, when recognisable.
    pub parsed_date: Option<NaiveDate>,
}

impl CompletionRecord {
    /// Whether this record represents a passed subject.
    pub fn is_pass(&self) -> bool {
        self.status == SubjectStatus::Pass
    }

    /// Tie-break ordering used to pick the best record per subject.
    ///
    /// Records with a score beat records without, then records with a date,
    /// then records with a base month, then passes beat fails.  Among equal
    /// ranks the candidate found earliest in the document wins.
    pub fn selection_rank(&self) -> (bool, bool, bool, bool) {
        (
            self.score.is_some(),
            self.completion_date.is_some(),
            self.base_month.is_some(),
            self.is_pass(),
        )
    }

    /// Date this completion ceases to be current, given a validity period.
    ///
    /// Returns `None` when the record carries no parseable date or the
    /// subject has no validity period.
    pub fn valid_until(&self, valid_months: Option<u32>) -> Option<NaiveDate> {
        let months = valid_months?;
        self.parsed_date
            .and_then(|d| d.checked_add_months(Months::new(months)))
    }

    /// Whether the completion is still current as of `today`.
    ///
    /// Records without a validity period or without a parseable completion
    /// date are always considered current.
    pub fn is_current(&self, valid_months: Option<u32>, today: NaiveDate) -> bool {
        match self.valid_until(valid_months) {
            Some(expiry) => expiry >= today,
            None => true,
        }
    }
}

// ── CourseCompletion ──────────────────────────────────────────────────────────

/// Aggregated completion state for one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCompletion {
    /// Course name.
    pub course: String,
    /// Number of member subjects in the catalog.
    pub total_subjects: usize,
    /// Member subjects passed and still current.
    pub passed_subjects: usize,
    /// `passed_subjects / total_subjects * 100`, or 0 for an empty course.
    pub percentage: f64,
}

impl CourseCompletion {
    /// Colour band for this course's completion percentage.
    pub fn band(&self) -> CompletionBand {
        CompletionBand::from_percentage(self.percentage)
    }

    /// Whether the course meets the "likely" threshold.
    pub fn is_likely(&self, threshold: f64) -> bool {
        self.percentage >= threshold
    }
}

// ── CompletionBand ────────────────────────────────────────────────────────────

/// Display band for a completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBand {
    /// 90 % and above.
    High,
    /// 50 % to 90 %.
    Medium,
    /// Below 50 %.
    Low,
}

impl CompletionBand {
    /// Map a percentage to its band.
    ///
    /// * `≥ 90 %` → `High`
    /// * `≥ 50 %` → `Medium`
    /// * otherwise → `Low`
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            CompletionBand::High
        } else if percentage >= 50.0 {
            CompletionBand::Medium
        } else {
            CompletionBand::Low
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
