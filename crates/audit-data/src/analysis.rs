//! Main audit pipeline.
//!
//! Orchestrates text extraction, record scanning, best-candidate selection
//! and course aggregation, returning an [`AuditResult`] ready for the UI
//! layer.

use std::collections::BTreeMap;
use std::path::Path;

use audit_core::catalog::Catalog;
use audit_core::error::Result;
use audit_core::models::{CompletionRecord, CourseCompletion};
use chrono::Utc;

use crate::aggregator::{CourseAggregator, HistoryDay};
use crate::extract::load_transcript_text;
use crate::parser::{ParserConfig, TranscriptParser};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the audit result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuditMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of transcript files whose text was extracted.
    pub files_processed: usize,
    /// Total number of text lines scanned.
    pub lines_scanned: usize,
    /// Number of distinct catalog subjects that matched.
    pub subjects_matched: usize,
    /// Number of candidate records before best-candidate selection.
    pub candidates_found: usize,
    /// Whether the document was detected as a super-condensed report.
    pub condensed: bool,
    /// Wall-clock seconds spent extracting text.
    pub extract_time_seconds: f64,
    /// Wall-clock seconds spent scanning and selecting records.
    pub parse_time_seconds: f64,
}

/// The complete output of [`audit_transcript`].
#[derive(Debug, Clone)]
pub struct AuditResult {
    /// Best record per matched subject, keyed by subject name.
    pub records: BTreeMap<String, CompletionRecord>,
    /// Per-course completion, sorted by percentage descending.
    pub courses: Vec<CourseCompletion>,
    /// Completion history grouped by day, newest first.
    pub history: Vec<HistoryDay>,
    /// Metadata about this audit run.
    pub metadata: AuditMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full audit pipeline.
///
/// 1. Extract text from the transcript file or directory at `input`.
/// 2. Scan the text for candidate completion records.
/// 3. Select the best record per subject.
/// 4. Aggregate per-course completion and day-level history.
///
/// `history_years` bounds how far back the history view reaches.
pub fn audit_transcript(
    input: &Path,
    catalog: Catalog,
    config: ParserConfig,
    history_years: u32,
) -> Result<AuditResult> {
    // ── Step 1: Extract text ──────────────────────────────────────────────────
    let extract_start = std::time::Instant::now();
    let (text, files_processed) = load_transcript_text(input)?;
    let extract_time = extract_start.elapsed().as_secs_f64();

    // ── Step 2: Scan and select ───────────────────────────────────────────────
    let parse_start = std::time::Instant::now();
    let parser = TranscriptParser::new(catalog, config)?;
    let condensed = parser.is_condensed(&text);
    let candidates = parser.scan(&text);
    let candidates_found = candidates.len();
    let records = parser.select_best(candidates);
    let parse_time = parse_start.elapsed().as_secs_f64();

    // ── Step 3: Aggregate ─────────────────────────────────────────────────────
    let today = Utc::now().date_naive();
    let catalog = parser.into_catalog();
    let courses = CourseAggregator::analyze(&catalog, &records, today);
    let history = CourseAggregator::aggregate_history(&records, history_years, today);

    let metadata = AuditMetadata {
        generated_at: Utc::now().to_rfc3339(),
        files_processed,
        lines_scanned: text.lines().count(),
        subjects_matched: records.len(),
        candidates_found,
        condensed,
        extract_time_seconds: extract_time,
        parse_time_seconds: parse_time,
    };

    Ok(AuditResult {
        records,
        courses,
        history,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
