//! Heuristic subject-completion scanner.
//!
//! Transcript PDFs come out of text extraction as loosely formatted lines
//! with no reliable structure.  The scanner walks the text line by line,
//! matches catalog search terms case-insensitively, and then hunts a context
//! window around each hit for the exam score, pass/fail status, completion
//! date, and base-month label.  Every hit produces a candidate record; the
//! best candidate per subject survives.

use std::collections::BTreeMap;

use audit_core::catalog::Catalog;
use audit_core::dates::parse_completion_date;
use audit_core::error::Result;
use audit_core::models::{score_percent, CompletionRecord, SubjectStatus, DEFAULT_PASS_THRESHOLD};
use regex::Regex;
use tracing::debug;

// ── ParserConfig ──────────────────────────────────────────────────────────────

/// Tunable knobs for the context-window search.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Lines of context taken before a subject hit.
    pub lines_before: usize,
    /// Lines of context taken after a subject hit.  Exam results usually
    /// trail the subject title, sometimes by dozens of lines.
    pub lines_after: usize,
    /// Minimum score (%) treated as a pass when no pass/fail word is present.
    pub pass_threshold: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lines_before: 10,
            lines_after: 50,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

// ── TranscriptParser ──────────────────────────────────────────────────────────

/// Scans extracted transcript text for subject-completion records.
pub struct TranscriptParser {
    catalog: Catalog,
    config: ParserConfig,
    exam_re: Regex,
    base_month_re: Regex,
    score_re: Regex,
    date_patterns: Vec<Regex>,
    condensed_re: Regex,
}

impl TranscriptParser {
    /// Build a parser for `catalog` with the given configuration.
    pub fn new(catalog: Catalog, config: ParserConfig) -> Result<Self> {
        // All patterns run against lowercased text.
        let exam_re = Regex::new(
            r"exam\s*(\d+%)\s*(pass|fail)?\s*(\d{4}-[a-z]{3}-\d{1,2}|\d{2}-[a-z]{3}-\d{4}|\d{4}-\d{2}-\d{2})",
        )?;
        let base_month_re = Regex::new(r"base month\s*[:|]\s*(\w+)")?;
        let score_re = Regex::new(r"(\d+%)\s*(pass|fail)?")?;
        let date_patterns = vec![
            Regex::new(r"\d{4}-[a-z]{3}-\d{1,2}")?, // 2024-oct-10
            Regex::new(r"\d{2}-[a-z]{3}-\d{4}")?,   // 01-feb-2024
            Regex::new(r"\d{4}-\d{2}-\d{2}")?,      // 2024-05-28
        ];
        let condensed_re = Regex::new(r"(?i)super\s*-?\s*condensed")?;

        Ok(Self {
            catalog,
            config,
            exam_re,
            base_month_re,
            score_re,
            date_patterns,
            condensed_re,
        })
    }

    /// Build a parser with the default configuration.
    pub fn with_defaults(catalog: Catalog) -> Result<Self> {
        Self::new(catalog, ParserConfig::default())
    }

    /// Consume the parser and return its catalog.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Whether `text` is a super-condensed report variant.
    ///
    /// Super-condensed transcripts list completions without scores; matched
    /// subjects with no recoverable score then fall back to `100%` / PASS.
    pub fn is_condensed(&self, text: &str) -> bool {
        self.condensed_re.is_match(text)
    }

    /// Scan `text` and return every candidate record, in document order.
    ///
    /// A subject may yield several candidates (title line and exam line both
    /// match search terms); [`select_best`](Self::select_best) reduces them.
    pub fn scan(&self, text: &str) -> Vec<CompletionRecord> {
        let lines: Vec<&str> = text.split('\n').collect();
        let condensed = self.is_condensed(text);
        let mut candidates = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let line_lower = line.to_lowercase();
            for (subject, entry) in &self.catalog.subjects {
                for term in &entry.search_terms {
                    if !line_lower.contains(&term.to_lowercase()) {
                        continue;
                    }

                    let start = i.saturating_sub(self.config.lines_before);
                    let end = (i + self.config.lines_after).min(lines.len());
                    let context_lines = &lines[start..end];
                    let context = context_lines.join(" ").to_lowercase();

                    candidates.push(self.extract_record(
                        subject,
                        context_lines,
                        &context,
                        condensed,
                    ));
                    break; // one candidate per subject per line
                }
            }
        }

        debug!(
            "Scan produced {} candidate records over {} lines",
            candidates.len(),
            lines.len()
        );
        candidates
    }

    /// Reduce candidates to at most one record per subject.
    ///
    /// The tie-break ordering prefers records with a score, then a date, then
    /// a base month, then a pass; the earliest candidate wins among equals.
    pub fn select_best(
        &self,
        candidates: Vec<CompletionRecord>,
    ) -> BTreeMap<String, CompletionRecord> {
        let mut best: BTreeMap<String, CompletionRecord> = BTreeMap::new();
        for candidate in candidates {
            match best.get(&candidate.subject) {
                Some(existing) if candidate.selection_rank() <= existing.selection_rank() => {}
                _ => {
                    best.insert(candidate.subject.clone(), candidate);
                }
            }
        }
        best
    }

    /// Scan and reduce in one step.
    pub fn parse(&self, text: &str) -> BTreeMap<String, CompletionRecord> {
        self.select_best(self.scan(text))
    }

    // ── Field extraction ──────────────────────────────────────────────────────

    /// Pull status, score, date, and base month out of one context window.
    fn extract_record(
        &self,
        subject: &str,
        context_lines: &[&str],
        context: &str,
        condensed: bool,
    ) -> CompletionRecord {
        let base_month = self
            .base_month_re
            .captures(context)
            .map(|caps| capitalize(&caps[1]));

        // Exam line first: "... Exam 85% Pass 2024-Oct-10".
        let mut score: Option<String> = None;
        let mut status = SubjectStatus::Pass;
        let mut date: Option<String> = None;

        for ctx_line in context_lines {
            if let Some(caps) = self.exam_re.captures(&ctx_line.to_lowercase()) {
                let found = caps[1].to_uppercase();
                let status_word = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                status = self.derive_status(&found, status_word);
                score = Some(found);
                date = Some(caps[3].to_string());
                break;
            }
        }

        // No exam line: fall back to the first date anywhere in the window.
        if date.is_none() {
            date = self
                .date_patterns
                .iter()
                .find_map(|p| p.find(context))
                .map(|m| m.as_str().to_string());
        }

        // No exam score: fall back to any bare score, then to status words,
        // then to the super-condensed 100% heuristic.
        if score.is_none() {
            if let Some(caps) = self.score_re.captures(context) {
                let found = caps[1].to_uppercase();
                let status_word = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                status = self.derive_status(&found, status_word);
                score = Some(found);
            } else if condensed {
                score = Some("100%".to_string());
                status = SubjectStatus::Pass;
            } else if context.contains("pass") {
                status = SubjectStatus::Pass;
            } else if context.contains("fail") {
                status = SubjectStatus::Fail;
            } else {
                status = SubjectStatus::Pass;
            }
        }

        let parsed_date = date.as_deref().and_then(parse_completion_date);

        CompletionRecord {
            subject: subject.to_string(),
            status,
            score,
            base_month,
            completion_date: date,
            parsed_date,
        }
    }

    /// Status rule: an explicit "pass" word wins, otherwise the numeric score
    /// against the threshold decides.
    fn derive_status(&self, score: &str, status_word: &str) -> SubjectStatus {
        if status_word.contains("pass")
            || score_percent(score).unwrap_or(0) >= self.config.pass_threshold
        {
            SubjectStatus::Pass
        } else {
            SubjectStatus::Fail
        }
    }
}

/// Uppercase the first character, lowercase the rest ("october" → "October").
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
