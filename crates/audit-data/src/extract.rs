//! Transcript file discovery and text extraction.
//!
//! Accepts either a single transcript file or a directory tree of them.
//! PDF text extraction is delegated to [`pdf_extract`]; `.txt` files are
//! treated as already-extracted text, which is also how the test suite
//! exercises the pipeline without binary fixtures.

use std::path::{Path, PathBuf};

use audit_core::error::{AuditError, Result};
use tracing::{debug, warn};

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all transcript files (`.pdf` / `.txt`) recursively under `input`,
/// sorted by path.
pub fn find_transcript_files(input: &Path) -> Vec<PathBuf> {
    if !input.exists() {
        warn!("Input path does not exist: {}", input.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(input)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "pdf" || ext == "txt")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// Extract the full text of a single transcript file.
///
/// PDFs go through [`pdf_extract::extract_text`]; anything else is read as
/// plain text.
pub fn extract_text(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .map(|ext| ext == "pdf")
        .unwrap_or(false);

    if is_pdf {
        let text = pdf_extract::extract_text(path).map_err(|e| AuditError::PdfExtract {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(
            "Extracted {} characters from {}",
            text.len(),
            path.display()
        );
        Ok(text)
    } else {
        std::fs::read_to_string(path).map_err(|source| AuditError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the combined text of all transcripts under `input`.
///
/// * A single file is extracted directly.
/// * A directory is scanned recursively; the texts of all discovered files
///   are concatenated in path order, separated by newlines.  Files that fail
///   extraction are skipped with a warning so one damaged PDF does not sink
///   the whole run.
///
/// Returns `(text, files_processed)`.
pub fn load_transcript_text(input: &Path) -> Result<(String, usize)> {
    if !input.exists() {
        return Err(AuditError::InputNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        let text = extract_text(input)?;
        return Ok((text, 1));
    }

    let files = find_transcript_files(input);
    if files.is_empty() {
        return Err(AuditError::NoTranscripts(input.to_path_buf()));
    }

    let mut combined = String::new();
    let mut processed = 0usize;
    for file in &files {
        match extract_text(file) {
            Ok(text) => {
                combined.push_str(&text);
                combined.push('\n');
                processed += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
            }
        }
    }

    if processed == 0 {
        return Err(AuditError::NoTranscripts(input.to_path_buf()));
    }

    Ok((combined, processed))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
