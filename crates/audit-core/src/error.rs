use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the transcript audit.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text could not be extracted from a PDF document.
    #[error("Failed to extract text from {path}: {message}")]
    PdfExtract { path: PathBuf, message: String },

    /// A JSON document (catalog or persisted params) could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A search pattern failed to compile.
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The transcript path given on the command line does not exist.
    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    /// No transcript files were found under the given directory.
    #[error("No transcript files found in {0}")]
    NoTranscripts(PathBuf),

    /// The subject catalog contains no subjects.
    #[error("Subject catalog is empty: {0}")]
    EmptyCatalog(PathBuf),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the audit crates.
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = AuditError::FileRead {
            path: PathBuf::from("/some/transcript.pdf"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/transcript.pdf"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_pdf_extract() {
        let err = AuditError::PdfExtract {
            path: PathBuf::from("/some/transcript.pdf"),
            message: "encrypted document".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to extract text"));
        assert!(msg.contains("encrypted document"));
    }

    #[test]
    fn test_error_display_input_not_found() {
        let err = AuditError::InputNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Input path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_transcripts() {
        let err = AuditError::NoTranscripts(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No transcript files found in /empty/dir");
    }

    #[test]
    fn test_error_display_empty_catalog() {
        let err = AuditError::EmptyCatalog(PathBuf::from("/cfg/catalog.json"));
        assert_eq!(
            err.to_string(),
            "Subject catalog is empty: /cfg/catalog.json"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AuditError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: AuditError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_regex() {
        let re_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: AuditError = re_err.into();
        assert!(err.to_string().contains("Invalid search pattern"));
    }
}
