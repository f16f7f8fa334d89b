use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.transcript-audit/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.transcript-audit/`
/// - `~/.transcript-audit/logs/`
/// - `~/.transcript-audit/cache/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let audit_dir = home.join(".transcript-audit");
    std::fs::create_dir_all(&audit_dir)?;
    std::fs::create_dir_all(audit_dir.join("logs"))?;
    std::fs::create_dir_all(audit_dir.join("cache"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Catalog resolution ─────────────────────────────────────────────────────────

/// Resolve the subject catalog to use for this run.
///
/// A catalog file passed on the command line wins; otherwise a
/// `catalog.json` under `~/.transcript-audit/` is picked up when present;
/// the built-in catalog is the final fallback.
pub fn resolve_catalog(
    explicit: Option<&std::path::Path>,
) -> audit_core::error::Result<audit_core::catalog::Catalog> {
    if let Some(path) = explicit {
        return audit_core::catalog::Catalog::load_from(path);
    }

    if let Some(home) = dirs::home_dir() {
        let user_catalog = home.join(".transcript-audit").join("catalog.json");
        if user_catalog.exists() {
            return audit_core::catalog::Catalog::load_from(&user_catalog);
        }
    }

    Ok(audit_core::catalog::Catalog::builtin())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_home<R>(home: &std::path::Path, f: impl FnOnce() -> R) -> R {
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home);
        let result = f();
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
        result
    }

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        with_home(tmp.path(), ensure_directories).expect("ensure_directories should succeed");

        let audit_dir = tmp.path().join(".transcript-audit");
        assert!(audit_dir.is_dir(), ".transcript-audit dir must exist");
        assert!(audit_dir.join("logs").is_dir(), "logs subdir must exist");
        assert!(audit_dir.join("cache").is_dir(), "cache subdir must exist");
    }

    // ── test_resolve_catalog ──────────────────────────────────────────────────

    #[test]
    fn test_resolve_catalog_builtin_fallback() {
        let tmp = TempDir::new().expect("tempdir");
        let catalog = with_home(tmp.path(), || resolve_catalog(None)).expect("builtin catalog");
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_resolve_catalog_explicit_path() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"subjects": {"Weather": {"search_terms": ["weather"], "courses": ["Module 1"]}}}"#,
        )
        .unwrap();

        let catalog = resolve_catalog(Some(&path)).expect("explicit catalog");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.subjects.contains_key("Weather"));
    }

    #[test]
    fn test_resolve_catalog_user_catalog_picked_up() {
        let tmp = TempDir::new().expect("tempdir");
        let audit_dir = tmp.path().join(".transcript-audit");
        std::fs::create_dir_all(&audit_dir).unwrap();
        std::fs::write(
            audit_dir.join("catalog.json"),
            r#"{"subjects": {"Navigation": {"search_terms": ["navigation"], "courses": ["Module 2"]}}}"#,
        )
        .unwrap();

        let catalog = with_home(tmp.path(), || resolve_catalog(None)).expect("user catalog");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.subjects.contains_key("Navigation"));
    }

    #[test]
    fn test_resolve_catalog_missing_explicit_path_errors() {
        let err = resolve_catalog(Some(std::path::Path::new("/missing/catalog.json")))
            .expect_err("missing catalog file should error");
        assert!(matches!(
            err,
            audit_core::error::AuditError::FileRead { .. }
        ));
    }
}
