use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Training-transcript completion auditing
#[derive(Parser, Debug, Clone)]
#[command(
    name = "transcript-audit",
    about = "Scan training transcript PDFs for subject completions and course progress",
    version
)]
pub struct Settings {
    /// Transcript PDF (or directory of transcripts) to scan
    #[arg(value_name = "TRANSCRIPT")]
    pub input: PathBuf,

    /// View mode
    #[arg(long, default_value = "subjects", value_parser = ["subjects", "courses", "history"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Subject catalog JSON file (built-in catalog when omitted)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Minimum score (%) counted as a pass when no pass/fail word is present
    #[arg(long, default_value = "70", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub pass_threshold: u32,

    /// Completion percentage at which a course counts as a likely match
    #[arg(long, default_value = "70.0")]
    pub likely_threshold: f64,

    /// Years of completion history to include in the history view
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub history_years: u32,

    /// Print a plain-text report to stdout instead of opening the TUI
    #[arg(long)]
    pub report: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.transcript-audit/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likely_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_years: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.transcript-audit/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".transcript-audit").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`load_with_last_used`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            // Apply the debug override and return without re-persisting.
            return Self::apply_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on the
        // command line (CLI always wins).  The input path is never persisted.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "pass_threshold") {
            if let Some(v) = last.pass_threshold {
                settings.pass_threshold = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "likely_threshold") {
            if let Some(v) = last.likely_threshold {
                settings.likely_threshold = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "history_years") {
            if let Some(v) = last.history_years {
                settings.history_years = v;
            }
        }

        settings = Self::apply_overrides(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Apply flag overrides that take precedence over merged values.
    fn apply_overrides(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            view: Some(s.view.clone()),
            pass_threshold: Some(s.pass_threshold),
            likely_threshold: Some(s.likely_threshold),
            history_years: Some(s.history_years),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build the config path inside `tmp`.
    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    /// Save `params` to `tmp`, then load them back.
    fn round_trip(tmp: &TempDir, params: &LastUsedParams) -> LastUsedParams {
        let path = tmp_config_path(tmp);
        params.save_to(&path).expect("save");
        LastUsedParams::load_from(&path)
    }

    fn args(extra: &[&str]) -> Vec<OsString> {
        let mut v: Vec<OsString> = vec!["transcript-audit".into(), "records.pdf".into()];
        v.extend(extra.iter().map(OsString::from));
        v
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("courses".to_string()),
            pass_threshold: Some(80),
            likely_threshold: Some(60.0),
            history_years: Some(3),
        };

        let loaded = round_trip(&tmp, &params);

        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.view, Some("courses".to_string()));
        assert_eq!(loaded.pass_threshold, Some(80));
        assert_eq!(loaded.likely_threshold, Some(60.0));
        assert_eq!(loaded.history_years, Some(3));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_params_load_missing_returns_default() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.theme.is_none());
        assert!(loaded.view.is_none());
    }

    #[test]
    fn test_last_used_params_load_corrupt_returns_default() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{broken json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.theme.is_none());
    }

    // ── Settings merge ────────────────────────────────────────────────────────

    #[test]
    fn test_settings_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(args(&[]), &tmp_config_path(&tmp));
        assert_eq!(settings.input, PathBuf::from("records.pdf"));
        assert_eq!(settings.view, "subjects");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.pass_threshold, 70);
        assert_eq!(settings.likely_threshold, 70.0);
        assert_eq!(settings.history_years, 2);
        assert!(!settings.report);
    }

    #[test]
    fn test_settings_merge_last_used_when_not_explicit() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            view: Some("courses".to_string()),
            pass_threshold: Some(80),
            likely_threshold: None,
            history_years: None,
        }
        .save_to(&path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(args(&[]), &path);
        assert_eq!(settings.theme, "classic");
        assert_eq!(settings.view, "courses");
        assert_eq!(settings.pass_threshold, 80);
    }

    #[test]
    fn test_settings_cli_wins_over_last_used() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            view: Some("courses".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(args(&["--view", "history"]), &path);
        assert_eq!(settings.view, "history", "explicit CLI value must win");
        assert_eq!(settings.theme, "classic", "non-explicit value still merged");
    }

    #[test]
    fn test_settings_persists_for_next_run() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let _ = Settings::load_with_last_used_impl(args(&["--theme", "dark"]), &path);

        let saved = LastUsedParams::load_from(&path);
        assert_eq!(saved.theme, Some("dark".to_string()));
    }

    #[test]
    fn test_settings_clear_removes_saved_params() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(args(&["--clear"]), &path);
        assert!(settings.clear);
        assert!(!path.exists(), "config must be removed by --clear");
        // --clear must not re-merge stale values.
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings =
            Settings::load_with_last_used_impl(args(&["--debug"]), &tmp_config_path(&tmp));
        assert_eq!(settings.log_level, "DEBUG");
    }
}
