mod bootstrap;

use anyhow::Result;
use audit_core::settings::Settings;
use audit_data::analysis::audit_transcript;
use audit_data::parser::ParserConfig;
use audit_ui::app::{App, ViewMode};
use audit_ui::report::render_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Transcript Audit v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, View: {}, Theme: {}",
        settings.input.display(),
        settings.view,
        settings.theme
    );

    let catalog = bootstrap::resolve_catalog(settings.catalog.as_deref())?;
    tracing::info!("Catalog loaded with {} subjects", catalog.len());

    let config = ParserConfig {
        pass_threshold: settings.pass_threshold,
        ..ParserConfig::default()
    };

    let result = audit_transcript(
        &settings.input,
        catalog.clone(),
        config,
        settings.history_years,
    )?;

    tracing::info!(
        "Matched {} of {} subjects across {} file(s) ({} candidates)",
        result.metadata.subjects_matched,
        catalog.len(),
        result.metadata.files_processed,
        result.metadata.candidates_found
    );
    if result.metadata.condensed {
        tracing::info!("Super-condensed report detected; scoreless matches default to PASS");
    }

    if settings.report {
        let today = chrono::Utc::now().date_naive();
        print!(
            "{}",
            render_report(&result, &catalog, settings.likely_threshold, today)
        );
        return Ok(());
    }

    let app = App::new(
        &settings.theme,
        ViewMode::from_name(&settings.view),
        &result,
        &catalog,
        settings.likely_threshold,
    );
    app.run()?;

    Ok(())
}
