mod bootstrap;

use anyhow::Result;
use gymrats_core::settings::Settings;
use gymrats_data::pipeline::run_pipeline;
use gymrats_data::writer::write_reports;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("GymRats report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Year: {}, exports: {}, output: {}",
        settings.year,
        settings.exports_dir.display(),
        settings.out_dir.display()
    );

    let user = settings.resolve_user()?;

    // Every table is built before anything touches the output directory.
    let result = run_pipeline(&settings.exports_dir, user, settings.year)?;
    let written = write_reports(&settings.out_dir, &result.reports, &result.summary)?;

    tracing::debug!("Wrote {} output files", written.len());
    tracing::info!(
        "Leaderboard rows: {}, cardio sessions: {}",
        result.summary.leaderboard_rows,
        result.summary.cardio_rows
    );

    println!(
        "OK! Processed {} export(s). Outputs in: {}/",
        result.files.len(),
        settings.out_dir.display()
    );

    Ok(())
}
