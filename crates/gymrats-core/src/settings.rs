use clap::Parser;
use std::path::PathBuf;

use crate::error::{ReportError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Process GymRats Pro JSON exports and generate leaderboards + cardio reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gymrats-report",
    about = "Process GymRats Pro JSON exports and generate leaderboards + cardio reports",
    version
)]
pub struct Settings {
    /// Your name as it appears in members.full_name
    #[arg(long, env = "GYMRATS_USER")]
    pub user: Option<String>,

    /// Reference year for the national holiday calendar
    #[arg(long, env = "DEFAULT_YEAR", default_value = "2026")]
    pub year: i32,

    /// Directory containing the export JSON files
    #[arg(long, default_value = "exports")]
    pub exports_dir: PathBuf,

    /// Output directory for CSV tables and the run manifest
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Extra logging (ignored files, processed file list)
    #[arg(long)]
    pub verbose: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments, falling back to environment variables.
    ///
    /// A `.env` file in the working directory (or a parent) is applied first.
    /// Variables already present in the process environment keep their value.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    /// Same as [`load`](Self::load) with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// The configured user name, or a configuration error when neither
    /// `--user` nor `GYMRATS_USER` provided a non-blank value.
    pub fn resolve_user(&self) -> Result<&str> {
        match self.user.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => Ok(u),
            _ => Err(ReportError::Config(
                "User not provided. Use --user or set GYMRATS_USER (environment or .env).".to_string(),
            )),
        }
    }

    /// `--verbose` overrides the configured log level.
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
