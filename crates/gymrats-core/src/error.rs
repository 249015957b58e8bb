use std::path::PathBuf;
use thiserror::Error;

/// All run-level errors produced by the GymRats report pipeline.
///
/// Record-level problems (a check-in with a bad timestamp, an activity with an
/// unparseable distance) never surface here; they are skipped by the
/// extractor and only counted.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An export file exists but its content is not a JSON document.
    #[error("Failed to parse export {path}: {source}")]
    ExportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An output table could not be written.
    #[error("Failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The run manifest could not be serialized.
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No holiday calendar is known for the requested year.
    #[error("Unsupported year {year}: no national holiday calendar available (supported: {supported:?})")]
    UnsupportedYear { year: i32, supported: Vec<i32> },

    /// The export directory does not exist.
    #[error("Export directory not found: {0}")]
    ExportDirNotFound(PathBuf),

    /// The export directory contains no validly named export files.
    #[error("No valid export JSON files found in {0}")]
    NoExportFiles(PathBuf),

    /// The configured user does not match any member `full_name`.
    #[error("User \"{user}\" not found in members.full_name (available sample: {available:?})")]
    UserNotFound { user: String, available: Vec<String> },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
