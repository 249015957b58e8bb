//! Export file discovery and loading.
//!
//! Finds validly named GymRats export snapshots in a directory and reads each
//! one into an [`ExportDocument`] for the extractor.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use gymrats_core::error::{ReportError, Result};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// File name accepted as an export snapshot, e.g. `gym-rats_export-26-03-20.json`.
pub const EXPORT_FILENAME_PATTERN: &str = r"^gym-rats_export-?\d{2}-\d{2}-\d{2}\.json$";

fn export_filename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EXPORT_FILENAME_PATTERN).expect("regex is valid"))
}

// ── ExportDocument ────────────────────────────────────────────────────────────

/// The two top-level collections of an export, still untyped per record.
///
/// Missing or non-array collections become empty; validation of individual
/// records is the extractor's job.
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    pub members: Vec<Value>,
    pub check_ins: Vec<Value>,
}

impl ExportDocument {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            debug!("export root is not a JSON object; treating it as empty");
            return Self::default();
        };

        let mut take_array = |key: &str| match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        Self {
            members: take_array("members"),
            check_ins: take_array("check_ins"),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// `true` when `file_name` matches [`EXPORT_FILENAME_PATTERN`].
pub fn is_valid_export_name(file_name: &str) -> bool {
    export_filename_regex().is_match(file_name)
}

/// List the valid export files directly inside `export_dir`, sorted by name.
///
/// Other `.json` files are ignored and logged. Fails when the directory does
/// not exist or holds no valid export.
pub fn find_export_files(export_dir: &Path) -> Result<Vec<PathBuf>> {
    if !export_dir.is_dir() {
        return Err(ReportError::ExportDirNotFound(export_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(export_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            let valid = is_valid_export_name(&name);
            if !valid {
                debug!("Ignored export with invalid name: {}", name);
            }
            valid
        })
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(ReportError::NoExportFiles(export_dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

/// Read and parse one export file.
///
/// The file handle lives only for the duration of this call.
pub fn load_export(path: &Path) -> Result<ExportDocument> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ReportError::ExportParse {
            path: path.to_path_buf(),
            source,
        })?;

    let doc = ExportDocument::from_value(value);
    debug!(
        "Loaded {}: {} members, {} check-ins",
        path.display(),
        doc.members.len(),
        doc.check_ins.len()
    );
    Ok(doc)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
