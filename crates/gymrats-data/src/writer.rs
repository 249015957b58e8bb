//! CSV and manifest output.

use std::path::{Path, PathBuf};

use gymrats_core::error::{ReportError, Result};
use gymrats_core::models::RunSummary;
use serde::Serialize;
use tracing::debug;

use crate::pipeline::ReportSet;

pub const LEADERBOARD_DAILY: (&str, &[&str]) = (
    "leaderboard_daily.csv",
    &["date", "account_id", "full_name", "points_day", "rank"],
);
pub const WINNERS_DAILY: (&str, &[&str]) = (
    "winners_daily.csv",
    &["date", "winner_full_name", "winner_points_day", "tie"],
);
pub const CHAMPIONS_WEEKLY: (&str, &[&str]) = (
    "champions_weekly.csv",
    &["week_start", "champion_full_name", "champion_points_week", "tie"],
);
pub const MY_CARDIO_SESSIONS: (&str, &[&str]) = (
    "my_cardio_sessions.csv",
    &[
        "date",
        "start_time",
        "activity",
        "distance_km",
        "duration_min",
        "workout_id",
        "full_name",
    ],
);
pub const MY_CARDIO_WEEKLY_KM: (&str, &[&str]) = (
    "my_cardio_weekly_km.csv",
    &[
        "week_start",
        "total_km",
        "sessions",
        "total_minutes",
        "avg_pace_min_per_km",
    ],
);
pub const MY_CARDIO_PROGRESS: (&str, &[&str]) = (
    "my_cardio_progress.csv",
    &[
        "week_start",
        "total_km",
        "sessions",
        "total_minutes",
        "avg_pace_min_per_km",
        "cumulative_km",
        "best_week_km_so_far",
    ],
);
pub const RUN_MANIFEST: &str = "run_manifest.json";

/// Write one table. The header row is always written, even with no rows.
pub fn write_csv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let to_err = |source: csv::Error| ReportError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(to_err)?;
    writer.write_record(columns).map_err(to_err)?;
    for row in rows {
        writer.serialize(row).map_err(to_err)?;
    }
    writer.flush().map_err(|e| to_err(e.into()))?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the run manifest as pretty JSON via a temp file and rename.
pub fn write_manifest(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).map_err(|source| ReportError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Write all six tables and the manifest into `out_dir`, creating it if
/// needed. Returns the written paths in output order.
pub fn write_reports(out_dir: &Path, reports: &ReportSet, summary: &RunSummary) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(7);
    written.push(write_table(out_dir, LEADERBOARD_DAILY, &reports.leaderboard)?);
    written.push(write_table(out_dir, WINNERS_DAILY, &reports.winners)?);
    written.push(write_table(out_dir, CHAMPIONS_WEEKLY, &reports.champions)?);
    written.push(write_table(out_dir, MY_CARDIO_SESSIONS, &reports.cardio_sessions)?);
    written.push(write_table(out_dir, MY_CARDIO_WEEKLY_KM, &reports.weekly_cardio)?);
    written.push(write_table(out_dir, MY_CARDIO_PROGRESS, &reports.progress)?);

    let manifest = out_dir.join(RUN_MANIFEST);
    write_manifest(&manifest, summary)?;
    written.push(manifest);

    Ok(written)
}

fn write_table<T: Serialize>(
    out_dir: &Path,
    (name, columns): (&str, &[&str]),
    rows: &[T],
) -> Result<PathBuf> {
    let path = out_dir.join(name);
    write_csv(&path, columns, rows)?;
    Ok(path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use gymrats_core::models::{
        CardioActivity, CardioProgress, CardioSession, DailyWinner, LeaderboardRow, WeeklyCardio,
        WeeklyChampion,
    };
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_reports() -> ReportSet {
        ReportSet {
            leaderboard: vec![LeaderboardRow {
                calendar_day: d(2026, 3, 17),
                account_id: 1,
                full_name: "Alice".to_string(),
                points_day: 10.0,
                rank: 1,
            }],
            winners: vec![DailyWinner {
                calendar_day: d(2026, 3, 17),
                winner_full_name: "Alice".to_string(),
                winner_points_day: 10.0,
                tie: false,
            }],
            champions: vec![WeeklyChampion {
                week_start: d(2026, 3, 16),
                champion_full_name: "Alice".to_string(),
                champion_points_week: 10.0,
                rank_week: 1,
                tie: true,
            }],
            cardio_sessions: vec![CardioSession {
                calendar_day: d(2026, 3, 17),
                start_time: None,
                activity: CardioActivity::MixedCardio,
                distance_km: Some(5.5),
                duration_min: None,
                external_id: Some("999".to_string()),
                full_name: "Alice".to_string(),
            }],
            weekly_cardio: vec![WeeklyCardio {
                week_start: d(2026, 3, 16),
                total_km: 0.0,
                sessions: 1,
                total_minutes: 12.5,
                avg_pace_min_per_km: None,
            }],
            progress: vec![CardioProgress {
                week_start: d(2026, 3, 16),
                total_km: 5.5,
                sessions: 1,
                total_minutes: 33.0,
                avg_pace_min_per_km: Some(6.0),
                cumulative_km: 5.5,
                best_week_km_so_far: 5.5,
            }],
        }
    }

    fn read(dir: &Path, name: &str) -> Vec<String> {
        std::fs::read_to_string(dir.join(name))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_write_reports_creates_all_outputs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("out");
        let reports = sample_reports();
        let summary = reports.summarize(&[PathBuf::from("gym-rats_export-26-03-20.json")], Utc::now());

        let written = write_reports(&out, &reports, &summary).unwrap();
        assert_eq!(written.len(), 7);
        assert!(written.iter().all(|p| p.exists()));
        assert!(!out.join("run_manifest.json.tmp").exists());
    }

    #[test]
    fn test_csv_columns_and_values() {
        let tmp = TempDir::new().unwrap();
        let reports = sample_reports();
        let summary = reports.summarize(&[], Utc::now());
        write_reports(tmp.path(), &reports, &summary).unwrap();

        assert_eq!(
            read(tmp.path(), "leaderboard_daily.csv"),
            vec!["date,account_id,full_name,points_day,rank", "2026-03-17,1,Alice,10.0,1"]
        );
        assert_eq!(
            read(tmp.path(), "winners_daily.csv")[1],
            "2026-03-17,Alice,10.0,false"
        );
        assert_eq!(
            read(tmp.path(), "champions_weekly.csv"),
            vec![
                "week_start,champion_full_name,champion_points_week,tie",
                "2026-03-16,Alice,10.0,true"
            ]
        );
        assert_eq!(
            read(tmp.path(), "my_cardio_sessions.csv")[1],
            "2026-03-17,,mixed_cardio,5.5,,999,Alice"
        );
        assert_eq!(
            read(tmp.path(), "my_cardio_weekly_km.csv")[1],
            "2026-03-16,0.0,1,12.5,"
        );
        assert_eq!(
            read(tmp.path(), "my_cardio_progress.csv")[1],
            "2026-03-16,5.5,1,33.0,6.0,5.5,5.5"
        );
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let tmp = TempDir::new().unwrap();
        let reports = ReportSet::default();
        let summary = reports.summarize(&[], Utc::now());
        write_reports(tmp.path(), &reports, &summary).unwrap();

        assert_eq!(
            read(tmp.path(), "my_cardio_progress.csv"),
            vec!["week_start,total_km,sessions,total_minutes,avg_pace_min_per_km,cumulative_km,best_week_km_so_far"]
        );
    }

    #[test]
    fn test_manifest_round_trips() {
        let tmp = TempDir::new().unwrap();
        let reports = sample_reports();
        let summary = reports.summarize(&[PathBuf::from("a.json"), PathBuf::from("b.json")], Utc::now());
        let path = tmp.path().join(RUN_MANIFEST);
        write_manifest(&path, &summary).unwrap();

        let loaded: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
        assert_eq!(loaded.processed_files_count, 2);
        assert_eq!(loaded.cardio_rows, 1);
    }
}
