//! End-to-end report pipeline.
//!
//! Resolves the holiday calendar, discovers and reads the export snapshots,
//! extracts records, deduplicates them and builds every report table. Nothing
//! is written here; the caller persists a [`PipelineResult`] only once it has
//! been fully built.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gymrats_core::error::{ReportError, Result};
use gymrats_core::holidays::HolidaySet;
use gymrats_core::models::{
    CardioProgress, CardioSession, DailyWinner, LeaderboardRow, MemberLookup, RunSummary,
    ScoringCheckIn, WeeklyCardio, WeeklyChampion,
};
use tracing::{debug, info};

use crate::cardio::CardioAggregator;
use crate::dedup::{dedupe_cardio, dedupe_check_ins};
use crate::extractor::{build_member_lookup, extract_cardio_sessions, extract_scoring_check_ins};
use crate::leaderboard::LeaderboardAggregator;
use crate::reader::{find_export_files, load_export};

/// Number of member names listed when the configured user is not found.
const AVAILABLE_NAMES_SAMPLE: usize = 20;

// ── Public types ──────────────────────────────────────────────────────────────

/// Every table produced by one run.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    pub leaderboard: Vec<LeaderboardRow>,
    pub winners: Vec<DailyWinner>,
    pub champions: Vec<WeeklyChampion>,
    pub cardio_sessions: Vec<CardioSession>,
    pub weekly_cardio: Vec<WeeklyCardio>,
    pub progress: Vec<CardioProgress>,
}

impl ReportSet {
    /// Deduplicate the concatenated records and build all tables.
    ///
    /// `check_ins` and `cardio` must be in file order so that first-seen
    /// deduplication keeps the earliest snapshot's copy.
    pub fn from_records(check_ins: Vec<ScoringCheckIn>, cardio: Vec<CardioSession>) -> Self {
        let check_ins = dedupe_check_ins(check_ins);
        let leaderboard = LeaderboardAggregator::daily_leaderboard(&check_ins);
        let winners = LeaderboardAggregator::daily_winners(&leaderboard);
        let champions = LeaderboardAggregator::weekly_champions(&leaderboard);

        let cardio_sessions = dedupe_cardio(cardio);
        let weekly_cardio = CardioAggregator::weekly_totals(&cardio_sessions);
        let progress = CardioAggregator::progress(&weekly_cardio);

        Self {
            leaderboard,
            winners,
            champions,
            cardio_sessions,
            weekly_cardio,
            progress,
        }
    }

    /// Summary of a run over `files`, stamped with `at`.
    pub fn summarize(&self, files: &[PathBuf], at: DateTime<Utc>) -> RunSummary {
        RunSummary {
            run_timestamp_utc: at.to_rfc3339(),
            processed_files_count: files.len(),
            processed_files: files
                .iter()
                .map(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| p.display().to_string())
                })
                .collect(),
            leaderboard_rows: self.leaderboard.len(),
            cardio_rows: self.cardio_sessions.len(),
            winners_rows: self.winners.len(),
            champions_rows: self.champions.len(),
            weekly_cardio_rows: self.weekly_cardio.len(),
            progress_rows: self.progress.len(),
        }
    }
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Export files processed, in processing order.
    pub files: Vec<PathBuf>,
    /// Account id matched for the configured user.
    pub self_account_id: i64,
    pub reports: ReportSet,
    pub summary: RunSummary,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Resolve `user` against the member lookup, failing with the sorted list of
/// known names (first 20) when there is no match.
pub fn resolve_self_account(members: &MemberLookup, user: &str) -> Result<i64> {
    members
        .find_account_id_by_name(user)
        .ok_or_else(|| ReportError::UserNotFound {
            user: user.to_string(),
            available: members
                .sorted_names()
                .into_iter()
                .take(AVAILABLE_NAMES_SAMPLE)
                .collect(),
        })
}

/// Run the full pipeline over the exports in `exports_dir`.
///
/// 1. Load the holiday calendar for `year`.
/// 2. Discover export files (lexicographic order).
/// 3. Build the member lookup from the first export and resolve `user`.
/// 4. Extract scoring check-ins and cardio sessions from every export.
/// 5. Deduplicate and aggregate into a [`ReportSet`].
pub fn run_pipeline(exports_dir: &Path, user: &str, year: i32) -> Result<PipelineResult> {
    let holidays = HolidaySet::for_year(year)?;
    let files = find_export_files(exports_dir)?;
    info!(
        "Processing {} export(s): {:?}",
        files.len(),
        files
            .iter()
            .filter_map(|p| p.file_name())
            .collect::<Vec<_>>()
    );

    let mut first = Some(load_export(&files[0])?);
    let members = first
        .as_ref()
        .map(build_member_lookup)
        .unwrap_or_default();
    let self_account_id = resolve_self_account(&members, user)?;
    debug!("Resolved user \"{}\" to account {}", user, self_account_id);

    let mut check_ins: Vec<ScoringCheckIn> = Vec::new();
    let mut cardio: Vec<CardioSession> = Vec::new();

    for path in &files {
        let doc = match first.take() {
            Some(doc) => doc,
            None => load_export(path)?,
        };
        check_ins.extend(extract_scoring_check_ins(&doc, &members, &holidays));
        cardio.extend(extract_cardio_sessions(&doc, &members, self_account_id));
    }

    debug!(
        "Extracted {} scoring check-ins and {} cardio sessions before dedupe",
        check_ins.len(),
        cardio.len()
    );

    let reports = ReportSet::from_records(check_ins, cardio);
    let summary = reports.summarize(&files, Utc::now());

    Ok(PipelineResult {
        files,
        self_account_id,
        reports,
        summary,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
