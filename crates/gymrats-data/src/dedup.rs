//! First-seen-wins deduplication across overlapping export snapshots.

use std::collections::HashSet;

use chrono::NaiveDate;
use gymrats_core::models::{CardioActivity, CardioSession, ScoringCheckIn};

use crate::extractor::sort_sessions;

/// Composite key for cardio sessions without a workout id.
type SessionKey = (
    NaiveDate,
    Option<String>,
    CardioActivity,
    Option<u64>,
    Option<u64>,
);

/// Keep the first row per `dedupe_key`, preserving order.
pub fn dedupe_check_ins(rows: Vec<ScoringCheckIn>) -> Vec<ScoringCheckIn> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.dedupe_key.clone()))
        .collect()
}

/// Deduplicate cardio sessions.
///
/// Rows with a workout id keep the first row per id; the rest keep the first
/// row per `(day, start_time, activity, distance_km, duration_min)`. The
/// with-id partition comes first, then everything is stably sorted by
/// `(day, activity name)`.
pub fn dedupe_cardio(rows: Vec<CardioSession>) -> Vec<CardioSession> {
    let (with_id, without_id): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.external_id.is_some());

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut out: Vec<CardioSession> = with_id
        .into_iter()
        .filter(|r| {
            r.external_id
                .as_ref()
                .map_or(true, |id| seen_ids.insert(id.clone()))
        })
        .collect();

    let mut seen_keys: HashSet<SessionKey> = HashSet::new();
    out.extend(
        without_id
            .into_iter()
            .filter(|r| seen_keys.insert(session_key(r))),
    );

    sort_sessions(&mut out);
    out
}

fn session_key(row: &CardioSession) -> SessionKey {
    (
        row.calendar_day,
        row.start_time.clone(),
        row.activity,
        row.distance_km.map(float_bits),
        row.duration_min.map(float_bits),
    )
}

/// Bit pattern for hashing; `-0.0` and `0.0` collapse to one key.
fn float_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
