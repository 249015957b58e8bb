//! Turns export documents into flat record streams.
//!
//! Every raw check-in goes through a typed validation step that either yields
//! a record or a [`SkipReason`]. Skips are counted and logged, never
//! propagated: nothing downstream of this module sees a malformed record.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gymrats_core::holidays::HolidaySet;
use gymrats_core::models::{round_to, CardioActivity, CardioSession, MemberLookup, ScoringCheckIn};
use gymrats_core::time_utils::{is_business_day, local_calendar_day_of};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::reader::ExportDocument;

/// Why a raw record did not produce an output row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("occurred_at missing or not a string")]
    MissingOccurredAt,
    #[error("account_id missing or not an integer")]
    MissingAccountId,
    #[error("points missing")]
    MissingPoints,
    #[error("occurred_at is not a valid timestamp")]
    InvalidTimestamp,
    #[error("{0} is a weekend or holiday")]
    NonBusinessDay(NaiveDate),
    #[error("points is not numeric")]
    InvalidPoints,
    #[error("activity is not cardio")]
    NotCardio,
}

// ── Members ───────────────────────────────────────────────────────────────────

/// Build the member lookup from `doc.members`, skipping entries without an
/// integer `id` and a string `full_name`.
pub fn build_member_lookup(doc: &ExportDocument) -> MemberLookup {
    let mut lookup = MemberLookup::default();
    for m in &doc.members {
        let id = m.get("id").and_then(Value::as_i64);
        let name = m.get("full_name").and_then(Value::as_str);
        if let (Some(id), Some(name)) = (id, name) {
            lookup.insert(id, name);
        }
    }
    lookup
}

// ── Field coercion ────────────────────────────────────────────────────────────

/// Parse a distance written with either `,` or `.` as decimal separator.
///
/// Numbers pass through. Empty, non-numeric and non-finite values yield `None`.
pub fn parse_distance_km(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim().replace(',', ".");
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Milliseconds → minutes, rounded to 2 decimals. `None` unless numeric.
pub fn parse_duration_min(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .map(|ms| round_to(ms / 60_000.0, 2))
}

/// Coerce `points` to a finite float: JSON numbers or numeric strings.
pub fn coerce_points(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Render an opaque field (`start_time`, `workout_id`) as text; `null` and
/// absent fields are `None`.
fn opaque_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Natural key of a scoring check-in. Points are always rendered with a
/// fractional part (`10` → `10.0`).
pub fn dedupe_key(account_id: i64, occurred_at: &str, points: f64) -> String {
    format!("{}|{}|{:?}", account_id, occurred_at, points)
}

// ── Scoring check-ins ─────────────────────────────────────────────────────────

/// Validate one raw check-in as a scoring record.
pub fn validate_check_in(
    raw: &Value,
    members: &MemberLookup,
    holidays: &HolidaySet,
) -> Result<ScoringCheckIn, SkipReason> {
    let occurred_at = raw
        .get("occurred_at")
        .and_then(Value::as_str)
        .ok_or(SkipReason::MissingOccurredAt)?;
    let account_id = raw
        .get("account_id")
        .and_then(Value::as_i64)
        .ok_or(SkipReason::MissingAccountId)?;
    let points = raw
        .get("points")
        .filter(|v| !v.is_null())
        .ok_or(SkipReason::MissingPoints)?;

    let day = local_calendar_day_of(occurred_at).ok_or(SkipReason::InvalidTimestamp)?;
    if !is_business_day(day, holidays) {
        return Err(SkipReason::NonBusinessDay(day));
    }

    let points = coerce_points(points).ok_or(SkipReason::InvalidPoints)?;

    Ok(ScoringCheckIn {
        calendar_day: day,
        occurred_at: occurred_at.to_string(),
        account_id,
        full_name: members.display_name(account_id),
        points,
        dedupe_key: dedupe_key(account_id, occurred_at, points),
    })
}

/// All scoring check-ins of `doc`, in input order.
pub fn extract_scoring_check_ins(
    doc: &ExportDocument,
    members: &MemberLookup,
    holidays: &HolidaySet,
) -> Vec<ScoringCheckIn> {
    let mut rows = Vec::with_capacity(doc.check_ins.len());
    let mut skipped: BTreeMap<String, usize> = BTreeMap::new();

    for raw in &doc.check_ins {
        match validate_check_in(raw, members, holidays) {
            Ok(row) => rows.push(row),
            Err(reason) => *skipped.entry(skip_label(&reason)).or_default() += 1,
        }
    }

    debug!(
        "Scoring check-ins: {} read, {} kept, skipped {:?}",
        doc.check_ins.len(),
        rows.len(),
        skipped
    );
    rows
}

// ── Cardio sessions ───────────────────────────────────────────────────────────

/// Validate one nested activity of a check-in already known to belong to the
/// self account on `day`.
pub fn validate_cardio_activity(
    raw: &Value,
    day: NaiveDate,
    full_name: &str,
) -> Result<CardioSession, SkipReason> {
    let activity = raw
        .get("platform_activity")
        .and_then(Value::as_str)
        .and_then(CardioActivity::from_platform)
        .ok_or(SkipReason::NotCardio)?;

    Ok(CardioSession {
        calendar_day: day,
        start_time: opaque_text(raw.get("start_time")),
        activity,
        distance_km: parse_distance_km(raw.get("distance_miles")),
        duration_min: parse_duration_min(raw.get("duration_millis")),
        external_id: opaque_text(raw.get("workout_id")),
        full_name: full_name.to_string(),
    })
}

/// Cardio sessions of `self_account_id` in `doc`, sorted by
/// `(calendar_day, activity name)`.
///
/// Cardio is not restricted to business days.
pub fn extract_cardio_sessions(
    doc: &ExportDocument,
    members: &MemberLookup,
    self_account_id: i64,
) -> Vec<CardioSession> {
    let full_name = members.display_name(self_account_id);
    let mut rows: Vec<CardioSession> = Vec::new();
    let mut skipped = 0usize;

    for raw in &doc.check_ins {
        if raw.get("account_id").and_then(Value::as_i64) != Some(self_account_id) {
            continue;
        }

        let Some(day) = raw
            .get("occurred_at")
            .and_then(Value::as_str)
            .and_then(local_calendar_day_of)
        else {
            skipped += 1;
            continue;
        };

        let activities = raw
            .get("check_in_activities")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for act in activities {
            match validate_cardio_activity(act, day, &full_name) {
                Ok(session) => rows.push(session),
                Err(_) => skipped += 1,
            }
        }
    }

    sort_sessions(&mut rows);

    debug!(
        "Cardio sessions for account {}: {} kept, {} skipped",
        self_account_id,
        rows.len(),
        skipped
    );
    rows
}

/// Stable sort by `(calendar_day, activity name)`.
pub(crate) fn sort_sessions(rows: &mut [CardioSession]) {
    rows.sort_by(|a, b| {
        a.calendar_day
            .cmp(&b.calendar_day)
            .then_with(|| a.activity.as_str().cmp(b.activity.as_str()))
    });
}

fn skip_label(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NonBusinessDay(_) => "non_business_day".to_string(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
