use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::holidays::HolidaySet;

/// Civil time zone used to bucket check-ins into calendar days.
///
/// Brazil abolished DST in 2019, so every supported year sees a fixed
/// UTC−03:00 offset.
pub const LOCAL_TZ: Tz = chrono_tz::America::Sao_Paulo;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse an ISO 8601 / RFC 3339 timestamp string into a UTC [`DateTime`].
///
/// Handles the `Z` suffix and any fixed offset. A timestamp without offset is
/// read as UTC, which is how the export writes `occurred_at`.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc));
    }

    const FMTS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FMTS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    debug!("could not parse timestamp \"{}\"", s);
    None
}

// ── Calendar filter ───────────────────────────────────────────────────────────

/// Calendar date of `instant` on the wall clock of [`LOCAL_TZ`].
///
/// `2026-03-17T01:30:00Z` is still the evening of 2026-03-16 locally.
pub fn local_calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&LOCAL_TZ).date_naive()
}

/// Convenience wrapper: parse `timestamp` and return its local calendar day.
pub fn local_calendar_day_of(timestamp: &str) -> Option<NaiveDate> {
    parse_timestamp(timestamp).map(local_calendar_day)
}

/// `true` for Saturday and Sunday.
pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A day counts for scoring unless it falls on a weekend or a holiday.
pub fn is_business_day(day: NaiveDate, holidays: &HolidaySet) -> bool {
    !is_weekend(day) && !holidays.contains(day)
}

/// Monday of the ISO week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
