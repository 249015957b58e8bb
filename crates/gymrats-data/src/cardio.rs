//! Weekly cardio totals and the cumulative progress series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gymrats_core::models::{round_to, CardioProgress, CardioSession, WeeklyCardio};
use gymrats_core::time_utils::week_start;

/// Running totals for one week of sessions.
#[derive(Debug, Clone, Default)]
struct WeekStats {
    km: f64,
    minutes: f64,
    sessions: u32,
}

impl WeekStats {
    /// Missing durations count as zero minutes.
    fn add_session(&mut self, distance_km: f64, duration_min: Option<f64>) {
        self.km += distance_km;
        self.minutes += duration_min.unwrap_or(0.0);
        self.sessions += 1;
    }
}

/// Minutes per kilometre rounded to 2 decimals; `None` for zero distance.
pub fn pace_min_per_km(total_minutes: f64, total_km: f64) -> Option<f64> {
    if total_km == 0.0 {
        return None;
    }
    let pace = total_minutes / total_km;
    pace.is_finite().then(|| round_to(pace, 2))
}

/// Stateless helper that rolls cardio sessions up by ISO week.
pub struct CardioAggregator;

impl CardioAggregator {
    /// Weekly distance, session count, duration and pace.
    ///
    /// Sessions without a distance are dropped before grouping, so they count
    /// toward neither distance, sessions nor minutes. Sorted by `week_start`.
    pub fn weekly_totals(sessions: &[CardioSession]) -> Vec<WeeklyCardio> {
        let mut weeks: BTreeMap<NaiveDate, WeekStats> = BTreeMap::new();

        for s in sessions {
            let Some(km) = s.distance_km else {
                continue;
            };
            weeks
                .entry(week_start(s.calendar_day))
                .or_default()
                .add_session(km, s.duration_min);
        }

        weeks
            .into_iter()
            .map(|(week, stats)| {
                let total_km = round_to(stats.km, 2);
                let total_minutes = round_to(stats.minutes, 2);
                WeeklyCardio {
                    week_start: week,
                    total_km,
                    sessions: stats.sessions,
                    total_minutes,
                    avg_pace_min_per_km: pace_min_per_km(total_minutes, total_km),
                }
            })
            .collect()
    }

    /// Attach the running distance sum and the best week so far.
    ///
    /// Input is re-sorted by `week_start`; both series are rounded to 2
    /// decimals at every step.
    pub fn progress(weekly: &[WeeklyCardio]) -> Vec<CardioProgress> {
        let mut ordered: Vec<&WeeklyCardio> = weekly.iter().collect();
        ordered.sort_by_key(|w| w.week_start);

        let mut cumulative = 0.0_f64;
        let mut best = f64::NEG_INFINITY;

        ordered
            .into_iter()
            .map(|w| {
                cumulative += w.total_km;
                best = best.max(w.total_km);
                CardioProgress {
                    week_start: w.week_start,
                    total_km: w.total_km,
                    sessions: w.sessions,
                    total_minutes: w.total_minutes,
                    avg_pace_min_per_km: w.avg_pace_min_per_km,
                    cumulative_km: round_to(cumulative, 2),
                    best_week_km_so_far: round_to(best, 2),
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
