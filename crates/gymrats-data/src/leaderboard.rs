//! Daily leaderboard, daily winners and weekly champions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gymrats_core::models::{round_to, DailyWinner, LeaderboardRow, ScoringCheckIn, WeeklyChampion};
use gymrats_core::time_utils::week_start;

/// Decimal places kept on point sums to absorb float noise.
const POINTS_DECIMALS: i32 = 6;

/// Group key: `(period, account_id, full_name)`.
type MemberKey = (NaiveDate, i64, String);

/// Dense ranks for `values`, highest value first.
///
/// Equal values share a rank and the next distinct value gets the next
/// integer, so ranks never have gaps.
pub fn dense_rank_desc(values: &[f64]) -> Vec<u32> {
    let mut distinct: Vec<f64> = values.to_vec();
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup();

    values
        .iter()
        .map(|v| {
            distinct
                .iter()
                .position(|d| d == v)
                .map_or(0, |pos| pos as u32 + 1)
        })
        .collect()
}

/// Stateless helper that ranks members per day and per week.
pub struct LeaderboardAggregator;

impl LeaderboardAggregator {
    /// Sum each member's points per calendar day and rank them.
    ///
    /// Sorted by `(calendar_day, rank, full_name)`.
    pub fn daily_leaderboard(check_ins: &[ScoringCheckIn]) -> Vec<LeaderboardRow> {
        let totals = sum_by_member(
            check_ins
                .iter()
                .map(|c| ((c.calendar_day, c.account_id, c.full_name.clone()), c.points)),
        );

        let mut rows: Vec<LeaderboardRow> = rank_within_period(totals)
            .into_iter()
            .map(|((day, account_id, full_name), points_day, rank)| LeaderboardRow {
                calendar_day: day,
                account_id,
                full_name,
                points_day,
                rank,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.calendar_day
                .cmp(&b.calendar_day)
                .then(a.rank.cmp(&b.rank))
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        rows
    }

    /// Rank-1 rows of each day, flagged as a tie when a day has several.
    ///
    /// Sorted by `(calendar_day, winner_full_name)`.
    pub fn daily_winners(leaderboard: &[LeaderboardRow]) -> Vec<DailyWinner> {
        let top: Vec<&LeaderboardRow> = leaderboard.iter().filter(|r| r.rank == 1).collect();

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for row in &top {
            *per_day.entry(row.calendar_day).or_default() += 1;
        }

        let mut winners: Vec<DailyWinner> = top
            .into_iter()
            .map(|row| DailyWinner {
                calendar_day: row.calendar_day,
                winner_full_name: row.full_name.clone(),
                winner_points_day: row.points_day,
                tie: per_day.get(&row.calendar_day).copied().unwrap_or(0) > 1,
            })
            .collect();

        winners.sort_by(|a, b| {
            a.calendar_day
                .cmp(&b.calendar_day)
                .then_with(|| a.winner_full_name.cmp(&b.winner_full_name))
        });
        winners
    }

    /// Top member(s) of each ISO week by summed `points_day`.
    ///
    /// Sorted by `(week_start, champion_full_name)`.
    pub fn weekly_champions(leaderboard: &[LeaderboardRow]) -> Vec<WeeklyChampion> {
        let totals = sum_by_member(leaderboard.iter().map(|r| {
            (
                (week_start(r.calendar_day), r.account_id, r.full_name.clone()),
                r.points_day,
            )
        }));

        let top: Vec<(MemberKey, f64)> = rank_within_period(totals)
            .into_iter()
            .filter(|(_, _, rank)| *rank == 1)
            .map(|(key, points, _)| (key, points))
            .collect();

        let mut per_week: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for ((week, _, _), _) in &top {
            *per_week.entry(*week).or_default() += 1;
        }

        let mut champions: Vec<WeeklyChampion> = top
            .into_iter()
            .map(|((week, _, full_name), points)| WeeklyChampion {
                week_start: week,
                champion_full_name: full_name,
                champion_points_week: points,
                rank_week: 1,
                tie: per_week.get(&week).copied().unwrap_or(0) > 1,
            })
            .collect();

        champions.sort_by(|a, b| {
            a.week_start
                .cmp(&b.week_start)
                .then_with(|| a.champion_full_name.cmp(&b.champion_full_name))
        });
        champions
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Sum points per key in input order, then round.
fn sum_by_member(items: impl Iterator<Item = (MemberKey, f64)>) -> BTreeMap<MemberKey, f64> {
    let mut map: BTreeMap<MemberKey, f64> = BTreeMap::new();
    for (key, points) in items {
        *map.entry(key).or_insert(0.0) += points;
    }
    for total in map.values_mut() {
        *total = round_to(*total, POINTS_DECIMALS);
    }
    map
}

/// Dense-rank members independently within each period (the first key part).
fn rank_within_period(totals: BTreeMap<MemberKey, f64>) -> Vec<(MemberKey, f64, u32)> {
    let mut by_period: BTreeMap<NaiveDate, Vec<(MemberKey, f64)>> = BTreeMap::new();
    for (key, total) in totals {
        by_period.entry(key.0).or_default().push((key, total));
    }

    by_period
        .into_values()
        .flat_map(|group| {
            let values: Vec<f64> = group.iter().map(|(_, v)| *v).collect();
            let ranks = dense_rank_desc(&values);
            group
                .into_iter()
                .zip(ranks)
                .map(|((key, total), rank)| (key, total, rank))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
