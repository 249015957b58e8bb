use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Members ───────────────────────────────────────────────────────────────────

/// A challenge participant as listed in an export's `members` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub account_id: i64,
    pub full_name: String,
}

/// Ordered `account_id → full_name` lookup built from one export.
///
/// Iteration order is the order in which members first appeared; a repeated
/// id keeps its original position and takes the later name.
#[derive(Debug, Clone, Default)]
pub struct MemberLookup {
    members: Vec<Member>,
    index: HashMap<i64, usize>,
}

impl MemberLookup {
    pub fn insert(&mut self, account_id: i64, full_name: impl Into<String>) {
        let full_name = full_name.into();
        match self.index.get(&account_id).copied() {
            Some(pos) => self.members[pos].full_name = full_name,
            None => {
                self.index.insert(account_id, self.members.len());
                self.members.push(Member {
                    account_id,
                    full_name,
                });
            }
        }
    }

    pub fn get(&self, account_id: i64) -> Option<&str> {
        self.index
            .get(&account_id)
            .map(|&pos| self.members[pos].full_name.as_str())
    }

    /// Display name for `account_id`, or `"account_<id>"` when unknown.
    pub fn display_name(&self, account_id: i64) -> String {
        self.get(account_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("account_{}", account_id))
    }

    /// Resolve a member by case-insensitive, whitespace-trimmed name.
    ///
    /// When several members share the normalised name the first one in
    /// lookup order wins.
    pub fn find_account_id_by_name(&self, full_name: &str) -> Option<i64> {
        let target = full_name.trim().to_lowercase();
        self.members
            .iter()
            .find(|m| m.full_name.trim().to_lowercase() == target)
            .map(|m| m.account_id)
    }

    /// Distinct member names, sorted.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.iter().map(|m| m.full_name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Member> for MemberLookup {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut lookup = MemberLookup::default();
        for m in iter {
            lookup.insert(m.account_id, m.full_name);
        }
        lookup
    }
}

// ── Activities ────────────────────────────────────────────────────────────────

/// Platform activity types that count as cardio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardioActivity {
    Running,
    Treadmill,
    MixedCardio,
    Walking,
}

impl CardioActivity {
    /// Map a `platform_activity` value; `None` for non-cardio activities.
    pub fn from_platform(name: &str) -> Option<Self> {
        match name {
            "running" => Some(Self::Running),
            "treadmill" => Some(Self::Treadmill),
            "mixed_cardio" => Some(Self::MixedCardio),
            "walking" => Some(Self::Walking),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Treadmill => "treadmill",
            Self::MixedCardio => "mixed_cardio",
            Self::Walking => "walking",
        }
    }
}

impl std::fmt::Display for CardioActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Extracted records ─────────────────────────────────────────────────────────

/// One scoring check-in on a business day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringCheckIn {
    #[serde(rename = "date")]
    pub calendar_day: NaiveDate,
    /// Raw `occurred_at` string exactly as exported.
    pub occurred_at: String,
    pub account_id: i64,
    pub full_name: String,
    pub points: f64,
    /// `"<account_id>|<occurred_at>|<points>"`.
    pub dedupe_key: String,
}

/// One cardio activity logged by the configured user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioSession {
    #[serde(rename = "date")]
    pub calendar_day: NaiveDate,
    pub start_time: Option<String>,
    pub activity: CardioActivity,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    /// Platform workout identifier, rendered as text.
    #[serde(rename = "workout_id")]
    pub external_id: Option<String>,
    pub full_name: String,
}

// ── Report rows ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    #[serde(rename = "date")]
    pub calendar_day: NaiveDate,
    pub account_id: i64,
    pub full_name: String,
    pub points_day: f64,
    /// Dense rank within the day, 1 = most points.
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWinner {
    #[serde(rename = "date")]
    pub calendar_day: NaiveDate,
    pub winner_full_name: String,
    pub winner_points_day: f64,
    /// More than one member shares first place that day.
    pub tie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChampion {
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    pub champion_full_name: String,
    pub champion_points_week: f64,
    #[serde(skip_serializing, default = "first_rank")]
    pub rank_week: u32,
    pub tie: bool,
}

fn first_rank() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCardio {
    pub week_start: NaiveDate,
    pub total_km: f64,
    pub sessions: u32,
    pub total_minutes: f64,
    /// `None` when the week's distance total is zero.
    pub avg_pace_min_per_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioProgress {
    pub week_start: NaiveDate,
    pub total_km: f64,
    pub sessions: u32,
    pub total_minutes: f64,
    pub avg_pace_min_per_km: Option<f64>,
    pub cumulative_km: f64,
    pub best_week_km_so_far: f64,
}

// ── Run summary ───────────────────────────────────────────────────────────────

/// Side artifact describing one processing run, written as `run_manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_timestamp_utc: String,
    pub processed_files_count: usize,
    pub processed_files: Vec<String>,
    pub leaderboard_rows: usize,
    pub cardio_rows: usize,
    pub winners_rows: usize,
    pub champions_rows: usize,
    pub weekly_cardio_rows: usize,
    pub progress_rows: usize,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Round to `decimals` places. Exact halves go to the even neighbour, so
/// `30.125` becomes `30.12` and `30.375` becomes `30.38`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> MemberLookup {
        vec![
            Member {
                account_id: 1,
                full_name: "Alice".to_string(),
            },
            Member {
                account_id: 2,
                full_name: "Bob".to_string(),
            },
        ]
        .into_iter()
        .collect()
    }

    // ── MemberLookup ─────────────────────────────────────────────────────────

    #[test]
    fn test_display_name_known_and_unknown() {
        let members = lookup();
        assert_eq!(members.display_name(1), "Alice");
        assert_eq!(members.display_name(42), "account_42");
    }

    #[test]
    fn test_find_account_id_case_insensitive_trimmed() {
        let members = lookup();
        assert_eq!(members.find_account_id_by_name("alice"), Some(1));
        assert_eq!(members.find_account_id_by_name("  BOB "), Some(2));
        assert_eq!(members.find_account_id_by_name("Carol"), None);
    }

    #[test]
    fn test_find_account_id_first_match_wins() {
        let mut members = MemberLookup::default();
        members.insert(7, "Sam Silva");
        members.insert(3, " sam silva");
        assert_eq!(members.find_account_id_by_name("SAM SILVA"), Some(7));
    }

    #[test]
    fn test_insert_repeated_id_keeps_position() {
        let mut members = lookup();
        members.insert(1, "Alicia");
        assert_eq!(members.len(), 2);
        assert_eq!(members.get(1), Some("Alicia"));
        assert_eq!(members.sorted_names(), vec!["Alicia", "Bob"]);
    }

    #[test]
    fn test_sorted_names_dedups() {
        let mut members = lookup();
        members.insert(3, "Alice");
        assert_eq!(members.sorted_names(), vec!["Alice", "Bob"]);
    }

    // ── CardioActivity ───────────────────────────────────────────────────────

    #[test]
    fn test_cardio_activity_mapping() {
        assert_eq!(
            CardioActivity::from_platform("mixed_cardio"),
            Some(CardioActivity::MixedCardio)
        );
        assert_eq!(CardioActivity::from_platform("strength_training"), None);
        assert_eq!(CardioActivity::from_platform("Running"), None);
        assert_eq!(CardioActivity::Treadmill.to_string(), "treadmill");
    }

    // ── round_to ─────────────────────────────────────────────────────────────

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.1 + 0.2, 6), 0.3);
        assert_eq!(round_to(2.0, 2), 2.0);
    }

    #[test]
    fn test_round_to_exact_half_goes_to_even() {
        assert_eq!(round_to(30.125, 2), 30.12);
        assert_eq!(round_to(30.375, 2), 30.38);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }

    // ── Serialization ────────────────────────────────────────────────────────

    #[test]
    fn test_champion_rank_is_not_serialized() {
        let champ = WeeklyChampion {
            week_start: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            champion_full_name: "Alice".to_string(),
            champion_points_week: 15.0,
            rank_week: 1,
            tie: false,
        };
        let json = serde_json::to_value(&champ).unwrap();
        assert!(json.get("rank_week").is_none());
        assert_eq!(json["week_start"], "2026-03-16");
    }

    #[test]
    fn test_session_serializes_output_column_names() {
        let session = CardioSession {
            calendar_day: NaiveDate::from_ymd_opt(2026, 3, 17).unwrap(),
            start_time: None,
            activity: CardioActivity::MixedCardio,
            distance_km: Some(5.0),
            duration_min: None,
            external_id: Some("999".to_string()),
            full_name: "Alice".to_string(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["date"], "2026-03-17");
        assert_eq!(json["activity"], "mixed_cardio");
        assert_eq!(json["workout_id"], "999");
    }
}
