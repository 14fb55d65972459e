//! Statistics derived from the exercise history.
//!
//! Nothing here is persisted: [`compute_stats`] is re-run on every read, and
//! calendar days are taken in the time zone of the `now` passed in.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::ExerciseLog;

/// Trailing window for `weekly_minutes`, in fractional days.
///
/// A log counts while `now - completed_at <= 6.0` days, i.e. a 144-hour
/// sliding window rather than seven calendar days.
pub const WEEKLY_WINDOW_DAYS: f64 = 6.0;

/// Longest streak the walk will report.
pub const STREAK_CAP_DAYS: u32 = 30;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Aggregates over the exercise history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_minutes: f64,
    pub today_minutes: f64,
    pub today_sessions: u32,
    pub weekly_minutes: f64,
    pub streak_days: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Calendar date of `at` as seen from `tz`.
pub fn day_key<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Derive [`Stats`] from newest-first `logs` as of `now`.
pub fn compute_stats<Tz: TimeZone>(logs: &[ExerciseLog], now: &DateTime<Tz>) -> Stats {
    let tz = now.timezone();
    let today = now.date_naive();
    let now_utc = now.with_timezone(&Utc);

    let mut stats = Stats::default();
    let mut by_day: HashMap<NaiveDate, u32> = HashMap::new();

    for log in logs {
        let minutes = log.minutes();
        let day = day_key(&log.completed_at, &tz);

        stats.total_minutes += minutes;
        if day == today {
            stats.today_minutes += minutes;
            stats.today_sessions += 1;
        }

        let age_days =
            (now_utc - log.completed_at).num_milliseconds() as f64 / MS_PER_DAY;
        if age_days <= WEEKLY_WINDOW_DAYS {
            stats.weekly_minutes += minutes;
        }

        *by_day.entry(day).or_insert(0) += 1;
    }

    stats.streak_days = streak_days(&by_day, today);
    stats.last_activity = logs.first().map(|log| log.completed_at);
    stats
}

/// Consecutive active days ending today.
///
/// No activity today means no streak, however long the run up to yesterday.
fn streak_days(by_day: &HashMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for offset in 0..STREAK_CAP_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !by_day.contains_key(&day) {
            break;
        }
        streak += 1;
    }
    streak
}
