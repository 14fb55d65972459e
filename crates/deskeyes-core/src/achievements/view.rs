use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Timelike};

use crate::progress::{ExerciseLog, Stats};

/// Hour before which a session today counts as early.
pub const EARLY_BEFORE_HOUR: u32 = 8;
/// Hour from which a session today counts as late.
pub const LATE_FROM_HOUR: u32 = 22;

/// Everything an achievement condition may look at.
///
/// Built fresh for every evaluation from the history, its [`Stats`] and the
/// externally supplied daily goal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementStats {
    pub total_exercises: usize,
    pub streak_days: u32,
    pub today_sessions: u32,
    pub today_minutes: f64,
    pub weekly_minutes: f64,
    pub logs: Vec<ExerciseLog>,
    pub completed_exercise_ids: HashSet<String>,
    pub has_early_exercise: bool,
    pub has_late_exercise: bool,
    /// Minutes per day.
    pub daily_goal: u32,
}

impl AchievementStats {
    /// Assemble the view as of `now`; hours are read in `now`'s time zone.
    pub fn build<Tz: TimeZone>(
        logs: &[ExerciseLog],
        stats: &Stats,
        daily_goal: u32,
        now: &DateTime<Tz>,
    ) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        // Anything from local midnight onward counts as today.
        let local_hours_today = logs.iter().filter_map(|log| {
            let local = log.completed_at.with_timezone(&tz);
            (local.date_naive() >= today).then(|| local.hour())
        });

        let mut has_early_exercise = false;
        let mut has_late_exercise = false;
        for hour in local_hours_today {
            has_early_exercise |= hour < EARLY_BEFORE_HOUR;
            has_late_exercise |= hour >= LATE_FROM_HOUR;
        }

        Self {
            total_exercises: logs.len(),
            streak_days: stats.streak_days,
            today_sessions: stats.today_sessions,
            today_minutes: stats.today_minutes,
            weekly_minutes: stats.weekly_minutes,
            logs: logs.to_vec(),
            completed_exercise_ids: logs.iter().map(|log| log.id.clone()).collect(),
            has_early_exercise,
            has_late_exercise,
            daily_goal,
        }
    }
}
