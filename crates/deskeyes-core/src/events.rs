use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{Achievement, AchievementId, Rarity};
use crate::progress::ExerciseLog;

/// Every state change the tracker makes produces an Event.
/// The UI layer uses them to drive its one-shot notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ExerciseCompleted {
        exercise_id: String,
        title: String,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: AchievementId,
        title: String,
        rarity: Rarity,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn completed(log: &ExerciseLog) -> Self {
        Event::ExerciseCompleted {
            exercise_id: log.id.clone(),
            title: log.title.clone(),
            duration_secs: log.duration,
            at: log.completed_at,
        }
    }

    pub fn unlocked(achievement: &Achievement, at: DateTime<Utc>) -> Self {
        Event::AchievementUnlocked {
            id: achievement.id,
            title: achievement.title.to_string(),
            rarity: achievement.rarity,
            at,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::ExerciseCompleted { at, .. } | Event::AchievementUnlocked { at, .. } => *at,
        }
    }
}
