//! Built-in achievement catalog.
//!
//! The list is fixed at build time and identical for every user. Order is
//! the declaration order used for evaluation and display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AchievementStats;

/// Identifier of a catalog entry. Serialized as the snake_case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstSteps,
    WeekWarrior,
    MonthMaster,
    CenturyClub,
    DailyGoal,
    EarlyBird,
    NightOwl,
    SpeedDemon,
    Marathon,
    Consistency,
    Explorer,
    Dedication,
}

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstSteps => "first_steps",
            AchievementId::WeekWarrior => "week_warrior",
            AchievementId::MonthMaster => "month_master",
            AchievementId::CenturyClub => "century_club",
            AchievementId::DailyGoal => "daily_goal",
            AchievementId::EarlyBird => "early_bird",
            AchievementId::NightOwl => "night_owl",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::Marathon => "marathon",
            AchievementId::Consistency => "consistency",
            AchievementId::Explorer => "explorer",
            AchievementId::Dedication => "dedication",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|a| a.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown achievement: {s}"))
    }
}

/// Cosmetic tier. Has no effect on unlocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Badge color for the tier.
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#30D158",
            Rarity::Rare => "#007AFF",
            Rarity::Epic => "#5856D6",
            Rarity::Legendary => "#FFD700",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// A catalog entry.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub rarity: Rarity,
    pub condition: fn(&AchievementStats) -> bool,
}

impl Achievement {
    pub fn is_satisfied(&self, stats: &AchievementStats) -> bool {
        (self.condition)(stats)
    }
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("rarity", &self.rarity)
            .finish_non_exhaustive()
    }
}

/// Distinct exercises needed for [`AchievementId::Explorer`].
pub const EXPLORER_DISTINCT_EXERCISES: usize = 5;

pub static CATALOG: [Achievement; 12] = [
    Achievement {
        id: AchievementId::FirstSteps,
        title: "First Steps",
        description: "Complete your first exercise",
        icon: "footsteps-outline",
        color: "#007AFF",
        rarity: Rarity::Common,
        condition: |s| s.total_exercises >= 1,
    },
    Achievement {
        id: AchievementId::WeekWarrior,
        title: "Week Warrior",
        description: "Care for your eyes 7 days in a row",
        icon: "flame",
        color: "#FF9500",
        rarity: Rarity::Rare,
        condition: |s| s.streak_days >= 7,
    },
    Achievement {
        id: AchievementId::MonthMaster,
        title: "Month Master",
        description: "30 days in a row without a break",
        icon: "trophy",
        color: "#FFD700",
        rarity: Rarity::Epic,
        condition: |s| s.streak_days >= 30,
    },
    Achievement {
        id: AchievementId::CenturyClub,
        title: "Century Club",
        description: "Complete 100 exercises",
        icon: "star",
        color: "#30D158",
        rarity: Rarity::Epic,
        condition: |s| s.total_exercises >= 100,
    },
    Achievement {
        id: AchievementId::DailyGoal,
        title: "Goal Reached",
        description: "Hit your daily goal",
        icon: "flag",
        color: "#30D158",
        rarity: Rarity::Common,
        condition: |s| s.daily_goal > 0 && s.today_minutes >= f64::from(s.daily_goal),
    },
    Achievement {
        id: AchievementId::EarlyBird,
        title: "Early Bird",
        description: "Exercise before 8 AM",
        icon: "sunny-outline",
        color: "#FF9500",
        rarity: Rarity::Rare,
        condition: |s| s.has_early_exercise,
    },
    Achievement {
        id: AchievementId::NightOwl,
        title: "Night Owl",
        description: "Exercise after 10 PM",
        icon: "moon",
        color: "#5856D6",
        rarity: Rarity::Rare,
        condition: |s| s.has_late_exercise,
    },
    Achievement {
        id: AchievementId::SpeedDemon,
        title: "Speed Demon",
        description: "5 exercises in a single day",
        icon: "flash",
        color: "#FF3B30",
        rarity: Rarity::Rare,
        condition: |s| s.today_sessions >= 5,
    },
    Achievement {
        id: AchievementId::Marathon,
        title: "Marathon",
        description: "60 minutes of exercises in a day",
        icon: "fitness",
        color: "#FF9500",
        rarity: Rarity::Epic,
        condition: |s| s.today_minutes >= 60.0,
    },
    Achievement {
        id: AchievementId::Consistency,
        title: "Consistency",
        description: "14 days in a row",
        icon: "calendar",
        color: "#007AFF",
        rarity: Rarity::Rare,
        condition: |s| s.streak_days >= 14,
    },
    Achievement {
        id: AchievementId::Explorer,
        title: "Explorer",
        description: "Try every kind of exercise",
        icon: "compass",
        color: "#5856D6",
        rarity: Rarity::Epic,
        condition: |s| s.completed_exercise_ids.len() >= EXPLORER_DISTINCT_EXERCISES,
    },
    // The streak walk stops at 30 days, so this one stays locked.
    Achievement {
        id: AchievementId::Dedication,
        title: "Dedication",
        description: "50 days in a row. Incredible!",
        icon: "heart",
        color: "#FF3B30",
        rarity: Rarity::Legendary,
        condition: |s| s.streak_days >= 50,
    },
];

/// Look up a catalog entry.
pub fn find(id: AchievementId) -> &'static Achievement {
    // CATALOG is declared in variant order.
    &CATALOG[id as usize]
}

/// Look up a catalog entry by its string id.
pub fn find_by_str(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id.as_str() == id)
}
