//! Achievement catalog and unlock engine.
//!
//! - [`CATALOG`]: the twelve built-in milestones, each a pure predicate
//! - [`AchievementStats`]: the per-evaluation view the predicates read
//! - [`AchievementEngine`]: the persisted unlocked-set and the unlock pass

pub mod catalog;
mod engine;
mod view;

pub use catalog::{find, find_by_str, Achievement, AchievementId, Rarity, CATALOG};
pub use engine::{AchievementEngine, AchievementStatus, Progress, CELEBRATION_WINDOW_SECS};
pub use view::{AchievementStats, EARLY_BEFORE_HOUR, LATE_FROM_HOUR};
