//! Composition of the progress store and the achievement engine.
//!
//! The tracker is the single caller of [`AchievementEngine::check_achievements`]:
//! once after both stores hydrate, and after every recorded completion.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::achievements::{self, AchievementEngine, AchievementId, AchievementStats};
use crate::events::Event;
use crate::progress::{NewCompletion, ProgressStore, Stats};
use crate::storage::KeyValueStore;

pub struct Tracker {
    progress: ProgressStore,
    achievements: AchievementEngine,
    daily_goal: u32,
}

impl Tracker {
    /// Both stores share `store`; each owns its own key.
    pub fn new(store: Arc<dyn KeyValueStore>, daily_goal: u32) -> Self {
        Self {
            progress: ProgressStore::new(store.clone()),
            achievements: AchievementEngine::new(store),
            daily_goal,
        }
    }

    /// Load both stores and run the first evaluation.
    pub fn hydrate<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<Event> {
        self.progress.load();
        self.achievements.load();
        self.evaluate(now)
    }

    pub fn is_ready(&self) -> bool {
        self.progress.is_ready() && self.achievements.is_ready()
    }

    /// Record a completion and report it along with anything it unlocked.
    pub fn record<Tz: TimeZone>(&mut self, entry: NewCompletion, now: &DateTime<Tz>) -> Vec<Event> {
        let log = self.progress.add_completion(entry, now.with_timezone(&Utc));
        let mut events = vec![Event::completed(&log)];
        events.extend(self.evaluate(now));
        events
    }

    /// Run one unlock pass over the current history.
    pub fn evaluate<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<Event> {
        let view = self.achievement_stats(now);
        let at = now.with_timezone(&Utc);
        self.achievements
            .check_achievements(&view, at)
            .into_iter()
            .map(|id| Event::unlocked(achievements::find(id), at))
            .collect()
    }

    pub fn stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Stats {
        self.progress.stats(now)
    }

    pub fn achievement_stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> AchievementStats {
        let stats = self.progress.stats(now);
        AchievementStats::build(self.progress.logs(), &stats, self.daily_goal, now)
    }

    pub fn recently_unlocked(&self, now: DateTime<Utc>) -> &[AchievementId] {
        self.achievements.recently_unlocked(now)
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut AchievementEngine {
        &mut self.achievements
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Takes effect from the next evaluation on.
    pub fn set_daily_goal(&mut self, minutes: u32) {
        self.daily_goal = minutes;
    }
}
