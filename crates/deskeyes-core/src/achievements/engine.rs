//! Unlock evaluation and the persisted unlocked-set.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{self, Achievement, AchievementId, CATALOG};
use super::AchievementStats;
use crate::storage::{KeyValueStore, ACHIEVEMENTS_KEY};

/// How long a freshly unlocked batch stays in [`AchievementEngine::recently_unlocked`].
pub const CELEBRATION_WINDOW_SECS: i64 = 5;

/// Persisted form of one unlocked achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAchievement {
    id: String,
    unlocked_at: DateTime<Utc>,
}

/// Overall completion of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked: usize,
    pub total: usize,
    /// Rounded to the nearest integer; 0 for an empty catalog.
    pub percentage: u32,
}

impl Progress {
    pub fn new(unlocked: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (unlocked as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            unlocked,
            total,
            percentage,
        }
    }
}

/// A catalog entry together with its unlock state.
#[derive(Debug, Clone, Copy)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementStatus {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Batch surfaced for a one-shot celebration.
#[derive(Debug, Clone)]
struct Celebration {
    ids: Vec<AchievementId>,
    until: DateTime<Utc>,
}

/// Owns the unlocked-set and evaluates the catalog against it.
///
/// The lifecycle of every achievement is `locked -> unlocked`; only
/// [`reset_achievements`](Self::reset_achievements) goes back.
pub struct AchievementEngine {
    store: Arc<dyn KeyValueStore>,
    unlocked: BTreeMap<AchievementId, DateTime<Utc>>,
    celebration: Option<Celebration>,
    ready: bool,
}

impl AchievementEngine {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            unlocked: BTreeMap::new(),
            celebration: None,
            ready: false,
        }
    }

    /// Hydrate the unlocked-set. Malformed data yields an empty set.
    pub fn load(&mut self) {
        self.unlocked = match self.store.get(ACHIEVEMENTS_KEY) {
            Ok(Some(raw)) => parse_unlocked(&raw),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read achievements");
                BTreeMap::new()
            }
        };
        self.ready = true;
        tracing::debug!(unlocked = self.unlocked.len(), "achievements loaded");
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Unlock every locked achievement whose condition holds.
    ///
    /// Conditions are evaluated against the set as it was on entry; the batch
    /// is committed afterwards with one shared timestamp. Returns the ids
    /// unlocked by this call in catalog order.
    pub fn check_achievements(
        &mut self,
        stats: &AchievementStats,
        now: DateTime<Utc>,
    ) -> Vec<AchievementId> {
        let newly: Vec<AchievementId> = CATALOG
            .iter()
            .filter(|a| !self.unlocked.contains_key(&a.id))
            .filter(|a| a.is_satisfied(stats))
            .map(|a| a.id)
            .collect();

        if newly.is_empty() {
            return newly;
        }

        self.unlocked.extend(newly.iter().map(|id| (*id, now)));
        self.persist();
        self.celebration = Some(Celebration {
            ids: newly.clone(),
            until: now + Duration::seconds(CELEBRATION_WINDOW_SECS),
        });

        for id in &newly {
            tracing::info!(achievement = %id, "achievement unlocked");
        }
        newly
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains_key(&id)
    }

    pub fn unlocked_at(&self, id: AchievementId) -> Option<DateTime<Utc>> {
        self.unlocked.get(&id).copied()
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Catalog lookup by string id; `None` for ids not in the catalog.
    pub fn get_achievement(&self, id: &str) -> Option<&'static Achievement> {
        catalog::find_by_str(id)
    }

    pub fn get_progress(&self) -> Progress {
        Progress::new(self.unlocked.len(), CATALOG.len())
    }

    /// Every catalog entry in declaration order with its unlock state.
    pub fn all_achievements(&self) -> Vec<AchievementStatus> {
        CATALOG
            .iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked_at: self.unlocked_at(achievement.id),
            })
            .collect()
    }

    /// Ids of the last unlocked batch while its celebration window is open.
    pub fn recently_unlocked(&self, now: DateTime<Utc>) -> &[AchievementId] {
        match &self.celebration {
            Some(c) if now < c.until => &c.ids,
            _ => &[],
        }
    }

    pub fn clear_recently_unlocked(&mut self) {
        self.celebration = None;
    }

    /// Forget every unlock, in storage and in memory.
    ///
    /// If the stored key cannot be removed the in-memory set is kept, so the
    /// two never disagree after a reload.
    pub fn reset_achievements(&mut self) {
        match self.store.remove(ACHIEVEMENTS_KEY) {
            Ok(()) => {
                self.unlocked.clear();
                self.celebration = None;
                tracing::info!("achievements reset");
            }
            Err(e) => tracing::warn!(error = %e, "failed to reset achievements"),
        }
    }

    fn persist(&self) {
        let stored: Vec<StoredAchievement> = self
            .unlocked
            .iter()
            .map(|(id, unlocked_at)| StoredAchievement {
                id: id.as_str().to_string(),
                unlocked_at: *unlocked_at,
            })
            .collect();

        let json = match serde_json::to_string(&stored) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize achievements");
                return;
            }
        };
        match self.store.set(ACHIEVEMENTS_KEY, &json) {
            Ok(()) => tracing::debug!(unlocked = stored.len(), "achievements saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save achievements"),
        }
    }
}

fn parse_unlocked(raw: &str) -> BTreeMap<AchievementId, DateTime<Utc>> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse achievements");
            return BTreeMap::new();
        }
    };

    let mut unlocked = BTreeMap::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let entry: StoredAchievement = match serde_json::from_value(entry) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed achievement entry");
                continue;
            }
        };
        match entry.id.parse::<AchievementId>() {
            Ok(id) => {
                unlocked.insert(id, entry.unlocked_at);
            }
            Err(_) => tracing::warn!(id = %entry.id, "skipping unknown achievement"),
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{compute_stats, ExerciseLog, STREAK_CAP_DAYS};
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn engine_with(store: Arc<MemoryStore>) -> AchievementEngine {
        let mut engine = AchievementEngine::new(store);
        engine.load();
        engine
    }

    fn stats_with_total(total: usize) -> AchievementStats {
        AchievementStats {
            total_exercises: total,
            daily_goal: 10,
            ..AchievementStats::default()
        }
    }

    #[test]
    fn progress_rounds_percentage() {
        assert_eq!(Progress::new(0, 12).percentage, 0);
        assert_eq!(Progress::new(1, 12).percentage, 8);
        assert_eq!(Progress::new(6, 12).percentage, 50);
        assert_eq!(Progress::new(12, 12).percentage, 100);
        assert_eq!(Progress::new(0, 0).percentage, 0);
    }

    #[test]
    fn unlocks_once_and_persists_once() {
        let store = Arc::new(MemoryStore::new());
        let mut engine = engine_with(store.clone());
        let stats = stats_with_total(1);

        assert_eq!(engine.check_achievements(&stats, now()), vec![AchievementId::FirstSteps]);
        assert_eq!(store.write_count(), 1);

        assert!(engine.check_achievements(&stats, now()).is_empty());
        assert_eq!(store.write_count(), 1);
        assert_eq!(engine.unlocked_at(AchievementId::FirstSteps), Some(now()));
    }

    #[test]
    fn batch_shares_one_timestamp() {
        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        let stats = AchievementStats {
            total_exercises: 100,
            today_sessions: 5,
            ..AchievementStats::default()
        };
        let newly = engine.check_achievements(&stats, now());
        assert_eq!(
            newly,
            vec![
                AchievementId::FirstSteps,
                AchievementId::CenturyClub,
                AchievementId::SpeedDemon
            ]
        );
        for id in newly {
            assert_eq!(engine.unlocked_at(id), Some(now()));
        }
    }

    #[test]
    fn unlocks_survive_weaker_stats() {
        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        let busy = AchievementStats {
            total_exercises: 5,
            today_sessions: 5,
            ..AchievementStats::default()
        };
        engine.check_achievements(&busy, now());
        assert!(engine.is_unlocked(AchievementId::SpeedDemon));

        let later = now() + Duration::days(1);
        assert!(engine
            .check_achievements(&stats_with_total(5), later)
            .is_empty());
        assert!(engine.is_unlocked(AchievementId::SpeedDemon));
        assert_eq!(engine.unlocked_at(AchievementId::SpeedDemon), Some(now()));
    }

    #[test]
    fn reload_restores_unlocked_set() {
        let store = Arc::new(MemoryStore::new());
        let mut engine = engine_with(store.clone());
        engine.check_achievements(&stats_with_total(1), now());

        let reloaded = engine_with(store);
        assert!(reloaded.is_unlocked(AchievementId::FirstSteps));
        assert_eq!(reloaded.unlocked_at(AchievementId::FirstSteps), Some(now()));
        assert_eq!(reloaded.unlocked_count(), 1);
    }

    #[test]
    fn load_skips_unknown_ids_and_survives_garbage() {
        let raw = r#"[{"id":"first_steps","unlockedAt":"2024-03-01T10:00:00.000Z"},{"id":"platinum","unlockedAt":"2024-03-01T10:00:00.000Z"}]"#;
        let engine = engine_with(Arc::new(MemoryStore::new().with_entry(ACHIEVEMENTS_KEY, raw)));
        assert_eq!(engine.unlocked_count(), 1);
        assert!(engine.is_unlocked(AchievementId::FirstSteps));

        let engine = engine_with(Arc::new(MemoryStore::new().with_entry(ACHIEVEMENTS_KEY, "{oops")));
        assert!(engine.is_ready());
        assert_eq!(engine.unlocked_count(), 0);
    }

    #[test]
    fn malformed_entry_does_not_relock_the_rest() {
        let raw = r#"[
            {"id":"first_steps","unlockedAt":"2024-03-01T10:00:00.000Z"},
            {"id":"speed_demon"},
            {"id":"explorer","unlockedAt":"2024-03-02T10:00:00.000Z"}
        ]"#;
        let store = Arc::new(MemoryStore::new().with_entry(ACHIEVEMENTS_KEY, raw));
        let mut engine = engine_with(store.clone());
        assert_eq!(engine.unlocked_count(), 2);
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(engine.unlocked_at(AchievementId::FirstSteps), Some(first));
        assert!(!engine.is_unlocked(AchievementId::SpeedDemon));

        // Kept unlocks keep their original timestamps on the next evaluation.
        assert!(engine.check_achievements(&stats_with_total(1), now()).is_empty());
        assert_eq!(engine.unlocked_at(AchievementId::FirstSteps), Some(first));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn night_owl_unlocks_from_a_late_log() {
        let late = Utc.with_ymd_and_hms(2024, 3, 15, 22, 0, 0).unwrap();
        let just_before = late - Duration::minutes(1);

        for (completed_at, expected) in [(just_before, false), (late, true)] {
            let logs = vec![ExerciseLog {
                id: "blink".into(),
                title: "Blink".into(),
                duration: 30,
                completed_at,
            }];
            let view_now = completed_at + Duration::minutes(5);
            let stats = compute_stats(&logs, &view_now);
            let stats = AchievementStats::build(&logs, &stats, 10, &view_now);

            let mut engine = engine_with(Arc::new(MemoryStore::new()));
            let newly = engine.check_achievements(&stats, view_now);
            assert_eq!(newly.contains(&AchievementId::NightOwl), expected, "at {completed_at}");
        }
    }

    #[test]
    fn thirty_day_run_reaches_month_master_but_not_dedication() {
        fn daily_run(days: i64) -> AchievementStats {
            let logs: Vec<ExerciseLog> = (0..days)
                .map(|offset| ExerciseLog {
                    id: "blink".into(),
                    title: "Blink".into(),
                    duration: 60,
                    completed_at: now() - Duration::days(offset),
                })
                .collect();
            let stats = compute_stats(&logs, &now());
            AchievementStats::build(&logs, &stats, 10, &now())
        }

        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        let stats = daily_run(29);
        assert_eq!(stats.streak_days, 29);
        let newly = engine.check_achievements(&stats, now());
        assert!(newly.contains(&AchievementId::Consistency));
        assert!(!newly.contains(&AchievementId::MonthMaster));

        // A longer run still reports the capped streak.
        let stats = daily_run(45);
        assert_eq!(stats.streak_days, STREAK_CAP_DAYS);
        assert_eq!(engine.check_achievements(&stats, now()), vec![AchievementId::MonthMaster]);
        assert!(!engine.is_unlocked(AchievementId::Dedication));
    }

    #[test]
    fn celebration_window_expires() {
        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        engine.check_achievements(&stats_with_total(1), now());

        assert_eq!(engine.recently_unlocked(now()), &[AchievementId::FirstSteps]);
        assert_eq!(
            engine.recently_unlocked(now() + Duration::milliseconds(4_999)),
            &[AchievementId::FirstSteps]
        );
        assert!(engine.recently_unlocked(now() + Duration::seconds(5)).is_empty());
    }

    #[test]
    fn empty_pass_leaves_celebration_alone() {
        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        engine.check_achievements(&stats_with_total(1), now());
        engine.check_achievements(&stats_with_total(1), now() + Duration::seconds(1));
        assert_eq!(
            engine.recently_unlocked(now() + Duration::seconds(2)),
            &[AchievementId::FirstSteps]
        );

        engine.clear_recently_unlocked();
        assert!(engine.recently_unlocked(now()).is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let store = Arc::new(MemoryStore::new());
        let mut engine = engine_with(store.clone());
        engine.check_achievements(&stats_with_total(1), now());

        engine.reset_achievements();
        assert_eq!(engine.get_progress().unlocked, 0);
        assert!(!engine.is_unlocked(AchievementId::FirstSteps));
        assert!(engine.recently_unlocked(now()).is_empty());
        assert!(store.get(ACHIEVEMENTS_KEY).unwrap().is_none());

        // Locked again, so it can be earned again.
        assert_eq!(
            engine.check_achievements(&stats_with_total(1), now()),
            vec![AchievementId::FirstSteps]
        );
    }

    #[test]
    fn failed_reset_keeps_state() {
        let store = Arc::new(MemoryStore::new());
        let mut engine = engine_with(store.clone());
        engine.check_achievements(&stats_with_total(1), now());

        store.set_fail_writes(true);
        engine.reset_achievements();
        assert!(engine.is_unlocked(AchievementId::FirstSteps));
    }

    #[test]
    fn failed_write_still_unlocks_in_memory() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let mut engine = engine_with(store.clone());

        assert_eq!(
            engine.check_achievements(&stats_with_total(1), now()),
            vec![AchievementId::FirstSteps]
        );
        assert!(engine.is_unlocked(AchievementId::FirstSteps));
        assert!(store.get(ACHIEVEMENTS_KEY).unwrap().is_none());
    }

    #[test]
    fn all_achievements_lists_catalog_with_state() {
        let mut engine = engine_with(Arc::new(MemoryStore::new()));
        engine.check_achievements(&stats_with_total(1), now());

        let all = engine.all_achievements();
        assert_eq!(all.len(), 12);
        assert_eq!(all[0].achievement.id, AchievementId::FirstSteps);
        assert!(all[0].is_unlocked());
        assert!(all[1..].iter().all(|s| !s.is_unlocked()));
        assert_eq!(engine.get_progress(), Progress::new(1, 12));
    }

    #[test]
    fn get_achievement_handles_missing_ids() {
        let engine = engine_with(Arc::new(MemoryStore::new()));
        assert_eq!(
            engine.get_achievement("marathon").map(|a| a.title),
            Some("Marathon")
        );
        assert!(engine.get_achievement("does_not_exist").is_none());
    }
}
