//! Exercise history and the statistics derived from it.
//!
//! [`ProgressStore`] owns the completion log and its persisted blob. The log
//! is newest-first and never holds more than [`HISTORY_CAP`] entries.

mod stats;

pub use stats::{compute_stats, day_key, Stats, STREAK_CAP_DAYS, WEEKLY_WINDOW_DAYS};

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, PROGRESS_KEY};

/// Maximum number of completions kept.
pub const HISTORY_CAP: usize = 200;

/// One finished exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    /// Exercise identifier; shared by every completion of that exercise.
    pub id: String,
    /// Display name at completion time.
    pub title: String,
    /// Planned duration in seconds.
    pub duration: u32,
    pub completed_at: DateTime<Utc>,
}

impl ExerciseLog {
    pub fn minutes(&self) -> f64 {
        f64::from(self.duration) / 60.0
    }
}

/// A completion before it is stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompletion {
    pub id: String,
    pub title: String,
    pub duration: u32,
}

impl NewCompletion {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration,
        }
    }
}

/// Completion history backed by a [`KeyValueStore`].
///
/// Mutations apply to memory first; the write-back is best effort and a
/// failed write only produces a warning.
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
    logs: Vec<ExerciseLog>,
    ready: bool,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            logs: Vec::new(),
            ready: false,
        }
    }

    /// Hydrate from the store. Absent or corrupt data yields an empty history.
    pub fn load(&mut self) {
        self.logs = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => parse_logs(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read progress storage");
                Vec::new()
            }
        };
        self.ready = true;
        tracing::debug!(entries = self.logs.len(), "progress loaded");
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Record a completion at `now` and persist the whole history.
    pub fn add_completion(&mut self, entry: NewCompletion, now: DateTime<Utc>) -> ExerciseLog {
        let log = ExerciseLog {
            id: entry.id,
            title: entry.title,
            duration: entry.duration,
            completed_at: now,
        };
        self.logs.insert(0, log.clone());
        self.logs.truncate(HISTORY_CAP);
        self.persist();
        log
    }

    /// Newest first.
    pub fn logs(&self) -> &[ExerciseLog] {
        &self.logs
    }

    pub fn stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Stats {
        compute_stats(&self.logs, now)
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.logs) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize progress");
                return;
            }
        };
        match self.store.set(PROGRESS_KEY, &json) {
            Ok(()) => tracing::debug!(entries = self.logs.len(), "progress saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save progress"),
        }
    }
}

/// Malformed entries are dropped one by one; only an unreadable blob empties
/// the history.
fn parse_logs(raw: &str) -> Vec<ExerciseLog> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse progress storage");
            return Vec::new();
        }
    };

    let mut logs: Vec<ExerciseLog> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed progress entry");
                None
            }
        })
        .collect();
    logs.truncate(HISTORY_CAP);
    logs
}
