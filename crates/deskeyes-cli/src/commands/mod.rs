pub mod achievements;
pub mod config;
pub mod goal;
pub mod log;
pub mod stats;

use std::sync::Arc;

use chrono::Local;
use deskeyes_core::storage::StorageBackend;
use deskeyes_core::{
    Config, Event, KeyValueStore, MemoryStore, SqliteStore, Tracker, UserSettings,
};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Where the effective daily goal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSource {
    Config,
    Settings,
}

/// The `memory` backend starts empty on every invocation; nothing it holds
/// outlives the process.
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(config.database_path()?)?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

pub fn daily_goal(config: &Config, store: &dyn KeyValueStore) -> (u32, GoalSource) {
    match config.goals.daily_goal_override {
        Some(goal) => (goal, GoalSource::Config),
        None => (UserSettings::load(store).daily_goal, GoalSource::Settings),
    }
}

/// Open the configured store and hydrate a tracker from it.
///
/// Also returns the events of the evaluation run during hydration, since a
/// lowered goal or a new day can unlock achievements before anything is logged.
pub fn open_tracker(config: &Config) -> Result<(Tracker, Vec<Event>), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let (goal, source) = daily_goal(config, store.as_ref());
    tracing::debug!(backend = ?config.storage.backend, goal, ?source, "opening tracker");
    let mut tracker = Tracker::new(store, goal);
    let events = tracker.hydrate(&Local::now());
    Ok((tracker, events))
}
