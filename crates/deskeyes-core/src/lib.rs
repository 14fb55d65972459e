//! # DeskEyes Core Library
//!
//! Exercise history, streak statistics and achievements for the DeskEyes
//! eye-care companion. UI layers (mobile app, CLI) sit on top of the same
//! in-process API.
//!
//! ## Architecture
//!
//! - **Progress**: capped, newest-first completion log and the pure
//!   [`compute_stats`] aggregation over it
//! - **Achievements**: a fixed catalog of predicates and the engine that
//!   unlocks them exactly once
//! - **Storage**: the [`KeyValueStore`] capability both stores persist
//!   through, with SQLite and in-memory backends, plus TOML configuration
//! - **Tracker**: wires the two stores together and reports [`Event`]s
//!
//! Every computation takes `now` explicitly; nothing reads the clock.

pub mod achievements;
pub mod error;
pub mod events;
pub mod format;
pub mod progress;
pub mod settings;
pub mod storage;
pub mod tracker;

pub use achievements::{
    Achievement, AchievementEngine, AchievementId, AchievementStats, AchievementStatus, Progress,
    Rarity, CATALOG,
};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use progress::{compute_stats, ExerciseLog, NewCompletion, ProgressStore, Stats, HISTORY_CAP};
pub use settings::UserSettings;
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use tracker::Tracker;
