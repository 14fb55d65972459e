//! Read-only view of the user settings blob.
//!
//! The settings screen owns and writes this blob. The engine only needs the
//! daily goal, but the whole document is parsed so missing fields pick up
//! the same defaults the settings screen uses.

use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::{KeyValueStore, SETTINGS_KEY};

/// Daily goal in minutes when nothing is configured.
pub const DEFAULT_DAILY_GOAL: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub profession: Option<String>,
    pub screen_time: Option<String>,
    /// Older builds stored a single string here.
    #[serde(deserialize_with = "string_or_list")]
    pub eye_issues: Vec<String>,
    pub age_range: Option<String>,
    /// Minutes between reminders.
    pub reminder_interval: u32,
    /// Minutes of exercise per day.
    pub daily_goal: u32,
    pub is_setup_complete: bool,
    pub notifications_enabled: bool,
    pub do_not_disturb: bool,
    pub dark_mode: bool,
    pub sound_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            profession: None,
            screen_time: None,
            eye_issues: Vec::new(),
            age_range: None,
            reminder_interval: 60,
            daily_goal: DEFAULT_DAILY_GOAL,
            is_setup_complete: false,
            notifications_enabled: true,
            do_not_disturb: false,
            dark_mode: false,
            sound_enabled: true,
        }
    }
}

impl UserSettings {
    /// Read the settings blob; absent or unreadable data yields the defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => Self::parse(&raw),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read settings");
                Self::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to parse settings");
            Self::default()
        })
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Legacy {
        List(Vec<String>),
        Single(String),
    }

    Ok(match Option::<Legacy>::deserialize(deserializer)? {
        Some(Legacy::List(list)) => list,
        Some(Legacy::Single(single)) => vec![single],
        None => Vec::new(),
    })
}
