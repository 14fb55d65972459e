use chrono::Local;
use clap::Subcommand;
use deskeyes_core::format::format_duration;
use deskeyes_core::{Config, Event, NewCompletion};

use super::{open_tracker, CmdResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a completed exercise
    Add {
        /// Exercise id (e.g. "blink-reset")
        id: String,
        /// Display title
        title: String,
        /// Planned duration in seconds
        duration: u32,
        /// Print the resulting events as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recorded exercises, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LogAction, config: &Config) -> CmdResult {
    let (mut tracker, mut events) = open_tracker(config)?;

    match action {
        LogAction::Add {
            id,
            title,
            duration,
            json,
        } => {
            let entry = NewCompletion::new(id, title, duration);
            events.extend(tracker.record(entry, &Local::now()));
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
                return Ok(());
            }
            for event in &events {
                match event {
                    Event::ExerciseCompleted {
                        title,
                        duration_secs,
                        ..
                    } => println!("Logged: {title} ({})", format_duration(*duration_secs)),
                    Event::AchievementUnlocked { title, rarity, .. } => {
                        println!("Unlocked: {title} [{}]", rarity.label())
                    }
                }
            }
        }
        LogAction::List { limit, json } => {
            let logs = tracker.progress().logs();
            let logs = &logs[..limit.unwrap_or(logs.len()).min(logs.len())];
            if json {
                println!("{}", serde_json::to_string_pretty(logs)?);
                return Ok(());
            }
            if logs.is_empty() {
                println!("No exercises recorded yet.");
            }
            for log in logs {
                println!(
                    "{}  {:<24} {}",
                    log.completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    log.title,
                    format_duration(log.duration)
                );
            }
        }
    }
    Ok(())
}
