use chrono::{Local, Utc};
use clap::Subcommand;
use deskeyes_core::Config;
use serde::Serialize;

use super::{open_tracker, CmdResult};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List the catalog with unlock state
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unlocked count and percentage
    Progress,
    /// Evaluate achievements against the current history
    Check,
    /// Lock every achievement again
    Reset,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AchievementRow {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    rarity: &'static str,
    is_unlocked: bool,
    unlocked_at: Option<String>,
}

pub fn run(action: AchievementsAction, config: &Config) -> CmdResult {
    // Opening the tracker already runs one evaluation pass.
    let (mut tracker, _) = open_tracker(config)?;

    match action {
        AchievementsAction::List { json } => {
            let rows: Vec<AchievementRow> = tracker
                .achievements()
                .all_achievements()
                .into_iter()
                .map(|s| AchievementRow {
                    id: s.achievement.id.as_str(),
                    title: s.achievement.title,
                    description: s.achievement.description,
                    rarity: s.achievement.rarity.label(),
                    is_unlocked: s.is_unlocked(),
                    unlocked_at: s.unlocked_at.map(|at| at.to_rfc3339()),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            for row in rows {
                let mark = if row.is_unlocked { "x" } else { " " };
                println!(
                    "[{mark}] {:<14} {:<10} {}",
                    row.title, row.rarity, row.description
                );
            }
        }
        AchievementsAction::Progress => {
            let progress = tracker.achievements().get_progress();
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        AchievementsAction::Check => {
            let now = Local::now();
            let recent = tracker.recently_unlocked(now.with_timezone(&Utc));
            if recent.is_empty() {
                println!("No new achievements.");
            }
            for id in recent {
                println!("Unlocked: {}", deskeyes_core::achievements::find(*id).title);
            }
        }
        AchievementsAction::Reset => {
            tracker.achievements_mut().reset_achievements();
            println!("achievements reset");
        }
    }
    Ok(())
}
