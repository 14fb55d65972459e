use chrono::Local;
use deskeyes_core::format::format_minutes;
use deskeyes_core::Config;

use super::{open_tracker, CmdResult};

pub fn run(json: bool, config: &Config) -> CmdResult {
    let (tracker, _) = open_tracker(config)?;
    let now = Local::now();
    let stats = tracker.stats(&now);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "Today:   {} min in {} session(s), goal {} min",
        format_minutes(stats.today_minutes),
        stats.today_sessions,
        tracker.daily_goal()
    );
    println!("Week:    {} min", format_minutes(stats.weekly_minutes));
    println!("Total:   {} min", format_minutes(stats.total_minutes));
    println!("Streak:  {} day(s)", stats.streak_days);
    match stats.last_activity {
        Some(at) => println!("Last:    {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
        None => println!("Last:    never"),
    }
    Ok(())
}
