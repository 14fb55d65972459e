use deskeyes_core::Config;

use super::{daily_goal, open_store, CmdResult, GoalSource};

pub fn run(config: &Config) -> CmdResult {
    let store = open_store(config)?;
    let (goal, source) = daily_goal(config, store.as_ref());
    let source = match source {
        GoalSource::Config => "config",
        GoalSource::Settings => "settings",
    };
    println!("{goal} min/day ({source})");
    Ok(())
}
