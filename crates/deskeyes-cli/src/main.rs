use clap::{Parser, Subcommand};
use deskeyes_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "deskeyes", version, about = "DeskEyes CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exercise history
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Streak and goal statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Achievements and unlock progress
    Achievements {
        #[command(subcommand)]
        action: commands::achievements::AchievementsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show the effective daily goal
    Goal,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Log { action } => commands::log::run(action, &config),
        Commands::Stats { json } => commands::stats::run(json, &config),
        Commands::Achievements { action } => commands::achievements::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Goal => commands::goal::run(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
