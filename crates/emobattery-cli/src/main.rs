use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "emobattery", version, about = "Emotion Battery CLI")]
struct Cli {
    /// Database file (overrides storage.database)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Config file (default: ~/.config/emobattery/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single-day battery analysis
    Battery {
        #[command(subcommand)]
        action: commands::battery::BatteryAction,
    },
    /// Monthly averages and cache
    Month {
        #[command(subcommand)]
        action: commands::month::MonthAction,
    },
    /// Emotion record store
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "emobattery_core=debug"
    } else {
        "emobattery_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::Context::load(cli.config, cli.db)?;
    match cli.command {
        Commands::Battery { action } => commands::battery::run(&ctx, action),
        Commands::Month { action } => commands::month::run(&ctx, action),
        Commands::Record { action } => commands::record::run(&ctx, action),
        Commands::Config { action } => commands::config::run(ctx, action),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
