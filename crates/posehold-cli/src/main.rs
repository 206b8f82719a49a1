use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use posehold_core::config::ChallengeConfig;
use posehold_core::loader::load_config;
use posehold_core::presets::Challenge;
use posehold_core::validation::Validate;
use posehold_core::PhResult;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(name = "posehold", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Built-in challenge to use when no --config file is given.
    #[arg(global = true, long, value_enum, default_value_t = Challenge::Plank)]
    challenge: Challenge,

    /// Challenge configuration JSON, overriding the built-in preset.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a challenge configuration and print its criteria.
    Validate(cmd::validate::ValidateArgs),
    /// Run a session against synthetic landmark frames.
    Simulate(cmd::simulate::SimulateArgs),
    /// Re-run a recorded session trace.
    Replay(cmd::replay::ReplayArgs),
}

fn resolve_config(cli: &Cli) -> PhResult<ChallengeConfig> {
    match &cli.config {
        Some(path) => load_config(path),
        None => {
            info!("📋 Using built-in '{}' preset", cli.challenge);
            let config = cli.challenge.config();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing PoseHold {}...", env!("CARGO_PKG_VERSION"));

    let sub_matches = matches.subcommand().map_or(&matches, |(_, m)| m);
    let explicit_challenge = (sub_matches.value_source("challenge")
        == Some(ValueSource::CommandLine))
    .then_some(cli.challenge);

    let result = match &cli.command {
        Commands::Validate(args) => {
            if args.all {
                cmd::validate::run_all()
            } else {
                resolve_config(&cli).and_then(|config| cmd::validate::run(args, &config))
            }
        }
        Commands::Simulate(args) => resolve_config(&cli)
            .and_then(|config| cmd::simulate::run(args, config, explicit_challenge, sub_matches)),
        Commands::Replay(args) => cmd::replay::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
