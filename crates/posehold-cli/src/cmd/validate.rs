use crate::reports;
use clap::Args;
use posehold_core::config::ChallengeConfig;
use posehold_core::fingerprint::ConfigFingerprint;
use posehold_core::loader::save_config;
use posehold_core::presets::Challenge;
use posehold_core::validation::Validate;
use posehold_core::PhResult;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Check every built-in preset instead of a single configuration.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Write the resolved configuration to this path as JSON.
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

pub fn run(args: &ValidateArgs, config: &ChallengeConfig) -> PhResult<()> {
    audit(config);

    if let Some(path) = &args.export {
        save_config(config, path)?;
        info!("💾 Wrote '{}' to {}", config.name, path.display());
    }
    Ok(())
}

pub fn run_all() -> PhResult<()> {
    for challenge in Challenge::all() {
        let config = challenge.config();
        config.validate()?;
        audit(&config);
    }
    Ok(())
}

fn audit(config: &ChallengeConfig) {
    let fp = ConfigFingerprint::of(config);
    println!("\n🔎 === CHALLENGE AUDIT: {} === 🔎", config.name);
    println!("fingerprint: {}", fp);

    reports::print_criteria_report(&config.pose);
    reports::print_session_report(config);
}
