use crate::reports::{self, RunSummary};
use clap::{ArgMatches, Args};
use posehold_core::clock::TickClock;
use posehold_core::config::{ChallengeConfig, SessionParams};
use posehold_core::events::EventLog;
use posehold_core::presets::Challenge;
use posehold_core::session::SessionState;
use posehold_core::simulate::{SyntheticFrames, SyntheticOptions};
use posehold_core::trace::{SessionOutcome, SessionTrace};
use posehold_core::{PhResult, PoseHoldError, SessionController};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionParams,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    /// Maximum landmark jitter per frame.
    #[arg(long, default_value_t = 0.005)]
    pub wobble: f32,

    /// Probability that a tick delivers no frame.
    #[arg(long, default_value_t = 0.0)]
    pub dropout: f32,

    /// Probability per tick that the pose breaks for a few frames.
    #[arg(long, default_value_t = 0.0)]
    pub slump: f32,

    /// Stop after this many simulated seconds even if not completed.
    #[arg(long, default_value_t = 120)]
    pub max_seconds: u64,

    /// Save the generated frames as a replayable trace.
    #[arg(long)]
    pub record: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Picks the preset whose synthetic frames match the config being run.
///
/// An explicit `--challenge` wins, but it must agree with a config that names
/// a built-in challenge.
fn frame_preset(config: &ChallengeConfig, explicit: Option<Challenge>) -> PhResult<Challenge> {
    let named = Challenge::from_str(&config.name).ok();
    match (explicit, named) {
        (Some(flag), Some(named)) if flag != named => Err(PoseHoldError::Config(format!(
            "config '{}' does not match --challenge {}",
            config.name, flag
        ))),
        (Some(challenge), _) | (None, Some(challenge)) => Ok(challenge),
        (None, None) => Err(PoseHoldError::Config(format!(
            "no synthetic frames for '{}'; pass --challenge to pick a preset",
            config.name
        ))),
    }
}

pub fn run(
    args: &SimulateArgs,
    mut config: ChallengeConfig,
    explicit: Option<Challenge>,
    matches: &ArgMatches,
) -> PhResult<()> {
    config.session.merge_from_cli(&args.session, matches);
    let challenge = frame_preset(&config, explicit)?;

    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    let opts = SyntheticOptions::builder()
        .seed(seed)
        .wobble(args.wobble)
        .dropout(args.dropout)
        .slump_probability(args.slump)
        .build();

    // Validates the merged session parameters.
    let mut ctrl = SessionController::new(config.clone(), EventLog::new())?;
    let mut frames = SyntheticFrames::new(challenge, opts);
    let mut trace = args.record.as_ref().map(|_| SessionTrace::new(config.clone()));
    let mut clock = TickClock::new();

    let tick_ms = args.tick_ms.max(1);
    let max_ticks = args.max_seconds.saturating_mul(1000) / tick_ms;
    info!(
        "🎲 Simulating '{}' on {} frames (seed {}, {} ms ticks)",
        config.name, challenge, seed, tick_ms
    );

    ctrl.start();
    let mut ticks = 0;
    for i in 0..max_ticks {
        let timestamp_ms = i * tick_ms;
        let frame = frames.next_frame();
        if let Some(t) = trace.as_mut() {
            t.push(timestamp_ms, frame.clone());
        }

        ticks += 1;
        if ctrl.tick(frame.as_ref(), clock.advance(timestamp_ms)) == SessionState::Completed {
            break;
        }
    }

    if ctrl.state() != SessionState::Completed {
        warn!(
            "⚠️  Gave up after {}s in state '{}'",
            args.max_seconds,
            ctrl.state()
        );
    }

    if let (Some(path), Some(trace)) = (&args.record, &trace) {
        trace.save_to_file(path)?;
        info!("💾 Recorded {} ticks to {}", trace.ticks.len(), path.display());
    }

    let outcome = SessionOutcome::of(&ctrl, ticks);
    let summary = RunSummary::new(&config, &outcome);
    reports::print_run(&summary, ctrl.sink(), args.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_preset_follows_config_name() {
        let config = Challenge::CrossPose.config();
        assert_eq!(frame_preset(&config, None).unwrap(), Challenge::CrossPose);
        assert_eq!(
            frame_preset(&config, Some(Challenge::CrossPose)).unwrap(),
            Challenge::CrossPose
        );
    }

    #[test]
    fn test_frame_preset_rejects_mismatch() {
        let config = Challenge::CrossPose.config();
        let err = frame_preset(&config, Some(Challenge::Plank)).unwrap_err();
        assert!(matches!(err, PoseHoldError::Config(_)));
    }

    #[test]
    fn test_custom_config_needs_explicit_challenge() {
        let mut config = Challenge::Plank.config();
        config.name = "wall_plank".into();
        assert!(frame_preset(&config, None).is_err());
        assert_eq!(
            frame_preset(&config, Some(Challenge::Plank)).unwrap(),
            Challenge::Plank
        );
    }
}
