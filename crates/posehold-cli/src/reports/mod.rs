mod tables;

pub use self::tables::{criteria as print_criteria_report, session as print_session_report};

use posehold_core::config::ChallengeConfig;
use posehold_core::events::EventLog;
use posehold_core::fingerprint::ConfigFingerprint;
use posehold_core::reward::RewardResult;
use posehold_core::session::SessionState;
use posehold_core::trace::SessionOutcome;
use posehold_core::PhResult;
use serde::Serialize;

/// Machine-readable result of a simulated or replayed session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub challenge: String,
    pub fingerprint: String,
    pub final_state: SessionState,
    pub elapsed_seconds: f32,
    pub target_seconds: f32,
    pub ticks: usize,
    pub reward: Option<RewardResult>,
}

impl RunSummary {
    pub fn new(config: &ChallengeConfig, outcome: &SessionOutcome) -> Self {
        Self {
            challenge: config.name.clone(),
            fingerprint: ConfigFingerprint::of(config).hash,
            final_state: outcome.final_state,
            elapsed_seconds: outcome.elapsed_seconds,
            target_seconds: config.session.target_seconds,
            ticks: outcome.ticks_consumed,
            reward: outcome.reward,
        }
    }
}

pub fn print_run(summary: &RunSummary, log: &EventLog, json: bool) -> PhResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    tables::timeline(log);
    tables::stability(log);
    tables::reward(summary);
    Ok(())
}
