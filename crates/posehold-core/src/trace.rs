//! Recorded sessions: a config plus timestamped frames, replayable offline.

use crate::clock::TickClock;
use crate::config::ChallengeConfig;
use crate::controller::SessionController;
use crate::error::{PhResult, PoseHoldError};
use crate::events::SessionSink;
use crate::scorer::FrameScorer;
use crate::frame::PoseFrame;
use crate::reward::RewardResult;
use crate::session::SessionState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceTick {
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<PoseFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTrace {
    pub config: ChallengeConfig,
    pub ticks: Vec<TraceTick>,
}

/// Where a driven session ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub final_state: SessionState,
    pub elapsed_seconds: f32,
    pub reward: Option<RewardResult>,
    pub ticks_consumed: usize,
}

impl SessionOutcome {
    pub fn of<K: SessionSink, S: FrameScorer>(
        controller: &SessionController<K, S>,
        ticks_consumed: usize,
    ) -> Self {
        Self {
            final_state: controller.state(),
            elapsed_seconds: controller.session().elapsed_seconds(),
            reward: controller.reward(),
            ticks_consumed,
        }
    }
}

impl SessionTrace {
    pub fn new(config: ChallengeConfig) -> Self {
        Self {
            config,
            ticks: Vec::new(),
        }
    }

    pub fn push(&mut self, timestamp_ms: u64, frame: Option<PoseFrame>) {
        self.ticks.push(TraceTick {
            timestamp_ms,
            frame,
        });
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PhResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let trace: SessionTrace = serde_json::from_str(&content)?;
        if trace.ticks.is_empty() {
            return Err(PoseHoldError::Validation(format!(
                "trace '{}' contains no ticks",
                path.as_ref().display()
            )));
        }
        Ok(trace)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PhResult<()> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Starts a fresh session and feeds it every recorded tick in order.
    ///
    /// Stops early once the session completes.
    pub fn replay<K: SessionSink>(&self, sink: K) -> PhResult<(SessionOutcome, K)> {
        let mut controller = SessionController::new(self.config.clone(), sink)?;
        let mut clock = TickClock::new();
        let mut consumed = 0;

        controller.start();
        for tick in &self.ticks {
            let dt = clock.advance(tick.timestamp_ms);
            consumed += 1;
            if controller.tick(tick.frame.as_ref(), dt) == SessionState::Completed {
                break;
            }
        }

        info!(
            "Replayed {} of {} ticks for '{}'",
            consumed,
            self.ticks.len(),
            self.config.name
        );

        let outcome = SessionOutcome::of(&controller, consumed);
        Ok((outcome, controller.into_sink()))
    }
}
