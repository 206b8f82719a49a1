#![allow(dead_code)]

use posehold_core::config::{
    BonusSchedule, ChallengeConfig, CriterionKind, CriterionSpec, PoseSpec, RewardSchedule,
    SessionParams,
};
use posehold_core::frame::{Landmark, PoseFrame};
use posehold_core::presets::Challenge;
use posehold_core::scorer::{FrameScore, FrameScorer};
use posehold_core::simulate::{broken_pose, ideal_pose};

pub const TICK: f64 = 0.1;

pub fn good_plank() -> PoseFrame {
    ideal_pose(Challenge::Plank)
}

pub fn sagging_plank() -> PoseFrame {
    broken_pose(Challenge::Plank)
}

/// Plank preset with the session/reward knobs overridden.
pub fn plank_config(
    window_size: usize,
    hold_threshold: usize,
    target_seconds: f32,
    rate: f32,
) -> ChallengeConfig {
    let mut config = Challenge::Plank.config();
    config.session = SessionParams {
        window_size,
        hold_threshold,
        target_seconds,
        ..SessionParams::default()
    };
    config.reward = RewardSchedule {
        rate,
        bonus: BonusSchedule::None,
    };
    config
}

/// A single-criterion pose, handy for scorer-agnostic tests.
pub fn single_criterion_pose() -> PoseSpec {
    PoseSpec {
        name: "probe".to_string(),
        acceptance_threshold: 0.5,
        min_visibility: 0.5,
        criteria: vec![CriterionSpec {
            name: "probe".to_string(),
            weight: 1.0,
            hard_gate: None,
            kind: CriterionKind::BodyAlignment { tolerance_deg: 30.0 },
        }],
    }
}

/// Encodes a confidence directly in the first landmark's `x`.
pub fn confidence_frame(confidence: f32) -> PoseFrame {
    PoseFrame::new(vec![Landmark::new(confidence, 0.0)])
}

/// Reads the confidence written by `confidence_frame`; passes above 0.5.
pub struct ConfidenceScorer;

impl FrameScorer for ConfidenceScorer {
    fn score(&self, frame: &PoseFrame) -> FrameScore {
        let confidence = frame.landmarks.first().map_or(0.0, |lm| lm.x.clamp(0.0, 1.0));
        FrameScore {
            criteria: Vec::new(),
            overall_confidence: confidence,
            passes_threshold: confidence > 0.5,
            degraded: false,
        }
    }
}
