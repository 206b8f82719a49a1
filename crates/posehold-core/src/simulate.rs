//! Synthetic landmark source for demos, benches and tests.
//!
//! Produces a canonical pose for a challenge with per-landmark jitter, random
//! dropped frames, and occasional multi-frame "slumps" where the pose breaks.
//! Seeded, so a given option set always yields the same stream.

use crate::frame::{Landmark, PoseFrame};
use crate::landmarks::*;
use crate::presets::Challenge;
use fastrand::Rng;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct SyntheticOptions {
    #[builder(default = 42)]
    pub seed: u64,
    /// Maximum per-axis landmark jitter, in normalised units.
    #[builder(default = 0.005)]
    pub wobble: f32,
    /// Probability that a tick produces no frame at all.
    #[builder(default = 0.0)]
    pub dropout: f32,
    /// Probability per tick of starting a slump.
    #[builder(default = 0.0)]
    pub slump_probability: f32,
    /// Length of a slump, in frames.
    #[builder(default = 12)]
    pub slump_frames: usize,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct SyntheticFrames {
    challenge: Challenge,
    opts: SyntheticOptions,
    rng: Rng,
    slump_remaining: usize,
}

impl SyntheticFrames {
    pub fn new(challenge: Challenge, opts: SyntheticOptions) -> Self {
        Self {
            challenge,
            rng: Rng::with_seed(opts.seed),
            opts,
            slump_remaining: 0,
        }
    }

    /// Next tick's observation; `None` models a dropped frame.
    pub fn next_frame(&mut self) -> Option<PoseFrame> {
        if self.slump_remaining > 0 {
            self.slump_remaining -= 1;
        } else if self.opts.slump_probability > 0.0
            && self.rng.f32() < self.opts.slump_probability
        {
            self.slump_remaining = self.opts.slump_frames;
        }

        if self.opts.dropout > 0.0 && self.rng.f32() < self.opts.dropout {
            return None;
        }

        let mut frame = if self.slump_remaining > 0 {
            broken_pose(self.challenge)
        } else {
            ideal_pose(self.challenge)
        };

        if self.opts.wobble > 0.0 {
            let w = self.opts.wobble;
            for lm in frame.landmarks.iter_mut() {
                lm.x += (self.rng.f32() * 2.0 - 1.0) * w;
                lm.y += (self.rng.f32() * 2.0 - 1.0) * w;
            }
        }

        Some(frame)
    }
}

impl Iterator for SyntheticFrames {
    type Item = Option<PoseFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_frame())
    }
}

fn place(points: &[(usize, f32, f32)]) -> PoseFrame {
    let mut landmarks = vec![Landmark::new(0.5, 0.5).with_visibility(0.9); LANDMARK_COUNT];
    for &(idx, x, y) in points {
        landmarks[idx] = Landmark::new(x, y).with_visibility(0.95);
    }
    PoseFrame::new(landmarks)
}

/// A textbook instance of the challenge's pose.
pub fn ideal_pose(challenge: Challenge) -> PoseFrame {
    match challenge {
        // Side view, head to the left, resting on forearms.
        Challenge::Plank => place(&[
            (NOSE, 0.22, 0.48),
            (LEFT_SHOULDER, 0.30, 0.50),
            (RIGHT_SHOULDER, 0.30, 0.50),
            (LEFT_ELBOW, 0.30, 0.65),
            (RIGHT_ELBOW, 0.30, 0.65),
            (LEFT_WRIST, 0.18, 0.65),
            (RIGHT_WRIST, 0.18, 0.65),
            (LEFT_HIP, 0.50, 0.50),
            (RIGHT_HIP, 0.50, 0.50),
            (LEFT_KNEE, 0.62, 0.50),
            (RIGHT_KNEE, 0.62, 0.50),
            (LEFT_ANKLE, 0.75, 0.50),
            (RIGHT_ANKLE, 0.75, 0.50),
        ]),
        // Front view, standing, arms straight out to the sides.
        Challenge::CrossPose => place(&[
            (NOSE, 0.50, 0.20),
            (LEFT_SHOULDER, 0.60, 0.30),
            (RIGHT_SHOULDER, 0.40, 0.30),
            (LEFT_ELBOW, 0.72, 0.30),
            (RIGHT_ELBOW, 0.28, 0.30),
            (LEFT_WRIST, 0.84, 0.30),
            (RIGHT_WRIST, 0.16, 0.30),
            (LEFT_HIP, 0.60, 0.60),
            (RIGHT_HIP, 0.40, 0.60),
            (LEFT_KNEE, 0.60, 0.78),
            (RIGHT_KNEE, 0.40, 0.78),
            (LEFT_ANKLE, 0.60, 0.95),
            (RIGHT_ANKLE, 0.40, 0.95),
        ]),
    }
}

/// The most common way users fall out of the pose.
pub fn broken_pose(challenge: Challenge) -> PoseFrame {
    let mut frame = ideal_pose(challenge);
    match challenge {
        Challenge::Plank => {
            for idx in [LEFT_HIP, RIGHT_HIP] {
                frame.landmarks[idx].y += 0.12;
            }
        }
        Challenge::CrossPose => {
            frame.landmarks[LEFT_ELBOW] = Landmark::new(0.66, 0.40).with_visibility(0.95);
            frame.landmarks[RIGHT_ELBOW] = Landmark::new(0.34, 0.40).with_visibility(0.95);
            frame.landmarks[LEFT_WRIST] = Landmark::new(0.70, 0.50).with_visibility(0.95);
            frame.landmarks[RIGHT_WRIST] = Landmark::new(0.30, 0.50).with_visibility(0.95);
        }
    }
    frame
}
