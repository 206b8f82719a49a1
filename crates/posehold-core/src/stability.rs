//! Two-stage debounce over per-frame pass/fail verdicts.
//!
//! Stage one is a quorum over a ring buffer of the last `window_size` frames,
//! which absorbs single-frame detector flicker. Stage two counts consecutive
//! stable windows and only reports `Held` once `hold_threshold` is reached,
//! which rejects brief accidental alignment. The filter has no clock; it is a
//! pure function of the sequence of scores fed to it.

use crate::config::SessionParams;
use crate::scorer::FrameScore;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "progress", rename_all = "snake_case")]
pub enum StabilityEvent {
    Unstable,
    /// Fraction of `hold_threshold` accumulated so far, in (0, 1).
    Stabilizing(f32),
    Held,
}

impl StabilityEvent {
    #[inline(always)]
    pub fn is_held(&self) -> bool {
        matches!(self, StabilityEvent::Held)
    }
}

#[derive(Debug, Clone)]
pub struct StabilityFilter {
    window: VecDeque<bool>,
    window_size: usize,
    quorum_count: usize,
    hold_threshold: usize,
    passing_in_window: usize,
    hold_frame_count: usize,
}

impl StabilityFilter {
    pub fn new(window_size: usize, quorum_count: usize, hold_threshold: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window: VecDeque::with_capacity(window_size),
            window_size,
            quorum_count: quorum_count.clamp(1, window_size),
            hold_threshold: hold_threshold.max(1),
            passing_in_window: 0,
            hold_frame_count: 0,
        }
    }

    pub fn from_params(params: &SessionParams) -> Self {
        Self::new(
            params.window_size,
            params.quorum_count(),
            params.hold_threshold,
        )
    }

    pub fn ingest(&mut self, score: &FrameScore) -> StabilityEvent {
        self.ingest_pass(score.passes_threshold)
    }

    /// Pushes one verdict and returns the debounced state after it.
    pub fn ingest_pass(&mut self, passed: bool) -> StabilityEvent {
        if self.window.len() == self.window_size {
            if let Some(true) = self.window.pop_front() {
                self.passing_in_window -= 1;
            }
        }
        self.window.push_back(passed);
        if passed {
            self.passing_in_window += 1;
        }

        if self.is_rolling_stable() {
            self.hold_frame_count = self.hold_frame_count.saturating_add(1);
        } else {
            self.hold_frame_count = 0;
        }

        self.current()
    }

    /// The event the filter would report right now, without ingesting.
    pub fn current(&self) -> StabilityEvent {
        if self.hold_frame_count >= self.hold_threshold {
            StabilityEvent::Held
        } else if self.hold_frame_count > 0 {
            StabilityEvent::Stabilizing(self.hold_frame_count as f32 / self.hold_threshold as f32)
        } else {
            StabilityEvent::Unstable
        }
    }

    #[inline(always)]
    pub fn is_rolling_stable(&self) -> bool {
        self.passing_in_window >= self.quorum_count
    }

    pub fn hold_frame_count(&self) -> usize {
        self.hold_frame_count
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.passing_in_window = 0;
        self.hold_frame_count = 0;
    }
}
