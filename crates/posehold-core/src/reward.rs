use crate::config::{BonusSchedule, RewardSchedule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResult {
    pub total_coins: u32,
    pub base_coins: u32,
    pub bonus_coins: u32,
    pub duration_seconds: f32,
}

/// Converts a finished hold into coins. Pure; persisting is the caller's job.
#[derive(Debug, Clone, Copy)]
pub struct RewardCalculator {
    schedule: RewardSchedule,
}

impl RewardCalculator {
    pub fn new(schedule: RewardSchedule) -> Self {
        Self { schedule }
    }

    pub fn compute(&self, elapsed_hold_seconds: f32, confidence_history: &[f32]) -> RewardResult {
        if !elapsed_hold_seconds.is_finite() || elapsed_hold_seconds <= 0.0 {
            return RewardResult::default();
        }

        let base_coins = to_coins((elapsed_hold_seconds * self.schedule.rate).floor());
        let mean = mean(confidence_history);
        let bonus_coins = match self.schedule.bonus {
            BonusSchedule::None => 0,
            BonusSchedule::Scaled { scale } => to_coins((mean * scale).floor()),
            BonusSchedule::Rounded { divisor } => to_coins((mean * 100.0 / divisor).round()),
        };

        RewardResult {
            total_coins: base_coins.saturating_add(bonus_coins),
            base_coins,
            bonus_coins,
            duration_seconds: elapsed_hold_seconds,
        }
    }
}

fn mean(values: &[f32]) -> f32 {
    let finite = values.iter().filter(|v| v.is_finite());
    let (sum, n) = finite.fold((0.0f32, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

#[inline(always)]
fn to_coins(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v as u32
    } else {
        0
    }
}
