//! Construction-time checks for challenge configuration.

use crate::config::{
    BonusSchedule, ChallengeConfig, CriterionKind, PoseSpec, RewardSchedule, SessionParams,
};
use crate::consts::{MAX_HOLD_WINDOW_MULTIPLE, MAX_WINDOW_SIZE, WEIGHT_SUM_TOLERANCE};
use crate::error::{PhResult, PoseHoldError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> PhResult<()>;
}

fn config_err<T>(msg: String) -> PhResult<T> {
    Err(PoseHoldError::Config(msg))
}

fn is_unit(v: f32) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl Validate for ChallengeConfig {
    fn validate(&self) -> PhResult<()> {
        if self.name.trim().is_empty() {
            return config_err("challenge name is empty".into());
        }
        self.pose.validate()?;
        self.session.validate()?;
        self.reward.validate()
    }
}

impl Validate for PoseSpec {
    fn validate(&self) -> PhResult<()> {
        if self.criteria.is_empty() {
            return config_err(format!("pose '{}' has no criteria", self.name));
        }
        if !is_unit(self.acceptance_threshold) || self.acceptance_threshold >= 1.0 {
            return config_err(format!(
                "acceptance_threshold {} must be in [0, 1)",
                self.acceptance_threshold
            ));
        }
        if !is_unit(self.min_visibility) {
            return config_err(format!(
                "min_visibility {} must be in [0, 1]",
                self.min_visibility
            ));
        }

        let mut seen = HashSet::new();
        for c in &self.criteria {
            if c.name.trim().is_empty() {
                return config_err("criterion name is empty".into());
            }
            if !seen.insert(c.name.as_str()) {
                return config_err(format!("duplicate criterion '{}'", c.name));
            }
            if !is_unit(c.weight) {
                return config_err(format!(
                    "criterion '{}' weight {} must be in [0, 1]",
                    c.name, c.weight
                ));
            }
            if let Some(gate) = c.hard_gate {
                if !is_unit(gate) {
                    return config_err(format!(
                        "criterion '{}' hard gate {} must be in [0, 1]",
                        c.name, gate
                    ));
                }
            }
            validate_kind(&c.name, &c.kind)?;
        }

        let total = self.total_weight();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return config_err(format!(
                "criterion weights of '{}' sum to {:.4}, expected 1.0",
                self.name, total
            ));
        }

        Ok(())
    }
}

fn validate_kind(name: &str, kind: &CriterionKind) -> PhResult<()> {
    let tolerance = match *kind {
        CriterionKind::BodyAlignment { tolerance_deg }
        | CriterionKind::LegStraightness { tolerance_deg }
        | CriterionKind::HorizontalOrientation { tolerance_deg }
        | CriterionKind::ArmExtension { tolerance_deg }
        | CriterionKind::TorsoUpright { tolerance_deg } => tolerance_deg,
        CriterionKind::ElbowAngle {
            min_deg,
            max_deg,
            tolerance_deg,
        } => {
            if !(min_deg.is_finite() && max_deg.is_finite()) || min_deg > max_deg {
                return config_err(format!(
                    "criterion '{}' angle range [{}, {}] is invalid",
                    name, min_deg, max_deg
                ));
            }
            tolerance_deg
        }
        CriterionKind::HipSag { max_ratio } => max_ratio,
    };

    if !is_positive(tolerance) {
        return config_err(format!(
            "criterion '{}' tolerance {} must be positive",
            name, tolerance
        ));
    }
    Ok(())
}

impl Validate for SessionParams {
    fn validate(&self) -> PhResult<()> {
        if self.window_size == 0 {
            return config_err("window_size must be at least 1".into());
        }
        if self.window_size > MAX_WINDOW_SIZE {
            return config_err(format!(
                "window_size {} exceeds the maximum of {}",
                self.window_size, MAX_WINDOW_SIZE
            ));
        }
        if !(self.quorum.is_finite() && self.quorum > 0.0 && self.quorum <= 1.0) {
            return config_err(format!("quorum {} must be in (0, 1]", self.quorum));
        }
        if self.hold_threshold == 0 {
            return config_err("hold_threshold must be at least 1".into());
        }
        let Some(limit) = self.window_size.checked_mul(MAX_HOLD_WINDOW_MULTIPLE) else {
            return config_err(format!("window_size {} is too large", self.window_size));
        };
        if self.hold_threshold > limit {
            return config_err(format!(
                "hold_threshold {} is unreachable for window_size {} (limit {})",
                self.hold_threshold, self.window_size, limit
            ));
        }
        if !is_positive(self.target_seconds) {
            return config_err(format!(
                "target_seconds {} must be positive",
                self.target_seconds
            ));
        }
        Ok(())
    }
}

impl Validate for RewardSchedule {
    fn validate(&self) -> PhResult<()> {
        if !(self.rate.is_finite() && self.rate >= 0.0) {
            return config_err(format!("reward rate {} must be non-negative", self.rate));
        }
        match self.bonus {
            BonusSchedule::None => Ok(()),
            BonusSchedule::Scaled { scale } if scale.is_finite() && scale >= 0.0 => Ok(()),
            BonusSchedule::Scaled { scale } => {
                config_err(format!("bonus scale {} must be non-negative", scale))
            }
            BonusSchedule::Rounded { divisor } if is_positive(divisor) => Ok(()),
            BonusSchedule::Rounded { divisor } => {
                config_err(format!("bonus divisor {} must be positive", divisor))
            }
        }
    }
}
