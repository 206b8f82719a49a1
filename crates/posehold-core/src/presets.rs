use crate::config::{
    BonusSchedule, ChallengeConfig, CriterionKind, CriterionSpec, PoseSpec, RewardSchedule,
    SessionParams,
};
use clap::ValueEnum;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The challenges that ship with the app.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, ValueEnum, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Challenge {
    Plank,
    CrossPose,
}

impl Challenge {
    pub fn config(&self) -> ChallengeConfig {
        match self {
            Self::Plank => plank(),
            Self::CrossPose => cross_pose(),
        }
    }

    pub fn all() -> Vec<Challenge> {
        Challenge::iter().collect()
    }
}

fn criterion(name: &str, weight: f32, hard_gate: Option<f32>, kind: CriterionKind) -> CriterionSpec {
    CriterionSpec {
        name: name.to_string(),
        weight,
        hard_gate,
        kind,
    }
}

fn plank() -> ChallengeConfig {
    ChallengeConfig {
        name: "plank".to_string(),
        pose: PoseSpec {
            name: "forearm_plank".to_string(),
            acceptance_threshold: 0.7,
            min_visibility: 0.5,
            criteria: vec![
                criterion(
                    "body_alignment",
                    0.30,
                    Some(0.4),
                    CriterionKind::BodyAlignment { tolerance_deg: 30.0 },
                ),
                criterion(
                    "elbow_angle",
                    0.15,
                    None,
                    CriterionKind::ElbowAngle {
                        min_deg: 70.0,
                        max_deg: 110.0,
                        tolerance_deg: 30.0,
                    },
                ),
                // A straight-legged frame with a collapsed hip must not pass.
                criterion(
                    "hip_sag",
                    0.25,
                    Some(0.3),
                    CriterionKind::HipSag { max_ratio: 0.15 },
                ),
                criterion(
                    "leg_straightness",
                    0.15,
                    None,
                    CriterionKind::LegStraightness { tolerance_deg: 30.0 },
                ),
                criterion(
                    "horizontal_orientation",
                    0.15,
                    Some(0.3),
                    CriterionKind::HorizontalOrientation { tolerance_deg: 35.0 },
                ),
            ],
        },
        session: SessionParams::default(),
        reward: RewardSchedule {
            rate: 2.0,
            bonus: BonusSchedule::None,
        },
    }
}

fn cross_pose() -> ChallengeConfig {
    ChallengeConfig {
        name: "cross_pose".to_string(),
        pose: PoseSpec {
            name: "standing_cross".to_string(),
            acceptance_threshold: 0.7,
            min_visibility: 0.5,
            criteria: vec![
                criterion(
                    "arm_position",
                    0.5,
                    Some(0.6),
                    CriterionKind::ArmExtension { tolerance_deg: 25.0 },
                ),
                criterion(
                    "elbow_extension",
                    0.2,
                    None,
                    CriterionKind::ElbowAngle {
                        min_deg: 160.0,
                        max_deg: 180.0,
                        tolerance_deg: 30.0,
                    },
                ),
                criterion(
                    "position_stability",
                    0.3,
                    None,
                    CriterionKind::TorsoUpright { tolerance_deg: 20.0 },
                ),
            ],
        },
        session: SessionParams {
            target_seconds: 20.0,
            ..SessionParams::default()
        },
        reward: RewardSchedule {
            rate: 1.0,
            bonus: BonusSchedule::Rounded { divisor: 5.0 },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;
    use std::str::FromStr;

    #[test]
    fn test_presets_are_valid() {
        for c in Challenge::all() {
            c.config().validate().unwrap_or_else(|e| panic!("{} invalid: {}", c, e));
        }
    }

    #[test]
    fn test_preset_names_round_trip() {
        for c in Challenge::iter() {
            assert_eq!(<Challenge as FromStr>::from_str(&c.to_string()).unwrap(), c);
            assert_eq!(c.config().name, c.to_string());
        }
    }
}
