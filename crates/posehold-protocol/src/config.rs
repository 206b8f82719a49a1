use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};

/// Everything needed to run one exercise challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    pub name: String,
    pub pose: PoseSpec,
    #[serde(default)]
    pub session: SessionParams,
    pub reward: RewardSchedule,
}

impl ChallengeConfig {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The criteria that make up a target pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSpec {
    pub name: String,
    /// `overall_confidence` must be strictly above this to pass.
    pub acceptance_threshold: f32,
    /// Landmarks reporting a visibility below this count as missing.
    #[serde(default = "default_min_visibility")]
    pub min_visibility: f32,
    pub criteria: Vec<CriterionSpec>,
}

fn default_min_visibility() -> f32 {
    0.5
}

impl PoseSpec {
    pub fn total_weight(&self) -> f32 {
        self.criteria.iter().map(|c| c.weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub name: String,
    pub weight: f32,
    /// Minimum sub-score this criterion must reach on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_gate: Option<f32>,
    pub kind: CriterionKind,
}

/// Geometric checks a criterion can run against a frame.
///
/// Angles are in degrees. Every sub-score falls off linearly from 1.0 to 0.0
/// as the measured deviation grows from zero to the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CriterionKind {
    /// Shoulder-hip-ankle angle against a straight line.
    BodyAlignment { tolerance_deg: f32 },
    /// Shoulder-elbow-wrist angle inside `[min_deg, max_deg]`.
    ElbowAngle {
        min_deg: f32,
        max_deg: f32,
        tolerance_deg: f32,
    },
    /// Hip distance from the shoulder-ankle line, relative to that line's length.
    HipSag { max_ratio: f32 },
    /// Hip-knee-ankle angle against a straight line.
    LegStraightness { tolerance_deg: f32 },
    /// Shoulder-to-ankle axis against the horizontal.
    HorizontalOrientation { tolerance_deg: f32 },
    /// Shoulder-to-wrist segments against the shoulder line.
    ArmExtension { tolerance_deg: f32 },
    /// Shoulder-to-hip axis against the vertical.
    TorsoUpright { tolerance_deg: f32 },
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Number of recent frames kept in the stability window.
    #[arg(long, default_value_t = 8)]
    pub window_size: usize,
    /// Consecutive stable windows required before the pose counts as held.
    #[arg(long, default_value_t = 15)]
    pub hold_threshold: usize,
    /// Fraction of the window that must pass for it to be stable.
    #[arg(long, default_value_t = 0.75)]
    pub quorum: f32,
    #[arg(long, default_value_t = 3)]
    pub preparation_seconds: u32,
    #[arg(long, default_value_t = 30.0)]
    pub target_seconds: f32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            window_size: 8,
            hold_threshold: 15,
            quorum: 0.75,
            preparation_seconds: 3,
            target_seconds: 30.0,
        }
    }
}

impl SessionParams {
    /// Number of passing frames the window needs to be considered stable.
    #[inline(always)]
    pub fn quorum_count(&self) -> usize {
        (self.quorum * self.window_size as f32).ceil() as usize
    }

    /// Overlays only the values that were given explicitly on the command line.
    pub fn merge_from_cli(&mut self, cli: &SessionParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(window_size);
        update_if_present!(hold_threshold);
        update_if_present!(quorum);
        update_if_present!(preparation_seconds);
        update_if_present!(target_seconds);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Coins per second of held pose.
    pub rate: f32,
    #[serde(default)]
    pub bonus: BonusSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BonusSchedule {
    #[default]
    None,
    /// `floor(mean_confidence * scale)`
    Scaled { scale: f32 },
    /// `round(mean_confidence * 100 / divisor)`
    Rounded { divisor: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, 0.75, 6)]
    #[case(4, 0.75, 3)]
    #[case(10, 0.75, 8)]
    #[case(5, 1.0, 5)]
    #[case(3, 0.1, 1)]
    fn test_quorum_count(#[case] window: usize, #[case] quorum: f32, #[case] expected: usize) {
        let params = SessionParams {
            window_size: window,
            quorum,
            ..Default::default()
        };
        assert_eq!(params.quorum_count(), expected);
    }

    #[test]
    fn test_criterion_kind_tagging() {
        let json = r#"{"name":"elbows","weight":0.2,"kind":{"type":"elbow_angle","min_deg":70.0,"max_deg":110.0,"tolerance_deg":30.0}}"#;
        let spec: CriterionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.hard_gate, None);
        assert!(matches!(spec.kind, CriterionKind::ElbowAngle { min_deg, .. } if min_deg == 70.0));
    }

    #[test]
    fn test_bonus_defaults_to_none() {
        let schedule: RewardSchedule = serde_json::from_str(r#"{"rate":2.0}"#).unwrap();
        assert_eq!(schedule.bonus, BonusSchedule::None);
    }

    #[test]
    fn test_session_params_partial_json() {
        let params: SessionParams = serde_json::from_str(r#"{"target_seconds":45.0}"#).unwrap();
        assert_eq!(params.target_seconds, 45.0);
        assert_eq!(params.window_size, 8);
        assert_eq!(params.hold_threshold, 15);
    }
}
