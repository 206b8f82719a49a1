pub mod criteria;
pub mod types;

pub use self::types::{CriterionScore, FrameScore};
use crate::config::PoseSpec;
use crate::error::PhResult;
use crate::frame::PoseFrame;
use crate::validation::Validate;

/// Turns one observation into a `FrameScore`.
///
/// Implementations must be pure: the same frame always yields the same score.
pub trait FrameScorer {
    fn score(&self, frame: &PoseFrame) -> FrameScore;

    /// Score used for ticks where the vision collaborator produced nothing.
    fn empty_score(&self) -> FrameScore {
        FrameScore::default()
    }
}

/// Geometric scorer driven by a `PoseSpec`.
#[derive(Debug, Clone)]
pub struct LandmarkScorer {
    pub spec: PoseSpec,
}

impl LandmarkScorer {
    pub fn new(spec: PoseSpec) -> PhResult<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }
}

impl FrameScorer for LandmarkScorer {
    fn score(&self, frame: &PoseFrame) -> FrameScore {
        let min_vis = self.spec.min_visibility;
        let mut scores = Vec::with_capacity(self.spec.criteria.len());

        for c in &self.spec.criteria {
            match criteria::evaluate(&c.kind, frame, min_vis) {
                Some(s) => scores.push(s),
                None => return FrameScore::degraded(&self.spec),
            }
        }

        FrameScore::from_criteria(&self.spec, &scores)
    }

    fn empty_score(&self) -> FrameScore {
        FrameScore::degraded(&self.spec)
    }
}
