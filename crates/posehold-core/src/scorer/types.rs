use crate::config::PoseSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub name: String,
    pub score: f32,
    /// False when the criterion's hard gate was not met.
    pub gate_passed: bool,
}

/// The verdict for a single frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameScore {
    pub criteria: Vec<CriterionScore>,
    pub overall_confidence: f32,
    pub passes_threshold: bool,
    /// Set when required landmarks were missing and the frame was zeroed.
    #[serde(default)]
    pub degraded: bool,
}

impl FrameScore {
    /// Folds per-criterion sub-scores (in `spec.criteria` order) into a verdict.
    ///
    /// A criterion below its hard gate fails the frame no matter how high the
    /// weighted sum is. A length mismatch is treated like missing landmarks.
    pub fn from_criteria(spec: &PoseSpec, scores: &[f32]) -> Self {
        if scores.len() != spec.criteria.len() {
            return Self::degraded(spec);
        }

        let mut overall = 0.0;
        let mut gates_ok = true;
        let mut criteria = Vec::with_capacity(scores.len());

        for (c, &raw) in spec.criteria.iter().zip(scores) {
            let score = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
            let gate_passed = c.hard_gate.map_or(true, |min| score >= min);
            gates_ok &= gate_passed;
            overall += c.weight * score;
            criteria.push(CriterionScore {
                name: c.name.clone(),
                score,
                gate_passed,
            });
        }

        let overall_confidence = overall.clamp(0.0, 1.0);
        Self {
            criteria,
            overall_confidence,
            passes_threshold: gates_ok && overall_confidence > spec.acceptance_threshold,
            degraded: false,
        }
    }

    /// Zero score for a frame that could not be evaluated.
    pub fn degraded(spec: &PoseSpec) -> Self {
        Self {
            criteria: spec
                .criteria
                .iter()
                .map(|c| CriterionScore {
                    name: c.name.clone(),
                    score: 0.0,
                    gate_passed: c.hard_gate.is_none(),
                })
                .collect(),
            overall_confidence: 0.0,
            passes_threshold: false,
            degraded: true,
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.criteria.iter().find(|c| c.name == name).map(|c| c.score)
    }

    pub fn failed_gates(&self) -> impl Iterator<Item = &str> {
        self.criteria
            .iter()
            .filter(|c| !c.gate_passed)
            .map(|c| c.name.as_str())
    }
}
