use serde::{Deserialize, Serialize};

/// A single body keypoint in normalised image coordinates.
///
/// `x` grows to the right and `y` grows downward, both nominally in 0..1.
/// `z` is the detector's relative depth and is ignored by the 2D criteria.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// A landmark without a visibility weight is trusted.
    #[inline(always)]
    pub fn is_visible(&self, min_visibility: f32) -> bool {
        match self.visibility {
            Some(v) => v >= min_visibility,
            None => true,
        }
    }

    #[inline(always)]
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// One observation from the pose-estimation collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Returns the landmark at `index` if present and visible enough.
    #[inline(always)]
    pub fn get(&self, index: usize, min_visibility: f32) -> Option<&Landmark> {
        self.landmarks
            .get(index)
            .filter(|lm| lm.is_visible(min_visibility))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_visibility_is_trusted() {
        let lm = Landmark::new(0.5, 0.5);
        assert!(lm.is_visible(0.99));
    }

    #[test]
    fn test_get_filters_occluded() {
        let frame = PoseFrame::new(vec![
            Landmark::new(0.1, 0.1).with_visibility(0.2),
            Landmark::new(0.2, 0.2).with_visibility(0.9),
        ]);
        assert!(frame.get(0, 0.5).is_none());
        assert!(frame.get(1, 0.5).is_some());
        assert!(frame.get(2, 0.5).is_none());
    }

    #[test]
    fn test_frame_json_defaults() {
        let frame: PoseFrame = serde_json::from_str(r#"{"landmarks":[{"x":0.1,"y":0.2}]}"#).unwrap();
        assert_eq!(frame.landmarks[0].z, 0.0);
        assert_eq!(frame.landmarks[0].visibility, None);
    }
}
