use crate::config::CriterionKind;
use crate::consts::STRAIGHT_ANGLE_DEG;
use crate::frame::PoseFrame;
use crate::geometry::{
    angle_at, deviation_from_horizontal, deviation_from_vertical, euclidean_dist, falloff,
    line_deviation, point_line_distance, range_deviation, Point,
};
use crate::landmarks::{Side, LEFT_SHOULDER, RIGHT_SHOULDER};

/// Landmark lookup that honours the pose's visibility floor.
struct View<'a> {
    frame: &'a PoseFrame,
    min_visibility: f32,
}

impl View<'_> {
    #[inline(always)]
    fn point(&self, index: usize) -> Option<Point> {
        self.frame.get(index, self.min_visibility).map(|lm| lm.xy())
    }

    fn triple(&self, a: usize, b: usize, c: usize) -> Option<(Point, Point, Point)> {
        Some((self.point(a)?, self.point(b)?, self.point(c)?))
    }
}

/// Scores one criterion against a frame.
///
/// Side-based checks use every body side whose landmarks are present and
/// average the results, so a camera that sees only one flank still scores.
/// Returns `None` when no side has the landmarks the criterion needs.
pub fn evaluate(kind: &CriterionKind, frame: &PoseFrame, min_visibility: f32) -> Option<f32> {
    let view = View {
        frame,
        min_visibility,
    };

    match *kind {
        CriterionKind::BodyAlignment { tolerance_deg } => per_side(|s| {
            let (sh, hip, ank) = view.triple(s.shoulder(), s.hip(), s.ankle())?;
            let angle = angle_at(sh, hip, ank)?;
            Some(falloff(STRAIGHT_ANGLE_DEG - angle, tolerance_deg))
        }),
        CriterionKind::ElbowAngle {
            min_deg,
            max_deg,
            tolerance_deg,
        } => per_side(|s| {
            let (sh, el, wr) = view.triple(s.shoulder(), s.elbow(), s.wrist())?;
            let angle = angle_at(sh, el, wr)?;
            Some(falloff(range_deviation(angle, min_deg, max_deg), tolerance_deg))
        }),
        CriterionKind::HipSag { max_ratio } => per_side(|s| {
            let (sh, hip, ank) = view.triple(s.shoulder(), s.hip(), s.ankle())?;
            let offset = point_line_distance(hip, sh, ank)?;
            Some(falloff(offset / euclidean_dist(sh, ank), max_ratio))
        }),
        CriterionKind::LegStraightness { tolerance_deg } => per_side(|s| {
            let (hip, knee, ank) = view.triple(s.hip(), s.knee(), s.ankle())?;
            let angle = angle_at(hip, knee, ank)?;
            Some(falloff(STRAIGHT_ANGLE_DEG - angle, tolerance_deg))
        }),
        CriterionKind::HorizontalOrientation { tolerance_deg } => per_side(|s| {
            let sh = view.point(s.shoulder())?;
            let ank = view.point(s.ankle())?;
            Some(falloff(deviation_from_horizontal(sh, ank)?, tolerance_deg))
        }),
        CriterionKind::ArmExtension { tolerance_deg } => {
            let left = view.point(LEFT_SHOULDER)?;
            let right = view.point(RIGHT_SHOULDER)?;
            per_side(|s| {
                let sh = view.point(s.shoulder())?;
                let wr = view.point(s.wrist())?;
                let dev = line_deviation(sh, wr, left, right)?;
                Some(falloff(dev, tolerance_deg))
            })
        }
        CriterionKind::TorsoUpright { tolerance_deg } => per_side(|s| {
            let sh = view.point(s.shoulder())?;
            let hip = view.point(s.hip())?;
            Some(falloff(deviation_from_vertical(sh, hip)?, tolerance_deg))
        }),
    }
}

fn per_side<F>(f: F) -> Option<f32>
where
    F: Fn(Side) -> Option<f32>,
{
    let mut sum = 0.0;
    let mut n = 0;
    for side in Side::BOTH {
        if let Some(v) = f(side) {
            sum += v;
            n += 1;
        }
    }
    (n > 0).then(|| sum / n as f32)
}
