//! Planar geometry over landmark coordinates.

/// A 2D point in normalised image space.
pub type Point = (f32, f32);

/// Segments shorter than this are treated as degenerate.
const MIN_SEGMENT_LEN: f32 = 1e-6;

#[inline(always)]
pub fn euclidean_dist(a: Point, b: Point) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Interior angle at `b` formed by `a-b-c`, in degrees (0..=180).
pub fn angle_at(a: Point, b: Point, c: Point) -> Option<f32> {
    let ba = (a.0 - b.0, a.1 - b.1);
    let bc = (c.0 - b.0, c.1 - b.1);
    let la = (ba.0 * ba.0 + ba.1 * ba.1).sqrt();
    let lc = (bc.0 * bc.0 + bc.1 * bc.1).sqrt();
    if la < MIN_SEGMENT_LEN || lc < MIN_SEGMENT_LEN {
        return None;
    }

    let cos = ((ba.0 * bc.0 + ba.1 * bc.1) / (la * lc)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Smallest angle between two undirected lines, in degrees (0..=90).
pub fn line_deviation(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<f32> {
    if euclidean_dist(a1, a2) < MIN_SEGMENT_LEN || euclidean_dist(b1, b2) < MIN_SEGMENT_LEN {
        return None;
    }

    let ta = (a2.1 - a1.1).atan2(a2.0 - a1.0).to_degrees();
    let tb = (b2.1 - b1.1).atan2(b2.0 - b1.0).to_degrees();
    let diff = (ta - tb).abs().rem_euclid(180.0);
    Some(diff.min(180.0 - diff))
}

#[inline(always)]
pub fn deviation_from_horizontal(a: Point, b: Point) -> Option<f32> {
    line_deviation(a, b, (0.0, 0.0), (1.0, 0.0))
}

#[inline(always)]
pub fn deviation_from_vertical(a: Point, b: Point) -> Option<f32> {
    line_deviation(a, b, (0.0, 0.0), (0.0, 1.0))
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
pub fn point_line_distance(p: Point, a: Point, b: Point) -> Option<f32> {
    let len = euclidean_dist(a, b);
    if len < MIN_SEGMENT_LEN {
        return None;
    }
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    Some(cross.abs() / len)
}

/// Distance of `value` outside `[lo, hi]`; zero inside.
#[inline(always)]
pub fn range_deviation(value: f32, lo: f32, hi: f32) -> f32 {
    if value < lo {
        lo - value
    } else if value > hi {
        value - hi
    } else {
        0.0
    }
}

/// Linear score: 1.0 at zero deviation, 0.0 at or beyond `tolerance`.
#[inline(always)]
pub fn falloff(deviation: f32, tolerance: f32) -> f32 {
    if !deviation.is_finite() {
        return 0.0;
    }
    if tolerance <= 0.0 {
        return if deviation <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - deviation / tolerance).clamp(0.0, 1.0)
}
