/// How far the criterion weights may drift from 1.0 before a pose is rejected.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Largest accepted stability window. The filter allocates one slot per frame.
pub const MAX_WINDOW_SIZE: usize = 1024;

/// `hold_threshold` may be at most this many times `window_size`; larger
/// values are rejected as an unreachable hold.
pub const MAX_HOLD_WINDOW_MULTIPLE: usize = 16;

/// Angle of a perfectly straight joint, in degrees.
pub const STRAIGHT_ANGLE_DEG: f32 = 180.0;
