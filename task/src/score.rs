//! Trial scoring.
//!
//! Both terms reward speed: a larger remaining radius error and a longer
//! required path are worth more when covered in less time. Needed distances
//! are the straight-line start-to-target distances, not the traveled path.

/// `elapsed_secs` must be strictly positive; the controller always
/// accumulates at least one frame interval before both locks can be set.
pub fn score(radius_diff: f32, needed_sum: f32, elapsed_secs: f32) -> f32 {
    debug_assert!(elapsed_secs > 0.0);
    (radius_diff * 3.0 / elapsed_secs) + (needed_sum / elapsed_secs)
}

/// Round to 2 decimal digits, matching the persisted table.
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
