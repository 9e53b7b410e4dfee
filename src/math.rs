//! Scalar helpers shared by the analysis and spawning code.

/// Re-map `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
///
/// Not clamped: inputs outside the source range extrapolate linearly.
#[inline]
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    (value - in_lo) / (in_hi - in_lo) * (out_hi - out_lo) + out_lo
}
