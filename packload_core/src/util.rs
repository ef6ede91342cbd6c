//! Small numeric helpers shared across the engines.

/// Round to 2 decimal places, the precision every user-facing kilogram or
/// percentage figure carries. Non-finite values pass through unchanged.
#[inline]
#[must_use]
pub fn round2(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    (x * 100.0).round() / 100.0
}
