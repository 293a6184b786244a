//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Clamp a probability to `[0, 1]`, treating NaN as impossible.
#[must_use]
pub fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_clamps_to_unsigned_range() {
        assert_eq!(round_f64_to_u32(44.5), 45);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
        assert_eq!(round_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }

    #[test]
    fn probability_clamp_handles_nan() {
        assert!((clamp_probability(1.4) - 1.0).abs() < f64::EPSILON);
        assert!(clamp_probability(-0.2).abs() < f64::EPSILON);
        assert!(clamp_probability(f64::NAN).abs() < f64::EPSILON);
    }
}
