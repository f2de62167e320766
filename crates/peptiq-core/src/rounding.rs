//! Decimal rounding rules
//!
//! Scores are published with two decimals using "round half up" (ties go
//! towards positive infinity). Every crate rounds through these functions so
//! the published numbers are identical wherever they are computed.

/// Round `value` to `decimals` places, ties towards positive infinity.
///
/// Non-finite values are returned unchanged.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor + 0.5).floor() / factor;
    // floor() can produce -0.0 for tiny negatives; publish a plain zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Two-decimal rounding used for scores, confidence and components
pub fn round2(value: f64) -> f64 {
    round_half_up(value, 2)
}

/// One-decimal rounding used for trend figures
pub fn round1(value: f64) -> f64 {
    round_half_up(value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_basic() {
        assert_eq!(round2(59.4), 59.4);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(-9.0), -9.0);
    }

    #[test]
    fn test_ties_go_up() {
        // 0.125 and 0.375 are exact in binary, so these are true ties
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.2);
    }

    #[test]
    fn test_no_negative_zero() {
        let r = round2(-0.001);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }
}
