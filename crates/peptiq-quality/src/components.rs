//! Score components
//!
//! Each function returns the unrounded contribution of one factor. Penalties
//! are zero or negative and saturate at their configured maximum.

/// Batch variance (percentage points) at which the variance penalty saturates
pub const VARIANCE_SATURATION: f64 = 5.0;

/// Milliseconds per day, for fractional elapsed-day arithmetic
const MS_PER_DAY: f64 = 86_400_000.0;

/// Purity contribution, the only positive component
pub fn purity_component(purity_percent: f64, weight: f64) -> f64 {
    purity_percent.clamp(0.0, 100.0) * weight
}

/// Penalty for a measurement above its threshold
///
/// Grows linearly from zero at the threshold to `max_penalty` at twice the
/// threshold.
pub fn threshold_penalty(value: f64, threshold: f64, max_penalty: f64) -> f64 {
    if value <= threshold {
        return 0.0;
    }
    let excess = ((value - threshold) / threshold).min(1.0);
    -(excess * max_penalty)
}

/// Penalty for inconsistent purity across a batch
pub fn variance_penalty(batch_variance: f64, max_penalty: f64) -> f64 {
    if batch_variance.is_nan() || batch_variance <= 0.0 {
        return 0.0;
    }
    let ratio = (batch_variance / VARIANCE_SATURATION).min(1.0);
    -(ratio * max_penalty)
}

/// Penalty for stale test data
///
/// Zero inside the decay window, saturating at twice the window.
pub fn time_decay_penalty(elapsed_days: f64, decay_days: f64, max_penalty: f64) -> f64 {
    if elapsed_days <= decay_days {
        return 0.0;
    }
    let ratio = ((elapsed_days - decay_days) / decay_days).min(1.0);
    -(ratio * max_penalty)
}

/// Confidence from sample size alone (unrounded)
pub fn confidence(sample_size: u32, min_sample_size: u32) -> f64 {
    if sample_size == 0 || min_sample_size == 0 {
        return 0.0;
    }
    (f64::from(sample_size) / f64::from(min_sample_size)).min(1.0)
}

/// Fractional days between two instants; negative when `to` precedes `from`
pub fn elapsed_days(from: chrono::DateTime<chrono::Utc>, to: chrono::DateTime<chrono::Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_purity_component_clamps() {
        assert_eq!(purity_component(99.0, 0.6), 99.0 * 0.6);
        assert_eq!(purity_component(120.0, 0.6), 60.0);
        assert_eq!(purity_component(-5.0, 0.6), 0.0);
    }

    #[test]
    fn test_threshold_penalty_shape() {
        assert_eq!(threshold_penalty(5.0, 5.0, 15.0), 0.0);
        assert_eq!(threshold_penalty(8.0, 5.0, 15.0), -9.0);
        assert_eq!(threshold_penalty(10.0, 5.0, 15.0), -15.0);
        assert_eq!(threshold_penalty(50.0, 5.0, 15.0), -15.0);
    }

    #[test]
    fn test_variance_penalty_saturates_at_five() {
        assert_eq!(variance_penalty(0.0, 5.0), 0.0);
        assert_eq!(variance_penalty(-1.0, 5.0), 0.0);
        assert_eq!(variance_penalty(2.5, 5.0), -2.5);
        assert_eq!(variance_penalty(5.0, 5.0), -5.0);
        assert_eq!(variance_penalty(12.0, 5.0), -5.0);
    }

    #[test]
    fn test_time_decay_penalty() {
        assert_eq!(time_decay_penalty(180.0, 180.0, 10.0), 0.0);
        assert_eq!(time_decay_penalty(270.0, 180.0, 10.0), -5.0);
        assert_eq!(time_decay_penalty(360.0, 180.0, 10.0), -10.0);
        assert_eq!(time_decay_penalty(1000.0, 180.0, 10.0), -10.0);
        assert_eq!(time_decay_penalty(-3.0, 180.0, 10.0), 0.0);
    }

    #[test]
    fn test_confidence() {
        assert_eq!(confidence(0, 3), 0.0);
        assert_eq!(confidence(3, 3), 1.0);
        assert_eq!(confidence(10, 3), 1.0);
        assert!((confidence(1, 3) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_elapsed_days_fractional() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(elapsed_days(from, from + Duration::hours(36)), 1.5);
        assert_eq!(elapsed_days(from + Duration::days(2), from), -2.0);
    }
}
