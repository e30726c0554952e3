//! Normalization of raw gesture values.

/// Divisor applied to pinch factors above 1 (zooming in).
const PINCH_UP_DIVISOR: f64 = 100.0;

/// Divisor applied to pinch factors at or below 1 (zooming out).
const PINCH_DOWN_DIVISOR: f64 = 50.0;

/// Convert a raw pinch factor into a multiplicative zoom delta.
///
/// Zooming in yields `1 + raw / 100`, zooming out `1 - raw / 50`. The curve
/// is asymmetric and not continuous at 1; these are tuning constants kept for
/// behavioural compatibility. Non-finite or non-positive input yields `1.0`.
pub fn pinch_zoom_factor(raw_scale: f64) -> f64 {
    if !raw_scale.is_finite() || raw_scale <= 0.0 {
        return 1.0;
    }

    if raw_scale > 1.0 {
        1.0 + raw_scale / PINCH_UP_DIVISOR
    } else {
        1.0 - raw_scale / PINCH_DOWN_DIVISOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pinch_out_zooms_in() {
        assert_relative_eq!(pinch_zoom_factor(2.0), 1.02);
        assert_relative_eq!(pinch_zoom_factor(1.5), 1.015);
    }

    #[test]
    fn test_pinch_in_zooms_out() {
        assert_relative_eq!(pinch_zoom_factor(0.5), 0.99);
        assert_relative_eq!(pinch_zoom_factor(1.0), 0.98);
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(pinch_zoom_factor(0.0), 1.0);
        assert_eq!(pinch_zoom_factor(-2.0), 1.0);
        assert_eq!(pinch_zoom_factor(f64::NAN), 1.0);
        assert_eq!(pinch_zoom_factor(f64::INFINITY), 1.0);
    }
}
