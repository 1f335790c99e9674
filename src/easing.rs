// ============================================================================
// spark-effects - Easing
// Time curves for JS-driven animation and CSS timing functions for
// host-driven transitions
// ============================================================================

/// Cubic ease-out: fast start, gentle landing. `t` is clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Round half toward positive infinity, the rounding displayed counters use.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Tilt transition curve: snaps toward the pointer, settles slowly.
pub const TILT_TIMING: &str = "cubic-bezier(0.03, 0.98, 0.52, 0.99)";

/// Magnetic spring-back when the pointer leaves.
pub const SPRING_BACK_TIMING: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_cubic_endpoints_and_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn rounding_goes_up_on_halves() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }
}
