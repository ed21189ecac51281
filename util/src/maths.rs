//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Linearly interpolate between `start` and `end`.
///
/// `t` is not clamped, at `t == 1` the result is exactly `end`.
pub fn lerp<T>(start: T, end: T, t: T) -> T
where
    T: Float,
{
    if t == T::one() {
        return end;
    }

    start + (end - start) * t
}

/// Saturate `value` into the inclusive range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Normalised progress through a timed action, `elapsed / duration` clamped
/// into `[0, 1]`.
///
/// Elapsed time within `tolerance` of the duration counts as complete, which
/// absorbs the drift of summing many fixed-size ticks. A non-positive
/// duration is treated as already complete.
pub fn progress<T>(elapsed: T, duration: T, tolerance: T) -> T
where
    T: Float,
{
    if duration <= T::zero() || elapsed >= duration - tolerance {
        return T::one();
    }

    clamp(elapsed / duration, T::zero(), T::one())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0f64, 10f64, 0.5), 5.0);
        assert_eq!(lerp(-3f64, 7f64, 0.0), -3.0);

        // The endpoint must be hit exactly, even where the naive formula
        // would round
        assert_eq!(lerp(0.1f64, 0.7f64, 1.0), 0.7);
        assert_eq!(lerp(-179.99f64, -180f64, 1.0), -180.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f64, -1f64, 1f64), 1.0);
        assert_eq!(clamp(-5f64, -1f64, 1f64), -1.0);
        assert_eq!(clamp(0.25f64, -1f64, 1f64), 0.25);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(0.5f64, 2.0, 1e-9), 0.25);
        assert_eq!(progress(3.0f64, 2.0, 1e-9), 1.0);
        assert_eq!(progress(-1.0f64, 2.0, 1e-9), 0.0);
        assert_eq!(progress(0.0f64, 0.0, 1e-9), 1.0);

        // Fifty 20 ms ticks make a second, even though the sum drifts
        let elapsed = (0..50).fold(0f64, |acc, _| acc + 0.02);
        assert_eq!(progress(elapsed, 1.0, 1e-9), 1.0);
    }
}
