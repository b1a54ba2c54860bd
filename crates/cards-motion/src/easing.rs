#![forbid(unsafe_code)]

//! Easing curves.
//!
//! Plain easing functions map linear time `t` in [0.0, 1.0] to eased
//! progress. [`Curve`] wraps them (plus the spring curve) in a copyable value
//! that can be stored inside a [`Timing`](crate::Timing).
//!
//! # Invariants
//!
//! 1. Every curve maps 0.0 → 0.0 and 1.0 → 1.0.
//! 2. Input is clamped to [0.0, 1.0] before evaluation.
//! 3. Only [`Curve::Spring`] may leave [0.0, 1.0] in between.

use crate::spring::SpringCurve;

/// An easing function over normalized time.
pub type EasingFn = fn(f64) -> f64;

/// Identity easing.
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in: starts slow, accelerates.
#[inline]
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out: starts fast, decelerates.
#[inline]
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out: slow at both ends.
#[inline]
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// Timing curve of a single animation step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    /// Constant speed.
    Linear,
    /// Accelerate from rest.
    EaseIn,
    /// Decelerate to rest.
    #[default]
    EaseOut,
    /// Accelerate, then decelerate.
    EaseInOut,
    /// Damped spring that settles exactly at the end of the step.
    Spring(SpringCurve),
}

impl Curve {
    /// Spring curve with the given damping ratio (1.0 = critically damped).
    #[must_use]
    pub fn spring(damping_ratio: f64) -> Self {
        Self::Spring(SpringCurve::new(damping_ratio))
    }

    /// Evaluate the curve at normalized time `t`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => linear(t),
            Self::EaseIn => ease_in(t),
            Self::EaseOut => ease_out(t),
            Self::EaseInOut => ease_in_out(t),
            Self::Spring(spring) => spring.sample(t),
        }
    }

    /// Whether this curve can produce values above 1.0.
    #[must_use]
    pub fn can_overshoot(self) -> bool {
        matches!(self, Self::Spring(s) if s.damping_ratio() < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Curve; 4] = [Curve::Linear, Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut];

    #[test]
    fn endpoints_are_fixed() {
        for curve in CURVES {
            assert!(curve.apply(0.0).abs() < 1e-12, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-12, "{curve:?} at 1");
        }
        let spring = Curve::spring(0.6);
        assert!(spring.apply(0.0).abs() < 1e-12);
        assert!((spring.apply(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn input_is_clamped() {
        for curve in CURVES {
            assert!(curve.apply(-3.0).abs() < 1e-12);
            assert!((curve.apply(7.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ease_in_lags_and_ease_out_leads() {
        assert!(ease_in(0.25) < 0.25);
        assert!(ease_out(0.25) > 0.25);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn only_underdamped_springs_overshoot() {
        assert!(Curve::spring(0.6).can_overshoot());
        assert!(!Curve::spring(1.0).can_overshoot());
        assert!(!Curve::EaseInOut.can_overshoot());
    }
}
