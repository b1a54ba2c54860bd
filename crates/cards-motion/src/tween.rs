#![forbid(unsafe_code)]

//! Tween: eased progress over a fixed duration.
//!
//! # Invariants
//!
//! 1. `value()` is `curve(elapsed / duration)`; it is 0.0 before the first
//!    tick and exactly 1.0 once complete.
//! 2. A zero duration completes immediately (no division by zero).
//! 3. `overshoot()` reports how far the last tick went past the end.

use std::time::Duration;

use crate::Animation;
use crate::easing::Curve;

/// Duration and curve of one animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// How long the step lasts.
    pub duration: Duration,
    /// How progress is distributed over the duration.
    pub curve: Curve,
}

impl Timing {
    /// Create a timing from a duration and a curve.
    #[must_use]
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self { duration, curve }
    }

    /// Linear timing.
    #[must_use]
    pub const fn linear(duration: Duration) -> Self {
        Self::new(duration, Curve::Linear)
    }

    /// Ease-in timing.
    #[must_use]
    pub const fn ease_in(duration: Duration) -> Self {
        Self::new(duration, Curve::EaseIn)
    }

    /// Ease-out timing.
    #[must_use]
    pub const fn ease_out(duration: Duration) -> Self {
        Self::new(duration, Curve::EaseOut)
    }

    /// Ease-in-out timing.
    #[must_use]
    pub const fn ease_in_out(duration: Duration) -> Self {
        Self::new(duration, Curve::EaseInOut)
    }

    /// Spring timing that settles exactly at `duration`.
    #[must_use]
    pub fn spring(duration: Duration, damping_ratio: f64) -> Self {
        Self::new(duration, Curve::spring(damping_ratio))
    }

    /// Same curve, different duration.
    #[must_use]
    pub const fn with_duration(self, duration: Duration) -> Self {
        Self::new(duration, self.curve)
    }
}

/// Eased progress from 0.0 to 1.0 over a [`Timing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    timing: Timing,
    elapsed: Duration,
}

impl Tween {
    /// Create a tween that has not started yet.
    #[must_use]
    pub const fn new(timing: Timing) -> Self {
        Self {
            timing,
            elapsed: Duration::ZERO,
        }
    }

    /// The timing this tween runs with.
    #[inline]
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Time elapsed so far (may exceed the duration).
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Un-eased progress in [0.0, 1.0].
    #[must_use]
    pub fn linear_progress(&self) -> f64 {
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.timing.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.timing.duration
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        self.timing.curve.apply(self.linear_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.timing.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    #[test]
    fn linear_tween_tracks_time() {
        let mut tween = Tween::new(Timing::linear(MS_200));
        assert_eq!(tween.value(), 0.0);
        tween.tick(MS_100);
        assert!((tween.value() - 0.5).abs() < 1e-9);
        tween.tick(MS_100);
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tween = Tween::new(Timing::ease_out(Duration::ZERO));
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 1.0);
        assert_eq!(tween.linear_progress(), 1.0);
    }

    #[test]
    fn overshoot_is_reported() {
        let mut tween = Tween::new(Timing::linear(MS_100));
        tween.tick(Duration::from_millis(130));
        assert_eq!(tween.overshoot(), Duration::from_millis(30));
    }

    #[test]
    fn reset_rewinds() {
        let mut tween = Tween::new(Timing::ease_in(MS_100));
        tween.tick(MS_200);
        tween.reset();
        assert!(!tween.is_complete());
        assert_eq!(tween.elapsed(), Duration::ZERO);
    }

    #[test]
    fn eased_value_uses_curve() {
        let mut tween = Tween::new(Timing::ease_in(MS_200));
        tween.tick(MS_100);
        assert!((tween.value() - 0.25).abs() < 1e-9);
    }
}
