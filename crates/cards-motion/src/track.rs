#![forbid(unsafe_code)]

//! Track: a chain of keyframe segments over an interpolable value.
//!
//! A [`Track`] starts at an initial value and walks through keyframes, each
//! reached over its own [`Timing`]. Segment *n + 1* starts the moment segment
//! *n* resolves, and any time left over from the tick that finished segment
//! *n* is carried into *n + 1*.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use cards_motion::{Timing, Track};
//!
//! let ms = Duration::from_millis;
//! let mut track = Track::new(0.0_f64)
//!     .then(Timing::linear(ms(100)), 10.0)
//!     .then(Timing::linear(ms(100)), -10.0);
//!
//! let crossed = track.advance(ms(150));
//! assert_eq!(crossed, 0..1);
//! assert!((track.value() - 0.0).abs() < 1e-9);
//! ```
//!
//! # Invariants
//!
//! 1. `advance` returns the range of segment indices that completed during
//!    that call (possibly empty, possibly several).
//! 2. After completion `value()` equals the last keyframe exactly.
//! 3. `finish()` snaps to the last keyframe without running time.
//! 4. An empty track is complete from the start.

use std::ops::Range;
use std::time::Duration;

use kurbo::{Affine, Vec2};

use crate::Animation;
use crate::tween::{Timing, Tween};

/// Values that can be linearly interpolated.
///
/// `t` is not clamped: spring curves extrapolate past 1.0 to overshoot.
pub trait Lerp: Clone {
    /// Interpolate from `self` toward `to` by `t`.
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        *self + (*to - *self) * t
    }
}

impl Lerp for Affine {
    /// Coefficient-wise interpolation.
    fn lerp(&self, to: &Self, t: f64) -> Self {
        let a = self.as_coeffs();
        let b = to.as_coeffs();
        let mut out = [0.0; 6];
        for (i, c) in out.iter_mut().enumerate() {
            *c = a[i].lerp(&b[i], t);
        }
        Self::new(out)
    }
}

#[derive(Debug, Clone)]
struct Segment<V> {
    to: V,
    tween: Tween,
}

/// A keyframe chain.
#[derive(Debug, Clone)]
pub struct Track<V> {
    origin: V,
    from: V,
    value: V,
    segments: Vec<Segment<V>>,
    current: usize,
    overshoot: Duration,
}

impl<V: Lerp> Track<V> {
    /// Create a track resting at `origin` with no segments.
    #[must_use]
    pub fn new(origin: V) -> Self {
        Self {
            from: origin.clone(),
            value: origin.clone(),
            origin,
            segments: Vec::new(),
            current: 0,
            overshoot: Duration::ZERO,
        }
    }

    /// Append a keyframe reached over `timing` (builder pattern).
    #[must_use]
    pub fn then(mut self, timing: Timing, to: V) -> Self {
        self.push(timing, to);
        self
    }

    /// Append a keyframe reached over `timing`.
    pub fn push(&mut self, timing: Timing, to: V) {
        self.segments.push(Segment {
            to,
            tween: Tween::new(timing),
        });
    }

    /// Advance by `dt`, returning the indices of segments that completed.
    pub fn advance(&mut self, dt: Duration) -> Range<usize> {
        let start = self.current;
        let mut remaining = dt;
        while let Some(segment) = self.segments.get_mut(self.current) {
            segment.tween.tick(remaining);
            if !segment.tween.is_complete() {
                self.value = self.from.lerp(&segment.to, segment.tween.value());
                self.overshoot = Duration::ZERO;
                break;
            }
            remaining = segment.tween.overshoot();
            self.from = segment.to.clone();
            self.value = segment.to.clone();
            self.overshoot = remaining;
            self.current += 1;
        }
        start..self.current
    }

    /// Jump to the last keyframe, returning the segments skipped over.
    pub fn finish(&mut self) -> Range<usize> {
        let start = self.current;
        if let Some(last) = self.segments.last() {
            self.from = last.to.clone();
            self.value = last.to.clone();
        }
        self.current = self.segments.len();
        self.overshoot = Duration::ZERO;
        start..self.current
    }

    /// Current interpolated value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The value the track ends at.
    #[must_use]
    pub fn final_value(&self) -> &V {
        self.segments.last().map_or(&self.origin, |s| &s.to)
    }

    /// Index of the segment currently playing.
    #[inline]
    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.current
    }

    /// Number of segments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the track has no segments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segment durations.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.segments.iter().map(|s| s.tween.timing().duration).sum()
    }

    fn elapsed(&self) -> Duration {
        self.segments
            .iter()
            .map(|s| s.tween.elapsed().min(s.tween.timing().duration))
            .sum()
    }
}

impl<V: Lerp> Animation for Track<V> {
    fn tick(&mut self, dt: Duration) {
        let _ = self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.current >= self.segments.len()
    }

    /// Overall time progress across all segments.
    fn value(&self) -> f64 {
        let total = self.total_duration();
        if total.is_zero() || self.is_complete() {
            return 1.0;
        }
        (self.elapsed().as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        for segment in &mut self.segments {
            segment.tween.reset();
        }
        self.from = self.origin.clone();
        self.value = self.origin.clone();
        self.current = 0;
        self.overshoot = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        if self.is_complete() {
            self.overshoot
        } else {
            Duration::ZERO
        }
    }
}
