#![forbid(unsafe_code)]

//! Motion: time-based animation primitives for the card stack.
//!
//! # Role
//! `cards-motion` knows nothing about cards. It provides the building blocks
//! the stack sequencer composes into drag cancels, throw-outs, reflows,
//! shakes and flips:
//!
//! - [`Curve`]: easing curves, including a duration-bound [`SpringCurve`].
//! - [`Tween`]: a progress value driven by a [`Timing`] (duration + curve).
//! - [`Track`]: a chain of keyframe segments over any [`Lerp`] value, where
//!   each segment starts when the previous one resolves.
//!
//! Everything is advanced explicitly with `tick(dt)`; there is no clock and
//! no thread. Hosts drive it from their frame callback, tests drive it with
//! fixed steps.

pub mod easing;
pub mod spring;
pub mod track;
pub mod tween;

use std::time::Duration;

pub use easing::{Curve, EasingFn, ease_in, ease_in_out, ease_out, linear};
pub use spring::SpringCurve;
pub use track::{Lerp, Track};
pub use tween::{Timing, Tween};

/// A time-driven animation.
///
/// `value()` is a normalized progress, usually in [0.0, 1.0]; spring curves
/// may overshoot past 1.0 before settling.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current (eased) value.
    fn value(&self) -> f64;

    /// Rewind to the initial state.
    fn reset(&mut self);

    /// Time that elapsed past the end on the last tick.
    ///
    /// Sequencers forward this into the next step so chained animations do
    /// not drift with frame size.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}
