#![forbid(unsafe_code)]

//! Card motions: the timed animations a card can run, and what happens
//! when they finish.
//!
//! Every motion is a [`Track`] over [`CardPose`] plus a [`Completion`] that
//! the stack resolves once the track settles (or is force-finished). The
//! completion captures nothing but plain data; the stack re-resolves the
//! card by absolute index when it runs it, so a completion for a card that
//! has since been evicted is simply dropped.
//!
//! | kind      | segments                                   | timing                     |
//! |-----------|--------------------------------------------|----------------------------|
//! | cancel    | current → rest                             | 0.4s spring, damping 0.8   |
//! | throw-out | current → current + residual exit vector   | 0.2s / 0.4s / proportional |
//! | reflow    | current → rest of new depth (+ alpha)      | 0.2s ease-in               |
//! | shake     | right → left → rest                        | 0.12s, 0.2s, 0.4s spring   |
//! | flip      | squeeze x → expand x                       | 0.15s + 0.15s              |

use std::fmt;
use std::time::Duration;

use cards_motion::{Animation, Timing, Track};
use kurbo::{Affine, Vec2};

use crate::card::CardPose;
use crate::contract::SwipeAnimation;
use crate::geometry::{Direction, MAX_DRAG_ANGLE};

/// Short animations: swipe throw-out, reflow.
pub const FAST_DURATION: Duration = Duration::from_millis(200);

/// Flip duration (both halves).
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Long animations: programmatic throw-out, cancel spring.
pub const LONG_DURATION: Duration = Duration::from_millis(400);

/// Damping ratio of the cancel spring.
pub const CANCEL_DAMPING: f64 = 0.8;

/// Damping ratio of the shake's settle spring.
pub const SHAKE_DAMPING: f64 = 0.6;

/// Opacity of a card parked at the back of the stack.
pub const PARKED_ALPHA: f64 = 0.2;

/// Which animation a card is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    Cancel,
    ThrowOut,
    Reflow,
    Shake,
    Flip,
}

/// How long a throw-out takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowDuration {
    /// [`FAST_DURATION`]; used for swipes.
    Fast,
    /// [`LONG_DURATION`]; used for programmatic dismissal.
    Long,
    /// Proportional to the distance left to travel, capped at
    /// [`FAST_DURATION`]; used for the first phase of put-at-end.
    LengthDependent,
}

impl ThrowDuration {
    /// Duration for a throw that still has `residual` of `total` to go.
    #[must_use]
    pub fn resolve(self, residual: Vec2, total: Vec2) -> Duration {
        match self {
            Self::Fast => FAST_DURATION,
            Self::Long => LONG_DURATION,
            Self::LengthDependent => {
                let total = total.length();
                if total <= 0.0 || !total.is_finite() {
                    return Duration::ZERO;
                }
                let ratio = (residual.length() / total).clamp(0.0, 1.0);
                FAST_DURATION.mul_f64(ratio)
            }
        }
    }
}

/// Action the stack runs when a motion settles.
pub(crate) enum Completion {
    /// Back to `InStack`.
    Settle,
    /// Back to `InStack`, then report the card as shown.
    Shown,
    /// Thrown off-screen: evict and report the dismissal.
    ThrownOut { direction: Direction },
    /// Put-at-end card reached the exit: park it at the tail.
    ReachedExit { direction: Direction },
    /// Parked card finished fading: evict and report the dismissal.
    Parked { direction: Direction },
    /// Back to rest after a shake, then run the caller's callback.
    Shaken(Option<Box<dyn FnOnce()>>),
    /// Flip settled. `swapped` records whether the face already changed.
    Flip { swapped: bool },
}

impl Completion {
    /// Dismissal kind reported when this completion evicts a card.
    pub(crate) fn evicts(&self) -> Option<(Direction, SwipeAnimation)> {
        match *self {
            Self::ThrownOut { direction } => Some((direction, SwipeAnimation::ThrowOut)),
            Self::Parked { direction } => Some((direction, SwipeAnimation::PutAtTheEnd)),
            _ => None,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settle => f.write_str("Settle"),
            Self::Shown => f.write_str("Shown"),
            Self::ThrownOut { direction } => {
                f.debug_struct("ThrownOut").field("direction", direction).finish()
            }
            Self::ReachedExit { direction } => {
                f.debug_struct("ReachedExit").field("direction", direction).finish()
            }
            Self::Parked { direction } => {
                f.debug_struct("Parked").field("direction", direction).finish()
            }
            Self::Shaken(callback) => f
                .debug_tuple("Shaken")
                .field(&callback.as_ref().map(|_| ".."))
                .finish(),
            Self::Flip { swapped } => f.debug_struct("Flip").field("swapped", swapped).finish(),
        }
    }
}

/// A running card animation.
#[derive(Debug)]
pub struct CardMotion {
    kind: MotionKind,
    pub(crate) track: Track<CardPose>,
    pub(crate) completion: Completion,
}

impl CardMotion {
    pub(crate) fn new(kind: MotionKind, track: Track<CardPose>, completion: Completion) -> Self {
        Self {
            kind,
            track,
            completion,
        }
    }

    /// Which animation this is.
    #[inline]
    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Whether the track has settled.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.track.is_complete()
    }
}

/// Spring back to the resting transform.
#[must_use]
pub fn cancel(from: CardPose, rest: Affine) -> Track<CardPose> {
    Track::new(from).then(
        Timing::spring(LONG_DURATION, CANCEL_DAMPING),
        CardPose::new(rest),
    )
}

/// Carry the card along `exit` until its translation equals it.
#[must_use]
pub fn throw_out(from: CardPose, exit: Vec2, duration: ThrowDuration, curve: Timing) -> Track<CardPose> {
    let residual = exit - from.transform.translation();
    let target = CardPose {
        transform: from.transform.then_translate(residual),
        alpha: from.alpha,
    };
    let timing = curve.with_duration(duration.resolve(residual, exit));
    Track::new(from).then(timing, target)
}

/// Move to a new depth's resting transform, fading to `alpha`.
#[must_use]
pub fn reflow(from: CardPose, rest: Affine, alpha: f64) -> Track<CardPose> {
    Track::new(from).then(
        Timing::ease_in(FAST_DURATION),
        CardPose::new(rest).with_alpha(alpha),
    )
}

/// Tilt right, tilt left, spring back to `rest`.
#[must_use]
pub fn shake(from: CardPose, rest: Affine, card_width: f64) -> Track<CardPose> {
    let dx = card_width / 8.0;
    let angle = if card_width > 0.0 {
        MAX_DRAG_ANGLE * dx / card_width
    } else {
        0.0
    };
    let tilt = |sign: f64| {
        CardPose::new(rest * Affine::rotate(sign * angle) * Affine::translate((sign * dx, 0.0)))
            .with_alpha(from.alpha)
    };
    Track::new(from)
        .then(Timing::ease_out(Duration::from_millis(120)), tilt(1.0))
        .then(Timing::ease_in_out(FAST_DURATION), tilt(-1.0))
        .then(
            Timing::spring(LONG_DURATION, SHAKE_DAMPING),
            CardPose::new(rest).with_alpha(from.alpha),
        )
}

/// Squeeze horizontally to nothing, then expand back. The face swaps when
/// the first segment completes.
#[must_use]
pub fn flip(from: CardPose) -> Track<CardPose> {
    let half = DEFAULT_DURATION / 2;
    let squeezed = CardPose {
        transform: from.transform * Affine::scale_non_uniform(0.0, 1.0),
        alpha: from.alpha,
    };
    Track::new(from)
        .then(Timing::ease_in(half), squeezed)
        .then(Timing::ease_out(half), from)
}

/// Segment whose completion swaps the flip face.
pub(crate) const FLIP_SWAP_SEGMENT: usize = 0;
