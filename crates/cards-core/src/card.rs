#![forbid(unsafe_code)]

//! Card entity: one mounted stack slot and its interaction state.
//!
//! # State Machine
//!
//! ```text
//!   InStack ──begin──▶ Dragging ──end(cancel)──▶ Cancelling ──done──▶ InStack
//!                          │
//!                          └──end(dismiss)──▶ Removing ──done──▶ (evicted)
//!
//!   InStack ──depth change──▶ Reflowing ──done──▶ InStack
//! ```
//!
//! # Invariants
//!
//! 1. A card holds at most one [`CardMotion`](crate::sequencer::CardMotion).
//! 2. A `Removing` card never has gesture flags set.
//! 3. `absolute_index` never changes after mount.

use bitflags::bitflags;
use cards_motion::Lerp;
use kurbo::Affine;

use crate::contract::{CardContent, Decoration};
use crate::sequencer::{CardMotion, MotionKind};

/// Interaction state of a mounted card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardState {
    /// Resting at its depth.
    #[default]
    InStack,
    /// Following an active drag.
    Dragging,
    /// Springing back after an abandoned drag.
    Cancelling,
    /// Leaving the stack (thrown out or parked at the tail).
    Removing,
    /// Catching up to a new depth.
    Reflowing,
}

impl CardState {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStack => "in_stack",
            Self::Dragging => "dragging",
            Self::Cancelling => "cancelling",
            Self::Removing => "removing",
            Self::Reflowing => "reflowing",
        }
    }
}

bitflags! {
    /// Input recognizers currently enabled on a card.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GestureFlags: u8 {
        /// Drag to swipe.
        const PAN = 0b01;
        /// Tap to flip.
        const TAP = 0b10;
    }
}

/// Presentation values the host renders for a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    /// Transform about the card's centre.
    pub transform: Affine,
    /// Opacity in [0.0, 1.0].
    pub alpha: f64,
}

impl CardPose {
    /// Opaque pose with the given transform.
    #[must_use]
    pub const fn new(transform: Affine) -> Self {
        Self {
            transform,
            alpha: 1.0,
        }
    }

    /// Same pose with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self {
            transform: self.transform,
            alpha,
        }
    }
}

impl Default for CardPose {
    fn default() -> Self {
        Self::new(Affine::IDENTITY)
    }
}

impl Lerp for CardPose {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            transform: self.transform.lerp(&to.transform, t),
            alpha: self.alpha.lerp(&to.alpha, t).clamp(0.0, 1.0),
        }
    }
}

/// One mounted card.
#[derive(Debug)]
pub struct Card<C> {
    pub(crate) absolute_index: usize,
    pub(crate) visible_index: usize,
    pub(crate) content: C,
    pub(crate) decoration: Decoration,
    pub(crate) state: CardState,
    pub(crate) is_flipped: bool,
    pub(crate) pose: CardPose,
    pub(crate) gestures: GestureFlags,
    pub(crate) motion: Option<CardMotion>,
}

impl<C: CardContent> Card<C> {
    pub(crate) fn new(
        absolute_index: usize,
        visible_index: usize,
        content: C,
        decoration: Decoration,
        pose: CardPose,
        gestures: GestureFlags,
    ) -> Self {
        Self {
            absolute_index,
            visible_index,
            content,
            decoration,
            state: CardState::InStack,
            is_flipped: false,
            pose,
            gestures,
            motion: None,
        }
    }

    /// Stable index into the data source.
    #[inline]
    pub fn absolute_index(&self) -> usize {
        self.absolute_index
    }

    /// Depth in the stack (0 = front).
    #[inline]
    pub fn visible_index(&self) -> usize {
        self.visible_index
    }

    /// Content handle supplied by the data source.
    #[inline]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Container styling.
    #[inline]
    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    /// Interaction state.
    #[inline]
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Whether the back face is showing.
    #[inline]
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    /// Current presentation values.
    #[inline]
    pub fn pose(&self) -> CardPose {
        self.pose
    }

    /// Enabled recognizers.
    #[inline]
    pub fn gestures(&self) -> GestureFlags {
        self.gestures
    }

    /// Kind of the running animation, if any.
    pub fn motion_kind(&self) -> Option<MotionKind> {
        self.motion.as_ref().map(CardMotion::kind)
    }

    /// Whether a timed animation is running.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Whether the card is leaving the stack.
    #[inline]
    pub fn is_removing(&self) -> bool {
        self.state == CardState::Removing
    }

    /// The face currently showing.
    pub fn face(&self) -> &C::Face {
        match (self.is_flipped, self.content.back()) {
            (true, Some(back)) => back,
            _ => self.content.front(),
        }
    }
}
