#![forbid(unsafe_code)]

//! Provider/observer contract between the stack and its host.
//!
//! The stack pulls content and depth styling from a [`CardsDataSource`] and
//! pulls swipe/tap policy from a [`CardsDelegate`], which also receives
//! progress and completion notifications. Both are held weakly; when a
//! collaborator is gone the stack falls back to an empty data source and to
//! [`DefaultDelegate`].
//!
//! Every trait method is required. Hosts that only care about a few hooks
//! can delegate the rest to [`DefaultDelegate`].

use std::fmt;

use kurbo::Affine;

use crate::geometry::Direction;

/// Content handle mounted into a card.
pub trait CardContent {
    /// Renderable face type.
    type Face;

    /// The face shown by default.
    fn front(&self) -> &Self::Face;

    /// The face shown when flipped. Cards without one cannot flip.
    fn back(&self) -> Option<&Self::Face>;

    /// Called before a flip starts.
    fn will_flip(&mut self) {}

    /// Called after a flip settles.
    fn did_flip(&mut self) {}
}

/// Container styling wrapped around card content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Decoration {
    pub corner_radius: f64,
    pub border_width: f64,
    /// Border colour as `0xRRGGBBAA`.
    pub border_color: u32,
    pub shadow_radius: f64,
    pub shadow_opacity: f64,
}

impl Decoration {
    /// Plain container: no radius, border or shadow.
    pub const PLAIN: Self = Self {
        corner_radius: 0.0,
        border_width: 0.0,
        border_color: 0,
        shadow_radius: 0.0,
        shadow_opacity: 0.0,
    };

    /// Rounded container with a soft shadow.
    #[must_use]
    pub const fn rounded(corner_radius: f64) -> Self {
        Self {
            corner_radius,
            border_width: 0.0,
            border_color: 0,
            shadow_radius: 8.0,
            shadow_opacity: 0.3,
        }
    }
}

/// Supplies cards to the stack.
pub trait CardsDataSource<C> {
    /// Total number of items.
    fn count(&self) -> usize;

    /// Content for the item at `index`.
    fn content_for(&self, index: usize) -> C;

    /// Container styling for the item at `index`; `None` means plain.
    fn decoration_for(&self, index: usize) -> Option<Decoration>;

    /// Resting transform for a stack depth; `None` means
    /// [`stack_transform`](crate::geometry::stack_transform).
    fn transform_for(&self, depth: usize) -> Option<Affine>;
}

/// Animation chosen for a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwipeAnimation {
    /// Cancel the swipe.
    None,
    /// Throw the card out of the stack.
    #[default]
    ThrowOut,
    /// Move the card to the back of the stack.
    PutAtTheEnd,
}

impl fmt::Display for SwipeAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::ThrowOut => "throw_out",
            Self::PutAtTheEnd => "put_at_the_end",
        })
    }
}

/// Animation chosen for a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TapAnimation {
    /// Ignore the tap.
    #[default]
    None,
    /// Flip the card.
    Flip,
}

/// Policy provider and observer.
pub trait CardsDelegate {
    /// Animation for a swipe of `index` toward `direction`.
    fn swipe_decision(&self, index: usize, direction: Direction) -> SwipeAnimation;

    /// Animation for a tap on `index`.
    fn tap_decision(&self, index: usize) -> TapAnimation;

    /// Drag progress toward dismissal, in [0.0, 1.0].
    fn on_progress(&self, index: usize, direction: Direction, progress: f64);

    /// A dismissal animation finished.
    fn on_finish(&self, index: usize, direction: Direction, animation: SwipeAnimation);

    /// A swipe was abandoned. Fires when the gesture ends, not when the
    /// spring-back settles.
    fn on_cancel(&self, index: usize);

    /// `index` became the settled front card.
    fn on_shown(&self, index: usize);
}

/// Delegate used when none is set (or the set one was dropped).
///
/// Swipes throw out, taps do nothing, notifications are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDelegate;

impl CardsDelegate for DefaultDelegate {
    fn swipe_decision(&self, _index: usize, _direction: Direction) -> SwipeAnimation {
        SwipeAnimation::ThrowOut
    }

    fn tap_decision(&self, _index: usize) -> TapAnimation {
        TapAnimation::None
    }

    fn on_progress(&self, _index: usize, _direction: Direction, _progress: f64) {}

    fn on_finish(&self, _index: usize, _direction: Direction, _animation: SwipeAnimation) {}

    fn on_cancel(&self, _index: usize) {}

    fn on_shown(&self, _index: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delegate_policies() {
        let d = DefaultDelegate;
        for dir in Direction::ALL {
            assert_eq!(d.swipe_decision(0, dir), SwipeAnimation::ThrowOut);
        }
        assert_eq!(d.tap_decision(3), TapAnimation::None);
    }

    #[test]
    fn plain_decoration_is_default() {
        assert_eq!(Decoration::default(), Decoration::PLAIN);
        assert!(Decoration::rounded(12.0).shadow_opacity > 0.0);
    }

    #[test]
    fn swipe_animation_names() {
        assert_eq!(SwipeAnimation::PutAtTheEnd.to_string(), "put_at_the_end");
        assert_eq!(SwipeAnimation::default(), SwipeAnimation::ThrowOut);
    }
}
