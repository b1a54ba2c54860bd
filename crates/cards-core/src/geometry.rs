#![forbid(unsafe_code)]

//! Swipe geometry: direction classification, exit vectors, depth transforms.
//!
//! Coordinates follow the usual screen convention: `x` grows to the right,
//! `y` grows downward. Transforms are expressed about the card's centre, so
//! [`Affine::IDENTITY`] is "resting in its slot".
//!
//! # Invariants
//!
//! 1. [`direction`] is exhaustive and non-overlapping over every non-zero
//!    vector; the zero vector (or a non-finite one) yields `None`.
//! 2. [`exit_translation`] of a zero velocity is [`Vec2::ZERO`].
//! 3. [`swipe_progress`] is clamped to [0.0, 1.0] and non-decreasing in the
//!    magnitude of the axis component.

use std::f64::consts::FRAC_PI_8;
use std::fmt;

use kurbo::{Affine, Rect, Vec2};

/// Vertical offset between consecutive stack depths.
pub const DEPTH_OFFSET: f64 = 30.0;

/// Scale lost per stack depth.
pub const DEPTH_SCALE_STEP: f64 = 0.07;

/// Speed of the synthetic velocity used by programmatic swipes.
pub const SYNTHETIC_SPEED: f64 = 2000.0;

/// Rotation applied when a card is dragged one full frame width.
pub const MAX_DRAG_ANGLE: f64 = FRAC_PI_8;

/// Swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Whether this direction moves along the x axis.
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `velocity` into a swipe direction relative to `frame`.
///
/// Sector boundaries are the angles of the four frame corners seen from the
/// centre, so a wide frame favours horizontal classification near the
/// diagonals. Boundary angles resolve toward the horizontal directions.
#[must_use]
pub fn direction(velocity: Vec2, frame: Rect) -> Option<Direction> {
    if !velocity.is_finite() || velocity.hypot2() == 0.0 {
        return None;
    }
    let (w, h) = corner_extent(frame);
    let angle = velocity.atan2();

    // Branch on the angle, not the sign of y: atan2(-0.0, -x) is -π.
    if angle >= 0.0 {
        let bottom_right = h.atan2(w);
        let bottom_left = h.atan2(-w);
        Some(if angle <= bottom_right {
            Direction::Right
        } else if angle < bottom_left {
            Direction::Down
        } else {
            Direction::Left
        })
    } else {
        let top_left = (-h).atan2(-w);
        let top_right = (-h).atan2(w);
        Some(if angle <= top_left {
            Direction::Left
        } else if angle < top_right {
            Direction::Up
        } else {
            Direction::Right
        })
    }
}

fn corner_extent(frame: Rect) -> (f64, f64) {
    let (w, h) = (frame.width(), frame.height());
    if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() {
        (w, h)
    } else {
        (1.0, 1.0)
    }
}

/// Displacement along `velocity` that carries a card fully outside `frame`.
///
/// Horizontal exits travel one frame width along x, vertical exits one frame
/// height along y; the other component follows the velocity's slope.
#[must_use]
pub fn exit_translation(frame: Rect, velocity: Vec2) -> Vec2 {
    let Some(direction) = direction(velocity, frame) else {
        return Vec2::ZERO;
    };
    let e = velocity.normalize();
    if direction.is_horizontal() {
        let x = frame.width().abs().copysign(e.x);
        Vec2::new(x, x * e.y / e.x)
    } else {
        let y = frame.height().abs().copysign(e.y);
        Vec2::new(y * e.x / e.y, y)
    }
}

/// Default resting transform for a stack depth.
///
/// Each depth step lifts the card by [`DEPTH_OFFSET`] and shrinks it by
/// [`DEPTH_SCALE_STEP`]. Scale never goes below zero.
#[must_use]
pub fn stack_transform(depth: usize) -> Affine {
    let d = depth as f64;
    let scale = (1.0 - DEPTH_SCALE_STEP * d).max(0.0);
    Affine::translate((0.0, -DEPTH_OFFSET * d)) * Affine::scale(scale)
}

/// Synthetic velocity for a programmatic swipe toward `direction`.
///
/// The minor component biases the exit angle so the card leaves on a slight
/// diagonal, like a real flick.
#[must_use]
pub fn velocity_for(direction: Direction) -> Vec2 {
    let major = SYNTHETIC_SPEED;
    let minor = SYNTHETIC_SPEED / 2.0;
    match direction {
        Direction::Right => Vec2::new(major, -minor),
        Direction::Left => Vec2::new(-major, minor),
        Direction::Up => Vec2::new(minor, -major),
        Direction::Down => Vec2::new(-minor, major),
    }
}

/// Transform of a card following a drag.
///
/// The card tilts by `π/8 · dx / frame_width` and is then shifted by the
/// raw translation in its rotated space.
#[must_use]
pub fn drag_transform(translation: Vec2, frame_width: f64) -> Affine {
    let angle = if frame_width > 0.0 {
        MAX_DRAG_ANGLE * translation.x / frame_width
    } else {
        0.0
    };
    Affine::rotate(angle) * Affine::translate(translation)
}

/// Component of `v` along the axis of `direction`.
#[inline]
#[must_use]
pub fn axis_component(v: Vec2, direction: Direction) -> f64 {
    if direction.is_horizontal() { v.x } else { v.y }
}

/// Fraction of the dismissal distance covered by `translation`.
#[must_use]
pub fn swipe_progress(translation: Vec2, direction: Direction, min_distance: f64) -> f64 {
    let travelled = axis_component(translation, direction).abs();
    if !travelled.is_finite() {
        return 1.0;
    }
    if min_distance <= 0.0 || !min_distance.is_finite() {
        return if travelled > 0.0 { 1.0 } else { 0.0 };
    }
    (travelled / min_distance).min(1.0)
}

/// Spacing between the container bounds and the topmost card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    /// Create insets with specific values.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Equal insets on every side.
    pub const fn all(val: f64) -> Self {
        Self::new(val, val, val, val)
    }

    /// Shrink `bounds` by these insets. Over-large insets collapse the
    /// result to a zero-size rectangle at the inset origin.
    pub fn apply(&self, bounds: Rect) -> Rect {
        let bounds = bounds.abs();
        let x0 = bounds.x0 + self.left;
        let y0 = bounds.y0 + self.top;
        let x1 = (bounds.x1 - self.right).max(x0);
        let y1 = (bounds.y1 - self.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

impl Default for EdgeInsets {
    fn default() -> Self {
        Self::new(60.0, 40.0, 40.0, 40.0)
    }
}

impl From<f64> for EdgeInsets {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}
