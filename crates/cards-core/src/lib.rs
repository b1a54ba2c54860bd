#![forbid(unsafe_code)]

//! Core: swipeable card stack state machine and animation choreography.
//!
//! # Role in the workspace
//! `cards-core` owns the mounted cards, interprets drag samples, decides
//! which animation to run, and reports transitions to an observer. It is
//! headless: hosts render [`Card::pose`] and [`Card::face`] however they
//! like, and drive time through [`CardStack::tick`].
//!
//! # Primary responsibilities
//! - **Geometry**: swipe direction, exit vectors, depth transforms.
//! - **Card**: per-slot record and interaction state.
//! - **Sequencer**: cancel, throw-out, reflow, shake and flip motions built
//!   on `cards-motion` tracks.
//! - **Stack**: the dismissal protocols and depth bookkeeping.
//! - **Contract**: the data source and delegate traits.
//!
//! # How it fits
//! A host owns a [`CardStack`], a data source and a delegate (both in `Rc`s;
//! the stack keeps weak handles), feeds it gesture samples, and ticks it
//! once per frame.

pub mod card;
pub mod config;
pub mod contract;
pub mod error;
pub mod geometry;
pub mod sequencer;
pub mod stack;

pub use card::{Card, CardPose, CardState, GestureFlags};
pub use config::StackConfig;
pub use contract::{
    CardContent, CardsDataSource, CardsDelegate, Decoration, DefaultDelegate, SwipeAnimation,
    TapAnimation,
};
pub use error::ConfigError;
pub use geometry::{Direction, EdgeInsets};
pub use sequencer::MotionKind;
pub use stack::{CardStack, GesturePhase};
