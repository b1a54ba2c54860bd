#![forbid(unsafe_code)]

//! Stack manager: owns the mounted cards and choreographs their motions.
//!
//! [`CardStack`] keeps the mounted cards in an arena keyed by absolute index
//! plus an order vector (front to back). Input arrives through
//! [`handle_gesture`](CardStack::handle_gesture) and the programmatic
//! commands; time arrives through [`tick`](CardStack::tick). Every motion
//! carries a completion that the stack resolves after the tick that settles
//! it, re-resolving the card by index.
//!
//! # Dismissal protocols
//!
//! - **Throw-out**: the card is marked `Removing` and flies along its exit
//!   vector. In the same step the next data-source item is mounted (hidden),
//!   the remaining cards are renumbered and each reflows to its new depth.
//!   The throw-out completion evicts the card and reports `on_finish`; the
//!   new front card's reflow completion reports `on_shown`.
//! - **Put-at-end**: the card flies out over a length-dependent duration.
//!   Depths stay put until it reaches the exit; then the next item is
//!   mounted, the card is moved behind every other card, and everything
//!   reflows. The parked card fades
//!   to [`PARKED_ALPHA`] at the tail depth, is then evicted and reported.
//! - **Cancel**: spring back to rest; `on_cancel` fires immediately.
//!
//! # Invariants
//!
//! 1. Depths of non-removing cards are contiguous and ascend with absolute
//!    index. They start at 0, or at 1 while a put-at-end card is still on
//!    its way out from the front.
//! 2. Only the depth-0 non-removing card has gesture flags, and only while
//!    gestures are enabled.
//! 3. Starting a motion on a card force-finishes the previous one, which
//!    applies its final pose and runs its completion exactly once.
//! 4. A dismissed absolute index is never remounted until [`reset`](CardStack::reset).
//! 5. `on_shown` fires once per change of front card.
//!
//! # Failure Modes
//!
//! - Gesture events for unknown, removing or disabled cards are ignored.
//! - A dropped data source behaves as an empty one; a dropped delegate as
//!   [`DefaultDelegate`].

use std::rc::{Rc, Weak};
use std::time::Duration;

use ahash::AHashMap;
use cards_motion::{Animation, Timing};
use kurbo::{Affine, Rect, Vec2};

use crate::card::{Card, CardPose, CardState, GestureFlags};
use crate::config::StackConfig;
use crate::contract::{
    CardContent, CardsDataSource, CardsDelegate, DefaultDelegate, SwipeAnimation, TapAnimation,
};
use crate::error::Result;
use crate::geometry::{self, Direction};
use crate::sequencer::{
    self, CardMotion, Completion, FAST_DURATION, FLIP_SWAP_SEGMENT, LONG_DURATION, MotionKind,
    PARKED_ALPHA, ThrowDuration,
};

/// Velocity (points/s) a release must exceed along the swipe axis.
pub const FINISH_VELOCITY: f64 = 300.0;

/// Distance a release must exceed along the swipe axis.
pub const FINISH_TRANSLATION: f64 = 50.0;

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// The card stack.
pub struct CardStack<C: CardContent> {
    config: StackConfig,
    bounds: Rect,
    cards: AHashMap<usize, Card<C>>,
    order: Vec<usize>,
    interaction_suspended: bool,
    last_shown: Option<usize>,
    data_source: Option<Weak<dyn CardsDataSource<C>>>,
    delegate: Option<Weak<dyn CardsDelegate>>,
}

impl<C: CardContent> std::fmt::Debug for CardStack<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardStack")
            .field("config", &self.config)
            .field("bounds", &self.bounds)
            .field("order", &self.order)
            .field("interaction_suspended", &self.interaction_suspended)
            .field("last_shown", &self.last_shown)
            .finish_non_exhaustive()
    }
}

impl<C: CardContent> CardStack<C> {
    /// Create an empty stack.
    pub fn new(config: StackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bounds: Rect::ZERO,
            cards: AHashMap::new(),
            order: Vec::new(),
            interaction_suspended: false,
            last_shown: None,
            data_source: None,
            delegate: None,
        })
    }

    // -----------------------------------------------------------------------
    // Collaborators and configuration
    // -----------------------------------------------------------------------

    /// Attach a data source. The stack keeps only a weak handle.
    pub fn set_data_source<S: CardsDataSource<C> + 'static>(&mut self, source: &Rc<S>) {
        let weak = Rc::downgrade(source);
        let weak: Weak<dyn CardsDataSource<C>> = weak;
        self.data_source = Some(weak);
    }

    /// Attach a delegate. The stack keeps only a weak handle.
    pub fn set_delegate<D: CardsDelegate + 'static>(&mut self, delegate: &Rc<D>) {
        let weak = Rc::downgrade(delegate);
        let weak: Weak<dyn CardsDelegate> = weak;
        self.delegate = Some(weak);
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Replace the configuration. The visible count applies from the next
    /// reset; the gesture flag applies immediately.
    pub fn set_config(&mut self, config: StackConfig) -> Result<()> {
        config.validate()?;
        let gestures = config.gestures_enabled;
        self.config = config;
        self.set_gestures_enabled(gestures);
        Ok(())
    }

    /// Container bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Set the container bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds.abs();
    }

    /// Frame of the front card: bounds shrunk by the edge insets.
    pub fn card_frame(&self) -> Rect {
        self.config.card_edge_insets.apply(self.bounds)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Mounted cards, front to back.
    pub fn cards(&self) -> impl Iterator<Item = &Card<C>> + '_ {
        self.order.iter().filter_map(|index| self.cards.get(index))
    }

    /// Card with the given absolute index.
    pub fn card(&self, index: usize) -> Option<&Card<C>> {
        self.cards.get(&index)
    }

    /// The settled-or-settling front card (depth 0, not removing).
    pub fn top_card(&self) -> Option<&Card<C>> {
        self.cards()
            .find(|card| !card.is_removing() && card.visible_index == 0)
    }

    /// Absolute indices of mounted cards, front to back.
    pub fn mounted_indices(&self) -> Vec<usize> {
        self.order.clone()
    }

    /// Whether any card has a running motion.
    pub fn is_animating(&self) -> bool {
        self.cards.values().any(Card::is_animating)
    }

    /// Whether input is suspended (a flip is playing).
    #[inline]
    pub fn is_interaction_suspended(&self) -> bool {
        self.interaction_suspended
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Tear down every card and mount the first `visible_cards_count` items.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.order.clear();
        self.interaction_suspended = false;
        self.last_shown = None;

        let count = self.source_count().min(self.config.visible_cards_count);
        for index in 0..count {
            let Some(mut card) = self.make_card(index, index) else {
                break;
            };
            card.gestures = self.gating(index);
            self.cards.insert(index, card);
            self.order.push(index);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(mounted = count, "card stack reset");

        if count > 0 {
            self.report_shown(0);
        }
    }

    /// Feed one drag sample for the card at `index`.
    pub fn handle_gesture(
        &mut self,
        index: usize,
        translation: Vec2,
        velocity: Vec2,
        phase: GesturePhase,
    ) {
        if !self.accepts_drag(index) {
            #[cfg(feature = "tracing")]
            tracing::trace!(index, ?phase, "gesture ignored");
            return;
        }
        let direction = geometry::direction(velocity, self.bounds);

        match phase {
            GesturePhase::Began | GesturePhase::Changed => {
                let Some(direction) = direction else {
                    self.cancel(index);
                    return;
                };
                self.finish_motion(index);
                let width = self.bounds.width();
                let Some(card) = self.cards.get_mut(&index) else {
                    return;
                };
                card.pose.transform = geometry::drag_transform(translation, width);
                card.state = CardState::Dragging;
                let progress = self.progress(translation, direction);
                self.with_delegate(|d| d.on_progress(index, direction, progress));
            }
            GesturePhase::Ended => {
                let Some(direction) = direction else {
                    self.cancel(index);
                    return;
                };
                let decision = self.with_delegate(|d| d.swipe_decision(index, direction));
                if decision == SwipeAnimation::None
                    || !self.can_finish(translation, velocity, direction)
                {
                    self.cancel(index);
                    return;
                }
                self.dismiss(index, decision, direction, velocity, false);
            }
            GesturePhase::Cancelled | GesturePhase::Failed => self.cancel(index),
        }
    }

    /// Dismiss the front card as if it had been swiped toward `direction`.
    pub fn perform_swipe(&mut self, animation: SwipeAnimation, direction: Direction) {
        if animation == SwipeAnimation::None {
            return;
        }
        let Some(index) = self.top_card().map(Card::absolute_index) else {
            return;
        };
        self.dismiss(index, animation, direction, geometry::velocity_for(direction), true);
    }

    /// Shake the front card.
    pub fn shake(&mut self) {
        self.shake_inner(None);
    }

    /// Shake the front card and run `callback` once it settles.
    pub fn shake_with(&mut self, callback: impl FnOnce() + 'static) {
        self.shake_inner(Some(Box::new(callback)));
    }

    fn shake_inner(&mut self, callback: Option<Box<dyn FnOnce()>>) {
        let Some(index) = self.top_card().map(Card::absolute_index) else {
            return;
        };
        self.finish_motion(index);
        let rest = self.rest_transform(0);
        let width = self.card_frame().width();
        let Some(card) = self.cards.get(&index) else {
            return;
        };
        let track = sequencer::shake(card.pose, rest, width);
        self.start_motion(
            index,
            CardMotion::new(MotionKind::Shake, track, Completion::Shaken(callback)),
        );
    }

    /// Enable or disable drag and tap on every mounted card.
    ///
    /// Disabling cancels a drag in progress.
    pub fn set_gestures_enabled(&mut self, enabled: bool) {
        self.config.gestures_enabled = enabled;
        let dragging: Vec<usize> = self
            .cards()
            .filter(|card| card.state == CardState::Dragging)
            .map(Card::absolute_index)
            .collect();
        for index in self.order.clone() {
            let flags = match self.cards.get(&index) {
                Some(card) if !card.is_removing() => self.gating(card.visible_index),
                _ => GestureFlags::empty(),
            };
            if let Some(card) = self.cards.get_mut(&index) {
                card.gestures = flags;
            }
        }
        if !enabled {
            for index in dragging {
                self.cancel(index);
            }
        }
    }

    /// Tap handler: flip the card at `index` if the delegate asks for it.
    pub fn flip(&mut self, index: usize) {
        if self.interaction_suspended {
            return;
        }
        let flippable = self.cards.get(&index).is_some_and(|card| {
            !card.is_removing()
                && card.gestures.contains(GestureFlags::TAP)
                && card.content.back().is_some()
        });
        if !flippable || self.with_delegate(|d| d.tap_decision(index)) != TapAnimation::Flip {
            return;
        }

        self.finish_motion(index);
        let Some(card) = self.cards.get_mut(&index) else {
            return;
        };
        card.content.will_flip();
        let track = sequencer::flip(card.pose);
        self.interaction_suspended = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(index, "flip started");

        self.start_motion(
            index,
            CardMotion::new(MotionKind::Flip, track, Completion::Flip { swapped: false }),
        );
    }

    /// Advance every running motion by `dt` and resolve the ones that
    /// settle.
    pub fn tick(&mut self, dt: Duration) {
        let mut settled = Vec::new();
        for index in &self.order {
            let Some(card) = self.cards.get_mut(index) else {
                continue;
            };
            let Some(motion) = card.motion.as_mut() else {
                continue;
            };
            let crossed = motion.track.advance(dt);
            card.pose = *motion.track.value();
            if let Completion::Flip { swapped } = &mut motion.completion
                && !*swapped
                && crossed.contains(&FLIP_SWAP_SEGMENT)
            {
                *swapped = true;
                card.is_flipped = !card.is_flipped;
            }
            if motion.track.is_complete() {
                settled.push(*index);
            }
        }

        for index in settled {
            let finished = self
                .cards
                .get_mut(&index)
                .filter(|card| card.motion.as_ref().is_some_and(CardMotion::is_complete))
                .and_then(|card| card.motion.take());
            if let Some(motion) = finished {
                self.complete(index, motion.completion);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Dismissal paths
    // -----------------------------------------------------------------------

    fn dismiss(
        &mut self,
        index: usize,
        animation: SwipeAnimation,
        direction: Direction,
        velocity: Vec2,
        programmatic: bool,
    ) {
        #[cfg(feature = "tracing")]
        tracing::debug!(index, %direction, %animation, programmatic, "dismissing card");

        match animation {
            SwipeAnimation::ThrowOut => self.throw_out(index, direction, velocity, programmatic),
            SwipeAnimation::PutAtTheEnd => {
                self.put_at_the_end(index, direction, velocity, programmatic);
            }
            SwipeAnimation::None => self.cancel(index),
        }
    }

    fn throw_out(&mut self, index: usize, direction: Direction, velocity: Vec2, programmatic: bool) {
        let (duration, curve) = if programmatic {
            (ThrowDuration::Long, Timing::ease_in_out(LONG_DURATION))
        } else {
            (ThrowDuration::Fast, Timing::ease_out(FAST_DURATION))
        };
        let exit = geometry::exit_translation(self.bounds, velocity);
        if !self.begin_removal(index) {
            return;
        }
        let Some(card) = self.cards.get(&index) else {
            return;
        };
        let track = sequencer::throw_out(card.pose, exit, duration, curve);
        self.start_motion(
            index,
            CardMotion::new(MotionKind::ThrowOut, track, Completion::ThrownOut { direction }),
        );

        self.add_next_card();
        self.renumber();
        self.reflow_all(None);
    }

    fn put_at_the_end(
        &mut self,
        index: usize,
        direction: Direction,
        velocity: Vec2,
        programmatic: bool,
    ) {
        let curve = if programmatic {
            Timing::ease_in_out(FAST_DURATION)
        } else {
            Timing::ease_out(FAST_DURATION)
        };
        let exit = geometry::exit_translation(self.card_frame(), velocity);
        if !self.begin_removal(index) {
            return;
        }
        let Some(card) = self.cards.get(&index) else {
            return;
        };
        let track = sequencer::throw_out(card.pose, exit, ThrowDuration::LengthDependent, curve);
        self.start_motion(
            index,
            CardMotion::new(MotionKind::ThrowOut, track, Completion::ReachedExit { direction }),
        );
    }

    /// Second phase of put-at-end: mount the replacement, move the card
    /// behind everything and reflow.
    fn park(&mut self, index: usize, direction: Direction) {
        self.add_next_card();
        self.renumber();
        self.reflow_all(Some((index, direction)));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            index,
            depth = ?self.cards.get(&index).map(|c| c.visible_index),
            "card parked at tail"
        );
    }

    fn cancel(&mut self, index: usize) {
        self.finish_motion(index);
        let Some(depth) = self.cards.get(&index).map(|card| card.visible_index) else {
            return;
        };
        let rest = self.rest_transform(depth);
        let Some(card) = self.cards.get_mut(&index) else {
            return;
        };
        card.state = CardState::Cancelling;
        let track = sequencer::cancel(card.pose, rest);
        self.start_motion(
            index,
            CardMotion::new(MotionKind::Cancel, track, Completion::Settle),
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(index, "swipe cancelled");

        self.with_delegate(|d| d.on_cancel(index));
    }

    /// Force-finish, mark `Removing` and drop recognizers.
    fn begin_removal(&mut self, index: usize) -> bool {
        self.finish_motion(index);
        let Some(card) = self.cards.get_mut(&index) else {
            return false;
        };
        card.state = CardState::Removing;
        card.gestures = GestureFlags::empty();
        true
    }

    // -----------------------------------------------------------------------
    // Mounting and depth bookkeeping
    // -----------------------------------------------------------------------

    /// Mount the item after the highest mounted index, hidden, behind the
    /// current last card.
    fn add_next_card(&mut self) -> Option<usize> {
        let last = self.cards.keys().copied().max()?;
        let next = last + 1;
        if next >= self.source_count() {
            return None;
        }
        let depth = self
            .cards
            .values()
            .map(|card| card.visible_index)
            .max()
            .map_or(0, |d| d + 1);
        let mut card = self.make_card(next, depth)?;
        card.pose.alpha = 0.0;
        if self.config.gestures_enabled {
            card.gestures = GestureFlags::all();
        }
        self.cards.insert(next, card);
        self.order.push(next);

        #[cfg(feature = "tracing")]
        tracing::debug!(index = next, depth, "card mounted");

        Some(next)
    }

    fn make_card(&self, index: usize, depth: usize) -> Option<Card<C>> {
        let source = self.source()?;
        let content = source.content_for(index);
        let decoration = source.decoration_for(index).unwrap_or_default();
        let transform = source
            .transform_for(depth)
            .unwrap_or_else(|| geometry::stack_transform(depth));
        Some(Card::new(
            index,
            depth,
            content,
            decoration,
            CardPose::new(transform),
            GestureFlags::empty(),
        ))
    }

    /// Order non-removing cards by absolute index, then removing ones, and
    /// assign depths by position.
    fn renumber(&mut self) {
        let cards = &self.cards;
        self.order.sort_by_key(|index| {
            let removing = cards.get(index).is_none_or(Card::is_removing);
            (removing, *index)
        });
        for (depth, index) in self.order.iter().enumerate() {
            if let Some(card) = self.cards.get_mut(index) {
                card.visible_index = depth;
            }
        }
    }

    /// Reflow every non-removing card to its depth. `parked` is the
    /// put-at-end card, which reflows to the tail while fading out.
    fn reflow_all(&mut self, parked: Option<(usize, Direction)>) {
        for index in self.order.clone() {
            let Some(card) = self.cards.get(&index) else {
                continue;
            };
            let depth = card.visible_index;
            let parked_direction = parked
                .filter(|(parked_index, _)| *parked_index == index)
                .map(|(_, direction)| direction);
            if card.is_removing() && parked_direction.is_none() {
                continue;
            }

            self.finish_motion(index);
            let rest = self.rest_transform(depth);
            let gestures = if parked_direction.is_some() {
                GestureFlags::empty()
            } else {
                self.gating(depth)
            };
            let Some(card) = self.cards.get_mut(&index) else {
                continue;
            };
            card.gestures = gestures;

            let (alpha, completion) = match parked_direction {
                Some(direction) => (PARKED_ALPHA, Completion::Parked { direction }),
                None => {
                    card.state = CardState::Reflowing;
                    let completion = if depth == 0 {
                        Completion::Shown
                    } else {
                        Completion::Settle
                    };
                    (1.0, completion)
                }
            };
            let track = sequencer::reflow(card.pose, rest, alpha);
            self.start_motion(index, CardMotion::new(MotionKind::Reflow, track, completion));
        }
    }

    fn evict(&mut self, index: usize) {
        self.cards.remove(&index);
        self.order.retain(|i| *i != index);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, "card evicted");
    }

    // -----------------------------------------------------------------------
    // Motions
    // -----------------------------------------------------------------------

    /// Install `motion` on the card, force-finishing any previous one.
    fn start_motion(&mut self, index: usize, motion: CardMotion) {
        self.finish_motion(index);
        if let Some(card) = self.cards.get_mut(&index) {
            card.motion = Some(motion);
        }
    }

    /// Jump the running motion to its end and resolve its completion.
    fn finish_motion(&mut self, index: usize) {
        let Some(card) = self.cards.get_mut(&index) else {
            return;
        };
        let Some(mut motion) = card.motion.take() else {
            return;
        };
        motion.track.finish();
        card.pose = *motion.track.value();
        if let Completion::Flip { swapped: false } = motion.completion {
            card.is_flipped = !card.is_flipped;
            motion.completion = Completion::Flip { swapped: true };
        }
        self.complete(index, motion.completion);
    }

    fn complete(&mut self, index: usize, completion: Completion) {
        if let Some((direction, animation)) = completion.evicts() {
            self.evict(index);
            self.with_delegate(|d| d.on_finish(index, direction, animation));
            return;
        }
        let Some(card) = self.cards.get_mut(&index) else {
            return;
        };
        match completion {
            Completion::Settle => settle(card),
            Completion::Shown => {
                settle(card);
                self.report_shown(index);
            }
            Completion::ReachedExit { direction } => self.park(index, direction),
            Completion::Shaken(callback) => {
                settle(card);
                if let Some(callback) = callback {
                    callback();
                }
            }
            Completion::Flip { .. } => {
                card.content.did_flip();
                self.interaction_suspended = false;

                #[cfg(feature = "tracing")]
                tracing::debug!(index, flipped = card.is_flipped, "flip finished");
            }
            Completion::ThrownOut { .. } | Completion::Parked { .. } => {}
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Report `index` as the front card unless it already was.
    fn report_shown(&mut self, index: usize) {
        if self.last_shown == Some(index) {
            return;
        }
        self.last_shown = Some(index);
        self.with_delegate(|d| d.on_shown(index));
    }

    fn accepts_drag(&self, index: usize) -> bool {
        !self.interaction_suspended
            && self.config.gestures_enabled
            && self.cards.get(&index).is_some_and(|card| {
                !card.is_removing() && card.gestures.contains(GestureFlags::PAN)
            })
    }

    /// Recognizers a non-removing card at `depth` should have.
    fn gating(&self, depth: usize) -> GestureFlags {
        if self.config.gestures_enabled && depth == 0 {
            GestureFlags::all()
        } else {
            GestureFlags::empty()
        }
    }

    fn progress(&self, translation: Vec2, direction: Direction) -> f64 {
        geometry::swipe_progress(translation, direction, self.bounds.width() / 3.0)
    }

    fn can_finish(&self, translation: Vec2, velocity: Vec2, direction: Direction) -> bool {
        let v = geometry::axis_component(velocity, direction).abs();
        let t = geometry::axis_component(translation, direction).abs();
        (v > FINISH_VELOCITY && t > FINISH_TRANSLATION) || self.progress(translation, direction) >= 1.0
    }

    fn rest_transform(&self, depth: usize) -> Affine {
        self.source()
            .and_then(|source| source.transform_for(depth))
            .unwrap_or_else(|| geometry::stack_transform(depth))
    }

    fn source(&self) -> Option<Rc<dyn CardsDataSource<C>>> {
        self.data_source.as_ref().and_then(Weak::upgrade)
    }

    fn source_count(&self) -> usize {
        self.source().map_or(0, |source| source.count())
    }

    fn with_delegate<R>(&self, f: impl FnOnce(&dyn CardsDelegate) -> R) -> R {
        match self.delegate.as_ref().and_then(Weak::upgrade) {
            Some(delegate) => f(delegate.as_ref()),
            None => f(&DefaultDelegate),
        }
    }
}

fn settle<C>(card: &mut Card<C>) {
    if matches!(card.state, CardState::Cancelling | CardState::Reflowing) {
        card.state = CardState::InStack;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug)]
    struct Face {
        back: Option<&'static str>,
        flips: Rc<Cell<u32>>,
    }

    impl CardContent for Face {
        type Face = &'static str;

        fn front(&self) -> &Self::Face {
            &"front"
        }

        fn back(&self) -> Option<&Self::Face> {
            self.back.as_ref()
        }

        fn did_flip(&mut self) {
            self.flips.set(self.flips.get() + 1);
        }
    }

    struct Source {
        count: usize,
        flips: Rc<Cell<u32>>,
    }

    impl CardsDataSource<Face> for Source {
        fn count(&self) -> usize {
            self.count
        }

        fn content_for(&self, index: usize) -> Face {
            Face {
                back: (index % 2 == 0).then_some("back"),
                flips: Rc::clone(&self.flips),
            }
        }

        fn decoration_for(&self, _index: usize) -> Option<crate::Decoration> {
            None
        }

        fn transform_for(&self, _depth: usize) -> Option<Affine> {
            None
        }
    }

    #[derive(Default)]
    struct Recorder {
        swipe: Cell<SwipeAnimation>,
        tap: Cell<TapAnimation>,
        events: RefCell<Vec<String>>,
    }

    impl CardsDelegate for Recorder {
        fn swipe_decision(&self, _index: usize, _direction: Direction) -> SwipeAnimation {
            self.swipe.get()
        }

        fn tap_decision(&self, _index: usize) -> TapAnimation {
            self.tap.get()
        }

        fn on_progress(&self, index: usize, _direction: Direction, progress: f64) {
            self.events
                .borrow_mut()
                .push(format!("progress {index} {progress:.2}"));
        }

        fn on_finish(&self, index: usize, direction: Direction, animation: SwipeAnimation) {
            self.events
                .borrow_mut()
                .push(format!("finish {index} {direction} {animation}"));
        }

        fn on_cancel(&self, index: usize) {
            self.events.borrow_mut().push(format!("cancel {index}"));
        }

        fn on_shown(&self, index: usize) {
            self.events.borrow_mut().push(format!("shown {index}"));
        }
    }

    struct Harness {
        stack: CardStack<Face>,
        source: Rc<Source>,
        delegate: Rc<Recorder>,
    }

    impl Harness {
        fn new(count: usize) -> Self {
            let source = Rc::new(Source {
                count,
                flips: Rc::new(Cell::new(0)),
            });
            let delegate = Rc::new(Recorder::default());
            let mut stack = CardStack::new(StackConfig::default()).expect("valid config");
            stack.set_bounds(Rect::new(0.0, 0.0, 300.0, 600.0));
            stack.set_data_source(&source);
            stack.set_delegate(&delegate);
            stack.reset();
            delegate.events.borrow_mut().clear();
            Self {
                stack,
                source,
                delegate,
            }
        }

        fn events(&self) -> Vec<String> {
            self.delegate.events.borrow().clone()
        }

        fn settle(&mut self) {
            for _ in 0..100 {
                self.stack.tick(Duration::from_millis(16));
            }
        }
    }

    #[test]
    fn reset_mounts_visible_window() {
        let h = Harness::new(5);
        assert_eq!(h.stack.mounted_indices(), vec![0, 1, 2]);
        let depths: Vec<usize> = h.stack.cards().map(Card::visible_index).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(h.stack.card(0).map(Card::gestures), Some(GestureFlags::all()));
        assert_eq!(h.stack.card(1).map(Card::gestures), Some(GestureFlags::empty()));
    }

    #[test]
    fn reset_with_empty_source_mounts_nothing() {
        let h = Harness::new(0);
        assert!(h.stack.mounted_indices().is_empty());
        assert!(h.stack.top_card().is_none());
    }

    #[test]
    fn drag_follows_and_reports_progress() {
        let mut h = Harness::new(3);
        h.stack
            .handle_gesture(0, Vec2::new(50.0, 0.0), Vec2::new(200.0, 0.0), GesturePhase::Began);
        let card = h.stack.card(0).expect("mounted");
        assert_eq!(card.state(), CardState::Dragging);
        assert_eq!(card.pose().transform, geometry::drag_transform(Vec2::new(50.0, 0.0), 300.0));
        assert_eq!(h.events(), vec!["progress 0 0.50"]);
    }

    #[test]
    fn zero_velocity_drag_update_cancels() {
        let mut h = Harness::new(3);
        h.stack
            .handle_gesture(0, Vec2::new(10.0, 0.0), Vec2::ZERO, GesturePhase::Changed);
        assert_eq!(h.stack.card(0).map(Card::state), Some(CardState::Cancelling));
        assert_eq!(h.events(), vec!["cancel 0"]);
    }

    #[test]
    fn gestures_on_back_cards_are_ignored() {
        let mut h = Harness::new(3);
        h.stack
            .handle_gesture(1, Vec2::new(200.0, 0.0), Vec2::new(900.0, 0.0), GesturePhase::Ended);
        h.stack
            .handle_gesture(42, Vec2::new(200.0, 0.0), Vec2::new(900.0, 0.0), GesturePhase::Ended);
        assert!(h.events().is_empty());
        assert!(!h.stack.is_animating());
    }

    #[test]
    fn force_finish_runs_completion_once() {
        let mut h = Harness::new(4);
        h.delegate.swipe.set(SwipeAnimation::ThrowOut);
        h.stack
            .handle_gesture(0, Vec2::new(200.0, 0.0), Vec2::new(900.0, 0.0), GesturePhase::Ended);
        h.stack.tick(Duration::from_millis(50));
        // Card 1 is mid-reflow; grabbing it force-finishes the reflow.
        h.stack
            .handle_gesture(1, Vec2::new(5.0, 0.0), Vec2::new(30.0, 0.0), GesturePhase::Began);
        h.settle();
        let shown: Vec<String> = h.events().into_iter().filter(|e| e.starts_with("shown")).collect();
        assert_eq!(shown, vec!["shown 1"]);
    }

    #[test]
    fn set_gestures_enabled_is_idempotent() {
        let mut h = Harness::new(3);
        h.stack.set_gestures_enabled(false);
        assert!(h.stack.cards().all(|c| c.gestures().is_empty()));
        h.stack.set_gestures_enabled(true);
        let once: Vec<GestureFlags> = h.stack.cards().map(Card::gestures).collect();
        h.stack.set_gestures_enabled(true);
        let twice: Vec<GestureFlags> = h.stack.cards().map(Card::gestures).collect();
        assert_eq!(once, twice);
        assert_eq!(once, vec![GestureFlags::all(), GestureFlags::empty(), GestureFlags::empty()]);
    }

    #[test]
    fn disabling_gestures_cancels_active_drag() {
        let mut h = Harness::new(3);
        h.stack
            .handle_gesture(0, Vec2::new(30.0, 0.0), Vec2::new(100.0, 0.0), GesturePhase::Began);
        h.stack.set_gestures_enabled(false);
        assert_eq!(h.stack.card(0).map(Card::state), Some(CardState::Cancelling));
        h.settle();
        assert_eq!(h.stack.card(0).map(Card::state), Some(CardState::InStack));
    }

    #[test]
    fn flip_swaps_face_and_suspends_input() {
        let mut h = Harness::new(3);
        h.delegate.tap.set(TapAnimation::Flip);
        h.stack.flip(0);
        assert!(h.stack.is_interaction_suspended());
        h.stack
            .handle_gesture(0, Vec2::new(200.0, 0.0), Vec2::new(900.0, 0.0), GesturePhase::Ended);
        assert!(h.events().is_empty(), "drag ignored while flipping");

        h.stack.tick(sequencer::DEFAULT_DURATION / 2);
        assert_eq!(h.stack.card(0).map(|c| *c.face()), Some("back"));
        h.settle();
        assert!(!h.stack.is_interaction_suspended());
        assert_eq!(h.source.flips.get(), 1);
        assert_eq!(h.stack.card(1).map(Card::gestures), Some(GestureFlags::empty()));
    }

    #[test]
    fn flip_requires_back_face_and_policy() {
        let mut h = Harness::new(3);
        h.stack.flip(0);
        assert!(!h.stack.is_interaction_suspended(), "default policy ignores taps");

        h.delegate.tap.set(TapAnimation::Flip);
        h.stack.perform_swipe(SwipeAnimation::ThrowOut, Direction::Right);
        h.settle();
        // Card 1 has no back face.
        h.stack.flip(1);
        assert!(!h.stack.is_interaction_suspended());
    }

    #[test]
    fn shake_runs_callback_after_settling() {
        let mut h = Harness::new(3);
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        h.stack.shake_with(move || flag.set(true));
        assert_eq!(h.stack.card(0).and_then(Card::motion_kind), Some(MotionKind::Shake));
        h.stack.tick(Duration::from_millis(500));
        assert!(!done.get());
        h.stack.tick(Duration::from_millis(300));
        assert!(done.get());
        assert_eq!(h.stack.card(0).map(|c| c.pose().transform), Some(Affine::IDENTITY));
    }

    #[test]
    fn dropped_delegate_falls_back_to_defaults() {
        let mut h = Harness::new(4);
        h.delegate.swipe.set(SwipeAnimation::None);
        // Dropping the only strong handle leaves the stack with a dead weak
        // reference; the default policy throws out.
        h.delegate = Rc::new(Recorder::default());
        h.stack
            .handle_gesture(0, Vec2::new(200.0, 0.0), Vec2::new(900.0, 0.0), GesturePhase::Ended);
        h.settle();
        assert_eq!(h.stack.mounted_indices(), vec![1, 2, 3]);
    }

    #[test]
    fn dropped_source_reports_empty() {
        let mut h = Harness::new(4);
        h.source = Rc::new(Source {
            count: 9,
            flips: Rc::new(Cell::new(0)),
        });
        h.stack.reset();
        assert!(h.stack.mounted_indices().is_empty());
    }

    #[test]
    fn set_config_validates() {
        let mut h = Harness::new(3);
        assert!(h.stack.set_config(StackConfig::default().visible_cards_count(0)).is_err());
        assert_eq!(h.stack.config().visible_cards_count, 3);
        h.stack
            .set_config(StackConfig::default().gestures_enabled(false))
            .expect("valid");
        assert!(h.stack.cards().all(|c| c.gestures().is_empty()));
    }
}
