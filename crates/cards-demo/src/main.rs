#![forbid(unsafe_code)]

//! Cards demo: a headless, scripted host for the card stack.
//!
//! Mounts a palette of colour cards followed by a reload card, then plays a
//! fixed script of synthetic drags, taps and programmatic swipes against it.
//! Every delegate callback and every settled frame is logged through
//! `tracing`, so the output reads as a transcript of the session.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=info cargo run -p cards-demo
//! RUST_LOG=cards_core=debug,cards_demo=info cargo run -p cards-demo
//! ```
//!
//! The stack configuration is read from `CARDS_DEMO_CONFIG` (inline JSON)
//! when set, otherwise from the built-in default below.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cards_core::{
    CardContent, CardStack, CardsDataSource, CardsDelegate, ConfigError, Decoration, Direction,
    GesturePhase, StackConfig, SwipeAnimation, TapAnimation,
};
use kurbo::{Affine, Rect, Vec2};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const FRAME: Duration = Duration::from_micros(16_667);

/// Frames after which a motion that has not settled is reported.
const MAX_FRAMES: usize = 600;

const DEFAULT_CONFIG: &str = r#"{
    "visible_cards_count": 3,
    "card_edge_insets": { "top": 120, "left": 30, "bottom": 90, "right": 30 },
    "gestures_enabled": true
}"#;

const PALETTE: [(&str, u32); 9] = [
    ("pink", 0xFF2D_55FF),
    ("teal", 0x5AC8_FAFF),
    ("green", 0x34C7_59FF),
    ("blue", 0x007A_FFFF),
    ("yellow", 0xFFCC_00FF),
    ("purple", 0xAF52_DEFF),
    ("indigo", 0x5856_D6FF),
    ("red", 0xFF3B_30FF),
    ("orange", 0xFF95_00FF),
];

#[derive(Debug, Error)]
enum DemoError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// Content and collaborators
// ============================================================================

#[derive(Debug)]
struct DemoCard {
    front: String,
    back: Option<String>,
    reload: bool,
}

impl CardContent for DemoCard {
    type Face = String;

    fn front(&self) -> &String {
        &self.front
    }

    fn back(&self) -> Option<&String> {
        self.back.as_ref()
    }

    fn will_flip(&mut self) {
        debug!(card = %self.front, "about to flip");
    }
}

struct Palette;

impl CardsDataSource<DemoCard> for Palette {
    fn count(&self) -> usize {
        PALETTE.len() + 1
    }

    fn content_for(&self, index: usize) -> DemoCard {
        match PALETTE.get(index) {
            Some((name, rgba)) => DemoCard {
                front: format!("{name} #{rgba:08x}"),
                back: Some(format!("{name} (back)")),
                reload: false,
            },
            None => DemoCard {
                front: "reload".to_owned(),
                back: None,
                reload: true,
            },
        }
    }

    fn decoration_for(&self, _index: usize) -> Option<Decoration> {
        Some(Decoration {
            shadow_radius: 4.0,
            shadow_opacity: 0.1,
            ..Decoration::rounded(20.0)
        })
    }

    fn transform_for(&self, _depth: usize) -> Option<Affine> {
        None
    }
}

/// Right throws out, left puts at the end, vertical swipes are refused.
/// The reload card cannot be swiped.
#[derive(Default)]
struct Narrator {
    finished: Cell<usize>,
}

impl CardsDelegate for Narrator {
    fn swipe_decision(&self, index: usize, direction: Direction) -> SwipeAnimation {
        if index == PALETTE.len() {
            return SwipeAnimation::None;
        }
        match direction {
            Direction::Right => SwipeAnimation::ThrowOut,
            Direction::Left => SwipeAnimation::PutAtTheEnd,
            Direction::Up | Direction::Down => SwipeAnimation::None,
        }
    }

    fn tap_decision(&self, _index: usize) -> TapAnimation {
        TapAnimation::Flip
    }

    fn on_progress(&self, index: usize, direction: Direction, progress: f64) {
        info!(index, %direction, progress = format_args!("{progress:.2}"), "progress");
    }

    fn on_finish(&self, index: usize, direction: Direction, animation: SwipeAnimation) {
        self.finished.set(self.finished.get() + 1);
        info!(index, %direction, %animation, "finish");
    }

    fn on_cancel(&self, index: usize) {
        info!(index, "cancel");
    }

    fn on_shown(&self, index: usize) {
        info!(index, "shown");
    }
}

// ============================================================================
// Host
// ============================================================================

struct Host {
    stack: CardStack<DemoCard>,
    _palette: Rc<Palette>,
    narrator: Rc<Narrator>,
}

impl Host {
    fn new(config: StackConfig) -> Result<Self, DemoError> {
        let palette = Rc::new(Palette);
        let narrator = Rc::new(Narrator::default());
        let mut stack = CardStack::new(config)?;
        stack.set_bounds(Rect::new(0.0, 0.0, 390.0, 844.0));
        stack.set_data_source(&palette);
        stack.set_delegate(&narrator);
        stack.reset();
        Ok(Self {
            stack,
            _palette: palette,
            narrator,
        })
    }

    fn top(&self) -> Option<usize> {
        self.stack.top_card().map(|card| card.absolute_index())
    }

    /// Tick until every motion has settled.
    fn run_until_idle(&mut self) {
        let mut frames = 0;
        while self.stack.is_animating() {
            if frames == MAX_FRAMES {
                warn!(frames, "stack still animating");
                return;
            }
            self.stack.tick(FRAME);
            frames += 1;
        }
        debug!(frames, "settled");
    }

    /// Drag the front card along `to` over `steps` samples and release.
    fn drag(&mut self, to: Vec2, release_velocity: Vec2, steps: u32) {
        let Some(index) = self.top() else {
            warn!("nothing to drag");
            return;
        };
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = to * (f64::from(step) / f64::from(steps));
            let phase = if step == 1 {
                GesturePhase::Began
            } else {
                GesturePhase::Changed
            };
            self.stack.handle_gesture(index, t, release_velocity, phase);
            self.stack.tick(FRAME);
        }
        self.stack
            .handle_gesture(index, to, release_velocity, GesturePhase::Ended);
        self.run_until_idle();
    }

    /// Tap the front card. The reload card resets the stack.
    fn tap(&mut self) {
        let Some(index) = self.top() else {
            return;
        };
        let reload = self
            .stack
            .card(index)
            .is_some_and(|card| card.content().reload);
        if reload {
            info!("reload tapped");
            self.stack.reset();
            return;
        }
        self.stack.flip(index);
        self.run_until_idle();
    }

    fn snapshot(&self, label: &str) {
        info!("-- {label} --");
        for card in self.stack.cards() {
            let pose = card.pose();
            let offset = pose.transform.translation();
            info!(
                index = card.absolute_index(),
                depth = card.visible_index(),
                state = card.state().as_str(),
                face = %card.face(),
                alpha = format_args!("{:.2}", pose.alpha),
                offset = format_args!("({:.1}, {:.1})", offset.x, offset.y),
                "card"
            );
        }
    }
}

fn load_config() -> Result<StackConfig, DemoError> {
    let json = std::env::var("CARDS_DEMO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_owned());
    let config: StackConfig = serde_json::from_str(&json)?;
    config.validate()?;
    Ok(config)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<(), DemoError> {
    init_tracing();

    let config = load_config()?;
    info!(?config, "starting demo");
    let mut host = Host::new(config)?;
    host.snapshot("initial");

    // Fling right: throw-out.
    host.drag(Vec2::new(160.0, -10.0), Vec2::new(1200.0, -60.0), 6);
    host.snapshot("after throw-out");

    // Fling left: put at the end.
    host.drag(Vec2::new(-170.0, 12.0), Vec2::new(-1100.0, 40.0), 6);
    host.snapshot("after put-at-end");

    // Short, slow drag springs back.
    host.drag(Vec2::new(20.0, 0.0), Vec2::new(100.0, 0.0), 3);

    // Vertical swipes are refused by the delegate.
    host.drag(Vec2::new(0.0, -200.0), Vec2::new(0.0, -1500.0), 4);

    // Tap flips the front card.
    host.tap();
    host.snapshot("after flip");

    let shaken = Rc::new(Cell::new(false));
    let flag = Rc::clone(&shaken);
    host.stack.shake_with(move || flag.set(true));
    host.run_until_idle();
    info!(shaken = shaken.get(), "shake finished");

    // Programmatic swipes until only the reload card is left.
    while let Some(index) = host.top() {
        if index == PALETTE.len() {
            break;
        }
        host.stack
            .perform_swipe(SwipeAnimation::ThrowOut, Direction::Right);
        host.run_until_idle();
    }
    host.snapshot("drained");

    // The reload card refuses swipes; tapping it starts over.
    host.drag(Vec2::new(200.0, 0.0), Vec2::new(1500.0, 0.0), 4);
    host.tap();
    host.snapshot("reloaded");

    info!(finished = host.narrator.finished.get(), "demo complete");
    Ok(())
}
