//! Integration tests for tweens, springs and keyframe tracks.

use cards_motion::*;
use kurbo::{Affine, Vec2};
use proptest::prelude::*;
use std::time::Duration;

const MS_100: Duration = Duration::from_millis(100);
const MS_400: Duration = Duration::from_millis(400);

#[test]
fn tween_completes_with_small_steps() {
    let mut tween = Tween::new(Timing::ease_out(MS_400));
    for _ in 0..400 {
        tween.tick(Duration::from_millis(1));
    }
    assert!(tween.is_complete(), "400x1ms should complete a 400ms tween");
    assert_eq!(tween.value(), 1.0);
}

#[test]
fn spring_tween_overshoots_then_lands() {
    let mut tween = Tween::new(Timing::spring(MS_400, 0.8));
    let mut peak = 0.0_f64;
    for _ in 0..40 {
        tween.tick(Duration::from_millis(10));
        peak = peak.max(tween.value());
    }
    assert!(peak > 1.0, "damping 0.8 should overshoot slightly: {peak}");
    assert!(peak < 1.1, "damping 0.8 overshoot too large: {peak}");
    assert_eq!(tween.value(), 1.0);
}

#[test]
fn track_forwards_overshoot_between_segments() {
    let mut track = Track::new(Vec2::ZERO)
        .then(Timing::linear(MS_100), Vec2::new(100.0, 0.0))
        .then(Timing::linear(MS_100), Vec2::new(100.0, 100.0));
    let crossed = track.advance(Duration::from_millis(150));
    assert_eq!(crossed, 0..1);
    let v = *track.value();
    assert!((v.x - 100.0).abs() < 1e-9 && (v.y - 50.0).abs() < 1e-9, "{v:?}");
}

#[test]
fn affine_track_ends_on_exact_keyframe() {
    let target = Affine::translate((320.0, -12.0)) * Affine::rotate(0.2);
    let mut track = Track::new(Affine::IDENTITY).then(Timing::ease_in_out(MS_400), target);
    for _ in 0..7 {
        track.advance(Duration::from_millis(60));
    }
    assert!(track.is_complete());
    assert_eq!(*track.value(), target);
}

#[test]
fn easing_functions_are_monotonic() {
    for easing in [linear, ease_in, ease_out, ease_in_out] {
        let mut prev = 0.0_f64;
        for i in 0..=100 {
            let t = f64::from(i) / 100.0;
            let v = easing(t);
            assert!(v >= prev - 1e-12, "easing should be monotonic at t={t}");
            prev = v;
        }
    }
}

proptest! {
    #[test]
    fn track_total_time_is_step_independent(
        steps in proptest::collection::vec(1u64..80, 1..60),
    ) {
        let mut track = Track::new(0.0_f64)
            .then(Timing::linear(MS_100), 1.0)
            .then(Timing::ease_in(MS_100), 2.0)
            .then(Timing::spring(MS_100, 0.8), 3.0);
        let mut crossed = 0;
        let mut spent = Duration::ZERO;
        for ms in steps {
            let dt = Duration::from_millis(ms);
            spent += dt;
            let range = track.advance(dt);
            prop_assert_eq!(range.start, crossed);
            crossed = range.end;
        }
        prop_assert_eq!(track.is_complete(), spent >= Duration::from_millis(300));
        if track.is_complete() {
            prop_assert_eq!(*track.value(), 3.0);
        }
    }

    #[test]
    fn non_spring_tweens_stay_in_unit_range(ms in 0u64..1000) {
        for timing in [
            Timing::linear(MS_400),
            Timing::ease_in(MS_400),
            Timing::ease_out(MS_400),
            Timing::ease_in_out(MS_400),
        ] {
            let mut tween = Tween::new(timing);
            tween.tick(Duration::from_millis(ms));
            let v = tween.value();
            prop_assert!((0.0..=1.0).contains(&v), "{timing:?} gave {v}");
        }
    }
}
