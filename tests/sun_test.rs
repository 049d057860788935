use park_scene::park::sun::{SUN_SPEED, SunOscillator};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn should_start_at_ten_moving_right() {
    let mut sun = SunOscillator::default();
    assert_close(sun.x, 10.0);
    assert_close(sun.advance(), 10.5);
    assert_close(sun.advance(), 11.0);
}

#[test]
fn should_flip_after_overshooting_the_bound() {
    let mut sun = SunOscillator {
        x: 49.8,
        direction: 1.0,
        step: 0.5,
        bound: 50.0,
    };
    assert_close(sun.advance(), 50.3);
    assert_eq!(sun.direction, -1.0);
    assert_close(sun.advance(), 49.8);
    assert_eq!(sun.direction, -1.0);
}

#[test]
fn should_flip_at_the_lower_bound() {
    let mut sun = SunOscillator {
        x: -49.8,
        direction: -1.0,
        step: 0.5,
        bound: 50.0,
    };
    assert_close(sun.advance(), -50.3);
    assert_eq!(sun.direction, 1.0);
    assert_close(sun.advance(), -49.8);
}

#[test]
fn should_stay_within_one_step_of_the_band() {
    let mut sun = SunOscillator::default();
    let mut seen_left = false;
    let mut seen_right = false;
    for _ in 0..10_000 {
        let x = sun.advance();
        assert!(x.abs() <= sun.bound + sun.step, "{x} left the band");
        seen_left |= x < -49.0;
        seen_right |= x > 49.0;
    }
    assert!(seen_left && seen_right, "the sun never swung across the park");
}

#[test]
fn should_replay_identically() {
    let mut a = SunOscillator::default();
    let mut b = SunOscillator::default();
    for _ in 0..500 {
        assert_eq!(a.advance(), b.advance());
    }
    assert_eq!(a, b);
}

#[test]
fn should_scale_with_elapsed_time() {
    let mut sun = SunOscillator::default();
    sun.advance_by(instant::Duration::from_millis(100));
    assert_close(sun.x, 10.0 + SUN_SPEED * 0.1);

    let mut still = SunOscillator::default();
    still.advance_by(instant::Duration::ZERO);
    assert_close(still.x, 10.0);
}
