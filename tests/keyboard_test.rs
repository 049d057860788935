use park_scene::{
    camera::Camera,
    park::keyboard::nudge,
};
use winit::keyboard::{Key, NamedKey, SmolStr};

use crate::common::test_utils::assert_vec_close;

mod common;

#[test]
fn should_map_arrow_keys_to_ground_plane_moves() {
    let cases = [
        (NamedKey::ArrowUp, [0.0, 0.0, -10.0]),
        (NamedKey::ArrowDown, [0.0, 0.0, 10.0]),
        (NamedKey::ArrowLeft, [-10.0, 0.0, 0.0]),
        (NamedKey::ArrowRight, [10.0, 0.0, 0.0]),
    ];
    for (key, expected) in cases {
        let delta = nudge(&Key::Named(key), 10.0).expect("arrow keys always move");
        assert_vec_close(delta, expected);
    }
}

#[test]
fn should_ignore_other_keys() {
    assert!(nudge(&Key::Named(NamedKey::Enter), 10.0).is_none());
    assert!(nudge(&Key::Character(SmolStr::new("w")), 10.0).is_none());
}

#[test]
fn should_move_the_eye_but_not_the_target() {
    let mut camera = Camera::new((0.0, 50.0, 150.0));
    let up = nudge(&Key::Named(NamedKey::ArrowUp), 10.0).expect("arrow up moves");
    camera.translate(up);
    camera.translate(up);
    assert_vec_close(
        cgmath::Vector3::new(camera.position.x, camera.position.y, camera.position.z),
        [0.0, 50.0, 130.0],
    );
    assert_eq!(camera.target, cgmath::Point3::new(0.0, 0.0, 0.0));
}
