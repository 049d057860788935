use std::f32::consts::FRAC_PI_2;

use cgmath::{Deg, InnerSpace, Point3};
use park_scene::camera::{Camera, OrbitController, Projection};

use crate::common::test_utils::{assert_close, assert_vec_close};

mod common;

fn setup() -> (Camera, Projection) {
    let camera = Camera::new((0.0, 0.0, 10.0));
    let projection = Projection::new(800, 600, Deg(75.0), 0.1, 1000.0);
    (camera, projection)
}

fn azimuth(camera: &Camera) -> f32 {
    let offset = camera.position - camera.target;
    offset.x.atan2(offset.z)
}

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

#[test]
fn should_apply_rotation_at_once_without_damping() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600);
    controller.rotate_left(FRAC_PI_2);
    controller.update(&mut camera, &projection);
    assert_vec_close(camera.position - Point3::new(0.0, 0.0, 0.0), [-10.0, 0.0, 0.0]);

    // nothing left over for the next frame
    controller.update(&mut camera, &projection);
    assert_vec_close(camera.position - Point3::new(0.0, 0.0, 0.0), [-10.0, 0.0, 0.0]);
}

#[test]
fn should_glide_with_damping() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600).with_damping(0.25);
    controller.rotate_left(1.0);

    controller.update(&mut camera, &projection);
    assert_close(azimuth(&camera), -0.25);
    controller.update(&mut camera, &projection);
    assert_close(azimuth(&camera), -0.25 - 0.1875);

    for _ in 0..200 {
        controller.update(&mut camera, &projection);
    }
    // the whole drag is eventually applied
    assert_close(azimuth(&camera), -1.0);
    assert_close(distance(&camera), 10.0);
}

#[test]
fn should_zoom_towards_the_target() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600);
    controller.zoom(1.0);
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), 9.5);

    controller.zoom(-1.0);
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), 10.0);
}

#[test]
fn should_ignore_the_wheel_when_zoom_is_disabled() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600).with_zoom(false);
    controller.zoom(3.0);
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), 10.0);
}

#[test]
fn should_keep_an_eye_moved_by_the_keyboard() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600).with_damping(0.25);
    camera.translate(cgmath::Vector3::new(10.0, 0.0, 0.0));
    controller.update(&mut camera, &projection);
    assert_vec_close(camera.position - Point3::new(0.0, 0.0, 0.0), [10.0, 0.0, 10.0]);
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_not_flip_over_the_pole() {
    let (mut camera, projection) = setup();
    let mut controller = OrbitController::new(600);
    controller.rotate_up(10.0);
    controller.update(&mut camera, &projection);
    assert!(camera.position.y > 9.9);
    assert_close(distance(&camera), 10.0);
}

#[test]
fn should_follow_the_window_aspect() {
    let (_, mut projection) = setup();
    assert_close(projection.aspect(), 800.0 / 600.0);
    projection.resize(1200, 400);
    assert_close(projection.aspect(), 3.0);
    // a minimised window must not divide by zero
    projection.resize(640, 0);
    assert_close(projection.aspect(), 640.0);
}
