use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector4};
use park_scene::pipelines::light::{Light, LightUniform};

use crate::common::test_utils::assert_close;

mod common;

fn project(light: &Light, point: Point3<f32>) -> Vector4<f32> {
    light.view_proj() * point.to_homogeneous()
}

#[test]
fn should_keep_the_uniform_layout() {
    assert_eq!(std::mem::size_of::<LightUniform>(), 112);
}

#[test]
fn should_centre_the_origin_in_the_shadow_map() {
    let light = Light::default();
    let clip = project(&light, Point3::origin());
    assert_close(clip.x, 0.0);
    assert_close(clip.y, 0.0);
    assert_close(clip.w, 1.0);
    assert!(clip.z > 0.0 && clip.z < 1.0, "depth {} outside the map", clip.z);
}

#[test]
fn should_put_points_towards_the_sun_closer() {
    let light = Light::default();
    let towards_sun = Point3::from_vec(light.position.to_vec().normalize() * 50.0);
    let origin = project(&light, Point3::origin());
    let closer = project(&light, towards_sun);
    assert!(closer.z < origin.z);
}

#[test]
fn should_cover_the_whole_ground() {
    let light = Light {
        position: Point3::new(50.0, 20.0, 10.0),
        ..Default::default()
    };
    for corner in [
        Point3::new(-200.0, 0.0, -200.0),
        Point3::new(200.0, 0.0, -200.0),
        Point3::new(-200.0, 0.0, 200.0),
        Point3::new(200.0, 0.0, 200.0),
    ] {
        let clip = project(&light, corner);
        assert!(clip.x.abs() <= 1.0 && clip.y.abs() <= 1.0, "{corner:?} -> {clip:?}");
        assert!(clip.z >= 0.0 && clip.z <= 1.0, "{corner:?} -> {clip:?}");
    }
}

#[test]
fn should_handle_a_sun_straight_overhead() {
    let light = Light {
        position: Point3::new(0.0, 20.0, 0.0),
        ..Default::default()
    };
    let clip = project(&light, Point3::origin());
    assert!(clip.x.is_finite() && clip.y.is_finite() && clip.z.is_finite());
}

#[test]
fn should_only_flag_shadows_when_both_switches_are_on() {
    let shadows = |light: &Light, enabled: bool| {
        let uniform = LightUniform::from_light(light, enabled);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        floats[27]
    };
    let casting = Light::default();
    let not_casting = Light {
        cast_shadows: false,
        ..Default::default()
    };
    assert_eq!(shadows(&casting, true), 1.0);
    assert_eq!(shadows(&casting, false), 0.0);
    assert_eq!(shadows(&not_casting, true), 0.0);
}
