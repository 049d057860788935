use cgmath::{Point3, Rotation, Vector3};
use park_scene::park::{
    bench::{BenchMaterial, bench_layout, bench_transform},
    config::ParkConfig,
    ground::ground_transform,
    trees::{TreeSite, tree_sites},
};

use crate::common::test_utils::{assert_close, assert_vec_close};

mod common;

#[test]
fn should_lay_out_six_bench_parts() {
    let parts = bench_layout();
    let names: Vec<_> = parts.iter().map(|part| part.name).collect();
    assert_eq!(
        names,
        ["seat", "leg 1", "leg 2", "leg 3", "leg 4", "backrest"]
    );

    let seat = &parts[0];
    assert_eq!(seat.size, [6.0, 0.3, 1.5]);
    assert_vec_close(seat.offset, [0.0, 0.0, 0.0]);

    let backrest = &parts[5];
    assert_eq!(backrest.size, [6.0, 1.5, 0.3]);
    assert_vec_close(backrest.offset, [0.0, 0.75, -0.75]);
    assert_eq!(backrest.material, BenchMaterial::Seat);
}

#[test]
fn should_place_legs_symmetrically_under_the_seat() {
    let parts = bench_layout();
    let legs: Vec<_> = parts
        .iter()
        .filter(|part| part.material == BenchMaterial::Leg)
        .collect();
    assert_eq!(legs.len(), 4);

    let sum = legs
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, leg| acc + leg.offset);
    assert_close(sum.x, 0.0);
    assert_close(sum.z, 0.0);

    for leg in legs {
        assert_eq!(leg.size, [0.3, 1.2, 0.3]);
        assert_close(leg.offset.x.abs(), 2.2);
        assert_close(leg.offset.y, -0.6);
        assert_close(leg.offset.z.abs(), 0.6);
        // legs stay inside the seat footprint
        assert!(leg.offset.x.abs() < 3.0 && leg.offset.z.abs() < 0.75);
    }
}

#[test]
fn should_place_and_scale_the_bench_from_the_config() {
    let config = ParkConfig::default();
    let transform = bench_transform(&config);
    assert_vec_close(transform.position, [0.0, 10.0, 0.0]);
    assert_vec_close(transform.scale, [10.5, 10.5, 10.5]);

    let moved = ParkConfig {
        bench_position: Vector3::new(5.0, 0.0, -5.0),
        bench_scale: 2.0,
        ..ParkConfig::default()
    };
    let transform = bench_transform(&moved);
    assert_vec_close(transform.position, [5.0, 0.0, -5.0]);
    assert_vec_close(transform.scale, [2.0, 2.0, 2.0]);
}

#[test]
fn should_put_trees_in_the_four_corners() {
    let sites = tree_sites(20.0);
    assert_eq!(
        sites,
        [
            TreeSite { x: -50.0, z: -50.0 },
            TreeSite { x: 50.0, z: 50.0 },
            TreeSite { x: -50.0, z: 50.0 },
            TreeSite { x: 50.0, z: -50.0 },
        ]
    );
}

#[test]
fn should_move_trees_outwards_with_the_gap() {
    for site in tree_sites(0.0) {
        assert_close(site.x.abs(), 30.0);
        assert_close(site.z.abs(), 30.0);
    }
}

#[test]
fn should_lay_the_ground_flat_facing_up() {
    let up = ground_transform().rotation.rotate_vector(Vector3::unit_z());
    assert_vec_close(up, [0.0, 1.0, 0.0]);
}

#[test]
fn should_default_to_the_park_constants() {
    let config = ParkConfig::default();
    assert_eq!(config.camera_position, Point3::new(0.0, 50.0, 150.0));
    assert_eq!(config.fovy, cgmath::Deg(75.0));
    assert_eq!(config.damping_factor, 0.25);
    assert!(config.enable_zoom);
    assert_eq!(config.sun_position, Point3::new(10.0, 20.0, 10.0));
    assert_eq!(config.ambient_intensity, 1.5);
    assert_close(config.ambient_colour[0], 64.0 / 255.0);
    assert_eq!(config.ground_size, 400.0);
    assert_eq!(config.tree_scale, 10.0);
    assert_eq!(config.keyboard_step, 10.0);
}
