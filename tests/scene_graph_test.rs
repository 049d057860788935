use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use park_scene::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, NodeId, SceneGraph, SceneNode, Shading, Surface},
    },
    render::Render,
};

use crate::common::test_utils::{FakeNode, assert_vec_close};

mod common;

#[test]
fn should_compose_position_rotation_and_scale() {
    let parent = Instance {
        position: Vector3::new(1.0, 0.0, 0.0),
        rotation: Quaternion::from_angle_y(Deg(90.0)),
        scale: Vector3::new(2.0, 2.0, 2.0),
    };
    let child = Instance::from(Vector3::new(1.0, 0.0, 0.0));
    let world = &parent * &child;
    // scaled to 2 along X, turned onto -Z, moved by the parent
    assert_vec_close(world.position, [1.0, 0.0, -2.0]);
    assert_vec_close(world.scale, [2.0, 2.0, 2.0]);
}

#[test]
fn should_match_the_matrix_product() {
    let parent = Instance {
        position: Vector3::new(3.0, -1.0, 2.0),
        rotation: Quaternion::from_angle_x(Deg(-90.0)),
        scale: Vector3::new(10.0, 10.0, 10.0),
    };
    let child = Instance {
        position: Vector3::new(0.5, 1.0, -0.25),
        ..Default::default()
    };
    let composed = (&parent * &child).to_matrix();
    let product = parent.to_matrix() * child.to_matrix();
    let composed: [[f32; 4]; 4] = composed.into();
    let product: [[f32; 4]; 4] = product.into();
    for (a, b) in composed.iter().flatten().zip(product.iter().flatten()) {
        assert!((a - b).abs() < 1e-4, "{composed:?} != {product:?}");
    }
}

#[test]
fn should_propagate_world_transforms_to_children() {
    let mut group =
        ContainerNode::with_children(vec![Box::new(FakeNode::mesh().at(0.0, 1.0, 0.0))]);
    group.set_local_transform(
        Instance::from(Vector3::new(0.0, 10.0, 0.0)).with_uniform_scale(10.5),
    );

    let mut scene = SceneGraph::new();
    let id = scene.attach(Box::new(group));
    scene.update_world_transforms();

    let root = scene.get(id).expect("attached");
    let child = &root.get_children()[0];
    assert_vec_close(child.get_world_transform().position, [0.0, 20.5, 0.0]);
}

#[test]
fn should_hand_out_stable_ids() {
    let mut scene = SceneGraph::new();
    assert!(scene.is_empty());
    let first = scene.attach(Box::new(ContainerNode::new()));
    let second = scene.attach(Box::new(ContainerNode::new()));
    assert_eq!(first, NodeId(0));
    assert_eq!(second, NodeId(1));
    assert_eq!(scene.len(), 2);
    assert!(scene.get(NodeId(2)).is_none());
}

#[test]
fn should_default_to_lit_surfaces_without_shadows() {
    let surface = Surface::default();
    assert_eq!(surface.shading, Shading::Lit);
    assert!(!surface.cast_shadow);
    assert!(!surface.receive_shadow);
    assert!(surface.paint.is_none());
}

#[test]
fn should_flag_receivers_in_the_raw_instance() {
    let raw = Instance::default().to_raw(true);
    let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&raw));
    assert_eq!(bytes.len(), 27);
    assert_eq!(bytes[26], 1.0);
    // identity keeps a right handed frame
    assert_eq!(bytes[25], 1.0);
    let raw = Instance::default().to_raw(false);
    let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&raw));
    assert_eq!(bytes[26], 0.0);
}

#[test]
fn should_render_one_entry_per_root() {
    let mut scene = SceneGraph::new();
    scene.attach(Box::new(FakeNode::mesh()));
    scene.attach(Box::new(FakeNode::group(vec![Box::new(FakeNode::mesh())])));

    let Render::Composed(renders) = Render::from(&scene) else {
        panic!("a scene renders as a composition of its roots");
    };
    assert_eq!(renders.len(), 2);
    // nodes without GPU buffers have nothing to draw
    assert!(renders.iter().all(|render| matches!(render, Render::None)));

    let roots: Vec<_> = scene.roots().collect();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[1].get_children().len(), 1);
}
