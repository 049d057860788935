use park_scene::{
    data_structures::scene_graph::{Paint, SceneNode, traverse},
    park::{
        ParkState,
        trees::{TreeSite, tree_attachment, tree_sites},
    },
};

use crate::common::test_utils::{CYCLE, CyclingColours, FakeNode, assert_vec_close};

mod common;

fn park_state() -> ParkState {
    ParkState::with_colours(Box::new(CyclingColours::default()))
}

/// A loaded tree: a trunk and a crown below a group, the crown lifted by 2.
fn fake_tree() -> Box<dyn SceneNode> {
    Box::new(FakeNode::group(vec![
        Box::new(FakeNode::mesh()),
        Box::new(FakeNode::mesh().at(0.0, 2.0, 0.0)),
    ]))
}

fn surfaces(node: &dyn SceneNode) -> Vec<park_scene::data_structures::scene_graph::Surface> {
    let mut found = Vec::new();
    traverse(node, &mut |node| {
        if let Some(surface) = node.surface() {
            found.push(surface.clone());
        }
    });
    found
}

#[test]
fn should_place_and_scale_the_tree_root() {
    let mut state = park_state();
    let site = TreeSite { x: 50.0, z: -50.0 };
    let id = state.attach_tree(site, 10.0, fake_tree());
    state.scene.update_world_transforms();

    let root = state.scene.get(id).expect("the tree was attached");
    let world = root.get_world_transform();
    assert_vec_close(world.position, [50.0, 0.0, -50.0]);
    assert_vec_close(world.scale, [10.0, 10.0, 10.0]);

    // the crown's local offset is scaled with the tree
    let crown = &root.get_children()[0].get_children()[1];
    assert_vec_close(crown.get_world_transform().position, [50.0, 20.0, -50.0]);
}

#[test]
fn should_paint_every_mesh_its_own_colour() {
    let mut state = park_state();
    let id = state.attach_tree(TreeSite { x: 0.0, z: 0.0 }, 1.0, fake_tree());

    let root = state.scene.get(id).expect("the tree was attached");
    let found = surfaces(root);
    assert_eq!(found.len(), 2);
    for (surface, expected) in found.iter().zip(CYCLE) {
        assert!(
            matches!(surface.paint, Some(Paint::Colour(rgb)) if rgb == expected),
            "unexpected paint {:?}",
            surface.paint
        );
    }
    assert_eq!(state.trees[0].colours, vec![CYCLE[0], CYCLE[1]]);
}

#[test]
fn should_make_tree_meshes_cast_and_receive_shadows() {
    let mut state = park_state();
    let id = state.attach_tree(TreeSite { x: 0.0, z: 0.0 }, 1.0, fake_tree());

    let root = state.scene.get(id).expect("the tree was attached");
    for surface in surfaces(root) {
        assert!(surface.cast_shadow);
        assert!(surface.receive_shadow);
    }
}

#[test]
fn should_colour_trees_independently() {
    let mut state = park_state();
    for site in tree_sites(20.0) {
        state.attach_tree(site, 10.0, fake_tree());
    }
    assert_eq!(state.trees.len(), 4);
    assert_eq!(state.scene.len(), 4);
    // two meshes per tree, so the second tree continues the cycle where the first stopped
    assert_eq!(state.trees[1].colours, vec![CYCLE[2], CYCLE[0]]);
    let sites: Vec<_> = state.trees.iter().map(|tree| tree.site).collect();
    assert_eq!(sites, tree_sites(20.0));
}

#[test]
fn should_leave_the_park_untouched_when_a_load_fails() {
    let mut state = park_state();
    let failed = tree_attachment(
        TreeSite { x: -50.0, z: -50.0 },
        10.0,
        Err(anyhow::anyhow!("tree.glb: not found")),
    );
    failed(&mut state);
    assert!(state.trees.is_empty());
    assert!(state.scene.is_empty());

    let loaded = tree_attachment(TreeSite { x: 50.0, z: 50.0 }, 10.0, Ok(fake_tree()));
    loaded(&mut state);
    assert_eq!(state.trees.len(), 1);
    assert_eq!(state.trees[0].site, TreeSite { x: 50.0, z: 50.0 });
}

#[test]
fn should_accept_trees_in_any_order() {
    let mut state = park_state();
    let sites = tree_sites(20.0);
    for site in sites.iter().rev() {
        tree_attachment(*site, 10.0, Ok(fake_tree()))(&mut state);
    }
    state.scene.update_world_transforms();
    for tree in &state.trees {
        let root = state.scene.get(tree.node).expect("the tree was attached");
        let position = root.get_world_transform().position;
        assert_vec_close(position, [tree.site.x, 0.0, tree.site.z]);
    }
}
