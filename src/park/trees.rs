use crate::{
    data_structures::scene_graph::{NodeId, SceneNode},
    flow::Mutation,
    park::ParkState,
};

/// Where a tree stands on the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeSite {
    pub x: f32,
    pub z: f32,
}

/// The four corners of the park, `30 + gap` away from the centre on both axes.
pub fn tree_sites(gap: f32) -> [TreeSite; 4] {
    let d = 30.0 + gap;
    [
        TreeSite { x: -d, z: -d },
        TreeSite { x: d, z: d },
        TreeSite { x: -d, z: d },
        TreeSite { x: d, z: -d },
    ]
}

/// A tree that made it into the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeInstance {
    pub site: TreeSite,
    pub node: NodeId,
    /// One colour per mesh node, in traversal order.
    pub colours: Vec<[f32; 3]>,
}

/// Turns the outcome of one tree load into a state change. A failed load only
/// logs, so the other trees are unaffected.
pub fn tree_attachment(
    site: TreeSite,
    scale: f32,
    loaded: anyhow::Result<Box<dyn SceneNode>>,
) -> Mutation<ParkState> {
    match loaded {
        Ok(node) => Box::new(move |state: &mut ParkState| {
            state.attach_tree(site, scale, node);
        }),
        Err(e) => {
            log::warn!("Tree at ({}, {}) could not be loaded: {:#}", site.x, site.z, e);
            Box::new(|_: &mut ParkState| ())
        }
    }
}
