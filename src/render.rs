//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`]. The engine walks the
//! render tree once per frame and sorts every [`Instanced`] into the batches of
//! the frame: shadow casters (depth pass from the sun), lit meshes and unlit meshes.

use crate::data_structures::{
    model::Model,
    scene_graph::{SceneGraph, SceneNode, Shading},
};

/// Data for instanced object rendering: a model, its instance buffer and how to draw it.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub shading: Shading,
    pub cast_shadow: bool,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced objects
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

/// The per-frame draw lists, filled by [`Render::set_pipelines`].
#[derive(Default)]
pub struct Batches<'a> {
    pub shadow_casters: Vec<Instanced<'a>>,
    pub lit: Vec<Instanced<'a>>,
    pub unlit: Vec<Instanced<'a>>,
}

impl<'a> Batches<'a> {
    fn push(&mut self, instanced: Instanced<'a>) {
        if instanced.amount == 0 {
            log::warn!("you attempted to render something with zero instances");
            return;
        }
        if instanced.cast_shadow {
            self.shadow_casters.push(instanced.clone());
        }
        match instanced.shading {
            Shading::Lit => self.lit.push(instanced),
            Shading::Unlit => self.unlit.push(instanced),
        }
    }
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.push(instanced),
            Render::Defaults(vec) => vec.into_iter().for_each(|instanced| batches.push(instanced)),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        let mut instanced = sn.get_render();
        match instanced.len() {
            0 => Render::None,
            1 => match instanced.pop() {
                Some(single) => Render::Default(single),
                None => Render::None,
            },
            _ => Render::Defaults(instanced),
        }
    }
}

/// One render per root, in attachment order.
impl<'a> From<&'a SceneGraph> for Render<'a> {
    fn from(scene: &'a SceneGraph) -> Self {
        Render::Composed(scene.roots().map(Render::from).collect())
    }
}
