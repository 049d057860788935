//! The park scene.
//!
//! [`Park`] is the flow that builds the scene once and animates it: a textured
//! ground, a bench made of boxes, four trees loaded from a glTF file, ambient plus
//! directional light and a sun that swings back and forth along X. All mutable
//! scene data lives in [`ParkState`], which the engine lends to every hook.

pub mod bench;
pub mod colour;
pub mod config;
pub mod ground;
pub mod keyboard;
pub mod sun;
pub mod trees;

use cgmath::{Point3, Vector3};
use instant::Duration;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};

use crate::{
    camera::{Camera, OrbitController, Projection},
    context::Context,
    data_structures::{
        instance::Instance,
        scene_graph::{
            ContainerNode, NodeId, Paint, SceneGraph, SceneNode, for_each_surface_mut,
        },
        texture::Texture,
    },
    flow::{FlowConstructor, GraphicsFlow, Mutation, Out},
    render::Render,
    resources::{load_model_gltf, texture::load_texture},
};

use self::{
    colour::{ColourSource, RandomColours},
    config::ParkConfig,
    sun::SunOscillator,
    trees::{TreeInstance, TreeSite, tree_attachment, tree_sites},
};

/// Everything in the park that changes after start-up.
pub struct ParkState {
    pub sun: SunOscillator,
    pub scene: SceneGraph,
    pub trees: Vec<TreeInstance>,
    pub colours: Box<dyn ColourSource>,
    pub bench: Option<NodeId>,
    pub ground: Option<NodeId>,
}

impl Default for ParkState {
    fn default() -> Self {
        Self::with_colours(Box::new(RandomColours::from_entropy()))
    }
}

impl std::fmt::Debug for ParkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParkState")
            .field("sun", &self.sun)
            .field("scene", &self.scene.len())
            .field("trees", &self.trees)
            .finish()
    }
}

impl ParkState {
    pub fn with_colours(colours: Box<dyn ColourSource>) -> Self {
        Self {
            sun: SunOscillator::default(),
            scene: SceneGraph::new(),
            trees: Vec::new(),
            colours,
            bench: None,
            ground: None,
        }
    }

    /// Puts a loaded tree into the park.
    ///
    /// The tree is grouped under a root at `(site.x, 0, site.z)` scaled by `scale`.
    /// Every mesh node gets its own colour from the colour source and casts and
    /// receives shadows.
    pub fn attach_tree(
        &mut self,
        site: TreeSite,
        scale: f32,
        mut node: Box<dyn SceneNode>,
    ) -> NodeId {
        let mut colours = Vec::new();
        let source = &mut self.colours;
        for_each_surface_mut(node.as_mut(), &mut |surface| {
            let colour = source.next_colour();
            surface.paint = Some(Paint::Colour(colour));
            surface.cast_shadow = true;
            surface.receive_shadow = true;
            colours.push(colour);
        });

        let mut root = ContainerNode::with_children(vec![node]);
        root.set_local_transform(
            Instance::from(Vector3::new(site.x, 0.0, site.z)).with_uniform_scale(scale),
        );
        let id = self.scene.attach(Box::new(root));
        log::info!(
            "Tree attached at ({}, {}) with {} mesh node(s)",
            site.x,
            site.z,
            colours.len()
        );
        self.trees.push(TreeInstance {
            site,
            node: id,
            colours,
        });
        id
    }

    /// Paints `texture` onto every mesh below `id`. Unknown ids are ignored.
    pub fn paint_texture(&mut self, id: NodeId, texture: Texture) {
        let Some(node) = self.scene.get_mut(id) else {
            log::warn!("No scene node {:?} to paint", id);
            return;
        };
        for_each_surface_mut(node, &mut |surface| {
            surface.paint = Some(Paint::Texture(texture.clone()));
        });
    }
}

/// The scene director.
#[derive(Clone, Debug, Default)]
pub struct Park {
    config: ParkConfig,
}

impl Park {
    pub fn new(config: ParkConfig) -> Self {
        Self { config }
    }

    pub fn constructor(config: ParkConfig) -> FlowConstructor<ParkState> {
        Box::new(move |_| {
            Box::pin(async move {
                let flow: Box<dyn GraphicsFlow<ParkState>> = Box::new(Park::new(config));
                flow
            })
        })
    }

    fn configure_context(&self, ctx: &mut Context) {
        let config = &self.config;
        ctx.clear_colour = config.clear_colour;

        let mut camera = Camera::new(config.camera_position);
        camera.target = Point3::new(0.0, 0.0, 0.0);
        ctx.camera.camera = camera;
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            config.fovy,
            config.znear,
            config.zfar,
        );
        ctx.camera.controller = OrbitController::new(ctx.config.height)
            .with_damping(config.damping_factor)
            .with_zoom(config.enable_zoom);

        let light = &mut ctx.light.light;
        light.position = config.sun_position;
        light.colour = config.sun_colour;
        light.intensity = config.sun_intensity;
        light.ambient_colour = config.ambient_colour;
        light.ambient_intensity = config.ambient_intensity;
        light.cast_shadows = true;
        ctx.set_shadows(true);
    }

    fn texture_request(
        &self,
        ctx: &Context,
        path: &str,
        target: NodeId,
    ) -> Box<dyn Future<Output = Mutation<ParkState>>> {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let path = path.to_string();
        Box::new(async move {
            let mutation: Mutation<ParkState> =
                match load_texture(&path, false, &device, &queue, None).await {
                    Ok(texture) => Box::new(move |state: &mut ParkState| {
                        state.paint_texture(target, texture);
                    }),
                    Err(e) => {
                        log::warn!(
                            "Texture {} could not be loaded, keeping the placeholder: {:#}",
                            path,
                            e
                        );
                        Box::new(|_: &mut ParkState| ())
                    }
                };
            mutation
        })
    }

    fn tree_request(
        &self,
        ctx: &Context,
        site: TreeSite,
    ) -> Box<dyn Future<Output = Mutation<ParkState>>> {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let path = self.config.tree_model.clone();
        let scale = self.config.tree_scale;
        Box::new(async move {
            let loaded = load_model_gltf(&path, &device, &queue).await;
            tree_attachment(site, scale, loaded)
        })
    }
}

impl GraphicsFlow<ParkState> for Park {
    fn on_init(&mut self, ctx: &mut Context, state: &mut ParkState) -> Out<ParkState> {
        self.configure_context(ctx);
        let config = &self.config;
        state.sun = SunOscillator::new(config.sun_position.x, config.sun_step, config.sun_bound);

        let bench = bench::build_bench(&ctx.device, &ctx.queue, config);
        let bench = state.scene.attach(bench);
        state.bench = Some(bench);

        let ground = ground::build_ground(&ctx.device, &ctx.queue, config.ground_size);
        let ground = state.scene.attach(ground);
        state.ground = Some(ground);

        let ctx: &Context = ctx;
        let mut requests = vec![
            self.texture_request(ctx, &config.bench_texture, bench),
            self.texture_request(ctx, &config.ground_texture, ground),
        ];
        requests.extend(
            tree_sites(config.tree_gap)
                .into_iter()
                .map(|site| self.tree_request(ctx, site)),
        );
        Out::FutFn(requests)
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut ParkState,
        _dt: Duration,
    ) -> Out<ParkState> {
        state.scene.write_to_buffers(&ctx.queue, &ctx.device);

        // per frame, not per second, see `SunOscillator::advance_by` for the alternative
        let x = state.sun.advance();
        Out::Configure(Box::new(move |ctx: &mut Context| {
            let position = ctx.light.light.position;
            ctx.light.set_position(Point3::new(x, position.y, position.z));
        }))
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut ParkState,
        _: &DeviceEvent,
    ) -> Out<ParkState> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _ctx: &Context,
        _state: &mut ParkState,
        event: &WindowEvent,
    ) -> Out<ParkState> {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key,
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        else {
            return Out::Empty;
        };
        match keyboard::nudge(logical_key, self.config.keyboard_step) {
            Some(delta) => Out::Configure(Box::new(move |ctx: &mut Context| {
                ctx.camera.camera.translate(delta);
            })),
            None => Out::Empty,
        }
    }

    fn on_render<'a>(&'a self, state: &'a ParkState) -> Render<'a> {
        Render::from(&state.scene)
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut ParkState,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Waiting)
    }
}
