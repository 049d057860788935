#![allow(dead_code)]

use cgmath::Vector3;
use park_scene::{
    data_structures::{
        instance::Instance,
        scene_graph::{SceneNode, Surface},
    },
    park::colour::ColourSource,
    render::Instanced,
};

/// Hands out red, green, blue, red, ... so painted colours are predictable.
#[derive(Default)]
pub(crate) struct CyclingColours(pub(crate) usize);

pub(crate) const CYCLE: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl ColourSource for CyclingColours {
    fn next_colour(&mut self) -> [f32; 3] {
        let colour = CYCLE[self.0 % CYCLE.len()];
        self.0 += 1;
        colour
    }
}

/// A scene node without GPU resources. With a surface it stands in for a mesh,
/// without one for a plain group.
pub(crate) struct FakeNode {
    pub(crate) local: Instance,
    pub(crate) world: Instance,
    pub(crate) surface: Option<Surface>,
    pub(crate) children: Vec<Box<dyn SceneNode>>,
}

impl FakeNode {
    pub(crate) fn mesh() -> Self {
        Self {
            local: Instance::default(),
            world: Instance::default(),
            surface: Some(Surface::default()),
            children: Vec::new(),
        }
    }

    pub(crate) fn group(children: Vec<Box<dyn SceneNode>>) -> Self {
        Self {
            local: Instance::default(),
            world: Instance::default(),
            surface: None,
            children,
        }
    }

    pub(crate) fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.local.position = Vector3::new(x, y, z);
        self
    }
}

impl SceneNode for FakeNode {
    fn get_local_transform(&self) -> Instance {
        self.local.clone()
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn update_local_transform(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        mutation(&mut self.local);
    }

    fn get_world_transform(&self) -> Instance {
        self.world.clone()
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    fn write_to_buffers(&mut self, _: &wgpu::Queue, _: &wgpu::Device) {}

    fn get_render(&self) -> Vec<Instanced<'_>> {
        Vec::new()
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_vec_close(actual: Vector3<f32>, expected: [f32; 3]) {
    assert!(
        (actual.x - expected[0]).abs() < 1e-3
            && (actual.y - expected[1]).abs() < 1e-3
            && (actual.z - expected[2]).abs() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

#[cfg(feature = "integration-tests")]
pub(crate) use gpu::*;

#[cfg(feature = "integration-tests")]
mod gpu {
    use park_scene::{
        context::Context,
        flow::{GraphicsFlow, ImageTestResult, Out},
        render::Render,
    };

    pub(crate) struct FrameCounter(pub(crate) u32);

    impl Default for FrameCounter {
        fn default() -> Self {
            Self(0)
        }
    }

    impl FrameCounter {
        pub(crate) fn frame(&self) -> u32 {
            self.0
        }

        pub(crate) fn progress(&mut self) {
            self.0 += 1;
        }
    }

    type Validate = dyn Fn(
        &Context,
        &mut FrameCounter,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>;

    /// A flow that draws nothing. `setup` configures the context, `validate` checks
    /// the read back frames.
    pub(crate) struct TestRender {
        pub(crate) setup: Box<dyn Fn(&mut Context)>,
        pub(crate) validate: Box<Validate>,
    }

    impl GraphicsFlow<FrameCounter> for TestRender {
        fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter> {
            (self.setup)(ctx);
            Out::Empty
        }

        fn on_update(
            &mut self,
            _: &Context,
            state: &mut FrameCounter,
            _: instant::Duration,
        ) -> Out<FrameCounter> {
            state.progress();
            Out::Empty
        }

        fn on_device_events(
            &mut self,
            _: &Context,
            _: &mut FrameCounter,
            _: &park_scene::DeviceEvent,
        ) -> Out<FrameCounter> {
            Out::Empty
        }

        fn on_window_events(
            &mut self,
            _: &Context,
            _: &mut FrameCounter,
            _: &park_scene::WindowEvent,
        ) -> Out<FrameCounter> {
            Out::Empty
        }

        fn on_render<'a>(&'a self, _: &'a FrameCounter) -> Render<'a> {
            Render::None
        }

        fn render_to_texture(
            &self,
            ctx: &Context,
            state: &mut FrameCounter,
            texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            (self.validate)(ctx, state, texture)
        }
    }

    #[macro_export]
    macro_rules! golden_image_test {
        ($state:ty, $graphics_elem:expr) => {{
            use park_scene::flow::{FlowConstructor, GraphicsFlow};
            let constructor: FlowConstructor<$state> = Box::new(|_| {
                Box::pin(async move {
                    let g_flow: Box<dyn GraphicsFlow<$state>> = Box::new($graphics_elem);
                    g_flow
                })
            });

            park_scene::flow::run(vec![constructor])
                .expect("Failed to run flow for integration test.");
        }};
    }
}
