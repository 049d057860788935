//! Flow control and application event loop.
//!
//! This module provides the main event loop and the flow abstraction of the engine.
//! A "flow" represents a scene that handles user input, updates its state and
//! provides renderable objects each frame. The engine owns the state `S` of the
//! application and lends it to every hook, so flows themselves stay small.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the trait for scenes that handle events and rendering
//! - [`Out<S>`] is the output type for async loading and context configuration
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window/device events
//! 2. Call `on_<device/window>_events` on all flows for event distribution
//! 3. Apply the loads that finished since the last frame, then update flow state (via `on_update`)
//! 4. Update the camera controller and write the camera and light uniforms
//! 5. Call flows' `on_render()` to collect renderable objects
//! 6. Render the shadow map, then the frame using batched pipelines
//! 7. Present frame

use std::{
    fmt::Debug,
    iter,
    pin::Pin,
    sync::Arc,
    task::{Context as TaskContext, Poll},
};

use futures::{StreamExt, stream::FuturesUnordered};
use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::model::{DrawModel, DrawShadow},
    render::{Batches, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// A deferred change of the application state, produced by an async load.
pub type Mutation<S> = Box<dyn FnOnce(&mut S)>;

///
/// This is the Output Type for every lifecycle hook where the user can pass async work that is
/// handled according to the platform you're running on.
///
/// `Out::FutFn` resolves futures into state mutations. Each future is handled on its own: on the
/// web every future is spawned separately, natively they are kept in [`PendingLoads`] and polled
/// once per frame. Either way a mutation is applied whenever it arrives, so a request that never
/// answers does not hold back the others or the event loop.
///
/// `Out::Configure` can be used to modify the Context during runtime for instance to move the
/// camera or change the clear colour.
///
/// `Empty` is the default output used when no futures need to be handled.
///
pub enum Out<S> {
    FutFn(Vec<Box<dyn Future<Output = Mutation<S>>>>),
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl<S> Default for Out<S> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<S> Debug for Out<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FutFn(futures) => write!(f, "FutFn({} futures)", futures.len()),
            Self::Configure(_) => f.write_str("Configure(|&mut Context| -> {...})"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Loads that have been started but not applied yet.
///
/// Nothing here blocks: [`PendingLoads::apply_ready`] polls every load once and applies the
/// mutations of those that finished, in the order they finished.
pub struct PendingLoads<S> {
    loads: FuturesUnordered<Pin<Box<dyn Future<Output = Mutation<S>>>>>,
}

impl<S> Default for PendingLoads<S> {
    fn default() -> Self {
        Self {
            loads: FuturesUnordered::new(),
        }
    }
}

impl<S> Debug for PendingLoads<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PendingLoads({})", self.loads.len())
    }
}

impl<S> PendingLoads<S> {
    pub fn push(&mut self, future: Box<dyn Future<Output = Mutation<S>>>) {
        self.loads.push(Pin::from(future));
    }

    pub fn extend(&mut self, futures: Vec<Box<dyn Future<Output = Mutation<S>>>>) {
        futures.into_iter().for_each(|future| self.push(future));
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Applies every load that is done and returns how many were applied.
    ///
    /// The loads are polled with a no-op waker; the render loop asks for a redraw every
    /// frame, so the next poll is never far away.
    pub fn apply_ready(&mut self, state: &mut S) -> usize {
        let mut cx = TaskContext::from_waker(futures::task::noop_waker_ref());
        let mut applied = 0;
        while let Poll::Ready(Some(mutation)) = self.loads.poll_next_unpin(&mut cx) {
            mutation(state);
            applied += 1;
        }
        applied
    }
}

#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure context (camera, clear colour, etc.)
/// 2. `on_window_events()` and `on_device_events()` are called for each winit input event
/// 3. `on_update()` is called every frame before anything is drawn
/// 4. `on_render()` is called each frame and specifies what to draw
///
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    ///
    /// This is the place to configure things such as the background colour, the camera
    /// start position and to kick off resource loading.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S>;

    /// Update state every frame.
    ///
    /// Called once per redraw with the time since the previous one.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S>;

    /// Handle raw device events (keyboard, mouse hardware input).
    fn on_device_events(&mut self, ctx: &Context, state: &mut S, event: &DeviceEvent) -> Out<S>;

    /// Handle window events (keyboard, mouse, window resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out<S>;

    /// Return renderable objects for this flow.
    ///
    /// Called each frame. The engine sorts everything into the shadow, lit and unlit batches.
    fn on_render<'a>(&'a self, state: &'a S) -> Render<'a>;

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut S,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>;
}

// Dummy impl to make wasm work
impl<State> Debug for dyn GraphicsFlow<State> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`. This allows lazy initialization and resource loading.
pub type FlowConstructor<S> =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = Box<dyn GraphicsFlow<S>>>>>>;

/// Application state bundle: GPU context, app state, and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = Context::new(window).await;
        let ctx = match ctx {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {:#}",
                e
            ),
        };
        let size = ctx.window.inner_size();
        let mut app_state = Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        };
        app_state.resize(size.width, size.height);
        app_state
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(
        &self,
        extent3d: wgpu::Extent3d,
        format: wgpu::TextureFormat,
    ) -> wgpu::Texture {
        let usage = if format == self.ctx.config.format {
            wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        };
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        })
    }

    /// Rows of the read back image must be a multiple of 256 bytes.
    #[cfg(feature = "integration-tests")]
    fn get_test_3d_extent(&self) -> wgpu::Extent3d {
        let width = self.ctx.config.width.div_ceil(64) * 64;
        wgpu::Extent3d {
            width,
            height: self.ctx.config.height,
            depth_or_array_layers: 1,
        }
    }

    fn render(
        &mut self,
        graphics_flows: &mut [Box<dyn GraphicsFlow<State>>],
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] event_loop: &winit::event_loop::EventLoopProxy<
            FlowEvent<State>,
        >,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg(not(feature = "integration-tests"))]
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (tex, depth) = {
            let extent3d = self.get_test_3d_extent();
            let tex = self.get_test_texture(extent3d, self.ctx.config.format);
            let depth = self.get_test_texture(
                extent3d,
                crate::data_structures::texture::Texture::DEPTH_FORMAT,
            );
            (tex, depth)
        };
        #[cfg(feature = "integration-tests")]
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        #[cfg(feature = "integration-tests")]
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
        #[cfg(not(feature = "integration-tests"))]
        let depth_view = &self.ctx.depth_texture.view;
        #[cfg(feature = "integration-tests")]
        let depth_view = &depth_view;

        let ctx = &self.ctx;
        let state = &self.state;
        let mut batches = Batches::default();
        graphics_flows.iter().for_each(|flow| {
            flow.on_render(state).set_pipelines(&mut batches);
        });

        let mut encoder: wgpu::CommandEncoder =
            ctx.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        if ctx.light.shadows_enabled && ctx.light.light.cast_shadows {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            shadow_pass.set_pipeline(&ctx.pipelines.shadow);
            for instanced in &batches.shadow_casters {
                shadow_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                shadow_pass.draw_model_shadow(
                    instanced.model,
                    0..instanced.amount as u32,
                    &ctx.light.shadow_bind_group,
                );
            }
        }

        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            for (pipeline, batch) in [
                (&ctx.pipelines.lit, &batches.lit),
                (&ctx.pipelines.unlit, &batches.unlit),
            ] {
                render_pass.set_pipeline(pipeline);
                for instanced in batch {
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_model_instanced(
                        instanced.model,
                        0..instanced.amount as u32,
                        &ctx.camera.bind_group,
                        &ctx.light.bind_group,
                    );
                }
            }
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let extent = self.get_test_3d_extent();
            let output_buffer_size =
                (u32_size * extent.width * extent.height) as wgpu::BufferAddress;
            let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: output_buffer_size,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: None,
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * extent.width),
                        rows_per_image: Some(extent.height),
                    },
                },
                extent,
            );
            output_buffer
        };

        drop(batches);
        ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            use std::convert::identity;

            let extent = self.get_test_3d_extent();
            let fut_img = async {
                let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
                let buffer_slice = output_buffer.slice(..);
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                    tx.send(result).ok();
                });
                self.ctx
                    .device
                    .poll(wgpu::PollType::Wait {
                        submission_index: None,
                        timeout: Some(Duration::from_secs(3)),
                    })
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                rx.receive()
                    .await
                    .ok_or_else(|| anyhow::anyhow!("read back channel closed"))??;
                let data = buffer_slice.get_mapped_range();
                image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(extent.width, extent.height, data)
                    .ok_or_else(|| anyhow::anyhow!("read back buffer too small"))
            };
            let mut img = match async_runtime.block_on(fut_img) {
                Ok(img) => img,
                Err(e) => panic!("Could not read back the rendered frame: {}", e),
            };
            let state = &mut self.state;
            let all_passed = graphics_flows
                .iter_mut()
                .map(|flow| flow.render_to_texture(&self.ctx, state, &mut img))
                .map(|res| match res {
                    Err(e) => panic!("{}", e),
                    Ok(ImageTestResult::Passed) => true,
                    Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                    Ok(ImageTestResult::Waiting) => false,
                })
                .all(identity);
            if all_passed && event_loop.send_event(FlowEvent::Exit).is_err() {
                panic!("All assertions passed but the winit event-loop could not safely exit");
            }
        }

        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    pending: PendingLoads<State>,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
}

impl<State: 'static> App<State> {
    fn new(
        event_loop: &EventLoop<FlowEvent<State>>,
        constructors: Vec<FlowConstructor<State>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            #[cfg(not(target_arch = "wasm32"))]
            pending: PendingLoads::default(),
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
        })
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
    #[allow(dead_code)]
    Mut(Mutation<State>),
    #[allow(dead_code)]
    Exit,
}

impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Mut(_) => f.write_str("Mut(|&mut State| -> {...})"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl<State: 'static + Default> App<State> {
    fn init_flows(&mut self) {
        let Some(app_state) = self.state.as_mut() else {
            return;
        };
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(
                #[cfg(not(target_arch = "wasm32"))]
                &mut self.pending,
                &mut app_state.ctx,
                &self.proxy,
                out,
            );
        });
        app_state.ctx.window.request_redraw();
    }

    fn redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        // tokio file reads need the runtime entered while they are polled
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _guard = self.async_runtime.enter();
            self.pending.apply_ready(&mut state.state);
        }

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_update(&state.ctx, &mut state.state, dt);
            handle_flow_output(
                #[cfg(not(target_arch = "wasm32"))]
                &mut self.pending,
                &mut state.ctx,
                &self.proxy,
                out,
            );
        });
        state.ctx.write_uniforms();

        match state.render(
            &mut self.graphics_flows,
            #[cfg(feature = "integration-tests")]
            &self.async_runtime,
            #[cfg(feature = "integration-tests")]
            &self.proxy,
        ) {
            Ok(_) => (),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            // resumed again after a suspend, everything already exists
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Park");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init_future = async move {
            let app_state = AppState::new(window).await;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows: Vec<_> = futures::future::join_all(flow_futures).await;
            (app_state, flows)
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (app_state, flows) = self.async_runtime.block_on(init_future);
            self.state = Some(app_state);
            self.graphics_flows = flows;
            self.init_flows();
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let (app_state, flows) = init_future.await;
                if proxy
                    .send_event(FlowEvent::Initialized {
                        state: app_state,
                        flows,
                    })
                    .is_err()
                {
                    log::error!("The event loop closed before the app was initialized");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            FlowEvent::Initialized { state, flows } => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(state);
                self.graphics_flows = flows;
                if let Some(app_state) = self.state.as_mut() {
                    let size = app_state.ctx.window.inner_size();
                    app_state.resize(size.width, size.height);
                }
                self.init_flows();
            }
            FlowEvent::Mut(fn_once) => {
                if let Some(state) = &mut self.state {
                    fn_once(&mut state.state);
                }
            }
            FlowEvent::Exit => {
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_device_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(
                #[cfg(not(target_arch = "wasm32"))]
                &mut self.pending,
                &mut state.ctx,
                &self.proxy,
                out,
            );
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // general stuff
        state.ctx.camera.controller.handle_window_events(&event);

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(
                #[cfg(not(target_arch = "wasm32"))]
                &mut self.pending,
                &mut state.ctx,
                &self.proxy,
                out,
            );
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn handle_flow_output<State: 'static>(
    #[cfg(not(target_arch = "wasm32"))] pending: &mut PendingLoads<State>,
    ctx: &mut Context,
    #[allow(unused_variables)] proxy: &winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    out: Out<State>,
) {
    match out {
        // Mutate the state once each future resolves
        Out::FutFn(futures) => {
            #[cfg(not(target_arch = "wasm32"))]
            pending.extend(futures);

            #[cfg(target_arch = "wasm32")]
            for future in futures {
                let proxy = proxy.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let mutation = Pin::from(future).await;
                    if proxy.send_event(FlowEvent::Mut(mutation)).is_err() {
                        log::warn!("The event loop closed before a load finished");
                    }
                });
            }
        }
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

pub fn run<State: 'static + Default>(
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

    let mut app: App<State> = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
