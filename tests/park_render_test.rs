#[cfg(feature = "integration-tests")]
mod common;

/// Runs the real park and checks the middle of the frame is not the clear colour.
/// The view centre lands on the bench or the ground, both white until their
/// textures arrive, so this holds with or without the asset files.
#[test]
#[cfg(feature = "integration-tests")]
fn should_draw_the_park() {
    use park_scene::{
        DeviceEvent, WindowEvent,
        context::Context,
        flow::{GraphicsFlow, ImageTestResult, Out},
        park::{Park, ParkState, config::ParkConfig},
        render::Render,
    };

    struct ParkProbe {
        park: Park,
        frames: u32,
    }

    impl GraphicsFlow<ParkState> for ParkProbe {
        fn on_init(&mut self, ctx: &mut Context, state: &mut ParkState) -> Out<ParkState> {
            self.park.on_init(ctx, state)
        }

        fn on_update(
            &mut self,
            ctx: &Context,
            state: &mut ParkState,
            dt: instant::Duration,
        ) -> Out<ParkState> {
            self.frames += 1;
            self.park.on_update(ctx, state, dt)
        }

        fn on_device_events(
            &mut self,
            ctx: &Context,
            state: &mut ParkState,
            event: &DeviceEvent,
        ) -> Out<ParkState> {
            self.park.on_device_events(ctx, state, event)
        }

        fn on_window_events(
            &mut self,
            ctx: &Context,
            state: &mut ParkState,
            event: &WindowEvent,
        ) -> Out<ParkState> {
            self.park.on_window_events(ctx, state, event)
        }

        fn on_render<'a>(&'a self, state: &'a ParkState) -> Render<'a> {
            self.park.on_render(state)
        }

        fn render_to_texture(
            &self,
            ctx: &Context,
            state: &mut ParkState,
            texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if self.frames < 3 {
                return Ok(ImageTestResult::Waiting);
            }
            assert!(state.bench.is_some() && state.ground.is_some());
            assert!(ctx.light.shadows_enabled);

            let centre = texture.get_pixel(ctx.config.width / 2, ctx.config.height / 2);
            assert_ne!(centre.0[..3], [0, 0, 0], "nothing was drawn at the centre");
            Ok(ImageTestResult::Passed)
        }
    }

    golden_image_test!(
        ParkState,
        ParkProbe {
            park: Park::new(ParkConfig::default()),
            frames: 0,
        }
    );
}
