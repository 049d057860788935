#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
fn all_white(
    _: &park_scene::context::Context,
    state: &mut common::test_utils::FrameCounter,
    texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
) -> Result<park_scene::flow::ImageTestResult, anyhow::Error> {
    use park_scene::flow::ImageTestResult;

    if state.frame() == 0 {
        return Ok(ImageTestResult::Waiting);
    }
    let white = image::Rgba([255, 255, 255, 255]);
    for pixel in texture.pixels() {
        assert_eq!(*pixel, white);
    }
    Ok(ImageTestResult::Passed)
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour() {
    use park_scene::context::Context;
    use wgpu::Color;

    use crate::common::test_utils::{FrameCounter, TestRender};

    golden_image_test!(
        FrameCounter,
        TestRender {
            setup: Box::new(|ctx: &mut Context| {
                ctx.clear_colour = Color::WHITE;
            }),
            validate: Box::new(all_white),
        }
    );
}
