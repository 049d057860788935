//! Render pipelines: lit, unlit and the shadow depth pass, plus the light resources
//! they share.

pub mod basic;
pub mod light;
pub mod shadow;

use crate::pipelines::light::LightResources;

pub struct Pipelines {
    pub lit: wgpu::RenderPipeline,
    pub unlit: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl std::fmt::Debug for Pipelines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pipelines { lit, unlit, shadow }")
    }
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        light: &LightResources,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            lit: basic::mk_lit_pipeline(
                device,
                config,
                &light.bind_group_layout,
                camera_bind_group_layout,
            ),
            unlit: basic::mk_unlit_pipeline(
                device,
                config,
                &light.bind_group_layout,
                camera_bind_group_layout,
            ),
            shadow: shadow::mk_shadow_pipeline(device, &light.shadow_bind_group_layout),
        }
    }
}
