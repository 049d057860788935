use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::{camera::OPENGL_TO_WGPU_MATRIX, data_structures::texture::Texture};

/// Half extent of the orthographic box the sun renders the shadow map with.
const SHADOW_EXTENT: f32 = 300.0;
/// Distance of the shadow camera from the scene origin along the sun direction.
const SHADOW_DISTANCE: f32 = 250.0;

/// CPU side description of the lighting: one directional light plus ambient.
///
/// The direction is implied by the position: the light shines from `position`
/// towards the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub colour: [f32; 3],
    pub intensity: f32,
    pub ambient_colour: [f32; 3],
    pub ambient_intensity: f32,
    pub cast_shadows: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(10.0, 20.0, 10.0),
            colour: [1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient_colour: [0.25, 0.25, 0.25],
            ambient_intensity: 1.5,
            cast_shadows: true,
        }
    }
}

impl Light {
    /// View-projection of the shadow camera.
    pub fn view_proj(&self) -> cgmath::Matrix4<f32> {
        let direction = self.position.to_vec();
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            Vector3::unit_y()
        };
        let eye = Point3::from_vec(direction * SHADOW_DISTANCE);
        // looking straight down makes look_at degenerate with +Y up
        let up = if direction.y.abs() > 0.999 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = cgmath::Matrix4::look_at_rh(eye, Point3::origin(), up);
        let proj = cgmath::ortho(
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            1.0,
            2.0 * SHADOW_DISTANCE + SHADOW_EXTENT,
        );
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    view_proj: [[f32; 4]; 4],
    position: [f32; 3],
    intensity: f32,
    colour: [f32; 3],
    ambient_intensity: f32,
    ambient_colour: [f32; 3],
    // 1.0 when the shadow map should be sampled, vec3 + f32 keeps the 16 byte alignment
    shadows: f32,
}

impl LightUniform {
    pub fn from_light(light: &Light, shadows_enabled: bool) -> Self {
        Self {
            view_proj: light.view_proj().into(),
            position: light.position.into(),
            intensity: light.intensity,
            colour: light.colour,
            ambient_intensity: light.ambient_intensity,
            ambient_colour: light.ambient_colour,
            shadows: if light.cast_shadows && shadows_enabled { 1.0 } else { 0.0 },
        }
    }
}

/// GPU side of the lighting.
///
/// `bind_group` is used by the lit and unlit pipelines (uniform, shadow map and
/// comparison sampler). `shadow_bind_group` only holds the uniform and is what
/// the shadow pass binds while it writes into `shadow_map`.
pub struct LightResources {
    pub light: Light,
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub shadow_map: Texture,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
    pub shadows_enabled: bool,
}

impl std::fmt::Debug for LightResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightResources")
            .field("light", &self.light)
            .field("shadows_enabled", &self.shadows_enabled)
            .finish()
    }
}

impl LightResources {
    pub fn new(light: Light, device: &wgpu::Device) -> Self {
        let uniform = LightUniform::from_light(&light, true);
        let buffer = mk_buffer(device, uniform);
        let shadow_map = Texture::create_shadow_map(device);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer, &shadow_map);
        let shadow_bind_group_layout = mk_shadow_bind_group_layout(device);
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });
        Self {
            light,
            uniform,
            buffer,
            shadow_map,
            bind_group,
            bind_group_layout,
            shadow_bind_group,
            shadow_bind_group_layout,
            shadows_enabled: true,
        }
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.light.position = position;
    }

    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue) {
        self.uniform = LightUniform::from_light(&self.light, self.shadows_enabled);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn uniform_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_shadow_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry()],
        label: Some("shadow_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
    shadow_map: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&shadow_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
            },
        ],
        label: Some("light_bind_group"),
    })
}

