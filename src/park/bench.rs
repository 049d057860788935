//! The bench: six boxes in a group.
//!
//! [`bench_layout`] is the pure description (sizes and offsets in bench space),
//! [`build_bench`] turns it into scene nodes.

use cgmath::Vector3;

use crate::{
    data_structures::{
        instance::Instance,
        model::Material,
        scene_graph::{ContainerNode, ModelNode, SceneNode, Shading, Surface},
        texture::Texture,
    },
    park::config::ParkConfig,
    resources::{mesh::box_mesh, primitive_model, texture::diffuse_normal_layout},
};

/// Seat and backrest use the bench material, the legs a material of their own
/// that is painted with the same texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchMaterial {
    Seat,
    Leg,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchPart {
    pub name: &'static str,
    /// Width, height and depth of the box.
    pub size: [f32; 3],
    pub offset: Vector3<f32>,
    pub material: BenchMaterial,
}

const SEAT: [f32; 3] = [6.0, 0.3, 1.5];
const LEG: [f32; 3] = [0.3, 1.2, 0.3];
const BACKREST: [f32; 3] = [6.0, 1.5, 0.3];

pub fn bench_layout() -> [BenchPart; 6] {
    let leg = |name, x, z| BenchPart {
        name,
        size: LEG,
        offset: Vector3::new(x, -0.6, z),
        material: BenchMaterial::Leg,
    };
    [
        BenchPart {
            name: "seat",
            size: SEAT,
            offset: Vector3::new(0.0, 0.0, 0.0),
            material: BenchMaterial::Seat,
        },
        leg("leg 1", -2.2, -0.6),
        leg("leg 2", 2.2, -0.6),
        leg("leg 3", -2.2, 0.6),
        leg("leg 4", 2.2, 0.6),
        BenchPart {
            name: "backrest",
            size: BACKREST,
            offset: Vector3::new(0.0, 0.75, -0.75),
            material: BenchMaterial::Seat,
        },
    ]
}

/// The group transform: position and uniform scale from the config.
pub fn bench_transform(config: &ParkConfig) -> Instance {
    Instance::from(config.bench_position).with_uniform_scale(config.bench_scale)
}

/// Builds the bench group. Materials start out with the white placeholder until
/// the bench texture is painted onto them.
pub fn build_bench(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    config: &ParkConfig,
) -> Box<dyn SceneNode> {
    let layout = diffuse_normal_layout(device);
    let material = |name: &str| {
        Material::new(
            device,
            name,
            Texture::placeholder(device, queue),
            Texture::create_default_normal_map(1, 1, device, queue),
            &layout,
        )
    };
    let seat_material = material("bench");
    let leg_material = material("bench leg");

    let mut group = ContainerNode::new();
    for part in bench_layout() {
        let [width, height, depth] = part.size;
        let material = match part.material {
            BenchMaterial::Seat => seat_material.clone(),
            BenchMaterial::Leg => leg_material.clone(),
        };
        let model = primitive_model(device, part.name, &box_mesh(width, height, depth), material);
        let mut node = ModelNode::from_model(device, model, Surface::new(Shading::Unlit));
        node.set_local_transform(Instance::from(part.offset));
        group.add_child(Box::new(node));
    }
    group.set_local_transform(bench_transform(config));
    Box::new(group)
}
