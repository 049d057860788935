use cgmath::{Deg, Rotation3};

use crate::{
    data_structures::{
        instance::Instance,
        model::Material,
        scene_graph::{ModelNode, SceneNode, Shading, Surface},
        texture::Texture,
    },
    resources::{mesh::plane_mesh, primitive_model, texture::diffuse_normal_layout},
};

/// Flat on the XZ plane: the XY plane turned -90 degrees about X.
pub fn ground_transform() -> Instance {
    Instance {
        rotation: cgmath::Quaternion::from_angle_x(Deg(-90.0)),
        ..Default::default()
    }
}

/// A square, lit ground that receives shadows but never casts them.
pub fn build_ground(device: &wgpu::Device, queue: &wgpu::Queue, size: f32) -> Box<dyn SceneNode> {
    let material = Material::new(
        device,
        "ground",
        Texture::placeholder(device, queue),
        Texture::create_default_normal_map(1, 1, device, queue),
        &diffuse_normal_layout(device),
    );
    let model = primitive_model(device, "ground", &plane_mesh(size, size), material);
    let surface = Surface {
        receive_shadow: true,
        ..Surface::new(Shading::Lit)
    };
    let mut node = ModelNode::from_model(device, model, surface);
    node.set_local_transform(ground_transform());
    Box::new(node)
}
