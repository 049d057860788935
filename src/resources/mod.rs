use anyhow::Context as _;

use crate::{
    data_structures::{
        instance::Instance,
        model,
        scene_graph::{ContainerNode, ModelNode, SceneNode, Surface},
        texture::Texture,
    },
    resources::texture::{diffuse_normal_layout, load_binary, load_texture},
};

/**
 * This module contains all logic for loading mesh/textures/etc. from external files
 * and for building primitive geometry.
 */
pub mod mesh;
pub mod texture;

/// Loads a `.gltf`/`.glb` file into a scene node hierarchy.
///
/// Every glTF node becomes a scene node carrying the node's transform. A mesh with a
/// single primitive becomes a [`ModelNode`], a mesh with several primitives becomes a
/// [`ContainerNode`] holding one [`ModelNode`] per primitive so each can be
/// repainted on its own. Loaded meshes are lit and take part in no shadowing until
/// their [`Surface`] says otherwise.
pub async fn load_model_gltf(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let gltf_bytes = load_binary(file_name).await?;
    let gltf = gltf::Gltf::from_slice(&gltf_bytes)
        .with_context(|| format!("parsing glTF {file_name}"))?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .with_context(|| format!("{file_name} references a missing binary chunk"))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(&sibling(file_name, uri)).await?;
                buffer_data.push(bin);
            }
        }
    }

    let layout = diffuse_normal_layout(device);

    // Load materials
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => {
                let source = info.texture().source().source();
                load_image(source, file_name, &buffer_data, false, device, queue).await?
            }
            None => {
                let [r, g, b, _] = pbr.base_color_factor();
                Texture::from_colour(device, queue, [r, g, b], "base colour")
            }
        };
        let normal_texture = match material.normal_texture() {
            Some(info) => {
                let source = info.texture().source().source();
                load_image(source, file_name, &buffer_data, true, device, queue).await?
            }
            None => Texture::create_default_normal_map(1, 1, device, queue),
        };
        let name = material.name().unwrap_or(file_name);
        materials.push(model::Material::new(
            device,
            name,
            diffuse_texture,
            normal_texture,
            &layout,
        ));
    }
    let fallback = model::Material::from_colour(device, queue, "default", [1.0, 1.0, 1.0], &layout);

    let mut models = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            models.push(to_scene_node(node, &buffer_data, device, &materials, &fallback)?);
        }
    }
    log::info!("Loaded {} with {} root node(s)", file_name, models.len());

    let root_node: Box<dyn SceneNode> = if models.len() == 1 {
        models.remove(0)
    } else {
        Box::new(ContainerNode::with_children(models))
    };

    Ok(root_node)
}

/// Resolves a URI referenced by a glTF file relative to that file.
fn sibling(file_name: &str, uri: &str) -> String {
    match file_name.rfind('/') {
        Some(idx) => format!("{}/{}", &file_name[..idx], uri),
        None => uri.to_string(),
    }
}

async fn load_image(
    source: gltf::image::Source<'_>,
    file_name: &str,
    buffer_data: &[Vec<u8>],
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    match source {
        gltf::image::Source::View { view, mime_type } => {
            let bytes = buffer_data
                .get(view.buffer().index())
                .and_then(|buffer| buffer.get(view.offset()..view.offset() + view.length()))
                .with_context(|| format!("image view out of bounds in {file_name}"))?;
            Texture::from_bytes(
                device,
                queue,
                bytes,
                file_name,
                mime_type.split('/').next_back(),
                is_normal_map,
            )
        }
        gltf::image::Source::Uri { uri, mime_type } => {
            load_texture(
                &sibling(file_name, uri),
                is_normal_map,
                device,
                queue,
                mime_type.and_then(|mt| mt.split('/').next_back()),
            )
            .await
        }
    }
}

pub fn to_scene_node(
    node: gltf::scene::Node,
    buf: &[Vec<u8>],
    device: &wgpu::Device,
    mats: &[model::Material],
    fallback: &model::Material,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let mesh_name = mesh.name().unwrap_or("unknown_mesh");
            let mut primitives = Vec::new();
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));

                let mut vertices: Vec<model::ModelVertex> = reader
                    .read_positions()
                    .with_context(|| format!("mesh {mesh_name} has a primitive without positions"))?
                    .map(|position| model::ModelVertex {
                        position,
                        ..Default::default()
                    })
                    .collect();
                if let Some(normals) = reader.read_normals() {
                    vertices
                        .iter_mut()
                        .zip(normals)
                        .for_each(|(vertex, normal)| vertex.normal = normal);
                }
                if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                    vertices
                        .iter_mut()
                        .zip(tex_coords)
                        .for_each(|(vertex, tex_coord)| vertex.tex_coords = tex_coord);
                }

                let indices: Vec<u32> = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect(),
                    None => (0..vertices.len() as u32).collect(),
                };

                match reader.read_tangents() {
                    Some(tangents) => {
                        vertices.iter_mut().zip(tangents).for_each(|(vertex, tangent)| {
                            // glTF stores the bitangent sign in w
                            let tangent: cgmath::Vector4<f32> = tangent.into();
                            let normal: cgmath::Vector3<f32> = vertex.normal.into();
                            vertex.tangent = tangent.truncate().into();
                            vertex.bitangent = (normal.cross(tangent.truncate()) * tangent.w).into();
                        });
                    }
                    None => mesh::compute_tangents(&mut vertices, &indices),
                }

                let geometry = mesh::Geometry { vertices, indices };
                let material = primitive
                    .material()
                    .index()
                    .and_then(|idx| mats.get(idx))
                    .unwrap_or(fallback)
                    .clone();
                let model = model::Model {
                    meshes: vec![mesh::upload(device, mesh_name, &geometry, 0)],
                    materials: vec![material],
                };
                primitives.push(ModelNode::from_model(device, model, Surface::default()));
            }

            if primitives.len() == 1 {
                Box::new(primitives.remove(0))
            } else {
                Box::new(ContainerNode::with_children(
                    primitives
                        .into_iter()
                        .map(|primitive| Box::new(primitive) as Box<dyn SceneNode>)
                        .collect(),
                ))
            }
        }
        None => Box::new(ContainerNode::new()),
    };
    let (position, rotation, scale) = node.transform().decomposed();
    scene_node.set_local_transform(Instance {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    });
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buf, device, mats, fallback)?);
    }

    Ok(scene_node)
}

/// Uploads primitive geometry as a single-mesh model with one material.
pub fn primitive_model(
    device: &wgpu::Device,
    name: &str,
    geometry: &mesh::Geometry,
    material: model::Material,
) -> model::Model {
    model::Model {
        meshes: vec![mesh::upload(device, name, geometry, 0)],
        materials: vec![material],
    }
}

