use wgpu::util::DeviceExt;

use crate::data_structures::model::{self, ModelVertex};

/// CPU side geometry, ready to upload with [`upload`].
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

/// An axis aligned box centred on the origin, `width` along X, `height` along Y and
/// `depth` along Z. Every face has its own four vertices so normals stay flat and
/// each face maps the full texture.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> Geometry {
    let half = [width / 2.0, height / 2.0, depth / 2.0];
    // (normal, u axis, v axis) with u x v = normal, so the quads wind CCW from outside
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut geometry = Geometry::default();
    for (normal, u, v) in faces {
        let corner = |su: f32, sv: f32| -> [f32; 3] {
            std::array::from_fn(|i| (normal[i] + su * u[i] + sv * v[i]) * half[i])
        };
        push_quad(
            &mut geometry,
            [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ],
            normal,
        );
    }
    compute_tangents(&mut geometry.vertices, &geometry.indices);
    geometry
}

/// A `width` x `height` rectangle in the XY plane facing +Z.
pub fn plane_mesh(width: f32, height: f32) -> Geometry {
    let (w, h) = (width / 2.0, height / 2.0);
    let mut geometry = Geometry::default();
    push_quad(
        &mut geometry,
        [[-w, -h, 0.0], [w, -h, 0.0], [w, h, 0.0], [-w, h, 0.0]],
        [0.0, 0.0, 1.0],
    );
    compute_tangents(&mut geometry.vertices, &geometry.indices);
    geometry
}

/// Corners in CCW order starting bottom left. Texture V grows downwards.
fn push_quad(geometry: &mut Geometry, corners: [[f32; 3]; 4], normal: [f32; 3]) {
    let base = geometry.vertices.len() as u32;
    let tex_coords = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    for (position, tex_coords) in corners.into_iter().zip(tex_coords) {
        geometry.vertices.push(ModelVertex {
            position,
            tex_coords,
            normal,
            ..Default::default()
        });
    }
    geometry
        .indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Per-vertex tangents and bitangents, averaged over the triangles sharing a vertex.
///
/// Triangles with a degenerate UV mapping contribute nothing, vertices no triangle
/// contributed to keep zero tangents (the lit shader falls back to the vertex normal).
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks_exact(3) {
        let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let pos0: cgmath::Vector3<_> = v0.position.into();
        let pos1: cgmath::Vector3<_> = v1.position.into();
        let pos2: cgmath::Vector3<_> = v2.position.into();

        let uv0: cgmath::Vector2<_> = v0.tex_coords.into();
        let uv1: cgmath::Vector2<_> = v1.tex_coords.into();
        let uv2: cgmath::Vector2<_> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        // delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // flipped for right-handed normal maps with wgpu's texture coordinates
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            let v = &mut vertices[i];
            v.tangent = (tangent + cgmath::Vector3::from(v.tangent)).into();
            v.bitangent = (bitangent + cgmath::Vector3::from(v.bitangent)).into();
            triangles_included[i] += 1;
        }
    }

    for (v, n) in vertices.iter_mut().zip(triangles_included) {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        v.tangent = (cgmath::Vector3::from(v.tangent) * denom).into();
        v.bitangent = (cgmath::Vector3::from(v.bitangent) * denom).into();
    }
}

pub fn upload(
    device: &wgpu::Device,
    name: &str,
    geometry: &Geometry,
    material: usize,
) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: geometry.indices.len() as u32,
        material,
    }
}
