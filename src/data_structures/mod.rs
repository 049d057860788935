//! What the renderer draws.
//!
//! - `instance`: local and world transforms and their packed GPU form
//! - `model`: vertices, meshes, materials and the draw helpers
//! - `scene_graph`: the node tree, surfaces (shading, shadows, pending paint) and root ids
//! - `texture`: colour, normal, depth and shadow map textures

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
