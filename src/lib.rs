//! park-scene
//!
//! A small cross-platform 3D park built on a flow based wgpu engine. The park
//! has a textured ground, a bench assembled from boxes, four trees loaded from a
//! glTF file, ambient light plus a shadow casting sun that swings along X, and a
//! damped orbit camera that the arrow keys can nudge. Runs natively and on WASM.
//!
//! High-level modules
//! - `camera`: camera, projection, uniforms and the orbit controller
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: engine data models (meshes, instances, textures, scene graph)
//! - `flow`: high level flow control and the event loop
//! - `park`: the park scene itself
//! - `pipelines`: lit, unlit and shadow render pipelines plus the light
//! - `resources`: helpers to load textures/models and build primitive geometry
//! - `render`: render composition for efficient pipeline reuse
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod park;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point, the page only has to provide a `<canvas id="canvas">`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    use park::{Park, config::ParkConfig};

    flow::run(vec![Park::constructor(ParkConfig::default())])
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
