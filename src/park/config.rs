use cgmath::{Deg, Point3, Vector3};

/// Every constant of the park in one place. `ParkConfig::default()` is the park as
/// it is meant to look; tests and embedders override single fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ParkConfig {
    pub camera_position: Point3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub clear_colour: wgpu::Color,

    pub ambient_colour: [f32; 3],
    pub ambient_intensity: f32,
    pub sun_colour: [f32; 3],
    pub sun_intensity: f32,
    pub sun_position: Point3<f32>,
    pub sun_step: f32,
    pub sun_bound: f32,

    pub bench_position: Vector3<f32>,
    pub bench_scale: f32,

    pub tree_gap: f32,
    pub tree_scale: f32,

    pub ground_size: f32,

    pub keyboard_step: f32,

    pub bench_texture: String,
    pub ground_texture: String,
    pub tree_model: String,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            camera_position: Point3::new(0.0, 50.0, 150.0),
            fovy: Deg(75.0),
            znear: 0.1,
            zfar: 1000.0,
            damping_factor: 0.25,
            enable_zoom: true,
            clear_colour: wgpu::Color::BLACK,

            // 0x404040
            ambient_colour: [64.0 / 255.0; 3],
            ambient_intensity: 1.5,
            sun_colour: [1.0, 1.0, 1.0],
            sun_intensity: 1.0,
            sun_position: Point3::new(10.0, 20.0, 10.0),
            sun_step: 0.5,
            sun_bound: 50.0,

            bench_position: Vector3::new(0.0, 10.0, 0.0),
            bench_scale: 10.5,

            tree_gap: 20.0,
            tree_scale: 10.0,

            ground_size: 400.0,

            keyboard_step: 10.0,

            bench_texture: "image/bench.png".to_string(),
            ground_texture: "image/grass.png".to_string(),
            tree_model: "tree.glb".to_string(),
        }
    }
}
