//! Camera, projection and the orbit controller.
//!
//! The [`Camera`] is an eye position looking at a target. The [`OrbitController`]
//! turns pointer drags and wheel input into damped orbiting, panning and zooming
//! around that target. It re-reads the eye every update, so anything else that
//! moves the eye (the park's arrow keys for instance) is folded into the orbit
//! instead of being overwritten.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const EPS: f32 = 0.000_001;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Moves the eye only. The target stays where it is.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    None,
    Rotate,
    Pan,
}

/// Orbit, pan and zoom around [`Camera::target`].
///
/// Left drag rotates, right drag pans, the wheel zooms. With damping enabled the
/// accumulated rotation and pan decay by `1 - damping_factor` per update instead
/// of being applied at once, which is what makes the motion glide.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_pixels: (f32, f32),
    pan_offset: Vector3<f32>,
    drag: Drag,
    cursor: Option<PhysicalPosition<f64>>,
    viewport_height: f32,
}

impl OrbitController {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            enable_zoom: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_pixels: (0.0, 0.0),
            pan_offset: Vector3::new(0.0, 0.0, 0.0),
            drag: Drag::None,
            cursor: None,
            viewport_height: viewport_height.max(1) as f32,
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    pub fn with_zoom(mut self, enable_zoom: bool) -> Self {
        self.enable_zoom = enable_zoom;
        self
    }

    pub fn resize(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height.max(1) as f32;
    }

    /// Horizontal orbit by `angle` radians (positive turns the view left).
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    /// Vertical orbit by `angle` radians (positive raises the eye).
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Scroll towards the target. `steps` may be fractional.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enable_zoom || steps == 0.0 {
            return;
        }
        let zoom_scale = 0.95f32.powf(self.zoom_speed);
        self.scale *= zoom_scale.powf(steps);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.resize(size.height),
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (state, button) {
                    (ElementState::Pressed, MouseButton::Left) => Drag::Rotate,
                    (ElementState::Pressed, MouseButton::Right) => Drag::Pan,
                    (ElementState::Released, _) => Drag::None,
                    _ => self.drag,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.cursor {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    self.handle_drag(dx, dy);
                }
                self.cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = Drag::None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    // roughly one line per 100 pixels, as browsers report it
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.zoom(steps);
            }
            _ => (),
        }
    }

    fn handle_drag(&mut self, dx: f32, dy: f32) {
        match self.drag {
            Drag::Rotate => {
                self.rotate_left(2.0 * PI * dx / self.viewport_height * self.rotate_speed);
                self.rotate_up(2.0 * PI * dy / self.viewport_height * self.rotate_speed);
            }
            Drag::Pan => {
                self.pan_pixels.0 += dx;
                self.pan_pixels.1 += dy;
            }
            Drag::None => (),
        }
    }

    /// Applies the accumulated input to `camera`. Call once per frame.
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        self.consume_pan(camera, projection);

        let offset = camera.position - camera.target;
        let mut radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        if self.enable_damping {
            theta += self.theta_delta * self.damping_factor;
            phi += self.phi_delta * self.damping_factor;
            camera.target += self.pan_offset * self.damping_factor;
        } else {
            theta += self.theta_delta;
            phi += self.phi_delta;
            camera.target += self.pan_offset;
        }

        phi = phi.clamp(EPS, PI - EPS);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi_radius = phi.sin() * radius;
        let offset = Vector3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );
        camera.position = camera.target + offset;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::new(0.0, 0.0, 0.0);
        }
        self.scale = 1.0;
    }

    fn consume_pan(&mut self, camera: &Camera, projection: &Projection) {
        let (dx, dy) = std::mem::take(&mut self.pan_pixels);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let offset = camera.position - camera.target;
        let target_distance = offset.magnitude() * (projection.fovy.0 / 2.0).tan();
        let forward = -offset.normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);
        let left = -right * (2.0 * dx * target_distance / self.viewport_height);
        let up = up * (2.0 * dy * target_distance / self.viewport_height);
        self.pan_offset += left + up;
    }
}

pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl std::fmt::Debug for CameraResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraResources")
            .field("camera", &self.camera)
            .field("controller", &self.controller)
            .finish()
    }
}
