use cgmath::Vector3;
use winit::keyboard::{Key, NamedKey};

/// Camera displacement for a key press: the arrow keys move the eye by `step`
/// along X or Z, everything else is ignored.
pub fn nudge(key: &Key, step: f32) -> Option<Vector3<f32>> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(Vector3::new(0.0, 0.0, -step)),
        Key::Named(NamedKey::ArrowDown) => Some(Vector3::new(0.0, 0.0, step)),
        Key::Named(NamedKey::ArrowLeft) => Some(Vector3::new(-step, 0.0, 0.0)),
        Key::Named(NamedKey::ArrowRight) => Some(Vector3::new(step, 0.0, 0.0)),
        _ => None,
    }
}
