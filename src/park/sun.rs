//! The oscillating sun.

/// Units per second of [`SunOscillator::advance_by`]: one per-frame step at 60 Hz.
pub const SUN_SPEED: f32 = 30.0;

/// X position of the directional light, bouncing between `-bound` and `bound`.
///
/// The direction flips on the step that leaves the band, so X can overshoot a
/// bound by less than one step before it turns around. With step 0.5 and bound 50:
/// 49.8 steps to 50.3 and flips, the following step brings it back to 49.8.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunOscillator {
    pub x: f32,
    pub direction: f32,
    pub step: f32,
    pub bound: f32,
}

impl SunOscillator {
    pub fn new(x: f32, step: f32, bound: f32) -> Self {
        Self {
            x,
            direction: 1.0,
            step,
            bound,
        }
    }

    /// One frame. Depends only on the previous `x` and `direction`.
    pub fn advance(&mut self) -> f32 {
        self.move_by(self.step);
        self.x
    }

    /// Frame-rate independent alternative to [`advance`](Self::advance).
    pub fn advance_by(&mut self, dt: instant::Duration) -> f32 {
        self.move_by(SUN_SPEED * dt.as_secs_f32());
        self.x
    }

    fn move_by(&mut self, distance: f32) {
        self.x += distance * self.direction;
        if self.x > self.bound || self.x < -self.bound {
            self.direction = -self.direction;
        }
    }
}

impl Default for SunOscillator {
    fn default() -> Self {
        Self::new(10.0, 0.5, 50.0)
    }
}
