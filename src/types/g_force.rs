use serde::{Deserialize, Serialize};

/// Horizontal-plane linear acceleration as reported by the sensor (m/s²).
///
/// x is lateral, y is longitudinal. No gravity normalization is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GForce {
    pub x: f32,
    pub y: f32,
}

impl GForce {
    pub const ZERO: GForce = GForce { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}
