use crate::types::GForce;

/// Running peak of the g-force magnitude since the last reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxTracker {
    peak: f32,
}

impl MaxTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one sample in and returns its magnitude.
    pub fn update(&mut self, g: GForce) -> f32 {
        let magnitude = g.magnitude();
        // f32::max 忽略 NaN，峰值不会被污染
        self.peak = self.peak.max(magnitude);
        magnitude
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn reset(&mut self) {
        self.peak = 0.0;
    }
}
