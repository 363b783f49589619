use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Device attitude in degrees.
///
/// roll: side-to-side tilt, pitch: front-to-back tilt, yaw: heading.
/// Each component is normally within [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };

    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// 三个分量都是有限值（非 NaN / 非无穷）
    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, offset: Angle) -> Angle {
        Angle {
            roll: self.roll - offset.roll,
            pitch: self.pitch - offset.pitch,
            yaw: self.yaw - offset.yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_wise_subtraction() {
        let raw = Angle::new(12.5, -3.0, 90.0);
        let offset = Angle::new(2.5, -1.0, 45.0);
        assert_eq!(raw - offset, Angle::new(10.0, -2.0, 45.0));
        assert_eq!(raw - Angle::ZERO, raw);
    }

    #[test]
    fn test_finite_check() {
        assert!(Angle::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Angle::new(1.0, f32::NAN, 3.0).is_finite());
        assert!(!Angle::new(f32::INFINITY, 0.0, 0.0).is_finite());
    }
}
