use crate::types::{Angle, DeviceRotation};

/// Target axis for coordinate remapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    MinusX,
    MinusY,
    MinusZ,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X | Axis::MinusX => 0,
            Axis::Y | Axis::MinusY => 1,
            Axis::Z | Axis::MinusZ => 2,
        }
    }

    fn is_negative(self) -> bool {
        matches!(self, Axis::MinusX | Axis::MinusY | Axis::MinusZ)
    }
}

/// New (X, Y) axes for each display rotation, keeping roll and pitch stable
/// while the device is turned in its mount.
pub fn remap_axes(rotation: DeviceRotation) -> (Axis, Axis) {
    match rotation {
        DeviceRotation::Rotation0 => (Axis::X, Axis::Y),
        DeviceRotation::Rotation90 => (Axis::Y, Axis::MinusX),
        DeviceRotation::Rotation180 => (Axis::MinusX, Axis::MinusY),
        DeviceRotation::Rotation270 => (Axis::MinusY, Axis::X),
    }
}

/// Row-major 3×3 rotation matrix from device to world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [f32; 9]);

impl RotationMatrix {
    pub const IDENTITY: RotationMatrix =
        RotationMatrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Builds the matrix from a rotation vector `[x, y, z, (w)]`.
    ///
    /// The vector is the vector part of a unit quaternion. When the scalar
    /// part is missing it is reconstructed from the other three.
    pub fn from_rotation_vector(values: &[f32]) -> Option<Self> {
        if values.len() < 3 {
            return None;
        }

        let (q1, q2, q3) = (values[0], values[1], values[2]);
        let q0 = match values.get(3) {
            Some(&w) => w,
            None => {
                let w2 = 1.0 - q1 * q1 - q2 * q2 - q3 * q3;
                if w2 > 0.0 {
                    w2.sqrt()
                } else {
                    0.0
                }
            }
        };

        let sq_q1 = 2.0 * q1 * q1;
        let sq_q2 = 2.0 * q2 * q2;
        let sq_q3 = 2.0 * q3 * q3;
        let q1_q2 = 2.0 * q1 * q2;
        let q3_q0 = 2.0 * q3 * q0;
        let q1_q3 = 2.0 * q1 * q3;
        let q2_q0 = 2.0 * q2 * q0;
        let q2_q3 = 2.0 * q2 * q3;
        let q1_q0 = 2.0 * q1 * q0;

        Some(RotationMatrix([
            1.0 - sq_q2 - sq_q3,
            q1_q2 - q3_q0,
            q1_q3 + q2_q0,
            q1_q2 + q3_q0,
            1.0 - sq_q1 - sq_q3,
            q2_q3 - q1_q0,
            q1_q3 - q2_q0,
            q2_q3 + q1_q0,
            1.0 - sq_q1 - sq_q2,
        ]))
    }

    /// Re-expresses the matrix in a coordinate system whose X and Y axes are
    /// `x` and `y` of the current one. The new Z axis is X × Y.
    ///
    /// Returns `None` when both arguments name the same axis, or when either is Z.
    pub fn remap(&self, x: Axis, y: Axis) -> Option<Self> {
        let (xi, yi) = (x.index(), y.index());
        if xi == yi || xi == 2 || yi == 2 {
            return None;
        }
        let zi = 3 - xi - yi;

        // (x, y, z) 为循环排列时 X × Y 指向 +Z
        let cyclic = (xi + 1) % 3 == yi;
        let sx = x.is_negative();
        let sy = y.is_negative();
        let sz = sx ^ sy ^ !cyclic;

        let signed = |v: f32, negate: bool| if negate { -v } else { v };
        let src = &self.0;
        let mut out = [0.0f32; 9];
        for row in 0..3 {
            let o = row * 3;
            out[o + xi] = signed(src[o], sx);
            out[o + yi] = signed(src[o + 1], sy);
            out[o + zi] = signed(src[o + 2], sz);
        }

        Some(RotationMatrix(out))
    }

    pub fn remap_for(&self, rotation: DeviceRotation) -> Self {
        let (x, y) = remap_axes(rotation);
        // remap_axes 只返回合法的轴组合
        self.remap(x, y).unwrap_or(*self)
    }

    /// (azimuth, pitch, roll) in radians.
    pub fn orientation(&self) -> [f32; 3] {
        let r = &self.0;
        [r[1].atan2(r[4]), (-r[7]).asin(), (-r[6]).atan2(r[8])]
    }

    /// Euler angles in degrees. Components may be NaN when the matrix has
    /// drifted out of the valid range.
    pub fn to_angle(&self) -> Angle {
        let [yaw, pitch, roll] = self.orientation();
        Angle {
            roll: roll.to_degrees(),
            pitch: pitch.to_degrees(),
            yaw: yaw.to_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL_ROTATIONS: [DeviceRotation; 4] = [
        DeviceRotation::Rotation0,
        DeviceRotation::Rotation90,
        DeviceRotation::Rotation180,
        DeviceRotation::Rotation270,
    ];

    /// Rotation vector for a rotation of `degrees` about the unit axis `(ax, ay, az)`
    fn rotation_vector(ax: f32, ay: f32, az: f32, degrees: f32) -> [f32; 4] {
        let half = degrees.to_radians() / 2.0;
        let s = half.sin();
        [ax * s, ay * s, az * s, half.cos()]
    }

    fn assert_angle_eq(actual: Angle, expected: Angle) {
        assert_abs_diff_eq!(actual.roll, expected.roll, epsilon = 1e-4);
        assert_abs_diff_eq!(actual.pitch, expected.pitch, epsilon = 1e-4);
        assert_abs_diff_eq!(actual.yaw, expected.yaw, epsilon = 1e-4);
    }

    #[test]
    fn test_identity_vector_is_level() {
        let matrix = RotationMatrix::from_rotation_vector(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(matrix, RotationMatrix::IDENTITY);
        assert_angle_eq(matrix.to_angle(), Angle::ZERO);
    }

    #[test]
    fn test_missing_scalar_is_reconstructed() {
        let v = rotation_vector(0.0, 0.0, 1.0, 40.0);
        let with_w = RotationMatrix::from_rotation_vector(&v).unwrap();
        let without_w = RotationMatrix::from_rotation_vector(&v[..3]).unwrap();
        for (a, b) in with_w.0.iter().zip(without_w.0.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_short_vector_rejected() {
        assert!(RotationMatrix::from_rotation_vector(&[0.1, 0.2]).is_none());
    }

    #[test]
    fn test_single_axis_rotations() {
        let about_y = RotationMatrix::from_rotation_vector(&rotation_vector(0.0, 1.0, 0.0, 20.0))
            .unwrap()
            .to_angle();
        assert_angle_eq(about_y, Angle::new(20.0, 0.0, 0.0));

        let about_x = RotationMatrix::from_rotation_vector(&rotation_vector(1.0, 0.0, 0.0, 10.0))
            .unwrap()
            .to_angle();
        assert_angle_eq(about_x, Angle::new(0.0, -10.0, 0.0));

        let about_z = RotationMatrix::from_rotation_vector(&rotation_vector(0.0, 0.0, 1.0, 30.0))
            .unwrap()
            .to_angle();
        assert_angle_eq(about_z, Angle::new(0.0, 0.0, -30.0));
    }

    #[test]
    fn test_landscape_remap_turns_roll_into_pitch() {
        let matrix =
            RotationMatrix::from_rotation_vector(&rotation_vector(0.0, 1.0, 0.0, 20.0)).unwrap();
        let remapped = matrix.remap_for(DeviceRotation::Rotation90).to_angle();
        assert_abs_diff_eq!(remapped.pitch, 20.0, epsilon = 1e-4);
        assert_abs_diff_eq!(remapped.roll, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_identity_remap_is_noop() {
        let matrix =
            RotationMatrix::from_rotation_vector(&rotation_vector(0.3, 0.5, 0.8, 33.0)).unwrap();
        assert_eq!(matrix.remap_for(DeviceRotation::Rotation0), matrix);
    }

    #[test]
    fn test_remap_rejects_invalid_axes() {
        let m = RotationMatrix::IDENTITY;
        assert!(m.remap(Axis::X, Axis::MinusX).is_none());
        assert!(m.remap(Axis::Y, Axis::Y).is_none());
        assert!(m.remap(Axis::Z, Axis::X).is_none());
    }

    #[test]
    fn test_remapped_matrix_stays_right_handed() {
        let m = RotationMatrix::from_rotation_vector(&rotation_vector(0.2, -0.4, 0.9, 57.0)).unwrap();
        for rotation in ALL_ROTATIONS {
            let r = m.remap_for(rotation).0;
            let det = r[0] * (r[4] * r[8] - r[5] * r[7]) - r[1] * (r[3] * r[8] - r[5] * r[6])
                + r[2] * (r[3] * r[7] - r[4] * r[6]);
            assert_abs_diff_eq!(det, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_remap_round_trip_restores_euler_angles() {
        let samples = [
            rotation_vector(1.0, 0.0, 0.0, 12.0),
            rotation_vector(0.0, 1.0, 0.0, -25.0),
            rotation_vector(0.6, 0.0, 0.8, 47.0),
            rotation_vector(0.267, 0.535, 0.802, 73.0),
        ];

        for v in samples {
            let original = RotationMatrix::from_rotation_vector(&v).unwrap();
            for rotation in ALL_ROTATIONS {
                let restored = original
                    .remap_for(rotation)
                    .remap_for(rotation.inverse());
                assert_angle_eq(restored.to_angle(), original.to_angle());
            }
        }
    }
}
