use crate::types::Angle;

/// 车机面板的单行读数，角度向零取整
pub fn format_readout(angle: Angle) -> String {
    format!(
        "Roll: {}°, Pitch: {}°",
        whole_degrees(angle.roll),
        whole_degrees(angle.pitch)
    )
}

fn whole_degrees(value: f32) -> i32 {
    // NaN 转为 0，越界值饱和
    value.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_truncates_toward_zero() {
        assert_eq!(
            format_readout(Angle::new(12.9, -3.7, 100.0)),
            "Roll: 12°, Pitch: -3°"
        );
        assert_eq!(format_readout(Angle::new(-0.4, 0.99, 0.0)), "Roll: 0°, Pitch: 0°");
    }

    #[test]
    fn test_zero_readout() {
        assert_eq!(format_readout(Angle::ZERO), "Roll: 0°, Pitch: 0°");
    }
}
