use log::warn;
use serde::{Deserialize, Serialize};

/// Physical display rotation of the device relative to its natural orientation.
///
/// Only used to pick the axis remapping applied before Euler extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceRotation {
    #[default]
    Rotation0 = 0,
    Rotation90 = 1,
    Rotation180 = 2,
    Rotation270 = 3,
}

impl DeviceRotation {
    /// 从平台的旋转代码（0..=3，对应 0°/90°/180°/270°）转换，未知值回退到 0°
    pub fn from_surface_rotation(code: i32) -> Self {
        match code {
            0 => DeviceRotation::Rotation0,
            1 => DeviceRotation::Rotation90,
            2 => DeviceRotation::Rotation180,
            3 => DeviceRotation::Rotation270,
            other => {
                warn!("Unknown display rotation code {}, falling back to 0°", other);
                DeviceRotation::Rotation0
            }
        }
    }

    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(DeviceRotation::Rotation0),
            90 => Some(DeviceRotation::Rotation90),
            180 => Some(DeviceRotation::Rotation180),
            270 => Some(DeviceRotation::Rotation270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        self as i32 * 90
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            DeviceRotation::Rotation0 => DeviceRotation::Rotation0,
            DeviceRotation::Rotation90 => DeviceRotation::Rotation270,
            DeviceRotation::Rotation180 => DeviceRotation::Rotation180,
            DeviceRotation::Rotation270 => DeviceRotation::Rotation90,
        }
    }

    pub(crate) fn from_repr(value: u8) -> Self {
        match value & 0x3 {
            1 => DeviceRotation::Rotation90,
            2 => DeviceRotation::Rotation180,
            3 => DeviceRotation::Rotation270,
            _ => DeviceRotation::Rotation0,
        }
    }
}

/// UI orientation lock. Toggled by the user, has no effect on the sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl ScreenOrientation {
    pub fn toggled(self) -> Self {
        match self {
            ScreenOrientation::Portrait => ScreenOrientation::Landscape,
            ScreenOrientation::Landscape => ScreenOrientation::Portrait,
        }
    }
}
