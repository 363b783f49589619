use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor types consumed by the samplers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    RotationVector,
    LinearAcceleration,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::RotationVector => write!(f, "rotation-vector"),
            SensorKind::LinearAcceleration => write!(f, "linear-acceleration"),
        }
    }
}

/// Requested sampling period, mirroring the platform presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorDelay {
    Fastest,
    #[default]
    Game,
    Ui,
    Normal,
}

impl SensorDelay {
    pub fn period_us(self) -> u64 {
        match self {
            SensorDelay::Fastest => 0,
            SensorDelay::Game => 20_000,
            SensorDelay::Ui => 66_667,
            SensorDelay::Normal => 200_000,
        }
    }
}

/// One raw event delivered by the platform
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    pub kind: SensorKind,
    pub values: Vec<f32>,
    pub timestamp_ns: i64,
}

impl SensorEvent {
    pub fn new(kind: SensorKind, values: Vec<f32>, timestamp_ns: i64) -> Self {
        Self {
            kind,
            values,
            timestamp_ns,
        }
    }
}
