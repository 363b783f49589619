use std::sync::Arc;

use crate::calibration::{CalibrationStore, PreferenceStore};
use crate::config::SensorConfig;
use crate::sensors::{AccelerationSampler, OrientationSampler, SensorPlatform};

/// 进程内共享的传感器与校准实例
///
/// Every presentation built from the same hub shares one listener per sensor
/// and one calibration offset.
#[derive(Clone)]
pub struct SensorHub {
    orientation: Arc<OrientationSampler>,
    acceleration: Arc<AccelerationSampler>,
    calibration: CalibrationStore,
}

impl SensorHub {
    pub fn new(
        platform: Arc<dyn SensorPlatform>,
        prefs: Arc<dyn PreferenceStore>,
        config: &SensorConfig,
    ) -> Self {
        Self {
            orientation: Arc::new(OrientationSampler::new(Arc::clone(&platform), config)),
            acceleration: Arc::new(AccelerationSampler::new(platform, config)),
            calibration: CalibrationStore::new(prefs),
        }
    }

    pub fn orientation(&self) -> &OrientationSampler {
        &self.orientation
    }

    pub fn acceleration(&self) -> &AccelerationSampler {
        &self.acceleration
    }

    pub fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }
}
