use log::info;

use crate::app::hub::SensorHub;
use crate::app::state::ViewState;
use crate::error::StorageError;
use crate::types::Angle;

pub struct CalibrationHandler;

impl CalibrationHandler {
    /// 以最新原始角度为零点
    ///
    /// In-memory effects are applied before the storage result is returned.
    pub fn handle_calibrate(state: &mut ViewState, hub: &SensorHub) -> Result<Angle, StorageError> {
        let pipeline_raw = state.fold.pipeline.latest_raw();
        let shared_raw = hub.orientation().latest();
        // 停止后本实例的槽位不再更新，以共享缓存为准
        let raw = if state.channels.orientation.is_some() {
            pipeline_raw.or(shared_raw)
        } else {
            shared_raw.or(pipeline_raw)
        }
        .unwrap_or(Angle::ZERO);

        let result = hub.calibration().set_offset(raw);

        state.reset_peak();
        if pipeline_raw != Some(raw) {
            state.apply_raw(raw);
        }
        state.apply_offset(raw);

        info!(
            "Calibrated at roll {:.2}, pitch {:.2}, yaw {:.2}",
            raw.roll, raw.pitch, raw.yaw
        );
        result.map(|()| raw)
    }

    pub fn handle_reset(state: &mut ViewState, hub: &SensorHub) -> Result<(), StorageError> {
        let result = hub.calibration().reset_offset();

        state.reset_peak();
        state.apply_offset(Angle::ZERO);

        info!("Calibration reset");
        result
    }
}
