use log::{debug, info};

use super::handlers::{CalibrationHandler, DataCollectionHandler};
use super::hub::SensorHub;
use super::state::ViewState;
use crate::error::StorageError;
use crate::observable::Watch;
use crate::types::{Angle, DeviceRotation, GForce, ScreenOrientation};
use crate::utils::format_readout;

/// View-model for one inclinometer screen.
///
/// Outputs are observable; commands act synchronously on the calling thread.
/// `update()` must be called regularly (e.g. once per frame) while started.
pub struct PresentationState {
    name: String,
    hub: SensorHub,
    state: ViewState,
}

impl PresentationState {
    pub fn new(name: &str, hub: &SensorHub) -> Self {
        Self {
            name: name.to_string(),
            hub: hub.clone(),
            state: ViewState::new(hub.calibration().offset()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 订阅两个传感器和校准偏移
    pub fn start(&mut self) {
        if self.state.channels.is_open() {
            return;
        }
        let acceleration = self.hub.acceleration();
        acceleration.attach_peak(&self.state.fold.peak);

        let channels = &mut self.state.channels;
        channels.offset = Some(self.hub.calibration().subscribe());
        channels.orientation = Some(self.hub.orientation().subscribe());
        channels.acceleration = Some(acceleration.subscribe());

        // 订阅时回放的最新样本也计入峰值
        if let Some(g) = acceleration.latest() {
            self.state.fold.peak.record(g);
        }
        info!("{}: started", self.name);
    }

    /// 释放订阅，监听器在宽限期后注销
    pub fn stop(&mut self) {
        if !self.state.channels.is_open() {
            return;
        }
        self.hub.acceleration().detach_peak(&self.state.fold.peak);
        self.state.channels.close();
        info!("{}: stopped", self.name);
    }

    pub fn is_running(&self) -> bool {
        self.state.channels.is_open()
    }

    pub fn status(&self) -> String {
        self.state.get_status_summary()
    }

    pub fn update(&mut self) {
        DataCollectionHandler::handle_updates(&mut self.state);
    }

    pub fn angle(&self) -> Angle {
        self.state.outputs.angle.get()
    }

    pub fn g_force(&self) -> GForce {
        self.state.outputs.g_force.get()
    }

    pub fn peak_g_force(&self) -> f32 {
        self.state.outputs.peak_g_force.get()
    }

    pub fn orientation_lock(&self) -> ScreenOrientation {
        self.state.outputs.orientation_lock.get()
    }

    pub fn watch_angle(&self) -> Watch<Angle> {
        self.state.outputs.angle.subscribe()
    }

    pub fn watch_g_force(&self) -> Watch<GForce> {
        self.state.outputs.g_force.subscribe()
    }

    pub fn watch_peak_g_force(&self) -> Watch<f32> {
        self.state.outputs.peak_g_force.subscribe()
    }

    pub fn watch_orientation_lock(&self) -> Watch<ScreenOrientation> {
        self.state.outputs.orientation_lock.subscribe()
    }

    /// Zeroes the display at the current attitude and clears the peak.
    ///
    /// Returns the new offset. On a storage error the offset is still applied
    /// for this process.
    pub fn calibrate(&mut self) -> Result<Angle, StorageError> {
        self.update();
        CalibrationHandler::handle_calibrate(&mut self.state, &self.hub)
    }

    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.update();
        CalibrationHandler::handle_reset(&mut self.state, &self.hub)
    }

    pub fn on_rotation_changed(&self, rotation: DeviceRotation) {
        self.hub.orientation().set_device_rotation(rotation);
    }

    pub fn toggle_orientation_lock(&self) -> ScreenOrientation {
        let lock = &self.state.outputs.orientation_lock;
        lock.update(|current| current.toggled());
        let orientation = lock.get();
        debug!("{}: orientation lock -> {:?}", self.name, orientation);
        orientation
    }

    pub fn readout(&self) -> String {
        format_readout(self.angle())
    }
}

impl Drop for PresentationState {
    fn drop(&mut self) {
        self.stop();
    }
}
