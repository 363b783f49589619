use crate::observable::{Observable, Watch};
use crate::pipeline::OrientationPipeline;
use crate::sensors::{PeakTap, Subscription};
use crate::types::{Angle, GForce, ScreenOrientation};

/// 界面状态管理模块
/// 输出、输入通道和折叠状态分别放在独立的结构体中

/// 对外发布的可观察输出
#[derive(Clone)]
pub struct Outputs {
    pub angle: Observable<Angle>,
    pub g_force: Observable<GForce>,
    pub peak_g_force: Observable<f32>,
    pub orientation_lock: Observable<ScreenOrientation>,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            angle: Observable::new(Angle::ZERO),
            g_force: Observable::new(GForce::ZERO),
            peak_g_force: Observable::new(0.0),
            orientation_lock: Observable::new(ScreenOrientation::default()),
        }
    }
}

/// 输入通道，start 时建立，stop 时释放
#[derive(Default)]
pub struct InputChannels {
    pub orientation: Option<Subscription<Angle>>,
    pub acceleration: Option<Subscription<GForce>>,
    pub offset: Option<Watch<Angle>>,
}

impl InputChannels {
    pub fn is_open(&self) -> bool {
        self.orientation.is_some() || self.acceleration.is_some() || self.offset.is_some()
    }

    pub fn close(&mut self) {
        self.orientation = None;
        self.acceleration = None;
        self.offset = None;
    }
}

/// 折叠状态，只由持有者在 update 中修改
///
/// The peak is accumulated on the sensor side through `peak` while attached.
#[derive(Default)]
pub struct FoldState {
    pub pipeline: OrientationPipeline,
    pub peak: PeakTap,
}

/// 统一的界面状态
#[derive(Default)]
pub struct ViewState {
    pub outputs: Outputs,
    pub channels: InputChannels,
    pub fold: FoldState,
}

impl ViewState {
    /// 创建新的界面状态，偏移槽位预先填入当前偏移
    pub fn new(initial_offset: Angle) -> Self {
        let mut state = Self::default();
        state.fold.pipeline.on_offset(initial_offset);
        state
    }

    /// 获取当前状态摘要
    pub fn get_status_summary(&self) -> String {
        if self.channels.is_open() {
            "Running".to_string()
        } else {
            "Stopped".to_string()
        }
    }

    /// 折入一个原始角度，输出变化时发布
    pub fn apply_raw(&mut self, raw: Angle) {
        if let Some(calibrated) = self.fold.pipeline.on_raw(raw) {
            self.outputs.angle.set(calibrated);
        }
    }

    pub fn apply_offset(&mut self, offset: Angle) {
        if let Some(calibrated) = self.fold.pipeline.on_offset(offset) {
            self.outputs.angle.set(calibrated);
        }
    }

    pub fn apply_g_force(&mut self, g: GForce) {
        self.outputs.g_force.set(g);
        self.refresh_peak();
    }

    /// 从峰值累加器同步输出
    pub fn refresh_peak(&mut self) {
        self.outputs.peak_g_force.set(self.fold.peak.peak());
    }

    /// 重置峰值
    pub fn reset_peak(&mut self) {
        self.fold.peak.reset();
        self.outputs.peak_g_force.set(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_stopped_with_defaults() {
        let state = ViewState::new(Angle::ZERO);
        assert_eq!(state.get_status_summary(), "Stopped");
        assert_eq!(state.outputs.angle.get(), Angle::ZERO);
        assert_eq!(state.outputs.orientation_lock.get(), ScreenOrientation::Portrait);
        assert_eq!(state.fold.pipeline.offset(), Some(Angle::ZERO));
    }

    #[test]
    fn test_g_force_updates_peak() {
        let mut state = ViewState::new(Angle::ZERO);
        for g in [GForce::new(0.0, 2.0), GForce::new(1.0, 0.0)] {
            state.fold.peak.record(g);
            state.apply_g_force(g);
        }
        assert_eq!(state.outputs.g_force.get(), GForce::new(1.0, 0.0));
        assert_eq!(state.outputs.peak_g_force.get(), 2.0);

        state.reset_peak();
        assert_eq!(state.outputs.peak_g_force.get(), 0.0);
        assert_eq!(state.fold.peak.peak(), 0.0);
    }
}
