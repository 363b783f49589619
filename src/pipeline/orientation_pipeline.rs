use log::trace;

use crate::types::Angle;

/// Combines the latest raw angle with the latest calibration offset.
///
/// Emits `raw - offset` whenever either side changes and both are known,
/// skipping values equal to the previous emission.
#[derive(Debug, Clone, Default)]
pub struct OrientationPipeline {
    raw: Option<Angle>,
    offset: Option<Angle>,
    last_emitted: Option<Angle>,
}

impl OrientationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_raw(&mut self, raw: Angle) -> Option<Angle> {
        if !raw.is_finite() {
            trace!("Pipeline ignored non-finite raw angle {:?}", raw);
            return None;
        }
        self.raw = Some(raw);
        self.emit()
    }

    pub fn on_offset(&mut self, offset: Angle) -> Option<Angle> {
        self.offset = Some(offset);
        self.emit()
    }

    pub fn latest_raw(&self) -> Option<Angle> {
        self.raw
    }

    pub fn offset(&self) -> Option<Angle> {
        self.offset
    }

    pub fn last_emitted(&self) -> Option<Angle> {
        self.last_emitted
    }

    fn emit(&mut self) -> Option<Angle> {
        let calibrated = self.raw? - self.offset?;
        if self.last_emitted == Some(calibrated) {
            return None;
        }
        self.last_emitted = Some(calibrated);
        Some(calibrated)
    }
}
