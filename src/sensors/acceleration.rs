use std::sync::{Arc, Mutex, Weak};

use super::platform::SensorPlatform;
use super::shared_stream::{Decoder, SharedSensorStream, Subscription};
use crate::config::SensorConfig;
use crate::observable::lock;
use crate::pipeline::MaxTracker;
use crate::types::{GForce, SensorEvent, SensorKind};

/// Peak accumulator fed on the sensor callback thread.
///
/// Sees every decoded sample while attached, including samples a slow
/// subscriber's queue later drops.
#[derive(Clone, Default)]
pub struct PeakTap {
    tracker: Arc<Mutex<MaxTracker>>,
}

impl PeakTap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peak(&self) -> f32 {
        lock(&self.tracker).peak()
    }

    pub fn reset(&self) {
        lock(&self.tracker).reset();
    }

    pub(crate) fn record(&self, g: GForce) {
        lock(&self.tracker).update(g);
    }
}

type PeakTaps = Arc<Mutex<Vec<Weak<Mutex<MaxTracker>>>>>;

/// Horizontal g-force from the linear-acceleration sensor.
/// z is not used by the 2D meter.
pub struct AccelerationSampler {
    stream: SharedSensorStream<GForce>,
    peaks: PeakTaps,
}

impl AccelerationSampler {
    pub fn new(platform: Arc<dyn SensorPlatform>, config: &SensorConfig) -> Self {
        let peaks: PeakTaps = Arc::new(Mutex::new(Vec::new()));

        let callback_peaks = Arc::clone(&peaks);
        let decoder: Decoder<GForce> = Arc::new(move |event: &SensorEvent| {
            let g = decode_linear_acceleration(&event.values)?;
            // 在入队之前累计峰值，队列丢弃旧样本不影响峰值
            lock(&callback_peaks).retain(|tap| match tap.upgrade() {
                Some(tracker) => {
                    lock(&tracker).update(g);
                    true
                }
                None => false,
            });
            Some(g)
        });

        Self {
            stream: SharedSensorStream::new(
                platform,
                SensorKind::LinearAcceleration,
                config.delay,
                config.grace_period(),
                config.channel_capacity,
                decoder,
            ),
            peaks,
        }
    }

    pub fn subscribe(&self) -> Subscription<GForce> {
        self.stream.subscribe()
    }

    pub fn latest(&self) -> Option<GForce> {
        self.stream.latest()
    }

    pub fn stream(&self) -> &SharedSensorStream<GForce> {
        &self.stream
    }

    /// Starts feeding every decoded sample into `tap`.
    pub fn attach_peak(&self, tap: &PeakTap) {
        let mut peaks = lock(&self.peaks);
        if !peaks.iter().any(|w| w.as_ptr() == Arc::as_ptr(&tap.tracker)) {
            peaks.push(Arc::downgrade(&tap.tracker));
        }
    }

    pub fn detach_peak(&self, tap: &PeakTap) {
        lock(&self.peaks).retain(|w| w.as_ptr() != Arc::as_ptr(&tap.tracker) && w.strong_count() > 0);
    }
}

pub fn decode_linear_acceleration(values: &[f32]) -> Option<GForce> {
    match values {
        [x, y, ..] => Some(GForce::new(*x, *y)),
        _ => None,
    }
}
