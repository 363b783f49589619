use log::{info, trace};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::math::RotationMatrix;
use super::platform::SensorPlatform;
use super::shared_stream::{Decoder, SharedSensorStream, Subscription};
use crate::config::SensorConfig;
use crate::types::{Angle, DeviceRotation, SensorEvent, SensorKind};

/// Raw device attitude from the rotation-vector sensor.
///
/// The current display rotation is owned here and read by the sensor
/// callback for every event, so the remap rule is a pure function of
/// (matrix, rotation).
pub struct OrientationSampler {
    stream: SharedSensorStream<Angle>,
    rotation: Arc<AtomicU8>,
}

impl OrientationSampler {
    pub fn new(platform: Arc<dyn SensorPlatform>, config: &SensorConfig) -> Self {
        let rotation = Arc::new(AtomicU8::new(DeviceRotation::Rotation0 as u8));

        let callback_rotation = Arc::clone(&rotation);
        let decoder: Decoder<Angle> = Arc::new(move |event: &SensorEvent| {
            let rotation = DeviceRotation::from_repr(callback_rotation.load(Ordering::Relaxed));
            decode_rotation_vector(&event.values, rotation)
        });

        let stream = SharedSensorStream::new(
            platform,
            SensorKind::RotationVector,
            config.delay,
            config.grace_period(),
            config.channel_capacity,
            decoder,
        );

        Self { stream, rotation }
    }

    pub fn subscribe(&self) -> Subscription<Angle> {
        self.stream.subscribe()
    }

    /// Latest raw angle seen by the shared stream.
    pub fn latest(&self) -> Option<Angle> {
        self.stream.latest()
    }

    pub fn set_device_rotation(&self, rotation: DeviceRotation) {
        let previous = self.rotation.swap(rotation as u8, Ordering::Relaxed);
        if previous != rotation as u8 {
            info!(
                "Device rotation changed: {}° -> {}°",
                DeviceRotation::from_repr(previous).degrees(),
                rotation.degrees()
            );
        }
    }

    pub fn device_rotation(&self) -> DeviceRotation {
        DeviceRotation::from_repr(self.rotation.load(Ordering::Relaxed))
    }

    pub fn stream(&self) -> &SharedSensorStream<Angle> {
        &self.stream
    }
}

/// Rotation vector -> remapped matrix -> Euler degrees.
///
/// Returns `None` for short vectors and for any non-finite component.
pub fn decode_rotation_vector(values: &[f32], rotation: DeviceRotation) -> Option<Angle> {
    let angle = RotationMatrix::from_rotation_vector(values)?
        .remap_for(rotation)
        .to_angle();

    if !angle.is_finite() {
        return None;
    }

    trace!(
        "Raw angles -> roll: {:.2}, pitch: {:.2}, yaw: {:.2}, rotation: {}°",
        angle.roll,
        angle.pitch,
        angle.yaw,
        rotation.degrees()
    );
    Some(angle)
}
