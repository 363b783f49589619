pub mod acceleration;
pub mod math;
pub mod orientation;
pub mod platform;
pub mod shared_stream;
pub mod simulated;

#[cfg(test)]
pub(crate) mod testing;

pub use acceleration::{AccelerationSampler, PeakTap};
pub use math::{Axis, RotationMatrix};
pub use orientation::OrientationSampler;
pub use platform::{ListenerId, SensorCallback, SensorPlatform};
pub use shared_stream::{SharedSensorStream, Subscription};
pub use simulated::{SimulatedPlatform, VehicleMotion};
