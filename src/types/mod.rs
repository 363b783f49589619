pub mod angle;
pub mod g_force;
pub mod rotation;
pub mod sensor_event;

pub use angle::Angle;
pub use g_force::GForce;
pub use rotation::{DeviceRotation, ScreenOrientation};
pub use sensor_event::{SensorDelay, SensorEvent, SensorKind};
