//! Vehicle inclinometer core: rotation-vector and linear-acceleration sensors
//! turned into calibrated roll/pitch angles and g-force for display.

pub mod app;
pub mod calibration;
pub mod config;
pub mod error;
pub mod logger;
pub mod observable;
pub mod pipeline;
pub mod sensors;
pub mod types;
pub mod utils;

pub use app::{PresentationState, SensorHub};
pub use calibration::{CalibrationStore, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use config::{AppConfig, ConfigManager};
pub use error::{InclinometerError, Result, StorageError};
pub use types::{Angle, DeviceRotation, GForce, ScreenOrientation};
