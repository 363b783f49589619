use std::fmt;
use std::sync::Arc;

use crate::types::{SensorDelay, SensorEvent, SensorKind};

/// Callback invoked by the platform for every event of the registered kind.
/// May be called from any thread.
pub type SensorCallback = Arc<dyn Fn(&SensorEvent) + Send + Sync>;

/// Handle for one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Boundary to the sensor hardware.
///
/// Implementations deliver push-based, irregular-rate vector samples. A sensor
/// that does not exist on the device is reported by returning `None` from
/// [`SensorPlatform::register_listener`]; the caller then simply never sees
/// events for it.
pub trait SensorPlatform: Send + Sync {
    fn register_listener(
        &self,
        kind: SensorKind,
        delay: SensorDelay,
        callback: SensorCallback,
    ) -> Option<ListenerId>;

    fn unregister_listener(&self, id: ListenerId);
}
