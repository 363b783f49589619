pub mod preferences;
pub mod store;

pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, KEY_OFFSET_PITCH,
    KEY_OFFSET_ROLL, KEY_OFFSET_YAW, PREFS_NAMESPACE,
};
pub use store::CalibrationStore;
