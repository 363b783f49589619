use log::{error, info};
use std::sync::{Arc, Mutex};

use super::preferences::{PreferenceStore, KEY_OFFSET_PITCH, KEY_OFFSET_ROLL, KEY_OFFSET_YAW};
use crate::error::StorageError;
use crate::observable::{lock, Observable, Watch};
use crate::types::Angle;

/// Process-wide calibration offset.
///
/// The in-memory value is published before persistence is attempted, so a
/// failed write leaves observers on the new offset and returns the error.
/// Concurrent writers are serialized so memory and storage end on the same value.
#[derive(Clone)]
pub struct CalibrationStore {
    offset: Observable<Angle>,
    prefs: Arc<dyn PreferenceStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CalibrationStore {
    /// 从持久化存储加载偏移，缺失的键取 0
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let offset = Angle::new(
            prefs.get_float(KEY_OFFSET_ROLL, 0.0),
            prefs.get_float(KEY_OFFSET_PITCH, 0.0),
            prefs.get_float(KEY_OFFSET_YAW, 0.0),
        );
        info!(
            "Calibration offset loaded: roll {:.2}, pitch {:.2}, yaw {:.2}",
            offset.roll, offset.pitch, offset.yaw
        );

        Self {
            offset: Observable::new(offset),
            prefs,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn offset(&self) -> Angle {
        self.offset.get()
    }

    /// Current offset first, then every change.
    pub fn subscribe(&self) -> Watch<Angle> {
        self.offset.subscribe()
    }

    pub fn set_offset(&self, offset: Angle) -> Result<(), StorageError> {
        // 发布和持久化必须在同一把锁内完成
        let _guard = lock(&self.write_lock);
        self.offset.set(offset);

        let result = self.prefs.put_floats(&[
            (KEY_OFFSET_ROLL, offset.roll),
            (KEY_OFFSET_PITCH, offset.pitch),
            (KEY_OFFSET_YAW, offset.yaw),
        ]);

        match &result {
            Ok(()) => info!(
                "Calibration offset saved: roll {:.2}, pitch {:.2}, yaw {:.2}",
                offset.roll, offset.pitch, offset.yaw
            ),
            Err(e) => error!("Failed to persist calibration offset: {}", e),
        }
        result
    }

    pub fn reset_offset(&self) -> Result<(), StorageError> {
        self.set_offset(Angle::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::preferences::MemoryPreferenceStore;

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn get_float(&self, _key: &str, default: f32) -> f32 {
            default
        }

        fn put_floats(&self, _entries: &[(&str, f32)]) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_loads_persisted_offset() {
        let prefs = Arc::new(MemoryPreferenceStore::with_values(&[
            (KEY_OFFSET_ROLL, 1.0),
            (KEY_OFFSET_YAW, -4.0),
        ]));
        let store = CalibrationStore::new(prefs);
        assert_eq!(store.offset(), Angle::new(1.0, 0.0, -4.0));
    }

    #[test]
    fn test_set_offset_persists_and_notifies() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let store = CalibrationStore::new(prefs.clone());
        let watch = store.subscribe();

        store.set_offset(Angle::new(2.0, 3.0, 4.0)).unwrap();

        assert_eq!(prefs.get_float(KEY_OFFSET_PITCH, 0.0), 3.0);
        let seen: Vec<Angle> = watch.receiver().try_iter().collect();
        assert_eq!(seen, vec![Angle::ZERO, Angle::new(2.0, 3.0, 4.0)]);

        // 新实例从同一存储读到相同偏移
        let reloaded = CalibrationStore::new(prefs);
        assert_eq!(reloaded.offset(), Angle::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_reset_publishes_zero() {
        let prefs = Arc::new(MemoryPreferenceStore::with_values(&[(KEY_OFFSET_ROLL, 5.0)]));
        let store = CalibrationStore::new(prefs.clone());
        store.reset_offset().unwrap();
        assert_eq!(store.offset(), Angle::ZERO);
        assert_eq!(prefs.get_float(KEY_OFFSET_ROLL, 9.0), 0.0);
    }

    #[test]
    fn test_write_failure_keeps_new_offset_in_memory() {
        let store = CalibrationStore::new(Arc::new(FailingStore));
        let result = store.set_offset(Angle::new(1.0, 1.0, 1.0));
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(store.offset(), Angle::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_clones_share_one_offset() {
        let store = CalibrationStore::new(Arc::new(MemoryPreferenceStore::new()));
        let other = store.clone();
        let watch = other.subscribe();
        store.set_offset(Angle::new(0.5, 0.0, 0.0)).unwrap();
        assert_eq!(other.offset(), Angle::new(0.5, 0.0, 0.0));
        assert_eq!(watch.latest(), Some(Angle::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_concurrent_writers_leave_memory_and_storage_in_sync() {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let store = CalibrationStore::new(prefs.clone());

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let v = (i * 100 + j) as f32;
                        let _ = store.set_offset(Angle::new(v, -v, 0.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let offset = store.offset();
        assert_eq!(prefs.get_float(KEY_OFFSET_ROLL, f32::NAN), offset.roll);
        assert_eq!(prefs.get_float(KEY_OFFSET_PITCH, f32::NAN), offset.pitch);
    }
}
