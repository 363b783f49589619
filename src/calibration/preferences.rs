use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::observable::lock;

/// 校准偏移所在的命名空间与键
pub const PREFS_NAMESPACE: &str = "sensor_prefs";
pub const KEY_OFFSET_ROLL: &str = "offset_roll";
pub const KEY_OFFSET_PITCH: &str = "offset_pitch";
pub const KEY_OFFSET_YAW: &str = "offset_yaw";

/// Flat float key-value store bound to one namespace.
///
/// `put_floats` must be durable when it returns `Ok`.
pub trait PreferenceStore: Send + Sync {
    fn get_float(&self, key: &str, default: f32) -> f32;

    fn put_floats(&self, entries: &[(&str, f32)]) -> Result<(), StorageError>;
}

type Document = BTreeMap<String, BTreeMap<String, f32>>;

/// TOML-file backed store. Each namespace is one table:
///
/// ```toml
/// [sensor_prefs]
/// offset_roll = 1.5
/// ```
///
/// Other tables in the same file are preserved on write.
pub struct FilePreferenceStore {
    path: PathBuf,
    namespace: String,
    document: Mutex<Document>,
}

impl FilePreferenceStore {
    pub fn open<P: AsRef<Path>>(
        path: P,
        namespace: &str,
        auto_create_dir: bool,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if auto_create_dir {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let document = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Document>(&content) {
                Ok(document) => document,
                Err(e) => {
                    // 文件损坏时从默认值开始，下一次写入会覆盖它
                    warn!("Ignoring unreadable preferences at {}: {}", path.display(), e);
                    Document::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Document::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        info!("Preferences loaded from {} [{}]", path.display(), namespace);

        Ok(Self {
            path,
            namespace: namespace.to_string(),
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(document).map_err(StorageError::Serialize)?;

        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path).map_err(|e| io_error(&tmp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| io_error(&tmp_path, e))?;
        file.sync_all().map_err(|e| io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| io_error(&self.path, e))?;

        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        lock(&self.document)
            .get(&self.namespace)
            .and_then(|table| table.get(key))
            .copied()
            .unwrap_or(default)
    }

    fn put_floats(&self, entries: &[(&str, f32)]) -> Result<(), StorageError> {
        let mut document = lock(&self.document);
        let mut next = document.clone();
        let table = next.entry(self.namespace.clone()).or_default();
        for (key, value) in entries {
            table.insert((*key).to_string(), *value);
        }

        self.write_document(&next)?;
        *document = next;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Non-durable store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, f32>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(entries: &[(&str, f32)]) -> Self {
        let store = Self::new();
        {
            let mut values = lock(&store.values);
            for (key, value) in entries {
                values.insert((*key).to_string(), *value);
            }
        }
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        lock(&self.values).get(key).copied().unwrap_or(default)
    }

    fn put_floats(&self, entries: &[(&str, f32)]) -> Result<(), StorageError> {
        let mut values = lock(&self.values);
        for (key, value) in entries {
            values.insert((*key).to_string(), *value);
        }
        Ok(())
    }
}
