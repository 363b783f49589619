use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::SensorDelay;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// Environment variable holding the config file path
pub const CONFIG_PATH_ENV: &str = "INCLINOMETER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sensors: SensorConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

/// 传感器订阅配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Listener stays registered this long after the last subscriber leaves
    pub grace_period_ms: u64,
    pub delay: SensorDelay,
    /// Per-subscriber queue length; the oldest sample is dropped when full
    pub channel_capacity: usize,
}

/// 校准偏移的持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub auto_create_dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// 无界面演示运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub duration_seconds: f64,
    pub readout_interval_ms: u64,
    pub frame_interval_ms: u64,
    /// Calibrate the dashboard once after this many seconds; negative disables it
    pub calibrate_after_seconds: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 5000,
            delay: SensorDelay::Game,
            channel_capacity: 64,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/sensor_prefs.toml".to_string(),
            auto_create_dir: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 10.0,
            readout_interval_ms: 1000,
            frame_interval_ms: 16,
            calibrate_after_seconds: 3.0,
        }
    }
}

impl SensorConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensors.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Sensor channel capacity must be positive".to_string(),
            ));
        }

        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Storage path must not be empty".to_string(),
            ));
        }

        if self.demo.duration_seconds <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Demo duration must be positive".to_string(),
            ));
        }

        if self.demo.frame_interval_ms == 0 || self.demo.readout_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Demo intervals must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// 获取偏移存储文件路径
    pub fn get_storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }

    /// 获取数据目录路径
    pub fn get_data_directory(&self) -> PathBuf {
        self.get_storage_path()
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Path from `INCLINOMETER_CONFIG` (or `config.toml`); defaults when the file is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        if Path::new(&path).exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::new())
        }
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sensors.grace_period(), Duration::from_secs(5));
        assert_eq!(config.sensors.delay, SensorDelay::Game);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [sensors]
            grace_period_ms = 250
            delay = "ui"
            "#,
        )
        .unwrap();

        assert_eq!(config.sensors.grace_period_ms, 250);
        assert_eq!(config.sensors.delay, SensorDelay::Ui);
        assert_eq!(config.sensors.channel_capacity, 64);
        assert_eq!(config.storage.path, "data/sensor_prefs.toml");
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let mut config = AppConfig::default();
        config.sensors.channel_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "inclinometer-config-{}-{}.toml",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        let mut config = AppConfig::default();
        config.demo.calibrate_after_seconds = -1.0;
        config.save_to_file(&path).unwrap();

        let manager = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(manager.get_config().demo.calibrate_after_seconds, -1.0);
        assert_eq!(manager.config_path(), Some(path.as_path()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_data_directory() {
        let config = AppConfig::default();
        assert_eq!(config.get_data_directory(), PathBuf::from("data"));
    }
}
