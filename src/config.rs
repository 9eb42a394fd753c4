use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::processing::filter::DEFAULT_ALPHA;
use crate::processing::window::{CounterMode, DEFAULT_THRESHOLD};

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub window: WindowConfig,
    pub source: SourceConfig,
    pub mqtt: MqttConfig,
    pub channels: ChannelConfig,
}

/// 低通滤波配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 平滑系数，越大越平滑
    pub alpha: f64,
}

/// 滚动窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 每个窗口的点数，超过后整组清空
    pub threshold: u64,
    pub counter_mode: CounterMode,
    /// 加速度计窗口清空时是否同时重置滤波器
    pub reset_filter_on_window: bool,
}

/// 数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mqtt,
    Replay,
}

/// 数据来源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// JSON lines 回放文件
    pub replay_path: String,
    /// 回放时每个样本之间的间隔（毫秒），0 表示不等待
    pub replay_interval_ms: u64,
}

/// MQTT配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub qos: u8,
    pub keep_alive: u16,
    pub topics: MqttTopics,
}

/// MQTT主题配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttTopics {
    pub accelerometer: String,
    pub gyroscope: String,
}

/// 通道配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
    /// 渲染通道容量，按批次计（每个样本一批）
    pub event_channel_capacity: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            counter_mode: CounterMode::Independent,
            reset_filter_on_window: false,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mqtt,
            replay_path: String::new(),
            replay_interval_ms: 0,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "motion_plot_client".to_string(),
            qos: 1,
            keep_alive: 5,
            topics: MqttTopics::default(),
        }
    }
}

impl Default for MqttTopics {
    fn default() -> Self {
        Self {
            accelerometer: "sensor/accelerometer".to_string(),
            gyroscope: "sensor/gyroscope".to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 5000,
            event_channel_capacity: 10000,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml(&content)
    }

    /// 文件存在则加载，否则使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
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
        if !(0.0..=1.0).contains(&self.filter.alpha) {
            return Err(ConfigError::ValidationError(format!(
                "Filter alpha must be within [0, 1], got {}",
                self.filter.alpha
            )));
        }

        if self.window.threshold == 0 {
            return Err(ConfigError::ValidationError("Window threshold must be positive".to_string()));
        }

        if self.source.kind == SourceKind::Replay && self.source.replay_path.is_empty() {
            return Err(ConfigError::ValidationError("Replay source requires replay_path".to_string()));
        }

        if self.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError(format!("Invalid MQTT QoS level: {}", self.mqtt.qos)));
        }

        if self.channels.sample_channel_capacity == 0 || self.channels.event_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Channel capacities must be positive".to_string()));
        }

        Ok(())
    }

    /// 获取回放文件路径
    pub fn get_replay_path(&self) -> PathBuf {
        PathBuf::from(&self.source.replay_path)
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
