use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - storage: 本地存储后端与键名
/// - baseline: 基线数据集来源
/// - redirect: 跳转延迟与片段分隔符
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__REDIRECT__DELAY_MS=300
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置（全部为默认值）
    pub fn generate_sample_config() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// 将示例配置写入文件，必要时创建父目录
    pub fn write_sample_config<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = Self::generate_sample_config()?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 本地存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// 本地存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_links_key")]
    pub links_key: String,
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

/// 基线数据集配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// 本地文件路径或 http(s):// 地址，留空表示不使用基线
    #[serde(default = "default_baseline_source")]
    pub source: String,
    #[serde(default = "default_baseline_timeout_ms")]
    pub timeout_ms: u64,
}

impl BaselineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 跳转配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// 导航前的固定延迟，给 fire-and-forget 的统计请求留出发送时间
    #[serde(default = "default_redirect_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_fragment_delimiter")]
    pub fragment_delimiter: char,
}

impl RedirectConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_links_key() -> String {
    "sluglinker_links".to_string()
}

fn default_settings_key() -> String {
    "sluglinker_settings".to_string()
}

fn default_baseline_source() -> String {
    "links.json".to_string()
}

fn default_baseline_timeout_ms() -> u64 {
    3000
}

fn default_redirect_delay_ms() -> u64 {
    150
}

fn default_fragment_delimiter() -> char {
    '#'
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            links_key: default_links_key(),
            settings_key: default_settings_key(),
        }
    }
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            source: default_baseline_source(),
            timeout_ms: default_baseline_timeout_ms(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_redirect_delay_ms(),
            fragment_delimiter: default_fragment_delimiter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.links_key, "sluglinker_links");
        assert_eq!(config.baseline.source, "links.json");
        assert_eq!(config.redirect.delay(), Duration::from_millis(150));
        assert_eq!(config.redirect.fragment_delimiter, '#');
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let sample = StaticConfig::generate_sample_config().unwrap();
        assert!(sample.contains("[storage]"));
        assert!(sample.contains("[redirect]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.baseline.timeout_ms, 3000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [storage]
            backend = "memory"

            [redirect]
            delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.storage.backend, StorageBackend::Memory);
        assert_eq!(parsed.storage.data_dir, "data");
        assert_eq!(parsed.redirect.delay_ms, 0);
    }

    #[test]
    fn test_storage_backend_from_str() {
        use std::str::FromStr;
        assert_eq!(
            StorageBackend::from_str("MEMORY").unwrap(),
            StorageBackend::Memory
        );
        assert!(StorageBackend::from_str("redis").is_err());
        assert_eq!(StorageBackend::File.as_ref(), "file");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[baseline]\nsource = \"seed.json\"\n").unwrap();

        let config = StaticConfig::load(path.to_str());
        assert_eq!(config.baseline.source, "seed.json");
    }

    #[test]
    fn test_write_sample_config_creates_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.example.toml");

        StaticConfig::write_sample_config(&path).unwrap();

        let config = StaticConfig::load(path.to_str());
        assert_eq!(config.redirect.delay_ms, 150);
        assert_eq!(config.storage.settings_key, "sluglinker_settings");
    }
}
