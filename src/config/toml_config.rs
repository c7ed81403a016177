use crate::core::service::DEFAULT_PROFILES;
use crate::core::ConfigProvider;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const BACKEND_FILE: &str = "file";
pub const BACKEND_MEMORY: &str = "memory";
pub const LOG_FORMAT_COMPACT: &str = "compact";
pub const LOG_FORMAT_JSON: &str = "json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_profiles")]
    pub profiles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_backend() -> String {
    BACKEND_FILE.to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_profiles() -> Vec<String> {
    DEFAULT_PROFILES.iter().map(|p| p.to_string()).collect()
}

fn default_log_format() -> String {
    LOG_FORMAT_COMPACT.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| CatalogError::ConfigError {
            message: format!(
                "cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定者原樣保留
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_one_of(
            "storage.backend",
            &self.storage.backend,
            &[BACKEND_FILE, BACKEND_MEMORY],
        )?;
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_profiles("catalog.profiles", &self.catalog.profiles)?;
        validation::validate_one_of(
            "logging.format",
            &self.logging.format,
            &[LOG_FORMAT_COMPACT, LOG_FORMAT_JSON],
        )?;
        Ok(())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format == LOG_FORMAT_JSON
    }
}

impl ConfigProvider for TomlConfig {
    fn backend(&self) -> &str {
        &self.storage.backend
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn profiles(&self) -> &[String] {
        &self.catalog.profiles
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
