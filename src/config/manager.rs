//! # 配置管理器
//!
//! 启动时一次性加载配置文件并应用环境变量覆盖。加载完成后配置只读。

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use super::{AppConfig, validate_config};
use crate::error::{CallbackError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo, lwarn};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "OAUTH_CALLBACK_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: Arc<AppConfig>,
    /// 配置文件路径
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 按默认规则定位配置文件并加载
    pub fn new(explicit_path: Option<&Path>) -> Result<Self> {
        let config_file = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path(),
        };

        Self::from_file(&config_file)
    }

    /// 默认配置路径：`OAUTH_CALLBACK_CONFIG_PATH` 或 `config/config.{RUST_ENV}.toml`
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = env::var(format!("{ENV_PREFIX}CONFIG_PATH")) {
            return PathBuf::from(path);
        }
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        PathBuf::from(format!("config/config.{env}.toml"))
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Err(CallbackError::config(format!(
                "配置文件不存在: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            CallbackError::config_with_source(
                format!("读取配置文件失败: {}", config_path.display()),
                e,
            )
        })?;

        let mut manager = Self::from_toml_str(&content, &Self::build_env_overrides())?;
        manager.source = Some(config_path.to_path_buf());

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            "配置加载完成",
            path = %config_path.display()
        );
        Ok(manager)
    }

    /// 从 TOML 文本创建配置管理器，并应用给定的覆盖项
    pub fn from_toml_str(content: &str, overrides: &HashMap<String, String>) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)
            .map_err(|e| CallbackError::config_with_source(format!("TOML解析失败: {e}"), e))?;

        Self::apply_env_overrides(&mut config, overrides)?;
        validate_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            source: None,
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// 配置文件路径
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 构建环境变量覆盖映射
    fn build_env_overrides() -> HashMap<String, String> {
        let mut overrides = HashMap::new();

        for (key, value) in env::vars() {
            if let Some(config_path) = override_path(&key) {
                overrides.insert(config_path, value);
            }
        }

        ldebug!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "env_overrides",
            "发现环境变量覆盖",
            count = overrides.len()
        );
        overrides
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            ldebug!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "apply_override",
                "应用环境变量覆盖",
                path = path.as_str(),
                value = masked_override_value(path, value)
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将环境变量覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        match path {
            "server.host" => config.server.host = value.to_string(),
            "server.port" => {
                config.server.port = value.parse().map_err(|e| {
                    CallbackError::config_with_source(format!("无效的端口号: {value}"), e)
                })?;
            }
            "server.public_url" => config.server.public_url = Some(value.to_string()),
            "state.secret" => config.state.secret = value.to_string(),
            "state.issuer" => config.state.issuer = value.to_string(),
            "state.audience" => config.state.audience = value.to_string(),
            "state.ttl_seconds" => {
                config.state.ttl_seconds = value.parse().map_err(|e| {
                    CallbackError::config_with_source(format!("无效的 state 有效期: {value}"), e)
                })?;
            }
            "state.leeway_seconds" => {
                config.state.leeway_seconds = value.parse().map_err(|e| {
                    CallbackError::config_with_source(format!("无效的 state 容差: {value}"), e)
                })?;
            }
            "logging.level" => config.logging.level = value.to_string(),
            _ => lwarn!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "unknown_override",
                "忽略未知的环境变量覆盖",
                path = path
            ),
        }
        Ok(())
    }
}

/// 环境变量名到配置路径，例如 `OAUTH_CALLBACK_SERVER_PORT` -> `server.port`
fn override_path(env_key: &str) -> Option<String> {
    let config_key = env_key.strip_prefix(ENV_PREFIX)?;
    if config_key == "CONFIG_PATH" {
        return None;
    }
    Some(config_key.to_lowercase().replacen('_', ".", 1))
}

/// 日志中展示的覆盖值，密钥类配置一律打码
fn masked_override_value<'a>(path: &str, value: &'a str) -> &'a str {
    if path.contains("secret") || path.contains("key") {
        "***"
    } else {
        value
    }
}
