//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ProviderConfig;

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// state 令牌签名配置
    pub state: StateConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 已配置的第三方提供商，键为提供商名称
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 对外访问地址，用于拼接默认回调地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9999,
            public_url: None,
        }
    }
}

/// state 令牌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// HMAC 签名密钥
    pub secret: String,
    /// 签发者
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// 受众
    #[serde(default = "default_audience")]
    pub audience: String,
    /// 有效期（秒）
    #[serde(default = "default_state_ttl")]
    pub ttl_seconds: u64,
    /// 过期校验容差（秒）
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_issuer() -> String {
    "oauth-callback".to_string()
}

fn default_audience() -> String {
    "oauth-callback-state".to_string()
}

const fn default_state_ttl() -> u64 {
    600
}

const fn default_leeway() -> u64 {
    30
}

impl StateConfig {
    /// 使用默认签发者/受众/有效期构造
    pub fn with_secret<S: Into<String>>(secret: S) -> Self {
        Self {
            secret: secret.into(),
            issuer: default_issuer(),
            audience: default_audience(),
            ttl_seconds: default_state_ttl(),
            leeway_seconds: default_leeway(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 获取监听地址
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
