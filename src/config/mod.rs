//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod manager;
mod provider_config;

pub use app_config::{AppConfig, LoggingConfig, ServerConfig, StateConfig};
pub use manager::{ConfigManager, ENV_PREFIX};
pub use provider_config::{ProfileMapping, ProviderConfig};

use crate::ensure_config;
use crate::error::Result;

/// state 签名密钥的最小长度（字节）
pub const MIN_STATE_SECRET_LEN: usize = 32;

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // 验证服务器配置
    ensure_config!(config.server.port != 0, "无效的服务器端口: 0");
    ensure_config!(!config.server.host.is_empty(), "监听地址不能为空");

    // 验证 state 配置
    ensure_config!(
        config.state.secret.len() >= MIN_STATE_SECRET_LEN,
        "state.secret 长度至少为 {} 字节",
        MIN_STATE_SECRET_LEN
    );
    ensure_config!(config.state.ttl_seconds > 0, "state.ttl_seconds 必须大于0");

    // 验证提供商配置
    for (name, provider) in &config.providers {
        ensure_config!(!name.trim().is_empty(), "提供商名称不能为空");
        provider.validate(name)?;
    }

    Ok(())
}
