//! # 日志配置模块
//!
//! 提供统一的结构化日志宏与日志初始化。授权码、访问令牌和 state 字符串一律不写入日志。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 请求处理所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 启动
    Startup,
    /// 关闭
    Shutdown,
    /// 配置加载
    Configuration,
    /// state 校验
    StateValidation,
    /// 提供商错误检查
    ErrorCheck,
    /// 授权码检查
    CodeValidation,
    /// 提供商解析
    ProviderResolve,
    /// 令牌交换
    TokenExchange,
    /// 资料获取
    ProfileFetch,
    /// 账号关联
    AccountLink,
    /// 授权跳转
    Authorize,
    /// 错误
    Error,
}

impl LogStage {
    /// 阶段名
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::StateValidation => "state_validation",
            Self::ErrorCheck => "error_check",
            Self::CodeValidation => "code_validation",
            Self::ProviderResolve => "provider_resolve",
            Self::TokenExchange => "token_exchange",
            Self::ProfileFetch => "profile_fetch",
            Self::AccountLink => "account_link",
            Self::Authorize => "authorize",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 入口
    Main,
    /// 配置
    Config,
    /// state 编解码
    State,
    /// 提供商注册表
    Registry,
    /// 提供商实现
    Provider,
    /// 回调编排
    Callback,
    /// HTTP 服务
    Server,
}

impl LogComponent {
    /// 组件名
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::State => "state",
            Self::Registry => "registry",
            Self::Provider => "provider",
            Self::Callback => "callback",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构化 info 日志
#[macro_export]
macro_rules! linfo {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::debug!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::warn!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::error!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($($field)+,)?
            "{}",
            $message
        )
    };
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先；否则使用传入级别（缺省 info），本 crate 固定 debug。
pub fn init_optimized_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let default_filter = format!("{level},oauth_callback=debug,tower_http=info,hyper=warn");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(log_filter))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_component_names_are_snake_case() {
        assert_eq!(LogStage::TokenExchange.to_string(), "token_exchange");
        assert_eq!(LogStage::StateValidation.as_str(), "state_validation");
        assert_eq!(LogComponent::Registry.to_string(), "registry");
    }

    #[test]
    fn macros_accept_extra_fields() {
        init_optimized_logging(Some("debug"));
        let provider = "github";
        linfo!(
            "test",
            LogStage::ProviderResolve,
            LogComponent::Registry,
            "resolve",
            "resolved provider",
            provider = provider
        );
        lwarn!("test", LogStage::Error, LogComponent::Callback, "fail", &format!("failed: {}", 1));
    }
}
