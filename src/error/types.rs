//! # 错误类型定义

use axum::http::StatusCode;
use thiserror::Error;

use super::ErrorCategory;
use crate::callback::CallbackStage;
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, lwarn};

/// 状态令牌校验失败时对外返回的统一文案，不暴露具体失败原因
pub const INVALID_STATE_MESSAGE: &str = "OAuth state is invalid or has expired";

/// `BadRequest` 的细分原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadRequestReason {
    /// 缺少 `state` 查询参数
    MissingState,
    /// 缺少 `code` 查询参数
    MissingCode,
    /// 提供商未注册或不支持 OAuth
    UnsupportedProvider,
    /// 查询串无法解析（重复或格式错误的参数）
    MalformedQuery,
}

impl BadRequestReason {
    /// 日志中使用的原因标识
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingState => "missing_state",
            Self::MissingCode => "missing_code",
            Self::UnsupportedProvider => "unsupported_provider",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// 回调服务主要错误类型
///
/// 每个请求最多产生一个分类；`source` 只用于日志，不会出现在响应里。
#[derive(Debug, Error)]
pub enum CallbackError {
    /// 客户端请求错误
    #[error("请求错误: {message}")]
    BadRequest {
        reason: BadRequestReason,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// state 签名或完整性校验失败
    #[error("状态校验失败: {}", INVALID_STATE_MESSAGE)]
    InvalidState {
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 第三方提供商在回调中明确返回了错误
    #[error("提供商拒绝授权: {error_code}: {description}")]
    ProviderDenied {
        error_code: String,
        description: String,
    },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 服务器启动错误
    #[error("服务器启动错误: {message}")]
    ServerStart {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 请求在某个阶段执行期间被取消
    #[error("请求已取消: {stage}")]
    Cancelled { stage: CallbackStage },
}

impl CallbackError {
    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub const fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::InvalidState { .. } => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            Self::ProviderDenied { .. } => (StatusCode::BAD_REQUEST, "PROVIDER_DENIED"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::ServerStart { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_START_ERROR")
            }
            Self::Cancelled { .. } => (StatusCode::REQUEST_TIMEOUT, "REQUEST_CANCELLED"),
        }
    }

    /// 错误归属（客户端 / 服务端）
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. }
            | Self::InvalidState { .. }
            | Self::ProviderDenied { .. }
            | Self::Cancelled { .. } => ErrorCategory::Client,
            Self::Internal { .. } | Self::Config { .. } | Self::ServerStart { .. } => {
                ErrorCategory::Server
            }
        }
    }

    /// `BadRequest` 的细分原因
    #[must_use]
    pub const fn bad_request_reason(&self) -> Option<BadRequestReason> {
        match self {
            Self::BadRequest { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// 可以安全返回给调用方的文案
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest { message, .. }
            | Self::Internal { message, .. }
            | Self::Config { message, .. }
            | Self::ServerStart { message, .. } => message.clone(),
            Self::InvalidState { .. } => INVALID_STATE_MESSAGE.to_string(),
            Self::ProviderDenied {
                error_code,
                description,
            } => {
                if description.is_empty() {
                    error_code.clone()
                } else {
                    format!("{error_code}: {description}")
                }
            }
            Self::Cancelled { .. } => "request was cancelled".to_string(),
        }
    }

    /// 写一条结构化日志，包含完整的 source 链
    pub fn log(&self, request_id: &str) {
        let (_, code) = self.to_http_response_parts();
        let chain = self.source_chain();
        match self.category() {
            ErrorCategory::Client => lwarn!(
                request_id,
                LogStage::Error,
                LogComponent::Server,
                "request_failed",
                &self.to_string(),
                code = code,
                cause = chain.as_str()
            ),
            ErrorCategory::Server => lerror!(
                request_id,
                LogStage::Error,
                LogComponent::Server,
                "request_failed",
                &self.to_string(),
                code = code,
                cause = chain.as_str()
            ),
        }
    }

    fn source_chain(&self) -> String {
        let mut parts = Vec::new();
        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            parts.push(err.to_string());
            current = err.source();
        }
        parts.join(" <- ")
    }

    /// 创建请求错误
    pub fn bad_request<T: Into<String>>(reason: BadRequestReason, message: T) -> Self {
        Self::BadRequest {
            reason,
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的请求错误
    pub fn bad_request_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        reason: BadRequestReason,
        message: T,
        source: E,
    ) -> Self {
        Self::BadRequest {
            reason,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建 state 校验错误
    pub fn invalid_state<E: Into<anyhow::Error>>(source: E) -> Self {
        Self::InvalidState {
            source: Some(source.into()),
        }
    }

    /// 创建提供商拒绝错误
    pub fn provider_denied<C: Into<String>, D: Into<String>>(error_code: C, description: D) -> Self {
        Self::ProviderDenied {
            error_code: error_code.into(),
            description: description.into(),
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建带来源的服务器启动错误
    pub fn server_start_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::ServerStart {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建取消错误
    #[must_use]
    pub const fn cancelled(stage: CallbackStage) -> Self {
        Self::Cancelled { stage }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for CallbackError {
    fn from(err: std::io::Error) -> Self {
        Self::config_with_source("文件操作失败", err)
    }
}

impl From<toml::de::Error> for CallbackError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}
