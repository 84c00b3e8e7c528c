//! Errors raised by provider lookup and the provider-side OAuth calls.
//!
//! These never reach the client directly: the callback layer classifies them
//! into a [`CallbackError`](super::CallbackError) and keeps them as the source.

use thiserror::Error;

use crate::provider::ProviderKind;

/// The primary error type for provider resolution and provider HTTP calls.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// 提供商未注册
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// 提供商不支持 OAuth
    #[error("Provider {name} can not be used for OAuth (kind: {kind})")]
    NotOAuthCapable { name: String, kind: ProviderKind },

    /// 授权码交换失败
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// 用户资料请求失败
    #[error("User data request failed: {0}")]
    UserData(String),

    /// 提供商响应无法解析
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    /// 提供商配置无效
    #[error("Provider configuration error: {0}")]
    Config(String),

    /// HTTP 传输错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// `OAuth` 结果类型别名
pub type OAuthResult<T> = Result<T, OAuthError>;
