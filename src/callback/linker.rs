//! Hand-off point to the account layer.
//!
//! User storage and linking policy live outside this service. The default
//! [`SummaryLinker`] only reports what was verified.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::result::OAuthProviderData;
use crate::error::Result;
use crate::state::StateContext;

/// 账号关联层接口
#[async_trait]
pub trait AccountLinker: Send + Sync {
    /// 接收一次成功回调的结果
    async fn link(&self, context: &StateContext, data: OAuthProviderData) -> Result<LinkSummary>;
}

/// Provider-neutral description of a verified login. Never carries the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    /// 完成登录的提供商
    pub provider: String,
    /// 主邮箱
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 提供商是否已验证该邮箱
    pub email_verified: bool,
    /// 显示名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 头像地址
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 登录后的跳转目标
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// 邀请注册流程的邀请令牌
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
}

/// 默认实现：只生成摘要，不做任何持久化
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryLinker;

#[async_trait]
impl AccountLinker for SummaryLinker {
    async fn link(&self, context: &StateContext, data: OAuthProviderData) -> Result<LinkSummary> {
        let (user_data, _token) = data.into_parts();
        let primary = user_data.primary_email();

        Ok(LinkSummary {
            provider: context.provider().to_string(),
            email: primary.map(|e| e.email.clone()),
            email_verified: primary.is_some_and(|e| e.verified),
            name: user_data.metadata.name.clone(),
            avatar_url: user_data.metadata.avatar_url.clone(),
            referrer: context.referrer().map(str::to_string),
            invite_token: context.invite_token().map(str::to_string),
        })
    }
}
