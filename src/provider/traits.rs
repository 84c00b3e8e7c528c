use async_trait::async_trait;
use url::Url;

use super::types::{OAuthToken, UserProvidedData};
use crate::error::OAuthResult;

/// Capability set a provider must expose to take part in the OAuth callback.
///
/// Implementations own their HTTP clients; the callback layer calls each
/// method at most once per request and never retries.
#[async_trait]
pub trait OAuthProvider: Send + Sync + std::fmt::Debug {
    /// 用授权码换取访问令牌
    async fn get_oauth_token(&self, code: &str) -> OAuthResult<OAuthToken>;

    /// 用访问令牌获取用户资料
    async fn get_user_data(&self, token: &OAuthToken) -> OAuthResult<UserProvidedData>;

    /// 构建携带 state 的授权地址
    fn authorization_url(&self, state: &str) -> OAuthResult<Url>;
}
