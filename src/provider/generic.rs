//! # 通用 OAuth2 提供商
//!
//! 基于 `oauth2` 完成授权地址构建与授权码交换，基于 `reqwest` 拉取用户资料，
//! 资料字段通过 [`ProfileMapping`] 映射。

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenUrl,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::fmt;
use std::time::Duration;
use url::Url;

use super::profile::map_profile;
use super::traits::OAuthProvider;
use super::types::{OAuthToken, UserProvidedData};
use crate::config::{ProfileMapping, ProviderConfig};
use crate::error::{OAuthError, OAuthResult};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// 错误响应体写入错误信息时的最大长度
const MAX_ERROR_BODY: usize = 256;

/// 通用 OAuth2 提供商
pub struct GenericOAuthProvider {
    name: String,
    client: ConfiguredClient,
    http_client: reqwest::Client,
    userinfo_url: Url,
    scopes: Vec<String>,
    profile: ProfileMapping,
}

impl GenericOAuthProvider {
    /// 从配置创建提供商
    pub fn from_config(name: &str, config: &ProviderConfig) -> OAuthResult<Self> {
        let auth_url = AuthUrl::new(config.authorize_url.clone())
            .map_err(|e| OAuthError::Config(format!("无效的授权URL: {e}")))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| OAuthError::Config(format!("无效的令牌URL: {e}")))?;
        let userinfo_url = Url::parse(&config.userinfo_url)
            .map_err(|e| OAuthError::Config(format!("无效的用户资料URL: {e}")))?;

        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        if let Some(secret) = &config.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.clone()));
        }

        if let Some(redirect_uri) = &config.redirect_uri {
            let redirect_url = RedirectUrl::new(redirect_uri.clone())
                .map_err(|e| OAuthError::Config(format!("无效的回调URL: {e}")))?;
            client = client.set_redirect_uri(redirect_url);
        }

        // 授权码交换不应跟随重定向
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        ldebug!(
            "system",
            LogStage::Startup,
            LogComponent::Provider,
            "provider_init",
            "OAuth 提供商初始化完成",
            provider = name,
            scopes = ?config.scopes,
            timeout_seconds = config.timeout_seconds
        );

        Ok(Self {
            name: name.to_string(),
            client,
            http_client,
            userinfo_url,
            scopes: config.scopes.clone(),
            profile: config.profile.clone(),
        })
    }
}

impl fmt::Debug for GenericOAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericOAuthProvider")
            .field("name", &self.name)
            .field("userinfo_url", &self.userinfo_url.as_str())
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl OAuthProvider for GenericOAuthProvider {
    async fn get_oauth_token(&self, code: &str) -> OAuthResult<OAuthToken> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("{}: {e}", self.name)))?;

        // 统一转换为透传结构
        serde_json::to_value(&response)
            .and_then(serde_json::from_value::<OAuthToken>)
            .map_err(|e| OAuthError::InvalidResponse(format!("令牌响应解析失败: {e}")))
    }

    async fn get_user_data(&self, token: &OAuthToken) -> OAuthResult<UserProvidedData> {
        let response = self
            .http_client
            .get(self.userinfo_url.clone())
            .bearer_auth(&token.access_token)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("oauth-callback/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| OAuthError::UserData(format!("{}: 请求失败: {e}", self.name)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::UserData(format!(
                "{} ({status}): {}",
                self.name,
                truncate(&body)
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(format!("用户资料解析失败: {e}")))?;

        Ok(map_profile(&self.profile, &body))
    }

    fn authorization_url(&self, state: &str) -> OAuthResult<Url> {
        let (url, _csrf) = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .url();
        Ok(url)
    }
}
