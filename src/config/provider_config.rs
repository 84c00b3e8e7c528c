//! # 提供商配置

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CallbackError, Result};
use crate::provider::ProviderKind;

/// 单个第三方提供商的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 认证机制
    #[serde(default)]
    pub kind: ProviderKind,
    /// 是否启用；未启用的提供商不会进入注册表
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 客户端 ID
    #[serde(default)]
    pub client_id: String,
    /// 客户端密钥
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// 授权页地址
    #[serde(default)]
    pub authorize_url: String,
    /// 令牌接口
    #[serde(default)]
    pub token_url: String,
    /// 用户资料接口
    #[serde(default)]
    pub userinfo_url: String,
    /// 回调地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    /// 申请的权限范围
    #[serde(default)]
    pub scopes: Vec<String>,
    /// 单次提供商 HTTP 调用的超时（秒）
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// 资料字段映射
    #[serde(default)]
    pub profile: ProfileMapping,
}

const fn default_enabled() -> bool {
    true
}

const fn default_timeout() -> u64 {
    10
}

/// 提供商资料 JSON 到统一资料结构的字段映射。
///
/// 取值为以 `.` 分隔的路径，例如 `data.attributes.email`。未配置的字段沿用默认路径。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMapping {
    /// 用户唯一标识
    pub id: String,
    /// 邮箱
    pub email: String,
    /// 邮箱是否已验证
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<String>,
    /// 显示名
    pub name: String,
    /// 头像地址
    pub avatar_url: String,
}

impl Default for ProfileMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            email: "email".to_string(),
            email_verified: Some("email_verified".to_string()),
            name: "name".to_string(),
            avatar_url: "avatar_url".to_string(),
        }
    }
}

impl ProviderConfig {
    /// 构造一个最小的 OAuth2 提供商配置
    pub fn oauth2(
        client_id: impl Into<String>,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        Self {
            kind: ProviderKind::OAuth2,
            enabled: true,
            client_id: client_id.into(),
            client_secret: None,
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            userinfo_url: userinfo_url.into(),
            redirect_uri: None,
            scopes: Vec::new(),
            timeout_seconds: default_timeout(),
            profile: ProfileMapping::default(),
        }
    }

    /// 校验提供商配置
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.enabled || self.kind != ProviderKind::OAuth2 {
            return Ok(());
        }

        crate::ensure_config!(
            !self.client_id.trim().is_empty(),
            "提供商 {} 缺少 client_id",
            name
        );
        crate::ensure_config!(self.timeout_seconds > 0, "提供商 {} 的超时必须大于0", name);

        for (field, value) in [
            ("authorize_url", Some(self.authorize_url.as_str())),
            ("token_url", Some(self.token_url.as_str())),
            ("userinfo_url", Some(self.userinfo_url.as_str())),
            ("redirect_uri", self.redirect_uri.as_deref()),
        ] {
            let Some(value) = value else {
                continue;
            };
            Url::parse(value).map_err(|e| {
                CallbackError::config_with_source(format!("提供商 {name} 的 {field} 无效: {value}"), e)
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> ProviderConfig {
        ProviderConfig::oauth2(
            "client",
            "https://github.com/login/oauth/authorize",
            "https://github.com/login/oauth/access_token",
            "https://api.github.com/user",
        )
    }

    #[test]
    fn valid_oauth2_provider_passes() {
        assert!(github().validate("github").is_ok());
    }

    #[test]
    fn missing_client_id_is_rejected() {
        let mut config = github();
        config.client_id = "  ".to_string();
        let err = config.validate("github").unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn relative_url_is_rejected() {
        let mut config = github();
        config.token_url = "/oauth/token".to_string();
        let err = config.validate("github").unwrap_err();
        assert!(matches!(err, CallbackError::Config { .. }));
        assert!(err.to_string().contains("token_url"));
    }

    #[test]
    fn partial_profile_mapping_keeps_default_paths() {
        let config: ProviderConfig = toml::from_str(
            r#"
client_id = "tw-client"
authorize_url = "https://twitter.com/i/oauth2/authorize"
token_url = "https://api.twitter.com/2/oauth2/token"
userinfo_url = "https://api.twitter.com/2/users/me"

[profile]
email = "data.email"
name = "data.name"
"#,
        )
        .unwrap();

        let defaults = ProfileMapping::default();
        assert_eq!(config.profile.email, "data.email");
        assert_eq!(config.profile.name, "data.name");
        assert_eq!(config.profile.id, defaults.id);
        assert_eq!(config.profile.avatar_url, defaults.avatar_url);
        assert_eq!(config.profile.email_verified, defaults.email_verified);
    }

    #[test]
    fn saml_and_disabled_providers_skip_oauth_checks() {
        let mut saml = github();
        saml.kind = ProviderKind::Saml;
        saml.client_id = String::new();
        assert!(saml.validate("corp").is_ok());

        let mut disabled = github();
        disabled.enabled = false;
        disabled.token_url = "nope".to_string();
        assert!(disabled.validate("github").is_ok());
    }
}
