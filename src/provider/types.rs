use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 提供商使用的认证机制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OAuth2 授权码流程
    #[default]
    #[serde(alias = "oauth")]
    OAuth2,
    /// SAML
    Saml,
}

impl ProviderKind {
    /// 配置中使用的名称
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OAuth2 => "oauth2",
            Self::Saml => "saml",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential returned by a provider after code exchange.
///
/// Only `access_token` is interpreted here; the other fields are passed
/// through untouched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// 访问令牌
    pub access_token: String,
    /// 令牌类型
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// 刷新令牌
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 有效期（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// 实际授予的权限范围
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl OAuthToken {
    /// 只含访问令牌的 Bearer 令牌
    pub fn bearer<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expires_in: None,
            scope: None,
        }
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// 提供商返回的邮箱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEmail {
    /// 邮箱地址
    pub email: String,
    /// 是否已验证
    pub verified: bool,
    /// 是否为主邮箱
    pub primary: bool,
}

/// 提供商返回的身份资料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// 提供商侧的用户 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// 显示名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 头像地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 未映射的原始字段
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// Provider-neutral profile produced by a provider implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProvidedData {
    /// 邮箱列表
    #[serde(default)]
    pub emails: Vec<ProviderEmail>,
    /// 身份资料
    #[serde(default)]
    pub metadata: ProviderMetadata,
}

impl UserProvidedData {
    /// 只有一个邮箱的资料
    pub fn with_email<S: Into<String>>(email: S, verified: bool) -> Self {
        Self {
            emails: vec![ProviderEmail {
                email: email.into(),
                verified,
                primary: true,
            }],
            metadata: ProviderMetadata::default(),
        }
    }

    /// 主邮箱；没有标记为主邮箱时取第一个
    #[must_use]
    pub fn primary_email(&self) -> Option<&ProviderEmail> {
        self.emails
            .iter()
            .find(|e| e.primary)
            .or_else(|| self.emails.first())
    }
}
