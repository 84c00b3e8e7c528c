use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload signed into the `state` parameter before redirecting to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateClaims {
    /// 发起流程的提供商名称
    pub provider: String,
    /// 流程结束后的跳转目标
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// 邀请注册流程携带的邀请令牌
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
    /// 签发时间（Unix 秒）
    pub iat: i64,
    /// 过期时间（Unix 秒）
    pub exp: i64,
    /// 每次签发唯一
    pub jti: String,
}

impl StateClaims {
    /// 为提供商创建 claims；签发者与受众由编码器在签名时写入
    pub fn for_provider<S: Into<String>>(provider: S, ttl_seconds: u64) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        Self {
            provider: provider.into(),
            referrer: None,
            invite_token: None,
            iss: String::new(),
            aud: String::new(),
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 附带流程结束后的跳转目标
    #[must_use]
    pub fn with_referrer<S: Into<String>>(mut self, referrer: S) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// 附带邀请令牌
    #[must_use]
    pub fn with_invite_token<S: Into<String>>(mut self, invite_token: S) -> Self {
        self.invite_token = Some(invite_token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_claims_expire_after_ttl() {
        let claims = StateClaims::for_provider("github", 600);
        assert_eq!(claims.exp - claims.iat, 600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn each_claim_set_has_unique_id() {
        let a = StateClaims::for_provider("github", 600);
        let b = StateClaims::for_provider("github", 600);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn builders_attach_flow_metadata() {
        let claims = StateClaims::for_provider("google", 60)
            .with_referrer("https://app.example.com/welcome")
            .with_invite_token("inv-1");
        assert_eq!(claims.referrer.as_deref(), Some("https://app.example.com/welcome"));
        assert_eq!(claims.invite_token.as_deref(), Some("inv-1"));
    }
}
