//! Loading the callback state context.
//!
//! The legacy stateless flow is selected here, in one place, before any
//! inspection of the `state` parameter.

use super::claims::StateClaims;
use super::codec::StateCodec;
use crate::bad_request;
use crate::callback::CallbackQuery;
use crate::error::Result;

/// Provider whose callbacks skip state verification.
///
/// Kept for compatibility with an older flow that never round-tripped a
/// signed state. Callbacks on this path are not bound to a session.
pub const LEGACY_STATELESS_PROVIDER: &str = "twitter";

/// 回调是否需要校验 state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateVerification {
    /// 必须携带并通过签名校验
    Required,
    /// 旧流程，跳过校验
    LegacyBypass,
}

impl StateVerification {
    /// 依据查询参数中的 `provider` 决定校验方式
    #[must_use]
    pub fn for_provider_param(provider: Option<&str>) -> Self {
        match provider {
            Some(LEGACY_STATELESS_PROVIDER) => Self::LegacyBypass,
            _ => Self::Required,
        }
    }
}

/// Verified context of one callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateContext {
    /// state 签名校验通过
    Signed { claims: StateClaims },
    /// 旧流程，未校验 state
    LegacyUnsigned { provider: String },
}

impl StateContext {
    /// 需要解析的提供商名称
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::Signed { claims } => &claims.provider,
            Self::LegacyUnsigned { provider } => provider,
        }
    }

    /// 流程结束后的跳转目标，仅签名 state 携带
    #[must_use]
    pub fn referrer(&self) -> Option<&str> {
        match self {
            Self::Signed { claims } => claims.referrer.as_deref(),
            Self::LegacyUnsigned { .. } => None,
        }
    }

    /// 邀请令牌，仅签名 state 携带
    #[must_use]
    pub fn invite_token(&self) -> Option<&str> {
        match self {
            Self::Signed { claims } => claims.invite_token.as_deref(),
            Self::LegacyUnsigned { .. } => None,
        }
    }

    /// 本次回调采用的校验方式
    #[must_use]
    pub const fn verification(&self) -> StateVerification {
        match self {
            Self::Signed { .. } => StateVerification::Required,
            Self::LegacyUnsigned { .. } => StateVerification::LegacyBypass,
        }
    }
}

/// Produce the state context for a callback request.
pub fn load_oauth_state(codec: &StateCodec, query: &CallbackQuery) -> Result<StateContext> {
    match StateVerification::for_provider_param(query.provider()) {
        StateVerification::LegacyBypass => Ok(StateContext::LegacyUnsigned {
            provider: LEGACY_STATELESS_PROVIDER.to_string(),
        }),
        StateVerification::Required => {
            let state = query
                .state()
                .ok_or_else(|| bad_request!(MissingState, "OAuth state parameter missing"))?;
            let claims = codec.decode(state)?;
            Ok(StateContext::Signed { claims })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BadRequestReason, CallbackError};
    use crate::testing::{signed_state, test_codec};
    use rstest::rstest;

    fn query(provider: Option<&str>, state: Option<&str>) -> CallbackQuery {
        CallbackQuery {
            provider: provider.map(str::to_string),
            state: state.map(str::to_string),
            ..CallbackQuery::default()
        }
    }

    #[test]
    fn signed_state_yields_claims_provider() {
        let codec = test_codec();
        let token = signed_state(&codec, "github");

        let context = load_oauth_state(&codec, &query(Some("github"), Some(&token))).unwrap();

        assert_eq!(context.provider(), "github");
        assert_eq!(context.verification(), StateVerification::Required);
    }

    #[test]
    fn signed_context_exposes_flow_metadata() {
        let codec = test_codec();
        let token = codec
            .encode(
                &codec
                    .claims_for("github")
                    .with_referrer("/welcome")
                    .with_invite_token("inv-7"),
            )
            .unwrap();

        let context = load_oauth_state(&codec, &query(None, Some(&token))).unwrap();

        assert_eq!(context.referrer(), Some("/welcome"));
        assert_eq!(context.invite_token(), Some("inv-7"));
    }

    #[test]
    fn provider_comes_from_claims_not_query() {
        let codec = test_codec();
        let token = signed_state(&codec, "google");

        let context = load_oauth_state(&codec, &query(Some("github"), Some(&token))).unwrap();

        assert_eq!(context.provider(), "google");
    }

    #[test]
    fn missing_state_is_bad_request() {
        let err = load_oauth_state(&test_codec(), &query(Some("github"), None)).unwrap_err();

        assert_eq!(err.bad_request_reason(), Some(BadRequestReason::MissingState));
        assert_eq!(err.public_message(), "OAuth state parameter missing");
    }

    #[test]
    fn tampered_state_is_invalid() {
        let err =
            load_oauth_state(&test_codec(), &query(Some("github"), Some("x.y.z"))).unwrap_err();
        assert!(matches!(err, CallbackError::InvalidState { .. }));
    }

    #[rstest]
    #[case::no_state(None)]
    #[case::empty_state(Some(""))]
    #[case::garbage_state(Some("garbage"))]
    fn legacy_provider_skips_state(#[case] state: Option<&str>) {
        let context =
            load_oauth_state(&test_codec(), &query(Some(LEGACY_STATELESS_PROVIDER), state))
                .unwrap();

        assert_eq!(
            context,
            StateContext::LegacyUnsigned {
                provider: "twitter".to_string()
            }
        );
        assert_eq!(context.referrer(), None);
        assert_eq!(context.invite_token(), None);
    }

    #[test]
    fn bypass_is_exact_match_only() {
        assert_eq!(
            StateVerification::for_provider_param(Some("Twitter")),
            StateVerification::Required
        );
        assert_eq!(StateVerification::for_provider_param(None), StateVerification::Required);
    }
}
