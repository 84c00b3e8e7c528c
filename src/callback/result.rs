use std::fmt;

use crate::provider::{OAuthToken, UserProvidedData};

/// Verified outcome of a callback: the provider profile plus the token that fetched it.
///
/// Built once by the orchestrator and never mutated afterwards.
#[derive(Clone, PartialEq)]
pub struct OAuthProviderData {
    user_data: UserProvidedData,
    token: OAuthToken,
}

impl OAuthProviderData {
    /// 组合资料与令牌
    #[must_use]
    pub const fn new(user_data: UserProvidedData, token: OAuthToken) -> Self {
        Self { user_data, token }
    }

    /// 提供商资料
    #[must_use]
    pub const fn user_data(&self) -> &UserProvidedData {
        &self.user_data
    }

    /// 原始访问令牌
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token.access_token
    }

    /// 交给账号关联层
    #[must_use]
    pub fn into_parts(self) -> (UserProvidedData, OAuthToken) {
        (self.user_data, self.token)
    }
}

impl fmt::Debug for OAuthProviderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthProviderData")
            .field("user_data", &self.user_data)
            .field("token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let data = OAuthProviderData::new(
            UserProvidedData::with_email("a@b.com", true),
            OAuthToken::bearer("tok1"),
        );

        let rendered = format!("{data:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("tok1"));
    }

    #[test]
    fn into_parts_hands_over_profile_and_token() {
        let data = OAuthProviderData::new(
            UserProvidedData::with_email("a@b.com", false),
            OAuthToken::bearer("tok1"),
        );
        assert_eq!(data.token(), "tok1");

        let (user_data, token) = data.into_parts();
        assert_eq!(user_data.primary_email().unwrap().email, "a@b.com");
        assert_eq!(token.access_token, "tok1");
    }
}
