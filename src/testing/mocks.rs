//! # 测试 Mock 对象

use async_trait::async_trait;
use mockall::mock;
use url::Url;

use crate::error::OAuthResult;
use crate::provider::{OAuthProvider, OAuthToken, UserProvidedData};

// Mock OAuth 提供商，可用 `times(0)` 断言未被调用
mock! {
    pub Provider {}

    #[async_trait]
    impl OAuthProvider for Provider {
        async fn get_oauth_token(&self, code: &str) -> OAuthResult<OAuthToken>;
        async fn get_user_data(&self, token: &OAuthToken) -> OAuthResult<UserProvidedData>;
        fn authorization_url(&self, state: &str) -> OAuthResult<Url>;
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").finish_non_exhaustive()
    }
}
