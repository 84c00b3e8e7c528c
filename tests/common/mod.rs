//! 集成测试公共工具

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use oauth_callback::config::ConfigManager;
use oauth_callback::server::{AppState, create_routes};
use serde_json::Value;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::MockServer;

/// 以 wiremock 服务充当 github / twitter 提供商的配置
pub fn config_toml(server: &MockServer) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = 9999
public_url = "https://id.example.com"

[state]
secret = "integration-state-secret-0123456789"

[providers.github]
client_id = "gh-client"
client_secret = "gh-secret"
authorize_url = "{uri}/login/oauth/authorize"
token_url = "{uri}/login/oauth/access_token"
userinfo_url = "{uri}/user"
redirect_uri = "https://id.example.com/callback"
scopes = ["read:user", "user:email"]

[providers.twitter]
client_id = "tw-client"
client_secret = "tw-secret"
authorize_url = "{uri}/oauth2/authorize"
token_url = "{uri}/oauth2/token"
userinfo_url = "{uri}/2/users/me"

[providers.twitter.profile]
id = "data.id"
email = "data.email"
name = "data.name"
avatar_url = "data.profile_image_url"

[providers.corp-sso]
kind = "saml"
"#,
        uri = server.uri()
    )
}

/// 构建应用状态与路由
pub fn app(server: &MockServer) -> (AppState, Router) {
    app_with_shutdown(server, CancellationToken::new())
}

/// 使用给定的关闭令牌构建应用状态与路由
pub fn app_with_shutdown(server: &MockServer, shutdown: CancellationToken) -> (AppState, Router) {
    let config = ConfigManager::from_toml_str(&config_toml(server), &HashMap::new())
        .unwrap()
        .config();
    let state = AppState::from_config(&config, shutdown).unwrap();
    let router = create_routes(state.clone());
    (state, router)
}

/// 为提供商签发有效 state
pub fn signed_state(state: &AppState, provider: &str) -> String {
    let codec = state.codec();
    codec.encode(&codec.claims_for(provider)).unwrap()
}

/// 发送 GET 请求
pub async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// 发送 GET 请求，返回状态码与 JSON 响应体
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = get(router, uri).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
