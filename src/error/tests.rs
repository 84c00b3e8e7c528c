//! # 错误处理测试

use crate::callback::CallbackStage;
use crate::error::{BadRequestReason, CallbackError, ErrorCategory, INVALID_STATE_MESSAGE, OAuthError};
use axum::http::StatusCode;
use rstest::rstest;
use std::error::Error;

#[test]
fn test_bad_request_macro() {
    let err = crate::bad_request!(MissingCode, "missing authorization code");
    assert_eq!(err.bad_request_reason(), Some(BadRequestReason::MissingCode));
    assert_eq!(err.to_string(), "请求错误: missing authorization code");
}

#[test]
fn test_bad_request_macro_with_format() {
    let name = "unknownx";
    let err = crate::bad_request!(UnsupportedProvider, "unsupported provider: {}", name);
    assert_eq!(err.public_message(), "unsupported provider: unknownx");
}

#[test]
fn test_internal_error_keeps_cause_out_of_message() {
    let cause = OAuthError::TokenExchange("github: invalid_grant".to_string());
    let err = CallbackError::internal_with_source("token exchange failed", cause);

    assert_eq!(err.public_message(), "token exchange failed");
    assert!(err.source().unwrap().to_string().contains("invalid_grant"));
}

#[test]
fn test_invalid_state_message_is_generic() {
    let err = CallbackError::invalid_state(anyhow::anyhow!("InvalidSignature"));
    assert_eq!(err.public_message(), INVALID_STATE_MESSAGE);
    assert!(!err.to_string().contains("InvalidSignature"));
}

#[test]
fn test_provider_denied_message() {
    let err = CallbackError::provider_denied("access_denied", "User denied");
    assert_eq!(err.public_message(), "access_denied: User denied");

    let err = CallbackError::provider_denied("access_denied", "");
    assert_eq!(err.public_message(), "access_denied");
}

#[rstest]
#[case::bad_request(
    CallbackError::bad_request(BadRequestReason::MissingState, "x"),
    StatusCode::BAD_REQUEST,
    "BAD_REQUEST"
)]
#[case::invalid_state(
    CallbackError::invalid_state(anyhow::anyhow!("x")),
    StatusCode::BAD_REQUEST,
    "INVALID_STATE"
)]
#[case::provider_denied(
    CallbackError::provider_denied("access_denied", ""),
    StatusCode::BAD_REQUEST,
    "PROVIDER_DENIED"
)]
#[case::internal(
    CallbackError::internal_with_source("profile fetch failed", anyhow::anyhow!("502")),
    StatusCode::INTERNAL_SERVER_ERROR,
    "INTERNAL_ERROR"
)]
#[case::config(
    CallbackError::config("bad"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "CONFIG_ERROR"
)]
#[case::cancelled(
    CallbackError::cancelled(CallbackStage::TokenExchanged),
    StatusCode::REQUEST_TIMEOUT,
    "REQUEST_CANCELLED"
)]
fn test_http_mapping(
    #[case] err: CallbackError,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    assert_eq!(err.to_http_response_parts(), (status, code));
}

#[test]
fn test_categories() {
    assert_eq!(
        CallbackError::provider_denied("access_denied", "").category(),
        ErrorCategory::Client
    );
    assert_eq!(
        CallbackError::internal_with_source("token exchange failed", anyhow::anyhow!("x")).category(),
        ErrorCategory::Server
    );
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err: CallbackError = io_err.into();

    assert!(matches!(err, CallbackError::Config { .. }));
    assert!(err.to_string().contains("配置错误: 文件操作失败"));
}

#[test]
fn test_auto_conversion_from_toml_error() {
    let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
    let err: CallbackError = toml_err.into();

    assert!(matches!(err, CallbackError::Config { .. }));
    assert!(err.to_string().contains("配置错误: TOML解析失败"));
}

#[test]
fn test_cancelled_names_stage() {
    let err = CallbackError::cancelled(CallbackStage::ProviderResolved);
    assert_eq!(err.to_string(), "请求已取消: provider_resolved");
}
