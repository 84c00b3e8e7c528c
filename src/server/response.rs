//! # API 响应结构
//!
//! 成功与失败统一使用 JSON 信封输出。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CallbackError;

/// # 标准成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    /// 固定为 `true`
    pub success: bool,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 附加说明
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// # 标准错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// 错误代码
    pub code: String,
    /// 可安全返回给调用方的文案
    pub message: String,
}

/// # 标准错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 固定为 `false`
    pub success: bool,
    /// 错误信息
    pub error: ErrorInfo,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// # 便捷函数：成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    success_with_message(data, "操作成功")
}

/// # 便捷函数：带消息的成功响应
pub fn success_with_message<T: Serialize>(data: T, message: &str) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}

/// # 便捷函数：HTTP错误响应
pub fn error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorInfo {
            code: code.to_string(),
            message: message.to_string(),
        },
        timestamp: Utc::now(),
    };
    (status, Json(body)).into_response()
}

/// # 便捷函数：应用错误响应
///
/// 只输出可公开的文案，内部原因不会进入响应体
pub fn app_error(err: &CallbackError) -> Response {
    let (status, code) = err.to_http_response_parts();
    error(status, code, &err.public_message())
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        app_error(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OAuthError;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_body_hides_cause() {
        let err = CallbackError::internal_with_source(
            "token exchange failed",
            OAuthError::TokenExchange("client_secret mismatch".to_string()),
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert!(!body.success);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "token exchange failed");
    }

    #[tokio::test]
    async fn success_envelope_wraps_data() {
        let response = success(serde_json::json!({ "status": "ok" }));
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SuccessResponse<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);
        assert_eq!(body.data.unwrap()["status"], "ok");
    }
}
