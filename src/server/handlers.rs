//! # 回调服务处理器
//!
//! 解析请求并委托 state 加载、回调编排与账号关联执行业务逻辑。

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use super::AppState;
use super::response;
use crate::bad_request;
use crate::callback::{CallbackQuery, LinkSummary, check_provider_error};
use crate::error::{BadRequestReason, CallbackError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::state::load_oauth_state;
use crate::{ldebug, linfo};

/// 查询串无法解析时的统一错误，不透出 serde 的原始文案
fn malformed_query(rejection: QueryRejection) -> CallbackError {
    CallbackError::bad_request_with_source(
        BadRequestReason::MalformedQuery,
        "malformed query string",
        anyhow::anyhow!(rejection.body_text()),
    )
}

/// 处理提供商回调
pub async fn callback(
    State(state): State<AppState>,
    query: std::result::Result<Query<CallbackQuery>, QueryRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let result = match query {
        Ok(Query(query)) => run_callback(&state, &request_id, &query).await,
        Err(rejection) => Err(malformed_query(rejection)),
    };
    match result {
        Ok(summary) => {
            linfo!(
                &request_id,
                LogStage::AccountLink,
                LogComponent::Server,
                "callback_success",
                "第三方登录回调完成",
                provider = summary.provider.as_str()
            );
            response::success(summary)
        }
        Err(err) => {
            err.log(&request_id);
            response::app_error(&err)
        }
    }
}

async fn run_callback(
    state: &AppState,
    request_id: &str,
    query: &CallbackQuery,
) -> Result<LinkSummary> {
    // 提供商拒绝优先于 state 校验
    check_provider_error(query)?;
    let context = load_oauth_state(&state.codec, query)?;
    ldebug!(
        request_id,
        LogStage::StateValidation,
        LogComponent::State,
        "state_loaded",
        "state 上下文已加载",
        provider = context.provider(),
        verification = ?context.verification()
    );

    // 请求级取消令牌，服务关闭时一并取消
    let cancel = state.shutdown.child_token();
    let data = state
        .orchestrator
        .handle_callback(request_id, query, context.provider(), &cancel)
        .await?;

    state.linker.link(&context, data).await
}

/// `/authorize` 查询参数
#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    /// 目标提供商名称
    #[serde(default)]
    pub provider: Option<String>,
    /// 登录完成后的跳转地址
    #[serde(default)]
    pub redirect_to: Option<String>,
    /// 邀请注册流程的邀请令牌
    #[serde(default)]
    pub invite_token: Option<String>,
}

/// 签发 state 并重定向到提供商授权页
pub async fn authorize(
    State(state): State<AppState>,
    query: std::result::Result<Query<AuthorizeQuery>, QueryRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let result = match query {
        Ok(Query(query)) => build_authorize_redirect(&state, &request_id, &query),
        Err(rejection) => Err(malformed_query(rejection)),
    };
    match result {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(err) => {
            err.log(&request_id);
            response::app_error(&err)
        }
    }
}

fn build_authorize_redirect(
    state: &AppState,
    request_id: &str,
    query: &AuthorizeQuery,
) -> Result<String> {
    let name = query
        .provider
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad_request!(UnsupportedProvider, "provider parameter missing"))?;

    let provider = state
        .orchestrator
        .registry()
        .resolve(name, "")
        .map_err(|e| {
            CallbackError::bad_request_with_source(
                BadRequestReason::UnsupportedProvider,
                format!("unsupported provider: {name}"),
                e,
            )
        })?;

    let mut claims = state.codec.claims_for(name);
    if let Some(target) = query.redirect_to.as_deref() {
        if is_allowed_redirect(target, state.public_url.as_deref()) {
            claims = claims.with_referrer(target);
        } else {
            ldebug!(
                request_id,
                LogStage::Authorize,
                LogComponent::Server,
                "redirect_ignored",
                "忽略不受信任的跳转地址",
                provider = name
            );
        }
    }

    if let Some(invite_token) = query.invite_token.as_deref().filter(|t| !t.is_empty()) {
        claims = claims.with_invite_token(invite_token);
    }

    let signed = state.codec.encode(&claims)?;
    let url = provider
        .authorization_url(&signed)
        .map_err(|e| CallbackError::internal_with_source("authorization url failed", e))?;

    linfo!(
        request_id,
        LogStage::Authorize,
        LogComponent::Server,
        "authorize_redirect",
        "重定向到提供商授权页",
        provider = name
    );
    Ok(url.into())
}

/// 仅允许站内相对路径或对外地址下的跳转
///
/// 浏览器会把 `\` 当作 `/`，并丢弃制表与换行，这类字符一律拒绝。
fn is_allowed_redirect(target: &str, public_url: Option<&str>) -> bool {
    if target.contains('\\') || target.chars().any(char::is_control) {
        return false;
    }
    if let Some(path) = target.strip_prefix('/') {
        return !path.starts_with('/');
    }

    let Some(base) = public_url.and_then(|base| Url::parse(base).ok()) else {
        return false;
    };
    let Ok(target) = Url::parse(target) else {
        return false;
    };
    let base_path = base.path().trim_end_matches('/');
    target.origin() == base.origin()
        && (target.path() == base_path || target.path().starts_with(&format!("{base_path}/")))
}

/// 健康检查
pub async fn health(State(state): State<AppState>) -> Response {
    response::success(json!({
        "status": "ok",
        "providers": state.orchestrator.registry().names(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::relative("/welcome", None, true)]
    #[case::protocol_relative("//evil.example.com", None, false)]
    #[case::absolute_without_base("https://app.example.com/x", None, false)]
    #[case::same_origin("https://app.example.com/x", Some("https://app.example.com"), true)]
    #[case::prefix_trick("https://app.example.com.evil.io/x", Some("https://app.example.com"), false)]
    #[case::backslash_host("/\\evil.example.org/phish", Some("https://app.example.com"), false)]
    #[case::backslash_inside("/a\\b", None, false)]
    #[case::tab_host("/\t/evil.example.org", None, false)]
    #[case::userinfo_trick("https://app.example.com@evil.io/x", Some("https://app.example.com"), false)]
    #[case::base_path_prefix("https://app.example.com/application", Some("https://app.example.com/app"), false)]
    #[case::under_base_path("https://app.example.com/app/home", Some("https://app.example.com/app/"), true)]
    fn redirect_allow_list(
        #[case] target: &str,
        #[case] public_url: Option<&str>,
        #[case] allowed: bool,
    ) {
        assert_eq!(is_allowed_redirect(target, public_url), allowed);
    }
}
