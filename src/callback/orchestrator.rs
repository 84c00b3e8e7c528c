//! # 回调编排
//!
//! 单个回调请求按固定顺序推进：
//! `Start → ErrorChecked → CodeValidated → ProviderResolved → TokenExchanged → ProfileFetched → Done`，
//! 任一阶段失败即终止，不重试，不回退。

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::query::CallbackQuery;
use super::result::OAuthProviderData;
use crate::bad_request;
use crate::error::{BadRequestReason, CallbackError, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};
use crate::provider::ProviderRegistry;

/// 回调状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallbackStage {
    /// 尚未开始
    Start,
    /// 已确认提供商未返回错误
    ErrorChecked,
    /// 授权码存在
    CodeValidated,
    /// 提供商已解析
    ProviderResolved,
    /// 授权码已换取令牌
    TokenExchanged,
    /// 用户资料已获取
    ProfileFetched,
    /// 结果已生成
    Done,
}

impl CallbackStage {
    /// 日志中使用的阶段名
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ErrorChecked => "error_checked",
            Self::CodeValidated => "code_validated",
            Self::ProviderResolved => "provider_resolved",
            Self::TokenExchanged => "token_exchanged",
            Self::ProfileFetched => "profile_fetched",
            Self::Done => "done",
        }
    }

    const fn log_stage(self) -> LogStage {
        match self {
            Self::Start | Self::ErrorChecked => LogStage::ErrorCheck,
            Self::CodeValidated => LogStage::CodeValidation,
            Self::ProviderResolved => LogStage::ProviderResolve,
            Self::TokenExchanged => LogStage::TokenExchange,
            Self::ProfileFetched | Self::Done => LogStage::ProfileFetch,
        }
    }
}

impl fmt::Display for CallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one callback from the raw query to [`OAuthProviderData`].
#[derive(Debug, Clone)]
pub struct CallbackOrchestrator {
    registry: Arc<ProviderRegistry>,
}

impl CallbackOrchestrator {
    /// 基于只读注册表创建
    #[must_use]
    pub const fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// 共享的提供商注册表
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Runs the callback state machine for `provider_name`.
    ///
    /// `provider_name` must come from a verified state context. Provider calls
    /// race against `cancel`; once it fires no later stage runs and the error
    /// records the last stage reached.
    pub async fn handle_callback(
        &self,
        request_id: &str,
        query: &CallbackQuery,
        provider_name: &str,
        cancel: &CancellationToken,
    ) -> Result<OAuthProviderData> {
        check_provider_error(query)?;
        transition(request_id, CallbackStage::ErrorChecked, provider_name);

        let code = query
            .code()
            .ok_or_else(|| bad_request!(MissingCode, "missing authorization code"))?;
        transition(request_id, CallbackStage::CodeValidated, provider_name);

        let provider = self.registry.resolve(provider_name, "").map_err(|e| {
            CallbackError::bad_request_with_source(
                BadRequestReason::UnsupportedProvider,
                format!("unsupported provider: {provider_name}"),
                e,
            )
        })?;
        transition(request_id, CallbackStage::ProviderResolved, provider_name);

        let token = cancellable(
            cancel,
            CallbackStage::ProviderResolved,
            || provider.get_oauth_token(code),
        )
        .await?
        .map_err(|e| CallbackError::internal_with_source("token exchange failed", e))?;
        transition(request_id, CallbackStage::TokenExchanged, provider_name);

        let user_data = cancellable(
            cancel,
            CallbackStage::TokenExchanged,
            || provider.get_user_data(&token),
        )
        .await?
        .map_err(|e| CallbackError::internal_with_source("profile fetch failed", e))?;
        transition(request_id, CallbackStage::ProfileFetched, provider_name);

        let data = OAuthProviderData::new(user_data, token);
        transition(request_id, CallbackStage::Done, provider_name);
        Ok(data)
    }
}

/// Fails with `ProviderDenied` when the provider reported an error.
///
/// Runs before every other check, including state loading, so a denied flow
/// is never classified as anything else.
pub fn check_provider_error(query: &CallbackQuery) -> Result<()> {
    match query.error() {
        Some(error_code) => Err(CallbackError::provider_denied(
            error_code,
            query.error_description(),
        )),
        None => Ok(()),
    }
}

fn transition(request_id: &str, stage: CallbackStage, provider: &str) {
    ldebug!(
        request_id,
        stage.log_stage(),
        LogComponent::Callback,
        "stage_transition",
        "回调阶段推进",
        callback_stage = stage.as_str(),
        provider = provider
    );
}

/// 已取消时不发起调用；调用期间取消优先
async fn cancellable<T, F>(
    cancel: &CancellationToken,
    stage: CallbackStage,
    call: impl FnOnce() -> F,
) -> Result<T>
where
    F: Future<Output = T>,
{
    if cancel.is_cancelled() {
        return Err(CallbackError::cancelled(stage));
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CallbackError::cancelled(stage)),
        out = call() => Ok(out),
    }
}
