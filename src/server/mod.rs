//! # HTTP 服务
//!
//! Axum 路由：`/callback`、`/authorize`、`/health`

pub mod handlers;
pub mod response;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::callback::{AccountLinker, CallbackOrchestrator, SummaryLinker};
use crate::config::AppConfig;
use crate::error::{CallbackError, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::provider::ProviderRegistry;
use crate::state::StateCodec;

/// 服务共享状态；除取消令牌外全部只读
#[derive(Clone)]
pub struct AppState {
    pub(crate) codec: Arc<StateCodec>,
    pub(crate) orchestrator: CallbackOrchestrator,
    pub(crate) linker: Arc<dyn AccountLinker>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) public_url: Option<String>,
}

impl AppState {
    /// 组装共享状态
    #[must_use]
    pub fn new(
        codec: StateCodec,
        registry: ProviderRegistry,
        linker: Arc<dyn AccountLinker>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            codec: Arc::new(codec),
            orchestrator: CallbackOrchestrator::new(Arc::new(registry)),
            linker,
            shutdown,
            public_url: None,
        }
    }

    /// 从配置构建：注册表与 codec 启动后不再变化
    pub fn from_config(config: &AppConfig, shutdown: CancellationToken) -> Result<Self> {
        let registry = ProviderRegistry::from_config(config)?;
        let codec = StateCodec::new(&config.state);
        Ok(Self::new(codec, registry, Arc::new(SummaryLinker), shutdown)
            .with_public_url(config.server.public_url.clone()))
    }

    /// 设置对外访问地址
    #[must_use]
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    /// state 编解码器
    #[must_use]
    pub fn codec(&self) -> &StateCodec {
        &self.codec
    }
}

/// 创建路由器
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/callback", get(handlers::callback))
        .route("/authorize", get(handlers::authorize))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// 启动服务器，直到 `shutdown` 被取消
pub async fn run_server(config: &AppConfig, shutdown: CancellationToken) -> Result<()> {
    let state = AppState::from_config(config, shutdown.clone())?;
    let providers = state.orchestrator.registry().names().join(",");
    let app = create_routes(state);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await.map_err(|e| {
        CallbackError::server_start_with_source(format!("无法监听 {bind_address}"), e)
    })?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Server,
        "server_start",
        &format!("Starting callback server on {bind_address}"),
        providers = providers.as_str()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| CallbackError::server_start_with_source("服务运行失败", e))?;

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Server,
        "server_stopped",
        "Callback server stopped"
    );
    Ok(())
}
