//! # OAuth Callback 主程序

use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use oauth_callback::{
    Result,
    config::ConfigManager,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    server,
};

/// 第三方登录回调服务
#[derive(Debug, Parser)]
#[command(name = "oauth-callback", version, about)]
struct Cli {
    /// 配置文件路径，缺省时读取 `OAUTH_CALLBACK_CONFIG_PATH` 或 `config/config.{RUST_ENV}.toml`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match ConfigManager::new(cli.config.as_deref()) {
        Ok(manager) => manager,
        Err(e) => {
            logging::init_optimized_logging(None);
            e.log("system");
            return Err(e);
        }
    };
    let config = manager.config();

    // 初始化日志系统
    logging::init_optimized_logging(Some(&config.logging.level));
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动",
        config_path = ?manager.source()
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_shutdown_signal(shutdown.clone()));

    if let Err(e) = server::run_server(&config, shutdown).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "service_start_failed",
            &format!("服务启动失败: {e:?}")
        );
        return Err(e);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

/// Ctrl-C / SIGTERM 时取消全局令牌，进行中的回调随之中止
async fn wait_for_shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            lerror!(
                "system",
                LogStage::Shutdown,
                LogComponent::Main,
                "signal_listen_failed",
                &format!("无法监听 Ctrl-C: {e}")
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                lerror!(
                    "system",
                    LogStage::Shutdown,
                    LogComponent::Main,
                    "signal_listen_failed",
                    &format!("无法监听 SIGTERM: {e}")
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "shutdown_requested",
        "收到退出信号，开始关闭"
    );
    shutdown.cancel();
}
