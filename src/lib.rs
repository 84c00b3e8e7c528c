//! # OAuth Callback Service Library
//!
//! 第三方登录回调核心：校验 state、解析提供商、交换授权码并拉取用户资料。

pub mod callback;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod server;
pub mod state;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use callback::{CallbackOrchestrator, CallbackQuery, OAuthProviderData};
pub use config::AppConfig;
pub use error::{CallbackError, Result};
pub use provider::{OAuthProvider, ProviderRegistry};
pub use state::{StateCodec, load_oauth_state};
