//! Callback module
//!
//! 回调请求参数、编排状态机、结果模型以及账号关联接口。

mod linker;
mod orchestrator;
mod query;
mod result;

pub use linker::{AccountLinker, LinkSummary, SummaryLinker};
pub use orchestrator::{CallbackOrchestrator, CallbackStage, check_provider_error};
pub use query::CallbackQuery;
pub use result::OAuthProviderData;
