//! State token module
//!
//! - `claims`：state 中携带的流程信息
//! - `codec`：HS256 签名与校验
//! - `loader`：回调时加载 state 上下文（含旧流程旁路）

mod claims;
mod codec;
mod loader;

pub use claims::StateClaims;
pub use codec::StateCodec;
pub use loader::{LEGACY_STATELESS_PROVIDER, StateContext, StateVerification, load_oauth_state};
