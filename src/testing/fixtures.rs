//! # 测试夹具

use crate::config::StateConfig;
use crate::state::StateCodec;

/// 测试用 state 签名密钥
pub const TEST_STATE_SECRET: &str = "test-state-secret-0123456789abcdef";

/// 使用默认签发者/受众的测试 codec
#[must_use]
pub fn test_codec() -> StateCodec {
    StateCodec::new(&StateConfig::with_secret(TEST_STATE_SECRET))
}

/// 为提供商签发有效 state
#[must_use]
pub fn signed_state(codec: &StateCodec, provider: &str) -> String {
    codec
        .encode(&codec.claims_for(provider))
        .expect("state signing should not fail in tests")
}
