//! # 测试框架模块
//!
//! 提供 Mock 提供商与常用测试夹具

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
