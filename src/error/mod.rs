//! The unified error handling system for the callback service.

// 1. Core Types
pub use oauth::{OAuthError, OAuthResult};
pub use types::{BadRequestReason, CallbackError, INVALID_STATE_MESSAGE};

/// A unified `Result` type for the entire service.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, CallbackError>;

// 2. Module declarations
pub mod macros;
pub mod oauth;
pub mod types;

// 3. Error Category for monitoring and alerting.
/// 错误归属，用于日志级别与告警
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the client (e.g., bad input, forged state, provider denial).
    /// Corresponds to 4xx HTTP status codes.
    Client,
    /// Errors caused by the server or its dependencies.
    /// Corresponds to 5xx HTTP status codes.
    Server,
}

#[cfg(test)]
mod tests;
