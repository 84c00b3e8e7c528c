//! # 错误处理宏

/// 快速创建请求错误的宏
#[macro_export]
macro_rules! bad_request {
    ($reason:ident, $msg:expr) => {
        $crate::error::CallbackError::bad_request(
            $crate::error::BadRequestReason::$reason,
            $msg,
        )
    };
    ($reason:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::CallbackError::bad_request(
            $crate::error::BadRequestReason::$reason,
            format!($fmt, $($arg)*),
        )
    };
}

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::CallbackError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::CallbackError::config(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}
