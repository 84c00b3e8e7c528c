use serde::Deserialize;

/// Query parameters of the provider redirect back to `/callback`.
///
/// Every field is attacker-controlled. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackQuery {
    /// 提供商名称，仅用于选择旧流程
    #[serde(default)]
    pub provider: Option<String>,
    /// 签名 state
    #[serde(default)]
    pub state: Option<String>,
    /// 授权码
    #[serde(default)]
    pub code: Option<String>,
    /// 提供商返回的错误码
    #[serde(default)]
    pub error: Option<String>,
    /// 提供商返回的错误描述
    #[serde(default)]
    pub error_description: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl CallbackQuery {
    /// 非空的 `provider` 参数
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        non_empty(self.provider.as_ref())
    }

    /// 非空的 `state` 参数
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_ref())
    }

    /// 非空的授权码
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        non_empty(self.code.as_ref())
    }

    /// 非空的错误码
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        non_empty(self.error.as_ref())
    }

    /// 提供商给出的错误描述，缺失时为空串
    #[must_use]
    pub fn error_description(&self) -> &str {
        non_empty(self.error_description.as_ref()).unwrap_or_default()
    }
}
