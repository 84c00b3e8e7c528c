use std::collections::HashMap;
use std::sync::Arc;

use super::generic::GenericOAuthProvider;
use super::traits::OAuthProvider;
use super::types::ProviderKind;
use crate::config::AppConfig;
use crate::error::{OAuthError, OAuthResult, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

/// 注册表中的提供商条目
#[derive(Debug, Clone)]
pub enum RegisteredProvider {
    /// 支持授权码流程的提供商
    OAuth(Arc<dyn OAuthProvider>),
    /// 仅用于其它认证机制（例如 SAML）的提供商
    Saml { name: String },
}

impl RegisteredProvider {
    /// 认证机制
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::OAuth(_) => ProviderKind::OAuth2,
            Self::Saml { .. } => ProviderKind::Saml,
        }
    }

    /// 若具备 OAuth 能力则返回该能力
    #[must_use]
    pub fn as_oauth(&self) -> Option<Arc<dyn OAuthProvider>> {
        match self {
            Self::OAuth(provider) => Some(Arc::clone(provider)),
            Self::Saml { .. } => None,
        }
    }
}

/// Immutable name → provider mapping, built once at startup.
///
/// Shared behind an `Arc` and only ever read, so concurrent lookups need no locking.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, RegisteredProvider>,
}

impl ProviderRegistry {
    /// 创建构建器
    #[must_use]
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// 根据配置构建注册表；未启用的提供商直接跳过
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = Self::builder();
        for (name, provider_config) in &config.providers {
            if !provider_config.enabled {
                ldebug!(
                    "system",
                    LogStage::Startup,
                    LogComponent::Registry,
                    "skip_disabled",
                    "跳过未启用的提供商",
                    provider = name.as_str()
                );
                continue;
            }

            builder = match provider_config.kind {
                ProviderKind::OAuth2 => {
                    let provider = GenericOAuthProvider::from_config(name, provider_config)
                        .map_err(|e| {
                            crate::error::CallbackError::config_with_source(
                                format!("提供商 {name} 初始化失败"),
                                e,
                            )
                        })?;
                    builder.oauth(name.clone(), Arc::new(provider))
                }
                ProviderKind::Saml => builder.saml(name.clone()),
            };
        }
        Ok(builder.build())
    }

    /// Looks up `name` and returns its OAuth capability.
    ///
    /// The second argument is linking context reserved for providers that
    /// need it; lookup itself ignores it.
    pub fn resolve(&self, name: &str, _extra: &str) -> OAuthResult<Arc<dyn OAuthProvider>> {
        let candidate = self
            .providers
            .get(name)
            .ok_or_else(|| OAuthError::ProviderNotFound(name.to_string()))?;

        candidate.as_oauth().ok_or_else(|| OAuthError::NotOAuthCapable {
            name: name.to_string(),
            kind: candidate.kind(),
        })
    }

    /// 已注册的提供商名称（排序后）
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// 注册表构建器；`build` 之后不可再修改
#[derive(Debug, Default)]
pub struct ProviderRegistryBuilder {
    providers: HashMap<String, RegisteredProvider>,
}

impl ProviderRegistryBuilder {
    /// 注册 OAuth 提供商
    #[must_use]
    pub fn oauth(mut self, name: impl Into<String>, provider: Arc<dyn OAuthProvider>) -> Self {
        self.providers
            .insert(name.into(), RegisteredProvider::OAuth(provider));
        self
    }

    /// 注册仅 SAML 的提供商
    #[must_use]
    pub fn saml(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.providers
            .insert(name.clone(), RegisteredProvider::Saml { name });
        self
    }

    /// 生成只读注册表
    #[must_use]
    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            providers: self.providers,
        }
    }
}
