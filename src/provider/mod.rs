//! Provider capability module。
//!
//! - `types`：令牌、统一用户资料与提供商类别
//! - `traits`：`OAuthProvider` 能力接口
//! - `registry`：启动时构建的只读提供商注册表
//! - `generic`：基于配置的通用 OAuth2 提供商
//! - `profile`：资料 JSON 到统一结构的字段映射

mod generic;
mod profile;
mod registry;
mod traits;
mod types;

pub use generic::GenericOAuthProvider;
pub use profile::map_profile;
pub use registry::{ProviderRegistry, ProviderRegistryBuilder, RegisteredProvider};
pub use traits::OAuthProvider;
pub use types::{OAuthToken, ProviderEmail, ProviderKind, ProviderMetadata, UserProvidedData};
