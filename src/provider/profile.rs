//! 将提供商的原始资料 JSON 映射为 [`UserProvidedData`]。

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::types::{ProviderEmail, ProviderMetadata, UserProvidedData};
use crate::config::ProfileMapping;

/// 按点分路径取值，例如 `data.attributes.email`
fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(body, |current, segment| current.get(segment))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// 按映射规则生成统一资料；未映射的顶层字段保留在 `metadata.extra`
#[must_use]
pub fn map_profile(mapping: &ProfileMapping, body: &Value) -> UserProvidedData {
    let text = |path: &str| lookup(body, path).and_then(as_text);

    let verified = mapping
        .email_verified
        .as_deref()
        .and_then(|path| lookup(body, path))
        .is_some_and(as_flag);

    let emails = text(&mapping.email)
        .map(|email| {
            vec![ProviderEmail {
                email,
                verified,
                primary: true,
            }]
        })
        .unwrap_or_default();

    let mapped_roots: Vec<&str> = [
        Some(mapping.id.as_str()),
        Some(mapping.email.as_str()),
        mapping.email_verified.as_deref(),
        Some(mapping.name.as_str()),
        Some(mapping.avatar_url.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| path.split('.').next())
    .collect();

    let extra: BTreeMap<String, Value> = body
        .as_object()
        .map(Map::iter)
        .into_iter()
        .flatten()
        .filter(|(key, _)| !mapped_roots.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    UserProvidedData {
        emails,
        metadata: ProviderMetadata {
            subject: text(&mapping.id),
            name: text(&mapping.name),
            avatar_url: text(&mapping.avatar_url),
            extra,
        },
    }
}
