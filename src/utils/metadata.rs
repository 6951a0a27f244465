// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::BTreeMap;

/// Contextual key/value entries attached to a single graph node.
///
/// Values are arbitrary JSON so that structured entries (for example a
/// `debug` object) survive alongside plain strings like `trace_id`.
pub type Metadata = BTreeMap<String, Value>;

/// Merge `incoming` on top of `existing`, returning a fresh map.
///
/// Every entry of `existing` is copied first, then every entry of `incoming`
/// is applied over it, so a key present in both ends up with the value from
/// `incoming`. A missing `existing` map behaves like an empty one. Neither
/// input is modified.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use dispatch_context::utils::{merge_metadata, Metadata};
///
/// let existing: Metadata = [("a".into(), json!(1)), ("b".into(), json!(2))].into();
/// let incoming: Metadata = [("b".into(), json!(3)), ("c".into(), json!(4))].into();
///
/// let merged = merge_metadata(Some(&existing), &incoming);
///
/// assert_eq!(merged.get("a"), Some(&json!(1)));
/// assert_eq!(merged.get("b"), Some(&json!(3)));
/// assert_eq!(merged.get("c"), Some(&json!(4)));
/// ```
pub fn merge_metadata(existing: Option<&Metadata>, incoming: &Metadata) -> Metadata {
    let mut merged = existing.cloned().unwrap_or_default();
    merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Build a metadata map from string pairs.
///
/// Convenience for call sites that only deal in string values, such as
/// `key=value` pairs read from a command line.
pub fn metadata_from_pairs<I, K, V>(pairs: I) -> Metadata
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect()
}
