// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-request context and the metadata sources built on it.
//!
//! A [`RequestContext`] holds the values a request carries (trace id, tenant
//! id, debug flags) and renders them as [`Metadata`]. It can be handed to a
//! [`DispatchFacade`](crate::engine::DispatchFacade) directly, which keeps
//! the context an explicit argument, or installed for the duration of a
//! future with [`RequestContext::scope`] and read back by
//! [`TaskLocalSource`] from anywhere inside that future.
//!
//! # Example
//!
//! ```rust
//! use dispatch_context::config::ContextConfig;
//! use dispatch_context::context::{RequestContext, TaskLocalSource};
//! use dispatch_context::traits::MetadataSource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let headers = [("X-Trace-Id", "req-42"), ("X-Tenant-Id", "acme")];
//! let ctx = RequestContext::from_headers(headers, &ContextConfig::default());
//!
//! let metadata = ctx
//!     .scope(async { TaskLocalSource.current().unwrap() })
//!     .await;
//!
//! assert_eq!(metadata["trace_id"], "req-42");
//! assert_eq!(metadata["tenant_id"], "acme");
//! # }
//! ```

use serde_json::Value;
use std::future::Future;

use crate::config::ContextConfig;
use crate::errors::BoxError;
use crate::traits::MetadataSource;
use crate::utils::Metadata;

pub const TRACE_ID_KEY: &str = "trace_id";
pub const TENANT_ID_KEY: &str = "tenant_id";
pub const DEBUG_KEY: &str = "debug";

tokio::task_local! {
    static CURRENT_CONTEXT: RequestContext;
}

/// Values carried by one inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub trace_id: Option<String>,
    pub tenant_id: Option<String>,
    pub debug: Option<Value>,
    pub extra: Metadata,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_debug(mut self, debug: Value) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Build a context from inbound request headers.
    ///
    /// Header names are matched case-insensitively against the names in
    /// `config`. An absent or empty trace header yields a fresh UUID v4 when
    /// `config.generate_trace_id` is set.
    pub fn from_headers<'h, I>(headers: I, config: &ContextConfig) -> Self
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        let mut ctx = Self::new();
        for (name, value) in headers {
            if value.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case(&config.trace_header) {
                ctx.trace_id = Some(value.to_string());
            } else if name.eq_ignore_ascii_case(&config.tenant_header) {
                ctx.tenant_id = Some(value.to_string());
            }
        }

        if ctx.trace_id.is_none() && config.generate_trace_id {
            ctx.trace_id = Some(uuid::Uuid::new_v4().to_string());
        }
        ctx
    }

    /// Render as metadata. Unset and empty fields are omitted.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = self.extra.clone();
        if let Some(trace_id) = self.trace_id.as_deref().filter(|v| !v.is_empty()) {
            metadata.insert(TRACE_ID_KEY.to_string(), Value::String(trace_id.to_string()));
        }
        if let Some(tenant_id) = self.tenant_id.as_deref().filter(|v| !v.is_empty()) {
            metadata.insert(TENANT_ID_KEY.to_string(), Value::String(tenant_id.to_string()));
        }
        if let Some(debug) = self.debug.as_ref().filter(|v| !v.is_null()) {
            metadata.insert(DEBUG_KEY.to_string(), debug.clone());
        }
        metadata
    }

    /// Run `fut` with this context installed for [`TaskLocalSource`].
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_CONTEXT.scope(self, fut).await
    }

    /// Run `f` synchronously with this context installed.
    pub fn sync_scope<R, F: FnOnce() -> R>(self, f: F) -> R {
        CURRENT_CONTEXT.sync_scope(self, f)
    }

    /// The context installed by the innermost enclosing scope, if any.
    pub fn installed() -> Option<RequestContext> {
        CURRENT_CONTEXT.try_with(RequestContext::clone).ok()
    }
}

impl MetadataSource for RequestContext {
    fn current(&self) -> Result<Metadata, BoxError> {
        Ok(self.to_metadata())
    }
}

/// Reads the context installed by [`RequestContext::scope`].
///
/// Outside of any scope it yields empty metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalSource;

impl MetadataSource for TaskLocalSource {
    fn current(&self) -> Result<Metadata, BoxError> {
        Ok(RequestContext::installed()
            .map(|ctx| ctx.to_metadata())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_metadata_skips_unset_and_empty_fields() {
        let ctx = RequestContext::new().with_trace_id("").with_debug(Value::Null);

        assert!(ctx.to_metadata().is_empty());
    }

    #[test]
    fn test_to_metadata_includes_extra_and_known_fields() {
        let ctx = RequestContext::new()
            .with_trace_id("req-42")
            .with_tenant_id("acme")
            .with_debug(json!({"trace": true}))
            .with_entry("region", json!("eu"));

        let metadata = ctx.to_metadata();

        assert_eq!(metadata[TRACE_ID_KEY], json!("req-42"));
        assert_eq!(metadata[TENANT_ID_KEY], json!("acme"));
        assert_eq!(metadata[DEBUG_KEY]["trace"], json!(true));
        assert_eq!(metadata["region"], json!("eu"));
    }

    #[test]
    fn test_from_headers_case_insensitive() {
        let headers = [("x-TRACE-id", "abc"), ("X-Tenant-ID", "acme"), ("accept", "*/*")];

        let ctx = RequestContext::from_headers(headers, &ContextConfig::default());

        assert_eq!(ctx.trace_id.as_deref(), Some("abc"));
        assert_eq!(ctx.tenant_id.as_deref(), Some("acme"));
    }

    #[test]
    fn test_from_headers_generates_trace_id() {
        let ctx = RequestContext::from_headers([("x-trace-id", "")], &ContextConfig::default());

        let trace_id = ctx.trace_id.unwrap();
        assert!(uuid::Uuid::parse_str(&trace_id).is_ok());
        assert!(ctx.tenant_id.is_none());
    }

    #[test]
    fn test_from_headers_without_generation() {
        let config = ContextConfig {
            generate_trace_id: false,
            ..ContextConfig::default()
        };

        let ctx = RequestContext::from_headers(std::iter::empty(), &config);

        assert_eq!(ctx, RequestContext::new());
    }

    #[test]
    fn test_task_local_source_outside_scope_is_empty() {
        assert!(TaskLocalSource.current().unwrap().is_empty());
        assert!(RequestContext::installed().is_none());
    }

    #[test]
    fn test_sync_scope_installs_context() {
        let ctx = RequestContext::new().with_tenant_id("acme");

        let metadata = ctx.sync_scope(|| TaskLocalSource.current().unwrap());

        assert_eq!(metadata[TENANT_ID_KEY], json!("acme"));
    }

    #[tokio::test]
    async fn test_scopes_do_not_leak_between_tasks() {
        let first = tokio::spawn(
            RequestContext::new()
                .with_trace_id("one")
                .scope(async { TaskLocalSource.current().unwrap() }),
        );
        let second = tokio::spawn(
            RequestContext::new()
                .with_trace_id("two")
                .scope(async { TaskLocalSource.current().unwrap() }),
        );

        assert_eq!(first.await.unwrap()[TRACE_ID_KEY], json!("one"));
        assert_eq!(second.await.unwrap()[TRACE_ID_KEY], json!("two"));
        assert!(RequestContext::installed().is_none());
    }
}
