// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dispatch with request context attached.
//!
//! [`DispatchFacade`] ties a [`MetadataSource`] to a [`Dispatcher`]. On every
//! call it reads the source once, layers the call's extra metadata on top,
//! annotates a copy of the graph and submits that copy:
//!
//! ```text
//! defaults  <  source.current()  <  extra
//! ```
//!
//! The right-hand side wins on shared keys. The caller's graph is only ever
//! borrowed, so one template can be sent again and again with different
//! context. Errors from the source or the dispatcher reach the caller
//! unchanged; nothing is retried, and nothing is submitted when the source
//! fails.

use serde_json::Value;

use crate::engine::annotate::{annotate_deep, annotate_one};
use crate::errors::{DispatchError, DispatchResult};
use crate::graph::{GraphNode, WorkUnit};
use crate::observability::messages::annotation::GraphAnnotated;
use crate::observability::messages::dispatch::{
    GraphSubmitted, MetadataSourceFailed, SubmissionFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Dispatcher, MetadataSource, SubmitOptions, TaskHandle};
use crate::utils::{merge_metadata, Metadata};

/// Per-call options for [`DispatchFacade::send_with`].
///
/// # Fields
/// * `extra` - Metadata for this call only, overriding the source
/// * `deep` - Annotate every node (true) or only the root (false)
/// * `submit` - Passed through to [`Dispatcher::submit`], never attached to nodes
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub extra: Metadata,
    pub deep: bool,
    pub submit: SubmitOptions,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            extra: Metadata::new(),
            deep: true,
            submit: SubmitOptions::new(),
        }
    }
}

impl SendOptions {
    /// Annotate the root node only.
    pub fn shallow() -> Self {
        Self {
            deep: false,
            ..Self::default()
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn with_submit_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.submit = self.submit.with(key, value);
        self
    }
}

/// Attaches the calling context's metadata to graphs before dispatch.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use dispatch_context::backends::memory::InMemoryDispatcher;
/// use dispatch_context::engine::DispatchFacade;
/// use dispatch_context::graph::{GraphNode, WorkUnit};
/// use dispatch_context::utils::{metadata_from_pairs, Metadata};
///
/// let facade = DispatchFacade::new(
///     || metadata_from_pairs([("trace_id", "ambient")]),
///     InMemoryDispatcher::new(),
/// );
///
/// let template = GraphNode::group([GraphNode::unit(WorkUnit::new("add", vec![json!(1)]))]);
/// facade.send(&template, &Metadata::new(), true).unwrap();
///
/// let sent = facade.dispatcher().submitted();
/// assert_eq!(sent[0].children()[0].metadata["trace_id"], json!("ambient"));
/// assert!(template.children()[0].metadata.is_empty());
/// ```
pub struct DispatchFacade<S, D> {
    source: S,
    dispatcher: D,
    defaults: Metadata,
}

impl<S, D> DispatchFacade<S, D>
where
    S: MetadataSource,
    D: Dispatcher,
{
    pub fn new(source: S, dispatcher: D) -> Self {
        Self {
            source,
            dispatcher,
            defaults: Metadata::new(),
        }
    }

    /// Static metadata placed beneath whatever the source returns.
    pub fn with_defaults(mut self, defaults: Metadata) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the annotated copy of `graph` without submitting it.
    pub fn with_metadata(
        &self,
        graph: &GraphNode,
        extra: &Metadata,
        deep: bool,
    ) -> DispatchResult<GraphNode> {
        self.annotate(graph, extra, deep).map(|(annotated, _)| annotated)
    }

    /// Annotated copy of `graph` together with its node count.
    fn annotate(
        &self,
        graph: &GraphNode,
        extra: &Metadata,
        deep: bool,
    ) -> DispatchResult<(GraphNode, usize)> {
        let ambient = self.source.current().map_err(|error| {
            MetadataSourceFailed {
                error: &*error,
            }
            .log();
            DispatchError::SourceUnavailable(error)
        })?;

        let base = merge_metadata(
            Some(&merge_metadata(Some(&self.defaults), &ambient)),
            extra,
        );

        let annotated = if deep {
            annotate_deep(graph, &base)
        } else {
            annotate_one(graph, &base)
        };

        let node_count = annotated.node_count();
        let keys: Vec<&str> = base.keys().map(String::as_str).collect();
        GraphAnnotated {
            root_kind: graph.kind.name(),
            nodes_annotated: if deep { node_count } else { 1 },
            keys: &keys,
            deep,
        }
        .log();

        Ok((annotated, node_count))
    }

    /// Annotate `graph` with the current context plus `extra` and submit it.
    pub fn send(&self, graph: &GraphNode, extra: &Metadata, deep: bool) -> DispatchResult<D::Handle> {
        self.dispatch(graph, extra, deep, &SubmitOptions::new())
    }

    pub fn send_with(&self, graph: &GraphNode, options: &SendOptions) -> DispatchResult<D::Handle> {
        self.dispatch(graph, &options.extra, options.deep, &options.submit)
    }

    fn dispatch(
        &self,
        graph: &GraphNode,
        extra: &Metadata,
        deep: bool,
        submit: &SubmitOptions,
    ) -> DispatchResult<D::Handle> {
        let (annotated, node_count) = self.annotate(graph, extra, deep)?;
        let root_kind = annotated.kind.name();

        let handle = self.dispatcher.submit(annotated, submit).map_err(|error| {
            SubmissionFailed {
                root_kind,
                error: &*error,
            }
            .log();
            DispatchError::Submission(error)
        })?;

        GraphSubmitted {
            task_id: handle.id(),
            root_kind,
            node_count,
            deep,
        }
        .log();

        Ok(handle)
    }

    /// Send a single unit of work: `task(args)`.
    ///
    /// Metadata has to ride on a graph node, so the work is wrapped in a
    /// one-node graph before it is sent.
    pub fn send_unit(
        &self,
        task: impl Into<String>,
        args: Vec<Value>,
        extra: &Metadata,
    ) -> DispatchResult<D::Handle> {
        self.send_work(WorkUnit::new(task, args), extra)
    }

    /// Like [`send_unit`](Self::send_unit), for work that also carries keyword arguments.
    pub fn send_work(&self, work: WorkUnit, extra: &Metadata) -> DispatchResult<D::Handle> {
        self.send(&GraphNode::unit(work), extra, true)
    }
}
