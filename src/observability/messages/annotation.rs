// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for metadata annotation of task graphs.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A graph was annotated with metadata.
///
/// # Log Level
/// `debug!` - Per-dispatch detail
///
/// # Example
/// ```
/// use dispatch_context::observability::messages::annotation::GraphAnnotated;
///
/// let keys = vec!["tenant", "trace_id"];
/// let msg = GraphAnnotated {
///     root_kind: "chain",
///     nodes_annotated: 5,
///     keys: &keys,
///     deep: true,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct GraphAnnotated<'a> {
    pub root_kind: &'a str,
    pub nodes_annotated: usize,
    pub keys: &'a [&'a str],
    pub deep: bool,
}

impl Display for GraphAnnotated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.deep { "deep" } else { "shallow" };
        write!(
            f,
            "Annotated {} graph ({}): {} node(s) with keys [{}]",
            self.root_kind,
            mode,
            self.nodes_annotated,
            self.keys.join(", ")
        )
    }
}

impl StructuredLog for GraphAnnotated<'_> {
    fn log(&self) {
        tracing::debug!(
            root_kind = self.root_kind,
            nodes_annotated = self.nodes_annotated,
            keys = self.keys.join(","),
            deep = self.deep,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "annotation",
            span_name = name,
            root_kind = self.root_kind,
            nodes_annotated = self.nodes_annotated,
            deep = self.deep,
        )
    }
}
