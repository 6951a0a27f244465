// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dispatching annotated graphs.
//!
//! This module contains message types for logging events related to:
//! * Successful submission of an annotated graph
//! * Metadata source failures
//! * Dispatcher rejections

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An annotated graph was accepted by the dispatcher.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphSubmitted<'a> {
    pub task_id: &'a str,
    pub root_kind: &'a str,
    pub node_count: usize,
    pub deep: bool,
}

impl Display for GraphSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Submitted {} graph as task '{}': {} node(s), deep={}",
            self.root_kind, self.task_id, self.node_count, self.deep
        )
    }
}

impl StructuredLog for GraphSubmitted<'_> {
    fn log(&self) {
        tracing::info!(
            task_id = self.task_id,
            root_kind = self.root_kind,
            node_count = self.node_count,
            deep = self.deep,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            task_id = self.task_id,
            root_kind = self.root_kind,
            node_count = self.node_count,
        )
    }
}

/// The metadata source failed; nothing was submitted.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dispatch_context::observability::messages::dispatch::MetadataSourceFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "context store offline");
/// let msg = MetadataSourceFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct MetadataSourceFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for MetadataSourceFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Metadata source failed, nothing submitted: {}", self.error)
    }
}

impl StructuredLog for MetadataSourceFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("metadata_source_failed", span_name = name, error = %self.error)
    }
}

/// The dispatcher rejected an annotated graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SubmissionFailed<'a> {
    pub root_kind: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SubmissionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatcher rejected {} graph: {}",
            self.root_kind, self.error
        )
    }
}

impl StructuredLog for SubmissionFailed<'_> {
    fn log(&self) {
        tracing::error!(root_kind = self.root_kind, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "submission_failed",
            span_name = name,
            root_kind = self.root_kind,
            error = %self.error,
        )
    }
}
