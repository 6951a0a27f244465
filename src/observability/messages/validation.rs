// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph template validation.
//!
//! This module contains message types for logging events related to:
//! * Chords without a body
//! * Chains, groups and chord headers without children
//! * Templates rejected by validation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A chord in a template has no body.
///
/// # Log Level
/// `warn!` - Tolerated, but probably not what the author meant
///
/// # Example
/// ```
/// use dispatch_context::observability::messages::validation::ChordWithoutBody;
///
/// let msg = ChordWithoutBody {
///     template: "nightly",
///     path: "nightly/chain[2]",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ChordWithoutBody<'a> {
    pub template: &'a str,
    pub path: &'a str,
}

impl Display for ChordWithoutBody<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' has a chord without body at '{}'; it will be dispatched as-is",
            self.template, self.path
        )
    }
}

impl StructuredLog for ChordWithoutBody<'_> {
    fn log(&self) {
        tracing::warn!(template = self.template, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "chord_without_body",
            span_name = name,
            template = self.template,
            path = self.path,
        )
    }
}

/// A chain, group or chord header in a template has no children.
///
/// # Log Level
/// `warn!` - Tolerated, the node is dispatched as-is
pub struct EmptyComposite<'a> {
    pub template: &'a str,
    pub kind: &'a str,
    pub path: &'a str,
}

impl Display for EmptyComposite<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' has an empty {} at '{}'",
            self.template, self.kind, self.path
        )
    }
}

impl StructuredLog for EmptyComposite<'_> {
    fn log(&self) {
        tracing::warn!(
            template = self.template,
            kind = self.kind,
            path = self.path,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "empty_composite",
            span_name = name,
            template = self.template,
            kind = self.kind,
            path = self.path,
        )
    }
}

/// Template validation finished with errors.
///
/// # Log Level
/// `error!` - Configuration will be rejected
pub struct TemplateValidationFailed {
    pub template_count: usize,
    pub error_count: usize,
}

impl Display for TemplateValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template validation failed: {} error(s) across {} template(s)",
            self.error_count, self.template_count
        )
    }
}

impl StructuredLog for TemplateValidationFailed {
    fn log(&self) {
        tracing::error!(
            template_count = self.template_count,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "template_validation_failed",
            span_name = name,
            template_count = self.template_count,
            error_count = self.error_count,
        )
    }
}
