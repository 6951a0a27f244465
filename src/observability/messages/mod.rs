// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] for the leveled event with its structured fields.
//!
//! # Organization
//!
//! * `annotation` - metadata annotation of task graphs
//! * `dispatch` - submission of annotated graphs and collaborator failures
//! * `validation` - template validation warnings and errors
//!
//! # Usage Pattern
//!
//! ```rust
//! use dispatch_context::observability::messages::dispatch::GraphSubmitted;
//! use dispatch_context::observability::messages::StructuredLog;
//!
//! let msg = GraphSubmitted {
//!     task_id: "7f1c",
//!     root_kind: "chain",
//!     node_count: 4,
//!     deep: true,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod annotation;
pub mod dispatch;
pub mod validation;

/// Emit a message as a structured tracing event, or open a span for it.
pub trait StructuredLog {
    /// Emit the event at the message's level with its fields attached.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
