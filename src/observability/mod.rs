// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log lines are never written as ad-hoc strings. Every event is a message
//! struct under [`messages`], grouped by subsystem, implementing `Display`
//! and [`messages::StructuredLog`].
//!
//! # Usage
//!
//! ```rust
//! use dispatch_context::observability::messages::dispatch::SubmissionFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "broker down");
//! let msg = SubmissionFailed {
//!     root_kind: "chain",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
