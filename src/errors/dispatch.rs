// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by dispatching an annotated graph.
//!
//! Annotation itself never fails. The only failures a caller of
//! [`DispatchFacade::send`](crate::engine::DispatchFacade::send) can see come
//! from the two collaborators it calls out to: the metadata source and the
//! dispatcher. Both are forwarded transparently, so the caller sees their
//! original message and `source()` chain.

use std::time::Duration;
use thiserror::Error;

/// Boxed error type produced by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// The metadata source failed to produce the current context.
    #[error(transparent)]
    SourceUnavailable(BoxError),

    /// The dispatcher rejected the annotated graph.
    #[error(transparent)]
    Submission(BoxError),

    /// No result arrived before the caller's deadline.
    #[error("Timed out waiting for task result after {0:?}")]
    Timeout(Duration),

    /// The dispatched work finished with an error.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_source_error_is_forwarded_unchanged() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "no request context");
        let err = DispatchError::SourceUnavailable(Box::new(inner));

        assert_eq!(err.to_string(), "no request context");
    }

    #[test]
    fn test_submission_error_keeps_source_chain() {
        #[derive(Debug, Error)]
        #[error("broker down")]
        struct BrokerDown(#[source] std::io::Error);

        let err = DispatchError::Submission(Box::new(BrokerDown(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ))));

        assert_eq!(err.to_string(), "broker down");
        assert_eq!(err.source().map(|s| s.to_string()), Some("refused".to_string()));
    }
}
