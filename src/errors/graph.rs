// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A serialized node that does not describe exactly one shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeShapeError {
    #[error("node has no shape; expected one of unit, chain, group or chord")]
    Missing,

    #[error("node has more than one shape: {}", .0.join(", "))]
    Ambiguous(Vec<&'static str>),
}
