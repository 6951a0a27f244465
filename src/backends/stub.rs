// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::memory::MemoryHandle;
use crate::errors::BoxError;
use crate::graph::GraphNode;
use crate::traits::{Dispatcher, MetadataSource, SubmitOptions};
use crate::utils::Metadata;

/// A dispatcher that rejects every graph, for testing submission failures
pub struct FailingDispatcher {
    pub reason: String,
}

impl FailingDispatcher {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Dispatcher for FailingDispatcher {
    type Handle = MemoryHandle;

    fn submit(&self, _graph: GraphNode, _options: &SubmitOptions) -> Result<MemoryHandle, BoxError> {
        Err(self.reason.clone().into())
    }
}

/// A metadata source that always fails, for testing unavailable context
pub struct FailingSource {
    pub reason: String,
}

impl FailingSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl MetadataSource for FailingSource {
    fn current(&self) -> Result<Metadata, BoxError> {
        Err(self.reason.clone().into())
    }
}
