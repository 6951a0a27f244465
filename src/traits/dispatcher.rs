// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::{BoxError, DispatchError};
use crate::graph::GraphNode;

/// Options for the submission call itself, such as a queue name, countdown
/// or priority.
///
/// They go to the dispatcher untouched and are never attached to graph nodes.
/// Which keys mean anything is up to the dispatcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOptions(BTreeMap<String, Value>);

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// The external submission primitive.
///
/// Accepts one fully annotated root node and hands back an opaque handle.
/// Metadata must already be attached when `submit` is called; a dispatcher
/// has no way to add it afterwards.
pub trait Dispatcher: Send + Sync {
    type Handle: TaskHandle;

    fn submit(&self, graph: GraphNode, options: &SubmitOptions) -> Result<Self::Handle, BoxError>;
}

/// Handle to work accepted by a [`Dispatcher`].
#[async_trait]
pub trait TaskHandle: Send + Sync {
    /// Identifier assigned by the dispatcher.
    fn id(&self) -> &str;

    /// Wait for the result, giving up after `timeout` when one is given.
    async fn wait(&self, timeout: Option<Duration>) -> Result<Value, DispatchError>;
}
