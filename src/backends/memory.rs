// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process dispatcher that records what it is given.
//!
//! [`InMemoryDispatcher`] accepts every graph, keeps a copy, and returns a
//! [`MemoryHandle`] whose result is supplied later through
//! [`InMemoryDispatcher::complete`] or [`InMemoryDispatcher::fail`]. It runs
//! nothing itself; it stands in for a broker in tests and demos.
//!
//! A task whose handles have all been dropped can no longer be observed, so
//! it is forgotten on the next submission and cannot be resolved afterwards.
//! The submitted graph itself stays on record.
//!
//! # Example
//! ```rust
//! use serde_json::json;
//! use std::time::Duration;
//! use dispatch_context::backends::memory::InMemoryDispatcher;
//! use dispatch_context::graph::{GraphNode, WorkUnit};
//! use dispatch_context::traits::{Dispatcher, SubmitOptions, TaskHandle};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = InMemoryDispatcher::new();
//! let handle = dispatcher
//!     .submit(
//!         GraphNode::unit(WorkUnit::new("add", vec![json!(2), json!(3)])),
//!         &SubmitOptions::new(),
//!     )
//!     .unwrap();
//!
//! dispatcher.complete(handle.id(), json!(5));
//!
//! let result = handle.wait(Some(Duration::from_secs(1))).await.unwrap();
//! assert_eq!(result, json!(5));
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

use crate::errors::{BoxError, DispatchError};
use crate::graph::GraphNode;
use crate::traits::{Dispatcher, SubmitOptions, TaskHandle};

type Outcome = Result<Value, String>;

struct Submission {
    id: String,
    graph: GraphNode,
    options: SubmitOptions,
}

#[derive(Default)]
struct DispatchLog {
    submitted: Vec<Submission>,
    pending: HashMap<String, watch::Sender<Option<Outcome>>>,
}

/// Records submitted graphs and hands out handles resolved on demand.
#[derive(Clone, Default)]
pub struct InMemoryDispatcher {
    log: Arc<Mutex<DispatchLog>>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DispatchLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Graphs submitted so far, oldest first.
    pub fn submitted(&self) -> Vec<GraphNode> {
        self.lock()
            .submitted
            .iter()
            .map(|submission| submission.graph.clone())
            .collect()
    }

    /// The graph submitted under `task_id`.
    pub fn submitted_as(&self, task_id: &str) -> Option<GraphNode> {
        self.find(task_id, |submission| submission.graph.clone())
    }

    /// The submit options given with `task_id`.
    pub fn options_for(&self, task_id: &str) -> Option<SubmitOptions> {
        self.find(task_id, |submission| submission.options.clone())
    }

    fn find<T>(&self, task_id: &str, read: impl FnOnce(&Submission) -> T) -> Option<T> {
        self.lock()
            .submitted
            .iter()
            .find(|submission| submission.id == task_id)
            .map(read)
    }

    /// Resolve a task successfully. Returns false for an unknown, finished or abandoned task.
    pub fn complete(&self, task_id: &str, result: Value) -> bool {
        self.resolve(task_id, Ok(result))
    }

    /// Resolve a task with an error. Returns false for an unknown, finished or abandoned task.
    pub fn fail(&self, task_id: &str, reason: impl Into<String>) -> bool {
        self.resolve(task_id, Err(reason.into()))
    }

    fn resolve(&self, task_id: &str, outcome: Outcome) -> bool {
        match self.lock().pending.remove(task_id) {
            Some(sender) => {
                sender.send_replace(Some(outcome));
                true
            }
            None => false,
        }
    }
}

impl Dispatcher for InMemoryDispatcher {
    type Handle = MemoryHandle;

    fn submit(&self, graph: GraphNode, options: &SubmitOptions) -> Result<MemoryHandle, BoxError> {
        let id = uuid::Uuid::new_v4().to_string();
        let (sender, receiver) = watch::channel(None);

        let mut log = self.lock();
        log.pending.retain(|_, waiting| !waiting.is_closed());
        log.submitted.push(Submission {
            id: id.clone(),
            graph,
            options: options.clone(),
        });
        log.pending.insert(id.clone(), sender);

        Ok(MemoryHandle { id, receiver })
    }
}

/// Handle returned by [`InMemoryDispatcher`].
#[derive(Clone, Debug)]
pub struct MemoryHandle {
    id: String,
    receiver: watch::Receiver<Option<Outcome>>,
}

impl MemoryHandle {
    async fn outcome(&self) -> Result<Value, DispatchError> {
        let mut receiver = self.receiver.clone();
        let resolved = receiver
            .wait_for(Option::is_some)
            .await
            .map(|value| (*value).clone());
        let outcome = match resolved {
            Ok(outcome) => outcome,
            // A closed channel still holds the last value sent, if any.
            Err(_) => receiver.borrow().clone(),
        };

        match outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(reason)) => Err(DispatchError::TaskFailed(reason)),
            None => Err(DispatchError::TaskFailed(format!(
                "task '{}' was dropped before completing",
                self.id
            ))),
        }
    }
}

#[async_trait]
impl TaskHandle for MemoryHandle {
    fn id(&self) -> &str {
        &self.id
    }

    async fn wait(&self, timeout: Option<Duration>) -> Result<Value, DispatchError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.outcome())
                .await
                .map_err(|_| DispatchError::Timeout(limit))?,
            None => self.outcome().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkUnit;
    use serde_json::json;

    fn unit(name: &str) -> GraphNode {
        GraphNode::unit(WorkUnit::new(name, vec![]))
    }

    impl InMemoryDispatcher {
        fn submit_plain(&self, graph: GraphNode) -> Result<MemoryHandle, BoxError> {
            self.submit(graph, &SubmitOptions::new())
        }
    }

    #[tokio::test]
    async fn test_wait_returns_completed_value() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("add")).unwrap();

        let id = handle.id().to_string();
        let completer = dispatcher.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            completer.complete(&id, json!(42));
        });

        assert_eq!(handle.wait(None).await.unwrap(), json!(42));
    }

    #[tokio::test]
    async fn test_wait_after_completion() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("add")).unwrap();

        assert!(dispatcher.complete(handle.id(), json!("done")));

        assert_eq!(handle.wait(Some(Duration::from_millis(50))).await.unwrap(), json!("done"));
        assert_eq!(handle.wait(None).await.unwrap(), json!("done"));
    }

    #[tokio::test]
    async fn test_wait_reports_failure() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("add")).unwrap();

        dispatcher.fail(handle.id(), "division by zero");

        let err = handle.wait(None).await.unwrap_err();
        assert!(matches!(err, DispatchError::TaskFailed(ref reason) if reason == "division by zero"));
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("slow")).unwrap();

        let err = handle.wait(Some(Duration::from_millis(10))).await.unwrap_err();

        assert!(matches!(err, DispatchError::Timeout(_)));
    }

    #[test]
    fn test_records_submissions_in_order() {
        let dispatcher = InMemoryDispatcher::new();
        let first = dispatcher.submit_plain(unit("a")).unwrap();
        let second = dispatcher.submit_plain(unit("b")).unwrap();

        let names: Vec<String> = dispatcher
            .submitted()
            .iter()
            .map(|graph| graph.work().unwrap().task.clone())
            .collect();

        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_ne!(first.id(), second.id());
        assert_eq!(dispatcher.submitted_as(second.id()).unwrap().work().unwrap().task, "b");
    }

    #[test]
    fn test_records_submit_options() {
        let dispatcher = InMemoryDispatcher::new();
        let options = SubmitOptions::new()
            .with("queue", json!("reports"))
            .with("countdown", json!(30));

        let handle = dispatcher.submit(unit("a"), &options).unwrap();

        assert_eq!(dispatcher.options_for(handle.id()), Some(options));
        assert_eq!(dispatcher.options_for("missing"), None);
    }

    #[test]
    fn test_abandoned_tasks_are_forgotten() {
        let dispatcher = InMemoryDispatcher::new();
        let abandoned = dispatcher.submit_plain(unit("a")).unwrap().id().to_string();
        let kept = dispatcher.submit_plain(unit("b")).unwrap();

        assert_eq!(dispatcher.lock().pending.len(), 1);
        assert!(!dispatcher.complete(&abandoned, json!(1)));
        assert!(dispatcher.submitted_as(&abandoned).is_some());
        assert!(dispatcher.complete(kept.id(), json!(2)));
    }

    #[test]
    fn test_handle_debug_shows_id() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("a")).unwrap();

        assert!(format!("{:?}", handle).contains(handle.id()));
    }

    #[test]
    fn test_resolve_unknown_or_finished_task() {
        let dispatcher = InMemoryDispatcher::new();
        let handle = dispatcher.submit_plain(unit("a")).unwrap();

        assert!(!dispatcher.complete("missing", json!(1)));
        assert!(dispatcher.complete(handle.id(), json!(1)));
        assert!(!dispatcher.fail(handle.id(), "late"));
    }
}
