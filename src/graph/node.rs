// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Task-execution graph nodes.
//!
//! A graph is a tree of [`GraphNode`]s. Each node has a structural shape
//! ([`NodeKind`]), its own metadata, and two independent lists of callback
//! links that the dispatch system runs when the node succeeds or fails.
//!
//! Sub-graphs are held behind [`Arc`]. Nothing in this crate mutates a shared
//! sub-graph in place: writes go through [`Arc::make_mut`], which clones the
//! node first whenever another graph still points at it. Two graphs can
//! therefore share untouched branches while staying fully isolated.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use dispatch_context::graph::{GraphNode, WorkUnit};
//!
//! let pipeline = GraphNode::chain([
//!     GraphNode::unit(WorkUnit::new("fetch", vec![json!(1)])),
//!     GraphNode::group([
//!         GraphNode::unit(WorkUnit::new("add", vec![json!(1), json!(1)])),
//!         GraphNode::unit(WorkUnit::new("add", vec![json!(2), json!(2)])),
//!     ]),
//! ])
//! .link_error(GraphNode::unit(WorkUnit::new("alert", vec![])));
//!
//! assert_eq!(pipeline.node_count(), 6);
//! ```

use crate::errors::NodeShapeError;
use crate::utils::Metadata;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single schedulable piece of work: a task name plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkUnit {
    pub task: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kwargs: BTreeMap<String, Value>,
}

impl WorkUnit {
    pub fn new(task: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            task: task.into(),
            args,
            kwargs: BTreeMap::new(),
        }
    }

    /// Add a keyword argument.
    pub fn with_kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

/// Structural shape of a node.
///
/// # Variants
/// * `Unit` - one piece of work, no sub-structure
/// * `Chain` - children run in order, each result feeding the next
/// * `Group` - children run independently with no ordering between them
/// * `Chord` - a header group followed by a body that receives all header results
///
/// A `Chord` built through [`GraphNode::chord`] always has a body. A chord
/// loaded from a template may not; such a node is carried through untouched
/// and flagged by config validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Unit(WorkUnit),
    Chain(Vec<Arc<GraphNode>>),
    Group(Vec<Arc<GraphNode>>),
    Chord {
        header: Vec<Arc<GraphNode>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<Arc<GraphNode>>,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Unit(_) => "unit",
            NodeKind::Chain(_) => "chain",
            NodeKind::Group(_) => "group",
            NodeKind::Chord { .. } => "chord",
        }
    }
}

/// One node of a task-execution graph.
///
/// Serialized as a map holding exactly one of `unit`, `chain`, `group` or
/// `chord`, plus optional `metadata`, `on_success` and `on_error`. Any other
/// key, or a second shape, is rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_success: Vec<Arc<GraphNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_error: Vec<Arc<GraphNode>>,
}

/// Wire form of a node; every shape optional so that shape errors can be reported.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    #[serde(default)]
    unit: Option<WorkUnit>,
    #[serde(default)]
    chain: Option<Vec<Arc<GraphNode>>>,
    #[serde(default)]
    group: Option<Vec<Arc<GraphNode>>>,
    #[serde(default)]
    chord: Option<RawChord>,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    on_success: Vec<Arc<GraphNode>>,
    #[serde(default)]
    on_error: Vec<Arc<GraphNode>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChord {
    header: Vec<Arc<GraphNode>>,
    #[serde(default)]
    body: Option<Arc<GraphNode>>,
}

impl RawNode {
    fn into_node(self) -> Result<GraphNode, NodeShapeError> {
        let kind = match (self.unit, self.chain, self.group, self.chord) {
            (Some(work), None, None, None) => NodeKind::Unit(work),
            (None, Some(children), None, None) => NodeKind::Chain(children),
            (None, None, Some(children), None) => NodeKind::Group(children),
            (None, None, None, Some(chord)) => NodeKind::Chord {
                header: chord.header,
                body: chord.body,
            },
            (None, None, None, None) => return Err(NodeShapeError::Missing),
            (unit, chain, group, chord) => {
                let present = [
                    ("unit", unit.is_some()),
                    ("chain", chain.is_some()),
                    ("group", group.is_some()),
                    ("chord", chord.is_some()),
                ];
                return Err(NodeShapeError::Ambiguous(
                    present
                        .iter()
                        .filter(|(_, found)| *found)
                        .map(|(name, _)| *name)
                        .collect(),
                ));
            }
        };

        Ok(GraphNode {
            kind,
            metadata: self.metadata,
            on_success: self.on_success,
            on_error: self.on_error,
        })
    }
}

impl<'de> Deserialize<'de> for GraphNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer)?
            .into_node()
            .map_err(serde::de::Error::custom)
    }
}

fn share<I: IntoIterator<Item = GraphNode>>(nodes: I) -> Vec<Arc<GraphNode>> {
    nodes.into_iter().map(Arc::new).collect()
}

impl GraphNode {
    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            metadata: Metadata::new(),
            on_success: Vec::new(),
            on_error: Vec::new(),
        }
    }

    pub fn unit(work: WorkUnit) -> Self {
        Self::from_kind(NodeKind::Unit(work))
    }

    pub fn chain<I: IntoIterator<Item = GraphNode>>(children: I) -> Self {
        Self::from_kind(NodeKind::Chain(share(children)))
    }

    pub fn group<I: IntoIterator<Item = GraphNode>>(children: I) -> Self {
        Self::from_kind(NodeKind::Group(share(children)))
    }

    pub fn chord<I: IntoIterator<Item = GraphNode>>(header: I, body: GraphNode) -> Self {
        Self::from_kind(NodeKind::Chord {
            header: share(header),
            body: Some(Arc::new(body)),
        })
    }

    /// Replace this node's metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set a single metadata entry on this node.
    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Attach a callback run when this node succeeds.
    pub fn link(mut self, callback: GraphNode) -> Self {
        self.on_success.push(Arc::new(callback));
        self
    }

    /// Attach a callback run when this node fails.
    pub fn link_error(mut self, callback: GraphNode) -> Self {
        self.on_error.push(Arc::new(callback));
        self
    }

    /// Ordered children: empty for a unit, the header for a chord.
    pub fn children(&self) -> &[Arc<GraphNode>] {
        match &self.kind {
            NodeKind::Unit(_) => &[],
            NodeKind::Chain(children) | NodeKind::Group(children) => children,
            NodeKind::Chord { header, .. } => header,
        }
    }

    pub fn body(&self) -> Option<&GraphNode> {
        match &self.kind {
            NodeKind::Chord { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn work(&self) -> Option<&WorkUnit> {
        match &self.kind {
            NodeKind::Unit(work) => Some(work),
            _ => None,
        }
    }

    /// Visit every node reachable from this one, pre-order.
    ///
    /// Order per node: the node itself, its success links, its error links,
    /// its children, then the chord body. The closure also receives the depth,
    /// with this node at depth 0.
    pub fn walk<F: FnMut(&GraphNode, usize)>(&self, visit: &mut F) {
        self.walk_at(0, visit);
    }

    fn walk_at<F: FnMut(&GraphNode, usize)>(&self, depth: usize, visit: &mut F) {
        visit(self, depth);
        for linked in self.on_success.iter().chain(self.on_error.iter()) {
            linked.walk_at(depth + 1, visit);
        }
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
        if let Some(body) = self.body() {
            body.walk_at(depth + 1, visit);
        }
    }

    /// Number of nodes reachable from this one, itself included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }
}

impl From<WorkUnit> for GraphNode {
    fn from(work: WorkUnit) -> Self {
        GraphNode::unit(work)
    }
}
