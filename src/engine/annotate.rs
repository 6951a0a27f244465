// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Metadata annotation of task graphs.
//!
//! Both annotators take the caller's graph by shared reference and return a
//! new graph; the input is never written to, so a template can be annotated
//! any number of times, from any number of threads.
//!
//! # Algorithms
//!
//! ## Shallow annotation
//! [`annotate_one`] clones the root and merges metadata into it alone. Its
//! children, chord body and callback links are the same `Arc`s as in the
//! input, so nested nodes keep exactly the metadata they had.
//!
//! ## Deep annotation
//! [`annotate_deep`] rebuilds the whole tree depth-first, pre-order:
//! 1. merge metadata into a copy of the node
//! 2. annotate every success link, then every error link, in order
//! 3. annotate every child of a chain, group or chord header, in order
//! 4. annotate the chord body, when there is one
//!
//! Every reachable node receives the same metadata, which overrides any
//! value the node already held for the same key. Keys the call does not
//! mention are left as they were. A chord without a body stays without one.
//!
//! - **Time Complexity**: O(N · K) for N nodes and K metadata entries
//! - **Space Complexity**: O(N · K) for the new tree, plus recursion depth

use std::sync::Arc;

use crate::graph::{GraphNode, NodeKind};
use crate::utils::{merge_metadata, Metadata};

/// Copy `node` with `metadata` merged into the root only.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use dispatch_context::engine::annotate_one;
/// use dispatch_context::graph::{GraphNode, WorkUnit};
/// use dispatch_context::utils::metadata_from_pairs;
///
/// let graph = GraphNode::group([GraphNode::unit(WorkUnit::new("add", vec![json!(1)]))]);
/// let annotated = annotate_one(&graph, &metadata_from_pairs([("trace_id", "abc")]));
///
/// assert_eq!(annotated.metadata.get("trace_id"), Some(&json!("abc")));
/// assert!(annotated.children()[0].metadata.is_empty());
/// ```
pub fn annotate_one(node: &GraphNode, metadata: &Metadata) -> GraphNode {
    let mut annotated = node.clone();
    annotated.metadata = merge_metadata(Some(&node.metadata), metadata);
    annotated
}

/// Copy `node` and everything reachable from it with `metadata` merged into every node.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use dispatch_context::engine::annotate_deep;
/// use dispatch_context::graph::{GraphNode, WorkUnit};
/// use dispatch_context::utils::metadata_from_pairs;
///
/// let graph = GraphNode::chain([
///     GraphNode::unit(WorkUnit::new("a", vec![])),
///     GraphNode::group([GraphNode::unit(WorkUnit::new("b", vec![]))]),
/// ]);
/// let annotated = annotate_deep(&graph, &metadata_from_pairs([("tenant", "acme")]));
///
/// annotated.walk(&mut |node, _| assert_eq!(node.metadata["tenant"], json!("acme")));
/// assert!(graph.metadata.is_empty());
/// ```
pub fn annotate_deep(node: &GraphNode, metadata: &Metadata) -> GraphNode {
    let merged = merge_metadata(Some(&node.metadata), metadata);

    let on_success = annotate_each(&node.on_success, metadata);
    let on_error = annotate_each(&node.on_error, metadata);

    let kind = match &node.kind {
        NodeKind::Unit(work) => NodeKind::Unit(work.clone()),
        NodeKind::Chain(children) => NodeKind::Chain(annotate_each(children, metadata)),
        NodeKind::Group(children) => NodeKind::Group(annotate_each(children, metadata)),
        NodeKind::Chord { header, body } => NodeKind::Chord {
            header: annotate_each(header, metadata),
            body: body
                .as_deref()
                .map(|body| Arc::new(annotate_deep(body, metadata))),
        },
    };

    GraphNode {
        kind,
        metadata: merged,
        on_success,
        on_error,
    }
}

fn annotate_each(nodes: &[Arc<GraphNode>], metadata: &Metadata) -> Vec<Arc<GraphNode>> {
    nodes
        .iter()
        .map(|node| Arc::new(annotate_deep(node, metadata)))
        .collect()
}
