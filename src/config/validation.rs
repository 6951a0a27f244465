// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation of graph templates.
//!
//! Annotation and dispatch never reject a graph: whatever shape a template
//! has is carried through as-is. Validation exists so that template authors
//! hear about shapes that are probably mistakes before anything is sent.
//!
//! # Checks
//!
//! Every node of every template is visited once, tracking its path:
//!
//! 1. **Empty task names** - a unit with a blank `task` (error)
//! 2. **Chords without body** - header results would never be aggregated
//!    (warning, or error when `strict_chords` is set)
//! 3. **Empty composites** - a chain, group or chord header with no
//!    children (warning)
//!
//! Paths are built from the template name followed by one segment per edge:
//! `chain[1]`, `group[0]`, `chord[2]` for children, `body` for a chord body
//! and `on_success[0]` / `on_error[0]` for callback links.
//!
//! # Example
//!
//! ```rust
//! use dispatch_context::config::validate_template;
//! use dispatch_context::errors::ValidationError;
//! use dispatch_context::graph::{GraphNode, WorkUnit};
//!
//! let template = GraphNode::chain([
//!     GraphNode::unit(WorkUnit::new("fetch", vec![])),
//!     GraphNode::group([GraphNode::unit(WorkUnit::new("", vec![]))]),
//! ]);
//!
//! let problems = validate_template("nightly", &template);
//!
//! assert_eq!(
//!     problems,
//!     vec![ValidationError::EmptyTaskName { path: "nightly/chain[1]/group[0]".to_string() }]
//! );
//! ```

use crate::config::consts::PATH_SEPARATOR;
use crate::config::Config;
use crate::errors::ValidationError;
use crate::graph::{GraphNode, NodeKind};
use crate::observability::messages::validation::{ChordWithoutBody, EmptyComposite};
use crate::observability::messages::StructuredLog;

/// Validate every template in `config`.
///
/// Warnings are logged and dropped. Returns the remaining errors, with
/// `ChordWithoutBody` counted as an error when `config.strict_chords` is set.
pub fn validate_templates(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, template) in &config.templates {
        for problem in validate_template(name, template) {
            let promoted = config.strict_chords
                && matches!(problem, ValidationError::ChordWithoutBody { .. });
            if problem.is_warning() && !promoted {
                log_warning(name, &problem);
            } else {
                errors.push(problem);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collect every problem in one template, warnings included.
pub fn validate_template(name: &str, template: &GraphNode) -> Vec<ValidationError> {
    let mut problems = Vec::new();
    check_node(template, name, &mut problems);
    problems
}

fn check_node(node: &GraphNode, path: &str, problems: &mut Vec<ValidationError>) {
    match &node.kind {
        NodeKind::Unit(work) => {
            if work.task.trim().is_empty() {
                problems.push(ValidationError::EmptyTaskName {
                    path: path.to_string(),
                });
            }
        }
        NodeKind::Chain(_) | NodeKind::Group(_) => {}
        NodeKind::Chord { body, .. } => {
            if body.is_none() {
                problems.push(ValidationError::ChordWithoutBody {
                    path: path.to_string(),
                });
            }
        }
    }

    if !matches!(node.kind, NodeKind::Unit(_)) && node.children().is_empty() {
        problems.push(ValidationError::EmptyComposite {
            kind: node.kind.name(),
            path: path.to_string(),
        });
    }

    for (i, linked) in node.on_success.iter().enumerate() {
        check_node(linked, &segment(path, &format!("on_success[{}]", i)), problems);
    }
    for (i, linked) in node.on_error.iter().enumerate() {
        check_node(linked, &segment(path, &format!("on_error[{}]", i)), problems);
    }
    for (i, child) in node.children().iter().enumerate() {
        check_node(child, &segment(path, &format!("{}[{}]", node.kind.name(), i)), problems);
    }
    if let Some(body) = node.body() {
        check_node(body, &segment(path, "body"), problems);
    }
}

fn segment(path: &str, next: &str) -> String {
    format!("{}{}{}", path, PATH_SEPARATOR, next)
}

fn log_warning(template: &str, warning: &ValidationError) {
    match warning {
        ValidationError::ChordWithoutBody { path } => ChordWithoutBody {
            template,
            path: path.as_str(),
        }
        .log(),
        ValidationError::EmptyComposite { kind, path } => EmptyComposite {
            template,
            kind: *kind,
            path: path.as_str(),
        }
        .log(),
        ValidationError::EmptyTaskName { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkUnit;
    use std::sync::Arc;

    fn task(name: &str) -> GraphNode {
        GraphNode::unit(WorkUnit::new(name, vec![]))
    }

    fn bodyless_chord() -> GraphNode {
        GraphNode {
            kind: NodeKind::Chord {
                header: vec![Arc::new(task("x"))],
                body: None,
            },
            metadata: Default::default(),
            on_success: Vec::new(),
            on_error: Vec::new(),
        }
    }

    fn config_with(template: GraphNode, strict_chords: bool) -> Config {
        let mut config = Config::default();
        config.strict_chords = strict_chords;
        config.templates.insert("t".to_string(), template);
        config
    }

    #[test]
    fn test_valid_template_has_no_problems() {
        let template = GraphNode::chord([task("x"), task("y")], task("z")).link(task("done"));

        assert!(validate_template("t", &template).is_empty());
    }

    #[test]
    fn test_paths_follow_links_and_body() {
        let template = GraphNode::chord([task("x")], task("").link_error(task("")))
            .link(task(""));

        let paths: Vec<String> = validate_template("t", &template)
            .into_iter()
            .map(|p| match p {
                ValidationError::EmptyTaskName { path } => path,
                other => panic!("unexpected problem: {}", other),
            })
            .collect();

        assert_eq!(
            paths,
            vec![
                "t/on_success[0]".to_string(),
                "t/body".to_string(),
                "t/body/on_error[0]".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_group_is_warning() {
        let problems = validate_template("t", &GraphNode::chain([GraphNode::group(Vec::new())]));

        assert_eq!(
            problems,
            vec![ValidationError::EmptyComposite {
                kind: "group",
                path: "t/chain[0]".to_string(),
            }]
        );
        assert!(problems[0].is_warning());
    }

    #[test]
    fn test_chord_without_body_tolerated_by_default() {
        assert!(validate_templates(&config_with(bodyless_chord(), false)).is_ok());
    }

    #[test]
    fn test_chord_without_body_rejected_when_strict() {
        let errors = validate_templates(&config_with(bodyless_chord(), true)).unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::ChordWithoutBody {
                path: "t".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_task_name_is_error() {
        let errors = validate_templates(&config_with(task(" "), false)).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(!errors[0].is_warning());
    }
}
