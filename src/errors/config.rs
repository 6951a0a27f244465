// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Problems found while validating graph templates.
///
/// Each variant carries the path of the offending node inside its template,
/// for example `nightly/chain[1]/group[0]`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A unit node names no task to run
    #[error("Unit at '{path}' has an empty task name")]
    EmptyTaskName { path: String },

    /// A chord has a header but nothing to aggregate its results
    #[error("Chord at '{path}' has no body; its header results will not be aggregated")]
    ChordWithoutBody { path: String },

    /// A chain, group or chord header has no children
    #[error("{kind} at '{path}' has no children")]
    EmptyComposite { kind: &'static str, path: String },
}

impl ValidationError {
    /// Warnings are reported but do not fail validation unless strict mode asks for it.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ValidationError::ChordWithoutBody { .. } | ValidationError::EmptyComposite { .. }
        )
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
