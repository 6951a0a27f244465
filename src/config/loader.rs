// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_TENANT_HEADER, DEFAULT_TRACE_HEADER};
use crate::errors::ConfigError;
use crate::graph::GraphNode;
use crate::observability::messages::validation::TemplateValidationFailed;
use crate::observability::messages::StructuredLog;
use crate::utils::Metadata;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration structure for context-propagating dispatch.
///
/// Typically loaded from a YAML file.
///
/// # Fields
/// * `deep` - Whether `send` annotates the whole graph or only its root (defaults to true)
/// * `strict_chords` - Reject templates containing a chord without body (defaults to false)
/// * `defaults` - Static metadata placed beneath the per-request context
/// * `context` - How request context is read from inbound headers
/// * `templates` - Named, reusable graph templates
///
/// # Example
/// ```yaml
/// deep: true
/// defaults:
///   service: billing
/// context:
///   trace_header: x-request-id
/// templates:
///   nightly:
///     chain:
///       - unit: { task: fetch, args: [1] }
///       - group:
///           - unit: { task: add, args: [1, 1] }
///           - unit: { task: add, args: [2, 2] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_deep")]
    pub deep: bool,
    #[serde(default)]
    pub strict_chords: bool,
    #[serde(default)]
    pub defaults: Metadata,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub templates: BTreeMap<String, GraphNode>,
}

fn default_deep() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deep: default_deep(),
            strict_chords: false,
            defaults: Metadata::new(),
            context: ContextConfig::default(),
            templates: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a template by name.
    pub fn template(&self, name: &str) -> Result<&GraphNode, ConfigError> {
        self.templates
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }
}

/// How request context is extracted from inbound headers.
///
/// # Fields
/// * `trace_header` - Header holding the trace id (defaults to `x-trace-id`)
/// * `tenant_header` - Header holding the tenant id (defaults to `x-tenant-id`)
/// * `generate_trace_id` - Mint a UUID when no trace id arrives (defaults to true)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    #[serde(default = "default_trace_header")]
    pub trace_header: String,
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
    #[serde(default = "default_generate_trace_id")]
    pub generate_trace_id: bool,
}

fn default_trace_header() -> String {
    DEFAULT_TRACE_HEADER.to_string()
}

fn default_tenant_header() -> String {
    DEFAULT_TENANT_HEADER.to_string()
}

fn default_generate_trace_id() -> bool {
    true
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            trace_header: default_trace_header(),
            tenant_header: default_tenant_header(),
            generate_trace_id: default_generate_trace_id(),
        }
    }
}

/// Parse a config from YAML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate a config from a YAML file
///
/// Validation warnings are logged; validation errors reject the whole file.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(validation_errors) = crate::config::validate_templates(&cfg) {
        TemplateValidationFailed {
            template_count: cfg.templates.len(),
            error_count: validation_errors.len(),
        }
        .log();
        return Err(ConfigError::Invalid(validation_errors));
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
defaults:
  service: billing
templates:
  nightly:
    chain:
      - unit: { task: fetch, args: [1] }
      - group:
          - unit: { task: add, args: [1, 1] }
"#;

        let cfg = parse_config(yaml).unwrap();
        assert!(cfg.deep);
        assert!(!cfg.strict_chords);
        assert_eq!(cfg.defaults.get("service"), Some(&json!("billing")));
        assert_eq!(cfg.context.trace_header, DEFAULT_TRACE_HEADER);
        assert_eq!(cfg.template("nightly").unwrap().node_count(), 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("{}").unwrap();

        assert!(cfg.deep);
        assert!(cfg.templates.is_empty());
        assert!(cfg.context.generate_trace_id);
        assert_eq!(cfg.context.tenant_header, DEFAULT_TENANT_HEADER);
    }

    #[test]
    fn test_context_overrides() {
        let yaml = r#"
deep: false
context:
  trace_header: x-request-id
  generate_trace_id: false
"#;

        let cfg = parse_config(yaml).unwrap();

        assert!(!cfg.deep);
        assert_eq!(cfg.context.trace_header, "x-request-id");
        assert_eq!(cfg.context.tenant_header, DEFAULT_TENANT_HEADER);
        assert!(!cfg.context.generate_trace_id);
    }

    #[test]
    fn test_unknown_template() {
        let cfg = Config::default();

        let err = cfg.template("missing").unwrap_err();

        assert!(matches!(err, ConfigError::UnknownTemplate(ref name) if name == "missing"));
        assert_eq!(err.to_string(), "Unknown template 'missing'");
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_config(
            r#"
templates:
  report:
    chord:
      header:
        - unit: { task: add, args: [1, 1] }
        - unit: { task: add, args: [2, 2] }
      body:
        unit: { task: agg }
"#,
        );

        let result = load_and_validate_config(file.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_and_validate_tolerates_bodyless_chord() {
        let file = write_config(
            r#"
templates:
  report:
    chord:
      header:
        - unit: { task: add }
"#,
        );

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert!(cfg.template("report").unwrap().body().is_none());
    }

    #[test]
    fn test_load_and_validate_strict_chords() {
        let file = write_config(
            r#"
strict_chords: true
templates:
  report:
    chord:
      header:
        - unit: { task: add }
"#,
        );

        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("Configuration validation failed"));
        assert!(error_msg.contains("Chord at 'report' has no body"));
    }

    #[test]
    fn test_load_and_validate_empty_task_name() {
        let file = write_config(
            r#"
templates:
  broken:
    unit: { task: "" }
"#,
        );

        let result = load_and_validate_config(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(ref errors)) if errors.len() == 1));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/dispatch.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = parse_config("templates: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_template_with_two_shapes() {
        let file = write_config(
            r#"
templates:
  nightly:
    chain:
      - unit: { task: fetch }
    group:
      - unit: { task: add }
"#,
        );

        let err = load_and_validate_config(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("more than one shape"), "{}", err);
    }

    #[test]
    fn test_load_rejects_misspelled_callback_key() {
        let file = write_config(
            r#"
templates:
  nightly:
    unit: { task: fetch }
    on_sucess:
      - unit: { task: notify }
"#,
        );

        let err = load_and_validate_config(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("on_sucess"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_unknown_top_level_key() {
        let result = parse_config("templats: {}");
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let result = parse_config("context: { trace_heder: x-request-id }");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
