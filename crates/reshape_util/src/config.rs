//! Configuration.

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigError;
use reshape_ast::CAPTURED_NODES_MARKER;

/// Options for the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Require `content` on every tag, text, comment and code node.
    ///
    /// Off by default: absent content is accepted and only present content
    /// is shape-checked.
    #[serde(default)]
    pub require_content: bool,

    /// Substring marking a code node's reference to its captured nodes.
    #[serde(default = "default_code_marker")]
    pub code_marker: String,
}

fn default_code_marker() -> String {
    CAPTURED_NODES_MARKER.to_string()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            require_content: false,
            code_marker: default_code_marker(),
        }
    }
}

impl ValidatorConfig {
    /// Strict configuration: content is required on every enforced node type.
    pub fn strict() -> Self {
        Self {
            require_content: true,
            ..Self::default()
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UtilConfig {
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl UtilConfig {
    /// File names looked up by [`UtilConfig::discover`], in priority order.
    pub const CONFIG_FILES: &'static [&'static str] =
        &[".reshape-util.jsonc", ".reshape-util.json"];

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from JSON or JSONC text.
    ///
    /// An empty document yields the default configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| ConfigError::parse(e.to_string()))?;

        match value {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ConfigError::invalid(e.to_string())),
            None => Ok(Self::default()),
        }
    }

    /// Finds and loads the first config file present in `dir`.
    ///
    /// Returns the default configuration when none exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        for name in Self::CONFIG_FILES {
            let path = dir.join(name);
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        debug!("No config file found in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Default configuration file contents written by `init`.
    pub fn template() -> &'static str {
        r#"{
  // Options for validating node trees.
  "validator": {
    // Require "content" on every tag, text, comment and code node.
    "requireContent": false,
    // Marker a code node uses to refer to its captured "nodes".
    "codeMarker": "__nodes"
  }
}
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_config_default() {
        let config = UtilConfig::new();
        assert!(!config.validator.require_content);
        assert_eq!(config.validator.code_marker, "__nodes");
        assert!(config.base_dir.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{ "validator": { "requireContent": true } }"#;
        let config = UtilConfig::from_json(json).unwrap();

        assert!(config.validator.require_content);
        assert_eq!(config.validator.code_marker, "__nodes");
    }

    #[test]
    fn test_config_accepts_jsonc() {
        let json = r#"{
            // strict mode
            "validator": {
                "codeMarker": "__captured", /* custom helper */
            },
        }"#;
        let config = UtilConfig::from_json(json).unwrap();

        assert_eq!(config.validator.code_marker, "__captured");
    }

    #[test]
    fn test_config_empty_document_is_default() {
        assert_eq!(UtilConfig::from_json("").unwrap(), UtilConfig::default());
    }

    #[test]
    fn test_template_parses_to_default() {
        let config = UtilConfig::from_json(UtilConfig::template()).unwrap();
        assert_eq!(config, UtilConfig::default());
    }

    #[rstest]
    #[case::unknown_property(r#"{ "validatorr": {} }"#, "Invalid config")]
    #[case::unknown_nested_property(r#"{ "validator": { "strict": true } }"#, "Invalid config")]
    #[case::type_mismatch(r#"{ "validator": { "requireContent": "yes" } }"#, "Invalid config")]
    #[case::syntax_error(r#"{ "validator": "#, "Failed to parse config")]
    fn test_config_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let err = UtilConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".reshape-util.json"),
            r#"{ "validator": { "codeMarker": "json" } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(".reshape-util.jsonc"),
            r#"{ "validator": { "codeMarker": "jsonc" } }"#,
        )
        .unwrap();

        let config = UtilConfig::discover(dir.path()).unwrap();
        assert_eq!(config.validator.code_marker, "jsonc");
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = UtilConfig::discover(dir.path()).unwrap();
        assert_eq!(config, UtilConfig::default());
    }

    #[test]
    fn test_from_file_missing() {
        let err = UtilConfig::from_file("/nonexistent/.reshape-util.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
