//! Validate command implementation

use std::fs;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result, WrapErr};
use reshape_ast::{Tree, count_nodes};
use reshape_util::{UtilConfig, UtilError, Validator};
use tracing::{debug, info, warn};

use crate::cli::{Cli, OutputFormat};
use crate::output::output_reports;

/// Outcome of validating one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// Number of nodes in the tree, at every depth. Zero when invalid.
    pub nodes: usize,
    pub error: Option<UtilError>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

pub fn run_validate(cli: &Cli, files: &[PathBuf], format: OutputFormat, strict: bool) -> Result<bool> {
    let mut config = load_config(cli)?;
    if strict {
        config.validator.require_content = true;
    }
    debug!("Validator config: {:?}", config.validator);

    let validator = Validator::new(config.validator);
    let reports = files
        .iter()
        .map(|path| validate_file(&validator, path))
        .collect::<Result<Vec<_>>>()?;

    let invalid = reports.iter().filter(|r| !r.is_valid()).count();
    info!("Validated {} files, {} invalid", reports.len(), invalid);

    output_reports(&reports, format)
}

fn load_config(cli: &Cli) -> Result<UtilConfig> {
    match &cli.config {
        Some(path) => UtilConfig::from_file(path).into_diagnostic(),
        None => {
            let cwd = std::env::current_dir().into_diagnostic()?;
            UtilConfig::discover(cwd).into_diagnostic()
        }
    }
}

fn validate_file(validator: &Validator, path: &Path) -> Result<FileReport> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("{} is not valid JSON", path.display()))?;

    let report = match validator.validate_tree(&value) {
        Ok(()) => FileReport {
            path: path.to_path_buf(),
            nodes: tree_size(path, value),
            error: None,
        },
        Err(err) => {
            debug!("{}: {}", path.display(), err);
            FileReport {
                path: path.to_path_buf(),
                nodes: 0,
                error: Some(err),
            }
        }
    };

    Ok(report)
}

/// Counts the nodes of an already validated tree.
fn tree_size(path: &Path, value: serde_json::Value) -> usize {
    match serde_json::from_value::<Tree>(value) {
        Ok(tree) => count_nodes(&tree),
        Err(e) => {
            warn!("{}: could not count nodes: {}", path.display(), e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_validate_file_counts_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tree.json",
            r#"[{ "type": "tag", "name": "p", "content": [{ "type": "text", "content": "hi" }] }]"#,
        );

        let report = validate_file(&Validator::default(), &path).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.nodes, 2);
    }

    #[test]
    fn test_validate_file_reports_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tree.json",
            r#"[{ "type": "code", "content": "__nodes[0]" }]"#,
        );

        let report = validate_file(&Validator::default(), &path).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.nodes, 0);
    }

    #[test]
    fn test_validate_file_accepts_untyped_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tree.json",
            r#"[{ "type": "tag", "name": "p", "location": "1:1",
                 "content": [{ "type": "text", "content": "hi", "location": { "line": 1, "col": 4, "offset": 3 } }] }]"#,
        );

        let report = validate_file(&Validator::default(), &path).unwrap();
        assert!(report.is_valid(), "unexpected error: {:?}", report.error);
        assert_eq!(report.nodes, 2);
    }

    #[test]
    fn test_validate_file_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "tree.json", "[{");

        assert!(validate_file(&Validator::default(), &path).is_err());
    }
}
