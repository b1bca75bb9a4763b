//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use crate::commands::validate::FileReport;

pub fn output_json(reports: &[FileReport]) -> Result<()> {
    let output: Vec<_> = reports
        .iter()
        .map(|r| {
            let error = r.error.as_ref().map(|e| {
                serde_json::json!({
                    "message": e.message(),
                    "node": e.node(),
                })
            });
            serde_json::json!({
                "path": r.path.display().to_string(),
                "valid": r.is_valid(),
                "nodes": r.nodes,
                "error": error,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
