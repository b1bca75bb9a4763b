//! Output formatting module

mod json;
mod text;

use miette::Result;

use crate::cli::OutputFormat;
use crate::commands::validate::FileReport;

/// Prints reports and returns whether any file was invalid.
pub fn output_reports(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = reports.iter().any(|r| !r.is_valid());

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_errors)
}
