//! Source location attached to nodes by the parser.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A position in the source document.
///
/// Lines and columns are 1-indexed, matching what the parser reports.
/// Any other keys the parser attaches (offsets, end positions) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
    /// Source file, when the parser knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Creates a new location without a file name.
    pub fn new(line: u32, col: u32) -> Self {
        Self {
            line,
            col,
            ..Self::default()
        }
    }

    /// Attaches a file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.filename {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "{}:{}", self.line, self.col),
        }
    }
}
