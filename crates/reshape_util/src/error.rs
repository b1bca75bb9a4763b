//! Error types.
//!
//! Every violation found by the validator or the rewriter is reported as a
//! [`UtilError`]: a message identifying what went wrong plus the offending
//! node, rendered so that it is recognisable as coming from this crate.

use serde_json::Value;
use thiserror::Error;

/// Name shown as the origin of every [`UtilError`].
pub const ORIGIN: &str = "reshape-util";

/// What rule a node (or a transform result) broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The node is not a JSON object, or is an array.
    #[error("node must be an object")]
    NotAnObject,

    /// The tree is not an array of nodes.
    #[error("tree must be an array of nodes")]
    NotATree,

    /// The node has no (or an empty) `type`.
    #[error("node must have a \"type\" property")]
    MissingType,

    /// `tag.content` is present but not an array.
    #[error("tag node's content must be an array")]
    InvalidTagContent,

    /// `tag.attrs` is present but not a plain object.
    #[error("attributes must be an object")]
    InvalidAttrs,

    /// An attribute value is not an array of nodes.
    #[error("attribute value for {name} must be an array")]
    InvalidAttrValue { name: String },

    /// `text|comment|code.content` is present but not a string.
    #[error("{node_type} node contents should be a string")]
    InvalidScalarContent { node_type: String },

    /// `content` is absent and the validator requires it.
    #[error("{node_type} node must have a \"content\" property")]
    MissingContent { node_type: String },

    /// A code node mentions `__nodes` but carries no `nodes`.
    #[error("You must have a \"nodes\" property in order to use the \"{marker}\" code helper")]
    MissingNodesForCodeReference { marker: String },

    /// `code.nodes` is present but not an array.
    #[error("\"nodes\" property must be an array")]
    InvalidNodesField,

    /// A transform returned something other than a node, a node sequence or
    /// a falsy value.
    #[error("invalid replacement node")]
    InvalidReplacementNode,

    /// The node passed every shape check but could not be converted to the
    /// typed model.
    #[error("node could not be read: {0}")]
    Deserialize(String),
}

/// A structural violation, carrying the offending node for diagnostics.
///
/// The display form is:
///
/// ```text
/// <message>
/// From: reshape-util
///
/// Node: <pretty-printed JSON of the node>
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}\nFrom: reshape-util\n\nNode: {}", render_node(.node))]
pub struct UtilError {
    kind: ErrorKind,
    node: Value,
}

impl UtilError {
    /// Creates an error for `kind` carrying `node`.
    pub fn new(kind: ErrorKind, node: Value) -> Self {
        Self { kind, node }
    }

    /// Creates an error for `kind` from anything serializable, typically a
    /// typed [`reshape_ast::Node`].
    pub fn with_node<T: serde::Serialize>(kind: ErrorKind, node: &T) -> Self {
        let node = serde_json::to_value(node).unwrap_or(Value::Null);
        Self { kind, node }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The offending node (or value, for invalid replacements).
    pub fn node(&self) -> &Value {
        &self.node
    }

    /// Message without the provenance and node payload.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

fn render_node(node: &Value) -> String {
    serde_json::to_string_pretty(node).unwrap_or_else(|_| node.to_string())
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON/JSONC.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The configuration parsed but does not describe a valid config.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
