//! # reshape_util
//!
//! Tree utilities for reshape plugins.
//!
//! This crate provides:
//! - [`modify_nodes`]: a bottom-up, order-preserving rewrite of a node tree
//!   driven by async `criteria` and `transform` callbacks
//! - [`validate_node`] / [`validate_tree`]: fail-fast checks of the node
//!   shape rules on the JSON form handed over by a parser
//! - [`check_node`] / [`check_tree`]: the same rules for typed trees
//! - [`UtilError`]: the single structured error both report through
//!
//! ## Example
//!
//! ```rust,ignore
//! use reshape_util::{UtilError, modify_nodes, parse_tree};
//!
//! let tree = parse_tree(serde_json::from_str(&parser_output)?)?;
//!
//! let tree = modify_nodes(
//!     tree,
//!     async |node: &Node| Ok::<_, UtilError>(node.is_tag_named("p")),
//!     async |node: Node| Ok::<_, UtilError>(vec![node.clone(), node]),
//! )
//! .await?;
//! ```

mod config;
mod error;
mod rewrite;
mod validate;

pub use config::{UtilConfig, ValidatorConfig};
pub use error::{ConfigError, ErrorKind, ORIGIN, UtilError};
pub use rewrite::{IntoReplacement, Replacement, modify_nodes};
pub use validate::{
    Validator, check_node, check_tree, parse_node, parse_tree, validate_node, validate_tree,
};

pub use reshape_ast::{Node, Tree};
