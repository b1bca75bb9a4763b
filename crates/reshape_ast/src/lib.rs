//! # reshape_ast
//!
//! Node definitions for reshape document trees.
//!
//! A document tree is an ordered sequence of [`Node`]s produced by a markup or
//! template parser. Nodes are a closed sum type over the four enforced node
//! types (`tag`, `text`, `comment`, `code`) plus [`OtherNode`], which carries any
//! other `type` through untouched.
//!
//! ## Wire format
//!
//! Nodes serialize to the same JSON shape the parser emits:
//!
//! ```json
//! { "type": "tag", "name": "p", "content": [{ "type": "text", "content": "hi" }] }
//! ```
//!
//! Fields this crate does not interpret (pipeline metadata) are kept in an
//! `extra` map on every node and written back on serialization.
//!
//! ## Example
//!
//! ```rust
//! use reshape_ast::{Node, Tree};
//!
//! let tree: Tree = vec![Node::tag("p", vec![Node::text("hello")])];
//!
//! let json = serde_json::to_value(&tree).unwrap();
//! assert_eq!(json[0]["type"], "tag");
//! assert_eq!(json[0]["content"][0]["content"], "hello");
//! ```

mod attrs;
mod location;
mod node;
pub mod visitor;

pub use attrs::Attributes;
pub use location::Location;
pub use node::{
    CAPTURED_NODES_MARKER, CodeNode, CommentNode, Node, NodeKind, OtherNode, TagNode, TextNode,
    Tree,
};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor, count_nodes};
