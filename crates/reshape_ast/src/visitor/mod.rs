//! Visitor pattern for read-only tree traversal.
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_node`] - Dispatch function for type-specific visitors
//! - [`walk_tree`] - Traverse every node of a tree in document order
//!
//! Traversal is depth-first and pre-order. It descends into every place a
//! node can hold other nodes: tag attribute values, tag children and the
//! captured `nodes` of a code node.
//!
//! # Example
//!
//! ```rust
//! use reshape_ast::Node;
//! use reshape_ast::visitor::{Visitor, VisitResult, walk_tree};
//! use reshape_ast::TextNode;
//! use std::ops::ControlFlow;
//!
//! struct TextCollector<'a> {
//!     texts: Vec<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for TextCollector<'a> {
//!     fn visit_text(&mut self, node: &'a TextNode) -> VisitResult {
//!         if let Some(text) = node.content.as_deref() {
//!             self.texts.push(text);
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let tree = vec![Node::tag("p", vec![Node::text("hello")]), Node::text("world")];
//!
//! let mut collector = TextCollector { texts: Vec::new() };
//! let _ = walk_tree(&mut collector, &tree);
//! assert_eq!(collector.texts, vec!["hello", "world"]);
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_code, walk_node, walk_tag, walk_tree};

use std::ops::ControlFlow;

use crate::Node;

/// Counts every node in a tree, at every depth.
pub fn count_nodes(tree: &[Node]) -> usize {
    struct Counter(usize);

    impl<'a> Visitor<'a> for Counter {
        fn enter_node(&mut self, _node: &'a Node) -> VisitResult {
            self.0 += 1;
            ControlFlow::Continue(())
        }
    }

    let mut counter = Counter(0);
    let _ = walk_tree(&mut counter, tree);
    counter.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagNode;

    #[test]
    fn test_count_nodes_includes_attrs_and_captured_nodes() {
        let tree = vec![
            Node::Tag(
                TagNode::new("div")
                    .with_attr("class", vec![Node::text("a"), Node::code("locals.b")])
                    .with_content(vec![
                        Node::tag("p", vec![Node::text("hi")]),
                        Node::code_with_nodes("__nodes[0]", vec![Node::text("x")]),
                    ]),
            ),
            Node::comment("end"),
        ];

        // div, 2 attr nodes, p, text, code, captured text, comment
        assert_eq!(count_nodes(&tree), 8);
    }

    #[test]
    fn test_count_nodes_empty() {
        assert_eq!(count_nodes(&[]), 0);
    }
}
