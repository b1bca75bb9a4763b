//! Visitor trait for traversing nodes.
//!
//! Each `visit_*` method has a default implementation that walks nested
//! nodes, so a visitor only overrides the node types it cares about.

use std::ops::ControlFlow;

use crate::{CodeNode, CommentNode, Node, OtherNode, TagNode, TextNode};

use super::walk::{walk_code, walk_tag};

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing nodes without modification.
///
/// The `'a` lifetime ties visited nodes to the tree being walked, so a
/// visitor can keep references to what it sees.
pub trait Visitor<'a>: Sized {
    /// Called before a node is dispatched to its `visit_*` method.
    #[inline]
    fn enter_node(&mut self, _node: &'a Node) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and everything nested in it has been visited.
    #[inline]
    fn exit_node(&mut self, _node: &'a Node) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn visit_tag(&mut self, node: &'a TagNode) -> VisitResult {
        walk_tag(self, node)
    }

    fn visit_text(&mut self, _node: &'a TextNode) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn visit_comment(&mut self, _node: &'a CommentNode) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn visit_code(&mut self, node: &'a CodeNode) -> VisitResult {
        walk_code(self, node)
    }

    fn visit_other(&mut self, _node: &'a OtherNode) -> VisitResult {
        ControlFlow::Continue(())
    }
}
