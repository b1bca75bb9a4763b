//! Walk functions for tree traversal.
//!
//! These provide the traversal logic used by the default implementations
//! in the `Visitor` trait.

use crate::{CodeNode, Node, TagNode};

use super::visit::{VisitResult, Visitor};

/// Walks a node by dispatching to the appropriate type-specific visitor method.
///
/// 1. Calls `enter_node` on the visitor
/// 2. Dispatches to the `visit_*` method for the node's type
/// 3. Calls `exit_node` on the visitor
pub fn walk_node<'a, V>(visitor: &mut V, node: &'a Node) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;

    match node {
        Node::Tag(tag) => visitor.visit_tag(tag)?,
        Node::Text(text) => visitor.visit_text(text)?,
        Node::Comment(comment) => visitor.visit_comment(comment)?,
        Node::Code(code) => visitor.visit_code(code)?,
        Node::Other(other) => visitor.visit_other(other)?,
    }

    visitor.exit_node(node)
}

/// Walks every node of a tree in document order.
pub fn walk_tree<'a, V>(visitor: &mut V, tree: &'a [Node]) -> VisitResult
where
    V: Visitor<'a>,
{
    for node in tree {
        walk_node(visitor, node)?;
    }
    std::ops::ControlFlow::Continue(())
}

/// Walks a tag's attribute value sub-trees, then its children.
pub fn walk_tag<'a, V>(visitor: &mut V, tag: &'a TagNode) -> VisitResult
where
    V: Visitor<'a>,
{
    if let Some(attrs) = &tag.attrs {
        for (_, value) in attrs.iter() {
            walk_tree(visitor, value)?;
        }
    }

    match &tag.content {
        Some(content) => walk_tree(visitor, content),
        None => std::ops::ControlFlow::Continue(()),
    }
}

/// Walks the captured nodes of a code node.
pub fn walk_code<'a, V>(visitor: &mut V, code: &'a CodeNode) -> VisitResult
where
    V: Visitor<'a>,
{
    match &code.nodes {
        Some(nodes) => walk_tree(visitor, nodes),
        None => std::ops::ControlFlow::Continue(()),
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::TextNode;

    struct Recorder {
        events: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl<'a> Visitor<'a> for Recorder {
        fn enter_node(&mut self, node: &'a Node) -> VisitResult {
            self.events.push(format!("enter:{}", node.node_type()));
            ControlFlow::Continue(())
        }

        fn exit_node(&mut self, node: &'a Node) -> VisitResult {
            self.events.push(format!("exit:{}", node.node_type()));
            ControlFlow::Continue(())
        }

        fn visit_text(&mut self, node: &'a TextNode) -> VisitResult {
            let content = node.content.as_deref().unwrap_or_default();
            self.events.push(format!("text:{}", content));
            if self.stop_at == Some(content) {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_walk_order_is_pre_order_with_attrs_first() {
        let tree = vec![Node::Tag(
            TagNode::new("p")
                .with_attr("title", vec![Node::text("t")])
                .with_content(vec![Node::text("body")]),
        )];

        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: None,
        };
        let result = walk_tree(&mut recorder, &tree);

        assert_eq!(result, ControlFlow::Continue(()));
        assert_eq!(
            recorder.events,
            vec![
                "enter:tag",
                "enter:text",
                "text:t",
                "exit:text",
                "enter:text",
                "text:body",
                "exit:text",
                "exit:tag",
            ]
        );
    }

    #[test]
    fn test_walk_stops_on_break() {
        let tree = vec![Node::text("a"), Node::text("stop"), Node::text("c")];

        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: Some("stop"),
        };
        let result = walk_tree(&mut recorder, &tree);

        assert_eq!(result, ControlFlow::Break(()));
        assert!(!recorder.events.iter().any(|e| e == "text:c"));
    }
}
