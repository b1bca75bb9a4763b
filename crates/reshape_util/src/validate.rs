//! Node schema validation.
//!
//! Two layers are provided:
//!
//! - The JSON layer ([`Validator::validate_node`], [`Validator::validate_tree`])
//!   checks trees in the wire shape the parser hands over, where anything can
//!   be in any field. Every shape rule is checked here.
//! - The typed layer ([`Validator::check_node`], [`Validator::check_tree`])
//!   checks [`Node`] values. Most shape rules are guaranteed by the types, so
//!   only the cross-field rules remain: a code node that refers to its
//!   captured nodes must carry them, and, in strict mode, content is required.
//!
//! Both layers stop at the first violation. Trees are checked depth-first in
//! document order, each node before the nodes nested in it (attribute value
//! sub-trees, then children, then captured code nodes).
//!
//! A field whose value is JSON `null` is treated as absent.

use std::ops::ControlFlow;
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{ErrorKind, UtilError, ValidatorConfig};
use reshape_ast::visitor::{VisitResult, Visitor, walk_tree};
use reshape_ast::{Node, NodeKind, Tree};

/// Checks nodes against the shape rules under a [`ValidatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Checks exactly one node in its JSON form. Nested nodes are not visited.
    pub fn validate_node(&self, node: &Value) -> Result<(), UtilError> {
        let fields = match node {
            Value::Object(fields) => fields,
            _ => return Err(UtilError::new(ErrorKind::NotAnObject, node.clone())),
        };

        let node_type = match fields.get("type") {
            Some(Value::String(node_type)) if !node_type.is_empty() => node_type.as_str(),
            _ => return Err(UtilError::new(ErrorKind::MissingType, node.clone())),
        };

        let fail = |kind: ErrorKind| Err(UtilError::new(kind, node.clone()));
        let kind = NodeKind::of(node_type);

        if kind == NodeKind::Tag {
            match present(fields, "content") {
                Some(Value::Array(_)) => {}
                Some(_) => return fail(ErrorKind::InvalidTagContent),
                None if self.config.require_content => {
                    return fail(missing_content(node_type));
                }
                None => {}
            }

            if let Some(attrs) = present(fields, "attrs") {
                let Value::Object(attrs) = attrs else {
                    return fail(ErrorKind::InvalidAttrs);
                };
                for (name, value) in attrs {
                    if !value.is_array() {
                        return fail(ErrorKind::InvalidAttrValue { name: name.clone() });
                    }
                }
            }
        }

        if kind.has_scalar_content() {
            match present(fields, "content") {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return fail(ErrorKind::InvalidScalarContent {
                        node_type: node_type.to_string(),
                    });
                }
                None if self.config.require_content => {
                    return fail(missing_content(node_type));
                }
                None => {}
            }
        }

        if kind == NodeKind::Code {
            let references = present(fields, "content")
                .and_then(Value::as_str)
                .is_some_and(|content| content.contains(&self.config.code_marker));

            match present(fields, "nodes") {
                Some(Value::Array(_)) => {}
                Some(_) => return fail(ErrorKind::InvalidNodesField),
                None if references => return fail(self.missing_nodes()),
                None => {}
            }
        }

        Ok(())
    }

    /// Checks every node of a JSON tree, at every depth.
    pub fn validate_tree(&self, tree: &Value) -> Result<(), UtilError> {
        let Value::Array(nodes) = tree else {
            return Err(UtilError::new(ErrorKind::NotATree, tree.clone()));
        };

        self.validate_nodes(nodes).inspect_err(|err| {
            debug!("Tree failed validation: {}", err.message());
        })
    }

    fn validate_nodes(&self, nodes: &[Value]) -> Result<(), UtilError> {
        for node in nodes {
            self.validate_subtree(node)?;
        }
        Ok(())
    }

    fn validate_subtree(&self, node: &Value) -> Result<(), UtilError> {
        self.validate_node(node)?;

        // The node itself passed, so every nested field below has the
        // expected container type when present.
        let Value::Object(fields) = node else {
            return Ok(());
        };

        if let Some(Value::Object(attrs)) = present(fields, "attrs") {
            for value in attrs.values() {
                if let Value::Array(nodes) = value {
                    self.validate_nodes(nodes)?;
                }
            }
        }
        if let Some(Value::Array(content)) = present(fields, "content") {
            self.validate_nodes(content)?;
        }
        if let Some(Value::Array(nodes)) = present(fields, "nodes") {
            self.validate_nodes(nodes)?;
        }

        Ok(())
    }

    /// Checks exactly one typed node. Nested nodes are not visited.
    pub fn check_node(&self, node: &Node) -> Result<(), UtilError> {
        let require = self.config.require_content;
        let fail = |kind: ErrorKind| Err(UtilError::with_node(kind, node));

        match node {
            Node::Tag(tag) if require && tag.content.is_none() => {
                fail(missing_content(node.node_type()))
            }
            Node::Text(text) if require && text.content.is_none() => {
                fail(missing_content(node.node_type()))
            }
            Node::Comment(comment) if require && comment.content.is_none() => {
                fail(missing_content(node.node_type()))
            }
            Node::Code(code) => {
                if require && code.content.is_none() {
                    return fail(missing_content(node.node_type()));
                }
                if code.nodes.is_none() && code.references(&self.config.code_marker) {
                    return fail(self.missing_nodes());
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Checks every node of a typed tree, at every depth.
    pub fn check_tree(&self, tree: &[Node]) -> Result<(), UtilError> {
        let mut checker = TreeChecker {
            validator: self,
            error: None,
        };
        let _ = walk_tree(&mut checker, tree);

        match checker.error {
            Some(err) => {
                debug!("Tree failed validation: {}", err.message());
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Validates a JSON node (and everything nested in it) and converts it to
    /// a typed [`Node`].
    pub fn parse_node(&self, value: Value) -> Result<Node, UtilError> {
        self.validate_subtree(&value)?;
        match Node::deserialize(&value) {
            Ok(node) => Ok(node),
            Err(e) => Err(UtilError::new(ErrorKind::Deserialize(e.to_string()), value)),
        }
    }

    /// Validates a JSON tree and converts it to a typed [`Tree`].
    pub fn parse_tree(&self, value: Value) -> Result<Tree, UtilError> {
        self.validate_tree(&value)?;
        match Tree::deserialize(&value) {
            Ok(tree) => Ok(tree),
            Err(e) => Err(UtilError::new(ErrorKind::Deserialize(e.to_string()), value)),
        }
    }

    fn missing_nodes(&self) -> ErrorKind {
        ErrorKind::MissingNodesForCodeReference {
            marker: self.config.code_marker.clone(),
        }
    }
}

struct TreeChecker<'v> {
    validator: &'v Validator,
    error: Option<UtilError>,
}

impl<'a> Visitor<'a> for TreeChecker<'_> {
    fn enter_node(&mut self, node: &'a Node) -> VisitResult {
        match self.validator.check_node(node) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                self.error = Some(err);
                ControlFlow::Break(())
            }
        }
    }
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn missing_content(node_type: &str) -> ErrorKind {
    ErrorKind::MissingContent {
        node_type: node_type.to_string(),
    }
}

fn default_validator() -> &'static Validator {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    VALIDATOR.get_or_init(Validator::default)
}

/// Checks exactly one JSON node with the default configuration.
pub fn validate_node(node: &Value) -> Result<(), UtilError> {
    default_validator().validate_node(node)
}

/// Checks every node of a JSON tree with the default configuration.
pub fn validate_tree(tree: &Value) -> Result<(), UtilError> {
    default_validator().validate_tree(tree)
}

/// Checks exactly one typed node with the default configuration.
pub fn check_node(node: &Node) -> Result<(), UtilError> {
    default_validator().check_node(node)
}

/// Checks every node of a typed tree with the default configuration.
pub fn check_tree(tree: &[Node]) -> Result<(), UtilError> {
    default_validator().check_tree(tree)
}

/// Validates and converts a JSON node with the default configuration.
pub fn parse_node(value: Value) -> Result<Node, UtilError> {
    default_validator().parse_node(value)
}

/// Validates and converts a JSON tree with the default configuration.
pub fn parse_tree(value: Value) -> Result<Tree, UtilError> {
    default_validator().parse_tree(value)
}
