//! Bottom-up tree rewriting.
//!
//! [`modify_nodes`] walks a tree and hands every node matching a caller
//! supplied `criteria` to a caller supplied `transform`. The transform's
//! result replaces the node: one node, any number of nodes, or none.
//!
//! Children are rewritten before their parent is tested, so a transform on a
//! tag always sees its already-rewritten content. Nodes are processed one at
//! a time in document order and every `criteria`/`transform` future is
//! driven to completion before the next one is created, which keeps
//! order-dependent transforms (sequential ids, counters) deterministic.
//!
//! Only tag `content` is descended into. Attribute value sub-trees and the
//! captured `nodes` of code nodes are left to the transform.

use serde_json::Value;
use tracing::{debug, trace};

use crate::{ErrorKind, UtilError, parse_node};
use reshape_ast::{Node, Tree};

/// What a matched node is replaced with.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Replace the node in place.
    Node(Node),
    /// Splice zero or more nodes where the node was.
    Nodes(Vec<Node>),
    /// Drop the node.
    Remove,
}

/// Conversion of a transform's return value into a [`Replacement`].
pub trait IntoReplacement {
    fn into_replacement(self) -> Result<Replacement, UtilError>;
}

impl IntoReplacement for Replacement {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(self)
    }
}

impl IntoReplacement for Node {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(Replacement::Node(self))
    }
}

impl IntoReplacement for Vec<Node> {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(Replacement::Nodes(self))
    }
}

impl IntoReplacement for Option<Node> {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(self.map_or(Replacement::Remove, Replacement::Node))
    }
}

impl IntoReplacement for Option<Vec<Node>> {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(self.map_or(Replacement::Remove, Replacement::Nodes))
    }
}

impl IntoReplacement for () {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        Ok(Replacement::Remove)
    }
}

/// JSON results follow the loose rules plugins written against the JSON
/// form expect:
///
/// - an array splices its elements, each of which must be a valid node
/// - an object replaces the node and must be a valid node
/// - `null`, `false`, `0` and `""` remove the node
/// - anything else fails with [`ErrorKind::InvalidReplacementNode`]
impl IntoReplacement for Value {
    fn into_replacement(self) -> Result<Replacement, UtilError> {
        match self {
            Value::Array(values) => values
                .into_iter()
                .map(parse_node)
                .collect::<Result<Vec<_>, _>>()
                .map(Replacement::Nodes),
            value @ Value::Object(_) => parse_node(value).map(Replacement::Node),
            value if is_falsy(&value) => Ok(Replacement::Remove),
            value => Err(UtilError::new(ErrorKind::InvalidReplacementNode, value)),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Counters collected over one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RewriteStats {
    /// Nodes tested against the criteria.
    visited: usize,
    /// Nodes the criteria selected.
    matched: usize,
    /// Matched nodes replaced by exactly one node.
    replaced: usize,
    /// Matched nodes dropped, including splices of zero nodes.
    removed: usize,
    /// Nodes spliced in by transforms returning a sequence.
    inserted: usize,
}

/// Rewrites `tree` bottom-up, replacing every node selected by `criteria`
/// with the result of `transform`.
///
/// `criteria` is evaluated once per node, after the node's children have
/// been rewritten. `transform` is only called for selected nodes and takes
/// the node by value; anything implementing [`IntoReplacement`] can be
/// returned.
///
/// The first error from `criteria`, `transform` or an invalid replacement
/// aborts the pass; no partial tree is returned. Replacements are not
/// validated beyond what is needed to build them; run
/// [`check_tree`](crate::check_tree) on the result when transforms are not
/// trusted.
///
/// # Example
///
/// ```rust
/// use reshape_ast::Node;
/// use reshape_util::{UtilError, modify_nodes};
///
/// let tree = vec![Node::tag("p", vec![Node::text("hello")]), Node::text("bye")];
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let tree = runtime.block_on(modify_nodes(
///     tree,
///     async |node: &Node| Ok::<_, UtilError>(node.is_tag_named("p")),
///     async |node: Node| Ok::<_, UtilError>(vec![node.clone(), node]),
/// ))?;
///
/// assert_eq!(tree.len(), 3);
/// # Ok::<_, UtilError>(())
/// ```
pub async fn modify_nodes<C, T, R, E>(tree: Tree, mut criteria: C, mut transform: T) -> Result<Tree, E>
where
    C: AsyncFnMut(&Node) -> Result<bool, E>,
    T: AsyncFnMut(Node) -> Result<R, E>,
    R: IntoReplacement,
    E: From<UtilError>,
{
    let mut stats = RewriteStats::default();
    let tree = modify_tree(tree, &mut criteria, &mut transform, &mut stats).await?;

    debug!(
        visited = stats.visited,
        matched = stats.matched,
        replaced = stats.replaced,
        removed = stats.removed,
        inserted = stats.inserted,
        "Rewrite pass complete"
    );

    Ok(tree)
}

async fn modify_tree<C, T, R, E>(
    tree: Tree,
    criteria: &mut C,
    transform: &mut T,
    stats: &mut RewriteStats,
) -> Result<Tree, E>
where
    C: AsyncFnMut(&Node) -> Result<bool, E>,
    T: AsyncFnMut(Node) -> Result<R, E>,
    R: IntoReplacement,
    E: From<UtilError>,
{
    let mut output = Vec::with_capacity(tree.len());

    for mut node in tree {
        if let Node::Tag(tag) = &mut node {
            if let Some(content) = tag.content.take() {
                let content = Box::pin(modify_tree(content, criteria, transform, stats)).await?;
                tag.content = Some(content);
            }
        }

        stats.visited += 1;
        if !criteria(&node).await? {
            output.push(node);
            continue;
        }

        stats.matched += 1;
        trace!("Transforming {} node", node.node_type());

        match transform(node).await?.into_replacement()? {
            Replacement::Node(replacement) => {
                stats.replaced += 1;
                output.push(replacement);
            }
            Replacement::Nodes(replacements) if replacements.is_empty() => {
                stats.removed += 1;
            }
            Replacement::Nodes(replacements) => {
                stats.inserted += replacements.len();
                output.extend(replacements);
            }
            Replacement::Remove => {
                stats.removed += 1;
            }
        }
    }

    Ok(output)
}
