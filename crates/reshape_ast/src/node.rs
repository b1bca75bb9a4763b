//! Node definition.
//!
//! The core tree node type shared by the rewriter, the validator and any
//! plugin that consumes a parsed document.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::{Attributes, Location};

/// Substring in a code node's content that refers to its captured `nodes`
/// by position (`__nodes[0]`, `__nodes[1]`, ...).
pub const CAPTURED_NODES_MARKER: &str = "__nodes";

/// An ordered sequence of nodes in document order.
pub type Tree = Vec<Node>;

/// A node in a document tree.
///
/// Each enforced node type carries only its legal fields. Any other `type`
/// is kept as an [`OtherNode`] so the open set of node types survives a round
/// trip through this crate.
///
/// # Example
///
/// ```rust
/// use reshape_ast::{Node, NodeKind};
///
/// let node: Node = serde_json::from_str(
///     r#"{ "type": "tag", "name": "p", "content": [{ "type": "text", "content": "hi" }] }"#,
/// ).unwrap();
///
/// assert_eq!(node.kind(), NodeKind::Tag);
/// assert!(node.is_tag_named("p"));
/// assert_eq!(node.children().unwrap()[0].text_content(), Some("hi"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A markup element.
    Tag(TagNode),
    /// Literal text.
    Text(TextNode),
    /// A markup comment.
    Comment(CommentNode),
    /// An embedded expression.
    Code(CodeNode),
    /// A node of a type this crate does not enforce.
    Other(OtherNode),
}

/// Discriminant of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tag,
    Text,
    Comment,
    Code,
    Other,
}

impl NodeKind {
    /// Maps a wire `type` string to its kind.
    pub fn of(node_type: &str) -> Self {
        match node_type {
            "tag" => NodeKind::Tag,
            "text" => NodeKind::Text,
            "comment" => NodeKind::Comment,
            "code" => NodeKind::Code,
            _ => NodeKind::Other,
        }
    }

    /// Returns true for the node types whose `content` is a plain string.
    #[inline]
    pub const fn has_scalar_content(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Comment | NodeKind::Code)
    }
}

/// A markup element with optional attributes and children.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TagNode {
    /// Element name (`p`, `div`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Attributes, each holding a value sub-tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attributes>,

    /// Child nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Pipeline metadata this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Literal text.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A markup comment.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An embedded expression.
///
/// When `content` mentions [`CAPTURED_NODES_MARKER`], `nodes` holds the
/// captured nodes the expression refers to by index.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CodeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node whose `type` is outside the enforced set. All fields other than
/// `type` are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherNode {
    pub node_type: String,
    pub fields: Map<String, Value>,
}

impl TagNode {
    /// Creates a named tag with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    /// Adds (or replaces) an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: Vec<Node>) -> Self {
        self.attrs
            .get_or_insert_with(Attributes::new)
            .insert(name, value);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.extra.shift_remove("location");
        self.location = Some(location);
        self
    }
}

impl CodeNode {
    /// Returns true if the expression refers to captured nodes via `marker`.
    pub fn references(&self, marker: &str) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| content.contains(marker))
    }
}

impl Node {
    /// Creates a tag node with the given children.
    pub fn tag(name: impl Into<String>, content: Vec<Node>) -> Self {
        Node::Tag(TagNode::new(name).with_content(content))
    }

    /// Creates a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode {
            content: Some(content.into()),
            ..TextNode::default()
        })
    }

    /// Creates a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment(CommentNode {
            content: Some(content.into()),
            ..CommentNode::default()
        })
    }

    /// Creates a code node.
    pub fn code(content: impl Into<String>) -> Self {
        Node::Code(CodeNode {
            content: Some(content.into()),
            ..CodeNode::default()
        })
    }

    /// Creates a code node that captures `nodes` for `__nodes[i]` references.
    pub fn code_with_nodes(content: impl Into<String>, nodes: Vec<Node>) -> Self {
        Node::Code(CodeNode {
            content: Some(content.into()),
            nodes: Some(nodes),
            ..CodeNode::default()
        })
    }

    /// Returns the kind of this node.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Tag(_) => NodeKind::Tag,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::Code(_) => NodeKind::Code,
            Node::Other(_) => NodeKind::Other,
        }
    }

    /// Returns the wire `type` of this node.
    pub fn node_type(&self) -> &str {
        match self {
            Node::Tag(_) => "tag",
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
            Node::Code(_) => "code",
            Node::Other(other) => &other.node_type,
        }
    }

    /// Returns the element name of a tag node.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Tag(tag) => tag.name.as_deref(),
            _ => None,
        }
    }

    /// Returns true if this is a tag node with the given name.
    pub fn is_tag_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Node::Tag(tag) => tag.location.as_ref(),
            Node::Text(text) => text.location.as_ref(),
            Node::Comment(comment) => comment.location.as_ref(),
            Node::Code(code) => code.location.as_ref(),
            Node::Other(_) => None,
        }
    }

    /// Returns the string content of a text, comment or code node.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Node::Text(text) => text.content.as_deref(),
            Node::Comment(comment) => comment.content.as_deref(),
            Node::Code(code) => code.content.as_deref(),
            Node::Tag(_) | Node::Other(_) => None,
        }
    }

    /// Returns the children of a tag node.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Tag(tag) => tag.content.as_deref(),
            _ => None,
        }
    }

    /// Returns the children of a tag node mutably.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Tag(tag) => tag.content.as_mut(),
            _ => None,
        }
    }

    /// Returns true if this is a code node that refers to captured nodes.
    pub fn references_captured_nodes(&self) -> bool {
        match self {
            Node::Code(code) => code.references(CAPTURED_NODES_MARKER),
            _ => false,
        }
    }

    /// Converts a JSON value into a node.
    ///
    /// This only checks what is needed to build the typed node (an object with
    /// a non-empty string `type` and well-typed fields). Structural diagnostics
    /// with the offending node attached are the validator's job.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = value else {
            return Err(de::Error::custom("node must be an object"));
        };

        let node_type = match fields.shift_remove("type") {
            Some(Value::String(node_type)) if !node_type.is_empty() => node_type,
            _ => return Err(de::Error::custom("node must have a \"type\" property")),
        };

        let kind = NodeKind::of(&node_type);
        let passthrough = take_passthrough(kind, &mut fields);

        let mut node = match kind {
            NodeKind::Tag => Node::Tag(serde_json::from_value(Value::Object(fields))?),
            NodeKind::Text => Node::Text(serde_json::from_value(Value::Object(fields))?),
            NodeKind::Comment => Node::Comment(serde_json::from_value(Value::Object(fields))?),
            NodeKind::Code => Node::Code(serde_json::from_value(Value::Object(fields))?),
            NodeKind::Other => Node::Other(OtherNode { node_type, fields }),
        };
        node.extra_mut().extend(passthrough);

        Ok(node)
    }

    /// Metadata this crate does not interpret.
    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Node::Tag(tag) => &tag.extra,
            Node::Text(text) => &text.extra,
            Node::Comment(comment) => &comment.extra,
            Node::Code(code) => &code.extra,
            Node::Other(other) => &other.fields,
        }
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        match self {
            Node::Tag(tag) => &mut tag.extra,
            Node::Text(text) => &mut text.extra,
            Node::Comment(comment) => &mut comment.extra,
            Node::Code(code) => &mut code.extra,
            Node::Other(other) => &mut other.fields,
        }
    }
}

/// Removes the known keys whose values do not fit their typed field and
/// returns them, so they can be carried verbatim in `extra`.
///
/// A `null` field and a `location` or `name` of another shape are metadata
/// the validator accepts; the remaining mistyped fields are left in place
/// and fail deserialization.
fn take_passthrough(kind: NodeKind, fields: &mut Map<String, Value>) -> Map<String, Value> {
    let keys: &[&str] = match kind {
        NodeKind::Tag => &["name", "attrs", "content", "location"],
        NodeKind::Text | NodeKind::Comment => &["content", "location"],
        NodeKind::Code => &["content", "nodes", "location"],
        NodeKind::Other => &[],
    };

    let mut passthrough = Map::new();
    for &key in keys {
        let typed = match fields.get(key) {
            None => continue,
            Some(Value::Null) => false,
            Some(value) if key == "location" => Location::deserialize(value).is_ok(),
            Some(value) if key == "name" => value.is_string(),
            Some(_) => true,
        };
        if !typed && let Some(value) = fields.shift_remove(key) {
            passthrough.insert(key.to_string(), value);
        }
    }
    passthrough
}

impl From<TagNode> for Node {
    fn from(node: TagNode) -> Self {
        Node::Tag(node)
    }
}

impl From<TextNode> for Node {
    fn from(node: TextNode) -> Self {
        Node::Text(node)
    }
}

impl From<CommentNode> for Node {
    fn from(node: CommentNode) -> Self {
        Node::Comment(node)
    }
}

impl From<CodeNode> for Node {
    fn from(node: CodeNode) -> Self {
        Node::Code(node)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(serde::Serialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum Tagged<'a> {
            Tag(&'a TagNode),
            Text(&'a TextNode),
            Comment(&'a CommentNode),
            Code(&'a CodeNode),
        }

        match self {
            Node::Tag(node) => Tagged::Tag(node).serialize(serializer),
            Node::Text(node) => Tagged::Text(node).serialize(serializer),
            Node::Comment(node) => Tagged::Comment(node).serialize(serializer),
            Node::Code(node) => Tagged::Code(node).serialize(serializer),
            Node::Other(node) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &node.node_type)?;
                for (key, value) in node.fields.iter().filter(|(key, _)| *key != "type") {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(value).map_err(de::Error::custom)
    }
}
