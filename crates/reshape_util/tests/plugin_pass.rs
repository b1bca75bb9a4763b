//! End-to-end plugin passes: parse a parser-produced tree, rewrite it, and
//! validate the result.

use pretty_assertions::assert_eq;
use reshape_util::{ErrorKind, Node, Tree, UtilError, check_tree, modify_nodes, parse_tree};
use serde_json::{Value, json};

/// `<div class="wow">\n  <p>hello world</p>\n</div>\n`
fn basic() -> Value {
    json!([
        {
            "type": "tag",
            "name": "div",
            "attrs": { "class": [{ "type": "text", "content": "wow", "location": { "line": 1, "col": 12 } }] },
            "content": [
                { "type": "text", "content": "\n  ", "location": { "line": 1, "col": 18 } },
                {
                    "type": "tag",
                    "name": "p",
                    "content": [{ "type": "text", "content": "hello world", "location": { "line": 2, "col": 6 } }],
                    "location": { "line": 2, "col": 3 }
                },
                { "type": "text", "content": "\n", "location": { "line": 2, "col": 21 } }
            ],
            "location": { "line": 1, "col": 1 }
        },
        { "type": "text", "content": "\n", "location": { "line": 3, "col": 7 } }
    ])
}

fn paragraphs(tree: &Tree) -> Vec<&Node> {
    tree[0]
        .children()
        .unwrap()
        .iter()
        .filter(|n| n.is_tag_named("p"))
        .collect()
}

#[tokio::test]
async fn plugin_changes_node_content() {
    let tree = parse_tree(basic()).unwrap();

    let tree = modify_nodes(
        tree,
        async |n: &Node| Ok::<_, UtilError>(n.is_tag_named("p")),
        async |mut node: Node| {
            if let Some(children) = node.children_mut() {
                children[0] = Node::text("replaced!");
            }
            Ok::<_, UtilError>(node)
        },
    )
    .await
    .unwrap();

    check_tree(&tree).unwrap();
    let p = paragraphs(&tree);
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].children().unwrap()[0].text_content(), Some("replaced!"));

    // Metadata on untouched nodes survives the pass.
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0]["location"], json!({ "line": 1, "col": 1 }));
    assert_eq!(json[0]["attrs"]["class"][0]["content"], "wow");
    assert_eq!(json[0]["content"][1]["location"], json!({ "line": 2, "col": 3 }));
}

#[tokio::test]
async fn pass_without_matches_keeps_metadata_untouched() {
    let input = json!([
        {
            "type": "tag",
            "name": "section",
            "attrs": { "id": [{ "type": "text", "content": "x", "location": { "line": 1, "col": 13, "offset": 12 } }] },
            "content": [
                { "type": "text", "content": "a", "location": { "line": 1, "col": 2, "offset": 7 } },
                { "type": "comment", "content": "c", "location": "1:9" },
                { "type": "code", "content": "locals.x", "nodes": null, "location": { "line": 2 } }
            ],
            "location": { "line": 1, "col": 1, "offset": 0, "end": { "line": 3, "col": 10 } },
            "escaped": true
        },
        { "type": "doctype", "content": "html", "location": "0:0" }
    ]);

    let tree = parse_tree(input.clone()).unwrap();
    let tree = modify_nodes(
        tree,
        async |_: &Node| Ok::<_, UtilError>(false),
        async |node: Node| Ok::<_, UtilError>(node),
    )
    .await
    .unwrap();

    assert_eq!(serde_json::to_value(&tree).unwrap(), input);
}

#[tokio::test]
async fn plugin_replaces_node_with_multiple_nodes() {
    let tree = parse_tree(basic()).unwrap();

    let tree = modify_nodes(
        tree,
        async |n: &Node| Ok::<_, UtilError>(n.is_tag_named("p")),
        async |node: Node| Ok::<_, UtilError>(vec![node.clone(), node]),
    )
    .await
    .unwrap();

    let p = paragraphs(&tree);
    assert_eq!(p.len(), 2);
    assert_eq!(p[0], p[1]);

    let names: Vec<_> = tree[0]
        .children()
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap_or(n.node_type()))
        .collect();
    assert_eq!(names, vec!["text", "p", "p", "text"]);
}

#[tokio::test]
async fn plugin_errors_on_invalid_replacement() {
    let tree = parse_tree(basic()).unwrap();

    let err = modify_nodes(
        tree,
        async |n: &Node| Ok::<_, UtilError>(n.is_tag_named("p")),
        async |_: Node| Ok::<_, UtilError>(json!("foo")),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid replacement node\nFrom: reshape-util\n\nNode: \"foo\""
    );
}

#[tokio::test]
async fn untrusted_transform_output_is_caught_by_validation() {
    let tree = parse_tree(basic()).unwrap();

    let tree = modify_nodes(
        tree,
        async |n: &Node| Ok::<_, UtilError>(n.is_tag_named("p")),
        async |_: Node| Ok::<_, UtilError>(Node::code("__nodes[0]")),
    )
    .await
    .unwrap();

    let err = check_tree(&tree).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MissingNodesForCodeReference { .. }
    ));
}

#[tokio::test]
async fn independent_passes_run_concurrently() {
    let first = parse_tree(basic()).unwrap();
    let second = parse_tree(basic()).unwrap();

    let strip_text = |tree: Tree| {
        modify_nodes(
            tree,
            async |n: &Node| Ok::<_, UtilError>(n.kind() == reshape_ast::NodeKind::Text),
            async |_: Node| Ok::<_, UtilError>(None::<Node>),
        )
    };
    let upper_p = |tree: Tree| {
        modify_nodes(
            tree,
            async |n: &Node| Ok::<_, UtilError>(n.is_tag_named("p")),
            async |node: Node| {
                let Node::Tag(mut tag) = node else {
                    return Ok::<_, UtilError>(node);
                };
                tag.name = Some("P".to_string());
                Ok(Node::Tag(tag))
            },
        )
    };

    let (first, second) = tokio::join!(strip_text(first), upper_p(second));

    let first = first.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].children().unwrap().len(), 1);
    assert!(first[0].children().unwrap()[0].children().unwrap().is_empty());

    let second = second.unwrap();
    assert!(second[0].children().unwrap()[1].is_tag_named("P"));
}
