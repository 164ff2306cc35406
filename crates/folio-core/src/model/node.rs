use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property bag of a block instance
///
/// `serde_json::Map` keeps keys sorted, so serialized trees are stable
/// across saves.
pub type Props = serde_json::Map<String, Value>;

/// One placed instance of a block type
///
/// Accepts two stored shapes: the current `{id, type, props, children}`
/// and the older `{type, props: {id, ...}}` where the id lived inside the
/// props. A node with neither carries an empty id, which validation
/// reports as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawContentNode")]
pub struct ContentNode {
    /// Identifier, unique within the owning document
    pub id: String,

    /// Registered block type name (e.g. "Hero")
    #[serde(rename = "type")]
    pub block_type: String,

    /// Property values set by the author
    pub props: Props,

    /// Ordered nested nodes (only meaningful for container blocks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

#[derive(Deserialize)]
struct RawContentNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    props: Props,
    #[serde(default)]
    children: Vec<ContentNode>,
}

impl From<RawContentNode> for ContentNode {
    fn from(raw: RawContentNode) -> Self {
        let mut props = raw.props;
        let id = match raw.id {
            Some(id) => id,
            None => match props.remove("id") {
                Some(Value::String(id)) => id,
                Some(other) => {
                    // non-string legacy id stays in props untouched
                    props.insert("id".to_string(), other);
                    String::new()
                }
                None => String::new(),
            },
        };
        Self {
            id,
            block_type: raw.block_type,
            props,
            children: raw.children,
        }
    }
}

impl ContentNode {
    /// Create a node with the given id, type and props
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, props: Props) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            props,
            children: Vec::new(),
        }
    }

    /// Builder-style helper to attach children
    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.children = children;
        self
    }

    /// Read a string prop, if present and a string
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ContentNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Mutable variant of [`ContentNode::walk`]
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut ContentNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// Page-level settings held at the root of the tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRoot {
    #[serde(default)]
    pub props: Props,
}

/// The structured content of a page
///
/// `content` is required when parsing: a JSON value without it is not a
/// tree and falls back to legacy markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageTree {
    #[serde(default)]
    pub root: PageRoot,
    pub content: Vec<ContentNode>,
}

impl PageTree {
    /// An empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from top-level nodes
    pub fn with_content(content: Vec<ContentNode>) -> Self {
        Self {
            root: PageRoot::default(),
            content,
        }
    }

    /// Try to read a stored string as a tree
    pub fn parse(source: &str) -> Option<Self> {
        serde_json::from_str(source).ok()
    }

    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Visit every node at any depth, in document order
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ContentNode)) {
        for node in &self.content {
            node.walk(visit);
        }
    }

    /// Mutable variant of [`PageTree::walk`]
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut ContentNode)) {
        for node in &mut self.content {
            node.walk_mut(visit);
        }
    }

    /// Total number of nodes at any depth
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Whether the tree has no content nodes
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_tree() {
        let tree = PageTree::parse(r#"{"root":{},"content":[]}"#).unwrap();
        assert!(tree.is_empty());
        assert!(tree.root.props.is_empty());
    }

    #[test]
    fn test_parse_rejects_markup_and_non_trees() {
        assert!(PageTree::parse("<h1>Hi</h1>").is_none());
        assert!(PageTree::parse(r#"{"title":"not a tree"}"#).is_none());
        assert!(PageTree::parse("[]").is_none());
    }

    #[test]
    fn test_legacy_id_in_props_is_lifted() {
        let tree = PageTree::parse(
            r#"{"content":[{"type":"Hero","props":{"id":"Hero-1","title":"Hi"}}]}"#,
        )
        .unwrap();
        let node = &tree.content[0];
        assert_eq!(node.id, "Hero-1");
        assert!(!node.props.contains_key("id"));
        assert_eq!(node.prop_str("title"), Some("Hi"));
    }

    #[test]
    fn test_missing_id_is_empty() {
        let tree = PageTree::parse(r#"{"content":[{"type":"Text"}]}"#).unwrap();
        assert_eq!(tree.content[0].id, "");
    }

    #[test]
    fn test_serialize_current_shape() {
        let mut props = Props::new();
        props.insert("title".to_string(), json!("Welcome"));
        let tree = PageTree::with_content(vec![ContentNode::new("h1", "Hero", props)]);

        let value: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(value["content"][0]["id"], "h1");
        assert_eq!(value["content"][0]["type"], "Hero");
        assert!(value["content"][0].get("children").is_none());
    }

    #[test]
    fn test_node_count_includes_nested() {
        let tree = PageTree::with_content(vec![
            ContentNode::new("cols", "Columns", Props::new()).with_children(vec![
                ContentNode::new("a", "Text", Props::new()),
                ContentNode::new("b", "Text", Props::new()),
            ]),
            ContentNode::new("c", "Spacer", Props::new()),
        ]);
        assert_eq!(tree.node_count(), 4);
    }
}
