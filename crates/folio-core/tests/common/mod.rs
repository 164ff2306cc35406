use std::sync::Arc;

use folio_core::{ContentNode, PageTree, Props, Registry, Renderer};
use serde_json::Value;

/// Props map from a JSON object literal
#[allow(dead_code)]
pub fn props(value: Value) -> Props {
    value.as_object().cloned().unwrap_or_default()
}

/// Leaf node with the given id, type and props
#[allow(dead_code)]
pub fn node(id: &str, block_type: &str, value: Value) -> ContentNode {
    ContentNode::new(id, block_type, props(value))
}

/// Renderer over the built-in catalog
#[allow(dead_code)]
pub fn standard_renderer() -> Renderer {
    Renderer::new(Arc::new(Registry::standard().unwrap()))
}

/// All node ids of a tree in document order
#[allow(dead_code)]
pub fn all_ids(tree: &PageTree) -> Vec<String> {
    let mut ids = Vec::new();
    tree.walk(&mut |n| ids.push(n.id.clone()));
    ids
}
