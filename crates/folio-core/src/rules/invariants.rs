use std::collections::{HashMap, HashSet};

use crate::model::{ContentNode, PageTree};
use crate::registry::Registry;

/// Position of a node as sibling indices from the top-level list down
pub type NodePosition = Vec<usize>;

fn walk_positions<'a>(
    nodes: &'a [ContentNode],
    prefix: &mut NodePosition,
    visit: &mut dyn FnMut(&NodePosition, &'a ContentNode),
) {
    for (index, node) in nodes.iter().enumerate() {
        prefix.push(index);
        visit(prefix, node);
        walk_positions(&node.children, prefix, visit);
        prefix.pop();
    }
}

/// Ids that occur more than once, in order of first occurrence
pub fn find_duplicate_ids(tree: &PageTree) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    tree.walk(&mut |node| {
        if node.id.is_empty() {
            return;
        }
        let count = counts.entry(node.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(node.id.as_str());
        }
        *count += 1;
    });
    order
        .into_iter()
        .filter(|id| counts.get(id).copied().unwrap_or(0) > 1)
        .map(str::to_string)
        .collect()
}

/// Positions of nodes without an id
pub fn find_missing_ids(tree: &PageTree) -> Vec<NodePosition> {
    let mut missing = Vec::new();
    walk_positions(&tree.content, &mut Vec::new(), &mut |position, node| {
        if node.id.is_empty() {
            missing.push(position.clone());
        }
    });
    missing
}

/// Block type names used in the tree but absent from the registry
pub fn find_unknown_block_types(tree: &PageTree, registry: &Registry) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unknown = Vec::new();
    tree.walk(&mut |node| {
        if !registry.contains(&node.block_type) && seen.insert(node.block_type.as_str()) {
            unknown.push(node.block_type.clone());
        }
    });
    unknown
}

/// Ids of registered leaf blocks that nonetheless carry children
///
/// Unknown types are left to [`find_unknown_block_types`].
pub fn find_children_under_leaves(tree: &PageTree, registry: &Registry) -> Vec<String> {
    let mut misplaced = Vec::new();
    tree.walk(&mut |node| {
        let leaf = registry
            .get(&node.block_type)
            .is_ok_and(|block| !block.accepts_children());
        if leaf && !node.children.is_empty() {
            misplaced.push(node.id.clone());
        }
    });
    misplaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Props;

    fn node(id: &str) -> ContentNode {
        ContentNode::new(id, "Text", Props::new())
    }

    #[test]
    fn test_duplicates_reported_once_in_first_seen_order() {
        let tree = PageTree::with_content(vec![
            node("b"),
            node("a"),
            ContentNode::new("c", "Columns", Props::new()).with_children(vec![node("a"), node("b"), node("a")]),
        ]);
        assert_eq!(find_duplicate_ids(&tree), vec!["b", "a"]);
    }

    #[test]
    fn test_missing_ids_by_position() {
        let tree = PageTree::with_content(vec![
            node("a"),
            ContentNode::new("c", "Columns", Props::new()).with_children(vec![node("x"), node("")]),
            node(""),
        ]);
        assert_eq!(find_missing_ids(&tree), vec![vec![1, 1], vec![2]]);
        assert!(find_duplicate_ids(&tree).is_empty());
    }

    #[test]
    fn test_unknown_block_types() {
        let registry = Registry::standard().unwrap();
        let tree = PageTree::with_content(vec![
            ContentNode::new("1", "Carousel", Props::new()),
            ContentNode::new("2", "Hero", Props::new()),
            ContentNode::new("3", "Carousel", Props::new()),
        ]);
        assert_eq!(find_unknown_block_types(&tree, &registry), vec!["Carousel"]);
    }

    #[test]
    fn test_children_under_leaves() {
        let registry = Registry::standard().unwrap();
        let tree = PageTree::with_content(vec![
            node("t").with_children(vec![node("inner")]),
            ContentNode::new("c", "Columns", Props::new()).with_children(vec![node("x")]),
            ContentNode::new("k", "Carousel", Props::new()).with_children(vec![node("y")]),
        ]);
        assert_eq!(find_children_under_leaves(&tree, &registry), vec!["t"]);
    }
}
