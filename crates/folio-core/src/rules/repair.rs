//! One-time cleanup of stored trees with duplicate or missing node ids
//!
//! First occurrence wins: the earliest node in document order keeps its
//! id, every later holder of the same id gets a fresh one.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::PageTree;
use crate::registry::fresh_node_id;

/// One id reassignment made by [`repair`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reassignment {
    /// Previous id; empty when the node had none
    pub old_id: String,
    pub new_id: String,
    pub block_type: String,
}

/// What [`repair`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub reassigned: Vec<Reassignment>,
}

impl RepairReport {
    pub fn changed(&self) -> bool {
        !self.reassigned.is_empty()
    }

    pub fn count(&self) -> usize {
        self.reassigned.len()
    }
}

/// Give every node a unique id, keeping first occurrences intact
pub fn repair(tree: &mut PageTree) -> RepairReport {
    let mut seen: HashSet<String> = HashSet::new();
    tree.walk(&mut |node| {
        if !node.id.is_empty() {
            seen.insert(node.id.clone());
        }
    });

    let mut kept: HashSet<String> = HashSet::new();
    let mut report = RepairReport::default();
    tree.walk_mut(&mut |node| {
        if !node.id.is_empty() && kept.insert(node.id.clone()) {
            return;
        }
        let mut new_id = fresh_node_id(&node.block_type);
        while seen.contains(&new_id) {
            new_id = fresh_node_id(&node.block_type);
        }
        seen.insert(new_id.clone());
        kept.insert(new_id.clone());
        report.reassigned.push(Reassignment {
            old_id: std::mem::replace(&mut node.id, new_id.clone()),
            new_id,
            block_type: node.block_type.clone(),
        });
    });
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentNode, Props};
    use crate::rules::validation::validate_tree;
    use serde_json::json;

    fn text(id: &str, body: &str) -> ContentNode {
        ContentNode::new(id, "Text", json!({ "body": body }).as_object().cloned().unwrap())
    }

    #[test]
    fn test_first_occurrence_keeps_its_id() {
        let mut tree = PageTree::with_content(vec![
            text("a", "first"),
            ContentNode::new("cols", "Columns", Props::new()).with_children(vec![text("a", "second")]),
            text("a", "third"),
        ]);
        let report = repair(&mut tree);

        assert_eq!(report.count(), 2);
        assert_eq!(tree.content[0].id, "a");
        assert_eq!(tree.content[0].props["body"], "first");
        assert_ne!(tree.content[1].children[0].id, "a");
        assert!(tree.content[1].children[0].id.starts_with("Text-"));
        assert_ne!(tree.content[2].id, "a");
        assert!(validate_tree(&tree).is_valid());
    }

    #[test]
    fn test_missing_ids_are_filled() {
        let mut tree = PageTree::with_content(vec![ContentNode::new("", "Spacer", Props::new())]);
        let report = repair(&mut tree);
        assert_eq!(report.reassigned[0].old_id, "");
        assert!(tree.content[0].id.starts_with("Spacer-"));
    }

    #[test]
    fn test_clean_tree_untouched() {
        let mut tree = PageTree::with_content(vec![text("a", "x"), text("b", "y")]);
        let before = tree.clone();
        assert!(!repair(&mut tree).changed());
        assert_eq!(tree, before);
    }
}
