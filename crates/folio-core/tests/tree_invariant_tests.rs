mod common;

use folio_core::errors::FolioError;
use folio_core::ops::tree_ops::{self, ParentRef};
use folio_core::rules::{repair, validate_tree, validate_tree_with};
use folio_core::{ContentNode, PageTree, Props, Registry};
use proptest::prelude::*;

use common::all_ids;

fn arb_node() -> impl Strategy<Value = ContentNode> {
    let leaf = ("[a-d]?", prop::sample::select(vec!["Text", "Hero", "Spacer"]))
        .prop_map(|(id, block_type)| ContentNode::new(id, block_type, Props::new()));
    leaf.prop_recursive(3, 24, 4, |inner| {
        ("[a-d]?", prop::collection::vec(inner, 0..4)).prop_map(|(id, children)| {
            ContentNode::new(id, "Columns", Props::new()).with_children(children)
        })
    })
}

fn arb_tree() -> impl Strategy<Value = PageTree> {
    prop::collection::vec(arb_node(), 0..6).prop_map(PageTree::with_content)
}

proptest! {
    #[test]
    fn prop_inserted_trees_never_hold_duplicates(
        ops in prop::collection::vec(("[a-f]", any::<bool>(), 0usize..8, 0usize..8), 0..30)
    ) {
        let registry = Registry::standard().unwrap();
        let mut tree = PageTree::new();
        for (id, container, parent_choice, index) in ops {
            let ids = all_ids(&tree);
            let parent = match ids.get(parent_choice) {
                Some(existing) => ParentRef::Node(existing.clone()),
                None => ParentRef::Root,
            };
            let (len, parent_is_container) = match &parent {
                ParentRef::Root => (tree.content.len(), true),
                ParentRef::Node(pid) => tree_ops::find(&tree, pid)
                    .map(|n| (n.children.len(), n.block_type == "Columns"))
                    .unwrap_or((0, false)),
            };
            let block_type = if container { "Columns" } else { "Text" };
            let already_present = ids.contains(&id);
            let result = tree_ops::insert(
                &mut tree,
                &registry,
                &parent,
                ContentNode::new(id.clone(), block_type, Props::new()),
                index % (len + 1),
            );
            match result {
                Ok(()) => prop_assert!(!already_present && parent_is_container),
                Err(FolioError::DuplicateNodeId { node_id }) => {
                    prop_assert!(already_present);
                    prop_assert_eq!(node_id, id);
                }
                Err(FolioError::NotAContainer { .. }) => {
                    prop_assert!(!already_present && !parent_is_container);
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
        prop_assert!(tree_ops::ensure_unique(&tree).is_ok());
        prop_assert!(validate_tree_with(&tree, &registry).is_clean());
    }

    #[test]
    fn prop_repair_is_first_wins(mut tree in arb_tree()) {
        let before = all_ids(&tree);
        let report = repair(&mut tree);
        let after = all_ids(&tree);

        prop_assert_eq!(before.len(), after.len());
        prop_assert!(validate_tree(&tree).is_valid());

        let mut seen = std::collections::HashSet::new();
        let mut expected_changes = 0;
        for (old, new) in before.iter().zip(after.iter()) {
            if !old.is_empty() && seen.insert(old.clone()) {
                // first occurrence keeps its id
                prop_assert_eq!(old, new);
            } else {
                prop_assert_ne!(old, new);
                expected_changes += 1;
            }
        }
        prop_assert_eq!(report.count(), expected_changes);
    }

    #[test]
    fn prop_validate_never_mutates(tree in arb_tree()) {
        let snapshot = tree.clone();
        let _ = validate_tree(&tree);
        prop_assert_eq!(tree, snapshot);
    }
}

#[test]
fn test_repair_then_insert_of_fresh_id_succeeds() {
    let mut tree = PageTree::with_content(vec![
        ContentNode::new("x", "Text", Props::new()),
        ContentNode::new("x", "Text", Props::new()),
    ]);
    assert!(tree_ops::ensure_unique(&tree).is_err());
    repair(&mut tree);
    assert!(tree_ops::ensure_unique(&tree).is_ok());
    tree_ops::insert(
        &mut tree,
        &Registry::standard().unwrap(),
        &ParentRef::Root,
        ContentNode::new("y", "Text", Props::new()),
        2,
    )
    .unwrap();
    assert_eq!(tree.node_count(), 3);
}
