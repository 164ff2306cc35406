//! Structural edits on a page tree
//!
//! Every mutation either fully applies or leaves the tree untouched.
//! Id uniqueness is enforced here, at edit time; stored trees that predate
//! the check are handled by [`crate::rules::repair`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{FolioError, Result};
use crate::model::{ContentNode, PageTree, Props};
use crate::registry::Registry;

/// Where a node lives: the top-level content list or a node's children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentRef {
    Root,
    Node(String),
}

impl ParentRef {
    pub fn node(id: impl Into<String>) -> Self {
        ParentRef::Node(id.into())
    }
}

/// Find a node by id at any depth
pub fn find<'a>(tree: &'a PageTree, id: &str) -> Option<&'a ContentNode> {
    find_in(&tree.content, id)
}

fn find_in<'a>(nodes: &'a [ContentNode], id: &str) -> Option<&'a ContentNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find`]
pub fn find_mut<'a>(tree: &'a mut PageTree, id: &str) -> Option<&'a mut ContentNode> {
    find_in_mut(&mut tree.content, id)
}

fn find_in_mut<'a>(nodes: &'a mut [ContentNode], id: &str) -> Option<&'a mut ContentNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Number of nodes at any depth
pub fn node_count(tree: &PageTree) -> usize {
    tree.node_count()
}

/// Parent and sibling index of a node
pub fn locate(tree: &PageTree, id: &str) -> Option<(ParentRef, usize)> {
    fn search(nodes: &[ContentNode], parent: &ParentRef, id: &str) -> Option<(ParentRef, usize)> {
        for (index, node) in nodes.iter().enumerate() {
            if node.id == id {
                return Some((parent.clone(), index));
            }
            let here = ParentRef::Node(node.id.clone());
            if let Some(found) = search(&node.children, &here, id) {
                return Some(found);
            }
        }
        None
    }
    search(&tree.content, &ParentRef::Root, id)
}

fn siblings_mut<'a>(tree: &'a mut PageTree, parent: &ParentRef) -> Result<&'a mut Vec<ContentNode>> {
    match parent {
        ParentRef::Root => Ok(&mut tree.content),
        ParentRef::Node(id) => find_mut(tree, id)
            .map(|node| &mut node.children)
            .ok_or_else(|| FolioError::NodeNotFound {
                node_id: id.clone(),
            }),
    }
}

/// Children may only go at the top level or under a container block
fn ensure_container(tree: &PageTree, registry: &Registry, parent: &ParentRef) -> Result<()> {
    let ParentRef::Node(id) = parent else {
        return Ok(());
    };
    let node = find(tree, id).ok_or_else(|| FolioError::NodeNotFound {
        node_id: id.clone(),
    })?;
    if registry.get(&node.block_type)?.accepts_children() {
        Ok(())
    } else {
        Err(FolioError::NotAContainer {
            node_id: id.clone(),
            block_type: node.block_type.clone(),
        })
    }
}

fn collect_ids<'a>(node: &'a ContentNode, out: &mut Vec<&'a str>) {
    node.walk(&mut |n| out.push(n.id.as_str()));
}

/// Insert `node` (with its subtree) under `parent` at `index`
///
/// # Errors
///
/// - `InvalidTree` if any id in the inserted subtree is empty
/// - `DuplicateNodeId` if any id in the inserted subtree already exists in
///   the tree or repeats within the subtree
/// - `NodeNotFound` if `parent` names a node that is not in the tree
/// - `NotAContainer` if `parent` is a block that takes no children, or
///   `UnknownBlockType` if its type is not registered
/// - `InvalidIndex` if `index` is past the end of the sibling list
pub fn insert(
    tree: &mut PageTree,
    registry: &Registry,
    parent: &ParentRef,
    node: ContentNode,
    index: usize,
) -> Result<()> {
    let mut incoming = Vec::new();
    collect_ids(&node, &mut incoming);

    let mut existing: HashSet<&str> = HashSet::new();
    tree.walk(&mut |n| {
        existing.insert(n.id.as_str());
    });

    let mut seen = HashSet::new();
    for id in incoming {
        if id.is_empty() {
            return Err(FolioError::InvalidTree {
                reason: format!("node of type '{}' has no id", node.block_type),
            });
        }
        if existing.contains(id) || !seen.insert(id) {
            return Err(FolioError::DuplicateNodeId {
                node_id: id.to_string(),
            });
        }
    }

    ensure_container(tree, registry, parent)?;
    let siblings = siblings_mut(tree, parent)?;
    if index > siblings.len() {
        return Err(FolioError::InvalidIndex {
            index,
            len: siblings.len(),
        });
    }
    siblings.insert(index, node);
    Ok(())
}

/// Append `node` as the last child of `parent`
///
/// # Errors
///
/// Same as [`insert`].
pub fn append(tree: &mut PageTree, registry: &Registry, parent: &ParentRef, node: ContentNode) -> Result<()> {
    let len = siblings_mut(tree, parent)?.len();
    insert(tree, registry, parent, node, len)
}

/// Remove a node and its subtree, returning it
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has `id`.
pub fn remove(tree: &mut PageTree, id: &str) -> Result<ContentNode> {
    let (parent, index) = locate(tree, id).ok_or_else(|| FolioError::NodeNotFound {
        node_id: id.to_string(),
    })?;
    let siblings = siblings_mut(tree, &parent)?;
    Ok(siblings.remove(index))
}

/// Move a node (with its subtree) to `index` under `to`
///
/// `index` is interpreted after the node has been detached, so moving
/// within the same parent uses the final position.
///
/// # Errors
///
/// - `NodeNotFound` if the node or target parent is missing
/// - `CyclicMove` if `to` is the node itself or one of its descendants
/// - `NotAContainer` or `UnknownBlockType` as for [`insert`]
/// - `InvalidIndex` if `index` is past the end of the target list
pub fn move_node(tree: &mut PageTree, registry: &Registry, id: &str, to: &ParentRef, index: usize) -> Result<()> {
    let node = find(tree, id).ok_or_else(|| FolioError::NodeNotFound {
        node_id: id.to_string(),
    })?;

    if let ParentRef::Node(target) = to {
        if find_in(std::slice::from_ref(node), target).is_some() {
            return Err(FolioError::CyclicMove {
                node_id: id.to_string(),
            });
        }
    }
    ensure_container(tree, registry, to)?;

    let (from, from_index) = locate(tree, id).ok_or_else(|| FolioError::NodeNotFound {
        node_id: id.to_string(),
    })?;
    let node = siblings_mut(tree, &from)?.remove(from_index);

    let target = siblings_mut(tree, to)?;
    if index > target.len() {
        let len = target.len();
        siblings_mut(tree, &from)?.insert(from_index, node);
        return Err(FolioError::InvalidIndex { index, len });
    }
    target.insert(index, node);
    Ok(())
}

/// Shallow-merge `patch` into a node's props (patch keys win)
///
/// # Errors
///
/// Returns `NodeNotFound` if no node has `id`.
pub fn update_props(tree: &mut PageTree, id: &str, patch: Props) -> Result<()> {
    let node = find_mut(tree, id).ok_or_else(|| FolioError::NodeNotFound {
        node_id: id.to_string(),
    })?;
    for (key, value) in patch {
        node.props.insert(key, value);
    }
    Ok(())
}

/// Fail on the first missing or repeated id, in document order
///
/// Used to reject whole trees arriving from outside before they are
/// written.
///
/// # Errors
///
/// - `InvalidTree` for a node without an id
/// - `DuplicateNodeId` for the second occurrence of an id
pub fn ensure_unique(tree: &PageTree) -> Result<()> {
    let mut seen = HashSet::new();
    let mut failure = None;
    tree.walk(&mut |node| {
        if failure.is_some() {
            return;
        }
        if node.id.is_empty() {
            failure = Some(FolioError::InvalidTree {
                reason: format!("node of type '{}' has no id", node.block_type),
            });
        } else if !seen.insert(node.id.as_str()) {
            failure = Some(FolioError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
