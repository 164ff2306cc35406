use serde::Serialize;

use crate::errors::{FolioError, Result};
use crate::model::{PageDocument, PageTree};
use crate::ops::tree_ops;
use crate::registry::Registry;

use super::invariants::{self, NodePosition};

/// Outcome of checking a tree, without touching the tree
///
/// Id problems make a tree invalid. Block problems only degrade
/// rendering, so they are reported separately for editors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Ids occurring more than once, first-seen order
    pub duplicate_ids: Vec<String>,
    /// Positions of nodes that carry no id
    pub missing_ids: Vec<NodePosition>,
    /// Block types the registry does not know; they render as placeholders
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_block_types: Vec<String>,
    /// Leaf blocks holding children; the children render after the block
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub misplaced_children: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.duplicate_ids.is_empty() && self.missing_ids.is_empty()
    }

    /// Valid and free of block problems
    pub fn is_clean(&self) -> bool {
        self.is_valid() && self.unknown_block_types.is_empty() && self.misplaced_children.is_empty()
    }
}

/// Report duplicate and missing node ids; empty report means valid
pub fn validate_tree(tree: &PageTree) -> ValidationReport {
    ValidationReport {
        duplicate_ids: invariants::find_duplicate_ids(tree),
        missing_ids: invariants::find_missing_ids(tree),
        ..ValidationReport::default()
    }
}

/// [`validate_tree`] plus the block checks that need the registry
pub fn validate_tree_with(tree: &PageTree, registry: &Registry) -> ValidationReport {
    ValidationReport {
        unknown_block_types: invariants::find_unknown_block_types(tree, registry),
        misplaced_children: invariants::find_children_under_leaves(tree, registry),
        ..validate_tree(tree)
    }
}

/// Check a public page path
///
/// A path starts with `/`, contains no whitespace, no empty segments and
/// no query or fragment.
///
/// # Errors
///
/// Returns `InvalidPath` describing the first problem found.
pub fn validate_path(path: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(FolioError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        })
    };

    if !path.starts_with('/') {
        return invalid("must start with '/'");
    }
    if path.chars().any(char::is_whitespace) {
        return invalid("must not contain whitespace");
    }
    if path.contains('?') || path.contains('#') {
        return invalid("must not contain a query or fragment");
    }
    if path.len() > 1 && (path.contains("//") || path.ends_with('/')) {
        return invalid("must not contain empty segments");
    }
    Ok(())
}

/// # Errors
///
/// Returns `InvalidTitle` if the title is empty or whitespace-only.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(FolioError::InvalidTitle {
            reason: "Title cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Everything a document must satisfy before it is written
///
/// # Errors
///
/// `InvalidPath`, `InvalidTitle`, `InvalidTree` or `DuplicateNodeId`.
pub fn validate_document(doc: &PageDocument) -> Result<()> {
    validate_path(&doc.path)?;
    validate_title(&doc.title)?;
    if let Some(tree) = &doc.tree {
        tree_ops::ensure_unique(tree)?;
    }
    Ok(())
}
