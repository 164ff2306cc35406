use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::PageTree;

/// The persisted unit of a page, keyed by path
///
/// Draft and published are the same record; `is_published` is the only
/// difference. `tree` is `None` for documents saved before structured
/// content existed, in which case `legacy_body` holds their markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    /// Storage identity (UUID v7). `None` until first saved; its presence
    /// selects update-in-place on upsert.
    pub id: Option<String>,

    /// Public URL path, unique, always starting with `/`
    pub path: String,

    pub title: String,
    pub description: String,
    pub image_url: String,

    /// Pre-tree markup, rendered verbatim
    pub legacy_body: Option<String>,

    /// Structured content
    pub tree: Option<PageTree>,

    pub is_published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageDocument {
    /// Create an unsaved draft with an empty tree
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            path: path.into(),
            title: title.into(),
            description: String::new(),
            image_url: String::new(),
            legacy_body: None,
            tree: Some(PageTree::new()),
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper to set the tree
    pub fn with_tree(mut self, tree: PageTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Builder-style helper to store legacy markup instead of a tree
    pub fn with_legacy_body(mut self, body: impl Into<String>) -> Self {
        self.legacy_body = Some(body.into());
        self.tree = None;
        self
    }

    /// Whether this document has been persisted
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Whether only legacy markup is available
    pub fn is_legacy(&self) -> bool {
        self.tree.is_none()
    }

    /// The tree, creating an empty one for legacy documents being edited
    pub fn tree_mut(&mut self) -> &mut PageTree {
        self.tree.get_or_insert_with(PageTree::new)
    }
}

/// Lightweight listing row (no content)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    pub path: String,
    pub title: String,
    pub is_published: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&PageDocument> for PageSummary {
    fn from(doc: &PageDocument) -> Self {
        Self {
            id: doc.id.clone().unwrap_or_default(),
            path: doc.path.clone(),
            title: doc.title.clone(),
            is_published: doc.is_published,
            updated_at: doc.updated_at,
        }
    }
}
