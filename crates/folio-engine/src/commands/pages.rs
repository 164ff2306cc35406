//! Page boundary commands
//!
//! Thin operations over a [`PageRepository`]: lookup, listing, the
//! create-or-update entry point and deletion. Writes made here do not touch
//! the render cache; go through [`crate::commands::publish::PublishCoordinator`]
//! when public output must follow the write.

#![allow(clippy::result_large_err)]

use folio_core::errors::{ExError, FolioError};
use folio_core::rules::validate_document;
use folio_core::{PageDocument, PageRepository, PageTree, RepoResult};
use serde::{Deserialize, Serialize};

/// Editor input for creating or updating a page
///
/// `id` selects the write mode: present updates the stored record in
/// place, absent creates a new record and conflicts if the path is taken.
/// `body` is the stored content string; a parseable tree becomes the
/// document's tree and anything else is kept as legacy markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertPageRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_published: bool,
}

impl UpsertPageRequest {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Use the JSON form of `tree` as the body
    pub fn with_tree(mut self, tree: &PageTree) -> Result<Self, FolioError> {
        self.body = tree.to_json()?;
        Ok(self)
    }

    /// Build the document this request describes
    ///
    /// A blank body yields an empty tree.
    pub fn into_document(self) -> PageDocument {
        let mut doc = PageDocument::new(self.path, self.title);
        doc.id = self.id;
        doc.description = self.description;
        doc.image_url = self.image_url;
        doc.is_published = self.is_published;
        if self.body.trim().is_empty() {
            return doc;
        }
        match PageTree::parse(&self.body) {
            Some(tree) => doc.with_tree(tree),
            None => doc.with_legacy_body(self.body),
        }
    }
}

/// Page at `path`, or `None` when nothing is stored there
///
/// Absence is not an error: the site root shows a welcome state instead.
pub fn page_by_path(repo: &dyn PageRepository, path: &str) -> RepoResult<Option<PageDocument>> {
    repo.find(path)
}

/// Every page, most recently updated first
pub fn list_pages(repo: &dyn PageRepository) -> RepoResult<Vec<PageDocument>> {
    repo.list()
}

/// Validate and store a page
///
/// # Errors
///
/// - `ValidationError` for a malformed path or blank title
/// - `DuplicateNodeId` if the tree reuses a node id (nothing is written)
/// - `PathConflict` when creating on a path that is already taken
pub fn upsert_page(repo: &dyn PageRepository, request: UpsertPageRequest) -> RepoResult<PageDocument> {
    let doc = request.into_document();
    validate_document(&doc).map_err(|e| {
        ExError::from(e)
            .with_op("upsert_page")
            .with_entity_id(doc.path.clone())
    })?;
    repo.upsert(doc)
}

/// Remove the page at `path`; menus that link to it keep their items
///
/// # Errors
///
/// Returns `NotFound` if no page is stored at `path`.
pub fn delete_page(repo: &dyn PageRepository, path: &str) -> RepoResult<()> {
    repo.delete(path)
}
