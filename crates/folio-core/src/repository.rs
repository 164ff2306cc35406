//! Persistence seams
//!
//! The coordinator, renderer and menu commands receive these traits
//! explicitly; there is no ambient database handle. Implementations live
//! in `folio-store` (SQLite) and in [`crate::ops::memory`] (tests, tools).

#![allow(clippy::result_large_err)]

use crate::errors::{ExError, FolioError};
use crate::model::{Menu, MenuItem, MenuItemInput, PageDocument};

pub type RepoResult<T> = std::result::Result<T, ExError>;

/// Storage of page documents keyed by path
///
/// Each call is its own commit boundary: a document is written or removed
/// as a whole record. Concurrent upserts of the same document are not
/// coordinated; the later commit wins in full.
pub trait PageRepository: Send + Sync {
    /// Look a document up by path; `Ok(None)` when absent
    fn find(&self, path: &str) -> RepoResult<Option<PageDocument>>;

    /// All documents, most recently updated first
    fn list(&self) -> RepoResult<Vec<PageDocument>>;

    /// Create or update a document, returning the stored form
    ///
    /// With an `id`, the record holding that id is replaced in place; its
    /// path must match the stored one. Without an `id`, a new record is
    /// created unless the path is taken.
    ///
    /// # Errors
    ///
    /// - `PathConflict` if a create targets a taken path
    /// - `ValidationError` if an update changes the stored path
    /// - `NotFound` if `id` names no stored document
    fn upsert(&self, doc: PageDocument) -> RepoResult<PageDocument>;

    /// Remove the document at `path`; menus are left alone
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document is stored at `path`.
    fn delete(&self, path: &str) -> RepoResult<()>;

    /// Like [`PageRepository::find`] but absent is an error
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document is stored at `path`.
    fn get(&self, path: &str) -> RepoResult<PageDocument> {
        self.find(path)?.ok_or_else(|| {
            ExError::from(FolioError::PageNotFound {
                path: path.to_string(),
            })
            .with_op("get_page")
        })
    }
}

/// Storage of menus and their items
pub trait MenuRepository: Send + Sync {
    fn find_menu(&self, slug: &str) -> RepoResult<Option<Menu>>;

    /// # Errors
    ///
    /// Fails if a menu with `slug` already exists.
    fn create_menu(&self, slug: &str, name: &str) -> RepoResult<Menu>;

    fn list_menus(&self) -> RepoResult<Vec<Menu>>;

    /// Items of a menu in display order
    fn items(&self, menu_id: &str) -> RepoResult<Vec<MenuItem>>;

    /// Replace every item of a menu in one transaction
    ///
    /// Items are numbered 0.. in the given order. On any failure the
    /// previous item set is left in place.
    fn replace_items(&self, menu_id: &str, items: &[MenuItemInput]) -> RepoResult<Vec<MenuItem>>;
}
