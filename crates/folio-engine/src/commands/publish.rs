//! Publish coordination
//!
//! Every write follows the same two steps:
//! 1. Commit the whole document through the repository. A failure here
//!    aborts the operation and nothing else happens.
//! 2. Invalidate the cached public rendering of the path. A failure here
//!    is reported as a [`PublishWarning`] and logged; the committed write
//!    stays in place and stale output lasts until the entry expires.

#![allow(clippy::result_large_err)]

use std::sync::Arc;
use std::time::Instant;

use folio_core::errors::{ExError, ExErrorKind};
use folio_core::ops::tree_ops::ensure_unique;
use folio_core::{log_degraded, log_op_end, log_op_error, log_op_start};
use folio_core::{PageDocument, PageRepository, PageTree, RenderCache, RepoResult};
use folio_core_types::RequestContext;
use serde::Serialize;

use crate::commands::pages::{upsert_page, UpsertPageRequest};

/// Soft condition attached to a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishWarning {
    /// The write committed but the cached rendering may be stale
    CacheInvalidationFailed { path: String, message: String },
}

impl PublishWarning {
    pub fn code(&self) -> &'static str {
        match self {
            PublishWarning::CacheInvalidationFailed { .. } => {
                ExErrorKind::CacheInvalidationFailure.code()
            }
        }
    }
}

impl std::fmt::Display for PublishWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishWarning::CacheInvalidationFailed { path, message } => write!(
                f,
                "[{}] {} was saved but its cached page may be stale: {}",
                self.code(),
                path,
                message
            ),
        }
    }
}

/// A committed document plus any soft warnings
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub document: PageDocument,
    pub warnings: Vec<PublishWarning>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Orchestrates document writes and cache invalidation
///
/// Holds its repository and cache explicitly; there is no global handle.
/// Writes to the same path are not serialized here: concurrent calls race
/// and the later commit wins in full.
#[derive(Clone)]
pub struct PublishCoordinator {
    repo: Arc<dyn PageRepository>,
    cache: Arc<dyn RenderCache>,
}

impl PublishCoordinator {
    pub fn new(repo: Arc<dyn PageRepository>, cache: Arc<dyn RenderCache>) -> Self {
        Self { repo, cache }
    }

    /// Replace the tree of an existing page and mark it published
    ///
    /// # Errors
    ///
    /// - `DuplicateNodeId` if `tree` reuses a node id (nothing is written)
    /// - `NotFound` if no page is stored at `path`
    /// - any repository failure; the page is then left as it was
    pub fn publish(&self, ctx: &RequestContext, path: &str, tree: PageTree) -> RepoResult<PublishReport> {
        self.run("publish", ctx, path, || {
            ensure_unique(&tree).map_err(|e| {
                ExError::from(e).with_op("publish").with_entity_id(path)
            })?;
            let mut doc = self.repo.get(path)?;
            doc.tree = Some(tree);
            doc.legacy_body = None;
            doc.is_published = true;
            self.repo.upsert(doc)
        })
    }

    /// Take a page off the public site; its content is kept as a draft
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no page is stored at `path`.
    pub fn unpublish(&self, ctx: &RequestContext, path: &str) -> RepoResult<PublishReport> {
        self.run("unpublish", ctx, path, || {
            let mut doc = self.repo.get(path)?;
            doc.is_published = false;
            self.repo.upsert(doc)
        })
    }

    /// Create or update a page from editor input
    ///
    /// Saving a published page changes the public site immediately.
    ///
    /// # Errors
    ///
    /// `ValidationError`, `DuplicateNodeId` or `PathConflict` as for
    /// [`upsert_page`]; nothing is written in those cases.
    pub fn save(&self, ctx: &RequestContext, request: UpsertPageRequest) -> RepoResult<PublishReport> {
        let path = request.path.clone();
        self.run("save_page", ctx, &path, || upsert_page(self.repo.as_ref(), request))
    }

    /// Delete a page and drop its cached rendering
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no page is stored at `path`.
    pub fn delete(&self, ctx: &RequestContext, path: &str) -> RepoResult<Vec<PublishWarning>> {
        log_op_start!("delete_page", path = path, request_id = ctx.request_id.as_str());
        let start = Instant::now();

        if let Err(e) = self.repo.delete(path) {
            let e = e.with_request_id(ctx.request_id.clone());
            log_op_error!("delete_page", e.clone(), duration_ms = elapsed_ms(start), path = path);
            return Err(e);
        }
        let warnings = self.invalidate("delete_page", ctx, path);

        log_op_end!("delete_page", duration_ms = elapsed_ms(start), path = path);
        Ok(warnings)
    }

    /// Commit via `write`, then invalidate `path`
    fn run<F>(&self, op: &'static str, ctx: &RequestContext, path: &str, write: F) -> RepoResult<PublishReport>
    where
        F: FnOnce() -> RepoResult<PageDocument>,
    {
        log_op_start!(op, path = path, request_id = ctx.request_id.as_str());
        let start = Instant::now();

        let document = match write() {
            Ok(doc) => doc,
            Err(e) => {
                let e = e.with_request_id(ctx.request_id.clone());
                log_op_error!(op, e.clone(), duration_ms = elapsed_ms(start), path = path);
                return Err(e);
            }
        };

        let warnings = self.invalidate(op, ctx, &document.path);

        log_op_end!(
            op,
            duration_ms = elapsed_ms(start),
            path = path,
            is_published = document.is_published
        );
        Ok(PublishReport { document, warnings })
    }

    fn invalidate(&self, op: &'static str, ctx: &RequestContext, path: &str) -> Vec<PublishWarning> {
        match self.cache.invalidate(path) {
            Ok(()) => Vec::new(),
            Err(e) => {
                log_degraded!(
                    op,
                    "cache invalidation failed",
                    path = path,
                    err_code = e.code(),
                    request_id = ctx.request_id.as_str()
                );
                vec![PublishWarning::CacheInvalidationFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }]
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ContentNode, MemoryPageRepository, MemoryRenderCache, Props, RenderFormat, RenderOutput};

    fn coordinator() -> (Arc<MemoryPageRepository>, Arc<MemoryRenderCache>, PublishCoordinator) {
        let repo = Arc::new(MemoryPageRepository::new());
        let cache = Arc::new(MemoryRenderCache::with_ttl_secs(300));
        let coord = PublishCoordinator::new(repo.clone(), cache.clone());
        (repo, cache, coord)
    }

    fn cached(cache: &MemoryRenderCache, path: &str) {
        cache.put(
            path,
            &RenderOutput {
                html: "stale".to_string(),
                format: RenderFormat::Tree,
                warnings: Vec::new(),
            },
        );
    }

    #[test]
    fn test_publish_invalidates_after_commit() {
        let (repo, cache, coord) = coordinator();
        let ctx = RequestContext::new();
        coord.save(&ctx, UpsertPageRequest::new("/about", "About")).unwrap();
        cached(&cache, "/about");

        let tree = PageTree::with_content(vec![ContentNode::new("t", "Text", Props::new())]);
        let report = coord.publish(&ctx, "/about", tree.clone()).unwrap();

        assert!(report.is_clean());
        assert!(report.document.is_published);
        assert!(cache.get("/about").is_none());
        assert_eq!(repo.get("/about").unwrap().tree, Some(tree));
    }

    #[test]
    fn test_publish_requires_existing_page() {
        let (_, cache, coord) = coordinator();
        cached(&cache, "/nowhere");
        let err = coord
            .publish(&RequestContext::new(), "/nowhere", PageTree::new())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        // failed commit leaves the cache alone
        assert!(cache.get("/nowhere").is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected_before_write() {
        let (repo, _, coord) = coordinator();
        let ctx = RequestContext::new();
        coord.save(&ctx, UpsertPageRequest::new("/p", "P")).unwrap();

        let tree = PageTree::with_content(vec![
            ContentNode::new("x", "Text", Props::new()),
            ContentNode::new("x", "Text", Props::new()),
        ]);
        let err = coord.publish(&ctx, "/p", tree).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateNodeId);
        assert_eq!(err.request_id(), Some(&ctx.request_id));

        let stored = repo.get("/p").unwrap();
        assert!(!stored.is_published);
        assert_eq!(stored.tree, Some(PageTree::new()));
    }

    #[test]
    fn test_unpublish_keeps_content() {
        let (repo, _, coord) = coordinator();
        let ctx = RequestContext::new();
        let req = UpsertPageRequest {
            is_published: true,
            body: "<p>kept</p>".to_string(),
            ..UpsertPageRequest::new("/p", "P")
        };
        coord.save(&ctx, req).unwrap();

        let report = coord.unpublish(&ctx, "/p").unwrap();
        assert!(!report.document.is_published);
        assert_eq!(repo.get("/p").unwrap().legacy_body.as_deref(), Some("<p>kept</p>"));
    }

    #[test]
    fn test_delete_drops_cache_entry() {
        let (repo, cache, coord) = coordinator();
        let ctx = RequestContext::new();
        coord.save(&ctx, UpsertPageRequest::new("/p", "P")).unwrap();
        cached(&cache, "/p");

        assert!(coord.delete(&ctx, "/p").unwrap().is_empty());
        assert!(cache.get("/p").is_none());
        assert!(repo.find("/p").unwrap().is_none());
        assert_eq!(coord.delete(&ctx, "/p").unwrap_err().kind(), ExErrorKind::NotFound);
    }
}
