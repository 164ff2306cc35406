//! Page rendering for the public site and for editor previews

#![allow(clippy::result_large_err)]

use std::sync::Arc;

use folio_core::errors::{ExError, FolioError};
use folio_core::{log_op_end, log_op_start};
use folio_core::{PageRepository, RenderCache, RenderOutput, Renderer, RepoResult};

/// Renders stored pages, caching public output by path
#[derive(Clone)]
pub struct PageRenderer {
    repo: Arc<dyn PageRepository>,
    cache: Arc<dyn RenderCache>,
    renderer: Renderer,
}

impl PageRenderer {
    pub fn new(repo: Arc<dyn PageRepository>, cache: Arc<dyn RenderCache>, renderer: Renderer) -> Self {
        Self {
            repo,
            cache,
            renderer,
        }
    }

    /// Public output for `path`
    ///
    /// Served from the cache when present; otherwise rendered and cached.
    /// Drafts are not public. The fill is skipped if the path was
    /// invalidated while the page was being read and rendered.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing published is stored at `path`.
    pub fn render_public(&self, path: &str) -> RepoResult<RenderOutput> {
        if let Some(hit) = self.cache.get(path) {
            tracing::debug!(op = "render_public", path = path, "cache hit");
            return Ok(hit);
        }

        log_op_start!("render_public", path = path);
        let start = std::time::Instant::now();

        let generation = self.cache.generation(path);
        let doc = self
            .repo
            .find(path)?
            .filter(|doc| doc.is_published)
            .ok_or_else(|| not_found(path, "render_public"))?;
        let output = self.renderer.render_document(&doc);
        let cached = self.cache.put_if_current(path, &output, generation);

        log_op_end!(
            "render_public",
            duration_ms = start.elapsed().as_millis() as u64,
            path = path,
            warnings = output.warnings.len(),
            cached = cached
        );
        Ok(output)
    }

    /// Current content of `path`, published or not, bypassing the cache
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no page is stored at `path`.
    pub fn render_preview(&self, path: &str) -> RepoResult<RenderOutput> {
        let doc = self
            .repo
            .find(path)?
            .ok_or_else(|| not_found(path, "render_preview"))?;
        Ok(self.renderer.render_document(&doc))
    }
}

fn not_found(path: &str, op: &str) -> ExError {
    ExError::from(FolioError::PageNotFound {
        path: path.to_string(),
    })
    .with_op(op)
}
