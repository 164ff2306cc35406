#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use folio_core::errors::{ExError, ExErrorKind};
use folio_core::{
    ContentNode, MemoryRenderCache, PageRepository, PageTree, Props, RenderCache, RenderOutput,
    Registry, Renderer,
};
use folio_engine::Site;
use folio_store::SqliteStore;
use tempfile::TempDir;

pub fn renderer() -> Renderer {
    Renderer::new(Arc::new(Registry::standard().unwrap()))
}

/// SQLite-backed site on a temp file; keep the dir alive
pub fn sqlite_site(cache: Arc<dyn RenderCache>) -> (TempDir, Site) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("site.db")).unwrap();
    let site = Site::from_store(&store, cache, renderer());
    (dir, site)
}

pub fn memory_cache() -> Arc<MemoryRenderCache> {
    Arc::new(MemoryRenderCache::with_ttl_secs(300))
}

pub fn props(value: serde_json::Value) -> Props {
    value.as_object().cloned().unwrap_or_default()
}

pub fn hero_tree(id: &str, title: &str) -> PageTree {
    PageTree::with_content(vec![ContentNode::new(
        id,
        "Hero",
        props(serde_json::json!({ "title": title })),
    )])
}

/// Render cache whose invalidation can be made to fail
///
/// Records every invalidated path, and for each one whether the page
/// repository already reported the page as published at that moment.
pub struct MockCache {
    inner: MemoryRenderCache,
    fail_invalidate: Mutex<bool>,
    invalidated: Mutex<Vec<String>>,
    observer: Option<Arc<dyn PageRepository>>,
    seen_published: Mutex<Vec<bool>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryRenderCache::with_ttl_secs(300),
            fail_invalidate: Mutex::new(false),
            invalidated: Mutex::new(Vec::new()),
            observer: None,
            seen_published: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let cache = Self::new();
        cache.set_failing(true);
        cache
    }

    pub fn observing(repo: Arc<dyn PageRepository>) -> Self {
        Self {
            observer: Some(repo),
            ..Self::new()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_invalidate.lock().unwrap() = failing;
    }

    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }

    pub fn seen_published(&self) -> Vec<bool> {
        self.seen_published.lock().unwrap().clone()
    }
}

impl RenderCache for MockCache {
    fn get(&self, path: &str) -> Option<RenderOutput> {
        self.inner.get(path)
    }

    fn put(&self, path: &str, output: &RenderOutput) {
        self.inner.put(path, output);
    }

    fn generation(&self, path: &str) -> u64 {
        self.inner.generation(path)
    }

    fn put_if_current(&self, path: &str, output: &RenderOutput, generation: u64) -> bool {
        self.inner.put_if_current(path, output, generation)
    }

    fn invalidate(&self, path: &str) -> Result<(), ExError> {
        self.invalidated.lock().unwrap().push(path.to_string());
        if let Some(repo) = &self.observer {
            let published = repo
                .find(path)
                .unwrap()
                .is_some_and(|doc| doc.is_published);
            self.seen_published.lock().unwrap().push(published);
        }
        if *self.fail_invalidate.lock().unwrap() {
            return Err(ExError::new(ExErrorKind::CacheInvalidationFailure)
                .with_op("invalidate")
                .with_entity_id(path)
                .with_message("cache backend unreachable"));
        }
        self.inner.invalidate(path)
    }
}
