//! The set of services one running site works with

use std::sync::Arc;

use folio_core::{MenuRepository, PageRepository, RenderCache, Renderer};
use folio_store::SqliteStore;

use crate::commands::publish::PublishCoordinator;
use crate::commands::render::PageRenderer;

/// Repositories, render cache and renderer, passed explicitly to every
/// command
#[derive(Clone)]
pub struct Site {
    pub pages: Arc<dyn PageRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub cache: Arc<dyn RenderCache>,
    pub renderer: Renderer,
}

impl Site {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        menus: Arc<dyn MenuRepository>,
        cache: Arc<dyn RenderCache>,
        renderer: Renderer,
    ) -> Self {
        Self {
            pages,
            menus,
            cache,
            renderer,
        }
    }

    /// Site backed by an opened SQLite store
    pub fn from_store(store: &SqliteStore, cache: Arc<dyn RenderCache>, renderer: Renderer) -> Self {
        Self::new(store.pages.clone(), store.menus.clone(), cache, renderer)
    }

    pub fn coordinator(&self) -> PublishCoordinator {
        PublishCoordinator::new(Arc::clone(&self.pages), Arc::clone(&self.cache))
    }

    pub fn page_renderer(&self) -> PageRenderer {
        PageRenderer::new(
            Arc::clone(&self.pages),
            Arc::clone(&self.cache),
            self.renderer.clone(),
        )
    }
}
