//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for reads that span the
//! repositories, the cache and the block registry. Apart from filling the
//! render cache and creating a well-known menu on first access, it never
//! writes.

#![allow(clippy::result_large_err)]

use folio_core::errors::ExError;
use folio_core::model::MenuWithItems;
use folio_core::registry::resolve_fields;
use folio_core::rules::{validate_tree_with, ValidationReport};
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_core::{Category, FieldSpec, Menu, PageDocument, PageTree, Props, RenderOutput, RepoResult};
use serde::Serialize;

use crate::commands::menus::{get_menu, list_menus, menu_links_status, MenuLinksReport};
use crate::commands::pages::{list_pages, page_by_path};
use crate::site::Site;

/// Read-only queries supported by the engine
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// Page at a path, `None` when absent.
    PageByPath { path: String },
    /// Every page, most recently updated first.
    ListPages,
    /// Public (published, cached) output of a page.
    RenderPublic { path: String },
    /// Current output of a page whether published or not.
    RenderPreview { path: String },
    /// Menu with its items.
    GetMenu { slug: String },
    ListMenus,
    /// Which items of a menu link to missing pages.
    MenuLinks { slug: String },
    /// Editor palette: block names grouped by category.
    BlockCatalog,
    /// Fields currently applicable to a block instance.
    BlockFields { block_type: String, props: Props },
    /// Id and block problems in an editor's tree, before it is saved.
    ValidateTree { tree: PageTree },
}

/// One palette group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockCategory {
    pub category: Category,
    pub blocks: Vec<&'static str>,
}

/// Result of an engine query
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    Page(Option<PageDocument>),
    Pages(Vec<PageDocument>),
    Rendered(RenderOutput),
    Menu(MenuWithItems),
    Menus(Vec<Menu>),
    MenuLinks(MenuLinksReport),
    BlockCatalog(Vec<BlockCategory>),
    BlockFields(Vec<FieldSpec>),
    Validation(ValidationReport),
}

impl EngineQuery {
    fn op(&self) -> &'static str {
        match self {
            EngineQuery::PageByPath { .. } => "page_by_path",
            EngineQuery::ListPages => "list_pages",
            EngineQuery::RenderPublic { .. } => "query_render_public",
            EngineQuery::RenderPreview { .. } => "render_preview",
            EngineQuery::GetMenu { .. } => "get_menu",
            EngineQuery::ListMenus => "list_menus",
            EngineQuery::MenuLinks { .. } => "menu_links",
            EngineQuery::BlockCatalog => "block_catalog",
            EngineQuery::BlockFields { .. } => "block_fields",
            EngineQuery::ValidateTree { .. } => "validate_tree",
        }
    }
}

/// Run a read-only query against a site
///
/// # Errors
///
/// - `NotFound` for renders of missing (or, publicly, unpublished) pages
///   and for menus that are neither stored nor well-known
/// - `UnknownBlockType` for field queries on unregistered types
/// - repository failures
pub fn apply_engine_query(query: EngineQuery, site: &Site) -> RepoResult<EngineQueryResult> {
    let op = query.op();
    log_op_start!(op);
    let start = std::time::Instant::now();

    let result = run_query(query, site);

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed),
        Err(e) => log_op_error!(op, e.clone(), duration_ms = elapsed),
    }
    result
}

fn run_query(query: EngineQuery, site: &Site) -> RepoResult<EngineQueryResult> {
    match query {
        EngineQuery::PageByPath { path } => {
            page_by_path(site.pages.as_ref(), &path).map(EngineQueryResult::Page)
        }
        EngineQuery::ListPages => list_pages(site.pages.as_ref()).map(EngineQueryResult::Pages),
        EngineQuery::RenderPublic { path } => site
            .page_renderer()
            .render_public(&path)
            .map(EngineQueryResult::Rendered),
        EngineQuery::RenderPreview { path } => site
            .page_renderer()
            .render_preview(&path)
            .map(EngineQueryResult::Rendered),
        EngineQuery::GetMenu { slug } => get_menu(site.menus.as_ref(), &slug).map(EngineQueryResult::Menu),
        EngineQuery::ListMenus => list_menus(site.menus.as_ref()).map(EngineQueryResult::Menus),
        EngineQuery::MenuLinks { slug } => {
            menu_links_status(site.menus.as_ref(), site.pages.as_ref(), &slug)
                .map(EngineQueryResult::MenuLinks)
        }
        EngineQuery::BlockCatalog => {
            let catalog = site
                .renderer
                .registry()
                .categories()
                .into_iter()
                .map(|(category, blocks)| BlockCategory { category, blocks })
                .collect();
            Ok(EngineQueryResult::BlockCatalog(catalog))
        }
        EngineQuery::BlockFields { block_type, props } => {
            resolve_fields(site.renderer.registry(), &block_type, &props)
                .map(EngineQueryResult::BlockFields)
                .map_err(|e| ExError::from(e).with_op("block_fields"))
        }
        EngineQuery::ValidateTree { tree } => Ok(EngineQueryResult::Validation(validate_tree_with(
            &tree,
            site.renderer.registry(),
        ))),
    }
}
