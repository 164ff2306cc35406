//! Engine-level write commands.

#![allow(clippy::result_large_err)]

use folio_core::model::MenuWithItems;
use folio_core::{MenuItemInput, PageTree, RepoResult};
use folio_core_types::RequestContext;

use crate::commands::menus::put_menu;
use crate::commands::pages::UpsertPageRequest;
use crate::commands::publish::{PublishReport, PublishWarning};
use crate::commands::repair::{repair_all_pages, RepairSummary};
use crate::site::Site;

/// Engine commands that change stored state
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Create or update a page from editor input.
    SavePage(UpsertPageRequest),
    /// Replace a page's tree and mark it published.
    Publish { path: String, tree: PageTree },
    /// Take a page off the public site.
    Unpublish { path: String },
    /// Delete a page; menus linking to it are left alone.
    DeletePage { path: String },
    /// Replace every item of a menu.
    PutMenu { slug: String, items: Vec<MenuItemInput> },
    /// Reassign duplicate and missing node ids in stored trees.
    RepairPages { dry_run: bool },
}

/// Result of applying an engine command
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Page(PublishReport),
    Deleted { path: String, warnings: Vec<PublishWarning> },
    Menu(MenuWithItems),
    Repair(RepairSummary),
}

/// Apply an engine command against a site
///
/// # Errors
///
/// Whatever the underlying command reports; soft failures such as a
/// failed cache invalidation come back as warnings inside the result.
pub fn apply_engine_command(cmd: EngineCommand, site: &Site, ctx: &RequestContext) -> RepoResult<EngineCommandResult> {
    let coordinator = site.coordinator();
    match cmd {
        EngineCommand::SavePage(request) => coordinator.save(ctx, request).map(EngineCommandResult::Page),
        EngineCommand::Publish { path, tree } => coordinator
            .publish(ctx, &path, tree)
            .map(EngineCommandResult::Page),
        EngineCommand::Unpublish { path } => {
            coordinator.unpublish(ctx, &path).map(EngineCommandResult::Page)
        }
        EngineCommand::DeletePage { path } => {
            let warnings = coordinator.delete(ctx, &path)?;
            Ok(EngineCommandResult::Deleted { path, warnings })
        }
        EngineCommand::PutMenu { slug, items } => {
            put_menu(site.menus.as_ref(), &slug, &items).map(EngineCommandResult::Menu)
        }
        EngineCommand::RepairPages { dry_run } => {
            repair_all_pages(site.pages.as_ref(), dry_run).map(EngineCommandResult::Repair)
        }
    }
}
