//! Menu linking commands
//!
//! Menus are looked up by slug. The well-known slugs (`main`, `footer`)
//! come into existence empty on first access; any other slug must have
//! been created explicitly. Item urls are soft references to page paths:
//! deleting a page leaves links to it in place, and [`menu_links_status`]
//! only reports them.

#![allow(clippy::result_large_err)]

use folio_core::errors::{ExError, FolioError};
use folio_core::model::menu::well_known_menu_name;
use folio_core::model::MenuWithItems;
use folio_core::{log_degraded, log_op_end, log_op_error, log_op_start};
use folio_core::{Menu, MenuItem, MenuItemInput, MenuRepository, PageRepository, RepoResult};
use serde::Serialize;

/// Menu for `slug`, creating a well-known menu on first access
///
/// # Errors
///
/// Returns `NotFound` for an unknown slug that is not well-known.
pub fn get_or_init(menus: &dyn MenuRepository, slug: &str) -> RepoResult<Menu> {
    if let Some(menu) = menus.find_menu(slug)? {
        return Ok(menu);
    }
    let name = well_known_menu_name(slug).ok_or_else(|| {
        ExError::from(FolioError::MenuNotFound {
            slug: slug.to_string(),
        })
        .with_op("get_or_init_menu")
    })?;
    tracing::info!(op = "get_or_init_menu", menu_slug = slug, "creating well-known menu");
    match menus.create_menu(slug, name) {
        Ok(menu) => Ok(menu),
        // lost a creation race; the other writer's menu is just as good
        Err(e) => menus.find_menu(slug)?.ok_or(e),
    }
}

/// Menu with its items in display order
///
/// # Errors
///
/// Returns `NotFound` for an unknown slug that is not well-known.
pub fn get_menu(menus: &dyn MenuRepository, slug: &str) -> RepoResult<MenuWithItems> {
    let menu = get_or_init(menus, slug)?;
    let items = menus.items(&menu.id)?;
    Ok(MenuWithItems { menu, items })
}

/// Replace every item of a menu
///
/// Input is checked before anything is written; the replacement itself
/// is all-or-nothing, so a failure leaves the previous items in place.
///
/// # Errors
///
/// - `ValidationError` for an item with an empty label or url
/// - `NotFound` for an unknown slug that is not well-known
pub fn put_menu(menus: &dyn MenuRepository, slug: &str, items: &[MenuItemInput]) -> RepoResult<MenuWithItems> {
    log_op_start!("put_menu", menu_slug = slug, item_count = items.len());
    let start = std::time::Instant::now();

    let result = check_items(items)
        .map_err(|e| ExError::from(e).with_op("put_menu").with_entity_id(slug))
        .and_then(|()| get_or_init(menus, slug))
        .and_then(|menu| {
            let items = menus.replace_items(&menu.id, items)?;
            Ok(MenuWithItems { menu, items })
        });

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!("put_menu", duration_ms = elapsed, menu_slug = slug),
        Err(e) => log_op_error!("put_menu", e.clone(), duration_ms = elapsed, menu_slug = slug),
    }
    result
}

/// All menus, by slug
///
/// # Errors
///
/// Propagates repository failures.
pub fn list_menus(menus: &dyn MenuRepository) -> RepoResult<Vec<Menu>> {
    menus.list_menus()
}

fn check_items(items: &[MenuItemInput]) -> Result<(), FolioError> {
    for (index, item) in items.iter().enumerate() {
        if item.label.trim().is_empty() {
            return Err(FolioError::InvalidMenuItem {
                reason: format!("item {} has an empty label", index),
            });
        }
        if item.url.trim().is_empty() {
            return Err(FolioError::InvalidMenuItem {
                reason: format!("item {} ('{}') has an empty url", index, item.label),
            });
        }
    }
    Ok(())
}

/// Where a menu item points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// A stored page exists at the linked path
    Page,
    /// The linked path has no page (deleted or never created)
    Dangling,
    /// Not a site path
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkStatus {
    pub item: MenuItem,
    pub state: LinkState,
}

/// Resolution of every item of one menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuLinksReport {
    pub slug: String,
    pub links: Vec<LinkStatus>,
}

impl MenuLinksReport {
    pub fn dangling(&self) -> impl Iterator<Item = &MenuItem> {
        self.links
            .iter()
            .filter(|l| l.state == LinkState::Dangling)
            .map(|l| &l.item)
    }
}

/// Check which internal links of a menu still resolve to a page
///
/// Informational only: nothing is changed.
///
/// # Errors
///
/// Returns `NotFound` for an unknown slug that is not well-known.
pub fn menu_links_status(
    menus: &dyn MenuRepository,
    pages: &dyn PageRepository,
    slug: &str,
) -> RepoResult<MenuLinksReport> {
    let MenuWithItems { items, .. } = get_menu(menus, slug)?;
    let mut links = Vec::with_capacity(items.len());
    for item in items {
        let state = if !item.is_internal() {
            LinkState::External
        } else if pages.find(link_path(&item.url))?.is_some() {
            LinkState::Page
        } else {
            log_degraded!(
                "menu_links_status",
                "menu links to a missing page",
                menu_slug = slug,
                path = item.url.as_str()
            );
            LinkState::Dangling
        };
        links.push(LinkStatus { item, state });
    }
    Ok(MenuLinksReport {
        slug: slug.to_string(),
        links,
    })
}

/// Page path part of an internal url
fn link_path(url: &str) -> &str {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}
