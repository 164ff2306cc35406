#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{ExError, ExErrorKind, FolioError};
use crate::model::{Menu, MenuItem, MenuItemInput, PageDocument};
use crate::repository::{MenuRepository, PageRepository, RepoResult};

fn lock<'a, T>(mutex: &'a Mutex<T>, op: &str) -> RepoResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op)
            .with_message("in-memory store lock poisoned")
    })
}

/// HashMap-backed page storage
///
/// Same contract as the SQLite repository, keyed by document id. Used by
/// tests and by tools that work on a tree without a database.
#[derive(Debug, Default)]
pub struct MemoryPageRepository {
    pages: Mutex<HashMap<String, PageDocument>>,
}

impl MemoryPageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageRepository for MemoryPageRepository {
    fn find(&self, path: &str) -> RepoResult<Option<PageDocument>> {
        let pages = lock(&self.pages, "find_page")?;
        Ok(pages.values().find(|p| p.path == path).cloned())
    }

    fn list(&self) -> RepoResult<Vec<PageDocument>> {
        let pages = lock(&self.pages, "list_pages")?;
        let mut all: Vec<PageDocument> = pages.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.path.cmp(&b.path)));
        Ok(all)
    }

    fn upsert(&self, mut doc: PageDocument) -> RepoResult<PageDocument> {
        let mut pages = lock(&self.pages, "upsert_page")?;
        let now = Utc::now();

        let path_owner = pages
            .values()
            .find(|p| p.path == doc.path)
            .and_then(|p| p.id.clone());

        match doc.id.clone() {
            Some(id) => {
                let existing = pages.get(&id).ok_or_else(|| {
                    ExError::new(ExErrorKind::NotFound)
                        .with_op("upsert_page")
                        .with_entity_id(doc.path.clone())
                        .with_message(format!("No stored page with id {}", id))
                })?;
                if existing.path != doc.path {
                    return Err(ExError::from(FolioError::PathChanged {
                        id,
                        stored: existing.path.clone(),
                        requested: doc.path.clone(),
                    })
                    .with_op("upsert_page"));
                }
                doc.created_at = existing.created_at;
                doc.updated_at = now;
                pages.insert(id, doc.clone());
            }
            None => {
                if path_owner.is_some() {
                    return Err(path_conflict(&doc.path));
                }
                let id = Uuid::now_v7().to_string();
                doc.id = Some(id.clone());
                doc.created_at = now;
                doc.updated_at = now;
                pages.insert(id, doc.clone());
            }
        }
        Ok(doc)
    }

    fn delete(&self, path: &str) -> RepoResult<()> {
        let mut pages = lock(&self.pages, "delete_page")?;
        let id = pages
            .iter()
            .find(|(_, p)| p.path == path)
            .map(|(id, _)| id.clone())
            .ok_or_else(|| {
                ExError::from(FolioError::PageNotFound {
                    path: path.to_string(),
                })
                .with_op("delete_page")
            })?;
        pages.remove(&id);
        Ok(())
    }
}

fn path_conflict(path: &str) -> ExError {
    ExError::from(FolioError::PathConflict {
        path: path.to_string(),
    })
    .with_op("upsert_page")
}

#[derive(Debug, Default)]
struct MenuState {
    menus: Vec<Menu>,
    items: HashMap<String, Vec<MenuItem>>,
}

/// Vec-backed menu storage
#[derive(Debug, Default)]
pub struct MemoryMenuRepository {
    state: Mutex<MenuState>,
}

impl MemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MenuRepository for MemoryMenuRepository {
    fn find_menu(&self, slug: &str) -> RepoResult<Option<Menu>> {
        let state = lock(&self.state, "find_menu")?;
        Ok(state.menus.iter().find(|m| m.slug == slug).cloned())
    }

    fn create_menu(&self, slug: &str, name: &str) -> RepoResult<Menu> {
        let mut state = lock(&self.state, "create_menu")?;
        if state.menus.iter().any(|m| m.slug == slug) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("create_menu")
                .with_entity_id(slug)
                .with_message("Menu slug already exists"));
        }
        let menu = Menu {
            id: Uuid::now_v7().to_string(),
            slug: slug.to_string(),
            name: name.to_string(),
        };
        state.menus.push(menu.clone());
        Ok(menu)
    }

    fn list_menus(&self) -> RepoResult<Vec<Menu>> {
        let state = lock(&self.state, "list_menus")?;
        let mut menus = state.menus.clone();
        menus.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(menus)
    }

    fn items(&self, menu_id: &str) -> RepoResult<Vec<MenuItem>> {
        let state = lock(&self.state, "menu_items")?;
        Ok(state.items.get(menu_id).cloned().unwrap_or_default())
    }

    fn replace_items(&self, menu_id: &str, items: &[MenuItemInput]) -> RepoResult<Vec<MenuItem>> {
        let mut state = lock(&self.state, "replace_menu_items")?;
        if !state.menus.iter().any(|m| m.id == menu_id) {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("replace_menu_items")
                .with_entity_id(menu_id)
                .with_message("Menu not found"));
        }

        // build the whole list before touching state
        let mut replacement = Vec::with_capacity(items.len());
        for (order, input) in items.iter().enumerate() {
            if input.label.trim().is_empty() {
                return Err(ExError::from(FolioError::InvalidMenuItem {
                    reason: format!("item {} has an empty label", order),
                })
                .with_op("replace_menu_items")
                .with_entity_id(menu_id));
            }
            replacement.push(MenuItem {
                id: Uuid::now_v7().to_string(),
                menu_id: menu_id.to_string(),
                label: input.label.clone(),
                url: input.url.clone(),
                order: order as u32,
                target: input.target,
            });
        }
        state.items.insert(menu_id.to_string(), replacement.clone());
        Ok(replacement)
    }
}
