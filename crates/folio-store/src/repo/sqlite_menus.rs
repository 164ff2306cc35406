//! SQLite menu repository

#![allow(clippy::result_large_err)]

use std::sync::{Arc, Mutex};

use folio_core::errors::{ExError, ExErrorKind};
use folio_core::model::{LinkTarget, Menu, MenuItem, MenuItemInput};
use folio_core::repository::{MenuRepository, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::errors::{from_rusqlite, is_constraint_violation, lock_error};

fn read_menu(row: &Row<'_>) -> rusqlite::Result<Menu> {
    Ok(Menu {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
    })
}

fn read_item(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    let target: String = row.get(5)?;
    Ok(MenuItem {
        id: row.get(0)?,
        menu_id: row.get(1)?,
        label: row.get(2)?,
        url: row.get(3)?,
        order: row.get(4)?,
        target: LinkTarget::from_stored(&target),
    })
}

fn select_items(conn: &Connection, menu_id: &str) -> RepoResult<Vec<MenuItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, menu_id, label, url, position, target FROM menu_items
             WHERE menu_id = ?1 ORDER BY position",
        )
        .map_err(from_rusqlite)?;
    let items = stmt
        .query_map([menu_id], read_item)
        .map_err(from_rusqlite)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(from_rusqlite)?;
    Ok(items)
}

/// Menu storage over a shared SQLite connection
pub struct SqliteMenuRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMenuRepository {
    /// Wrap a configured, migrated connection
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

impl MenuRepository for SqliteMenuRepository {
    fn find_menu(&self, slug: &str) -> RepoResult<Option<Menu>> {
        let conn = self.conn.lock().map_err(|_| lock_error("find_menu"))?;
        conn.query_row(
            "SELECT id, slug, name FROM menus WHERE slug = ?1",
            [slug],
            read_menu,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    fn create_menu(&self, slug: &str, name: &str) -> RepoResult<Menu> {
        let conn = self.conn.lock().map_err(|_| lock_error("create_menu"))?;
        let menu = Menu {
            id: Uuid::now_v7().to_string(),
            slug: slug.to_string(),
            name: name.to_string(),
        };
        conn.execute(
            "INSERT INTO menus (id, slug, name) VALUES (?1, ?2, ?3)",
            rusqlite::params![menu.id, menu.slug, menu.name],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_menu")
                .with_entity_id(slug)
        })?;
        Ok(menu)
    }

    fn list_menus(&self) -> RepoResult<Vec<Menu>> {
        let conn = self.conn.lock().map_err(|_| lock_error("list_menus"))?;
        let mut stmt = conn
            .prepare("SELECT id, slug, name FROM menus ORDER BY slug")
            .map_err(from_rusqlite)?;
        let menus = stmt
            .query_map([], read_menu)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(menus)
    }

    fn items(&self, menu_id: &str) -> RepoResult<Vec<MenuItem>> {
        let conn = self.conn.lock().map_err(|_| lock_error("menu_items"))?;
        select_items(&conn, menu_id)
    }

    /// Delete-then-insert inside one transaction; dropping the transaction
    /// on any error rolls the menu back to its previous items
    fn replace_items(&self, menu_id: &str, items: &[MenuItemInput]) -> RepoResult<Vec<MenuItem>> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| lock_error("replace_menu_items"))?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let exists = tx
            .query_row("SELECT 1 FROM menus WHERE id = ?1", [menu_id], |_| Ok(()))
            .optional()
            .map_err(from_rusqlite)?
            .is_some();
        if !exists {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("replace_menu_items")
                .with_entity_id(menu_id)
                .with_message("Menu not found"));
        }

        tx.execute("DELETE FROM menu_items WHERE menu_id = ?1", [menu_id])
            .map_err(from_rusqlite)?;

        for (position, input) in items.iter().enumerate() {
            tx.execute(
                "INSERT INTO menu_items (id, menu_id, label, url, position, target)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    Uuid::now_v7().to_string(),
                    menu_id,
                    input.label,
                    input.url,
                    position as i64,
                    input.target.as_str(),
                ],
            )
            .map_err(|e| {
                let kind = if is_constraint_violation(&e) {
                    ExErrorKind::ValidationError
                } else {
                    ExErrorKind::Persistence
                };
                ExError::new(kind)
                    .with_op("replace_menu_items")
                    .with_entity_id(menu_id)
                    .with_message(format!("item {} rejected: {}", position, e))
            })?;
        }

        let stored = select_items(&tx, menu_id)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(stored)
    }
}
