//! Repository layer persisting folio documents and menus to SQLite

#![allow(clippy::result_large_err)]

pub mod sqlite_menus;
pub mod sqlite_pages;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub use sqlite_menus::SqliteMenuRepository;
pub use sqlite_pages::SqlitePageRepository;

use crate::db;
use crate::errors::Result;

/// Both repositories over one migrated connection
pub struct SqliteStore {
    pub pages: Arc<SqlitePageRepository>,
    pub menus: Arc<SqliteMenuRepository>,
}

impl SqliteStore {
    /// Open (creating if needed) and migrate a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_connection(db::open_and_migrate(path)?))
    }

    /// Fresh in-memory database, for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(db::open_in_memory_migrated()?))
    }

    fn from_connection(conn: Connection) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self {
            pages: Arc::new(SqlitePageRepository::new(Arc::clone(&conn))),
            menus: Arc::new(SqliteMenuRepository::new(conn)),
        }
    }
}
