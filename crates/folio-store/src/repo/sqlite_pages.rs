//! SQLite page repository
//!
//! One row per document. The tree is stored as JSON in `data`, legacy
//! markup in `body`; every write replaces the whole row in a single
//! statement, so readers never see a half-written document.

#![allow(clippy::result_large_err)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use folio_core::errors::{ExError, ExErrorKind, FolioError};
use folio_core::model::{PageDocument, PageTree};
use folio_core::repository::{PageRepository, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::errors::{from_rusqlite, is_constraint_violation, lock_error, path_conflict, serialization_error};

const PAGE_COLUMNS: &str =
    "id, path, title, description, image_url, is_published, data, body, created_at, updated_at";

/// Raw `pages` row before the tree is decoded
struct PageRow {
    id: String,
    path: String,
    title: String,
    description: String,
    image_url: String,
    is_published: bool,
    data: Option<String>,
    body: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl PageRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            path: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            image_url: row.get(4)?,
            is_published: row.get::<_, i64>(5)? != 0,
            data: row.get(6)?,
            body: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// A `data` value that does not parse as a tree is kept as markup,
    /// so it still renders verbatim
    fn into_document(self) -> PageDocument {
        let tree = self.data.as_deref().and_then(PageTree::parse);
        let legacy_body = match (&tree, self.body, self.data) {
            (_, Some(body), _) => Some(body),
            (None, None, Some(data)) => Some(data),
            _ => None,
        };
        PageDocument {
            id: Some(self.id),
            path: self.path,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            legacy_body,
            tree,
            is_published: self.is_published,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

/// Page storage over a shared SQLite connection
pub struct SqlitePageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePageRepository {
    /// Wrap a configured, migrated connection
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn select_one(conn: &Connection, clause: &str, key: &str) -> RepoResult<Option<PageDocument>> {
        let sql = format!("SELECT {} FROM pages WHERE {} = ?1", PAGE_COLUMNS, clause);
        let row = conn
            .query_row(&sql, [key], PageRow::read)
            .optional()
            .map_err(from_rusqlite)?;
        Ok(row.map(PageRow::into_document))
    }
}

impl PageRepository for SqlitePageRepository {
    fn find(&self, path: &str) -> RepoResult<Option<PageDocument>> {
        let conn = self.conn.lock().map_err(|_| lock_error("find_page"))?;
        Self::select_one(&conn, "path", path)
    }

    fn list(&self) -> RepoResult<Vec<PageDocument>> {
        let conn = self.conn.lock().map_err(|_| lock_error("list_pages"))?;
        let sql = format!(
            "SELECT {} FROM pages ORDER BY updated_at DESC, path ASC",
            PAGE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], PageRow::read)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(rows.into_iter().map(PageRow::into_document).collect())
    }

    fn upsert(&self, doc: PageDocument) -> RepoResult<PageDocument> {
        let data = doc
            .tree
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| serialization_error("upsert_page", &doc.path, e))?;
        let now = Utc::now().timestamp_millis();

        let conn = self.conn.lock().map_err(|_| lock_error("upsert_page"))?;

        let id = match &doc.id {
            Some(id) => {
                let updated = conn
                    .execute(
                        "UPDATE pages SET title = ?2, description = ?3, image_url = ?4,
                            is_published = ?5, data = ?6, body = ?7, updated_at = ?8
                         WHERE id = ?9 AND path = ?1",
                        rusqlite::params![
                            doc.path,
                            doc.title,
                            doc.description,
                            doc.image_url,
                            doc.is_published as i64,
                            data,
                            doc.legacy_body,
                            now,
                            id,
                        ],
                    )
                    .map_err(|e| write_error(e, &doc.path))?;
                if updated == 0 {
                    let stored: Option<String> = conn
                        .query_row("SELECT path FROM pages WHERE id = ?1", [id], |row| row.get(0))
                        .optional()
                        .map_err(from_rusqlite)?;
                    return Err(match stored {
                        Some(stored) => ExError::from(FolioError::PathChanged {
                            id: id.clone(),
                            stored,
                            requested: doc.path.clone(),
                        })
                        .with_op("upsert_page"),
                        None => ExError::new(ExErrorKind::NotFound)
                            .with_op("upsert_page")
                            .with_entity_id(doc.path.clone())
                            .with_message(format!("No stored page with id {}", id)),
                    });
                }
                id.clone()
            }
            None => {
                let taken: bool = conn
                    .query_row("SELECT 1 FROM pages WHERE path = ?1", [&doc.path], |_| Ok(true))
                    .optional()
                    .map_err(from_rusqlite)?
                    .unwrap_or(false);
                if taken {
                    return Err(path_conflict(&doc.path, "upsert_page"));
                }

                let id = Uuid::now_v7().to_string();
                conn.execute(
                    "INSERT INTO pages (id, path, title, description, image_url, is_published, data, body, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                    rusqlite::params![
                        id,
                        doc.path,
                        doc.title,
                        doc.description,
                        doc.image_url,
                        doc.is_published as i64,
                        data,
                        doc.legacy_body,
                        now,
                    ],
                )
                .map_err(|e| write_error(e, &doc.path))?;
                id
            }
        };

        Self::select_one(&conn, "id", &id)?.ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("upsert_page")
                .with_entity_id(doc.path.clone())
                .with_message("written page could not be read back")
        })
    }

    fn delete(&self, path: &str) -> RepoResult<()> {
        let conn = self.conn.lock().map_err(|_| lock_error("delete_page"))?;
        let deleted = conn
            .execute("DELETE FROM pages WHERE path = ?1", [path])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(ExError::from(FolioError::PageNotFound {
                path: path.to_string(),
            })
            .with_op("delete_page"));
        }
        Ok(())
    }
}

/// A constraint failure on write means the path is taken (the unique
/// index) or malformed (the CHECK)
fn write_error(err: rusqlite::Error, path: &str) -> ExError {
    if !is_constraint_violation(&err) {
        return from_rusqlite(err);
    }
    if path.starts_with('/') {
        path_conflict(path, "upsert_page")
    } else {
        ExError::from(FolioError::InvalidPath {
            path: path.to_string(),
            reason: "must start with '/'".to_string(),
        })
        .with_op("upsert_page")
    }
}
