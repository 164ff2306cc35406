//! Folio Store - SQLite persistence
//!
//! Provides:
//! - Connection setup (foreign keys, WAL, busy timeout)
//! - Embedded, checksummed schema migrations
//! - `PageRepository` and `MenuRepository` implementations

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::{SqliteMenuRepository, SqlitePageRepository, SqliteStore};
