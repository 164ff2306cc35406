//! CLI subcommands
//!
//! Each subcommand builds engine commands or queries and prints their
//! results; none of them touch the database directly.

pub mod blocks;
pub mod menu;
pub mod page;
pub mod publish;
pub mod render;
pub mod repair;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use folio_core::{MemoryRenderCache, Registry, Renderer};
use folio_core_types::RequestContext;
use folio_engine::Site;
use folio_store::SqliteStore;
use serde::Serialize;

use crate::config::FolioConfig;

/// What every subcommand gets: resolved settings and a lazily opened site
pub struct AppContext {
    pub config: FolioConfig,
    pub db_path: PathBuf,
    pub request: RequestContext,
}

impl AppContext {
    pub fn new(config: FolioConfig, db_override: Option<PathBuf>) -> Self {
        let db_path = db_override.unwrap_or_else(|| config.database_path.clone());
        Self {
            config,
            db_path,
            request: RequestContext::new().with_origin("cli"),
        }
    }

    /// Block registry with the built-in catalog
    pub fn registry(&self) -> Result<Arc<Registry>> {
        Ok(Arc::new(Registry::standard()?))
    }

    /// Open (creating and migrating if needed) the configured database
    pub fn site(&self) -> Result<Site> {
        let store = SqliteStore::open(&self.db_path)
            .with_context(|| format!("failed to open database {}", self.db_path.display()))?;
        let cache = Arc::new(MemoryRenderCache::with_ttl_secs(self.config.cache_ttl_secs));
        Ok(Site::from_store(&store, cache, Renderer::new(self.registry()?)))
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
