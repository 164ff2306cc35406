//! Folio Engine - Orchestration layer
//!
//! Coordinates the page composition domain with persistence: publishing
//! with cache invalidation, page commands, public and preview rendering,
//! menu linking and the one-time node id repair.

pub mod commands;
pub mod site;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
pub use commands::pages::UpsertPageRequest;
pub use commands::publish::{PublishCoordinator, PublishReport, PublishWarning};
pub use commands::render::PageRenderer;
pub use site::Site;
