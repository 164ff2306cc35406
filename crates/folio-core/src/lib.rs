//! Folio Core - page composition kernel
//!
//! Pure domain logic for composing pages out of registered blocks:
//! - Block registry, built-in block catalog and per-instance field schemas
//! - Page document and content tree models with id-uniqueness enforcement
//! - Tree validation and the first-wins duplicate id repair
//! - Repository and render cache seams, with in-memory implementations
//! - HTML renderer with legacy markup fallback
//! - Error and logging facilities shared by every folio crate

pub mod blocks;
pub mod cache;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod registry;
pub mod render;
pub mod repository;
pub mod rules;

// Re-exported so logging macros resolve `$crate::folio_core_types` in
// downstream crates.
pub use folio_core_types;

pub use cache::{MemoryRenderCache, NoopRenderCache, RenderCache};
pub use errors::{ExError, ExErrorKind, FolioError, Result};
pub use model::{ContentNode, Menu, MenuItem, MenuItemInput, PageDocument, PageTree, Props};
pub use ops::{MemoryMenuRepository, MemoryPageRepository, ParentRef};
pub use registry::{BlockType, Category, FieldKind, FieldSpec, Registry};
pub use render::{RenderFormat, RenderOutput, RenderWarning, Renderer};
pub use repository::{MenuRepository, PageRepository, RepoResult};
