//! HTML rendering of page content
//!
//! Stored content is either a structured tree or pre-tree markup. The
//! renderer tries the tree format first and falls back to emitting the
//! stored string verbatim.

pub mod page_render;

use serde::{Deserialize, Serialize};

pub use page_render::Renderer;

/// Which stored format produced an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Tree,
    Legacy,
}

/// A node that could not be rendered normally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderWarning {
    pub node_id: String,
    pub block_type: String,
    pub message: String,
}

/// Rendered markup plus how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub html: String,
    pub format: RenderFormat,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RenderWarning>,
}

impl RenderOutput {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
