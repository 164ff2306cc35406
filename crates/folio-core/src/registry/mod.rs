//! Block type registry
//!
//! The registry is assembled once at startup through [`RegistryBuilder`]
//! and is read-only afterwards. Rendering and field resolution dispatch on
//! the block type name with a single map lookup.

pub mod fields;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::{FolioError, Result};
use crate::model::{ContentNode, Props};

pub use fields::{resolve_fields, FieldKind, FieldSpec, SelectOption};

/// Grouping label for the editor's block palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Layout,
    Typography,
    Media,
    Actions,
    Content,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Layout => "Layout",
            Category::Typography => "Typography",
            Category::Media => "Media",
            Category::Actions => "Actions",
            Category::Content => "Content",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs handed to a block's render contract
#[derive(Debug)]
pub struct BlockRender<'a> {
    pub node_id: &'a str,
    /// Default props with the node's own props merged over them
    pub props: &'a Props,
    /// Already-rendered markup of the node's children
    pub children: &'a str,
}

/// A registered kind of content unit
pub trait BlockType: Send + Sync {
    /// Unique registry key, also the `type` stored on content nodes
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Props a freshly inserted instance starts with
    fn default_props(&self) -> Props;

    /// Fields currently applicable given the instance's props.
    /// Must be pure and must tolerate partial props.
    fn fields(&self, props: &Props) -> Vec<FieldSpec>;

    /// Append this block's markup to `out`
    fn render(&self, input: &BlockRender<'_>, out: &mut String);

    /// Whether the block lays out nested nodes
    fn accepts_children(&self) -> bool {
        false
    }
}

/// Immutable catalog of block types
#[derive(Clone, Default)]
pub struct Registry {
    blocks: Vec<Arc<dyn BlockType>>,
    by_name: HashMap<&'static str, usize>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("blocks", &self.names())
            .finish()
    }
}

impl Registry {
    /// Start assembling a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding the built-in block catalog
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBlockType` if two built-ins share a name.
    pub fn standard() -> Result<Self> {
        crate::blocks::register_standard(Self::builder())?.build()
    }

    /// Look up a block type by name
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlockType` if no block is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&dyn BlockType> {
        self.by_name
            .get(name)
            .map(|&i| self.blocks[i].as_ref())
            .ok_or_else(|| FolioError::UnknownBlockType {
                block_type: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Block names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.blocks.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block names grouped by category, categories in declaration order,
    /// names in registration order
    pub fn categories(&self) -> Vec<(Category, Vec<&'static str>)> {
        let mut groups: Vec<(Category, Vec<&'static str>)> = Vec::new();
        for block in &self.blocks {
            match groups.iter_mut().find(|(c, _)| *c == block.category()) {
                Some((_, names)) => names.push(block.name()),
                None => groups.push((block.category(), vec![block.name()])),
            }
        }
        groups.sort_by_key(|(c, _)| *c);
        groups
    }

    /// Build a new node of `block_type` with a fresh id and default props
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlockType` if `block_type` is not registered.
    pub fn new_node(&self, block_type: &str) -> Result<ContentNode> {
        let block = self.get(block_type)?;
        Ok(ContentNode::new(
            fresh_node_id(block.name()),
            block.name(),
            block.default_props(),
        ))
    }
}

/// Node id in the `<Type>-<uuid>` form used throughout stored trees
pub fn fresh_node_id(block_type: &str) -> String {
    format!("{}-{}", block_type, Uuid::now_v7())
}

/// Collects block types; duplicates fail at registration, not at render
#[derive(Default)]
pub struct RegistryBuilder {
    blocks: Vec<Arc<dyn BlockType>>,
    by_name: HashMap<&'static str, usize>,
}

impl RegistryBuilder {
    /// Add a block type
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBlockType` if the name is already taken.
    pub fn register(mut self, block: impl BlockType + 'static) -> Result<Self> {
        let name = block.name();
        if self.by_name.contains_key(name) {
            return Err(FolioError::DuplicateBlockType {
                block_type: name.to_string(),
            });
        }
        self.by_name.insert(name, self.blocks.len());
        self.blocks.push(Arc::new(block));
        Ok(self)
    }

    /// Freeze the registry
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so callers chain with `?`.
    pub fn build(self) -> Result<Registry> {
        Ok(Registry {
            blocks: self.blocks,
            by_name: self.by_name,
        })
    }
}
