use folio_core_types::RequestId;
use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error crossing a crate boundary is classified into one of these
/// kinds. Each kind maps to a stable code usable by callers (CLI exit
/// handling, HTTP status mapping in an outer layer, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    NotFound,
    PathConflict,

    // Tree integrity
    DuplicateNodeId,
    UnknownBlockType,
    DuplicateBlockType,

    // Input
    ValidationError,

    // Soft failures
    CacheInvalidationFailure,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Configuration,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::PathConflict => "ERR_PATH_CONFLICT",
            ExErrorKind::DuplicateNodeId => "ERR_DUPLICATE_NODE_ID",
            ExErrorKind::UnknownBlockType => "ERR_UNKNOWN_BLOCK_TYPE",
            ExErrorKind::DuplicateBlockType => "ERR_DUPLICATE_BLOCK_TYPE",
            ExErrorKind::ValidationError => "ERR_VALIDATION",
            ExErrorKind::CacheInvalidationFailure => "ERR_CACHE_INVALIDATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether callers may continue after this error (the operation's
    /// primary effect already happened or the lookup simply came up empty)
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            ExErrorKind::NotFound | ExErrorKind::CacheInvalidationFailure
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, path or
/// slug, node id, request id) to be logged and reported without the
/// caller reformatting anything.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    node_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            node_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a page path or a menu slug)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add content node context
    pub fn with_node_id(mut self, id: impl Into<String>) -> Self {
        self.node_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context (path or slug), if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the node id context, if any
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(node_id) = &self.node_id {
            write!(f, " (node_id: {})", node_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for folio operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    // ===== Lookup Errors =====
    /// No document is stored at the path
    #[error("Page not found: {path}")]
    PageNotFound { path: String },

    /// No menu exists for the slug and the slug is not a well-known menu
    #[error("Menu not found: {slug}")]
    MenuNotFound { slug: String },

    /// A content node referenced by id is not in the tree
    #[error("Content node not found: {node_id}")]
    NodeNotFound { node_id: String },

    /// Create attempted on a path that already holds a document
    #[error("A page already exists at path {path}")]
    PathConflict { path: String },

    // ===== Tree Integrity Errors =====
    /// Node id already used elsewhere in the same document
    #[error("Duplicate content node id: {node_id}")]
    DuplicateNodeId { node_id: String },

    /// Block type is not present in the registry
    #[error("Unknown block type: {block_type}")]
    UnknownBlockType { block_type: String },

    /// Two block types registered under the same name
    #[error("Block type registered twice: {block_type}")]
    DuplicateBlockType { block_type: String },

    /// Children placed under a block that does not lay out children
    #[error("Block {block_type} ({node_id}) cannot hold child blocks")]
    NotAContainer { node_id: String, block_type: String },

    /// Moving a node under itself or one of its descendants
    #[error("Cannot move node {node_id} into its own subtree")]
    CyclicMove { node_id: String },

    // ===== Validation Errors =====
    /// Page path is malformed
    #[error("Invalid page path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// An update tried to move a stored document to another path; paths
    /// only change by deleting and recreating the page
    #[error("Page {id} is stored at {stored}; its path cannot change to {requested}")]
    PathChanged {
        id: String,
        stored: String,
        requested: String,
    },

    /// Page title is empty or whitespace-only
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    /// Insert or move position outside the sibling list
    #[error("Index {index} out of bounds for parent with {len} children")]
    InvalidIndex { index: usize, len: usize },

    /// Structured content failed a shape check
    #[error("Invalid content tree: {reason}")]
    InvalidTree { reason: String },

    /// Menu item input rejected before any write
    #[error("Invalid menu item: {reason}")]
    InvalidMenuItem { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from FolioError to ExError
impl From<FolioError> for ExError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::PageNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(path)
                .with_message("Page not found"),
            FolioError::MenuNotFound { slug } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(slug)
                .with_message("Menu not found"),
            FolioError::NodeNotFound { node_id } => ExError::new(ExErrorKind::NotFound)
                .with_node_id(node_id)
                .with_message("Content node not found"),
            FolioError::PathConflict { path } => ExError::new(ExErrorKind::PathConflict)
                .with_entity_id(path)
                .with_message("A page already exists at this path"),
            FolioError::DuplicateNodeId { node_id } => {
                ExError::new(ExErrorKind::DuplicateNodeId)
                    .with_node_id(node_id)
                    .with_message("Content node id already used in this document")
            }
            FolioError::UnknownBlockType { block_type } => {
                ExError::new(ExErrorKind::UnknownBlockType)
                    .with_message(format!("Unknown block type: {}", block_type))
            }
            FolioError::DuplicateBlockType { block_type } => {
                ExError::new(ExErrorKind::DuplicateBlockType)
                    .with_message(format!("Block type registered twice: {}", block_type))
            }
            FolioError::NotAContainer {
                node_id,
                block_type,
            } => ExError::new(ExErrorKind::ValidationError)
                .with_node_id(node_id)
                .with_message(format!("{} blocks cannot hold child blocks", block_type)),
            FolioError::CyclicMove { node_id } => ExError::new(ExErrorKind::ValidationError)
                .with_node_id(node_id)
                .with_message("Cannot move a node into its own subtree"),
            FolioError::InvalidPath { path, reason } => {
                ExError::new(ExErrorKind::ValidationError)
                    .with_entity_id(path)
                    .with_message(format!("Invalid path: {}", reason))
            }
            FolioError::PathChanged {
                id,
                stored,
                requested,
            } => ExError::new(ExErrorKind::ValidationError)
                .with_entity_id(requested)
                .with_message(format!(
                    "Page {} is stored at {}; delete and recreate it to move it",
                    id, stored
                )),
            FolioError::InvalidTitle { reason } => ExError::new(ExErrorKind::ValidationError)
                .with_message(format!("Invalid title: {}", reason)),
            FolioError::InvalidIndex { index, len } => ExError::new(ExErrorKind::ValidationError)
                .with_message(format!("Index {} out of bounds (len {})", index, len)),
            FolioError::InvalidTree { reason } => ExError::new(ExErrorKind::ValidationError)
                .with_message(format!("Invalid content tree: {}", reason)),
            FolioError::InvalidMenuItem { reason } => ExError::new(ExErrorKind::ValidationError)
                .with_message(format!("Invalid menu item: {}", reason)),
            FolioError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            FolioError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::PathConflict)
            .with_op("upsert_page")
            .with_entity_id("/about")
            .with_message("exists");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_PATH_CONFLICT]"));
        assert!(text.contains("upsert_page"));
        assert!(text.contains("/about"));
    }

    #[test]
    fn test_soft_kinds() {
        assert!(ExErrorKind::NotFound.is_soft());
        assert!(ExErrorKind::CacheInvalidationFailure.is_soft());
        assert!(!ExErrorKind::Persistence.is_soft());
        assert!(!ExErrorKind::DuplicateNodeId.is_soft());
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk");
        let outer = ExError::new(ExErrorKind::CacheInvalidationFailure).with_source(inner);
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
        assert!(std::error::Error::source(&outer).is_some());
    }
}
