pub mod memory;
pub mod tree_ops;

pub use memory::{MemoryMenuRepository, MemoryPageRepository};
pub use tree_ops::ParentRef;
