pub mod invariants;
pub mod repair;
pub mod validation;

pub use repair::{repair, Reassignment, RepairReport};
pub use validation::{validate_document, validate_path, validate_title, validate_tree, validate_tree_with, ValidationReport};
