pub mod document;
pub mod menu;
pub mod node;

pub use document::{PageDocument, PageSummary};
pub use menu::{LinkTarget, Menu, MenuItem, MenuItemInput, MenuWithItems, WELL_KNOWN_MENUS};
pub use node::{ContentNode, PageRoot, PageTree, Props};
