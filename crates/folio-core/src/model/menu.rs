use serde::{Deserialize, Serialize};

/// Menus created on first access; any other slug must already exist
pub const WELL_KNOWN_MENUS: &[(&str, &str)] = &[("main", "Main Menu"), ("footer", "Footer Menu")];

/// Display name for a well-known slug, `None` for unrecognized slugs
pub fn well_known_menu_name(slug: &str) -> Option<&'static str> {
    WELL_KNOWN_MENUS
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|(_, name)| *name)
}

/// A named navigation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// Where a menu link opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_self")]
    SameWindow,
    #[serde(rename = "_blank")]
    NewWindow,
}

impl LinkTarget {
    /// HTML `target` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::SameWindow => "_self",
            LinkTarget::NewWindow => "_blank",
        }
    }

    /// Parse a stored value; anything unrecognized opens in the same window
    pub fn from_stored(value: &str) -> Self {
        match value {
            "_blank" => LinkTarget::NewWindow,
            _ => LinkTarget::SameWindow,
        }
    }
}

/// One stored entry of a menu
///
/// `url` is a soft reference: it may name a page path, but nothing keeps
/// it in sync when that page is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub menu_id: String,
    pub label: String,
    pub url: String,
    /// 0-based position assigned on replace
    pub order: u32,
    pub target: LinkTarget,
}

impl MenuItem {
    /// Whether the link points inside this site (a page path)
    pub fn is_internal(&self) -> bool {
        self.url.starts_with('/') && !self.url.starts_with("//")
    }
}

/// Item as supplied by an editor; ids and positions are assigned on write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub target: LinkTarget,
}

impl MenuItemInput {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            target: LinkTarget::default(),
        }
    }
}

/// A menu with its ordered items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuWithItems {
    pub menu: Menu,
    pub items: Vec<MenuItem>,
}
