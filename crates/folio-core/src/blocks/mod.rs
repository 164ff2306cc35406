//! Built-in block catalog
//!
//! Each block is a unit struct implementing [`BlockType`]; its field
//! resolver is an explicit function of the instance props so conditional
//! fields are testable one block at a time.

mod actions;
mod content;
mod hero;
mod layout;
mod media;
mod typography;

pub use actions::Button;
pub use content::Card;
pub use hero::Hero;
pub use layout::{Columns, Spacer};
pub use media::Image;
pub use typography::{Heading, Text};

use serde_json::Value;

use crate::errors::Result;
use crate::model::Props;
use crate::registry::{FieldSpec, RegistryBuilder};

/// Register every built-in block on `builder`
///
/// # Errors
///
/// Returns `DuplicateBlockType` if a name is already registered.
pub fn register_standard(builder: RegistryBuilder) -> Result<RegistryBuilder> {
    builder
        .register(Hero)?
        .register(Heading)?
        .register(Text)?
        .register(Image)?
        .register(Button)?
        .register(Card)?
        .register(Columns)?
        .register(Spacer)
}

pub(crate) const ALIGN_OPTIONS: &[(&str, &str)] =
    &[("Left", "left"), ("Center", "center"), ("Right", "right")];

pub(crate) fn align_field() -> FieldSpec {
    FieldSpec::select("align", "Alignment", ALIGN_OPTIONS)
}

/// Build a props map from `(key, value)` pairs
pub(crate) fn props_of(pairs: &[(&str, Value)]) -> Props {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Escape for element content
pub(crate) fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Escape for a double-quoted attribute value
pub(crate) fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Only pass CSS color values made of safe characters (`#fff`,
/// `rgba(0,0,0,.5)`, `tomato`)
pub(crate) fn css_color(value: &str) -> Option<&str> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | ' ' | '%'));
    ok.then_some(value)
}

/// URL schemes a rendered link or image may use
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Pass relative URLs and `http`, `https` or `mailto` ones; anything else
/// (`javascript:`, `data:`, ...) is dropped
///
/// Browsers ignore tabs and newlines inside a scheme, so they are removed
/// before the scheme is read.
pub(crate) fn safe_url(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let scheme_end = cleaned.find(':');
    let path_start = cleaned.find(|c| matches!(c, '/' | '?' | '#'));
    match scheme_end {
        Some(end) if path_start.map_or(true, |start| end < start) => {
            let scheme = cleaned[..end].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str()).then_some(trimmed)
        }
        _ => Some(trimmed),
    }
}

/// Opening tag prefix shared by every block: `<tag class="block-x" data-node-id="..."`
pub(crate) fn open_tag(out: &mut String, tag: &str, class: &str, node_id: &str) {
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(&attr(class));
    out.push_str("\" data-node-id=\"");
    out.push_str(&attr(node_id));
    out.push('"');
}
