//! Field schemas for the editor
//!
//! A block's visible fields are computed from its current props on every
//! call; nothing here is cached or persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Registry;
use crate::errors::Result;
use crate::model::Props;

/// Editor widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Number,
    Boolean,
    Color,
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// An editable property currently applicable to a block instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldSpec {
    fn of(kind: FieldKind, key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            kind,
            label: label.to_string(),
            options: Vec::new(),
            placeholder: None,
        }
    }

    pub fn text(key: &str, label: &str) -> Self {
        Self::of(FieldKind::Text, key, label)
    }

    pub fn textarea(key: &str, label: &str) -> Self {
        Self::of(FieldKind::Textarea, key, label)
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::of(FieldKind::Number, key, label)
    }

    pub fn boolean(key: &str, label: &str) -> Self {
        Self::of(FieldKind::Boolean, key, label)
    }

    pub fn color(key: &str, label: &str) -> Self {
        Self::of(FieldKind::Color, key, label)
    }

    /// Select field; `options` are `(label, value)` pairs in display order
    pub fn select(key: &str, label: &str, options: &[(&str, &str)]) -> Self {
        let mut spec = Self::of(FieldKind::Select, key, label);
        spec.options = options
            .iter()
            .map(|(label, value)| SelectOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        spec
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Whether `value` is one of this select field's option values
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Compute the visible fields for an instance of `block_type`
///
/// Pure: same registry, type and props give the same list. Partial or
/// malformed props never fail; only an unregistered type does.
///
/// # Errors
///
/// Returns `UnknownBlockType` if `block_type` is not registered.
pub fn resolve_fields(registry: &Registry, block_type: &str, props: &Props) -> Result<Vec<FieldSpec>> {
    let block = registry.get(block_type)?;
    Ok(block.fields(props))
}

// ----- tolerant prop readers shared by block schemas and renderers -----

/// String prop, `None` when absent, not a string, or blank
pub fn prop_str<'a>(props: &'a Props, key: &str) -> Option<&'a str> {
    props
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// String prop with a fallback for absent/blank values
pub fn prop_str_or<'a>(props: &'a Props, key: &str, default: &'a str) -> &'a str {
    prop_str(props, key).unwrap_or(default)
}

/// Boolean prop; accepts JSON booleans and the strings "true"/"false"
pub fn prop_bool(props: &Props, key: &str) -> bool {
    match props.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Numeric prop; accepts JSON numbers and numeric strings
pub fn prop_number(props: &Props, key: &str) -> Option<f64> {
    match props.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Value of a discriminant select prop, falling back to `default` when
/// the stored value is absent or not one of the field's options
pub fn discriminant<'a>(props: &'a Props, field: &FieldSpec, default: &'a str) -> &'a str {
    match prop_str(props, &field.key) {
        Some(value) if field.allows(value) => value,
        _ => default,
    }
}
