//! Free-form persona attribute values.
//!
//! Persona groups such as `personality_traits` or `technology_usage` hold
//! arbitrarily shaped data. Every value is one of three shapes, and
//! [`render_group`] is the single place that flattens them into prompt text.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A leaf value inside an attribute group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A named sub-attribute value: a scalar, a list of scalars, or a flat mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Mapping(BTreeMap<String, Scalar>),
}

impl AttributeValue {
    /// Renders the value on its own: lists and mappings are comma-joined.
    pub fn render(&self) -> String {
        match self {
            AttributeValue::Scalar(scalar) => scalar.to_string(),
            AttributeValue::List(items) => join_scalars(items),
            AttributeValue::Mapping(entries) => entries
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Items of a list value. A scalar counts as a one-item list.
    pub fn items(&self) -> Vec<String> {
        match self {
            AttributeValue::Scalar(scalar) => vec![scalar.to_string()],
            AttributeValue::List(items) => items.iter().map(Scalar::to_string).collect(),
            AttributeValue::Mapping(entries) => entries.values().map(Scalar::to_string).collect(),
        }
    }

    /// True when rendering would produce no visible text.
    pub fn is_blank(&self) -> bool {
        match self {
            AttributeValue::Scalar(Scalar::Text(text)) => text.trim().is_empty(),
            AttributeValue::Scalar(_) => false,
            AttributeValue::List(items) => items.is_empty(),
            AttributeValue::Mapping(entries) => entries.is_empty(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Scalar(value.into())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        AttributeValue::List(values.into_iter().map(Scalar::from).collect())
    }
}

/// One of the nine nested persona attribute groups.
pub type AttributeGroup = BTreeMap<String, AttributeValue>;

/// Renders a whole group as `key: value` pairs joined with `", "`.
///
/// Composite values are parenthesised so their inner separators stay
/// distinguishable from the group separator.
pub fn render_group(group: &AttributeGroup) -> String {
    group
        .iter()
        .map(|(key, value)| match value {
            AttributeValue::Scalar(scalar) => format!("{key}: {scalar}"),
            composite => format!("{key}: ({})", composite.render()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_scalars(items: &[Scalar]) -> String {
    items
        .iter()
        .map(Scalar::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
