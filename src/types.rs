//! Core types: JSON node types, draft selection and validation options.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keywords that carry no validation logic of their own but are part of the
/// vocabulary of both drafts (structure, annotations, references).
pub const STRUCTURAL_KEYWORDS: &[&str] = &[
    "$schema",
    "id",
    "$ref",
    "title",
    "description",
    "default",
    "definitions",
    "format",
    "properties",
    "patternProperties",
    "items",
    "exclusiveMaximum",
    "exclusiveMinimum",
];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    NodeType::of(value).name()
}

/// JSON equality as JSON Schema defines it: numbers compare by value, so
/// `1` and `1.0` are equal.
pub fn json_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_equals(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).map(|w| json_equals(v, w)).unwrap_or(false))
        }
        _ => a == b,
    }
}

/// The type of a JSON value, distinguishing integers from other numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl NodeType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => NodeType::Null,
            Value::Bool(_) => NodeType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => NodeType::Integer,
            Value::Number(_) => NodeType::Number,
            Value::String(_) => NodeType::String,
            Value::Array(_) => NodeType::Array,
            Value::Object(_) => NodeType::Object,
        }
    }

    /// Parse a type name as it appears in `type` and `disallow`.
    ///
    /// `"any"` is not a node type and returns `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "array" => Some(NodeType::Array),
            "boolean" => Some(NodeType::Boolean),
            "integer" => Some(NodeType::Integer),
            "null" => Some(NodeType::Null),
            "number" => Some(NodeType::Number),
            "object" => Some(NodeType::Object),
            "string" => Some(NodeType::String),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Array => "array",
            NodeType::Boolean => "boolean",
            NodeType::Integer => "integer",
            NodeType::Null => "null",
            NodeType::Number => "number",
            NodeType::Object => "object",
            NodeType::String => "string",
        }
    }

    /// Whether an instance of type `self` satisfies the declared type `declared`.
    ///
    /// Integers are numbers.
    pub fn satisfies(&self, declared: NodeType) -> bool {
        *self == declared || (*self == NodeType::Integer && declared == NodeType::Number)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JSON Schema draft governing keyword semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Draft {
    V3,
    #[default]
    V4,
}

impl Draft {
    /// Parse a draft name: `v4`, `draft4`, `draft-04`, `4` (case-insensitive).
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        let digits = s
            .trim_start_matches("draft")
            .trim_start_matches('-')
            .trim_start_matches('v')
            .trim_start_matches('0');
        match digits {
            "3" => Some(Draft::V3),
            "4" => Some(Draft::V4),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Draft::V3 => "draft-03",
            Draft::V4 => "draft-04",
        }
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for building a [`SchemaValidator`](crate::SchemaValidator).
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Draft whose keyword dictionary compiles the schema.
    pub draft: Draft,
    /// When true, children of a container instance are validated even if
    /// the container itself already failed. Defaults to false.
    pub deep_check: bool,
}

impl ValidationOptions {
    /// Create options for a draft with deep checking disabled.
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            deep_check: false,
        }
    }

    /// Set deep checking.
    pub fn deep_check(mut self, deep_check: bool) -> Self {
        self.deep_check = deep_check;
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new(Draft::default())
    }
}
