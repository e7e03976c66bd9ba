//! JSON Schema validation for draft-3 and draft-4.
//!
//! Schemas are compiled lazily, one node at a time, into ordered lists of
//! keyword validators. Compiled nodes are cached by identity, so a schema
//! shared through `$ref` is compiled once, and cyclic schemas validate
//! finite instances in finite time.
//!
//! # Example
//!
//! ```
//! use jsv::{Draft, SchemaValidator, ValidationOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {"a": {}, "b": {}},
//!     "patternProperties": {"^x": {}},
//!     "additionalProperties": false
//! });
//!
//! let validator = SchemaValidator::with_options(schema, &ValidationOptions::new(Draft::V4));
//! let report = validator.validate(&json!({"a": 1, "xyz": 2, "c": 3})).unwrap();
//!
//! assert!(!report.is_success());
//! let message = &report.messages()[0];
//! assert_eq!(message.key, "additional properties not permitted");
//! assert_eq!(message.field("unwanted"), Some(&json!(["c"])));
//! ```
//!
//! # Diagnostics and errors
//!
//! Instance problems are collected in a [`Report`] and never abort
//! validation. Schema problems (invalid keyword values, unresolvable
//! references) are returned as [`ProcessingError`].
//!
//! | Draft | Dictionary | Draft-specific keywords |
//! |-------|------------|-------------------------|
//! | `v3` | [`Dictionary::draft_v3`] | `extends`, `disallow`, `divisibleBy`, `required: true` |
//! | `v4` | [`Dictionary::draft_v4`] | `allOf`, `anyOf`, `oneOf`, `not`, `required: [..]`, `multipleOf` |

mod bundle;
mod composite;
mod dictionary;
mod error;
pub mod keyword;
mod loader;
mod pattern;
mod pointer;
mod processor;
mod report;
mod syntax;
mod tree;
mod types;
mod validator;

pub use bundle::{MapBundle, MessageBundle};
pub use composite::{ChildSelector, CompositeValidator, ValidatorCache};
pub use dictionary::{Dictionary, DictionaryBuilder};
pub use error::{KeywordError, LoadError, ProcessingError};
pub use keyword::{KeywordValidator, ValidatorFactory};
pub use loader::{is_url, load_json, load_json_auto, load_json_str};
pub use pattern::Pattern;
pub use pointer::JsonPointer;
pub use processor::{Processor, ValidationProcessor};
pub use report::{ProcessingMessage, Report, Severity};
pub use syntax::{check_syntax, lint, lint_file, FileResult, FileStatus, LintResult};
pub use tree::{FullData, InstanceTree, SchemaKey, SchemaTree};
pub use types::{Draft, NodeType, ValidationOptions};
pub use validator::{validate, SchemaValidator};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
