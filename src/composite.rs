//! Compiled schema nodes and the validator cache.
//!
//! A node compiles into a [`CompositeValidator`]: the keyword validators of
//! the node, in schema member order, plus a [`ChildSelector`] that tells the
//! processor which sub-schemas apply to array elements and object members.
//! Compilation never looks at child schemas, so cyclic schemas compile in
//! bounded time; children are compiled lazily when an instance reaches them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::bundle::MessageBundle;
use crate::dictionary::Dictionary;
use crate::error::{KeywordError, ProcessingError};
use crate::keyword::KeywordValidator;
use crate::pattern::Pattern;
use crate::pointer::JsonPointer;
use crate::processor::Processor;
use crate::report::Report;
use crate::tree::{FullData, SchemaKey, SchemaTree};

/// Ordered keyword validators of one schema node.
pub struct CompositeValidator {
    validators: Vec<Box<dyn KeywordValidator>>,
    children: ChildSelector,
}

impl CompositeValidator {
    /// Wrap already built validators. The order is kept as given.
    pub fn new(validators: Vec<Box<dyn KeywordValidator>>) -> Self {
        Self {
            validators,
            children: ChildSelector::default(),
        }
    }

    /// Compile the node `tree` points to. Validators that can never fail
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError::Compile` if a keyword value is invalid.
    pub fn compile(dictionary: &Dictionary, tree: &SchemaTree) -> Result<Self, ProcessingError> {
        let validators = dictionary
            .compile(tree)?
            .into_iter()
            .filter(|validator| {
                let elide = validator.always_true();
                if elide {
                    trace!(pointer = %tree.pointer(), keyword = validator.keyword(), "elided always-true validator");
                }
                !elide
            })
            .collect();
        let children = ChildSelector::compile(tree.node()).map_err(|source| ProcessingError::Compile {
            pointer: tree.pointer().to_string(),
            source,
        })?;
        Ok(Self {
            validators,
            children,
        })
    }

    /// The validators, in evaluation order.
    pub fn validators(&self) -> &[Box<dyn KeywordValidator>] {
        &self.validators
    }

    pub fn children(&self) -> &ChildSelector {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the validators in order, stopping as soon as the accumulated
    /// report is no longer a success.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by a validator; later validators do
    /// not run.
    pub fn validate(
        &self,
        processor: &dyn Processor,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<Report, ProcessingError> {
        let mut report = Report::new();
        for validator in &self.validators {
            validator.validate(processor, &mut report, bundle, data)?;
            if !report.is_success() {
                break;
            }
        }
        Ok(report)
    }
}

impl fmt::Display for CompositeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.validators.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl fmt::Debug for CompositeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeValidator")
            .field("validators", &self.to_string())
            .field("children", &self.children)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Items {
    #[default]
    None,
    Single,
    Tuple(usize),
}

/// Which sub-schemas apply to the elements of a container instance.
///
/// Pointers returned are relative to the schema node the selector was
/// compiled from.
#[derive(Debug, Default)]
pub struct ChildSelector {
    items: Items,
    additional_items: bool,
    properties: BTreeSet<String>,
    patterns: Vec<Pattern>,
    additional_properties: bool,
}

impl ChildSelector {
    /// Read `items`, `additionalItems`, `properties`, `patternProperties`
    /// and `additionalProperties` from a schema node.
    ///
    /// # Errors
    ///
    /// Returns an error when one of those keywords has an unusable shape or
    /// a `patternProperties` key is not a valid regular expression.
    pub fn compile(node: &Value) -> Result<Self, KeywordError> {
        let mut selector = Self::default();
        let Value::Object(members) = node else {
            return Ok(selector);
        };

        selector.items = match members.get("items") {
            None => Items::None,
            Some(Value::Object(_)) => Items::Single,
            Some(Value::Array(schemas)) => Items::Tuple(schemas.len()),
            Some(other) => return Err(shape_error("items", "schema or array", other)),
        };
        selector.additional_items = matches!(members.get("additionalItems"), Some(Value::Object(_)));

        match members.get("properties") {
            None => {}
            Some(Value::Object(properties)) => {
                selector.properties = properties.keys().cloned().collect();
            }
            Some(other) => return Err(shape_error("properties", "object", other)),
        }
        match members.get("patternProperties") {
            None => {}
            Some(Value::Object(patterns)) => {
                for source in patterns.keys() {
                    selector.patterns.push(Pattern::compile("patternProperties", source)?);
                }
            }
            Some(other) => return Err(shape_error("patternProperties", "object", other)),
        }
        selector.additional_properties =
            matches!(members.get("additionalProperties"), Some(Value::Object(_)));

        Ok(selector)
    }

    /// Schemas for the array element at `index`.
    pub fn array_schemas(&self, index: usize) -> Vec<JsonPointer> {
        match self.items {
            Items::Single => vec![JsonPointer::of(["items"])],
            Items::Tuple(len) if index < len => {
                vec![JsonPointer::of(["items".to_string(), index.to_string()])]
            }
            Items::Tuple(_) if self.additional_items => vec![JsonPointer::of(["additionalItems"])],
            _ => Vec::new(),
        }
    }

    /// Schemas for the object member `name`: its `properties` entry, every
    /// matching `patternProperties` entry, or else `additionalProperties`.
    pub fn object_schemas(&self, name: &str) -> Vec<JsonPointer> {
        let mut schemas = Vec::new();
        if self.properties.contains(name) {
            schemas.push(JsonPointer::of(["properties", name]));
        }
        for pattern in &self.patterns {
            if pattern.is_match(name) {
                schemas.push(JsonPointer::of(["patternProperties", pattern.as_str()]));
            }
        }
        if schemas.is_empty() && self.additional_properties {
            schemas.push(JsonPointer::of(["additionalProperties"]));
        }
        schemas
    }

    /// True when no container instance can have child schemas.
    pub fn is_empty(&self) -> bool {
        self.items == Items::None
            && !self.additional_items
            && self.properties.is_empty()
            && self.patterns.is_empty()
            && !self.additional_properties
    }
}

fn shape_error(keyword: &'static str, expected: &'static str, actual: &Value) -> KeywordError {
    KeywordError::WrongType {
        keyword,
        expected,
        actual: crate::types::json_type_name(actual),
    }
}

/// Compiled validators keyed by schema node identity.
///
/// Safe to share between threads. When two threads compile the same node
/// concurrently the first insert wins and both use the stored validator.
#[derive(Default)]
pub struct ValidatorCache {
    entries: DashMap<SchemaKey, Arc<CompositeValidator>>,
    compilations: AtomicUsize,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The validator for the node `tree` points to, compiling it on first
    /// use. Failed compilations are not cached.
    ///
    /// # Errors
    ///
    /// Returns the compilation error for an invalid schema node.
    pub fn get_or_compile(
        &self,
        tree: &SchemaTree,
        dictionary: &Dictionary,
    ) -> Result<Arc<CompositeValidator>, ProcessingError> {
        let key = tree.key();
        if let Some(entry) = self.entries.get(&key) {
            return Ok(Arc::clone(entry.value()));
        }

        let compiled = Arc::new(CompositeValidator::compile(dictionary, tree)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);
        debug!(
            pointer = %tree.pointer(),
            validators = compiled.len(),
            "compiled schema node"
        );
        let entry = self.entries.entry(key).or_insert(compiled);
        Ok(Arc::clone(entry.value()))
    }

    /// How many times a node was compiled since the cache was created.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("entries", &self.len())
            .field("compilations", &self.compilations())
            .finish()
    }
}
