//! Keyword dictionaries: per-draft tables of validator factories.
//!
//! A dictionary is an explicit value, built once and passed to whatever
//! compiles schemas. Draft dictionaries derive from a common base by copying
//! its entries and then adding, overriding or removing keywords.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::trace;

use crate::error::{KeywordError, ProcessingError};
use crate::keyword::common::{
    AdditionalItemsValidator, AdditionalPropertiesValidator, BoundValidator, EnumValidator,
    PatternValidator, SizeValidator, UniqueItemsValidator,
};
use crate::keyword::draftv4::{CombinatorValidator, NotValidator, RequiredValidator};
use crate::keyword::draftv3::{ExtendsValidator, PropertiesValidator};
use crate::keyword::{draftv3, draftv4, KeywordValidator, ValidatorFactory};
use crate::tree::SchemaTree;
use crate::types::{Draft, STRUCTURAL_KEYWORDS};

/// Immutable mapping from keyword name to validator factory.
#[derive(Clone)]
pub struct Dictionary {
    entries: HashMap<String, ValidatorFactory>,
    inert: BTreeSet<String>,
}

impl Dictionary {
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Keywords with the same semantics in draft-3 and draft-4.
    pub fn common() -> Self {
        let mut builder = Self::builder()
            .add_entry("additionalItems", AdditionalItemsValidator::build)
            .add_entry("additionalProperties", AdditionalPropertiesValidator::build)
            .add_entry("enum", EnumValidator::build)
            .add_entry("maximum", BoundValidator::maximum)
            .add_entry("minimum", BoundValidator::minimum)
            .add_entry("maxItems", SizeValidator::max_items)
            .add_entry("minItems", SizeValidator::min_items)
            .add_entry("maxLength", SizeValidator::max_length)
            .add_entry("minLength", SizeValidator::min_length)
            .add_entry("pattern", PatternValidator::build)
            .add_entry("uniqueItems", UniqueItemsValidator::build);
        for keyword in STRUCTURAL_KEYWORDS {
            builder = builder.add_inert(*keyword);
        }
        builder.freeze()
    }

    pub fn draft_v3() -> Self {
        Self::builder()
            .add_all(&Self::common())
            .add_entry("extends", ExtendsValidator::build)
            .add_entry("type", draftv3::type_keyword)
            .add_entry("disallow", draftv3::disallow)
            .add_entry("divisibleBy", draftv3::divisible_by)
            .add_entry("properties", PropertiesValidator::build)
            .add_entry("dependencies", draftv3::dependencies)
            .add_inert("required")
            .freeze()
    }

    pub fn draft_v4() -> Self {
        Self::builder()
            .add_all(&Self::common())
            .add_entry("allOf", CombinatorValidator::all_of)
            .add_entry("anyOf", CombinatorValidator::any_of)
            .add_entry("oneOf", CombinatorValidator::one_of)
            .add_entry("not", NotValidator::build)
            .add_entry("type", draftv4::type_keyword)
            .add_entry("required", RequiredValidator::build)
            .add_entry("minProperties", draftv4::min_properties)
            .add_entry("maxProperties", draftv4::max_properties)
            .add_entry("multipleOf", draftv4::multiple_of)
            .add_entry("dependencies", draftv4::dependencies)
            .freeze()
    }

    /// The dictionary for `draft`.
    pub fn for_draft(draft: Draft) -> Self {
        match draft {
            Draft::V3 => Self::draft_v3(),
            Draft::V4 => Self::draft_v4(),
        }
    }

    /// Factory for `keyword`, or `None` if the keyword has no validation
    /// semantics in this dictionary.
    pub fn get(&self, keyword: &str) -> Option<ValidatorFactory> {
        self.entries.get(keyword).copied()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    /// Whether the keyword belongs to the vocabulary, with or without a
    /// validator.
    pub fn is_known(&self, keyword: &str) -> bool {
        self.contains(keyword) || self.inert.contains(keyword)
    }

    /// Keywords with a factory, sorted.
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile the validators for the node `tree` points to, in schema
    /// member order. Keywords without a factory are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError::Compile` for the first keyword whose value
    /// is invalid.
    pub fn compile(&self, tree: &SchemaTree) -> Result<Vec<Box<dyn KeywordValidator>>, ProcessingError> {
        let Value::Object(members) = tree.node() else {
            return Ok(Vec::new());
        };
        let node = tree.node();
        let mut validators = Vec::new();
        for keyword in members.keys() {
            let Some(factory) = self.get(keyword) else {
                continue;
            };
            let validator = factory(node).map_err(|source| compile_error(tree, source))?;
            trace!(pointer = %tree.pointer(), validator = %validator, "compiled keyword");
            validators.push(validator);
        }
        Ok(validators)
    }
}

fn compile_error(tree: &SchemaTree, source: KeywordError) -> ProcessingError {
    ProcessingError::Compile {
        pointer: tree.pointer().to_string(),
        source,
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("keywords", &self.keywords())
            .finish()
    }
}

/// Mutable builder; [`freeze`](Self::freeze) produces the dictionary.
#[derive(Default)]
pub struct DictionaryBuilder {
    entries: HashMap<String, ValidatorFactory>,
    inert: BTreeSet<String>,
}

impl DictionaryBuilder {
    /// Add or override an entry.
    pub fn add_entry(mut self, keyword: impl Into<String>, factory: ValidatorFactory) -> Self {
        let keyword = keyword.into();
        self.inert.remove(&keyword);
        self.entries.insert(keyword, factory);
        self
    }

    /// Copy every entry of `other`, overriding existing ones.
    pub fn add_all(mut self, other: &Dictionary) -> Self {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), *v)));
        self.inert.extend(other.inert.iter().cloned());
        self
    }

    /// Drop a keyword inherited from a base dictionary.
    pub fn remove_entry(mut self, keyword: &str) -> Self {
        self.entries.remove(keyword);
        self.inert.remove(keyword);
        self
    }

    /// Declare a keyword that is part of the vocabulary but validates nothing.
    pub fn add_inert(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if !self.entries.contains_key(&keyword) {
            self.inert.insert(keyword);
        }
        self
    }

    pub fn freeze(self) -> Dictionary {
        Dictionary {
            entries: self.entries,
            inert: self.inert,
        }
    }
}
