//! The validation pipeline.
//!
//! [`ValidationProcessor`] takes a (schema location, instance location) pair,
//! follows local `$ref`s, fetches or compiles the node's validator, runs it and
//! then descends into the children of container instances. Keyword validators
//! that need sub-schema verdicts (`extends`, `allOf`, `not`, ...) call back
//! into the processor through the [`Processor`] trait.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::bundle::MessageBundle;
use crate::composite::{ChildSelector, ValidatorCache};
use crate::dictionary::Dictionary;
use crate::error::{KeywordError, ProcessingError};
use crate::pointer::JsonPointer;
use crate::report::Report;
use crate::tree::{FullData, SchemaTree};
use crate::types::json_type_name;

/// A stage that validates one (schema, instance) pair into a report.
pub trait Processor: Send + Sync {
    /// Validate `input`, appending diagnostics to `report`.
    ///
    /// Returns the input as processed (with any `$ref` resolved).
    ///
    /// # Errors
    ///
    /// Returns an error when the schema cannot be compiled or resolved;
    /// diagnostics about the instance never surface here.
    fn process<'i>(&self, report: &mut Report, input: &FullData<'i>) -> Result<FullData<'i>, ProcessingError>;
}

/// The processor behind [`SchemaValidator`](crate::SchemaValidator).
pub struct ValidationProcessor {
    dictionary: Arc<Dictionary>,
    bundle: Arc<dyn MessageBundle>,
    cache: ValidatorCache,
    deep_check: bool,
}

impl ValidationProcessor {
    pub fn new(dictionary: Arc<Dictionary>, bundle: Arc<dyn MessageBundle>) -> Self {
        Self {
            dictionary,
            bundle,
            cache: ValidatorCache::new(),
            deep_check: false,
        }
    }

    /// Validate children of containers that already failed.
    pub fn deep_check(mut self, deep_check: bool) -> Self {
        self.deep_check = deep_check;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn cache(&self) -> &ValidatorCache {
        &self.cache
    }

    /// Follow `$ref` chains until a node without a reference is reached.
    fn resolve(&self, tree: &SchemaTree) -> Result<SchemaTree, ProcessingError> {
        let mut current = tree.clone();
        let mut visited: Vec<JsonPointer> = Vec::new();

        while let Some(reference) = reference_of(&current)? {
            let pointer = JsonPointer::from_fragment(&reference).ok_or_else(|| ProcessingError::UnsupportedRef {
                pointer: current.pointer().to_string(),
                reference: reference.clone(),
            })?;
            visited.push(current.pointer().clone());
            if visited.contains(&pointer) {
                return Err(ProcessingError::RefLoop {
                    pointer: current.pointer().to_string(),
                    reference,
                });
            }
            if pointer.resolve(current.document()).is_none() {
                return Err(ProcessingError::DanglingRef {
                    pointer: current.pointer().to_string(),
                    reference,
                });
            }
            trace!(from = %current.pointer(), to = %pointer, "following $ref");
            current = current.with_pointer(pointer);
        }
        Ok(current)
    }

    fn process_children(
        &self,
        report: &mut Report,
        data: &FullData,
        children: &ChildSelector,
    ) -> Result<(), ProcessingError> {
        if children.is_empty() {
            return Ok(());
        }
        let schema = data.schema();
        match data.instance().node() {
            Value::Array(elements) => {
                for index in 0..elements.len() {
                    let instance = data.instance().append(index.to_string());
                    for relative in children.array_schemas(index) {
                        let child = data
                            .with_schema(schema.with_pointer(schema.pointer().join(&relative)))
                            .with_instance(instance.clone());
                        self.process(report, &child)?;
                    }
                }
            }
            Value::Object(members) => {
                for name in members.keys() {
                    let instance = data.instance().append(name.as_str());
                    for relative in children.object_schemas(name) {
                        let child = data
                            .with_schema(schema.with_pointer(schema.pointer().join(&relative)))
                            .with_instance(instance.clone());
                        self.process(report, &child)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// The node's `$ref`, if any. A reference must be a string.
fn reference_of(tree: &SchemaTree) -> Result<Option<String>, ProcessingError> {
    match tree.node().get("$ref") {
        None => Ok(None),
        Some(Value::String(reference)) => Ok(Some(reference.clone())),
        Some(other) => Err(ProcessingError::Compile {
            pointer: tree.pointer().to_string(),
            source: KeywordError::WrongType {
                keyword: "$ref",
                expected: "string",
                actual: json_type_name(other),
            },
        }),
    }
}

impl Processor for ValidationProcessor {
    fn process<'i>(&self, report: &mut Report, input: &FullData<'i>) -> Result<FullData<'i>, ProcessingError> {
        let data = input.with_schema(self.resolve(input.schema())?);
        let entered = data.enter().ok_or_else(|| ProcessingError::ValidationLoop {
            schema: data.schema().pointer().to_string(),
            instance: data.instance().pointer().to_string(),
        })?;
        let validator = self.cache.get_or_compile(entered.schema(), &self.dictionary)?;

        let node_report = validator.validate(self, self.bundle.as_ref(), &entered)?;
        let descend = node_report.is_success() || self.deep_check;
        report.merge_with(node_report);
        if descend {
            self.process_children(report, &entered, validator.children())?;
        }
        Ok(data)
    }
}

impl std::fmt::Debug for ValidationProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationProcessor")
            .field("dictionary", &self.dictionary)
            .field("cache", &self.cache)
            .field("deep_check", &self.deep_check)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MapBundle;
    use crate::tree::InstanceTree;
    use serde_json::json;

    fn processor() -> ValidationProcessor {
        ValidationProcessor::new(Arc::new(Dictionary::draft_v4()), Arc::new(MapBundle::validation()))
    }

    fn run(processor: &ValidationProcessor, schema: Value, instance: &Value) -> Result<Report, ProcessingError> {
        let data = FullData::new(SchemaTree::new(schema), InstanceTree::new(instance));
        let mut report = Report::new();
        processor.process(&mut report, &data)?;
        Ok(report)
    }

    #[test]
    fn descends_into_properties() {
        let schema = json!({"properties": {"a": {"type": "string"}}});
        let report = run(&processor(), schema, &json!({"a": 1})).unwrap();
        assert_eq!(report.len(), 1);
        let msg = &report.messages()[0];
        assert_eq!(msg.instance.to_string(), "/a");
        assert_eq!(msg.schema.to_string(), "/properties/a");
    }

    #[test]
    fn failed_container_hides_children_unless_deep() {
        let schema = json!({"maxItems": 1, "items": {"type": "string"}});
        let instance = json!([1, 2]);
        let shallow = run(&processor(), schema.clone(), &instance).unwrap();
        assert_eq!(shallow.len(), 1);

        let deep = run(&processor().deep_check(true), schema, &instance).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn resolves_local_references() {
        let schema = json!({
            "definitions": {"positive": {"minimum": 0, "exclusiveMinimum": true}},
            "items": {"$ref": "#/definitions/positive"}
        });
        let report = run(&processor(), schema, &json!([1, 0])).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.messages()[0].schema.to_string(), "/definitions/positive");
        assert_eq!(report.messages()[0].instance.to_string(), "/1");
    }

    #[test]
    fn reference_errors() {
        let dangling = run(&processor(), json!({"$ref": "#/nowhere"}), &json!(1));
        assert!(matches!(dangling, Err(ProcessingError::DanglingRef { .. })));

        let looping = run(
            &processor(),
            json!({"definitions": {"a": {"$ref": "#/definitions/b"}, "b": {"$ref": "#/definitions/a"}}, "$ref": "#/definitions/a"}),
            &json!(1),
        );
        assert!(matches!(looping, Err(ProcessingError::RefLoop { .. })));

        let remote = run(&processor(), json!({"$ref": "http://example.com/schema#"}), &json!(1));
        assert!(matches!(remote, Err(ProcessingError::UnsupportedRef { .. })));
    }

    #[test]
    fn recursive_schema_follows_the_instance() {
        let schema = json!({
            "properties": {"next": {"$ref": "#"}, "value": {"type": "integer"}}
        });
        let processor = processor();
        let instance = json!({"value": 1, "next": {"value": 2, "next": {"value": "x"}}});
        let report = run(&processor, schema, &instance).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.messages()[0].instance.to_string(), "/next/next/value");
        assert_eq!(processor.cache().compilations(), 2);
    }

    #[test]
    fn keyword_re_entering_the_same_node_is_a_loop() {
        let err = run(&processor(), json!({"allOf": [{"$ref": "#"}]}), &json!(1)).unwrap_err();
        match err {
            ProcessingError::ValidationLoop { schema, instance } => {
                assert_eq!(schema, "");
                assert_eq!(instance, "");
            }
            other => panic!("unexpected error: {other}"),
        }

        let through_ancestor = json!({
            "properties": {"a": {"not": {"$ref": "#/properties/a"}}}
        });
        let err = run(&processor(), through_ancestor, &json!({"a": 1})).unwrap_err();
        match err {
            ProcessingError::ValidationLoop { schema, instance } => {
                assert_eq!(schema, "/properties/a");
                assert_eq!(instance, "/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_sibling_references_are_not_a_loop() {
        let schema = json!({
            "definitions": {"small": {"maximum": 10}},
            "allOf": [{"$ref": "#/definitions/small"}, {"$ref": "#/definitions/small"}]
        });
        let report = run(&processor(), schema, &json!(11)).unwrap();
        assert!(!report.is_success());
    }

    #[test]
    fn reference_must_be_a_string() {
        let err = run(&processor(), json!({"$ref": 1, "type": "string"}), &json!(1)).unwrap_err();
        match err {
            ProcessingError::Compile { source, .. } => assert_eq!(source.keyword(), "$ref"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
