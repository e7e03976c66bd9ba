//! Instance validation against a loaded schema.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::bundle::{MapBundle, MessageBundle};
use crate::dictionary::Dictionary;
use crate::error::ProcessingError;
use crate::processor::{Processor, ValidationProcessor};
use crate::report::Report;
use crate::tree::{FullData, InstanceTree, SchemaTree};
use crate::types::ValidationOptions;

/// A schema ready to validate any number of instances.
///
/// Compiled keyword validators are cached per schema node and reused across
/// calls. The validator can be shared between threads.
#[derive(Debug)]
pub struct SchemaValidator {
    schema: SchemaTree,
    processor: ValidationProcessor,
}

impl SchemaValidator {
    /// Build a validator with an explicit dictionary and message bundle.
    pub fn new(schema: Value, dictionary: Arc<Dictionary>, bundle: Arc<dyn MessageBundle>) -> Self {
        Self {
            schema: SchemaTree::new(schema),
            processor: ValidationProcessor::new(dictionary, bundle),
        }
    }

    /// Build a validator for the draft named in `options`, with the default
    /// English messages.
    pub fn with_options(schema: Value, options: &ValidationOptions) -> Self {
        let processor = ValidationProcessor::new(
            Arc::new(Dictionary::for_draft(options.draft)),
            Arc::new(MapBundle::validation()),
        );
        Self {
            schema: SchemaTree::new(schema),
            processor: processor.deep_check(options.deep_check),
        }
    }

    pub fn schema(&self) -> &Value {
        self.schema.document()
    }

    /// Validate an instance.
    ///
    /// Schema problems found along the way (invalid keyword values,
    /// unresolvable references) abort validation.
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError` if the schema cannot be compiled or a
    /// reference cannot be resolved.
    pub fn validate(&self, instance: &Value) -> Result<Report, ProcessingError> {
        let data = FullData::new(self.schema.clone(), InstanceTree::new(instance));
        let mut report = Report::new();
        self.processor.process(&mut report, &data)?;
        debug!(
            success = report.is_success(),
            messages = report.len(),
            "validated instance"
        );
        Ok(report)
    }

    /// Shorthand for `validate(instance)?.is_success()`.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn is_valid(&self, instance: &Value) -> Result<bool, ProcessingError> {
        Ok(self.validate(instance)?.is_success())
    }

    /// Number of schema nodes compiled so far.
    pub fn compilations(&self) -> usize {
        self.processor.cache().compilations()
    }

    pub fn processor(&self) -> &ValidationProcessor {
        &self.processor
    }
}

/// Validate one instance against a schema.
///
/// Use [`SchemaValidator`] to validate several instances against the same
/// schema without recompiling it.
///
/// # Errors
///
/// Returns `ProcessingError` if the schema is unusable.
pub fn validate(schema: &Value, instance: &Value, options: &ValidationOptions) -> Result<Report, ProcessingError> {
    SchemaValidator::with_options(schema.clone(), options).validate(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Draft;
    use serde_json::json;

    #[test]
    fn validate_valid_instance() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" }
            },
            "required": ["name"]
        });
        let report = validate(&schema, &json!({ "name": "test" }), &ValidationOptions::default()).unwrap();
        assert!(report.is_success());
        assert!(report.is_empty());
    }

    #[test]
    fn validate_missing_required_field() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "required": true }
            }
        });
        let options = ValidationOptions::new(Draft::V3);
        let report = validate(&schema, &json!({}), &options).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.messages()[0].key, "missing required property");
    }

    #[test]
    fn validate_wrong_type() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" }
            }
        });
        let report = validate(&schema, &json!({ "name": 123 }), &ValidationOptions::default()).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.messages()[0].instance.to_string(), "/name");
    }

    #[test]
    fn validate_collects_errors_from_siblings() {
        let schema = json!({
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "number" }
            }
        });
        let report = validate(&schema, &json!({ "name": 1, "age": "x" }), &ValidationOptions::default()).unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn compiled_nodes_are_reused() {
        let validator = SchemaValidator::with_options(
            json!({"items": {"type": "integer"}}),
            &ValidationOptions::default(),
        );
        assert!(validator.is_valid(&json!([1, 2, 3])).unwrap());
        assert!(!validator.is_valid(&json!([1, "x"])).unwrap());
        assert_eq!(validator.compilations(), 2);
    }

    #[test]
    fn schema_errors_abort() {
        let validator = SchemaValidator::with_options(json!({"minimum": "zero"}), &ValidationOptions::default());
        let err = validator.validate(&json!(1)).unwrap_err();
        assert!(matches!(err, ProcessingError::Compile { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
