//! Draft-3 specific keywords.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use super::common::{DependenciesValidator, MultipleValidator, TypeValidator};
use super::{digest, new_msg, object, process_sub, wrong_type, KeywordValidator};
use crate::bundle::MessageBundle;
use crate::error::{KeywordError, ProcessingError};
use crate::processor::Processor;
use crate::report::Report;
use crate::tree::FullData;

pub fn type_keyword(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    TypeValidator::compile(schema, "type", true, false)
}

pub fn disallow(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    TypeValidator::compile(schema, "disallow", true, true)
}

pub fn divisible_by(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    MultipleValidator::compile(schema, "divisibleBy")
}

pub fn dependencies(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    Ok(Box::new(DependenciesValidator::compile(schema, true)?))
}

/// `extends`: the instance must also validate against the referenced
/// schema(s). Diagnostics are exactly those of the sub-schemas.
pub struct ExtendsValidator {
    count: Option<usize>,
}

impl ExtendsValidator {
    const KEYWORD: &'static str = "extends";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let count = match digest(schema, Self::KEYWORD) {
            Value::Object(_) => None,
            Value::Array(arr) => {
                if let Some(bad) = arr.iter().find(|v| !v.is_object()) {
                    return Err(wrong_type(Self::KEYWORD, "array of schemas", bad));
                }
                Some(arr.len())
            }
            other => return Err(wrong_type(Self::KEYWORD, "schema or array", other)),
        };
        Ok(Box::new(Self { count }))
    }
}

impl KeywordValidator for ExtendsValidator {
    fn keyword(&self) -> &'static str {
        Self::KEYWORD
    }

    fn validate(
        &self,
        processor: &dyn Processor,
        report: &mut Report,
        _bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let base = data.schema().append(Self::KEYWORD);
        match self.count {
            None => {
                report.merge_with(process_sub(processor, &data.with_schema(base))?);
            }
            Some(count) => {
                for index in 0..count {
                    let sub = data.with_schema(base.append(index.to_string()));
                    report.merge_with(process_sub(processor, &sub)?);
                }
            }
        }
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.count == Some(0)
    }
}

impl fmt::Display for ExtendsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} schema(s)", Self::KEYWORD, self.count.unwrap_or(1))
    }
}

/// Draft-3 `properties`: enforces the per-property `"required": true` flag.
///
/// Member values are validated by the processor's child descent, not here.
pub struct PropertiesValidator {
    required: Vec<String>,
}

impl PropertiesValidator {
    const KEYWORD: &'static str = "properties";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let mut required = Vec::new();
        for (name, property) in object(schema, Self::KEYWORD)? {
            if !property.is_object() {
                return Err(wrong_type(Self::KEYWORD, "object of schemas", property));
            }
            match property.get("required") {
                None | Some(Value::Bool(false)) => {}
                Some(Value::Bool(true)) => required.push(name.clone()),
                Some(other) => return Err(wrong_type("required", "boolean", other)),
            }
        }
        Ok(Box::new(Self { required }))
    }
}

impl KeywordValidator for PropertiesValidator {
    fn keyword(&self) -> &'static str {
        Self::KEYWORD
    }

    fn validate(
        &self,
        _processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let Some(members) = data.instance().node().as_object() else {
            return Ok(());
        };
        let missing: BTreeSet<&str> = self
            .required
            .iter()
            .filter(|name| !members.contains_key(*name))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let required: BTreeSet<&str> = self.required.iter().map(String::as_str).collect();
        report.error(
            new_msg(data, bundle, Self::KEYWORD, "missing required property")
                .put("required", required.into_iter().collect::<Vec<_>>())
                .put("missing", missing.into_iter().collect::<Vec<_>>()),
        );
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.required.is_empty()
    }
}

impl fmt::Display for PropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: required {:?}", Self::KEYWORD, self.required)
    }
}
