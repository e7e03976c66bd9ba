//! Keyword validators: one unit of validation logic per schema keyword.
//!
//! A validator is built once from the schema node holding its keyword (the
//! "digest") and is immutable afterwards. Validation outcomes are recorded in
//! the [`Report`]; `validate` only returns an error when a recursive call to
//! the [`Processor`] failed.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::bundle::MessageBundle;
use crate::error::{KeywordError, ProcessingError};
use crate::processor::Processor;
use crate::report::{ProcessingMessage, Report};
use crate::tree::FullData;
use crate::types::json_type_name;

pub mod common;
pub mod draftv3;
pub mod draftv4;

/// Validation logic for one keyword.
pub trait KeywordValidator: fmt::Display + Send + Sync {
    /// The keyword this validator handles.
    fn keyword(&self) -> &'static str;

    /// Validate the instance in `data`, recording diagnostics in `report`.
    ///
    /// # Errors
    ///
    /// Only propagates failures of `processor`; never converts them into
    /// diagnostics.
    fn validate(
        &self,
        processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError>;

    /// True iff the compiled configuration makes failure impossible.
    fn always_true(&self) -> bool {
        false
    }
}

/// Builds a validator from the schema node containing its keyword.
pub type ValidatorFactory = fn(&Value) -> Result<Box<dyn KeywordValidator>, KeywordError>;

/// Start a message for `keyword` located at the current schema and instance.
pub(crate) fn new_msg(
    data: &FullData,
    bundle: &dyn MessageBundle,
    keyword: &'static str,
    key: &str,
) -> ProcessingMessage {
    ProcessingMessage::new(key)
        .message(bundle.message(key))
        .keyword(keyword)
        .schema(data.schema().pointer().clone())
        .instance(data.instance().pointer().clone())
}

/// Run `processor` on a sub-schema with a fresh report.
pub(crate) fn process_sub(
    processor: &dyn Processor,
    data: &FullData,
) -> Result<Report, ProcessingError> {
    let mut report = Report::new();
    processor.process(&mut report, data)?;
    Ok(report)
}

pub(crate) fn wrong_type(keyword: &'static str, expected: &'static str, actual: &Value) -> KeywordError {
    KeywordError::WrongType {
        keyword,
        expected,
        actual: json_type_name(actual),
    }
}

/// The keyword's value. Factories are only called for present keywords.
pub(crate) fn digest<'a>(schema: &'a Value, keyword: &'static str) -> &'a Value {
    static NULL: Value = Value::Null;
    schema.get(keyword).unwrap_or(&NULL)
}

pub(crate) fn non_negative_integer(schema: &Value, keyword: &'static str) -> Result<u64, KeywordError> {
    let value = digest(schema, keyword);
    value
        .as_u64()
        .ok_or_else(|| wrong_type(keyword, "non-negative integer", value))
}

pub(crate) fn number(schema: &Value, keyword: &'static str) -> Result<Number, KeywordError> {
    match digest(schema, keyword) {
        Value::Number(n) => Ok(n.clone()),
        other => Err(wrong_type(keyword, "number", other)),
    }
}

pub(crate) fn positive_number(schema: &Value, keyword: &'static str) -> Result<Number, KeywordError> {
    let n = number(schema, keyword)?;
    if n.as_f64().map(|f| f <= 0.0).unwrap_or(true) {
        return Err(KeywordError::InvalidValue {
            keyword,
            message: format!("divisor must be strictly positive, got {}", n),
        });
    }
    Ok(n)
}

/// An optional boolean keyword, defaulting to false when absent.
pub(crate) fn optional_bool(schema: &Value, keyword: &'static str) -> Result<bool, KeywordError> {
    match schema.get(keyword) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(wrong_type(keyword, "boolean", other)),
    }
}

pub(crate) fn object<'a>(
    schema: &'a Value,
    keyword: &'static str,
) -> Result<&'a Map<String, Value>, KeywordError> {
    let value = digest(schema, keyword);
    value.as_object().ok_or_else(|| wrong_type(keyword, "object", value))
}

/// A non-empty array whose elements are all schemas (objects).
pub(crate) fn schema_array(schema: &Value, keyword: &'static str) -> Result<usize, KeywordError> {
    let value = digest(schema, keyword);
    let arr = value.as_array().ok_or_else(|| wrong_type(keyword, "array", value))?;
    if arr.is_empty() {
        return Err(KeywordError::InvalidValue {
            keyword,
            message: "array must not be empty".to_string(),
        });
    }
    if let Some(bad) = arr.iter().find(|v| !v.is_object()) {
        return Err(wrong_type(keyword, "array of schemas", bad));
    }
    Ok(arr.len())
}

/// An array of unique strings.
pub(crate) fn string_set(value: &Value, keyword: &'static str) -> Result<Vec<String>, KeywordError> {
    let arr = value.as_array().ok_or_else(|| wrong_type(keyword, "array", value))?;
    let mut out: Vec<String> = Vec::with_capacity(arr.len());
    for element in arr {
        let s = element
            .as_str()
            .ok_or_else(|| wrong_type(keyword, "array of strings", element))?;
        if out.iter().any(|existing| existing == s) {
            return Err(KeywordError::InvalidValue {
                keyword,
                message: format!("duplicate element \"{}\"", s),
            });
        }
        out.push(s.to_string());
    }
    Ok(out)
}

pub(crate) fn ensure_schema(value: &Value, keyword: &'static str) -> Result<(), KeywordError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(wrong_type(keyword, "schema", value))
    }
}
