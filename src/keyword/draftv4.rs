//! Draft-4 specific keywords.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

use super::common::{DependenciesValidator, Limit, Measure, MultipleValidator, SizeValidator, TypeValidator};
use super::{digest, ensure_schema, new_msg, process_sub, schema_array, string_set, KeywordValidator};
use crate::bundle::MessageBundle;
use crate::error::{KeywordError, ProcessingError};
use crate::processor::Processor;
use crate::report::Report;
use crate::tree::FullData;

pub fn type_keyword(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    TypeValidator::compile(schema, "type", false, false)
}

pub fn multiple_of(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    MultipleValidator::compile(schema, "multipleOf")
}

pub fn dependencies(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    Ok(Box::new(DependenciesValidator::compile(schema, false)?))
}

pub fn max_properties(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    SizeValidator::compile(schema, "maxProperties", Limit::Max, Measure::Properties)
}

pub fn min_properties(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
    SizeValidator::compile(schema, "minProperties", Limit::Min, Measure::Properties)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    AllOf,
    AnyOf,
    OneOf,
}

/// `allOf`, `anyOf` and `oneOf`.
///
/// Each member schema is evaluated with its own report; on failure a single
/// message carries the member reports keyed by schema pointer.
pub struct CombinatorValidator {
    keyword: &'static str,
    kind: Combinator,
    count: usize,
}

impl CombinatorValidator {
    fn compile(
        schema: &Value,
        keyword: &'static str,
        kind: Combinator,
    ) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let count = schema_array(schema, keyword)?;
        Ok(Box::new(Self {
            keyword,
            kind,
            count,
        }))
    }

    pub fn all_of(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "allOf", Combinator::AllOf)
    }

    pub fn any_of(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "anyOf", Combinator::AnyOf)
    }

    pub fn one_of(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "oneOf", Combinator::OneOf)
    }
}

impl KeywordValidator for CombinatorValidator {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn validate(
        &self,
        processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let base = data.schema().append(self.keyword);
        let mut reports = Map::new();
        let mut matched = 0;

        for index in 0..self.count {
            let sub = data.with_schema(base.append(index.to_string()));
            let sub_report = process_sub(processor, &sub)?;
            if sub_report.is_success() {
                matched += 1;
                if self.kind == Combinator::AnyOf {
                    return Ok(());
                }
            }
            reports.insert(sub.schema().pointer().to_string(), sub_report.as_json());
        }

        let key = match self.kind {
            Combinator::AllOf if matched < self.count => "instance does not match all schemas",
            Combinator::AnyOf => "instance does not match any schema",
            Combinator::OneOf if matched != 1 => "instance does not match exactly one schema",
            _ => return Ok(()),
        };
        report.error(
            new_msg(data, bundle, self.keyword, key)
                .put("nrSchemas", self.count)
                .put("matched", matched)
                .put("reports", Value::Object(reports)),
        );
        Ok(())
    }
}

impl fmt::Display for CombinatorValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} schemas", self.keyword, self.count)
    }
}

/// `not`: the instance must fail the sub-schema.
pub struct NotValidator;

impl NotValidator {
    const KEYWORD: &'static str = "not";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        ensure_schema(digest(schema, Self::KEYWORD), Self::KEYWORD)?;
        Ok(Box::new(Self))
    }
}

impl KeywordValidator for NotValidator {
    fn keyword(&self) -> &'static str {
        Self::KEYWORD
    }

    fn validate(
        &self,
        processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let sub = data.with_schema(data.schema().append(Self::KEYWORD));
        if process_sub(processor, &sub)?.is_success() {
            report.error(new_msg(data, bundle, Self::KEYWORD, "instance matches forbidden schema"));
        }
        Ok(())
    }
}

impl fmt::Display for NotValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: schema", Self::KEYWORD)
    }
}

/// Draft-4 `required`: a non-empty array of member names.
pub struct RequiredValidator {
    required: BTreeSet<String>,
}

impl RequiredValidator {
    const KEYWORD: &'static str = "required";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let required = string_set(digest(schema, Self::KEYWORD), Self::KEYWORD)?;
        if required.is_empty() {
            return Err(KeywordError::InvalidValue {
                keyword: Self::KEYWORD,
                message: "array must not be empty".to_string(),
            });
        }
        Ok(Box::new(Self {
            required: required.into_iter().collect(),
        }))
    }
}

impl KeywordValidator for RequiredValidator {
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
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|name| !members.contains_key(*name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            report.error(
                new_msg(data, bundle, Self::KEYWORD, "missing required property")
                    .put("required", self.required.iter().map(String::as_str).collect::<Vec<_>>())
                    .put("missing", missing),
            );
        }
        Ok(())
    }
}

impl fmt::Display for RequiredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", Self::KEYWORD, self.required)
    }
}
