//! Keyword validators whose semantics are shared by draft-3 and draft-4.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Number, Value};

use super::{
    digest, new_msg, non_negative_integer, number, object, process_sub, string_set, wrong_type,
    KeywordValidator,
};
use crate::bundle::MessageBundle;
use crate::error::{KeywordError, ProcessingError};
use crate::pattern::Pattern;
use crate::processor::Processor;
use crate::report::Report;
use crate::tree::FullData;
use crate::types::{json_equals, NodeType};

/// Compare two JSON numbers, exactly when both are integers.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Whether `value` is an integral multiple of the (positive) `divisor`.
///
/// Integers are checked exactly; other numbers allow for one rounding step
/// of binary floating point, so `0.3` is a multiple of `0.1`.
pub(crate) fn is_multiple_of(value: &Number, divisor: &Number) -> bool {
    if let (Some(v), Some(d)) = (value.as_i64(), divisor.as_i64()) {
        return d != 0 && v % d == 0;
    }
    let (Some(v), Some(d)) = (value.as_f64(), divisor.as_f64()) else {
        return false;
    };
    let quotient = (v / d).round();
    if !quotient.is_finite() {
        return false;
    }
    let remainder = v - quotient * d;
    remainder.abs() <= 4.0 * f64::EPSILON * v.abs().max(d.abs())
}

// --- additionalItems ---

/// `additionalItems`: only constrains arrays when `items` is an array and
/// `additionalItems` is `false`.
pub struct AdditionalItemsValidator {
    additional_ok: bool,
    max_items: usize,
}

impl AdditionalItemsValidator {
    const KEYWORD: &'static str = "additionalItems";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let allowed = match digest(schema, Self::KEYWORD) {
            Value::Bool(b) => *b,
            Value::Object(_) => true,
            other => return Err(wrong_type(Self::KEYWORD, "boolean or schema", other)),
        };
        let validator = match schema.get("items") {
            Some(Value::Array(items)) if !allowed => Self {
                additional_ok: false,
                max_items: items.len(),
            },
            _ => Self {
                additional_ok: true,
                max_items: 0,
            },
        };
        Ok(Box::new(validator))
    }
}

impl KeywordValidator for AdditionalItemsValidator {
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
        if self.additional_ok {
            return Ok(());
        }
        let Some(items) = data.instance().node().as_array() else {
            return Ok(());
        };
        if items.len() > self.max_items {
            report.error(
                new_msg(data, bundle, Self::KEYWORD, "additional items not permitted")
                    .put("allowed", self.max_items)
                    .put("found", items.len()),
            );
        }
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.additional_ok
    }
}

impl fmt::Display for AdditionalItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.additional_ok {
            write!(f, "{}: allowed", Self::KEYWORD)
        } else {
            write!(f, "{}: at most {} items", Self::KEYWORD, self.max_items)
        }
    }
}

// --- additionalProperties ---

/// `additionalProperties`.
///
/// Only handles validation at the instance level: children are validated by
/// the processor. When the keyword is `false`, every member must either be
/// declared in `properties` or match at least one `patternProperties` regex.
pub struct AdditionalPropertiesValidator {
    additional_ok: bool,
    properties: BTreeSet<String>,
    pattern_properties: Vec<Pattern>,
}

impl AdditionalPropertiesValidator {
    const KEYWORD: &'static str = "additionalProperties";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let additional_ok = match digest(schema, Self::KEYWORD) {
            Value::Bool(b) => *b,
            Value::Object(_) => true,
            other => return Err(wrong_type(Self::KEYWORD, "boolean or schema", other)),
        };

        if additional_ok {
            return Ok(Box::new(Self {
                additional_ok,
                properties: BTreeSet::new(),
                pattern_properties: Vec::new(),
            }));
        }

        let properties = match schema.get("properties") {
            None => BTreeSet::new(),
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(other) => return Err(wrong_type("properties", "object", other)),
        };
        let pattern_properties = match schema.get("patternProperties") {
            None => Vec::new(),
            Some(Value::Object(map)) => map
                .keys()
                .map(|regex| Pattern::compile("patternProperties", regex))
                .collect::<Result<_, _>>()?,
            Some(other) => return Err(wrong_type("patternProperties", "object", other)),
        };

        Ok(Box::new(Self {
            additional_ok,
            properties,
            pattern_properties,
        }))
    }
}

impl KeywordValidator for AdditionalPropertiesValidator {
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
        if self.additional_ok {
            return Ok(());
        }
        let Some(members) = data.instance().node().as_object() else {
            return Ok(());
        };

        let mut fields: BTreeSet<&str> = members
            .keys()
            .map(String::as_str)
            .filter(|field| !self.properties.contains(*field))
            .collect();
        fields.retain(|field| !self.pattern_properties.iter().any(|p| p.is_match(field)));

        if fields.is_empty() {
            return Ok(());
        }

        // BTreeSet iteration is sorted, independent of instance member order.
        let unwanted: Vec<String> = fields.into_iter().map(str::to_string).collect();
        report.error(
            new_msg(data, bundle, Self::KEYWORD, "additional properties not permitted")
                .put("unwanted", unwanted),
        );
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.additional_ok
    }
}

impl fmt::Display for AdditionalPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.additional_ok {
            return write!(f, "{}: allowed", Self::KEYWORD);
        }
        write!(f, "{}: none", Self::KEYWORD)?;
        if self.properties.is_empty() && self.pattern_properties.is_empty() {
            return Ok(());
        }

        let mut further = Vec::new();
        if !self.properties.is_empty() {
            further.push(format!("one property is any of: {:?}", self.properties));
        }
        if !self.pattern_properties.is_empty() {
            let regexes: Vec<&str> = self.pattern_properties.iter().map(Pattern::as_str).collect();
            further.push(format!("a property matches any regex among: {:?}", regexes));
        }
        write!(f, ", unless: {}", further.join("; or "))
    }
}

// --- dependencies ---

enum Dependency {
    Properties(Vec<String>),
    Schema,
}

/// `dependencies`: property dependencies are checked here, schema
/// dependencies re-enter the processor at `/dependencies/<name>`.
pub struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
}

impl DependenciesValidator {
    const KEYWORD: &'static str = "dependencies";

    /// Draft-3 also accepts a single property name as a string.
    pub(crate) fn compile(schema: &Value, allow_string: bool) -> Result<Self, KeywordError> {
        let expected = if allow_string {
            "string, array or schema"
        } else {
            "array or schema"
        };
        let mut dependencies = Vec::new();
        for (name, value) in object(schema, Self::KEYWORD)? {
            let dependency = match value {
                Value::String(s) if allow_string => Dependency::Properties(vec![s.clone()]),
                Value::Array(_) => Dependency::Properties(string_set(value, Self::KEYWORD)?),
                Value::Object(_) => Dependency::Schema,
                other => return Err(wrong_type(Self::KEYWORD, expected, other)),
            };
            dependencies.push((name.clone(), dependency));
        }
        Ok(Self { dependencies })
    }
}

impl KeywordValidator for DependenciesValidator {
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
        let Some(members) = data.instance().node().as_object() else {
            return Ok(());
        };

        for (name, dependency) in &self.dependencies {
            if !members.contains_key(name) {
                continue;
            }
            match dependency {
                Dependency::Properties(required) => {
                    let missing: BTreeSet<&str> = required
                        .iter()
                        .filter(|r| !members.contains_key(*r))
                        .map(String::as_str)
                        .collect();
                    if missing.is_empty() {
                        continue;
                    }
                    let missing: Vec<String> = missing.into_iter().map(str::to_string).collect();
                    report.error(
                        new_msg(data, bundle, Self::KEYWORD, "missing property dependencies")
                            .put("property", name.as_str())
                            .put("required", required.clone())
                            .put("missing", missing),
                    );
                }
                Dependency::Schema => {
                    let sub = data.with_schema(data.schema().append(Self::KEYWORD).append(name.as_str()));
                    report.merge_with(process_sub(processor, &sub)?);
                }
            }
        }
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl fmt::Display for DependenciesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} dependencies", Self::KEYWORD, self.dependencies.len())
    }
}

// --- enum ---

/// `enum`: the instance must equal one of the listed values.
pub struct EnumValidator {
    values: Vec<Value>,
}

impl EnumValidator {
    const KEYWORD: &'static str = "enum";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        match digest(schema, Self::KEYWORD) {
            Value::Array(values) => Ok(Box::new(Self {
                values: values.clone(),
            })),
            other => Err(wrong_type(Self::KEYWORD, "array", other)),
        }
    }
}

impl KeywordValidator for EnumValidator {
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
        let instance = data.instance().node();
        if !self.values.iter().any(|v| json_equals(v, instance)) {
            report.error(
                new_msg(data, bundle, Self::KEYWORD, "instance value not found in enum")
                    .put("enum", self.values.clone())
                    .put("value", instance.clone()),
            );
        }
        Ok(())
    }
}

impl fmt::Display for EnumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} possible values", Self::KEYWORD, self.values.len())
    }
}

// --- maximum / minimum ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Limit {
    Max,
    Min,
}

/// `maximum` / `minimum`, with their `exclusive*` companions.
pub struct BoundValidator {
    keyword: &'static str,
    exclusive_keyword: &'static str,
    limit: Limit,
    bound: Number,
    exclusive: bool,
}

impl BoundValidator {
    fn compile(
        schema: &Value,
        keyword: &'static str,
        exclusive_keyword: &'static str,
        limit: Limit,
    ) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let bound = number(schema, keyword)?;
        let exclusive = super::optional_bool(schema, exclusive_keyword)?;
        Ok(Box::new(Self {
            keyword,
            exclusive_keyword,
            limit,
            bound,
            exclusive,
        }))
    }

    pub fn maximum(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "maximum", "exclusiveMaximum", Limit::Max)
    }

    pub fn minimum(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "minimum", "exclusiveMinimum", Limit::Min)
    }
}

impl KeywordValidator for BoundValidator {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn validate(
        &self,
        _processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let Value::Number(found) = data.instance().node() else {
            return Ok(());
        };
        let Some(ordering) = compare_numbers(found, &self.bound) else {
            return Ok(());
        };

        let key = match (self.limit, ordering) {
            (Limit::Max, Ordering::Greater) => "number is greater than maximum",
            (Limit::Max, Ordering::Equal) if self.exclusive => {
                "number is not strictly lower than maximum"
            }
            (Limit::Min, Ordering::Less) => "number is lower than minimum",
            (Limit::Min, Ordering::Equal) if self.exclusive => {
                "number is not strictly greater than minimum"
            }
            _ => return Ok(()),
        };

        let mut msg = new_msg(data, bundle, self.keyword, key)
            .put(self.keyword, self.bound.clone())
            .put("found", found.clone());
        if self.exclusive {
            msg = msg.put(self.exclusive_keyword, true);
        }
        report.error(msg);
        Ok(())
    }
}

impl fmt::Display for BoundValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match (self.limit, self.exclusive) {
            (Limit::Max, false) => "<=",
            (Limit::Max, true) => "<",
            (Limit::Min, false) => ">=",
            (Limit::Min, true) => ">",
        };
        write!(f, "{}: {} {}", self.keyword, op, self.bound)
    }
}

// --- size limits ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    Items,
    Length,
    Properties,
}

/// Bounds on array length, string length (in code points) or member count.
pub struct SizeValidator {
    keyword: &'static str,
    limit: Limit,
    measure: Measure,
    bound: u64,
}

impl SizeValidator {
    pub(crate) fn compile(
        schema: &Value,
        keyword: &'static str,
        limit: Limit,
        measure: Measure,
    ) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let bound = non_negative_integer(schema, keyword)?;
        Ok(Box::new(Self {
            keyword,
            limit,
            measure,
            bound,
        }))
    }

    pub fn max_items(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "maxItems", Limit::Max, Measure::Items)
    }

    pub fn min_items(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "minItems", Limit::Min, Measure::Items)
    }

    pub fn max_length(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "maxLength", Limit::Max, Measure::Length)
    }

    pub fn min_length(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Self::compile(schema, "minLength", Limit::Min, Measure::Length)
    }

    fn measure(&self, instance: &Value) -> Option<u64> {
        match (self.measure, instance) {
            (Measure::Items, Value::Array(items)) => Some(items.len() as u64),
            (Measure::Length, Value::String(s)) => Some(s.chars().count() as u64),
            (Measure::Properties, Value::Object(members)) => Some(members.len() as u64),
            _ => None,
        }
    }

    fn message_key(&self) -> &'static str {
        match (self.measure, self.limit) {
            (Measure::Items, Limit::Max) => "array is too long",
            (Measure::Items, Limit::Min) => "array is too short",
            (Measure::Length, Limit::Max) => "string is too long",
            (Measure::Length, Limit::Min) => "string is too short",
            (Measure::Properties, Limit::Max) => "too many properties",
            (Measure::Properties, Limit::Min) => "too few properties",
        }
    }
}

impl KeywordValidator for SizeValidator {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn validate(
        &self,
        _processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let Some(found) = self.measure(data.instance().node()) else {
            return Ok(());
        };
        let violated = match self.limit {
            Limit::Max => found > self.bound,
            Limit::Min => found < self.bound,
        };
        if violated {
            report.error(
                new_msg(data, bundle, self.keyword, self.message_key())
                    .put(self.keyword, self.bound)
                    .put("found", found),
            );
        }
        Ok(())
    }

    fn always_true(&self) -> bool {
        self.limit == Limit::Min && self.bound == 0
    }
}

impl fmt::Display for SizeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.keyword, self.bound)
    }
}

// --- pattern ---

/// `pattern`: ECMA 262 regex searched within string instances.
pub struct PatternValidator {
    pattern: Pattern,
}

impl PatternValidator {
    const KEYWORD: &'static str = "pattern";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let value = digest(schema, Self::KEYWORD);
        let source = value
            .as_str()
            .ok_or_else(|| wrong_type(Self::KEYWORD, "string", value))?;
        Ok(Box::new(Self {
            pattern: Pattern::compile(Self::KEYWORD, source)?,
        }))
    }
}

impl KeywordValidator for PatternValidator {
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
        let Value::String(s) = data.instance().node() else {
            return Ok(());
        };
        if !self.pattern.is_match(s) {
            report.error(
                new_msg(data, bundle, Self::KEYWORD, "string does not match pattern")
                    .put("regex", self.pattern.as_str())
                    .put("string", s.as_str()),
            );
        }
        Ok(())
    }
}

impl fmt::Display for PatternValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::KEYWORD, self.pattern)
    }
}

// --- uniqueItems ---

pub struct UniqueItemsValidator {
    unique: bool,
}

impl UniqueItemsValidator {
    const KEYWORD: &'static str = "uniqueItems";

    pub fn build(schema: &Value) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        match digest(schema, Self::KEYWORD) {
            Value::Bool(unique) => Ok(Box::new(Self { unique: *unique })),
            other => Err(wrong_type(Self::KEYWORD, "boolean", other)),
        }
    }
}

impl KeywordValidator for UniqueItemsValidator {
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
        if !self.unique {
            return Ok(());
        }
        let Some(items) = data.instance().node().as_array() else {
            return Ok(());
        };
        for (i, first) in items.iter().enumerate() {
            if let Some(offset) = items[i + 1..].iter().position(|other| json_equals(first, other)) {
                report.error(
                    new_msg(data, bundle, Self::KEYWORD, "array items are not unique")
                        .put("indices", vec![i, i + 1 + offset]),
                );
                break;
            }
        }
        Ok(())
    }

    fn always_true(&self) -> bool {
        !self.unique
    }
}

impl fmt::Display for UniqueItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::KEYWORD, self.unique)
    }
}

// --- divisibleBy / multipleOf ---

pub struct MultipleValidator {
    keyword: &'static str,
    divisor: Number,
}

impl MultipleValidator {
    pub(crate) fn compile(
        schema: &Value,
        keyword: &'static str,
    ) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        Ok(Box::new(Self {
            keyword,
            divisor: super::positive_number(schema, keyword)?,
        }))
    }
}

impl KeywordValidator for MultipleValidator {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn validate(
        &self,
        _processor: &dyn Processor,
        report: &mut Report,
        bundle: &dyn MessageBundle,
        data: &FullData,
    ) -> Result<(), ProcessingError> {
        let Value::Number(found) = data.instance().node() else {
            return Ok(());
        };
        if !is_multiple_of(found, &self.divisor) {
            report.error(
                new_msg(data, bundle, self.keyword, "number is not a multiple of divisor")
                    .put(self.keyword, self.divisor.clone())
                    .put("found", found.clone()),
            );
        }
        Ok(())
    }
}

impl fmt::Display for MultipleValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.keyword, self.divisor)
    }
}

// --- type / disallow ---

/// `type` (both drafts) and draft-3 `disallow`.
///
/// Draft-3 union members may be schemas, which are tried in order through
/// the processor at `/<keyword>/<index>`.
pub struct TypeValidator {
    keyword: &'static str,
    negate: bool,
    types: BTreeSet<NodeType>,
    any: bool,
    schemas: Vec<usize>,
}

impl TypeValidator {
    pub(crate) fn compile(
        schema: &Value,
        keyword: &'static str,
        extended: bool,
        negate: bool,
    ) -> Result<Box<dyn KeywordValidator>, KeywordError> {
        let value = digest(schema, keyword);
        let elements: Vec<&Value> = match value {
            Value::String(_) => vec![value],
            Value::Array(arr) if !arr.is_empty() || extended => arr.iter().collect(),
            Value::Array(_) => {
                return Err(KeywordError::InvalidValue {
                    keyword,
                    message: "array must not be empty".to_string(),
                })
            }
            other => return Err(wrong_type(keyword, "string or array", other)),
        };

        let mut validator = Self {
            keyword,
            negate,
            types: BTreeSet::new(),
            any: false,
            schemas: Vec::new(),
        };
        for (index, element) in elements.into_iter().enumerate() {
            match element {
                Value::String(s) if extended && s == "any" => validator.any = true,
                Value::String(s) => {
                    let node_type = NodeType::parse(s).ok_or_else(|| KeywordError::InvalidValue {
                        keyword,
                        message: format!("unknown type \"{}\"", s),
                    })?;
                    if !validator.types.insert(node_type) && !extended {
                        return Err(KeywordError::InvalidValue {
                            keyword,
                            message: format!("duplicate type \"{}\"", s),
                        });
                    }
                }
                Value::Object(_) if extended && value.is_array() => validator.schemas.push(index),
                other => {
                    let expected = if extended { "type name or schema" } else { "type name" };
                    return Err(wrong_type(keyword, expected, other));
                }
            }
        }
        Ok(Box::new(validator))
    }

    fn matches(&self, processor: &dyn Processor, data: &FullData) -> Result<bool, ProcessingError> {
        let found = NodeType::of(data.instance().node());
        if self.any || self.types.iter().any(|t| found.satisfies(*t)) {
            return Ok(true);
        }
        let base = data.schema().append(self.keyword);
        for index in &self.schemas {
            let sub = data.with_schema(base.append(index.to_string()));
            if process_sub(processor, &sub)?.is_success() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.types.iter().map(NodeType::name).collect();
        if self.any {
            names.push("any");
        }
        names
    }
}

impl KeywordValidator for TypeValidator {
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
        let matched = self.matches(processor, data)?;
        if matched == !self.negate {
            return Ok(());
        }
        let found = NodeType::of(data.instance().node()).name();
        let msg = if self.negate {
            new_msg(data, bundle, self.keyword, "instance type is disallowed")
                .put("found", found)
                .put("disallowed", self.type_names())
        } else {
            new_msg(data, bundle, self.keyword, "instance type not allowed")
                .put("found", found)
                .put("expected", self.type_names())
        };
        report.error(msg);
        Ok(())
    }

    fn always_true(&self) -> bool {
        if self.negate {
            !self.any && self.types.is_empty() && self.schemas.is_empty()
        } else {
            self.any
        }
    }
}

impl fmt::Display for TypeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.keyword, self.type_names())?;
        if !self.schemas.is_empty() {
            write!(f, " + {} schema(s)", self.schemas.len())?;
        }
        Ok(())
    }
}
