//! Message bundles: lookup of human-readable text by message key.

use std::collections::HashMap;

/// Source of localized message text.
pub trait MessageBundle: Send + Sync {
    /// Text for `key`, if the bundle has one.
    fn get(&self, key: &str) -> Option<&str>;

    /// Text for `key`, falling back to the key itself.
    fn message(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }
}

/// A bundle backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MapBundle {
    entries: HashMap<String, String>,
}

const VALIDATION_MESSAGES: &[(&str, &str)] = &[
    (
        "additional properties not permitted",
        "object instance has properties which are not allowed by the schema",
    ),
    (
        "additional items not permitted",
        "array is too long: no additional items are allowed by the schema",
    ),
    (
        "missing property dependencies",
        "property is present but its property dependencies are missing",
    ),
    (
        "instance value not found in enum",
        "instance value is not one of the enumerated values",
    ),
    ("number is greater than maximum", "numeric instance is greater than the required maximum"),
    (
        "number is not strictly lower than maximum",
        "numeric instance is not strictly lower than the required maximum",
    ),
    ("number is lower than minimum", "numeric instance is lower than the required minimum"),
    (
        "number is not strictly greater than minimum",
        "numeric instance is not strictly greater than the required minimum",
    ),
    ("array is too long", "array has more items than the schema allows"),
    ("array is too short", "array has fewer items than the schema requires"),
    ("string is too long", "string is longer than the maximum length"),
    ("string is too short", "string is shorter than the minimum length"),
    ("string does not match pattern", "string does not match the regular expression"),
    ("array items are not unique", "array must not contain duplicate elements"),
    (
        "number is not a multiple of divisor",
        "numeric instance is not a multiple of the required divisor",
    ),
    ("instance type not allowed", "instance type does not match any allowed primitive type"),
    ("instance type is disallowed", "instance type matches a disallowed type"),
    ("missing required property", "object is missing required properties"),
    ("too many properties", "object has more members than the schema allows"),
    ("too few properties", "object has fewer members than the schema requires"),
    (
        "instance does not match all schemas",
        "instance failed to match all required schemas",
    ),
    (
        "instance does not match any schema",
        "instance failed to match at least one required schema",
    ),
    (
        "instance does not match exactly one schema",
        "instance failed to match exactly one schema",
    ),
    ("instance matches forbidden schema", "instance matched a schema which it should not have"),
    ("unknown keywords ignored", "the schema contains unknown keywords, which are ignored"),
    ("invalid keyword value", "keyword value is invalid for this draft"),
    ("unresolvable reference", "JSON reference cannot be resolved within the document"),
    ("schema cannot be loaded", "file is missing, unreadable or not a JSON document"),
];

impl MapBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// English texts for every key raised by the built-in validators.
    pub fn validation() -> Self {
        VALIDATION_MESSAGES
            .iter()
            .map(|(key, text)| (key.to_string(), text.to_string()))
            .collect()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for MapBundle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl MessageBundle for MapBundle {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_bundle_has_text_for_additional_properties() {
        let bundle = MapBundle::validation();
        assert_eq!(
            bundle.message("additional properties not permitted"),
            "object instance has properties which are not allowed by the schema"
        );
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        let bundle = MapBundle::new();
        assert!(bundle.get("nope").is_none());
        assert_eq!(bundle.message("nope"), "nope");
    }

    #[test]
    fn insert_overrides() {
        let mut bundle = MapBundle::validation();
        let before = bundle.len();
        bundle.insert("string is too long", "chaîne trop longue");
        assert_eq!(bundle.message("string is too long"), "chaîne trop longue");
        assert_eq!(bundle.len(), before);
    }
}
