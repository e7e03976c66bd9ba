//! Validation reports: ordered, mergeable collections of messages.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::pointer::JsonPointer;

/// Severity level of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single diagnostic.
///
/// `key` is the machine-readable message key; `message` is the text a
/// [`MessageBundle`](crate::MessageBundle) returned for it. `fields` holds
/// structured context in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingMessage {
    pub severity: Severity,
    pub key: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub schema: JsonPointer,
    pub instance: JsonPointer,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl ProcessingMessage {
    /// A message with the given key; the text defaults to the key itself.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            severity: Severity::Error,
            message: key.clone(),
            key,
            keyword: None,
            schema: JsonPointer::root(),
            instance: JsonPointer::root(),
            fields: Map::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn schema(mut self, pointer: JsonPointer) -> Self {
        self.schema = pointer;
        self
    }

    pub fn instance(mut self, pointer: JsonPointer) -> Self {
        self.instance = pointer;
        self
    }

    /// Attach a structured field. Re-using a name replaces the value in place.
    pub fn put(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The message as a JSON object, in its serialized shape.
    pub fn as_json(&self) -> Value {
        // Only string-keyed maps are involved, so serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl fmt::Display for ProcessingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let instance = self.instance.to_string();
        let instance = if instance.is_empty() { "/" } else { &instance };
        write!(f, "{}: {}: {}", level, instance, self.message)?;
        if let Some(keyword) = &self.keyword {
            write!(f, " [{}]", keyword)?;
        }
        Ok(())
    }
}

/// Ordered list of messages plus a success flag.
///
/// Success is true iff no error-level message was ever added. Messages are
/// never dropped, reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    success: bool,
    messages: Vec<ProcessingMessage>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
        }
    }

    /// Append an error-level message.
    pub fn error(&mut self, mut message: ProcessingMessage) {
        message.severity = Severity::Error;
        self.success = false;
        self.messages.push(message);
    }

    /// Append a warning; success is unaffected.
    pub fn warn(&mut self, mut message: ProcessingMessage) {
        message.severity = Severity::Warning;
        self.messages.push(message);
    }

    /// Append all messages of `other`, in order.
    pub fn merge_with(&mut self, other: Report) {
        self.success &= other.success;
        self.messages.extend(other.messages);
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn messages(&self) -> &[ProcessingMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ProcessingMessage> {
        self.messages
    }

    pub fn errors(&self) -> impl Iterator<Item = &ProcessingMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages as a JSON array, for embedding in another message's fields.
    pub fn as_json(&self) -> Value {
        serde_json::to_value(&self.messages).unwrap_or_default()
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
