//! JSON Pointers (RFC 6901) addressing nodes of schemas and instances.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A JSON Pointer, stored as its unescaped reference tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a pointer from raw (unescaped) tokens.
    pub fn of<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the string form of a pointer (`""`, `"/a/0/b~1c"`).
    ///
    /// Returns `None` if the string is neither empty nor starts with `/`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::root());
        }
        let rest = s.strip_prefix('/')?;
        Some(Self {
            tokens: rest.split('/').map(unescape).collect(),
        })
    }

    /// Parse a URI fragment such as `#/definitions/foo` or `#`.
    ///
    /// Percent-encoded octets are decoded before the pointer is parsed.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let path = fragment.strip_prefix('#')?;
        Self::parse(&percent_decode(path)?)
    }

    /// Returns a new pointer with `token` appended.
    pub fn append(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    /// Returns a new pointer with all tokens of `other` appended.
    pub fn join(&self, other: &JsonPointer) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.extend(other.tokens.iter().cloned());
        Self { tokens }
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Navigate `document` along this pointer.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.tokens
            .iter()
            .try_fold(document, |current, token| match current {
                Value::Object(map) => map.get(token),
                Value::Array(arr) => parse_index(token).and_then(|i| arr.get(i)),
                _ => None,
            })
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn unescape(token: &str) -> String {
    // Order matters: "~01" is "~1" unescaped, not "/".
    token.replace("~1", "/").replace("~0", "~")
}

/// Array indices: no leading zeros, no sign.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn percent_decode(s: &str) -> Option<String> {
    if !s.contains('%') {
        return Some(s.to_string());
    }
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_escapes_tokens() {
        let ptr = JsonPointer::of(["a/b", "c~d", "0"]);
        assert_eq!(ptr.to_string(), "/a~1b/c~0d/0");
        assert_eq!(JsonPointer::root().to_string(), "");
    }

    #[test]
    fn parse_unescapes_tokens() {
        let ptr = JsonPointer::parse("/a~1b/c~0d/~01").unwrap();
        assert_eq!(ptr.tokens(), ["a/b", "c~d", "~1"]);
        assert!(JsonPointer::parse("").unwrap().is_root());
        assert!(JsonPointer::parse("a/b").is_none());
    }

    #[test]
    fn from_fragment() {
        assert!(JsonPointer::from_fragment("#").unwrap().is_root());
        let ptr = JsonPointer::from_fragment("#/definitions/a%20b").unwrap();
        assert_eq!(ptr.tokens(), ["definitions", "a b"]);
        assert!(JsonPointer::from_fragment("/definitions").is_none());
        assert!(JsonPointer::from_fragment("#/bad%2").is_none());
    }

    #[test]
    fn resolve_objects_and_arrays() {
        let doc = json!({"items": [{"type": "string"}, {"type": "integer"}]});
        let ptr = JsonPointer::of(["items", "1", "type"]);
        assert_eq!(ptr.resolve(&doc), Some(&json!("integer")));
        assert_eq!(JsonPointer::of(["items", "01"]).resolve(&doc), None);
        assert_eq!(JsonPointer::of(["items", "2"]).resolve(&doc), None);
        assert_eq!(JsonPointer::root().resolve(&doc), Some(&doc));
    }

    #[test]
    fn append_and_join() {
        let base = JsonPointer::of(["properties"]);
        let child = base.append("foo");
        assert_eq!(child.to_string(), "/properties/foo");
        assert_eq!(base.to_string(), "/properties");
        let joined = child.join(&JsonPointer::of(["items"]));
        assert_eq!(joined.to_string(), "/properties/foo/items");
    }
}
