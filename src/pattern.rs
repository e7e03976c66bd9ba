//! ECMA 262 regular expressions with search semantics.
//!
//! JSON Schema patterns follow the ECMAScript dialect, not Rust's `regex`
//! syntax: lookahead, lookbehind and backreferences are accepted, and a
//! pattern matches if it matches anywhere in the candidate. Anchors must be
//! written explicitly.

use std::fmt;

use crate::error::KeywordError;

/// A compiled pattern, keeping its source for reporting.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: regress::Regex,
}

impl Pattern {
    /// Compile an ECMA 262 pattern.
    ///
    /// `keyword` names the keyword the pattern came from, for the error.
    pub fn compile(keyword: &'static str, source: &str) -> Result<Self, KeywordError> {
        let regex = regress::Regex::new(source).map_err(|e| KeywordError::InvalidRegex {
            keyword,
            pattern: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Whether the pattern matches anywhere in `candidate`.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.find(candidate).is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
