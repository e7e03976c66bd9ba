//! Error types for schema compilation, processing and loading.
//!
//! Validation failures of an instance are never errors: they are recorded in
//! a [`Report`](crate::Report). The types here cover the other channel, where
//! the schema itself is unusable or a recursive processor call failed.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the value of a single keyword, raised by a validator factory.
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("keyword \"{keyword}\": expected {expected}, got {actual}")]
    WrongType {
        keyword: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("keyword \"{keyword}\": invalid ECMA 262 regex \"{pattern}\": {message}")]
    InvalidRegex {
        keyword: &'static str,
        pattern: String,
        message: String,
    },

    #[error("keyword \"{keyword}\": {message}")]
    InvalidValue {
        keyword: &'static str,
        message: String,
    },
}

impl KeywordError {
    /// The keyword whose value was rejected.
    pub fn keyword(&self) -> &'static str {
        match self {
            KeywordError::WrongType { keyword, .. }
            | KeywordError::InvalidRegex { keyword, .. }
            | KeywordError::InvalidValue { keyword, .. } => keyword,
        }
    }
}

/// Infrastructure failures that abort a validation run.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("cannot compile schema at #{pointer}: {source}")]
    Compile {
        pointer: String,
        #[source]
        source: KeywordError,
    },

    #[error("unresolvable reference \"{reference}\" at #{pointer}")]
    DanglingRef { pointer: String, reference: String },

    #[error("reference loop detected at #{pointer}: \"{reference}\" was already visited")]
    RefLoop { pointer: String, reference: String },

    #[error("unsupported reference \"{reference}\" at #{pointer}: only local fragments are resolved")]
    UnsupportedRef { pointer: String, reference: String },

    #[error("validation loop: schema #{schema} is already being applied to instance #{instance}")]
    ValidationLoop { schema: String, instance: String },

    #[error("processing failed: {message}")]
    Processor { message: String },
}

impl ProcessingError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading JSON documents (schemas or instances).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}
