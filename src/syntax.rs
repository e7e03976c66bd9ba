//! Static checks of schema documents.
//!
//! Reports, for every sub-schema reachable through schema-bearing keywords:
//! - keywords the dictionary does not know (warning)
//! - keyword values that would fail compilation (error)
//! - `$ref`s that do not resolve inside the document (error), or that point
//!   outside of it (warning)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::bundle::{MapBundle, MessageBundle};
use crate::composite::ChildSelector;
use crate::dictionary::Dictionary;
use crate::error::KeywordError;
use crate::loader::load_json;
use crate::pointer::JsonPointer;
use crate::report::{ProcessingMessage, Report, Severity};
use crate::types::{json_type_name, Draft};

/// Keywords whose value is a single schema.
const SCHEMA_KEYWORDS: &[&str] = &["additionalItems", "additionalProperties", "items", "not", "extends"];

/// Keywords whose value is an array of schemas.
const SCHEMA_ARRAY_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "items", "extends", "type", "disallow"];

/// Keywords whose value is an object of schemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &["definitions", "dependencies", "patternProperties", "properties"];

/// Check a whole schema document against `dictionary`.
pub fn check_syntax(schema: &Value, dictionary: &Dictionary) -> Report {
    let bundle = MapBundle::validation();
    let mut report = Report::new();
    check_node(schema, &JsonPointer::root(), schema, dictionary, &bundle, &mut report);
    report
}

fn check_node(
    node: &Value,
    pointer: &JsonPointer,
    root: &Value,
    dictionary: &Dictionary,
    bundle: &dyn MessageBundle,
    report: &mut Report,
) {
    let Value::Object(members) = node else {
        return;
    };

    let ignored: BTreeSet<&str> = members
        .keys()
        .map(String::as_str)
        .filter(|keyword| !dictionary.is_known(keyword))
        .collect();
    if !ignored.is_empty() {
        report.warn(
            message(bundle, "unknown keywords ignored", pointer)
                .put("ignored", ignored.into_iter().collect::<Vec<_>>()),
        );
    }

    let mut failed = BTreeSet::new();
    for keyword in members.keys() {
        let Some(factory) = dictionary.get(keyword) else {
            continue;
        };
        if let Err(err) = factory(node) {
            failed.insert(err.keyword());
            report.error(invalid_value(bundle, pointer, &err));
        }
    }
    if let Err(err) = ChildSelector::compile(node) {
        if !failed.contains(err.keyword()) {
            report.error(invalid_value(bundle, pointer, &err));
        }
    }

    match members.get("$ref") {
        Some(Value::String(reference)) => check_ref(reference, pointer, root, bundle, report),
        Some(other) => {
            let err = KeywordError::WrongType {
                keyword: "$ref",
                expected: "string",
                actual: json_type_name(other),
            };
            report.error(invalid_value(bundle, pointer, &err));
        }
        None => {}
    }

    for (keyword, value) in members {
        let keyword_pointer = pointer.append(keyword.as_str());
        match value {
            Value::Object(_) if SCHEMA_KEYWORDS.contains(&keyword.as_str()) => {
                check_node(value, &keyword_pointer, root, dictionary, bundle, report);
            }
            Value::Object(children) if SCHEMA_MAP_KEYWORDS.contains(&keyword.as_str()) => {
                for (name, child) in children {
                    check_node(child, &keyword_pointer.append(name.as_str()), root, dictionary, bundle, report);
                }
            }
            Value::Array(children) if SCHEMA_ARRAY_KEYWORDS.contains(&keyword.as_str()) => {
                for (index, child) in children.iter().enumerate() {
                    check_node(child, &keyword_pointer.append(index.to_string()), root, dictionary, bundle, report);
                }
            }
            _ => {}
        }
    }
}

fn check_ref(reference: &str, pointer: &JsonPointer, root: &Value, bundle: &dyn MessageBundle, report: &mut Report) {
    let msg = message(bundle, "unresolvable reference", pointer)
        .keyword("$ref")
        .put("ref", reference);
    match JsonPointer::from_fragment(reference) {
        Some(target) if target.resolve(root).is_some() => {}
        Some(_) => report.error(msg),
        None => report.warn(msg.put("reason", "only references local to the document are resolved")),
    }
}

fn message(bundle: &dyn MessageBundle, key: &str, pointer: &JsonPointer) -> ProcessingMessage {
    ProcessingMessage::new(key)
        .message(bundle.message(key))
        .schema(pointer.clone())
}

fn invalid_value(bundle: &dyn MessageBundle, pointer: &JsonPointer, err: &KeywordError) -> ProcessingMessage {
    message(bundle, "invalid keyword value", pointer)
        .keyword(err.keyword())
        .put("reason", err.to_string())
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ProcessingMessage>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub draft: Draft,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if no file has errors.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// Directories are searched recursively for `.json` files. With `strict`,
/// files with warnings count as failed.
pub fn lint(path: &Path, draft: Draft, strict: bool) -> LintResult {
    let dictionary = Dictionary::for_draft(draft);
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut errors = 0;
    let mut warnings = 0;

    for file in &files {
        let result = lint_file(file, path, &dictionary);
        for diagnostic in &result.diagnostics {
            match diagnostic.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
        }
        results.push(result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        draft,
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Lint a single schema file. `base_path` is stripped from the reported name.
pub fn lint_file(file: &Path, base_path: &Path, dictionary: &Dictionary) -> FileResult {
    let name = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();

    let schema = match load_json(file) {
        Ok(schema) => schema,
        Err(e) => {
            let bundle = MapBundle::validation();
            let diagnostic = message(&bundle, "schema cannot be loaded", &JsonPointer::root())
                .put("reason", e.to_string());
            return FileResult {
                file: name,
                status: FileStatus::Error,
                diagnostics: vec![diagnostic],
            };
        }
    };

    let report = check_syntax(&schema, dictionary);
    let status = if !report.is_success() {
        FileStatus::Error
    } else if !report.is_empty() {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: name,
        status,
        diagnostics: report.into_messages(),
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
