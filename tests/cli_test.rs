//! CLI integration tests for the jsv binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("jsv"))
}

// Helper to create a temp JSON file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PERSON_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "name": { "type": "string" },
        "age": { "type": "integer", "minimum": 0 }
    },
    "required": ["name"],
    "additionalProperties": false
}"#;

mod validate_command {
    use super::*;

    #[test]
    fn validate_valid_instance() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"name": "Ada", "age": 36}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("valid"));
    }

    #[test]
    fn validate_missing_required_field() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"age": 36}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid"))
            .stderr(predicate::str::contains("[required]"));
    }

    #[test]
    fn validate_wrong_type_reports_instance_pointer() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"name": 42}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/name"));
    }

    #[test]
    fn validate_additional_property_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"name": "Ada", "email": "a@b"}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("[additionalProperties]"));
    }

    #[test]
    fn validate_several_instances() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let good = write_temp_file(&dir, "good.json", r#"{"name": "Ada"}"#);
        let bad = write_temp_file(&dir, "bad.json", r#"{"name": "Ada", "age": -1}"#);

        cmd()
            .args([
                "validate",
                good.to_str().unwrap(),
                bad.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("good.json: valid"))
            .stderr(predicate::str::contains("bad.json: invalid"));
    }

    #[test]
    fn validate_draft_v3() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{
                "properties": { "id": { "type": "string", "required": true } },
                "extends": { "disallow": "array" }
            }"#,
        );
        let valid = write_temp_file(&dir, "valid.json", r#"{"id": "x"}"#);
        let missing = write_temp_file(&dir, "missing.json", r#"{}"#);

        cmd()
            .args([
                "validate",
                valid.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--draft",
                "v3",
            ])
            .assert()
            .success();

        cmd()
            .args([
                "validate",
                missing.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--draft",
                "draft3",
            ])
            .assert()
            .code(1);
    }

    #[test]
    fn validate_deep_reports_children_of_failed_container() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"maxItems": 1, "items": {"type": "string"}}"#,
        );
        let instance = write_temp_file(&dir, "list.json", r#"[1, 2]"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error: /0:").not());

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--deep",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error: /0:"))
            .stderr(predicate::str::contains("error: /1:"));
    }

    #[test]
    fn validate_json_output_valid() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"name": "Ada"}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(r#"{"valid":true"#));
    }

    #[test]
    fn validate_json_output_invalid() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);
        let instance = write_temp_file(&dir, "person.json", r#"{"name": "Ada", "x": 1, "b": 2}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""key":"additional properties not permitted""#))
            .stdout(predicate::str::contains(r#""unwanted":["b","x"]"#));
    }

    #[test]
    fn validate_json_output_file_error() {
        let dir = TempDir::new().unwrap();
        let instance = write_temp_file(&dir, "person.json", r#"{}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                "/nonexistent/schema.json",
                "--json",
            ])
            .assert()
            .code(3)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""error":"#));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn schema_not_found() {
        let dir = TempDir::new().unwrap();
        let instance = write_temp_file(&dir, "instance.json", "{}");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                "/nonexistent/schema.json",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn instance_not_found() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PERSON_SCHEMA);

        cmd()
            .args([
                "validate",
                "/nonexistent/instance.json",
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(3);
    }

    #[test]
    fn self_applying_schema_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r##"{"allOf": [{"$ref": "#"}]}"##);
        let instance = write_temp_file(&dir, "instance.json", "1");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("validation loop"));
    }

    #[test]
    fn invalid_json_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);
        let instance = write_temp_file(&dir, "instance.json", "{}");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn invalid_keyword_value() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"minLength": "three"}"#);
        let instance = write_temp_file(&dir, "instance.json", r#""abc""#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("minLength"));
    }

    #[test]
    fn dangling_reference() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r##"{"$ref": "#/definitions/nope"}"##);
        let instance = write_temp_file(&dir, "instance.json", "1");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("#/definitions/nope"));
    }

    #[test]
    fn unknown_draft() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", "{}");
        let instance = write_temp_file(&dir, "instance.json", "{}");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--draft",
                "v7",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown draft"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_schema_flag() {
        let dir = TempDir::new().unwrap();
        let instance = write_temp_file(&dir, "instance.json", "{}");

        cmd()
            .args(["validate", instance.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--schema"));
    }

    #[test]
    fn missing_instance_for_validate() {
        cmd()
            .args(["validate", "--schema", "schema.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("INSTANCES"));
    }

    #[test]
    fn missing_path_for_lint() {
        cmd().arg("lint").assert().failure();
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Validate JSON documents"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("jsv"));
    }

    #[test]
    fn validate_help() {
        cmd()
            .args(["validate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--schema"))
            .stdout(predicate::str::contains("--draft"))
            .stdout(predicate::str::contains("--deep"));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn lint_clean_directory() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "person.json", PERSON_SCHEMA);
        write_temp_file(&dir, "empty.json", "{}");

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 files checked, all passed"));
    }

    #[test]
    fn lint_reports_invalid_keyword_value() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "bad.json", r#"{"properties": {"a": {"maxItems": -1}}}"#);

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("/properties/a"))
            .stdout(predicate::str::contains("invalid keyword value"));
    }

    #[test]
    fn lint_draft_changes_known_keywords() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"extends": {"type": "string"}}"#);

        cmd()
            .args(["lint", schema.to_str().unwrap(), "--draft", "v3", "--strict"])
            .assert()
            .success();

        cmd()
            .args(["lint", schema.to_str().unwrap(), "--strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("unknown keywords ignored"));
    }

    #[test]
    fn lint_json_format() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "schema.json", r#"{"x-vendor": true}"#);

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""files_checked": 1"#))
            .stdout(predicate::str::contains(r#""status": "warning""#));
    }

    #[test]
    fn lint_quiet_hides_passing_files() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "ok.json", "{}");

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--quiet"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ok.json").not());
    }

    #[test]
    fn lint_missing_path() {
        cmd()
            .args(["lint", "/nonexistent/dir"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("path not found"));
    }
}

/// Remote schema loading against a local mock server
mod remote {
    use super::*;

    #[test]
    fn validate_with_remote_schema() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/person.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PERSON_SCHEMA)
            .create();

        let dir = TempDir::new().unwrap();
        let instance = write_temp_file(&dir, "person.json", r#"{"name": "Ada"}"#);

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                &format!("{}/person.json", server.url()),
            ])
            .assert()
            .success();
    }

    #[test]
    fn remote_schema_404() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/missing.json").with_status(404).create();

        let dir = TempDir::new().unwrap();
        let instance = write_temp_file(&dir, "instance.json", "{}");

        cmd()
            .args([
                "validate",
                instance.to_str().unwrap(),
                "--schema",
                &format!("{}/missing.json", server.url()),
            ])
            .assert()
            .code(3) // Network errors are exit code 3
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
