//! jsv CLI
//!
//! Command-line interface for validating JSON instances and linting schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsv::{
    lint, load_json, load_json_auto, Draft, FileStatus, ProcessingMessage, SchemaValidator, Severity,
    ValidationOptions,
};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsv")]
#[command(about = "Validate JSON documents against draft-3 and draft-4 JSON Schemas")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (overridden by JSV_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate instance files against a schema
    Validate {
        /// Instance files to validate
        #[arg(required = true)]
        instances: Vec<PathBuf>,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long, short)]
        schema: String,

        /// Schema draft: v3 or v4
        #[arg(long, default_value = "v4", value_parser = parse_draft)]
        draft: Draft,

        /// Keep validating children of containers that already failed
        #[arg(long)]
        deep: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Lint schema files for errors (syntax, invalid keyword values, broken refs)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Schema draft: v3 or v4
        #[arg(long, default_value = "v4", value_parser = parse_draft)]
        draft: Draft,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn parse_draft(s: &str) -> Result<Draft, String> {
    Draft::parse(s).ok_or_else(|| format!("unknown draft \"{}\": expected v3 or v4", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            instances,
            schema,
            draft,
            deep,
            json,
        } => run_validate(&instances, &schema, ValidationOptions::new(draft).deep_check(deep), json),

        Commands::Lint {
            path,
            draft,
            format,
            strict,
            quiet,
        } => run_lint(&path, draft, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_env("JSV_LOG").unwrap_or_else(|_| EnvFilter::new(default.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(instances: &[PathBuf], schema_source: &str, options: ValidationOptions, json_output: bool) -> Result<(), u8> {
    let schema = load_json_auto(schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;
    debug!(schema = schema_source, draft = %options.draft, "loaded schema");

    let validator = SchemaValidator::with_options(schema, &options);
    let mut results = Vec::new();
    let mut any_invalid = false;

    for path in instances {
        let instance = load_json(path).map_err(|e| {
            report_error(json_output, &format!("loading instance {}: {}", path.display(), e));
            e.exit_code() as u8
        })?;
        let report = validator.validate(&instance).map_err(|e| {
            report_error(json_output, &e.to_string());
            e.exit_code() as u8
        })?;

        let valid = report.is_success();
        any_invalid |= !valid;
        if json_output {
            results.push(serde_json::json!({
                "file": path.display().to_string(),
                "valid": valid,
                "messages": report.messages(),
            }));
        } else {
            print_report(path, valid, report.messages());
        }
    }

    if json_output {
        let output = serde_json::json!({
            "valid": !any_invalid,
            "results": results,
        });
        println!("{}", output);
    }

    if any_invalid {
        Err(1)
    } else {
        Ok(())
    }
}

fn print_report(path: &Path, valid: bool, messages: &[ProcessingMessage]) {
    if valid {
        println!("{}: valid", path.display());
        for message in messages {
            println!("  {}", message);
        }
    } else {
        eprintln!("{}: invalid", path.display());
        for message in messages {
            eprintln!("  {}", message);
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({"valid": false, "error": msg}));
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_lint(path: &Path, draft: Draft, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(3);
    }

    let result = lint(path, draft, strict);

    if format == "json" {
        let output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        if !quiet {
            println!("Linting {} ({}) ...\n", path.display(), draft);
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    let pointer = diag.schema.to_string();
                    let pointer = if pointer.is_empty() { "/" } else { &pointer };
                    let detail = diag
                        .field("reason")
                        .or_else(|| diag.field("ignored"))
                        .map(|v| format!(" ({})", v))
                        .unwrap_or_default();
                    println!(
                        "    {}{}\x1b[0m: {} - {}{}",
                        color, label, pointer, diag.key, detail
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
