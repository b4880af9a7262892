//! `validate` command.
//!
//! Loads every file, prints one report per file to stdout, and fails with
//! the first error once all files have been checked.

use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadResult, LoadWarning};
use crate::error::{ConfigError, FarthestError, Severity, ValidationIssue};

/// Validate configuration files.
///
/// # Errors
///
/// Returns the first file's `ConfigError` if any file fails, or (with
/// `--strict`) has warnings.
pub fn run(args: &ValidateArgs) -> Result<(), FarthestError> {
    let loader = ConfigLoader::default();
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        info!(file = %path.display(), "validating configuration");
        let outcome = loader
            .load(path)
            .and_then(|result| strict_check(result, path, args.strict));
        report(path, &outcome, args.format);

        match outcome {
            Ok(result) => {
                for warning in &result.warnings {
                    warn!(
                        location = warning.location.as_deref().unwrap_or("<unknown>"),
                        "{}",
                        warning.message
                    );
                }
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

/// Under `--strict`, turns warnings into a validation failure.
fn strict_check(result: LoadResult, path: &Path, strict: bool) -> Result<LoadResult, ConfigError> {
    if !strict || result.warnings.is_empty() {
        return Ok(result);
    }
    Err(ConfigError::ValidationError {
        path: path.display().to_string(),
        errors: result
            .warnings
            .into_iter()
            .map(|w| ValidationIssue {
                path: w.location.unwrap_or_default(),
                message: w.message,
                severity: Severity::Error,
            })
            .collect(),
    })
}

fn report(path: &Path, outcome: &Result<LoadResult, ConfigError>, format: OutputFormat) {
    match format {
        OutputFormat::Human => match outcome {
            Ok(result) => {
                println!("ok: {}", path.display());
                for warning in &result.warnings {
                    println!("  {}", describe_warning(warning));
                }
            }
            Err(ConfigError::ValidationError { errors, .. }) => {
                println!("invalid: {}", path.display());
                for issue in errors {
                    println!("  {issue}");
                }
            }
            Err(e) => println!("invalid: {}\n  {e}", path.display()),
        },
        OutputFormat::Json => {
            let value = match outcome {
                Ok(result) => json!({
                    "file": path.display().to_string(),
                    "valid": true,
                    "warnings": result.warnings.iter().map(describe_warning).collect::<Vec<_>>(),
                }),
                Err(ConfigError::ValidationError { errors, .. }) => json!({
                    "file": path.display().to_string(),
                    "valid": false,
                    "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                }),
                Err(e) => json!({
                    "file": path.display().to_string(),
                    "valid": false,
                    "errors": [e.to_string()],
                }),
            };
            println!("{value}");
        }
    }
}

fn describe_warning(warning: &LoadWarning) -> String {
    warning.location.as_ref().map_or_else(
        || format!("warning: {}", warning.message),
        |location| format!("warning: {} at {location}", warning.message),
    )
}
