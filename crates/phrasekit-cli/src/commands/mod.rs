//! CLI command implementations.

mod check;
mod coverage;
mod translate;

use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value as JsonValue;

use crate::output::PhraseDiagnostic;

pub use check::{CheckArgs, run_check};
pub use coverage::{CoverageArgs, run_coverage};
pub use translate::{TranslateArgs, run_translate};

/// Read and parse a JSON phrase file.
fn read_phrase_file(path: &Path) -> Result<JsonValue> {
    let content = read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    match serde_json::from_str(&content) {
        Ok(tree) => Ok(tree),
        Err(e) => Err(PhraseDiagnostic::from_json_error(path, &content, &e).into()),
    }
}

/// Locale key for a phrase file: its file stem, e.g. `de` for `de.json`.
fn locale_for(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(phrasekit::DEFAULT_LOCALE)
        .to_string()
}
