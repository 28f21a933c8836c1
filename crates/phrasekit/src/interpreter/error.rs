//! Error types for locale definition and activation.

use std::io;
use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;

use crate::parser::ParseError;

/// Errors that occur while defining or loading a locale.
///
/// These surface at definition time so broken phrases are caught before
/// anything is rendered.
#[derive(Debug, Error)]
pub enum DefineError {
    /// A phrase has a malformed placeholder settings clause.
    #[error("locale '{locale}', phrase '{key}': {source}")]
    Parse {
        locale: String,
        key: String,
        #[source]
        source: ParseError,
    },

    /// The phrase tree is not an object.
    #[error("phrase tree for locale '{locale}' must be an object, found {kind}")]
    InvalidRoot { locale: String, kind: &'static str },

    /// A leaf of the phrase tree is neither a string nor an object.
    #[error("phrase '{key}' must be a string or an object, found {kind}")]
    InvalidLeaf { key: String, kind: &'static str },

    /// File I/O error when reading a phrase file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A phrase file is not valid JSON.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A phrase tree given as a string is not valid JSON.
    #[error("invalid JSON for locale '{locale}': {source}")]
    InlineJson {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    /// Attempted to reload a locale that was not loaded from a file.
    #[error("cannot reload '{locale}': was not loaded from a file")]
    NoPathForReload { locale: String },
}

/// Activation of a locale key that was never defined.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("locale not found: '{locale}'{}", format_suggestions(suggestions))]
pub struct LocaleNotFoundError {
    /// The requested locale key.
    pub locale: String,
    /// Defined locale keys close to the requested one, closest first.
    pub suggestions: Vec<String>,
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Names from `available` within a small edit distance of `key`.
///
/// Keys of three characters or fewer allow distance 1, longer keys distance 2.
/// At most three suggestions are returned, closest first.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.chars().count() <= 3 { 1 } else { 2 };
    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (levenshtein(key, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
