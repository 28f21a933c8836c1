//! Implementation of the `phrasekit translate` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, miette};
use phrasekit::{DefineError, LocaleDefinition, Localizer, Params, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{locale_for, read_phrase_file};
use crate::output::PhraseDiagnostic;

/// Arguments for the translate command.
#[derive(Debug, clap::Args)]
pub struct TranslateArgs {
    /// JSON phrase file
    #[arg(long, required = true)]
    pub phrases: PathBuf,

    /// Locale key to define the file under. Defaults to the file stem.
    #[arg(long)]
    pub locale: Option<String>,

    /// Dot-joined phrase key to render
    #[arg(long, required = true)]
    pub key: String,

    /// Parameters in name=value format (repeatable). Values are read as
    /// JSON when possible, e.g. `n=3` or `items=["a","b"]`, else as text.
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for translate results.
#[derive(Serialize)]
pub struct TranslateResult {
    pub locale: String,
    pub key: String,
    pub result: String,
    pub missing: bool,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((name.to_string(), value.to_string()))
}

/// Convert a command-line value to a parameter value.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(json) => Value::from_json(&json),
        Err(_) => Value::from(raw),
    }
}

/// Run the translate command.
pub fn run_translate(args: TranslateArgs) -> miette::Result<i32> {
    let locale = args.locale.clone().unwrap_or_else(|| locale_for(&args.phrases));
    let tree = read_phrase_file(&args.phrases)?;

    let mut localizer = Localizer::new();
    let definition = LocaleDefinition::builder()
        .locale(locale.clone())
        .phrases(tree)
        .build();
    match localizer.define(definition) {
        Ok(count) => debug!(locale = %locale, phrases = count, "loaded phrase file"),
        Err(DefineError::Parse { key, source, .. }) => {
            return Err(PhraseDiagnostic::from_parse_error(&args.phrases, &key, &source).into());
        }
        Err(e) => return Err(miette!("{e}")),
    }

    let params: Params = args
        .params
        .iter()
        .map(|(name, raw)| (name.clone(), parse_value(raw)))
        .collect();

    let missing = !localizer
        .entry(&locale)
        .is_some_and(|entry| entry.contains(&args.key));
    let result = localizer.translate(&args.key, &params);

    if args.json {
        let output = TranslateResult {
            locale,
            key: args.key,
            result,
            missing,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{result}");
    }

    if missing {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::*;

    fn phrase_file() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, r#"{"cart": {"items": "{{n, naturalNumber}} items"}}"#).unwrap();
        (dir, path)
    }

    fn args(phrases: PathBuf, key: &str) -> TranslateArgs {
        TranslateArgs {
            phrases,
            locale: None,
            key: key.to_string(),
            params: vec![("n".to_string(), "3".to_string())],
            json: true,
        }
    }

    #[test]
    fn found_key_exits_ok() {
        let (_dir, path) = phrase_file();
        assert_eq!(run_translate(args(path, "cart.items")).unwrap(), exitcode::OK);
    }

    #[test]
    fn missing_key_exits_dataerr() {
        let (_dir, path) = phrase_file();
        assert_eq!(run_translate(args(path, "cart.total")).unwrap(), exitcode::DATAERR);
    }

    #[test]
    fn bad_placeholder_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, r#"{"a": "{{n, number, {x}}}"}"#).unwrap();
        assert!(run_translate(args(path, "a")).is_err());
    }

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn values_prefer_json() {
        assert_eq!(parse_value("3"), Value::Number(3));
        assert_eq!(parse_value("2.5"), Value::Float(2.5));
        assert_eq!(parse_value("Ada"), Value::String("Ada".into()));
        assert_eq!(
            parse_value(r#"["a","b"]"#),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }
}
