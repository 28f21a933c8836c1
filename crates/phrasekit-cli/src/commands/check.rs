//! Implementation of the `phrasekit check` command.

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Report};
use owo_colors::{OwoColorize, Stream};
use phrasekit::interpreter::flatten;
use phrasekit::{Phrase, compile};
use serde::Serialize;
use tracing::debug;

use super::{locale_for, read_phrase_file};
use crate::output::PhraseDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Phrase files to check (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of checking one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    phrases: usize,
    placeholders: usize,
    errors: Vec<ProblemJson>,
    #[serde(skip)]
    diagnostics: Vec<Report>,
}

/// One problem in JSON output.
#[derive(Debug, Serialize)]
struct ProblemJson {
    key: Option<String>,
    line: usize,
    column: usize,
    message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(PathBuf::as_path)
        .map(check_file)
        .collect();
    let failed = reports.iter().any(|report| !report.errors.is_empty());

    if args.json {
        let output = serde_json::to_string_pretty(&reports).into_diagnostic()?;
        println!("{output}");
    } else {
        for report in &reports {
            for diagnostic in &report.diagnostics {
                eprintln!("{diagnostic:?}");
            }
            if report.errors.is_empty() {
                println!(
                    "{} {}: {} phrases, {} placeholders",
                    "✓".if_supports_color(Stream::Stdout, |mark| mark.green()),
                    report.file,
                    report.phrases,
                    report.placeholders
                );
            } else {
                println!(
                    "{} {}: {} errors",
                    "✗".if_supports_color(Stream::Stdout, |mark| mark.red()),
                    report.file,
                    report.errors.len()
                );
            }
        }
    }

    if failed {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

/// Compile every phrase of a file, collecting all problems.
fn check_file(path: &Path) -> FileReport {
    let mut report = FileReport {
        file: path.display().to_string(),
        phrases: 0,
        placeholders: 0,
        errors: Vec::new(),
        diagnostics: Vec::new(),
    };

    let tree = match read_phrase_file(path) {
        Ok(tree) => tree,
        Err(diagnostic) => {
            report.errors.push(ProblemJson {
                key: None,
                line: 0,
                column: 0,
                message: diagnostic.to_string(),
            });
            report.diagnostics.push(diagnostic);
            return report;
        }
    };

    let flat = match flatten(&locale_for(path), &tree) {
        Ok(flat) => flat,
        Err(e) => {
            report.errors.push(ProblemJson {
                key: None,
                line: 0,
                column: 0,
                message: e.to_string(),
            });
            report.diagnostics.push(Report::msg(e.to_string()));
            return report;
        }
    };

    report.phrases = flat.len();
    for (key, raw) in &flat {
        match compile(raw) {
            Ok(Phrase::Compiled(template)) => report.placeholders += template.placeholders().len(),
            Ok(Phrase::Raw(_)) => {}
            Err(e) => {
                let (line, column) = e.position();
                report.errors.push(ProblemJson {
                    key: Some(key.clone()),
                    line,
                    column,
                    message: e.to_string(),
                });
                report
                    .diagnostics
                    .push(PhraseDiagnostic::from_parse_error(path, key, &e).into());
            }
        }
    }
    debug!(file = %report.file, phrases = report.phrases, errors = report.errors.len(), "checked file");
    report
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn valid_file_counts_phrases_and_placeholders() {
        let file = file_with(r#"{"a": "Hi {{name}}", "b": {"c": "{{n, number}} of {{m}}"}, "d": "plain"}"#);
        let report = check_file(file.path());
        assert!(report.errors.is_empty());
        assert_eq!(report.phrases, 3);
        assert_eq!(report.placeholders, 3);
    }

    #[test]
    fn every_bad_phrase_is_reported() {
        let file = file_with(r#"{"a": "{{n, number, {x}}}", "b": "{{n, plural, {\"forms\": \"a|b\"} oops }}"}"#);
        let report = check_file(file.path());
        let keys: Vec<Option<&str>> = report.errors.iter().map(|e| e.key.as_deref()).collect();
        assert_eq!(keys, vec![Some("a"), Some("b")]);
        assert_eq!(report.diagnostics.len(), 2);
    }

    #[test]
    fn invalid_json_is_reported() {
        let file = file_with("{\"a\": ");
        let report = check_file(file.path());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].key, None);
    }

    #[test]
    fn non_string_leaf_is_reported() {
        let file = file_with(r#"{"a": 1}"#);
        let report = check_file(file.path());
        assert!(report.errors[0].message.contains("'a'"));
    }
}
