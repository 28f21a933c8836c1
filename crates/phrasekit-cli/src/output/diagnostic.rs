//! Miette diagnostic wrapper for phrase file errors.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use phrasekit::ParseError;
use thiserror::Error;

/// A miette-compatible diagnostic pointing into a phrase file or a phrase.
///
/// Fields are read by the miette derive, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{kind}: {message}")]
#[diagnostic(code(phrasekit::syntax))]
pub struct PhraseDiagnostic {
    kind: &'static str,

    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl PhraseDiagnostic {
    /// Diagnostic for a phrase whose placeholder settings do not compile.
    ///
    /// The source shown is the phrase itself, named after its file and key.
    pub fn from_parse_error(path: &Path, key: &str, err: &ParseError) -> Self {
        let (line, column) = err.position();
        let (message, help) = match err {
            ParseError::Settings { message, .. } => (
                message.clone(),
                Some("formatter settings must be a JSON object, e.g. {\"fractionCount\": 0}".to_string()),
            ),
            ParseError::Unclosed { .. } => (
                "expected `}}` after formatter settings".to_string(),
                Some("close the placeholder right after the settings object".to_string()),
            ),
        };
        let phrase = err.phrase();
        Self {
            kind: "invalid placeholder",
            src: NamedSource::new(format!("{} [{key}]", path.display()), phrase.to_string()),
            span: (byte_offset(phrase, line, column), 1).into(),
            message,
            help,
        }
    }

    /// Diagnostic for a phrase file that is not valid JSON.
    pub fn from_json_error(path: &Path, content: &str, err: &serde_json::Error) -> Self {
        Self {
            kind: "invalid JSON",
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (byte_offset(content, err.line(), err.column()), 1).into(),
            message: err.to_string(),
            help: None,
        }
    }
}

/// Convert a 1-based line and column to a byte offset, clamped to `content`.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let offset = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>()
        + column.saturating_sub(1);
    offset.min(content.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use phrasekit::compile;

    use super::*;

    #[test]
    fn offset_counts_previous_lines() {
        assert_eq!(byte_offset("ab\ncd", 2, 2), 4);
        assert_eq!(byte_offset("ab\ncd", 1, 1), 0);
        assert_eq!(byte_offset("ab", 9, 9), 1);
    }

    #[test]
    fn parse_error_diagnostic_names_key() {
        let err = compile("{{ n, number, {bad} }}").unwrap_err();
        let diagnostic = PhraseDiagnostic::from_parse_error(Path::new("en.json"), "cart.total", &err);
        assert_eq!(diagnostic.src.name(), "en.json [cart.total]");
        assert!(diagnostic.help.is_some());
    }

    #[test]
    fn json_error_diagnostic_points_into_file() {
        let content = "{\n  \"a\": }";
        let err = serde_json::from_str::<serde_json::Value>(content).unwrap_err();
        let diagnostic = PhraseDiagnostic::from_json_error(Path::new("de.json"), content, &err);
        assert_eq!(diagnostic.kind, "invalid JSON");
        assert!(diagnostic.span.offset() >= 2);
    }
}
