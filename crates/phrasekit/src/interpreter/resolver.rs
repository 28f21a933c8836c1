//! Template resolution.
//!
//! Walks a compiled template against caller parameters, sending each bound
//! value through its formatter. Resolution is total: missing parameters and
//! unknown formatters produce visible output instead of errors.

use tracing::trace;

use crate::formatter::FormatScope;
use crate::parser::ast::{CompiledTemplate, Phrase, Placeholder};
use crate::types::Params;

/// Resolve a compiled template into its final string.
///
/// For each placeholder, in order:
/// 1. An unbound parameter emits `{{name}}`.
/// 2. Without a formatter, the value's plain text is emitted.
/// 3. An unknown formatter also emits the plain text.
/// 4. Otherwise the formatter runs with its default settings merged with the
///    placeholder's inline settings.
pub fn resolve(template: &CompiledTemplate, params: &Params, scope: &FormatScope<'_>) -> String {
    let mut output = String::new();
    let fragments = template.fragments();
    for (fragment, placeholder) in fragments.iter().zip(template.placeholders()) {
        output.push_str(fragment);
        output.push_str(&resolve_placeholder(placeholder, params, scope));
    }
    if let Some(last) = fragments.last() {
        output.push_str(last);
    }
    output
}

/// Render any phrase: raw text is returned as-is, templates are resolved.
pub fn render(phrase: &Phrase, params: &Params, scope: &FormatScope<'_>) -> String {
    match phrase {
        Phrase::Raw(text) => text.clone(),
        Phrase::Compiled(template) => resolve(template, params, scope),
    }
}

fn resolve_placeholder(placeholder: &Placeholder, params: &Params, scope: &FormatScope<'_>) -> String {
    let Some(value) = params.get(&placeholder.parameter) else {
        trace!(parameter = %placeholder.parameter, "unbound parameter");
        return placeholder.visible_miss();
    };

    match &placeholder.formatter {
        None => value.to_string(),
        Some(name) if !scope.formatters().contains(name) => {
            trace!(formatter = %name, "unknown formatter, using plain text");
            value.to_string()
        }
        Some(name) => scope.format(name, value, placeholder.settings.as_ref()),
    }
}
