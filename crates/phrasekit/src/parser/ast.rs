//! Compiled phrase representation.
//!
//! These types are public so tooling can inspect which parameters and
//! formatters a phrase uses without rendering it.

use crate::types::Settings;

/// A phrase as stored in a locale's phrase table.
#[derive(Debug, Clone, PartialEq)]
pub enum Phrase {
    /// Text without any `{{` marker, returned as-is.
    Raw(String),
    /// Text containing at least one `{{` marker.
    Compiled(CompiledTemplate),
}

impl Phrase {
    /// Returns true if the phrase went through placeholder compilation.
    pub fn is_compiled(&self) -> bool {
        matches!(self, Phrase::Compiled(_))
    }

    /// Get the compiled template, if any.
    pub fn as_template(&self) -> Option<&CompiledTemplate> {
        match self {
            Phrase::Compiled(template) => Some(template),
            Phrase::Raw(_) => None,
        }
    }
}

/// Literal fragments interleaved with placeholders.
///
/// `fragments[i]` is followed by `placeholders[i]`; the final fragment closes
/// the template, so there is always exactly one more fragment than placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    fragments: Vec<String>,
    placeholders: Vec<Placeholder>,
}

impl CompiledTemplate {
    pub(crate) fn new(fragments: Vec<String>, placeholders: Vec<Placeholder>) -> Self {
        debug_assert_eq!(fragments.len(), placeholders.len() + 1);
        Self {
            fragments,
            placeholders,
        }
    }

    /// Literal text fragments in order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Placeholder descriptors in order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Names of all parameters referenced, in order of appearance.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(|p| p.parameter.as_str())
    }
}

/// A single `{{ name, formatter, {settings} }}` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Parameter name looked up in the caller's params.
    pub parameter: String,
    /// Optional formatter name.
    pub formatter: Option<String>,
    /// Inline settings, merged over the formatter's defaults.
    pub settings: Option<Settings>,
}

impl Placeholder {
    /// The text emitted when the parameter is not bound.
    pub fn visible_miss(&self) -> String {
        format!("{{{{{}}}}}", self.parameter)
    }
}
