//! Formatters: named value-to-text transformations used by placeholders.
//!
//! A placeholder like `{{ total, currency }}` looks up `currency` in the
//! active locale's [`FormatterRegistry`] and calls it with the locale's
//! default settings for `currency`, merged with any inline settings.

pub mod builtin;
mod registry;
mod settings;

pub use registry::{FormatScope, Formatter, FormatterRegistry};
pub use settings::{FormatterSettings, merge_settings};
