//! Formatter registry and the call-time scope handed to every formatter.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter as FmtFormatter, Result as FmtResult};
use std::sync::Arc;

use serde_json::Map;
use tracing::trace;

use crate::formatter::builtin;
use crate::formatter::settings::{FormatterSettings, merge_settings};
use crate::types::{Settings, Value};

/// A named transformation from a value plus settings into display text.
///
/// Formatters never fail: anything they cannot handle should degrade to a
/// readable string. The `scope` gives access to the other formatters and
/// their default settings of the locale currently rendering, so formatters
/// can be composed.
///
/// Any closure with a matching signature is a formatter:
///
/// ```
/// use phrasekit::{FormatScope, FormatterRegistry, Settings, Value};
///
/// let mut formatters = FormatterRegistry::new();
/// formatters.register("shout", |value: &Value, _: &Settings, _: &FormatScope<'_>| {
///     value.to_string().to_uppercase()
/// });
/// assert!(formatters.contains("shout"));
/// ```
pub trait Formatter: Send + Sync {
    /// Format `value` using the already-merged `settings`.
    fn format(&self, value: &Value, settings: &Settings, scope: &FormatScope<'_>) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&Value, &Settings, &FormatScope<'_>) -> String + Send + Sync,
{
    fn format(&self, value: &Value, settings: &Settings, scope: &FormatScope<'_>) -> String {
        self(value, settings, scope)
    }
}

/// Registry of formatters keyed by name.
///
/// The registry is open: formatters can be added or replaced at any time, and
/// each locale owns its own copy so overrides stay local to that locale.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in formatters.
    ///
    /// See [`builtin`](crate::formatter::builtin) for the list.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a formatter, replacing any existing one with the same name.
    pub fn register(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        self.formatters.insert(name.into(), Arc::new(formatter));
    }

    /// Register an already shared formatter.
    pub fn register_shared(&mut self, name: impl Into<String>, formatter: Arc<dyn Formatter>) {
        self.formatters.insert(name.into(), formatter);
    }

    /// Get a formatter by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Formatter>> {
        self.formatters.get(name)
    }

    /// Check if a formatter exists.
    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Registered formatter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Returns true if no formatters are registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Copy every formatter from `other` into this registry; `other` wins on conflicts.
    pub fn extend(&mut self, other: &FormatterRegistry) {
        self.formatters.extend(
            other
                .formatters
                .iter()
                .map(|(name, formatter)| (name.clone(), Arc::clone(formatter))),
        );
    }
}

impl Debug for FormatterRegistry {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.debug_struct("FormatterRegistry")
            .field("formatters", &self.names())
            .finish()
    }
}

/// The registry and settings a formatter runs against.
///
/// A scope is created per render from the active locale and passed to every
/// formatter call, including user-registered ones, so formatters can call
/// each other without holding a reference to the registry themselves.
#[derive(Debug, Clone, Copy)]
pub struct FormatScope<'a> {
    formatters: &'a FormatterRegistry,
    settings: &'a FormatterSettings,
}

impl<'a> FormatScope<'a> {
    /// Create a scope over a registry and its default settings.
    pub fn new(formatters: &'a FormatterRegistry, settings: &'a FormatterSettings) -> Self {
        Self {
            formatters,
            settings,
        }
    }

    /// The formatters visible in this scope.
    pub fn formatters(&self) -> &'a FormatterRegistry {
        self.formatters
    }

    /// The default settings visible in this scope.
    pub fn settings(&self) -> &'a FormatterSettings {
        self.settings
    }

    /// Run formatter `name` with its default settings, shallow-merged with
    /// `overrides` when given.
    ///
    /// An unknown formatter degrades to the value's plain text.
    pub fn format(&self, name: &str, value: &Value, overrides: Option<&Settings>) -> String {
        match self.formatters.get(name) {
            Some(formatter) => {
                let merged = merge_settings(self.settings.get(name), overrides);
                formatter.format(value, &merged, self)
            }
            None => {
                trace!(formatter = name, "unknown formatter, using plain text");
                value.to_string()
            }
        }
    }

    /// Run formatter `name` with exactly `settings`, skipping the defaults.
    pub fn call(&self, name: &str, value: &Value, settings: &Settings) -> String {
        match self.formatters.get(name) {
            Some(formatter) => formatter.format(value, settings, self),
            None => value.to_string(),
        }
    }

    /// An owned copy of the default settings for `name`.
    ///
    /// Returns an empty object if none are configured. Changing the copy
    /// does not affect the settings table.
    pub fn default_settings(&self, name: &str) -> Settings {
        self.settings
            .get(name)
            .cloned()
            .unwrap_or_else(|| Settings::Object(Map::new()))
    }
}
