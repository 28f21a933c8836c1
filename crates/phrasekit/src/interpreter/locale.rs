//! Locale management.
//!
//! [`Localizer`] is an explicit localization context: it owns every defined
//! locale, tracks which one is active, and renders phrases against it. There
//! is no hidden global state; create as many localizers as needed, e.g. one
//! per request when different requests need different locales at once.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bon::Builder;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::formatter::{FormatScope, Formatter, FormatterRegistry, FormatterSettings};
use crate::interpreter::error::{DefineError, LocaleNotFoundError, compute_suggestions};
use crate::interpreter::flatten::flatten;
use crate::interpreter::resolver::render;
use crate::parser::{ParseError, Phrase, compile};
use crate::types::Params;

/// Locale key used when a definition does not name one.
pub const DEFAULT_LOCALE: &str = "default";

/// Input to [`Localizer::define`].
///
/// # Example
///
/// ```
/// use phrasekit::LocaleDefinition;
/// use serde_json::json;
///
/// let definition = LocaleDefinition::builder()
///     .locale("de")
///     .phrases(json!({"greeting": "Hallo {{name}}!"}))
///     .build();
/// assert_eq!(definition.locale, "de");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct LocaleDefinition {
    /// Nested phrase tree; string leaves are phrases.
    pub phrases: JsonValue,

    /// Locale key, `"default"` when omitted.
    #[builder(default = DEFAULT_LOCALE.to_string())]
    pub locale: String,

    /// Formatters added to, or replacing, the localizer's base formatters.
    pub formatters: Option<FormatterRegistry>,

    /// Per-formatter settings replacing the localizer's base settings.
    pub formatter_settings: Option<FormatterSettings>,
}

/// One defined locale: its phrases, formatters, and formatter settings.
///
/// The three are swapped together when the active locale changes, so a
/// render never mixes phrases of one locale with formatters of another.
#[derive(Debug, Clone)]
pub struct LocaleEntry {
    phrases: HashMap<String, Phrase>,
    formatters: FormatterRegistry,
    settings: FormatterSettings,
}

impl LocaleEntry {
    /// Get a phrase by its flattened key.
    pub fn get(&self, key: &str) -> Option<&Phrase> {
        self.phrases.get(key)
    }

    /// Check if a phrase key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.phrases.contains_key(key)
    }

    /// Number of phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Returns true if the locale has no phrases.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// All phrase keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.phrases.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// The locale's formatters.
    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// The locale's formatters (mutable), for registering custom formatters.
    pub fn formatters_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.formatters
    }

    /// The locale's default formatter settings.
    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }

    /// The locale's default formatter settings (mutable).
    pub fn settings_mut(&mut self) -> &mut FormatterSettings {
        &mut self.settings
    }

    /// The formatter scope phrases of this locale render with.
    pub fn scope(&self) -> FormatScope<'_> {
        FormatScope::new(&self.formatters, &self.settings)
    }

    /// Render the phrase at `key`, or `[key]` if there is none.
    pub fn translate(&self, key: &str, params: &Params) -> String {
        match self.phrases.get(key) {
            Some(phrase) => render(phrase, params, &self.scope()),
            None => {
                trace!(key, "phrase not found");
                missing_key(key)
            }
        }
    }
}

/// User-facing localization context.
///
/// # Example
///
/// ```
/// use phrasekit::{LocaleDefinition, Localizer, params};
/// use serde_json::json;
///
/// let mut localizer = Localizer::new();
/// localizer
///     .define(
///         LocaleDefinition::builder()
///             .locale("en")
///             .phrases(json!({
///                 "cart": {"items": "{{count, naturalNumber}} {{count, plural, {\"forms\": \"item|items\"}}}"}
///             }))
///             .build(),
///     )
///     .unwrap();
///
/// assert_eq!(localizer.current_locale(), Some("en"));
/// assert_eq!(localizer.translate("cart.items", &params! { "count" => 3 }), "three items");
/// assert_eq!(localizer.translate("cart.missing", &params! {}), "[cart.missing]");
/// ```
#[derive(Debug, Builder)]
pub struct Localizer {
    /// Formatters every newly defined locale starts from.
    #[builder(default = FormatterRegistry::with_defaults())]
    formatters: FormatterRegistry,

    /// Formatter settings every newly defined locale starts from.
    #[builder(default = FormatterSettings::defaults())]
    settings: FormatterSettings,

    /// Defined locales by key. Entries are replaced, never removed.
    #[builder(skip)]
    locales: BTreeMap<String, LocaleEntry>,

    /// Key of the active locale.
    #[builder(skip)]
    current: Option<String>,

    /// File paths for reload support: locale -> PathBuf.
    /// Only populated for file-loaded locales.
    #[builder(skip)]
    loaded_paths: HashMap<String, PathBuf>,

    /// Compiled ad hoc templates for [`Localizer::render`], keyed by source.
    #[builder(skip)]
    template_cache: Mutex<HashMap<String, Phrase>>,
}

impl Default for Localizer {
    fn default() -> Self {
        Localizer::builder().build()
    }
}

impl Localizer {
    /// Create a localizer with the built-in formatters and settings.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Base Formatters
    // =========================================================================

    /// Formatters that newly defined locales start from.
    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// Formatters that newly defined locales start from (mutable).
    ///
    /// Already defined locales keep their own copy; use
    /// [`Localizer::register_formatter`] to reach them too.
    pub fn formatters_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.formatters
    }

    /// Settings that newly defined locales start from.
    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }

    /// Settings that newly defined locales start from (mutable).
    pub fn settings_mut(&mut self) -> &mut FormatterSettings {
        &mut self.settings
    }

    /// Register a formatter for future locales and every defined locale.
    pub fn register_formatter(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        let name = name.into();
        let shared: Arc<dyn Formatter> = Arc::new(formatter);
        for entry in self.locales.values_mut() {
            entry
                .formatters
                .register_shared(name.clone(), Arc::clone(&shared));
        }
        debug!(formatter = %name, "registered formatter");
        self.formatters.register_shared(name, shared);
    }

    // =========================================================================
    // Definition and Loading
    // =========================================================================

    /// Define a locale from a nested phrase tree.
    ///
    /// Every phrase is compiled now, so malformed placeholders fail here and
    /// not at render time. Redefining a locale replaces it wholesale. The
    /// first defined locale becomes active. Returns the number of phrases.
    pub fn define(&mut self, definition: LocaleDefinition) -> Result<usize, DefineError> {
        let LocaleDefinition {
            phrases,
            locale,
            formatters,
            formatter_settings,
        } = definition;

        let flat = flatten(&locale, &phrases)?;
        let mut compiled = HashMap::with_capacity(flat.len());
        let mut memo: HashMap<&str, Phrase> = HashMap::new();
        for (key, raw) in &flat {
            let phrase = match memo.get(raw.as_str()) {
                Some(phrase) => phrase.clone(),
                None => {
                    let phrase = compile(raw).map_err(|source| DefineError::Parse {
                        locale: locale.clone(),
                        key: key.clone(),
                        source,
                    })?;
                    memo.insert(raw.as_str(), phrase.clone());
                    phrase
                }
            };
            compiled.insert(key.clone(), phrase);
        }

        let mut entry_formatters = self.formatters.clone();
        if let Some(overrides) = &formatters {
            entry_formatters.extend(overrides);
        }
        let mut entry_settings = self.settings.clone();
        if let Some(overrides) = &formatter_settings {
            entry_settings.extend(overrides);
        }

        let count = compiled.len();
        self.locales.insert(
            locale.clone(),
            LocaleEntry {
                phrases: compiled,
                formatters: entry_formatters,
                settings: entry_settings,
            },
        );
        debug!(locale = %locale, phrases = count, "defined locale");

        if self.current.is_none() {
            debug!(locale = %locale, "activated first defined locale");
            self.current = Some(locale);
        }
        Ok(count)
    }

    /// Define a locale from a JSON phrase tree held in a string.
    ///
    /// Locales defined this way cannot be reloaded. A failed definition leaves
    /// the existing locale, and its reload path, untouched.
    pub fn define_json(&mut self, locale: &str, json: &str) -> Result<usize, DefineError> {
        let phrases = serde_json::from_str(json).map_err(|source| DefineError::InlineJson {
            locale: locale.to_string(),
            source,
        })?;
        let count = self.define(
            LocaleDefinition::builder()
                .locale(locale)
                .phrases(phrases)
                .build(),
        )?;
        self.loaded_paths.remove(locale);
        Ok(count)
    }

    /// Load a locale from a JSON phrase file.
    ///
    /// The path is remembered for [`Localizer::reload`].
    pub fn load_file(&mut self, locale: &str, path: impl AsRef<Path>) -> Result<usize, DefineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DefineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let phrases = serde_json::from_str(&content).map_err(|source| DefineError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let count = self.define(
            LocaleDefinition::builder()
                .locale(locale)
                .phrases(phrases)
                .build(),
        )?;
        self.loaded_paths
            .insert(locale.to_string(), path.to_path_buf());
        Ok(count)
    }

    /// Reload a file-loaded locale from its original path.
    ///
    /// Formatter overrides are not carried over; the reloaded locale starts
    /// from the base formatters and settings.
    pub fn reload(&mut self, locale: &str) -> Result<usize, DefineError> {
        let path = self
            .loaded_paths
            .get(locale)
            .cloned()
            .ok_or_else(|| DefineError::NoPathForReload {
                locale: locale.to_string(),
            })?;
        self.load_file(locale, path)
    }

    // =========================================================================
    // Locale Selection
    // =========================================================================

    /// Make `locale` the active locale.
    ///
    /// On error the previously active locale stays active.
    pub fn activate(&mut self, locale: &str) -> Result<(), LocaleNotFoundError> {
        if !self.locales.contains_key(locale) {
            return Err(self.not_found(locale));
        }
        debug!(locale, "activated locale");
        self.current = Some(locale.to_string());
        Ok(())
    }

    /// Key of the active locale, if any locale has been defined.
    pub fn current_locale(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// All defined locale keys, sorted.
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    /// Get a defined locale.
    pub fn entry(&self, locale: &str) -> Option<&LocaleEntry> {
        self.locales.get(locale)
    }

    /// Get a defined locale (mutable).
    pub fn entry_mut(&mut self, locale: &str) -> Option<&mut LocaleEntry> {
        self.locales.get_mut(locale)
    }

    /// The active locale.
    pub fn active(&self) -> Option<&LocaleEntry> {
        self.current
            .as_deref()
            .and_then(|locale| self.locales.get(locale))
    }

    fn not_found(&self, locale: &str) -> LocaleNotFoundError {
        let available: Vec<String> = self.locales.keys().cloned().collect();
        LocaleNotFoundError {
            locale: locale.to_string(),
            suggestions: compute_suggestions(locale, &available),
        }
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Render the phrase at `key` in the active locale.
    ///
    /// Never fails: an unknown key renders as `[key]`, and an unbound
    /// parameter renders as `{{name}}`.
    pub fn translate(&self, key: &str, params: &Params) -> String {
        match self.active() {
            Some(entry) => entry.translate(key, params),
            None => {
                trace!(key, "no active locale");
                missing_key(key)
            }
        }
    }

    /// Render the phrase at `key` in an explicitly chosen locale.
    ///
    /// The active locale is neither consulted nor changed.
    pub fn translate_in(
        &self,
        locale: &str,
        key: &str,
        params: &Params,
    ) -> Result<String, LocaleNotFoundError> {
        let entry = self
            .locales
            .get(locale)
            .ok_or_else(|| self.not_found(locale))?;
        Ok(entry.translate(key, params))
    }

    /// A view that prefixes every key with `prefix.`.
    ///
    /// ```
    /// use phrasekit::{Localizer, params};
    ///
    /// let mut localizer = Localizer::new();
    /// localizer.define_json("en", r#"{"menu": {"file": {"open": "Open"}}}"#).unwrap();
    ///
    /// let menu = localizer.namespaced("menu.file");
    /// assert_eq!(menu.translate("open", &params! {}), "Open");
    /// ```
    pub fn namespaced(&self, prefix: impl Into<String>) -> Namespaced<'_> {
        Namespaced {
            localizer: self,
            prefix: prefix.into(),
        }
    }

    // =========================================================================
    // Ad Hoc Templates
    // =========================================================================

    /// Compile and render a template string against the active locale.
    ///
    /// Without an active locale the base formatters are used. Compiled
    /// templates are cached by source text.
    pub fn render(&self, template: &str, params: &Params) -> Result<String, ParseError> {
        let phrase = self.cached_phrase(template)?;
        let text = match self.active() {
            Some(entry) => render(&phrase, params, &entry.scope()),
            None => render(
                &phrase,
                params,
                &FormatScope::new(&self.formatters, &self.settings),
            ),
        };
        Ok(text)
    }

    /// Clear the ad hoc template cache.
    pub fn clear_template_cache(&self) {
        self.template_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Return the number of cached ad hoc templates.
    pub fn template_cache_len(&self) -> usize {
        self.template_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Look up or compile and cache a template string.
    fn cached_phrase(&self, template: &str) -> Result<Phrase, ParseError> {
        let mut cache = self
            .template_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(phrase) = cache.get(template) {
            return Ok(phrase.clone());
        }
        debug!(template, "compiling ad hoc template");
        let phrase = compile(template)?;
        cache.insert(template.to_string(), phrase.clone());
        Ok(phrase)
    }
}

/// Key-prefixing view over a [`Localizer`], see [`Localizer::namespaced`].
#[derive(Debug, Clone)]
pub struct Namespaced<'a> {
    localizer: &'a Localizer,
    prefix: String,
}

impl Namespaced<'_> {
    /// The prefix prepended to every key.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render `prefix.key` in the active locale.
    pub fn translate(&self, key: &str, params: &Params) -> String {
        self.localizer
            .translate(&format!("{}.{key}", self.prefix), params)
    }
}

fn missing_key(key: &str) -> String {
    format!("[{key}]")
}
