//! Default settings per formatter and the merge rule for inline overrides.

use std::collections::HashMap;

use serde_json::{Map, json};

use crate::types::Settings;

/// Default settings for each formatter, keyed by formatter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatterSettings {
    settings: HashMap<String, Settings>,
}

impl FormatterSettings {
    /// Create an empty settings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The settings used by the built-in formatters.
    ///
    /// ```
    /// use phrasekit::FormatterSettings;
    ///
    /// let defaults = FormatterSettings::defaults();
    /// assert_eq!(defaults.get("number").unwrap()["fractionCount"], 2);
    /// ```
    pub fn defaults() -> Self {
        let mut table = Self::new();
        table.set(
            "number",
            json!({
                "thousandsSeparator": ",",
                "fractionSeparator": ".",
                "fractionCount": 2
            }),
        );
        table.set(
            "currency",
            json!({
                "symbol": "$",
                "symbolPlacement": 1,
                "fractionCount": 2
            }),
        );
        table.set(
            "naturalNumber",
            json!({
                "literals": [
                    "no", "one", "two", "three", "four",
                    "five", "six", "seven", "eight", "nine"
                ],
                "fractionCount": 0
            }),
        );
        table.set("femaleNaturalNumber", json!("no"));
        table.set("maleNaturalNumber", json!("no"));
        table.set(
            "naturalList",
            json!({
                "separator": ", ",
                "finalSeparator": " and "
            }),
        );
        table
    }

    /// Get the settings for a formatter.
    pub fn get(&self, formatter: &str) -> Option<&Settings> {
        self.settings.get(formatter)
    }

    /// Set the settings for a formatter, replacing previous ones.
    pub fn set(&mut self, formatter: impl Into<String>, settings: Settings) {
        self.settings.insert(formatter.into(), settings);
    }

    /// Replace entries with those of `other`. Whole per-formatter values are
    /// replaced, not merged.
    pub fn extend(&mut self, other: &FormatterSettings) {
        self.settings.extend(
            other
                .settings
                .iter()
                .map(|(name, settings)| (name.clone(), settings.clone())),
        );
    }

    /// Formatter names with settings, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.settings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a table from a JSON object of `name -> settings`.
    ///
    /// Returns `None` if `json` is not an object.
    pub fn from_json(json: &Settings) -> Option<Self> {
        let object = json.as_object()?;
        Some(Self {
            settings: object
                .iter()
                .map(|(name, settings)| (name.clone(), settings.clone()))
                .collect(),
        })
    }
}

/// Combine a formatter's default settings with inline placeholder settings.
///
/// Two objects are merged shallowly with `inline` winning on key conflicts.
/// Otherwise whichever side is present is used, `inline` first.
pub fn merge_settings(defaults: Option<&Settings>, inline: Option<&Settings>) -> Settings {
    match (defaults, inline) {
        (Some(Settings::Object(base)), Some(Settings::Object(overrides))) => {
            let mut merged = base.clone();
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            Settings::Object(merged)
        }
        (_, Some(inline)) => inline.clone(),
        (Some(defaults), None) => defaults.clone(),
        (None, None) => Settings::Object(Map::new()),
    }
}
