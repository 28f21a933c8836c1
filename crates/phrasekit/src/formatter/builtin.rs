//! Built-in formatters.
//!
//! | name                  | value          | settings                                                   |
//! |-----------------------|----------------|------------------------------------------------------------|
//! | `percent`             | number         | none                                                       |
//! | `number`              | number         | `thousandsSeparator`, `fractionSeparator`, `fractionCount` |
//! | `currency`            | number         | `number` settings plus `symbol`, `symbolPlacement`         |
//! | `naturalNumber`       | number         | `literals` plus `number` settings                          |
//! | `femaleNaturalNumber` | number         | the word for zero                                          |
//! | `maleNaturalNumber`   | number         | the word for zero                                          |
//! | `plural`              | number         | `"singular\|plural"` or `{"forms": "singular\|plural"}`     |
//! | `naturalList`         | list           | `separator`, `finalSeparator`                              |

use serde_json::{Value as JsonValue, json};

use crate::formatter::registry::{FormatScope, FormatterRegistry};
use crate::types::{Settings, Value};

const MAX_FRACTION_DIGITS: usize = 100;

/// Fraction digits that print any `f64` exactly: binary fractions end within
/// 1074 decimal places, and this must also exceed `MAX_FRACTION_DIGITS`.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Register every built-in formatter.
pub fn register_all(registry: &mut FormatterRegistry) {
    registry.register("percent", percent);
    registry.register("number", number);
    registry.register("currency", currency);
    registry.register("naturalNumber", natural_number);
    registry.register("femaleNaturalNumber", gendered_natural_number);
    registry.register("maleNaturalNumber", gendered_natural_number);
    registry.register("plural", plural);
    registry.register("naturalList", natural_list);
}

/// Separators and precision used by [`format_number`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberStyle {
    pub thousands_separator: String,
    pub fraction_separator: String,
    pub fraction_count: usize,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            thousands_separator: ",".to_string(),
            fraction_separator: ".".to_string(),
            fraction_count: 2,
        }
    }
}

impl NumberStyle {
    /// Read a style from `number` settings, falling back to defaults per key.
    pub fn from_settings(settings: &Settings) -> Self {
        let fallback = Self::default();
        Self {
            thousands_separator: str_setting(settings, "thousandsSeparator")
                .map_or(fallback.thousands_separator, ToString::to_string),
            fraction_separator: str_setting(settings, "fractionSeparator")
                .map_or(fallback.fraction_separator, ToString::to_string),
            fraction_count: settings
                .get("fractionCount")
                .and_then(JsonValue::as_u64)
                .map_or(fallback.fraction_count, |n| {
                    usize::try_from(n).unwrap_or(MAX_FRACTION_DIGITS).min(MAX_FRACTION_DIGITS)
                }),
        }
    }
}

/// Format a number with fixed fraction digits and grouped thousands.
///
/// ```
/// use phrasekit::formatter::builtin::{NumberStyle, format_number};
///
/// assert_eq!(format_number(1234.5, &NumberStyle::default()), "1,234.50");
/// ```
pub fn format_number(value: f64, style: &NumberStyle) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }

    let fixed = to_fixed(value, style.fraction_count);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(unsigned) => ("-", unsigned),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut out = String::with_capacity(fixed.len() + integer.len());
    out.push_str(sign);
    let digits = integer.len();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push_str(&style.thousands_separator);
        }
        out.push(digit);
    }
    if style.fraction_count > 0 {
        out.push_str(&style.fraction_separator);
        out.push_str(fraction);
    }
    out
}

/// Fixed-point text for `value` with `digits` fraction digits.
///
/// Exact halves round away from zero; every other value rounds to the
/// nearest decimal. A value stored just below a half, such as `1.45`, is not
/// a half even when `1.45 * 10` rounds to `14.5`.
fn to_fixed(value: f64, digits: usize) -> String {
    let magnitude = value.abs();
    let scale = 10f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    let scaled = magnitude * scale;
    let rounded = if scaled.fract() == 0.5 && is_exact_half(magnitude, digits) {
        scaled.ceil() / scale
    } else {
        magnitude
    };
    let body = format!("{rounded:.digits$}");
    if value < 0.0 { format!("-{body}") } else { body }
}

/// Whether the exact decimal expansion of `magnitude` is `5` followed only by
/// zeros from fraction position `digits` on.
fn is_exact_half(magnitude: f64, digits: usize) -> bool {
    let precision = EXACT_FRACTION_DIGITS;
    let expanded = format!("{magnitude:.precision$}");
    let Some((_, fraction)) = expanded.split_once('.') else {
        return false;
    };
    match fraction.get(digits..).and_then(|tail| tail.strip_prefix('5')) {
        Some(rest) => rest.bytes().all(|b| b == b'0'),
        None => false,
    }
}

fn percent(value: &Value, _settings: &Settings, _scope: &FormatScope<'_>) -> String {
    match value.to_number() {
        Some(n) => format!("{}%", n * 100.0),
        None => format!("{value}%"),
    }
}

fn number(value: &Value, settings: &Settings, _scope: &FormatScope<'_>) -> String {
    match value.to_number() {
        Some(n) => format_number(n, &NumberStyle::from_settings(settings)),
        None => value.to_string(),
    }
}

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    Hidden,
    Before,
    After,
}

impl SymbolPlacement {
    fn from_settings(settings: &Settings) -> Self {
        match settings.get("symbolPlacement") {
            Some(JsonValue::Number(n)) => match n.as_f64() {
                Some(p) if p == 1.0 => SymbolPlacement::Before,
                Some(p) if p == 0.0 => SymbolPlacement::Hidden,
                Some(_) => SymbolPlacement::After,
                None => SymbolPlacement::Hidden,
            },
            Some(JsonValue::String(s)) => match s.as_str() {
                "before" => SymbolPlacement::Before,
                "after" => SymbolPlacement::After,
                _ => SymbolPlacement::Hidden,
            },
            _ => SymbolPlacement::Hidden,
        }
    }
}

fn currency(value: &Value, settings: &Settings, scope: &FormatScope<'_>) -> String {
    let formatted = scope.format("number", value, Some(settings));
    let symbol = str_setting(settings, "symbol").unwrap_or_default();
    if symbol.is_empty() {
        return formatted;
    }
    match SymbolPlacement::from_settings(settings) {
        SymbolPlacement::Hidden => formatted,
        SymbolPlacement::Before => format!("{symbol}{formatted}"),
        SymbolPlacement::After => format!("{formatted}{symbol}"),
    }
}

fn natural_number(value: &Value, settings: &Settings, scope: &FormatScope<'_>) -> String {
    if let Some(literal) = literal_for(value, settings) {
        return literal.to_string();
    }
    scope.format("number", value, Some(settings))
}

/// The non-empty literal configured for a small non-negative integer.
fn literal_for<'s>(value: &Value, settings: &'s Settings) -> Option<&'s str> {
    let index = match value {
        Value::Number(n) => usize::try_from(*n).ok()?,
        Value::Float(f) if f.fract() == 0.0 && *f >= 0.0 => usize::try_from(*f as i64).ok()?,
        _ => return None,
    };
    settings
        .get("literals")?
        .get(index)?
        .as_str()
        .filter(|literal| !literal.is_empty())
}

/// Shared by `femaleNaturalNumber` and `maleNaturalNumber`: replace the word
/// for zero in a copy of the `naturalNumber` defaults.
fn gendered_natural_number(value: &Value, settings: &Settings, scope: &FormatScope<'_>) -> String {
    let zero = match settings {
        JsonValue::String(word) => Some(word.as_str()),
        JsonValue::Object(map) => map.get("zero").and_then(JsonValue::as_str),
        _ => None,
    };

    let mut derived = scope.default_settings("naturalNumber");
    if let (Some(zero), Some(map)) = (zero, derived.as_object_mut()) {
        let literals = map.entry("literals").or_insert_with(|| json!([]));
        if let Some(literals) = literals.as_array_mut() {
            match literals.first_mut() {
                Some(first) => *first = json!(zero),
                None => literals.push(json!(zero)),
            }
        }
    }

    scope.format("naturalNumber", value, Some(&derived))
}

fn plural(value: &Value, settings: &Settings, _scope: &FormatScope<'_>) -> String {
    let forms = match settings {
        JsonValue::String(forms) => Some(forms.as_str()),
        JsonValue::Object(map) => map.get("forms").and_then(JsonValue::as_str),
        _ => None,
    };
    let Some(forms) = forms else {
        return value.to_string();
    };

    let mut parts = forms.split('|');
    let singular = parts.next().unwrap_or_default();
    let plural = parts.next().unwrap_or(singular);
    let chosen = if value.is_one() { singular } else { plural };
    chosen.to_string()
}

fn natural_list(value: &Value, settings: &Settings, _scope: &FormatScope<'_>) -> String {
    let Some(items) = value.as_list() else {
        return value.to_string();
    };
    let separator = str_setting(settings, "separator").unwrap_or(", ");
    let final_separator = str_setting(settings, "finalSeparator").unwrap_or(" and ");

    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, init)) => {
            let head: Vec<String> = init.iter().map(ToString::to_string).collect();
            format!("{}{final_separator}{last}", head.join(separator))
        }
    }
}

fn str_setting<'s>(settings: &'s Settings, key: &str) -> Option<&'s str> {
    settings.get(key).and_then(JsonValue::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_exact_halves_away_from_zero() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(1.125, 2), "1.13");
    }

    #[test]
    fn keeps_inexact_values_below_half() {
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn near_half_rounds_by_stored_value() {
        // 1.45 is stored slightly below 1.45, though 1.45 * 10 == 14.5.
        assert_eq!(to_fixed(1.45, 1), "1.4");
        assert_eq!(to_fixed(-1.45, 1), "-1.4");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert!(is_exact_half(0.125, 2));
        assert!(!is_exact_half(1.45, 1));
    }

    #[test]
    fn groups_long_integers() {
        let style = NumberStyle {
            fraction_count: 0,
            ..NumberStyle::default()
        };
        assert_eq!(format_number(1_234_567.0, &style), "1,234,567");
        assert_eq!(format_number(-123.0, &style), "-123");
        assert_eq!(format_number(-123_456.0, &style), "-123,456");
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert_eq!(format_number(f64::NAN, &NumberStyle::default()), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY, &NumberStyle::default()), "-Infinity");
    }

    #[test]
    fn style_falls_back_per_key() {
        let style = NumberStyle::from_settings(&json!({"thousandsSeparator": "."}));
        assert_eq!(style.thousands_separator, ".");
        assert_eq!(style.fraction_separator, ".");
        assert_eq!(style.fraction_count, 2);
    }

    #[test]
    fn literal_requires_non_negative_integer() {
        let settings = json!({"literals": ["no", "one", ""]});
        assert_eq!(literal_for(&Value::from(1), &settings), Some("one"));
        assert_eq!(literal_for(&Value::from(1.0), &settings), Some("one"));
        assert_eq!(literal_for(&Value::from(1.5), &settings), None);
        assert_eq!(literal_for(&Value::from(-1), &settings), None);
        assert_eq!(literal_for(&Value::from(2), &settings), None);
    }
}
