//! Integration tests for Localizer management.

use std::io::{Seek, Write};

use phrasekit::{
    DEFAULT_LOCALE, DefineError, FormatScope, FormatterRegistry, FormatterSettings,
    LocaleDefinition, LocaleNotFoundError, Localizer, Settings, Value, params,
};
use serde_json::json;
use tempfile::NamedTempFile;

fn english() -> LocaleDefinition {
    LocaleDefinition::builder()
        .locale("en")
        .phrases(json!({
            "greeting": "Hello {{name}}!",
            "plain": "Nothing to fill in",
            "cart": {
                "total": "Total: {{amount, currency}}",
                "items": "{{count, naturalNumber}} {{count, plural, {\"forms\": \"item|items\"}}}"
            }
        }))
        .build()
}

fn german() -> LocaleDefinition {
    LocaleDefinition::builder()
        .locale("de")
        .phrases(json!({
            "greeting": "Hallo {{name}}!",
            "cart": {"total": "Summe: {{amount, currency}}"}
        }))
        .formatter_settings({
            let mut settings = FormatterSettings::new();
            settings.set(
                "number",
                json!({"thousandsSeparator": ".", "fractionSeparator": ",", "fractionCount": 2}),
            );
            settings.set("currency", json!({"symbol": " €", "symbolPlacement": 2}));
            settings
        })
        .build()
}

fn localizer() -> Localizer {
    let mut localizer = Localizer::new();
    localizer.define(english()).unwrap();
    localizer.define(german()).unwrap();
    localizer
}

// =========================================================================
// Definition
// =========================================================================

#[test]
fn new_localizer_has_no_locale() {
    let localizer = Localizer::new();
    assert_eq!(localizer.current_locale(), None);
    assert!(localizer.locales().is_empty());
}

#[test]
fn define_returns_phrase_count() {
    let mut localizer = Localizer::new();
    assert_eq!(localizer.define(english()).unwrap(), 4);
}

#[test]
fn first_definition_activates_locale() {
    let localizer = localizer();
    assert_eq!(localizer.current_locale(), Some("en"));
    assert_eq!(localizer.locales(), vec!["de", "en"]);
}

#[test]
fn definition_without_locale_uses_default_key() {
    let mut localizer = Localizer::new();
    localizer
        .define(LocaleDefinition::builder().phrases(json!({"a": "b"})).build())
        .unwrap();
    assert_eq!(localizer.current_locale(), Some(DEFAULT_LOCALE));
    assert_eq!(localizer.current_locale(), Some("default"));
}

#[test]
fn nested_keys_are_flattened() {
    let localizer = localizer();
    let entry = localizer.entry("en").unwrap();
    assert_eq!(entry.keys(), vec!["cart.items", "cart.total", "greeting", "plain"]);
    assert!(!entry.get("plain").unwrap().is_compiled());
    assert!(entry.get("greeting").unwrap().is_compiled());
}

#[test]
fn redefining_replaces_locale() {
    let mut localizer = localizer();
    localizer
        .define(
            LocaleDefinition::builder()
                .locale("en")
                .phrases(json!({"bye": "Goodbye"}))
                .build(),
        )
        .unwrap();
    assert_eq!(localizer.translate("bye", &params! {}), "Goodbye");
    assert_eq!(localizer.translate("plain", &params! {}), "[plain]");
}

#[test]
fn malformed_settings_fail_definition() {
    let mut localizer = Localizer::new();
    let err = localizer
        .define(
            LocaleDefinition::builder()
                .locale("en")
                .phrases(json!({"bad": {"phrase": "{{ n, number, {oops} }}"}}))
                .build(),
        )
        .unwrap_err();
    match err {
        DefineError::Parse { locale, key, .. } => {
            assert_eq!(locale, "en");
            assert_eq!(key, "bad.phrase");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(localizer.current_locale(), None);
    assert!(localizer.entry("en").is_none());
}

#[test]
fn non_string_leaf_fails_definition() {
    let mut localizer = Localizer::new();
    let err = localizer
        .define(
            LocaleDefinition::builder()
                .phrases(json!({"count": 3}))
                .build(),
        )
        .unwrap_err();
    assert!(matches!(err, DefineError::InvalidLeaf { ref key, .. } if key == "count"));
}

// =========================================================================
// Activation
// =========================================================================

#[test]
fn activate_switches_phrases_and_formatters() {
    let mut localizer = localizer();
    let params = params! { "name" => "Ada", "amount" => 1234.5 };
    assert_eq!(localizer.translate("greeting", &params), "Hello Ada!");
    assert_eq!(localizer.translate("cart.total", &params), "Total: $1,234.50");

    localizer.activate("de").unwrap();
    assert_eq!(localizer.current_locale(), Some("de"));
    assert_eq!(localizer.translate("greeting", &params), "Hallo Ada!");
    assert_eq!(localizer.translate("cart.total", &params), "Summe: 1.234,50 €");
}

#[test]
fn activating_unknown_locale_keeps_previous() {
    let mut localizer = localizer();
    localizer.activate("de").unwrap();

    let err = localizer.activate("fr").unwrap_err();
    assert_eq!(err.locale, "fr");
    assert_eq!(localizer.current_locale(), Some("de"));
    assert_eq!(localizer.translate("greeting", &params! { "name" => "Ada" }), "Hallo Ada!");
}

#[test]
fn not_found_error_suggests_close_keys() {
    let localizer_err = localizer().activate("dd").unwrap_err();
    assert_eq!(
        localizer_err,
        LocaleNotFoundError {
            locale: "dd".to_string(),
            suggestions: vec!["de".to_string()],
        }
    );
}

#[test]
fn later_definition_does_not_steal_activation() {
    let mut localizer = localizer();
    localizer
        .define(
            LocaleDefinition::builder()
                .locale("fr")
                .phrases(json!({"greeting": "Bonjour {{name}} !"}))
                .build(),
        )
        .unwrap();
    assert_eq!(localizer.current_locale(), Some("en"));
}

// =========================================================================
// Translation
// =========================================================================

#[test]
fn missing_key_is_bracketed() {
    let mut localizer = localizer();
    assert_eq!(localizer.translate("missing.key", &params! {}), "[missing.key]");
    localizer.activate("de").unwrap();
    assert_eq!(localizer.translate("missing.key", &params! {}), "[missing.key]");
}

#[test]
fn missing_key_without_any_locale_is_bracketed() {
    assert_eq!(Localizer::new().translate("a.b", &params! {}), "[a.b]");
}

#[test]
fn raw_phrase_ignores_parameters() {
    let localizer = localizer();
    assert_eq!(localizer.translate("plain", &params! { "x" => 1 }), "Nothing to fill in");
}

#[test]
fn unbound_parameter_is_visible() {
    let localizer = localizer();
    assert_eq!(localizer.translate("greeting", &params! {}), "Hello {{name}}!");
}

#[test]
fn builtin_formatters_render_in_phrases() {
    let localizer = localizer();
    assert_eq!(localizer.translate("cart.items", &params! { "count" => 1 }), "one item");
    assert_eq!(localizer.translate("cart.items", &params! { "count" => 0 }), "no items");
    assert_eq!(localizer.translate("cart.items", &params! { "count" => 12 }), "12 items");
}

#[test]
fn translate_in_uses_explicit_locale() {
    let localizer = localizer();
    let params = params! { "name" => "Ada" };
    assert_eq!(localizer.translate_in("de", "greeting", &params).unwrap(), "Hallo Ada!");
    assert_eq!(localizer.current_locale(), Some("en"));
    assert!(localizer.translate_in("xx", "greeting", &params).is_err());
}

#[test]
fn namespaced_prefixes_keys() {
    let localizer = localizer();
    let cart = localizer.namespaced("cart");
    assert_eq!(cart.prefix(), "cart");
    assert_eq!(cart.translate("total", &params! { "amount" => 3 }), "Total: $3.00");
    assert_eq!(cart.translate("nope", &params! {}), "[cart.nope]");
}

// =========================================================================
// Formatters per locale
// =========================================================================

#[test]
fn locale_formatter_overrides_stay_local() {
    let mut shout = FormatterRegistry::new();
    shout.register("number", |value: &Value, _: &Settings, _: &FormatScope<'_>| {
        format!("#{value}")
    });

    let mut localizer = localizer();
    localizer
        .define(
            LocaleDefinition::builder()
                .locale("xx")
                .phrases(json!({"n": "{{n, number}}"}))
                .formatters(shout)
                .build(),
        )
        .unwrap();
    localizer
        .define(
            LocaleDefinition::builder()
                .locale("yy")
                .phrases(json!({"n": "{{n, number}}"}))
                .build(),
        )
        .unwrap();

    assert_eq!(localizer.translate_in("xx", "n", &params! { "n" => 5 }).unwrap(), "#5");
    assert_eq!(localizer.translate_in("yy", "n", &params! { "n" => 5 }).unwrap(), "5.00");
}

#[test]
fn register_formatter_reaches_defined_and_future_locales() {
    let mut localizer = localizer();
    localizer.register_formatter("upper", |value: &Value, _: &Settings, _: &FormatScope<'_>| {
        value.to_string().to_uppercase()
    });
    localizer
        .define(
            LocaleDefinition::builder()
                .locale("later")
                .phrases(json!({"u": "{{v, upper}}"}))
                .build(),
        )
        .unwrap();

    assert!(localizer.entry("en").unwrap().formatters().contains("upper"));
    assert_eq!(localizer.translate_in("later", "u", &params! { "v" => "hey" }).unwrap(), "HEY");
}

#[test]
fn entry_mut_changes_settings_of_one_locale() {
    let mut localizer = localizer();
    localizer
        .entry_mut("en")
        .unwrap()
        .settings_mut()
        .set("currency", json!({"symbol": "USD ", "symbolPlacement": 1}));
    assert_eq!(
        localizer.translate("cart.total", &params! { "amount" => 2 }),
        "Total: USD 2.00"
    );
}

// =========================================================================
// JSON and file loading
// =========================================================================

#[test]
fn define_json_parses_phrase_tree() {
    let mut localizer = Localizer::new();
    let count = localizer
        .define_json("en", r#"{"a": {"b": "B {{x}}"}, "c": "C"}"#)
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(localizer.translate("a.b", &params! { "x" => 1 }), "B 1");
}

#[test]
fn define_json_reports_invalid_json() {
    let err = Localizer::new().define_json("en", "{not json").unwrap_err();
    assert!(matches!(err, DefineError::InlineJson { ref locale, .. } if locale == "en"));
    assert!(err.to_string().contains("locale 'en'"));
}

#[test]
fn load_file_and_reload() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"title": "First"}}"#).unwrap();
    file.flush().unwrap();

    let mut localizer = Localizer::new();
    localizer.load_file("en", file.path()).unwrap();
    assert_eq!(localizer.translate("title", &params! {}), "First");

    file.as_file_mut().set_len(0).unwrap();
    file.rewind().unwrap();
    write!(file, r#"{{"title": "Second"}}"#).unwrap();
    file.flush().unwrap();

    localizer.reload("en").unwrap();
    assert_eq!(localizer.translate("title", &params! {}), "Second");
}

#[test]
fn failed_redefinition_keeps_reload_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"a": "A"}}"#).unwrap();
    file.flush().unwrap();

    let mut localizer = Localizer::new();
    localizer.load_file("en", file.path()).unwrap();

    let err = localizer.define_json("en", r#"{"a": 1}"#).unwrap_err();
    assert!(matches!(err, DefineError::InvalidLeaf { .. }));
    assert_eq!(localizer.translate("a", &params! {}), "A");
    assert_eq!(localizer.reload("en").unwrap(), 1);
}

#[test]
fn successful_define_json_drops_reload_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"a": "A"}}"#).unwrap();
    file.flush().unwrap();

    let mut localizer = Localizer::new();
    localizer.load_file("en", file.path()).unwrap();
    localizer.define_json("en", r#"{"a": "B"}"#).unwrap();
    assert!(matches!(
        localizer.reload("en"),
        Err(DefineError::NoPathForReload { .. })
    ));
}

#[test]
fn load_missing_file_is_io_error() {
    let err = Localizer::new()
        .load_file("en", "/definitely/not/here.json")
        .unwrap_err();
    assert!(matches!(err, DefineError::Io { .. }));
}

#[test]
fn reload_requires_file_origin() {
    let mut localizer = Localizer::new();
    localizer.define_json("en", r#"{"a": "b"}"#).unwrap();
    assert!(matches!(
        localizer.reload("en"),
        Err(DefineError::NoPathForReload { .. })
    ));
}

// =========================================================================
// Ad hoc templates
// =========================================================================

#[test]
fn render_uses_active_locale_and_caches() {
    let mut localizer = localizer();
    let template = "{{amount, currency}}";
    assert_eq!(localizer.render(template, &params! { "amount" => 10 }).unwrap(), "$10.00");
    localizer.activate("de").unwrap();
    assert_eq!(localizer.render(template, &params! { "amount" => 10 }).unwrap(), "10,00 €");
    assert_eq!(localizer.template_cache_len(), 1);

    localizer.clear_template_cache();
    assert_eq!(localizer.template_cache_len(), 0);
}

#[test]
fn render_without_locale_uses_base_formatters() {
    let localizer = Localizer::new();
    assert_eq!(
        localizer.render("{{n, number}}", &params! { "n" => 1000 }).unwrap(),
        "1,000.00"
    );
}

#[test]
fn render_reports_parse_errors() {
    assert!(Localizer::new().render("{{n, number, {x}}}", &params! {}).is_err());
}

#[test]
fn builder_overrides_base_settings() {
    let mut settings = FormatterSettings::defaults();
    settings.set("number", json!({"fractionCount": 0}));
    let localizer = Localizer::builder().settings(settings).build();
    assert_eq!(
        localizer.render("{{n, number}}", &params! { "n" => 1234.4 }).unwrap(),
        "1,234"
    );
}
