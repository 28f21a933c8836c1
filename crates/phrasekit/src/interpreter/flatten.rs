//! Flattening of nested phrase trees into dot-joined keys.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::interpreter::error::DefineError;

/// Flatten a nested phrase tree.
///
/// Strings are leaves; objects recurse with their keys joined by `.`.
/// Any other value is rejected rather than guessed at.
///
/// ```
/// use phrasekit::interpreter::flatten;
/// use serde_json::json;
///
/// let flat = flatten("en", &json!({"menu": {"open": "Open", "quit": "Quit"}})).unwrap();
/// assert_eq!(flat["menu.open"], "Open");
/// assert_eq!(flat.len(), 2);
/// ```
pub fn flatten(locale: &str, tree: &JsonValue) -> Result<BTreeMap<String, String>, DefineError> {
    let JsonValue::Object(root) = tree else {
        return Err(DefineError::InvalidRoot {
            locale: locale.to_string(),
            kind: kind_of(tree),
        });
    };
    let mut out = BTreeMap::new();
    flatten_into(root, None, &mut out)?;
    Ok(out)
}

fn flatten_into(
    object: &Map<String, JsonValue>,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, String>,
) -> Result<(), DefineError> {
    for (key, value) in object {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            JsonValue::String(text) => {
                out.insert(full_key, text.clone());
            }
            JsonValue::Object(nested) => flatten_into(nested, Some(&full_key), out)?,
            other => {
                return Err(DefineError::InvalidLeaf {
                    key: full_key,
                    kind: kind_of(other),
                });
            }
        }
    }
    Ok(())
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_keys_are_dot_joined() {
        let flat = flatten(
            "en",
            &json!({
                "title": "Home",
                "debugger": {"title": "Debugger", "panel": {"close": "Close"}}
            }),
        )
        .unwrap();
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["debugger.panel.close", "debugger.title", "title"]);
    }

    #[test]
    fn numbers_are_rejected_with_their_key() {
        let err = flatten("en", &json!({"a": {"b": 3}})).unwrap_err();
        match err {
            DefineError::InvalidLeaf { key, kind } => {
                assert_eq!(key, "a.b");
                assert_eq!(kind, "a number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn arrays_are_rejected() {
        assert!(matches!(
            flatten("en", &json!({"list": ["a"]})),
            Err(DefineError::InvalidLeaf { .. })
        ));
    }

    #[test]
    fn root_must_be_object() {
        assert!(matches!(
            flatten("en", &json!("hello")),
            Err(DefineError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn empty_nested_object_produces_no_keys() {
        assert!(flatten("en", &json!({"empty": {}})).unwrap().is_empty());
    }
}
