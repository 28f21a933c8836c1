pub mod formatter;
pub mod interpreter;
pub mod parser;
pub mod types;

#[cfg(feature = "global-locale")]
mod global;

pub use formatter::{FormatScope, Formatter, FormatterRegistry, FormatterSettings};
pub use interpreter::{
    DEFAULT_LOCALE, DefineError, LocaleDefinition, LocaleEntry, LocaleNotFoundError, Localizer,
    Namespaced, compute_suggestions,
};
pub use parser::{CompiledTemplate, ParseError, Phrase, Placeholder, compile};
pub use types::{Params, Settings, Value};

#[cfg(feature = "global-locale")]
pub use global::{
    activate_locale, current_locale, define_locale, translate, with_localizer, with_localizer_mut,
};

/// Creates a [`Params`] map from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, or lists directly.
///
/// # Example
///
/// ```
/// use phrasekit::{params, Value};
///
/// let p = params! { "count" => 3, "name" => "Alice" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["count"].as_number(), Some(3));
/// assert_eq!(p["name"].as_string(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        $crate::Params::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Params::new();
            $(
                map.insert($key.to_string(), ::core::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
