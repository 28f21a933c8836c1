//! Process-wide localizer for the `global-locale` feature.
//!
//! Provides thread-safe access to a shared [`Localizer`] for applications that
//! want one active locale for the whole process. Each call holds the lock for
//! its full duration, so a lookup never observes a half-finished switch.
//! Servers rendering different locales concurrently should use separate
//! [`Localizer`] values instead.

use std::sync::{LazyLock, PoisonError, RwLock};

use crate::interpreter::{DefineError, LocaleDefinition, LocaleNotFoundError, Localizer};
use crate::types::Params;

static GLOBAL_LOCALIZER: LazyLock<RwLock<Localizer>> =
    LazyLock::new(|| RwLock::new(Localizer::new()));

/// Provides read access to the global localizer.
pub fn with_localizer<T>(f: impl FnOnce(&Localizer) -> T) -> T {
    let guard = GLOBAL_LOCALIZER
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Provides write access to the global localizer.
pub fn with_localizer_mut<T>(f: impl FnOnce(&mut Localizer) -> T) -> T {
    let mut guard = GLOBAL_LOCALIZER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Defines a locale on the global localizer.
pub fn define_locale(definition: LocaleDefinition) -> Result<usize, DefineError> {
    with_localizer_mut(|localizer| localizer.define(definition))
}

/// Switches the global active locale.
pub fn activate_locale(locale: &str) -> Result<(), LocaleNotFoundError> {
    with_localizer_mut(|localizer| localizer.activate(locale))
}

/// Returns the global active locale.
pub fn current_locale() -> Option<String> {
    with_localizer(|localizer| localizer.current_locale().map(ToString::to_string))
}

/// Renders a phrase from the global active locale.
pub fn translate(key: &str, params: &Params) -> String {
    with_localizer(|localizer| localizer.translate(key, params))
}
