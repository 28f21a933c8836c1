//! Phrase rendering and locale management.
//!
//! This module holds the resolver that turns compiled templates into text,
//! the phrase-tree flattening used when defining locales, and the
//! [`Localizer`] context that owns locales and the active-locale pointer.

mod error;
mod flatten;
mod locale;
mod resolver;

pub use error::{DefineError, LocaleNotFoundError, compute_suggestions};
pub use flatten::flatten;
pub use locale::{DEFAULT_LOCALE, LocaleDefinition, LocaleEntry, Localizer, Namespaced};
pub use resolver::{render, resolve};
