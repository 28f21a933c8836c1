//! Phrase compiler.
//!
//! Turns raw phrase text into a [`Phrase`]: either the untouched text or a
//! [`CompiledTemplate`] of literal fragments and placeholders.

pub mod ast;
pub mod error;
mod template;

pub use ast::*;
pub use error::ParseError;
pub use template::compile;
