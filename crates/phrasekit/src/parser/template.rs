//! Placeholder compiler using winnow.
//!
//! Splits phrase text into literal fragments and placeholders. Handles:
//! - `{{ name }}`
//! - `{{ name, formatter }}`
//! - `{{ name, formatter, {"json": "settings"} }}`
//!
//! Anything that opens with `{{` but does not match the placeholder head is
//! kept as literal text.

use std::mem;

use serde_json::{Deserializer, Value as JsonValue};
use winnow::combinator::{opt, peek, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::ast::{CompiledTemplate, Phrase, Placeholder};
use super::error::ParseError;

const OPEN: &str = "{{";

/// Compile raw phrase text.
///
/// Text without `{{` is returned unchanged as [`Phrase::Raw`]. Otherwise the
/// text is split into fragments and placeholders. Only a malformed settings
/// clause fails; malformed names pass through as literal text.
pub fn compile(raw: &str) -> Result<Phrase, ParseError> {
    if !raw.contains(OPEN) {
        return Ok(Phrase::Raw(raw.to_string()));
    }

    let mut fragments = Vec::new();
    let mut placeholders = Vec::new();
    let mut literal = String::new();
    let mut rest = raw;

    while let Some(index) = rest.find(OPEN) {
        literal.push_str(&rest[..index]);
        rest = &rest[index..];

        match placeholder(raw, &mut rest)? {
            Some(found) => {
                fragments.push(mem::take(&mut literal));
                placeholders.push(found);
            }
            None => {
                // Not a placeholder; keep one brace and rescan from the next.
                literal.push('{');
                rest = &rest[1..];
            }
        }
    }

    literal.push_str(rest);
    fragments.push(literal);

    Ok(Phrase::Compiled(CompiledTemplate::new(
        fragments,
        placeholders,
    )))
}

/// Try to read one placeholder at the start of `rest`.
///
/// On success `rest` is advanced past the closing `}}`. Returns `Ok(None)`
/// and leaves `rest` untouched when the text is not a placeholder.
fn placeholder(raw: &str, rest: &mut &str) -> Result<Option<Placeholder>, ParseError> {
    let mut input = *rest;
    let Ok((parameter, formatter)) = placeholder_head.parse_next(&mut input) else {
        return Ok(None);
    };

    let mut settings = None;
    let mut probe = input;
    if formatter.is_some() && settings_start.parse_next(&mut probe).is_ok() {
        let (value, used) = settings_literal(raw, probe)?;
        input = &probe[used..];
        settings = Some(value);
        if closing.parse_next(&mut input).is_err() {
            let (line, column) = calculate_position(raw, input);
            return Err(ParseError::Unclosed {
                phrase: raw.to_string(),
                line,
                column,
            });
        }
    } else if closing.parse_next(&mut input).is_err() {
        return Ok(None);
    }

    *rest = input;
    Ok(Some(Placeholder {
        parameter: parameter.to_string(),
        formatter: formatter.map(ToString::to_string),
        settings,
    }))
}

/// Parse `{{ name` optionally followed by `, formatter`.
fn placeholder_head<'i>(input: &mut &'i str) -> ModalResult<(&'i str, Option<&'i str>)> {
    preceded(
        (OPEN, ws),
        (
            parameter_name,
            opt(preceded((ws, ',', ws), formatter_name)),
        ),
    )
    .parse_next(input)
}

/// Parse the comma introducing a settings clause, stopping at its `{`.
fn settings_start(input: &mut &str) -> ModalResult<()> {
    (ws, ',', ws, peek('{')).void().parse_next(input)
}

/// Parse the closing `}}` with optional leading whitespace.
fn closing(input: &mut &str) -> ModalResult<()> {
    (ws, "}}").void().parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Parse a parameter name (lowercase ASCII letters).
fn parameter_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_lowercase()).parse_next(input)
}

/// Parse a formatter name: a lowercase letter, then any ASCII letters.
///
/// Parameter names stay `[a-z]+`, but formatter names allow uppercase after
/// the first letter so the built-in lowerCamel formatters (`naturalList`,
/// `naturalNumber`, `femaleNaturalNumber`, ...) can be named in templates.
fn formatter_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_lowercase()),
        take_while(0.., |c: char| c.is_ascii_alphabetic()),
    )
        .take()
        .parse_next(input)
}

/// Read exactly one JSON object from the start of `input`.
///
/// Returns the object and the number of bytes it spans. A balanced object is
/// consumed as a whole, so a `}` inside it never closes the placeholder.
fn settings_literal(raw: &str, input: &str) -> Result<(JsonValue, usize), ParseError> {
    let mut stream = Deserializer::from_str(input).into_iter::<JsonValue>();
    match stream.next() {
        Some(Ok(value)) => Ok((value, stream.byte_offset())),
        Some(Err(e)) => {
            let offset = offset_of(input, e.line(), e.column());
            let (line, column) = calculate_position(raw, &input[offset..]);
            Err(ParseError::Settings {
                phrase: raw.to_string(),
                line,
                column,
                message: e.to_string(),
            })
        }
        None => {
            let (line, column) = calculate_position(raw, input);
            Err(ParseError::Settings {
                phrase: raw.to_string(),
                line,
                column,
                message: "expected a settings object".to_string(),
            })
        }
    }
}

/// Convert a 1-based line/column reported by serde_json into a byte offset.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = &text[line_start.min(text.len())..];
    let within = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    line_start + within
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, column)
}
