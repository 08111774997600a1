//! Input sanitization, applied before any rule runs

use crate::core::value::{Input, Value};

/// Sanitize a whole input set.
///
/// String values go through [`clean`]; nested maps are sanitized
/// recursively; numbers, file descriptors and null pass through unchanged.
pub fn sanitize(input: &Input) -> Input {
    input
        .iter()
        .map(|(field, value)| (field.clone(), sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean(s)),
        Value::Map(m) => Value::Map(sanitize(m)),
        other => other.clone(),
    }
}

/// Clean one text value: strip tags, escape markup, trim, strip slashes.
///
/// The steps run in that order, so markup surviving tag removal is escaped
/// and never reaches rule evaluation raw.
pub fn clean(text: &str) -> String {
    let stripped = strip_tags(text);
    let escaped = escape_markup(&stripped);
    strip_slashes(escaped.trim())
}

/// Remove tag regions. A `<` opens a region that runs through the next `>`;
/// an unterminated `<` discards the rest of the string.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '<' {
            for inner in chars.by_ref() {
                if inner == '>' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape markup-significant characters, ampersand included.
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove escape-backslashes: `\x` becomes `x`, `\\` becomes `\`.
/// A trailing lone backslash is dropped.
fn strip_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
