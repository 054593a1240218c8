//! String Escaper
//!
//! Neutralizes HTML-significant characters in untrusted text so it can be
//! rendered without being interpreted as markup.

use serde_json::Value;

/// Characters that are replaced, with their entity.
const ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
];

#[inline]
fn entity_for(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '/' => Some("&#x2F;"),
        _ => None,
    }
}

/// Escape a string for safe HTML embedding.
///
/// - Removes every NUL character
/// - Replaces `& < > " ' /` with their HTML entities
///
/// The input is scanned once, left to right, and substituted output is never
/// rescanned. Applying the function twice escapes twice: `&` becomes `&amp;`
/// and then `&amp;amp;`.
pub fn escape_str(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '\0' => {}
            c => match entity_for(c) {
                Some(entity) => output.push_str(entity),
                None => output.push(c),
            },
        }
    }

    output
}

/// Escape a JSON value if it is a string.
///
/// Numbers, booleans, null, arrays and objects are returned unchanged.
pub fn sanitize_string(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_str(s)),
        other => other.clone(),
    }
}

/// Reverse [`escape_str`] for display.
///
/// Only the six entities produced by the escaper are recognized; anything
/// else starting with `&` is copied through. Single pass, so `&amp;lt;`
/// decodes to `&lt;` and not `<`.
pub fn unescape_str(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        output.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match ENTITIES.iter().find(|(_, entity)| tail.starts_with(entity)) {
            Some((c, entity)) => {
                output.push(*c);
                rest = &tail[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
