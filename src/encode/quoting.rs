use std::fmt::Write as _;

use crate::constants::{is_keyword, is_structural_char};

/// Decide whether a text token (string value or object key) must be
/// quoted to survive the trip through the lexer unambiguously.
///
/// # Examples
/// ```
/// use toon_codec::needs_quoting;
///
/// assert!(needs_quoting("true", ','));
/// assert!(needs_quoting("007", ','));
/// assert!(needs_quoting("a,b", ','));
/// assert!(!needs_quoting("hello world", ','));
/// ```
pub fn needs_quoting(s: &str, delimiter: char) -> bool {
    needs_quoting_ext(s, delimiter, false)
}

pub(crate) fn needs_quoting_ext(s: &str, delimiter: char, ensure_ascii: bool) -> bool {
    if s.is_empty() {
        return true;
    }
    if is_keyword(s) {
        return true;
    }

    let bytes = s.as_bytes();
    if bytes[0].is_ascii_digit() {
        return true;
    }
    if bytes[0] == b'-' && bytes.len() > 1 && bytes[1].is_ascii_digit() {
        return true;
    }
    if s.starts_with("- ") {
        return true;
    }

    let mut last = '\0';
    for (idx, ch) in s.char_indices() {
        if idx == 0 && ch.is_whitespace() {
            return true;
        }
        if ch == delimiter
            || is_structural_char(ch)
            || matches!(ch, '\n' | '\r' | '\t' | '\\' | '"')
        {
            return true;
        }
        if ensure_ascii && !ch.is_ascii() {
            return true;
        }
        last = ch;
    }
    last.is_whitespace()
}

/// Wrap a token in double quotes, escaping backslash first so later
/// escapes cannot corrupt it, then quote, newline, carriage return, tab.
///
/// # Examples
/// ```
/// use toon_codec::quote_string;
///
/// assert_eq!(quote_string("say \"hi\""), "\"say \\\"hi\\\"\"");
/// assert_eq!(quote_string("line1\nline2"), "\"line1\\nline2\"");
/// ```
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    quote_string_into(&mut out, s, false);
    out
}

pub(crate) fn quote_string_into(out: &mut String, s: &str, ensure_ascii: bool) {
    out.push('"');
    escape_string_into(out, s, ensure_ascii);
    out.push('"');
}

pub(crate) fn escape_string_into(out: &mut String, s: &str, ensure_ascii: bool) {
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ensure_ascii && !ch.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04X}");
                }
            }
            ch => out.push(ch),
        }
    }
}

/// Narrow identifier predicate used only for fold eligibility: ASCII
/// letter or underscore start, then letters, digits, underscores.
/// Distinct from the quoting predicate; do not conflate the two.
pub fn is_safe_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
