//! Struct tag handling: Go string literal unquoting and `key:"value"` lookup.
//!
//! Lookup follows the conventional tag syntax: space-separated `key:"value"`
//! pairs where the value is a double-quoted Go string. Parsing stops at the
//! first malformed pair, so keys after a syntax error are never found.

use std::fmt;

/// Tag key carried over to the generated structs.
pub const DEFAULT_TAG_KEY: &str = "json";

/// The serialization segment of a field tag, e.g. `json:"id,omitempty"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub key: String,
    /// Unquoted value (`id,omitempty`).
    pub value: String,
    /// The `key:"value"` text exactly as written in the source tag.
    pub segment: String,
}

impl TagInfo {
    /// Extract the segment for `key` from a raw tag literal as it appears in
    /// source (including its backquotes or double quotes).
    pub fn from_literal(literal: &str, key: &str) -> Option<TagInfo> {
        let tag = unquote(literal)?;
        lookup(&tag, key)
    }

    /// Go literal to re-emit as a field tag. Raw strings are used unless the
    /// segment itself contains a backquote.
    pub fn to_literal(&self) -> String {
        if self.segment.contains('`') {
            quote(&self.segment)
        } else {
            format!("`{}`", self.segment)
        }
    }
}

impl fmt::Display for TagInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment)
    }
}

/// Find `key` in an unquoted struct tag.
pub fn lookup(tag: &str, key: &str) -> Option<TagInfo> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }
        let bytes = rest.as_bytes();

        let mut i = 0;
        while i < bytes.len()
            && bytes[i] > b' '
            && bytes[i] != b':'
            && bytes[i] != b'"'
            && bytes[i] != 0x7f
        {
            i += 1;
        }
        if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
            return None;
        }
        let name = &rest[..i];

        let open = i + 1;
        let mut close = open + 1;
        while close < bytes.len() && bytes[close] != b'"' {
            if bytes[close] == b'\\' {
                close += 1;
            }
            close += 1;
        }
        if close >= bytes.len() {
            return None;
        }

        if name == key {
            let value = unquote(&rest[open..=close])?;
            return Some(TagInfo {
                key: name.to_string(),
                value,
                segment: rest[..=close].to_string(),
            });
        }
        rest = &rest[close + 1..];
    }
}

/// Unquote a Go string literal: raw (`` `...` ``) or interpreted (`"..."`).
/// Returns `None` for anything that is not a well-formed literal.
pub fn unquote(literal: &str) -> Option<String> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        let body = &literal[1..literal.len() - 1];
        if body.contains('`') {
            return None;
        }
        // Carriage returns are discarded from raw strings.
        return Some(body.replace('\r', ""));
    }
    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return None;
    }
    let body = &literal[1..literal.len() - 1];
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let esc = chars.next()?;
                match esc {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(hex_digits(&mut chars, 2)? as u8),
                    'u' => push_char(&mut out, char::from_u32(hex_digits(&mut chars, 4)?)?),
                    'U' => push_char(&mut out, char::from_u32(hex_digits(&mut chars, 8)?)?),
                    '0'..='7' => {
                        let mut value = esc.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        out.push(u8::try_from(value).ok()?);
                    }
                    _ => return None,
                }
            }
            _ => push_char(&mut out, c),
        }
    }
    String::from_utf8(out).ok()
}

fn hex_digits(chars: &mut std::str::Chars<'_>, n: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..n {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Quote `s` as an interpreted Go string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
