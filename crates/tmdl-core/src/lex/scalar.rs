// Dweve TMDL - Tabular Model Definition Language
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalar literal scanning and classification.
//!
//! Classification follows a fixed ladder: booleans and `null` by exact
//! spelling, then the integer grammar `-?[0-9]+` (when it fits in `i64`),
//! then the decimal grammar `-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?` (when the
//! value is finite), otherwise text.

use super::error::{LexError, LexResult};
use super::reader::SourceReader;
use super::span::SourcePos;

/// Lexical shape of a bare literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Null,
}

/// Classify bare literal text.
pub fn classify(text: &str) -> LiteralKind {
    match text {
        "true" | "false" => return LiteralKind::Boolean,
        "null" => return LiteralKind::Null,
        _ => {}
    }
    if is_integer_grammar(text) {
        if text.parse::<i64>().is_ok() {
            return LiteralKind::Integer;
        }
        // Integer overflow falls through to the decimal rule
    }
    if is_decimal_grammar(text) && parse_finite_f64(text).is_some() {
        return LiteralKind::Decimal;
    }
    LiteralKind::Text
}

/// Parse text as a finite `f64`.
pub fn parse_finite_f64(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// `-?[0-9]+`
pub fn is_integer_grammar(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?`
pub fn is_decimal_grammar(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i > start
    };
    if !digits(&mut i) {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        if !digits(&mut i) {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        if !digits(&mut i) {
            return false;
        }
    }
    i == bytes.len()
}

#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '.'
}

#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Whether `text` can be written as a bare identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Scan a `"double-quoted"` string starting at the opening quote.
///
/// Accepts doubled quotes (`""`) and JSON backslash escapes. Unknown
/// escapes and unpaired surrogates are kept literally. A string may not
/// span lines.
pub fn scan_double_quoted(reader: &mut SourceReader<'_>) -> LexResult<String> {
    let open = reader.pos();
    reader.bump();
    let mut out = String::new();
    loop {
        match reader.bump() {
            None | Some('\n') => return Err(LexError::UnclosedQuote { pos: open }),
            Some('"') => {
                if reader.peek() == Some('"') {
                    reader.bump();
                    out.push('"');
                } else {
                    return Ok(out);
                }
            }
            Some('\\') => scan_escape(reader, &mut out, open)?,
            Some(c) => out.push(c),
        }
    }
}

fn scan_escape(
    reader: &mut SourceReader<'_>,
    out: &mut String,
    open: SourcePos,
) -> LexResult<()> {
    let c = match reader.bump() {
        None | Some('\n') => return Err(LexError::UnclosedQuote { pos: open }),
        Some(c) => c,
    };
    match c {
        '"' => out.push('"'),
        '\\' => out.push('\\'),
        '/' => out.push('/'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'u' => scan_unicode_escape(reader, out),
        other => {
            out.push('\\');
            out.push(other);
        }
    }
    Ok(())
}

fn read_hex4(reader: &mut SourceReader<'_>) -> Option<u32> {
    let rest = reader.rest();
    let hex = rest.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let code = u32::from_str_radix(hex, 16).ok()?;
    for _ in 0..4 {
        reader.bump();
    }
    Some(code)
}

fn scan_unicode_escape(reader: &mut SourceReader<'_>, out: &mut String) {
    let Some(code) = read_hex4(reader) else {
        out.push_str("\\u");
        return;
    };
    if (0xD800..0xDC00).contains(&code) && reader.starts_with("\\u") {
        let mut lookahead = reader.clone();
        lookahead.bump();
        lookahead.bump();
        if let Some(low) = read_hex4(&mut lookahead) {
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                if let Some(c) = char::from_u32(combined) {
                    *reader = lookahead;
                    out.push(c);
                    return;
                }
            }
        }
    }
    match char::from_u32(code) {
        Some(c) => out.push(c),
        None => out.push_str(&format!("\\u{:04x}", code)),
    }
}

/// Scan a `'single-quoted'` name starting at the opening quote.
///
/// A doubled quote (`''`) stands for one quote character.
pub fn scan_single_quoted(reader: &mut SourceReader<'_>) -> LexResult<String> {
    let open = reader.pos();
    reader.bump();
    let mut out = String::new();
    loop {
        match reader.bump() {
            None | Some('\n') => return Err(LexError::UnclosedQuote { pos: open }),
            Some('\'') => {
                if reader.peek() == Some('\'') {
                    reader.bump();
                    out.push('\'');
                } else {
                    return Ok(out);
                }
            }
            Some(c) => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_double(text: &str) -> LexResult<String> {
        scan_double_quoted(&mut SourceReader::new(text))
    }

    // ==================== Classification ====================

    #[test]
    fn test_classify_ladder() {
        assert_eq!(classify("true"), LiteralKind::Boolean);
        assert_eq!(classify("False"), LiteralKind::Text);
        assert_eq!(classify("null"), LiteralKind::Null);
        assert_eq!(classify("1575"), LiteralKind::Integer);
        assert_eq!(classify("-42"), LiteralKind::Integer);
        assert_eq!(classify("3.25"), LiteralKind::Decimal);
        assert_eq!(classify("1e5"), LiteralKind::Decimal);
        assert_eq!(classify("2.103.661.0"), LiteralKind::Text);
        assert_eq!(classify("1."), LiteralKind::Text);
        assert_eq!(classify(".5"), LiteralKind::Text);
        assert_eq!(classify(""), LiteralKind::Text);
    }

    #[test]
    fn test_integer_overflow_becomes_decimal() {
        assert_eq!(classify("18446744073709551616"), LiteralKind::Decimal);
    }

    #[test]
    fn test_infinite_decimal_is_text() {
        assert_eq!(classify("1e400"), LiteralKind::Text);
    }

    // ==================== Identifiers ====================

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("table"));
        assert!(is_identifier("PBI_QueryOrder"));
        assert!(is_identifier("Sales.Amount"));
        assert!(is_identifier("en-US"));
        assert!(!is_identifier("1575"));
        assert!(!is_identifier("Sales Order"));
        assert!(!is_identifier(""));
    }

    // ==================== Quoted strings ====================

    #[test]
    fn test_double_quoted_plain() {
        assert_eq!(scan_double("\"hello\" rest").unwrap(), "hello");
    }

    #[test]
    fn test_double_quoted_doubled_quote() {
        assert_eq!(scan_double("\"say \"\"hi\"\"\"").unwrap(), "say \"hi\"");
    }

    #[test]
    fn test_double_quoted_empty_before_comma() {
        assert_eq!(scan_double("\"\",\"x\"").unwrap(), "");
    }

    #[test]
    fn test_double_quoted_json_escapes() {
        assert_eq!(scan_double(r#""a\nb\t\"c\"\\""#).unwrap(), "a\nb\t\"c\"\\");
        assert_eq!(scan_double(r#""caf\u00e9""#).unwrap(), "café");
        assert_eq!(scan_double(r#""\ud83d\ude00""#).unwrap(), "😀");
    }

    #[test]
    fn test_double_quoted_unknown_escape_kept() {
        assert_eq!(scan_double(r#""C:\path""#).unwrap(), "C:\\path");
    }

    #[test]
    fn test_double_quoted_unclosed() {
        let err = scan_double("\"open\nnext").unwrap_err();
        assert!(matches!(err, LexError::UnclosedQuote { .. }));
    }

    #[test]
    fn test_single_quoted_with_escape() {
        let mut reader = SourceReader::new("'Customer''s Orders' x");
        assert_eq!(scan_single_quoted(&mut reader).unwrap(), "Customer's Orders");
        assert_eq!(reader.rest(), " x");
    }
}
