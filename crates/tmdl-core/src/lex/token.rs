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

//! Token types produced by the tokenizer.

use super::scalar::{classify, LiteralKind};
use super::span::SourcePos;
use std::fmt;

/// Language of an embedded expression block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprLanguage {
    /// Data Analysis Expressions (measures, calculated columns).
    Dax,
    /// Power Query M (partition sources, shared expressions).
    M,
}

impl ExprLanguage {
    /// Parse a fence tag such as `dax` or `m` (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "dax" => Some(Self::Dax),
            "m" | "powerquery" => Some(Self::M),
            _ => None,
        }
    }

    /// The fence tag for this language.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Dax => "dax",
            Self::M => "m",
        }
    }
}

impl fmt::Display for ExprLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a scalar literal was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// Unquoted text.
    Bare,
    /// `'single-quoted'` name.
    Single,
    /// `"double-quoted"` string.
    Double,
}

/// A scalar literal with its lexical shape.
///
/// `inferred` is a lexical hint only; typed coercion happens during
/// normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLiteral {
    pub text: String,
    pub quote: QuoteStyle,
    pub inferred: LiteralKind,
}

impl ScalarLiteral {
    pub fn bare(text: impl Into<String>) -> Self {
        let text = text.into();
        let inferred = classify(&text);
        Self {
            text,
            quote: QuoteStyle::Bare,
            inferred,
        }
    }

    pub fn quoted(text: impl Into<String>, quote: QuoteStyle) -> Self {
        Self {
            text: text.into(),
            quote,
            inferred: LiteralKind::Text,
        }
    }

    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.quote != QuoteStyle::Bare
    }
}

/// Punctuation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    Colon,
    Equals,
    Comma,
    /// `-` introducing a list item.
    Dash,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// End of an entry line in block context.
    Newline,
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Colon => ":",
            Self::Equals => "=",
            Self::Comma => ",",
            Self::Dash => "-",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Newline => "end of line",
        }
    }
}

/// Change of indentation relative to the previous entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentChange {
    Same,
    Deeper,
    /// Number of levels closed.
    Shallower(usize),
}

/// Emitted once at the start of every entry line in block context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndentMarker {
    /// Number of leading whitespace characters.
    pub width: usize,
    pub change: IndentChange,
}

/// Raw text captured after `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedBlock {
    pub language: ExprLanguage,
    /// Exact source substring.
    pub text: String,
    /// Whether the block was written between ```` ``` ```` fences.
    pub fenced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Scalar(ScalarLiteral),
    Punct(Punct),
    Indent(IndentMarker),
    Comment(String),
    /// `///` description line.
    Description(String),
    Embedded(EmbeddedBlock),
    Eof,
}

impl TokenKind {
    /// Short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("identifier '{}'", name),
            Self::Scalar(lit) => format!("value '{}'", lit.text),
            Self::Punct(Punct::Newline) => "end of line".to_string(),
            Self::Punct(p) => format!("'{}'", p.as_str()),
            Self::Indent(_) => "indentation".to_string(),
            Self::Comment(_) => "comment".to_string(),
            Self::Description(_) => "description".to_string(),
            Self::Embedded(_) => "expression block".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}

/// A token and the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: SourcePos,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, pos: SourcePos) -> Self {
        Self { kind, pos }
    }

    #[inline]
    pub fn is_punct(&self, punct: Punct) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_tag() {
        assert_eq!(ExprLanguage::from_tag("dax"), Some(ExprLanguage::Dax));
        assert_eq!(ExprLanguage::from_tag("M"), Some(ExprLanguage::M));
        assert_eq!(ExprLanguage::from_tag(" m "), Some(ExprLanguage::M));
        assert_eq!(ExprLanguage::from_tag("sql"), None);
    }

    #[test]
    fn test_bare_literal_infers_kind() {
        assert_eq!(ScalarLiteral::bare("1575").inferred, LiteralKind::Integer);
        assert_eq!(ScalarLiteral::bare("true").inferred, LiteralKind::Boolean);
        assert_eq!(ScalarLiteral::bare("en-US").inferred, LiteralKind::Text);
    }

    #[test]
    fn test_quoted_literal_is_text() {
        let lit = ScalarLiteral::quoted("1575", QuoteStyle::Double);
        assert!(lit.is_quoted());
        assert_eq!(lit.inferred, LiteralKind::Text);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Punct(Punct::Colon).describe(), "':'");
        assert_eq!(
            TokenKind::Identifier("table".into()).describe(),
            "identifier 'table'"
        );
        assert_eq!(TokenKind::Eof.describe(), "end of input");
    }

    #[test]
    fn test_is_punct() {
        let tok = Token::new(TokenKind::Punct(Punct::Comma), SourcePos::start());
        assert!(tok.is_punct(Punct::Comma));
        assert!(!tok.is_punct(Punct::Colon));
    }
}
