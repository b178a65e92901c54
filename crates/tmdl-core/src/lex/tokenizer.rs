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

//! Lazy tokenizer for TMDL text.
//!
//! The tokenizer runs in two contexts:
//!
//! - **Block context**: every entry line starts with an [`IndentMarker`] and
//!   ends with a `Newline` punctuation token. Whole-line `//` and `#`
//!   comments and `///` descriptions are emitted as their own tokens and do
//!   not take part in nesting. After `:` the rest of the line is one value;
//!   after `=` it is an embedded block captured raw.
//! - **Flow context**: inside `[`/`{` newlines and indentation carry no
//!   meaning and JSON-style values are tokenized until the outermost
//!   delimiter closes.
//!
//! The token stream is an `Iterator<Item = LexResult<Token>>`. It ends after
//! `Eof` or after the first error; there is no mid-line recovery.
//!
//! # Examples
//!
//! ```
//! use tmdl_core::lex::{Tokenizer, TokenKind};
//!
//! let tokens: Vec<_> = Tokenizer::new("name: Sales\n")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert!(matches!(tokens[1].kind, TokenKind::Identifier(ref s) if s == "name"));
//! ```

use super::embedded;
use super::error::{LexError, LexResult};
use super::indent::IndentStack;
use super::reader::SourceReader;
use super::scalar::{is_identifier, scan_double_quoted, scan_single_quoted};
use super::span::SourcePos;
use super::token::{ExprLanguage, Punct, QuoteStyle, ScalarLiteral, Token, TokenKind};
use crate::limits::Limits;
use crate::schema;
use std::collections::VecDeque;

/// Saved tokenizer state; see [`Tokenizer::checkpoint`].
#[derive(Debug, Clone)]
pub struct Checkpoint<'a> {
    state: Tokenizer<'a>,
}

/// Words seen on the current entry line.
#[derive(Debug, Clone, Default)]
struct LineState {
    /// Head words before the first delimiter.
    words: Vec<String>,
    /// Whether `:`, `=`, `-` or a flow opener has been seen.
    delimited: bool,
}

#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    reader: SourceReader<'a>,
    indent: IndentStack,
    /// Open flow delimiters and where they were opened.
    flow: Vec<(char, SourcePos)>,
    line: LineState,
    line_width: usize,
    at_line_start: bool,
    pending: VecDeque<Token>,
    max_flow_depth: usize,
    max_embedded_size: usize,
    done: bool,
}

#[inline]
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ':' | '=' | ',' | '[' | ']' | '{' | '}' | '"' | '\'')
}

#[inline]
fn is_flow_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | ':' | '[' | ']' | '{' | '}' | '"' | '\'')
}

#[inline]
fn is_inline_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Byte offset where a trailing `//` comment starts in a bare value, or the
/// line length. A comment marker must follow whitespace and sit outside
/// quotes.
fn bare_value_end(line: &str) -> usize {
    if memchr::memmem::find(line.as_bytes(), b"//").is_none() {
        return line.len();
    }
    let mut in_single = false;
    let mut in_double = false;
    let mut prev_ws = false;
    for (i, c) in line.char_indices() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '/' if prev_ws && !in_single && !in_double && line[i..].starts_with("//") => {
                return i;
            }
            _ => {}
        }
        prev_ws = c.is_whitespace();
    }
    line.len()
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with default limits.
    pub fn new(text: &'a str) -> Self {
        Self::with_limits(text, &Limits::default())
    }

    pub fn with_limits(text: &'a str, limits: &Limits) -> Self {
        Self {
            reader: SourceReader::new(text),
            indent: IndentStack::new(limits.max_indent_depth),
            flow: Vec::new(),
            line: LineState::default(),
            line_width: 0,
            at_line_start: true,
            pending: VecDeque::new(),
            max_flow_depth: limits.max_flow_depth,
            max_embedded_size: limits.max_embedded_size,
            done: false,
        }
    }

    /// Save the current state. Tokenizing after [`restore`](Self::restore)
    /// yields exactly the tokens produced after the checkpoint was taken.
    pub fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            state: self.clone(),
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        *self = checkpoint.state;
    }

    /// Position of the next unread character.
    pub fn position(&self) -> SourcePos {
        self.reader.pos()
    }

    /// Number of open indentation levels.
    pub fn indent_depth(&self) -> usize {
        self.indent.depth()
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Option<LexResult<Token>> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Some(Ok(tok));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.done = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }

    #[inline]
    fn emit(&mut self, kind: TokenKind, pos: SourcePos) {
        self.pending.push_back(Token::new(kind, pos));
    }

    fn advance(&mut self) -> LexResult<()> {
        if !self.flow.is_empty() {
            self.scan_flow()
        } else if self.at_line_start {
            self.scan_line_start()
        } else {
            self.scan_line_body()
        }
    }

    // ==================== Block context ====================

    fn scan_line_start(&mut self) -> LexResult<()> {
        loop {
            if self.reader.is_eof() {
                let pos = self.reader.pos();
                self.emit(TokenKind::Eof, pos);
                self.done = true;
                return Ok(());
            }

            let line = self.reader.line_rest();
            let content = line.trim_start_matches(is_inline_ws);
            if content.trim().is_empty() {
                self.skip_whole_line(line.len());
                continue;
            }

            let ws = &line[..line.len() - content.len()];
            let line_no = self.reader.pos().line();
            self.reader.advance_to(self.reader.offset() + ws.len());
            let pos = self.reader.pos();

            if let Some(text) = content.strip_prefix("///") {
                let text = text.strip_prefix(' ').unwrap_or(text).trim_end().to_string();
                self.skip_whole_line(content.len());
                self.emit(TokenKind::Description(text), pos);
                return Ok(());
            }
            if let Some(text) = content
                .strip_prefix("//")
                .or_else(|| content.strip_prefix('#'))
            {
                let text = text.trim().to_string();
                self.skip_whole_line(content.len());
                self.emit(TokenKind::Comment(text), pos);
                return Ok(());
            }

            let marker = self.indent.apply(ws, line_no)?;
            self.line_width = marker.width;
            self.line = LineState::default();
            self.at_line_start = false;
            self.emit(TokenKind::Indent(marker), SourcePos::new(line_no, 1));
            return Ok(());
        }
    }

    fn skip_whole_line(&mut self, len: usize) {
        self.reader.advance_to(self.reader.offset() + len);
        self.reader.skip_line_break();
    }

    fn scan_line_body(&mut self) -> LexResult<()> {
        self.reader.skip_inline_ws();
        let pos = self.reader.pos();

        if self.reader.at_line_end() {
            if !self.reader.skip_line_break() {
                self.reader.bump_while(|c| c == '\r');
            }
            self.at_line_start = true;
            self.emit(TokenKind::Punct(Punct::Newline), pos);
            return Ok(());
        }
        if self.reader.starts_with("//") {
            return self.scan_trailing_comment();
        }

        let c = match self.reader.peek() {
            Some(c) => c,
            None => return Ok(()),
        };
        match c {
            ':' => {
                self.reader.bump();
                self.line.delimited = true;
                self.emit(TokenKind::Punct(Punct::Colon), pos);
                self.scan_value()
            }
            '=' => {
                self.reader.bump();
                self.line.delimited = true;
                self.emit(TokenKind::Punct(Punct::Equals), pos);
                self.scan_embedded()
            }
            ',' => {
                self.reader.bump();
                self.emit(TokenKind::Punct(Punct::Comma), pos);
                Ok(())
            }
            '-' if !self.line.delimited
                && self.line.words.is_empty()
                && self.reader.peek_second().map_or(true, char::is_whitespace) =>
            {
                self.reader.bump();
                self.line.delimited = true;
                self.emit(TokenKind::Punct(Punct::Dash), pos);
                self.scan_value()
            }
            '[' | '{' => self.open_flow(c, pos),
            '"' => {
                let text = scan_double_quoted(&mut self.reader)?;
                self.push_word(&text);
                self.emit(
                    TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Double)),
                    pos,
                );
                Ok(())
            }
            '\'' => {
                let text = scan_single_quoted(&mut self.reader)?;
                self.push_word(&text);
                self.emit(
                    TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Single)),
                    pos,
                );
                Ok(())
            }
            _ => {
                let word = self.reader.bump_while(is_word_char);
                if word.is_empty() {
                    return Err(LexError::UnexpectedChar { ch: c, pos });
                }
                self.push_word(word);
                let kind = if is_identifier(word) {
                    TokenKind::Identifier(word.to_string())
                } else {
                    TokenKind::Scalar(ScalarLiteral::bare(word))
                };
                self.emit(kind, pos);
                Ok(())
            }
        }
    }

    fn push_word(&mut self, word: &str) {
        if !self.line.delimited {
            self.line.words.push(word.to_string());
        }
    }

    fn scan_trailing_comment(&mut self) -> LexResult<()> {
        let pos = self.reader.pos();
        let line = self.reader.line_rest();
        let text = line.trim_start_matches('/').trim().to_string();
        self.reader.advance_to(self.reader.offset() + line.len());
        self.emit(TokenKind::Comment(text), pos);
        Ok(())
    }

    /// Scan the value after `:` or `-`.
    fn scan_value(&mut self) -> LexResult<()> {
        self.reader.skip_inline_ws();
        if self.reader.at_line_end() || self.reader.starts_with("//") {
            return Ok(());
        }
        let pos = self.reader.pos();
        match self.reader.peek() {
            Some('"') => {
                let text = scan_double_quoted(&mut self.reader)?;
                self.emit(
                    TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Double)),
                    pos,
                );
                Ok(())
            }
            Some(c @ ('[' | '{')) => self.open_flow(c, pos),
            Some('\'') => {
                // A quoted name is a value only when nothing but a comma or
                // comment follows; otherwise the line is bare text such as
                // `'Sales'[Amount]`.
                let mut lookahead = self.reader.clone();
                if let Ok(text) = scan_single_quoted(&mut lookahead) {
                    if Self::value_ends_here(&lookahead) {
                        self.reader = lookahead;
                        self.emit(
                            TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Single)),
                            pos,
                        );
                        return Ok(());
                    }
                }
                self.scan_bare_value(pos);
                Ok(())
            }
            _ => {
                self.scan_bare_value(pos);
                Ok(())
            }
        }
    }

    fn value_ends_here(reader: &SourceReader<'_>) -> bool {
        let mut r = reader.clone();
        r.skip_inline_ws();
        if r.peek() == Some(',') {
            r.bump();
            r.skip_inline_ws();
        }
        r.at_line_end() || r.starts_with("//")
    }

    /// Bare value text runs to the end of the line or a trailing comment.
    /// A final comma is split off as its own token.
    fn scan_bare_value(&mut self, pos: SourcePos) {
        let line = self.reader.line_rest();
        let raw = line[..bare_value_end(line)].trim_end_matches(is_inline_ws);
        let (text, comma) = match raw.strip_suffix(',') {
            Some(text) => (text.trim_end_matches(is_inline_ws), true),
            None => (raw, false),
        };

        let start = self.reader.offset();
        if !text.is_empty() {
            self.reader.advance_to(start + text.len());
            self.emit(TokenKind::Scalar(ScalarLiteral::bare(text)), pos);
        }
        if comma {
            self.reader.advance_to(start + raw.len() - 1);
            let comma_pos = self.reader.pos();
            self.reader.bump();
            self.emit(TokenKind::Punct(Punct::Comma), comma_pos);
        }
    }

    fn scan_embedded(&mut self) -> LexResult<()> {
        let words = &self.line.words;
        let keyword = words.len().checked_sub(2).map(|i| words[i].as_str());
        let key = if words.len() == 1 {
            Some(words[0].as_str())
        } else {
            None
        };
        let language = if schema::is_m_expression(keyword, key) {
            ExprLanguage::M
        } else {
            ExprLanguage::Dax
        };
        let (block, pos) = embedded::capture(
            &mut self.reader,
            language,
            self.line_width,
            self.max_embedded_size,
        )?;
        self.emit(TokenKind::Embedded(block), pos);
        Ok(())
    }

    // ==================== Flow context ====================

    fn open_flow(&mut self, c: char, pos: SourcePos) -> LexResult<()> {
        let depth = self.flow.len() + 1;
        if depth > self.max_flow_depth {
            return Err(LexError::FlowTooDeep {
                depth,
                max: self.max_flow_depth,
                pos,
            });
        }
        self.reader.bump();
        self.flow.push((c, pos));
        self.line.delimited = true;
        let punct = if c == '[' {
            Punct::LBracket
        } else {
            Punct::LBrace
        };
        self.emit(TokenKind::Punct(punct), pos);
        Ok(())
    }

    fn scan_flow(&mut self) -> LexResult<()> {
        let (open, open_pos) = match self.flow.last() {
            Some(&top) => top,
            None => return Ok(()),
        };
        self.reader.bump_while(char::is_whitespace);
        let pos = self.reader.pos();
        let c = match self.reader.peek() {
            Some(c) => c,
            None => return Err(LexError::UnclosedDelimiter { open, pos: open_pos }),
        };

        if c == '#' || self.reader.starts_with("//") {
            let line = self.reader.line_rest();
            let text = line.trim_start_matches(|c| c == '/' || c == '#').trim().to_string();
            self.reader.advance_to(self.reader.offset() + line.len());
            self.emit(TokenKind::Comment(text), pos);
            return Ok(());
        }

        let kind = match c {
            '[' | '{' => return self.open_flow(c, pos),
            ']' | '}' => {
                let expected = if open == '[' { ']' } else { '}' };
                if c != expected {
                    return Err(LexError::MismatchedDelimiter {
                        expected,
                        found: c,
                        pos,
                    });
                }
                self.reader.bump();
                self.flow.pop();
                TokenKind::Punct(if c == ']' {
                    Punct::RBracket
                } else {
                    Punct::RBrace
                })
            }
            ',' => {
                self.reader.bump();
                TokenKind::Punct(Punct::Comma)
            }
            ':' => {
                self.reader.bump();
                TokenKind::Punct(Punct::Colon)
            }
            '"' => {
                let text = scan_double_quoted(&mut self.reader)?;
                TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Double))
            }
            '\'' => {
                let text = scan_single_quoted(&mut self.reader)?;
                TokenKind::Scalar(ScalarLiteral::quoted(text, QuoteStyle::Single))
            }
            _ => {
                let word = self.reader.bump_while(is_flow_word_char);
                TokenKind::Scalar(ScalarLiteral::bare(word))
            }
        };
        self.emit(kind, pos);
        Ok(())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a whole input eagerly.
pub fn tokenize(text: &str) -> LexResult<Vec<Token>> {
    Tokenizer::new(text).collect()
}
