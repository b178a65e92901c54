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

//! Position-tracked reader over source text.
//!
//! The reader is a cursor over a borrowed `&str`. It tracks the byte offset
//! and the 1-based line/column of the next character, and hands out slices
//! of the original text so that embedded blocks can be captured without
//! copying or re-encoding.

use super::span::SourcePos;

/// Byte offset of the end of the line containing `offset` (the position of
/// its `\n`, or the end of the text).
#[inline]
pub(crate) fn line_end(text: &str, offset: usize) -> usize {
    match memchr::memchr(b'\n', &text.as_bytes()[offset..]) {
        Some(i) => offset + i,
        None => text.len(),
    }
}

/// A cursor over source text that tracks line and column.
#[derive(Debug, Clone)]
pub struct SourceReader<'a> {
    text: &'a str,
    offset: usize,
    pos: SourcePos,
}

impl<'a> SourceReader<'a> {
    /// Create a reader positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            pos: SourcePos::start(),
        }
    }

    /// The full source text.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Position of the next character.
    #[inline]
    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Unread text.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the next one.
    #[inline]
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume one character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.pos.next_line();
        } else {
            self.pos.advance_col();
        }
        Some(c)
    }

    /// Consume characters while `pred` holds and return them as a slice.
    pub fn bump_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.text[start..self.offset]
    }

    /// Consume characters until the byte offset `target` is reached.
    pub fn advance_to(&mut self, target: usize) {
        while self.offset < target && self.bump().is_some() {}
    }

    /// Skip spaces and tabs.
    pub fn skip_inline_ws(&mut self) {
        self.bump_while(|c| c == ' ' || c == '\t');
    }

    /// Remainder of the current line, excluding the line break (and a
    /// carriage return before it).
    pub fn line_rest(&self) -> &'a str {
        let end = line_end(self.text, self.offset);
        let line = &self.text[self.offset..end];
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// True at the end of input or before a line break.
    pub fn at_line_end(&self) -> bool {
        match self.peek() {
            None | Some('\n') => true,
            Some('\r') => matches!(self.peek_second(), None | Some('\n')),
            _ => false,
        }
    }

    /// Consume a `\n` or `\r\n` line break. Returns false if there is none.
    pub fn skip_line_break(&mut self) -> bool {
        if self.starts_with("\r\n") {
            self.bump();
            self.bump();
            true
        } else if self.starts_with("\n") {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Slice of the source between two byte offsets.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }
}
