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

//! Error types for lexical analysis.

use thiserror::Error;

pub use crate::lex::span::SourcePos;

/// Error raised by the tokenizer.
///
/// Every variant carries the position of the offending input; the tokenizer
/// never recovers mid-line, so the first error ends the token stream.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LexError {
    // ==================== Indentation errors ====================
    /// Tabs and spaces mixed within one line's indentation.
    #[error("line {}, column {}: indentation mixes tabs and spaces", .pos.line(), .pos.column())]
    MixedIndentation { pos: SourcePos },

    /// Line indented with a different character than the rest of the document.
    #[error("line {}, column {}: inconsistent indentation: expected {}", .pos.line(), .pos.column(), .expected)]
    InconsistentIndentation { expected: &'static str, pos: SourcePos },

    /// Dedent to a width that matches no open indentation level.
    #[error("line {}, column {}: ambiguous dedent: width {} matches no enclosing level", .pos.line(), .pos.column(), .width)]
    AmbiguousDedent { width: usize, pos: SourcePos },

    // ==================== String/delimiter errors ====================
    /// Unclosed quoted string or name.
    #[error("line {}, column {}: unclosed quoted string", .pos.line(), .pos.column())]
    UnclosedQuote { pos: SourcePos },

    /// Closing delimiter does not match the innermost open one.
    #[error("line {}, column {}: mismatched delimiter: expected '{}', found '{}'", .pos.line(), .pos.column(), .expected, .found)]
    MismatchedDelimiter {
        expected: char,
        found: char,
        pos: SourcePos,
    },

    /// Input ended inside a `[` or `{` value.
    #[error("line {}, column {}: unclosed '{}'", .pos.line(), .pos.column(), .open)]
    UnclosedDelimiter { open: char, pos: SourcePos },

    /// Character that cannot start a token here.
    #[error("line {}, column {}: unexpected character '{}'", .pos.line(), .pos.column(), .ch)]
    UnexpectedChar { ch: char, pos: SourcePos },

    // ==================== Embedded block errors ====================
    /// Fenced block without a closing fence.
    #[error("line {}, column {}: unterminated fenced block", .pos.line(), .pos.column())]
    UnterminatedFence { pos: SourcePos },

    /// `=` with nothing after it and no deeper lines to capture.
    #[error("line {}, column {}: empty expression block", .pos.line(), .pos.column())]
    EmptyEmbeddedBlock { pos: SourcePos },

    // ==================== Resource limit errors ====================
    /// Indentation too deep.
    #[error("line {}, column {}: indent depth {} exceeds maximum {}", .pos.line(), .pos.column(), .depth, .max)]
    IndentTooDeep {
        depth: usize,
        max: usize,
        pos: SourcePos,
    },

    /// Flow values nested too deep.
    #[error("line {}, column {}: flow nesting depth {} exceeds maximum {}", .pos.line(), .pos.column(), .depth, .max)]
    FlowTooDeep {
        depth: usize,
        max: usize,
        pos: SourcePos,
    },

    /// Embedded block too large.
    #[error("line {}, column {}: embedded block of {} bytes exceeds maximum {}", .pos.line(), .pos.column(), .size, .max)]
    EmbeddedTooLarge {
        size: usize,
        max: usize,
        pos: SourcePos,
    },

    /// Line too long.
    #[error("line {}, column {}: line length {} exceeds maximum {}", .pos.line(), .pos.column(), .length, .max)]
    LineTooLong {
        length: usize,
        max: usize,
        pos: SourcePos,
    },
}

impl LexError {
    /// Get the position where this error occurred.
    pub fn position(&self) -> SourcePos {
        match self {
            Self::MixedIndentation { pos }
            | Self::InconsistentIndentation { pos, .. }
            | Self::AmbiguousDedent { pos, .. }
            | Self::UnclosedQuote { pos }
            | Self::MismatchedDelimiter { pos, .. }
            | Self::UnclosedDelimiter { pos, .. }
            | Self::UnexpectedChar { pos, .. }
            | Self::UnterminatedFence { pos }
            | Self::EmptyEmbeddedBlock { pos }
            | Self::IndentTooDeep { pos, .. }
            | Self::FlowTooDeep { pos, .. }
            | Self::EmbeddedTooLarge { pos, .. }
            | Self::LineTooLong { pos, .. } => *pos,
        }
    }

    /// Check if this is a resource limit error.
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            Self::IndentTooDeep { .. }
                | Self::FlowTooDeep { .. }
                | Self::EmbeddedTooLarge { .. }
                | Self::LineTooLong { .. }
        )
    }

    /// The error message without its leading position.
    pub fn detail(&self) -> String {
        let full = self.to_string();
        match full.split_once(": ") {
            Some((_, detail)) => detail.to_string(),
            None => full,
        }
    }
}

/// Result type for lexer operations.
pub type LexResult<T> = Result<T, LexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = LexError::UnclosedQuote {
            pos: SourcePos::new(3, 9),
        };
        assert_eq!(err.to_string(), "line 3, column 9: unclosed quoted string");
    }

    #[test]
    fn test_detail_strips_position() {
        let err = LexError::AmbiguousDedent {
            width: 3,
            pos: SourcePos::new(7, 1),
        };
        assert_eq!(
            err.detail(),
            "ambiguous dedent: width 3 matches no enclosing level"
        );
    }

    #[test]
    fn test_position() {
        let err = LexError::MismatchedDelimiter {
            expected: ']',
            found: '}',
            pos: SourcePos::new(2, 5),
        };
        assert_eq!(err.position(), SourcePos::new(2, 5));
    }

    #[test]
    fn test_resource_limit_classification() {
        let pos = SourcePos::start();
        assert!(LexError::FlowTooDeep { depth: 3, max: 2, pos }.is_resource_limit());
        assert!(LexError::LineTooLong { length: 9, max: 8, pos }.is_resource_limit());
        assert!(!LexError::MixedIndentation { pos }.is_resource_limit());
        assert!(!LexError::UnterminatedFence { pos }.is_resource_limit());
    }
}
