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

//! Source positions for tokens, nodes and error reporting.
//!
//! # Examples
//!
//! ```
//! use tmdl_core::lex::SourcePos;
//!
//! let mut pos = SourcePos::new(10, 25);
//! pos.advance_col();
//! assert_eq!(pos.column(), 26);
//! pos.next_line();
//! assert_eq!(pos, SourcePos::new(11, 1));
//! ```

use std::fmt;

/// A position in source text (line and column).
///
/// Lines and columns are 1-indexed; columns count characters, not bytes.
/// Positions order first by line, then by column, which is the order used
/// to check that a parse tree's positions are monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourcePos {
    line: usize,
    column: usize,
}

impl SourcePos {
    /// Creates a new source position.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Creates a position at the start of the input (line 1, column 1).
    #[inline]
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Returns the line number.
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number.
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Advances the position by one column.
    #[inline]
    pub fn advance_col(&mut self) {
        self.column += 1;
    }

    /// Moves to the next line (increments line, resets column to 1).
    #[inline]
    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 1;
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start() {
        let pos = SourcePos::start();
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.column(), 1);
    }

    #[test]
    fn test_navigation() {
        let mut pos = SourcePos::new(5, 10);
        pos.advance_col();
        assert_eq!(pos.column(), 11);
        pos.next_line();
        assert_eq!(pos, SourcePos::new(6, 1));
    }

    #[test]
    fn test_ordering_is_line_then_column() {
        assert!(SourcePos::new(1, 9) < SourcePos::new(2, 1));
        assert!(SourcePos::new(2, 1) < SourcePos::new(2, 3));
        assert_eq!(
            SourcePos::new(4, 4).cmp(&SourcePos::new(4, 4)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SourcePos::new(3, 14).to_string(), "line 3, column 14");
    }
}
