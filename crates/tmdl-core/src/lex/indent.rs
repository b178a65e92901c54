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

//! Indentation handling.
//!
//! TMDL nests by indentation. Widths are counted in whitespace characters;
//! a document indents with tabs or with spaces, never both. Open levels are
//! kept on a stack so that a dedent must land exactly on an enclosing level.

use super::error::{LexError, LexResult};
use super::span::SourcePos;
use super::token::{IndentChange, IndentMarker};

/// Indentation character used by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tabs,
    Spaces,
}

impl IndentStyle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Spaces => "spaces",
        }
    }
}

/// Number of leading space/tab characters of a line.
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Determine the style of a run of leading whitespace.
///
/// Returns `None` for an empty run and an error when tabs and spaces mix.
pub fn indent_style(ws: &str, line: usize) -> LexResult<Option<IndentStyle>> {
    let mut style = None;
    for (i, c) in ws.chars().enumerate() {
        let this = if c == '\t' {
            IndentStyle::Tabs
        } else {
            IndentStyle::Spaces
        };
        match style {
            None => style = Some(this),
            Some(s) if s != this => {
                return Err(LexError::MixedIndentation {
                    pos: SourcePos::new(line, i + 1),
                });
            }
            Some(_) => {}
        }
    }
    Ok(style)
}

/// Stack of open indentation widths.
#[derive(Debug, Clone)]
pub struct IndentStack {
    levels: Vec<usize>,
    style: Option<IndentStyle>,
    max_depth: usize,
}

impl IndentStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            levels: vec![0],
            style: None,
            max_depth,
        }
    }

    /// Number of open levels below the document root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Width of the innermost open level.
    #[inline]
    pub fn current_width(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Apply the leading whitespace of a new entry line.
    pub fn apply(&mut self, ws: &str, line: usize) -> LexResult<IndentMarker> {
        let pos = SourcePos::new(line, 1);
        if let Some(style) = indent_style(ws, line)? {
            match self.style {
                None => self.style = Some(style),
                Some(expected) if expected != style => {
                    return Err(LexError::InconsistentIndentation {
                        expected: expected.name(),
                        pos,
                    });
                }
                Some(_) => {}
            }
        }

        let width = ws.chars().count();
        let current = self.current_width();
        let change = if width == current {
            IndentChange::Same
        } else if width > current {
            if self.depth() + 1 > self.max_depth {
                return Err(LexError::IndentTooDeep {
                    depth: self.depth() + 1,
                    max: self.max_depth,
                    pos,
                });
            }
            self.levels.push(width);
            IndentChange::Deeper
        } else {
            let mut closed = 0;
            while self.current_width() > width {
                self.levels.pop();
                closed += 1;
            }
            if self.current_width() != width {
                return Err(LexError::AmbiguousDedent { width, pos });
            }
            IndentChange::Shallower(closed)
        };
        Ok(IndentMarker { width, change })
    }
}
