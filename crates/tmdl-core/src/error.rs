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

//! Error types for TMDL parsing and normalization.

use crate::lex::{LexError, SourcePos};
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmdlErrorKind {
    /// Lexical or grammatical violation in the input.
    Syntax,
    /// Internally inconsistent tree (a builder or caller defect).
    Structural,
    /// Security limit exceeded.
    Security,
    /// I/O error (file operations).
    IO,
    /// Error while converting to an output format.
    Conversion,
}

impl fmt::Display for TmdlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Structural => write!(f, "StructuralError"),
            Self::Security => write!(f, "SecurityError"),
            Self::IO => write!(f, "IOError"),
            Self::Conversion => write!(f, "ConversionError"),
        }
    }
}

/// An error that occurred while parsing or normalizing a TMDL document.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct TmdlError {
    /// The kind of error.
    pub kind: TmdlErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when not tied to a line).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Additional context (e.g., "in table 'Sales' started at line 5").
    pub context: Option<String>,
}

impl TmdlError {
    /// Create a new error.
    pub fn new(kind: TmdlErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            context: None,
        }
    }

    /// Create an error anchored at a source position.
    pub fn at(kind: TmdlErrorKind, message: impl Into<String>, pos: SourcePos) -> Self {
        Self::new(kind, message, pos.line()).with_column(pos.column())
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The source position of this error, when it is tied to a line.
    pub fn position(&self) -> Option<SourcePos> {
        if self.line == 0 {
            return None;
        }
        Some(SourcePos::new(self.line, self.column.unwrap_or(1)))
    }

    // Convenience constructors for each error kind
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::Syntax, message, line)
    }

    pub fn structural(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::Structural, message, line)
    }

    pub fn security(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::Security, message, line)
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::Conversion, message, 0)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::IO, message, 0)
    }
}

impl From<LexError> for TmdlError {
    fn from(err: LexError) -> Self {
        let kind = if err.is_resource_limit() {
            TmdlErrorKind::Security
        } else {
            TmdlErrorKind::Syntax
        };
        let pos = err.position();
        Self::at(kind, err.detail(), pos)
    }
}

/// Result type for TMDL operations.
pub type TmdlResult<T> = Result<T, TmdlError>;
