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

//! Lexical analysis for TMDL.
//!
//! # Module Structure
//!
//! - [`span`] - Source positions for tokens and errors
//! - [`reader`] - Position-tracked cursor over the input
//! - [`token`] - Token types
//! - [`scalar`] - Quoted string scanning and literal classification
//! - [`indent`] - Indentation stack
//! - [`tokenizer`] - The lazy, checkpointable tokenizer
//!
//! Embedded expression blocks are captured by a private extractor that the
//! tokenizer invokes after `=`.
//!
//! # Examples
//!
//! ```
//! use tmdl_core::lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("measure 'Total' = SUM(Sales[Amount])").unwrap();
//! let block = tokens.iter().find_map(|t| match &t.kind {
//!     TokenKind::Embedded(block) => Some(block),
//!     _ => None,
//! });
//! assert_eq!(block.unwrap().text, "SUM(Sales[Amount])");
//! ```
//!
//! # Security
//!
//! Indentation depth, flow nesting depth and embedded block size are bounded
//! by [`Limits`](crate::Limits); exceeding a bound yields a resource-limit
//! [`LexError`].

mod embedded;
pub mod error;
pub mod indent;
pub mod reader;
pub mod scalar;
pub mod span;
pub mod token;
pub mod tokenizer;

pub use error::{LexError, LexResult};
pub use indent::{IndentStack, IndentStyle};
pub use reader::SourceReader;
pub use scalar::{classify, is_identifier, LiteralKind};
pub use span::SourcePos;
pub use token::{
    EmbeddedBlock, ExprLanguage, IndentChange, IndentMarker, Punct, QuoteStyle, ScalarLiteral,
    Token, TokenKind,
};
pub use tokenizer::{tokenize, Checkpoint, Tokenizer};
