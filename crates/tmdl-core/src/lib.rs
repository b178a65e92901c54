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

//! Core parser and data model for TMDL.
//!
//! This crate provides the tolerant parsing pipeline for TMDL documents and
//! the canonical model they normalize into:
//!
//! - [`lex`]: position-tracked reader, tokenizer, indentation stack and the
//!   embedded-block extractor
//! - [`builder`]: indentation-aware tree builder producing [`ParseNode`]s
//! - [`normalize`](normalize()): generic tree to [`CanonicalModel`]
//! - [`traverse`]: pre-order visitor over the parse tree
//!
//! Strict JSON decoding lives in `tmdl-json`; the `tmdl` facade chooses
//! between the two paths.

pub mod builder;
mod canonical;
mod document;
mod error;
pub mod lex;
mod limits;
mod node;
mod normalize;
mod parser;
pub mod schema;
pub mod traverse;
mod value;

pub use canonical::{path_key, CanonicalModel, ModelSection, Unrecognized};
pub use document::{Document, ParsePath, SourceOrigin};
pub use error::{TmdlError, TmdlErrorKind, TmdlResult};
pub use limits::Limits;
pub use node::{NodeValue, ParseNode, Scalar, ScalarKind};
pub use normalize::{coerce_scalar, normalize, normalize_tree};
pub use parser::{check_input_limits, parse_tolerant, ParseOptions, ParseOptionsBuilder};
pub use schema::Collection;
pub use traverse::{check_monotonic_positions, traverse, tree_stats, NodeVisitor, TreeStats, VisitorContext};
pub use value::{Expression, Map, Record, Value};

pub use lex::{ExprLanguage, SourcePos};
