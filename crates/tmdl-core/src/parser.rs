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

//! Tolerant parser for TMDL documents.
//!
//! # Security Limits
//!
//! The parser enforces several limits to bound the work done per call:
//!
//! - `max_file_size`: Maximum input size (default: 256MB)
//! - `max_line_length`: Maximum line length (default: 1MB)
//! - `max_indent_depth`: Maximum indentation nesting (default: 64)
//! - `max_flow_depth`: Maximum `[`/`{` nesting (default: 128)
//! - `max_embedded_size`: Maximum embedded expression size (default: 10MB)
//! - `max_nodes`: Maximum number of parse nodes (default: 10M)
//!
//! Input size and line length are checked before tokenizing, so an oversized
//! document is rejected without building any tokens.

use crate::builder::{build_tree, BuilderOptions};
use crate::document::{Document, ParsePath};
use crate::error::{TmdlError, TmdlErrorKind, TmdlResult};
use crate::lex::{SourcePos, Tokenizer};
use crate::limits::Limits;
use tracing::debug;

/// Parsing options for configuring TMDL document parsing behavior.
///
/// ParseOptions provides both direct field access and a fluent builder API.
///
/// # Creating ParseOptions
///
/// ```text
/// use tmdl_core::ParseOptions;
///
/// // Keep comments and refuse large inputs
/// let opts = ParseOptions::builder()
///     .keep_comments(true)
///     .max_file_size(10 * 1024 * 1024)
///     .build();
///
/// // Skip the JSON fast path entirely
/// let opts = ParseOptions::builder().fast_path(false).build();
/// ```
///
/// # Fields
///
/// - `limits`: Resource limits for a single parse
/// - `keep_comments`: Attach comments to the following node
/// - `fast_path`: Try strict JSON decoding before the tolerant parser
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Security limits.
    pub limits: Limits,
    /// Keep comments as sidecar metadata.
    pub keep_comments: bool,
    /// Attempt the strict JSON fast path first.
    pub fast_path: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            keep_comments: false,
            fast_path: true,
        }
    }
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    ///
    /// # Examples
    ///
    /// ```text
    /// let opts = ParseOptions::builder()
    ///     .max_depth(32)
    ///     .keep_comments(true)
    ///     .build();
    /// ```
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of ParseOptions.
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    limits: Limits,
    keep_comments: bool,
    fast_path: bool,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        let defaults = ParseOptions::default();
        Self {
            limits: defaults.limits,
            keep_comments: defaults.keep_comments,
            fast_path: defaults.fast_path,
        }
    }

    /// Replace all limits at once.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the maximum indentation depth.
    ///
    /// # Parameters
    ///
    /// - `depth`: Maximum number of open indentation levels (default: 64)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_depth(32)
    /// ```
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_indent_depth = depth;
        self
    }

    /// Set the maximum flow nesting depth.
    ///
    /// # Parameters
    ///
    /// - `depth`: Maximum `[`/`{` nesting (default: 128)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_flow_depth(16)
    /// ```
    pub fn max_flow_depth(mut self, depth: usize) -> Self {
        self.limits.max_flow_depth = depth;
        self
    }

    /// Set the maximum file size in bytes.
    ///
    /// # Parameters
    ///
    /// - `size`: Maximum input size in bytes (default: 256MB)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_file_size(10 * 1024 * 1024)
    /// ```
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.limits.max_file_size = size;
        self
    }

    /// Set the maximum line length in bytes.
    ///
    /// # Parameters
    ///
    /// - `length`: Maximum line length in bytes (default: 1MB)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_line_length(64 * 1024)
    /// ```
    pub fn max_line_length(mut self, length: usize) -> Self {
        self.limits.max_line_length = length;
        self
    }

    /// Set the maximum embedded expression size in bytes.
    ///
    /// # Parameters
    ///
    /// - `size`: Maximum captured block size (default: 10MB)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_embedded_size(1024 * 1024)
    /// ```
    pub fn max_embedded_size(mut self, size: usize) -> Self {
        self.limits.max_embedded_size = size;
        self
    }

    /// Set the maximum number of parse nodes.
    ///
    /// # Parameters
    ///
    /// - `count`: Maximum node count (default: 10M)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().max_nodes(100_000)
    /// ```
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.limits.max_nodes = count;
        self
    }

    /// Keep comments as sidecar metadata on the following node.
    ///
    /// # Parameters
    ///
    /// - `keep`: Whether to keep comments (default: false)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().keep_comments(true)
    /// ```
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Enable or disable the strict JSON fast path.
    ///
    /// # Parameters
    ///
    /// - `enabled`: Whether to try strict decoding first (default: true)
    ///
    /// # Examples
    ///
    /// ```text
    /// ParseOptions::builder().fast_path(false)
    /// ```
    pub fn fast_path(mut self, enabled: bool) -> Self {
        self.fast_path = enabled;
        self
    }

    /// Build the ParseOptions.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            limits: self.limits,
            keep_comments: self.keep_comments,
            fast_path: self.fast_path,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject inputs that exceed the size or line-length limits.
pub fn check_input_limits(source: &str, limits: &Limits) -> TmdlResult<()> {
    if source.len() > limits.max_file_size {
        return Err(TmdlError::security(
            format!(
                "input size {} bytes exceeds maximum {} bytes",
                source.len(),
                limits.max_file_size
            ),
            0,
        ));
    }

    let bytes = source.as_bytes();
    let mut line_start = 0;
    let mut line_no = 1;
    for nl in memchr::memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len())) {
        let length = nl - line_start;
        if length > limits.max_line_length {
            return Err(TmdlError::at(
                TmdlErrorKind::Security,
                format!(
                    "line length {} exceeds maximum {}",
                    length, limits.max_line_length
                ),
                SourcePos::new(line_no, 1),
            ));
        }
        line_start = nl + 1;
        line_no += 1;
    }
    Ok(())
}

/// Parse TMDL text with the tolerant parser.
pub fn parse_tolerant(source: &str, options: &ParseOptions) -> TmdlResult<Document> {
    check_input_limits(source, &options.limits)?;

    let tokens = Tokenizer::with_limits(source, &options.limits);
    let root = build_tree(
        tokens,
        BuilderOptions {
            keep_comments: options.keep_comments,
            max_nodes: options.limits.max_nodes,
        },
    )?;
    debug!(
        nodes = root.count_nodes(),
        bytes = source.len(),
        "tolerant parse complete"
    );
    Ok(Document::new(root, ParsePath::Tolerant))
}
