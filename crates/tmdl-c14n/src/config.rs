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

//! Writer configuration.

/// Quoting strategy for string values.
///
/// # Examples
///
/// ```
/// use tmdl_c14n::{C14nConfig, QuotingStrategy};
///
/// // Minimal quoting (default): bare text whenever it reads back as the
/// // same string
/// let config = C14nConfig::new().with_quoting(QuotingStrategy::Minimal);
///
/// // Always quote all strings
/// let config = C14nConfig::new().with_quoting(QuotingStrategy::Always);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum QuotingStrategy {
    /// Only quote when bare text would read back differently.
    ///
    /// Quotes are added when strings:
    /// - Are empty or have leading/trailing whitespace
    /// - Would be coerced (`true`, `null`, `1575`, `1.5`)
    /// - Start with a quote or a flow delimiter
    /// - Contain `//`, control characters or a trailing comma
    #[default]
    Minimal,

    /// Quote all string values unconditionally.
    Always,
}

/// Configuration for TMDL output.
///
/// # Examples
///
/// ```
/// use tmdl_c14n::{C14nConfig, QuotingStrategy};
///
/// let config = C14nConfig::default();
/// assert_eq!(config.indent, "\t");
/// assert!(config.declarations);
///
/// let config = C14nConfig::new()
///     .with_indent("    ")
///     .with_declarations(false)
///     .with_quoting(QuotingStrategy::Always);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct C14nConfig {
    /// String written once per nesting level.
    ///
    /// Must be non-empty and made of one kind of whitespace (tabs or
    /// spaces). Default: `"\t"`
    pub indent: String,

    /// Quoting strategy for string values.
    ///
    /// Default: [`QuotingStrategy::Minimal`]
    pub quoting: QuotingStrategy,

    /// Write named records as TMDL declarations.
    ///
    /// When `true`:
    /// ```text
    /// table Sales
    ///     isHidden
    /// ```
    ///
    /// When `false`:
    /// ```text
    /// tables:
    ///     -
    ///         name: Sales
    ///         isHidden: true
    /// ```
    ///
    /// Default: `true`
    pub declarations: bool,
}

impl Default for C14nConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            quoting: QuotingStrategy::Minimal,
            declarations: true,
        }
    }
}

impl C14nConfig {
    /// Create a new configuration with all default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation string.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set the quoting strategy.
    pub fn with_quoting(mut self, quoting: QuotingStrategy) -> Self {
        self.quoting = quoting;
        self
    }

    /// Set whether named records are written as declarations.
    pub fn with_declarations(mut self, declarations: bool) -> Self {
        self.declarations = declarations;
        self
    }

    /// Indentation width of one level, in characters.
    pub(crate) fn indent_width(&self) -> usize {
        self.indent.chars().count()
    }

    pub(crate) fn indent_is_valid(&self) -> bool {
        let mut chars = self.indent.chars();
        match chars.next() {
            Some(first @ (' ' | '\t')) => chars.all(|c| c == first),
            _ => false,
        }
    }
}
