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

//! # TMDL - Tabular Model Definition Language
//!
//! Parses TMDL documents (and JSON model exports) into a canonical model,
//! validates it, and writes it back out as TMDL or JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use tmdl::{normalize, parse, to_json, validate};
//!
//! let source = "\
//! name: Sales
//! compatibilityLevel: 1575
//! model:
//! \ttable Sales
//! \t\tmeasure Total = SUM(Sales[Amount])
//! ";
//!
//! let doc = parse(source).unwrap();
//! let model = normalize(&doc).unwrap();
//! assert!(validate(&model).is_empty());
//!
//! let json = to_json(&model).unwrap();
//! assert!(json.starts_with(r#"{"name":"Sales","compatibilityLevel":1575"#));
//! ```
//!
//! ## Parse Strategies
//!
//! [`parse`] first tries to decode the input as strict JSON. Anything that
//! is not strict JSON (TMDL text, JSON with comments or trailing commas)
//! goes to the indentation-aware tolerant parser. Both produce the same
//! parse tree for the same content, so the choice is invisible after
//! [`normalize`]. [`Document::path`] records which one was used.
//!
//! ## Modules
//!
//! - [`c14n`](mod@c14n): canonical TMDL output
//! - [`json`]: strict JSON fast path and JSON output
//! - [`lint`]: model validation

use std::fs;
use std::path::Path;
use tracing::{debug, trace};

pub use tmdl_core::{
    CanonicalModel, Collection, Document, ExprLanguage, Expression, Limits, Map, ModelSection,
    ParseNode, ParseOptions, ParseOptionsBuilder, ParsePath, Record, SourceOrigin, TmdlError,
    TmdlErrorKind, TmdlResult, Unrecognized, Value,
};

mod error_ext;
mod strategy;
pub use error_ext::TmdlResultExt;

use strategy::{Attempt, STRATEGIES};

pub mod c14n {
    //! Canonical TMDL output
    pub use tmdl_c14n::{
        canonicalize, canonicalize_with_config, C14nConfig, QuotingStrategy, TmdlWriter,
    };
}

pub mod json {
    //! JSON conversion utilities
    pub use tmdl_json::{
        decode_strict, from_json, to_json, to_json_pretty, to_json_writer, FastPathOutcome,
        JsonError, ToJsonConfig,
    };
}

pub mod lint {
    //! Model validation
    pub use tmdl_lint::{
        validate, validate_with_config, LintConfig, LintConfigError, LintRule, LintRunner,
        RuleConfig, Severity, ValidationIssue,
    };
}

/// Parse a TMDL or JSON document from a string.
///
/// # Examples
///
/// ```rust
/// use tmdl::{parse, ParsePath};
///
/// let doc = parse(r#"{"name": "Sales"}"#).unwrap();
/// assert_eq!(doc.path, ParsePath::Fast);
///
/// let doc = parse("name: Sales\n").unwrap();
/// assert_eq!(doc.path, ParsePath::Tolerant);
/// ```
#[inline]
pub fn parse(source: &str) -> TmdlResult<Document> {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse a document with explicit options.
///
/// Input limits are checked once, then each strategy runs in order until
/// one produces a document. A strategy that declines is logged at `debug`
/// with its reason; an error from any strategy ends the parse.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> TmdlResult<Document> {
    tmdl_core::check_input_limits(source, &options.limits)?;

    for strategy in STRATEGIES {
        if !strategy.enabled(options) {
            trace!(strategy = strategy.name(), "strategy disabled");
            continue;
        }
        match strategy.attempt(source, options)? {
            Attempt::Parsed(doc) => {
                debug!(
                    strategy = strategy.name(),
                    bytes = source.len(),
                    "document parsed"
                );
                return Ok(doc);
            }
            Attempt::Declined(reason) => {
                debug!(strategy = strategy.name(), %reason, "strategy declined, falling back");
            }
        }
    }

    Err(TmdlError::structural("no parse strategy accepted the input", 0))
}

/// Read and parse a file.
///
/// The file size is checked against the default limits before reading.
/// The returned document's origin is the path.
pub fn parse_file(path: impl AsRef<Path>) -> TmdlResult<Document> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Read and parse a file with explicit options.
pub fn parse_file_with_options(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> TmdlResult<Document> {
    let path = path.as_ref();
    let size = fs::metadata(path)
        .with_context(|| format!("reading {}", path.display()))?
        .len();
    if size > options.limits.max_file_size as u64 {
        return Err(TmdlError::security(
            format!(
                "file size {} bytes exceeds maximum {} bytes",
                size, options.limits.max_file_size
            ),
            0,
        )
        .with_context(path.display().to_string()));
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = parse_with_options(&source, options)
        .with_context(|| format!("in {}", path.display()))?;
    Ok(doc.with_origin(SourceOrigin::File(path.to_path_buf())))
}

/// Normalize a parsed document into the canonical model.
///
/// Only an internally inconsistent tree is an error.
#[inline]
pub fn normalize(doc: &Document) -> TmdlResult<CanonicalModel> {
    tmdl_core::normalize(doc)
}

/// Parse and normalize in one step.
pub fn parse_model(source: &str) -> TmdlResult<CanonicalModel> {
    normalize(&parse(source)?)
}

/// Validate a canonical model with the default rules.
///
/// # Examples
///
/// ```rust
/// use tmdl::{parse_model, validate};
///
/// let model = parse_model("table Sales\n").unwrap();
/// for issue in validate(&model) {
///     println!("{}", issue);
/// }
/// ```
#[inline]
pub fn validate(model: &CanonicalModel) -> Vec<lint::ValidationIssue> {
    tmdl_lint::validate(model)
}

/// Convert a canonical model to compact JSON.
pub fn to_json(model: &CanonicalModel) -> TmdlResult<String> {
    tmdl_json::to_json(model, &tmdl_json::ToJsonConfig::default())
        .map_err(|e| TmdlError::conversion(e.to_string()))
}

/// Convert a canonical model to pretty-printed JSON.
pub fn to_json_pretty(model: &CanonicalModel) -> TmdlResult<String> {
    tmdl_json::to_json_pretty(model).map_err(|e| TmdlError::conversion(e.to_string()))
}

/// Write a canonical model as TMDL text.
///
/// Parsing the output yields an equal model.
///
/// ```rust
/// use tmdl::{parse_model, to_tmdl};
///
/// let model = parse_model(r#"{"name": "M", "model": {"tables": [{"name": "Sales"}]}}"#).unwrap();
/// assert_eq!(to_tmdl(&model).unwrap(), "name: M\nmodel:\n\ttable Sales\n");
/// ```
#[inline]
pub fn to_tmdl(model: &CanonicalModel) -> TmdlResult<String> {
    tmdl_c14n::canonicalize(model)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_picks_fast_path_for_strict_json() {
        let doc = parse(r#"{"name": "M", "compatibilityLevel": 1575}"#).unwrap();
        assert_eq!(doc.path, ParsePath::Fast);
        assert_eq!(doc.origin, SourceOrigin::Inline);
    }

    #[test]
    fn test_parse_falls_back_for_relaxed_json() {
        let doc = parse("{\"name\": \"M\",}").unwrap();
        assert_eq!(doc.path, ParsePath::Tolerant);
    }

    #[test]
    fn test_fast_path_can_be_disabled() {
        let opts = ParseOptions::builder().fast_path(false).build();
        let doc = parse_with_options(r#"{"name": "M"}"#, &opts).unwrap();
        assert_eq!(doc.path, ParsePath::Tolerant);
    }

    #[test]
    fn test_limits_checked_before_any_strategy() {
        let opts = ParseOptions::builder().max_file_size(8).build();
        let err = parse_with_options(r#"{"name": "Sales"}"#, &opts).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Security);
    }

    #[test]
    fn test_fast_path_limit_is_an_error() {
        let deep = format!("{{\"a\": {}{}}}", "[".repeat(200), "]".repeat(200));
        let err = parse(&deep).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Security);
    }

    #[test]
    fn test_syntax_error_carries_line() {
        let err = parse("model:\n    a: 1\n  b: 2\n").unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Syntax);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_parse_model_and_back() {
        let model = parse_model("name: M\ncompatibilityLevel: 1575\n").unwrap();
        assert_eq!(model.compatibility_level, Some(Value::Int(1575)));
        assert_eq!(to_tmdl(&model).unwrap(), "name: M\ncompatibilityLevel: 1575\n");
    }

    #[test]
    fn test_to_json_pretty() {
        let model = parse_model("name: M\n").unwrap();
        assert_eq!(to_json_pretty(&model).unwrap(), "{\n  \"name\": \"M\"\n}");
    }
}
