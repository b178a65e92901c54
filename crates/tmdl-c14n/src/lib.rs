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

//! TMDL Re-emission
//!
//! Writes a [`CanonicalModel`] back out as TMDL text.
//!
//! # Overview
//!
//! The output is built for round trips: parsing it with the tolerant parser
//! and normalizing the tree yields a model equal to the one written.
//!
//! - **Deterministic output**: the same model always produces the same text
//! - **Idempotency**: writing the re-read model produces identical text
//! - **Unrecognized content**: every value in the unrecognized bucket is
//!   written back at the path it came from
//!
//! # Features
//!
//! - Named collection records written as TMDL declarations
//!   (`table Sales`, `measure 'Total Sales' = SUM(...)`)
//! - Flags (`isHidden`), modifiers and `///` descriptions
//! - Expressions written inline, as indented blocks or fenced with a
//!   language tag, whichever reads back exactly
//! - Minimal or always-quote string formatting strategies
//! - Security: nesting depth limit prevents stack overflow
//!
//! # Examples
//!
//! ```
//! use tmdl_c14n::{canonicalize, canonicalize_with_config, C14nConfig};
//! use tmdl_core::{normalize, parse_tolerant, ParseOptions};
//!
//! let source = "model Model\n\tculture: en-US\n\ntable Sales\n\tmeasure Total = SUM(Sales[Amount])\n";
//! let doc = parse_tolerant(source, &ParseOptions::default()).unwrap();
//! let model = normalize(&doc).unwrap();
//!
//! let text = canonicalize(&model).unwrap();
//! let reread = normalize(&parse_tolerant(&text, &ParseOptions::default()).unwrap()).unwrap();
//! assert_eq!(reread, model);
//!
//! let config = C14nConfig::new().with_indent("    ").with_declarations(false);
//! let text = canonicalize_with_config(&model, &config).unwrap();
//! assert!(text.contains("    tables:"));
//! ```

mod config;
mod layout;
mod writer;

pub use config::{C14nConfig, QuotingStrategy};
pub use writer::TmdlWriter;

use tmdl_core::{CanonicalModel, TmdlResult};

/// Write a canonical model as TMDL text with the default configuration.
///
/// # Errors
///
/// Returns a `Conversion` error when:
/// - A float is not finite
/// - An expression contains a line made only of a code fence
/// - Nesting exceeds the maximum depth of 1000 levels
/// - Unrecognized content has no container to go into
pub fn canonicalize(model: &CanonicalModel) -> TmdlResult<String> {
    canonicalize_with_config(model, &C14nConfig::default())
}

/// Write a canonical model as TMDL text.
///
/// # Errors
///
/// Same as [`canonicalize`], plus an invalid indent string.
pub fn canonicalize_with_config(model: &CanonicalModel, config: &C14nConfig) -> TmdlResult<String> {
    let mut writer = TmdlWriter::new(config.clone());
    writer.write_document(model)
}
