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

//! Shared test fixtures and utilities for the TMDL crates.
//!
//! This crate provides TMDL and JSON documents, builders and error
//! fixtures so that the parser, writer, linter and CLI crates test against
//! the same inputs.
//!
//! # Features
//!
//! - **Source Fixtures**: Realistic model definition files
//! - **JSON Fixtures**: Strict and relaxed JSON forms of a model
//! - **Builder Pattern**: Fluent API for canonical models
//! - **Error Fixtures**: Invalid documents with their expected errors
//! - **Utilities**: Record and expression counting
//!
//! # Quick Start
//!
//! ```rust
//! use tmdl_test::{fixtures, normalize_fixture, count_records};
//!
//! // Use pre-built fixtures
//! let model = normalize_fixture(fixtures::sales_table()).unwrap();
//! assert_eq!(count_records(&model), 7);
//!
//! // Test error handling
//! use tmdl_test::fixtures::errors;
//!
//! for sample in errors::invalid_tmdl_samples() {
//!     assert!(normalize_fixture(sample.source).is_err(), "{}", sample.name);
//! }
//! ```

use tmdl_core::{normalize, parse_tolerant, CanonicalModel, ParseOptions, TmdlResult};

/// Type alias for a list of fixture functions (name, source).
pub type FixtureList = Vec<(&'static str, fn() -> &'static str)>;

/// Parse TMDL text with the tolerant parser and normalize it.
pub fn normalize_fixture(source: &str) -> TmdlResult<CanonicalModel> {
    let doc = parse_tolerant(source, &ParseOptions::default())?;
    normalize(&doc)
}

/// Returns all source fixtures as (name, model) pairs.
///
/// # Panics
///
/// Panics when a fixture does not parse; fixtures are always valid.
pub fn fixture_models() -> Vec<(&'static str, CanonicalModel)> {
    fixtures::all()
        .into_iter()
        .map(|(name, source)| {
            let model = normalize_fixture(source())
                .unwrap_or_else(|e| panic!("fixture {} does not parse: {}", name, e));
            (name, model)
        })
        .collect()
}

/// Canonical test fixtures.
pub mod fixtures;

/// Fixture counting utilities.
pub mod counts;

pub use counts::{count_expressions, count_records};
