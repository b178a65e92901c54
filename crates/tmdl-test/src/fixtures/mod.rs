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

//! Canonical test fixtures.
//!
//! This module provides fixtures organized by category:
//!
//! - **sources**: TMDL documents in the indentation-based syntax
//! - **json**: the same kind of content as JSON, strict and relaxed
//! - **errors**: invalid documents with their expected errors
//! - **builders**: builder pattern for canonical models

pub mod builders;
pub mod errors;
mod json;
mod sources;

pub use json::*;
pub use sources::*;

use crate::FixtureList;

/// Returns all TMDL source fixtures for iteration.
///
/// Useful for running the same test across all fixtures.
pub fn all() -> FixtureList {
    vec![
        ("sales_table", sales_table),
        ("model_file", model_file),
        ("relationships", relationships),
        ("shared_expression", shared_expression),
        ("roles_and_perspectives", roles_and_perspectives),
        ("complete_model", complete_model),
        ("empty", empty),
    ]
}
