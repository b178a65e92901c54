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

//! Validate command - parse and normalize a TMDL file

use super::load_model;
use crate::error::CliError;
use colored::Colorize;
use std::path::Path;

/// Check that a file parses and normalizes.
///
/// Prints a one-line summary with the parse path that accepted the input
/// and the number of records found. Lint rules are not run; see
/// [`lint`](super::lint) for that.
pub fn validate(file: &Path) -> Result<(), CliError> {
    let (doc, model) = load_model(file)?;

    let records = model.model.as_ref().map_or(0, |m| m.record_count());
    println!(
        "{} {} ({} path, {} record(s), {} unrecognized)",
        "✓".green().bold(),
        file.display(),
        doc.path,
        records,
        model.unrecognized.value_count()
    );
    Ok(())
}
