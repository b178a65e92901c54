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

//! Format command - canonical TMDL output

use super::{load_model, write_output};
use crate::error::CliError;
use colored::Colorize;
use std::fs;
use std::path::Path;
use tmdl::c14n::{canonicalize_with_config, C14nConfig};

/// Rewrite a TMDL or JSON file as canonical TMDL.
///
/// `indent` is the number of spaces per level; tabs are used when it is
/// `None`. With `check`, nothing is written and the command fails when the
/// file differs from its canonical form.
pub fn format(
    file: &Path,
    output: Option<&Path>,
    check: bool,
    indent: Option<usize>,
) -> Result<(), CliError> {
    let (_, model) = load_model(file)?;

    let mut config = C14nConfig::new();
    if let Some(width) = indent {
        config = config.with_indent(" ".repeat(width));
    }
    let canonical = canonicalize_with_config(&model, &config)?;

    if check {
        let current = fs::read_to_string(file).map_err(|e| CliError::io_error(file, e))?;
        if current != canonical {
            return Err(CliError::NotCanonical(file.to_path_buf()));
        }
        println!("{} {} is canonical", "✓".green().bold(), file.display());
        return Ok(());
    }

    write_output(output, &canonical)
}
