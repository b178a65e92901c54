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

//! CLI command implementations

mod format;
mod inspect;
mod lint;
mod to_json;
mod validate;

pub use format::format;
pub use inspect::inspect;
pub use lint::{lint, LintFormat};
pub use to_json::to_json;
pub use validate::validate;

use crate::error::CliError;
use std::fs;
use std::path::Path;
use tmdl::{CanonicalModel, Document, ParseOptions};
use tracing::debug;

/// Environment variable overriding the maximum input size in bytes.
pub const MAX_FILE_SIZE_ENV: &str = "TMDL_MAX_FILE_SIZE";

/// Build parse options from the environment.
///
/// An unset variable keeps the library default; a value that is not a
/// byte count is rejected.
pub fn parse_options() -> Result<ParseOptions, CliError> {
    options_for(std::env::var(MAX_FILE_SIZE_ENV).ok().as_deref())
}

fn options_for(max_file_size: Option<&str>) -> Result<ParseOptions, CliError> {
    let mut builder = ParseOptions::builder();
    if let Some(raw) = max_file_size {
        let size = raw.trim().parse::<usize>().map_err(|_| {
            CliError::InvalidInput(format!(
                "{} must be a byte count, found '{}'",
                MAX_FILE_SIZE_ENV, raw
            ))
        })?;
        debug!(size, "max file size from environment");
        builder = builder.max_file_size(size);
    }
    Ok(builder.build())
}

/// Read and parse a file with the CLI's options.
pub fn load_document(file: &Path) -> Result<Document, CliError> {
    let options = parse_options()?;
    let doc = tmdl::parse_file_with_options(file, &options)?;
    debug!(file = %file.display(), path = %doc.path, "parsed");
    Ok(doc)
}

/// Read, parse and normalize a file.
pub fn load_model(file: &Path) -> Result<(Document, CanonicalModel), CliError> {
    let doc = load_document(file)?;
    let model = tmdl::normalize(&doc)?;
    Ok((doc, model))
}

/// Write `content` to `output`, or to stdout when no file is given.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, content).map_err(|e| CliError::io_error(path, e)),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
