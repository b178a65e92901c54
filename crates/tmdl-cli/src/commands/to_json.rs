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

//! To-JSON command - canonical JSON output

use super::{load_model, write_output};
use crate::error::CliError;
use std::path::Path;

/// Convert a TMDL or JSON file to canonical JSON.
pub fn to_json(file: &Path, output: Option<&Path>, pretty: bool) -> Result<(), CliError> {
    let (_, model) = load_model(file)?;
    let json = if pretty {
        tmdl::to_json_pretty(&model)?
    } else {
        tmdl::to_json(&model)?
    };
    write_output(output, &json)
}
