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

//! TMDL command-line toolkit.
//!
//! The `tmdl` binary wraps the library's parse, validate and output
//! functions:
//!
//! - `validate`: parse and normalize a file
//! - `lint`: run the model rules, exit code 2 on findings
//! - `to-json`: canonical JSON
//! - `inspect`: parse tree statistics and model contents
//! - `format`: canonical TMDL, with `--check` for CI

pub mod cli;
pub mod commands;
pub mod error;
