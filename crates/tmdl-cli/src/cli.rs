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

//! Command-line interface definition.

use crate::commands::{self, LintFormat};
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

/// TMDL subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Check that a file parses and normalizes
    Validate {
        /// Input TMDL or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run the model validation rules
    Lint {
        /// Input TMDL or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = LintFormat::Text)]
        format: LintFormat,

        /// Fail on warnings as well as errors
        #[arg(short = 'W', long)]
        warn_error: bool,

        /// Skip a rule (may be repeated)
        #[arg(long = "disable", value_name = "RULE")]
        disable: Vec<String>,
    },

    /// Convert to canonical JSON
    #[command(name = "to-json")]
    ToJson {
        /// Input TMDL or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show parse tree statistics and model contents
    Inspect {
        /// Input TMDL or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// List record names and unrecognized paths
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rewrite as canonical TMDL
    Format {
        /// Input TMDL or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only check whether the file is already canonical
        #[arg(long)]
        check: bool,

        /// Indent with this many spaces instead of tabs
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=16))]
        indent: Option<u8>,
    },
}

impl Commands {
    /// Run the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Validate { file } => commands::validate(&file),
            Commands::Lint {
                file,
                format,
                warn_error,
                disable,
            } => commands::lint(&file, format, warn_error, &disable),
            Commands::ToJson {
                file,
                output,
                pretty,
            } => commands::to_json(&file, output.as_deref(), pretty),
            Commands::Inspect { file, verbose } => commands::inspect(&file, verbose),
            Commands::Format {
                file,
                output,
                check,
                indent,
            } => commands::format(&file, output.as_deref(), check, indent.map(usize::from)),
        }
    }
}
