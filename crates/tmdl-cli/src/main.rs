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

//! TMDL Command Line Interface

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tmdl_cli::cli::Commands;
use tmdl_cli::error::CliError;
use tracing_subscriber::EnvFilter;

/// TMDL - Tabular Model Definition Language toolkit
///
/// Parses TMDL and JSON model definitions, validates them and writes
/// canonical JSON or TMDL.
///
/// # Examples
///
/// ```bash
/// # Check a file parses
/// tmdl validate Sales.tmdl
///
/// # Lint, failing on warnings too
/// tmdl lint model.tmdl -W
///
/// # Convert to JSON
/// tmdl to-json model.tmdl --pretty
/// ```
#[derive(Parser)]
#[command(name = "tmdl")]
#[command(author, version, about = "TMDL - Tabular Model Definition Language toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    if let CliError::Tmdl(e) = err {
        if let Some(context) = &e.context {
            eprintln!("  {} {}", "context:".dimmed(), context);
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
