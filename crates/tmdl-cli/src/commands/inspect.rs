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

//! Inspect command - parse tree and model summary

use super::load_model;
use crate::error::CliError;
use colored::Colorize;
use std::path::Path;
use tmdl::{CanonicalModel, Record, Value};
use tmdl_core::tree_stats;

/// Print the shape of a file's parse tree and the records it defines.
///
/// With `verbose`, every record name and every unrecognized path is listed.
pub fn inspect(file: &Path, verbose: bool) -> Result<(), CliError> {
    let (doc, model) = load_model(file)?;
    let stats = tree_stats(&doc.root);

    println!("{}", "TMDL Document".bold());
    println!("  File:       {}", doc.origin);
    println!("  Parse path: {}", doc.path);
    println!("  Name:       {}", describe(model.name.as_ref()));
    println!(
        "  Level:      {}",
        describe(model.compatibility_level.as_ref())
    );

    println!();
    println!("{}", "Parse Tree".bold());
    println!("  Nodes:      {}", stats.total());
    println!("  Objects:    {}", stats.objects);
    println!("  Arrays:     {}", stats.arrays);
    println!("  Scalars:    {}", stats.scalars);
    println!("  Embedded:   {}", stats.embedded);
    println!("  Max depth:  {}", stats.max_depth);

    print_model(&model, verbose);
    Ok(())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".dimmed().to_string(),
    }
}

fn record_label(record: &Record) -> String {
    match record.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => format!("<{}>", other.type_name()),
        None => "<unnamed>".to_string(),
    }
}

fn print_model(model: &CanonicalModel, verbose: bool) {
    println!();
    let Some(section) = &model.model else {
        println!("{}", "No model section".yellow());
        return;
    };

    println!("{}", "Model".bold());
    println!("  Properties: {}", section.properties.len());
    for (collection, records) in section.collections() {
        if records.is_empty() {
            continue;
        }
        println!("  {:<12}{}", format!("{}:", collection.plural()), records.len());
        if verbose {
            for record in records {
                println!("    {}", record_label(record).cyan());
            }
        }
    }

    if !model.unrecognized.is_empty() {
        println!();
        println!(
            "{} {} value(s)",
            "Unrecognized".bold(),
            model.unrecognized.value_count()
        );
        if verbose {
            for (path, values) in model.unrecognized.iter() {
                println!("    {} ({})", tmdl_core::path_key(path).cyan(), values.len());
            }
        }
    }
}
