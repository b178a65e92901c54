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

//! Lint command - run the model validation rules

use super::load_model;
use crate::error::CliError;
use clap::ValueEnum;
use colored::Colorize;
use std::path::Path;
use tmdl::lint::{validate_with_config, LintConfig, Severity, ValidationIssue};

/// Output format for lint results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LintFormat {
    /// Colored, one issue per line
    #[default]
    Text,
    /// A JSON object with the file and its issues
    Json,
}

/// Lint a TMDL file.
///
/// Fails with [`CliError::LintFailed`] when any issue is an error, or when
/// `warn_error` is set and any issue is reported at all. Rules named in
/// `disabled` are skipped.
pub fn lint(
    file: &Path,
    format: LintFormat,
    warn_error: bool,
    disabled: &[String],
) -> Result<(), CliError> {
    let (_, model) = load_model(file)?;

    let mut config = LintConfig::default();
    for rule in disabled {
        config.disable_rule(rule);
    }
    config
        .validate()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let issues = validate_with_config(&model, config);
    match format {
        LintFormat::Json => print_json(file, &issues)?,
        LintFormat::Text => print_text(file, &issues),
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warnings = issues.len() - errors;
    if errors > 0 || (warn_error && warnings > 0) {
        return Err(CliError::LintFailed { errors, warnings });
    }
    Ok(())
}

fn print_json(file: &Path, issues: &[ValidationIssue]) -> Result<(), CliError> {
    let json = serde_json::json!({
        "file": file.display().to_string(),
        "issues": issues.iter().map(|issue| {
            serde_json::json!({
                "severity": issue.severity().to_string(),
                "rule": issue.rule_id(),
                "path": issue.path(),
                "message": issue.message(),
            })
        }).collect::<Vec<_>>()
    });
    let output = serde_json::to_string_pretty(&json)
        .map_err(|e| CliError::InvalidInput(format!("JSON serialization error: {}", e)))?;
    println!("{}", output);
    Ok(())
}

fn print_text(file: &Path, issues: &[ValidationIssue]) {
    if issues.is_empty() {
        println!("{} {} - no issues found", "✓".green().bold(), file.display());
        return;
    }

    println!(
        "{} {} - {} issue(s) found:",
        "!".yellow().bold(),
        file.display(),
        issues.len()
    );
    for issue in issues {
        let severity = match issue.severity() {
            Severity::Error => "error".red(),
            Severity::Warning => "warning".yellow(),
        };
        let location = if issue.path().is_empty() {
            String::new()
        } else {
            format!(" {}:", issue.path().join("."))
        };
        println!(
            "  {} [{}]{} {}",
            severity,
            issue.rule_id().dimmed(),
            location,
            issue.message()
        );
    }
}
