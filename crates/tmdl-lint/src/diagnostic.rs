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

//! Validation issue types

use tmdl_core::path_key;

/// Severity level for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Warning - the model is usable but probably not what was meant
    Warning,
    /// Error - the model is malformed
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A finding about a canonical model.
///
/// Issues are data: validation never fails, it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level
    severity: Severity,
    /// Location in the canonical model, one segment per key or list index
    path: Vec<String>,
    /// Human-readable message
    message: String,
    /// Rule ID that generated this issue
    rule_id: String,
}

impl ValidationIssue {
    pub fn warning(message: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: Vec::new(),
            message: message.into(),
            rule_id: rule_id.into(),
        }
    }

    pub fn error(message: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: Vec::new(),
            message: message.into(),
            rule_id: rule_id.into(),
        }
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    // Public getters
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Escalate the severity to error level (used by lint runner).
    pub fn escalate_to_error(&mut self) {
        self.severity = Severity::Error;
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: ", self.rule_id, self.severity)?;
        if !self.path.is_empty() {
            write!(f, "{}: ", path_key(&self.path))?;
        }
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_constructors() {
        let issue = ValidationIssue::warning("missing name", "top-level-keys");
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.message(), "missing name");
        assert_eq!(issue.rule_id(), "top-level-keys");
        assert!(issue.path().is_empty());

        let issue = ValidationIssue::error("bad", "table-shape");
        assert_eq!(issue.severity(), Severity::Error);
    }

    #[test]
    fn test_with_path() {
        let issue = ValidationIssue::error("bad", "table-shape").with_path(["model", "tables", "0"]);
        assert_eq!(issue.path(), ["model", "tables", "0"]);
    }

    #[test]
    fn test_escalate_to_error() {
        let mut issue = ValidationIssue::warning("w", "r");
        issue.escalate_to_error();
        assert_eq!(issue.severity(), Severity::Error);
    }

    #[test]
    fn test_display() {
        let issue = ValidationIssue::warning("missing name", "top-level-keys");
        assert_eq!(issue.to_string(), "[top-level-keys] warning: missing name");

        let issue = ValidationIssue::error("table has no name", "table-shape")
            .with_path(["model", "tables", "2"]);
        assert_eq!(
            issue.to_string(),
            "[table-shape] error: model.tables.2: table has no name"
        );
    }
}
