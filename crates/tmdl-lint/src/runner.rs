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

//! Lint runner

use crate::diagnostic::{Severity, ValidationIssue};
use crate::rules::{default_rules, LintRule, RuleConfig};
use std::collections::HashMap;
use thiserror::Error;
use tmdl_core::CanonicalModel;

/// Maximum number of issues to collect before stopping.
///
/// A model with millions of records can otherwise produce an issue per
/// record. The first ten thousand are enough to find the systemic problem.
const MAX_ISSUES: usize = 10_000;

const MAX_RULE_ID_LENGTH: usize = 100;
const MAX_RULES: usize = 1000;

/// Errors in a [`LintConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintConfigError {
    #[error("too many rule configurations: {count} (max: {max})")]
    TooManyRules { count: usize, max: usize },

    #[error("empty rule ID not allowed")]
    EmptyRuleId,

    #[error("rule ID too long: {len} bytes (max: {max})")]
    RuleIdTooLong { len: usize, max: usize },

    #[error("max_issues must be at least 1")]
    ZeroIssueLimit,
}

/// Configuration for the lint runner
#[derive(Debug, Clone)]
pub struct LintConfig {
    /// Rule configurations by rule ID
    pub rules: HashMap<String, RuleConfig>,
    /// Minimum severity to report
    pub min_severity: Severity,
    /// Maximum number of issues to collect (default: 10,000)
    ///
    /// Once reached, no further rules run and a final warning records
    /// that the output was truncated.
    pub max_issues: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            min_severity: Severity::Warning,
            max_issues: MAX_ISSUES,
        }
    }
}

impl LintConfig {
    /// Validate configuration (checks rule ID lengths and limits).
    pub fn validate(&self) -> Result<(), LintConfigError> {
        if self.rules.len() > MAX_RULES {
            return Err(LintConfigError::TooManyRules {
                count: self.rules.len(),
                max: MAX_RULES,
            });
        }
        if self.max_issues == 0 {
            return Err(LintConfigError::ZeroIssueLimit);
        }

        for id in self.rules.keys() {
            if id.is_empty() {
                return Err(LintConfigError::EmptyRuleId);
            }
            if id.len() > MAX_RULE_ID_LENGTH {
                return Err(LintConfigError::RuleIdTooLong {
                    len: id.len(),
                    max: MAX_RULE_ID_LENGTH,
                });
            }
        }

        Ok(())
    }

    /// Disable a specific rule
    pub fn disable_rule(&mut self, rule_id: &str) {
        self.rules.insert(
            rule_id.to_string(),
            RuleConfig {
                enabled: false,
                error: false,
            },
        );
    }

    /// Enable a specific rule
    pub fn enable_rule(&mut self, rule_id: &str) {
        self.rules.insert(
            rule_id.to_string(),
            RuleConfig {
                enabled: true,
                error: false,
            },
        );
    }

    /// Set a rule to error level
    pub fn set_rule_error(&mut self, rule_id: &str) {
        self.rules.insert(
            rule_id.to_string(),
            RuleConfig {
                enabled: true,
                error: true,
            },
        );
    }

    /// Report only errors.
    pub fn errors_only(mut self) -> Self {
        self.min_severity = Severity::Error;
        self
    }
}

/// Lint runner
pub struct LintRunner {
    config: LintConfig,
    rules: Vec<Box<dyn LintRule>>,
}

impl LintRunner {
    /// Create a new lint runner with default rules
    pub fn new(config: LintConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Create a lint runner with custom rules
    pub fn with_rules(config: LintConfig, rules: Vec<Box<dyn LintRule>>) -> Self {
        Self { config, rules }
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// IDs and descriptions of the registered rules, in run order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|r| (r.id(), r.description()))
    }

    /// Run all enabled rules on a model.
    ///
    /// Issues come back in rule order, and within a rule in model order.
    /// At most `config.max_issues` issues are collected; when the limit is
    /// hit the last entry is a warning saying so.
    pub fn run(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut limit_exceeded = false;

        for rule in &self.rules {
            let rule_id = rule.id();
            let rule_config = self.config.rules.get(rule_id).cloned().unwrap_or_default();

            if !rule_config.enabled {
                continue;
            }

            let mut rule_issues = rule.check(model);

            for issue in &mut rule_issues {
                if rule_config.error && issue.severity() == Severity::Warning {
                    issue.escalate_to_error();
                }
            }

            for issue in rule_issues
                .into_iter()
                .filter(|i| i.severity() >= self.config.min_severity)
            {
                if issues.len() >= self.config.max_issues {
                    limit_exceeded = true;
                    break;
                }
                issues.push(issue);
            }

            if limit_exceeded {
                break;
            }
        }

        if limit_exceeded {
            issues.push(ValidationIssue::warning(
                format!(
                    "issue limit of {} exceeded, further issues were suppressed",
                    self.config.max_issues
                ),
                "lint-runner",
            ));
        }

        issues
    }

    /// Check if any errors were found
    pub fn has_errors(&self, issues: &[ValidationIssue]) -> bool {
        issues.iter().any(|i| i.severity() == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports one warning per table.
    struct PerTableRule;

    impl LintRule for PerTableRule {
        fn id(&self) -> &str {
            "per-table"
        }
        fn description(&self) -> &str {
            "One warning per table"
        }
        fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
            model
                .records(tmdl_core::Collection::Tables)
                .iter()
                .map(|_| ValidationIssue::warning("table", self.id()))
                .collect()
        }
    }

    fn model_with_tables(n: usize) -> CanonicalModel {
        let mut model = CanonicalModel::new();
        for _ in 0..n {
            model.model_mut().tables.push(tmdl_core::Map::new());
        }
        model
    }

    // ==================== LintConfig tests ====================

    #[test]
    fn test_lint_config_default() {
        let config = LintConfig::default();
        assert_eq!(config.min_severity, Severity::Warning);
        assert_eq!(config.max_issues, MAX_ISSUES);
        assert!(config.rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rule_config_overwrite() {
        let mut config = LintConfig::default();
        config.set_rule_error("test");
        config.disable_rule("test");
        let rule = config.rules.get("test").unwrap();
        assert!(!rule.enabled);
        assert!(!rule.error);

        config.enable_rule("test");
        assert!(config.rules.get("test").unwrap().enabled);
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut config = LintConfig::default();
        config.disable_rule("");
        assert_eq!(config.validate(), Err(LintConfigError::EmptyRuleId));

        let mut config = LintConfig::default();
        config.disable_rule(&"x".repeat(101));
        assert_eq!(
            config.validate(),
            Err(LintConfigError::RuleIdTooLong { len: 101, max: 100 })
        );

        let config = LintConfig {
            max_issues: 0,
            ..LintConfig::default()
        };
        assert_eq!(config.validate(), Err(LintConfigError::ZeroIssueLimit));
    }

    // ==================== LintRunner tests ====================

    #[test]
    fn test_runner_with_custom_rules() {
        let runner = LintRunner::with_rules(LintConfig::default(), vec![Box::new(PerTableRule)]);
        let issues = runner.run(&model_with_tables(2));
        assert_eq!(issues.len(), 2);
        assert!(!runner.has_errors(&issues));
    }

    #[test]
    fn test_runner_escalates() {
        let mut config = LintConfig::default();
        config.set_rule_error("per-table");
        let runner = LintRunner::with_rules(config, vec![Box::new(PerTableRule)]);
        let issues = runner.run(&model_with_tables(1));
        assert!(runner.has_errors(&issues));
    }

    #[test]
    fn test_runner_min_severity() {
        let config = LintConfig::default().errors_only();
        let runner = LintRunner::with_rules(config, vec![Box::new(PerTableRule)]);
        assert!(runner.run(&model_with_tables(3)).is_empty());
    }

    #[test]
    fn test_runner_disabled_rule() {
        let mut config = LintConfig::default();
        config.disable_rule("per-table");
        let mut runner = LintRunner::with_rules(config, Vec::new());
        runner.add_rule(Box::new(PerTableRule));
        assert!(runner.run(&model_with_tables(3)).is_empty());
    }

    #[test]
    fn test_runner_issue_limit() {
        let config = LintConfig {
            max_issues: 5,
            ..LintConfig::default()
        };
        let runner = LintRunner::with_rules(config, vec![Box::new(PerTableRule)]);
        let issues = runner.run(&model_with_tables(20));
        assert_eq!(issues.len(), 6);
        assert_eq!(issues[5].rule_id(), "lint-runner");
        assert!(issues[5].message().contains("limit of 5"));
    }

    #[test]
    fn test_runner_lists_rules() {
        let runner = LintRunner::new(LintConfig::default());
        let ids: Vec<&str> = runner.rules().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], "top-level-keys");
    }
}
