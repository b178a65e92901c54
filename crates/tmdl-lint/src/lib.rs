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

//! TMDL Validation
//!
//! Checks a normalized [`CanonicalModel`] for missing or malformed content.
//! Validation never fails and never changes the model: it returns a list of
//! [`ValidationIssue`]s, in rule order.
//!
//! ## Rules
//!
//! | ID | Checks |
//! |----|--------|
//! | `top-level-keys` | `name`, `compatibilityLevel` and the model section |
//! | `table-shape` | table and column names, column lists |
//! | `relationship-references` | relationship ends name known tables and columns |
//! | `measure-expression` | measures have a name and an expression |
//! | `named-objects` | roles, partitions and perspectives have names |
//!
//! ## Quick Start
//!
//! ```rust
//! use tmdl_core::CanonicalModel;
//! use tmdl_lint::{validate, Severity};
//!
//! let issues = validate(&CanonicalModel::new());
//!
//! // name, compatibilityLevel and model are all missing
//! assert_eq!(issues.len(), 3);
//! assert!(issues.iter().all(|i| i.severity() == Severity::Warning));
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use tmdl_core::CanonicalModel;
//! use tmdl_lint::{validate_with_config, LintConfig, Severity};
//!
//! let mut config = LintConfig::default();
//! config.disable_rule("relationship-references");
//! config.set_rule_error("top-level-keys");
//!
//! let issues = validate_with_config(&CanonicalModel::new(), config);
//! assert!(issues.iter().all(|i| i.severity() == Severity::Error));
//! ```
//!
//! ## Custom Rules
//!
//! ```rust
//! use tmdl_core::{CanonicalModel, Collection};
//! use tmdl_lint::{LintConfig, LintRule, LintRunner, ValidationIssue};
//!
//! struct NoCalculatedTables;
//!
//! impl LintRule for NoCalculatedTables {
//!     fn id(&self) -> &str { "no-calculated-tables" }
//!     fn description(&self) -> &str { "Calculated tables are not allowed" }
//!     fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
//!         model
//!             .records(Collection::Partitions)
//!             .iter()
//!             .filter(|p| p.get("type").and_then(|v| v.as_str()) == Some("calculated"))
//!             .map(|_| ValidationIssue::error("calculated partition", self.id()))
//!             .collect()
//!     }
//! }
//!
//! let mut runner = LintRunner::new(LintConfig::default());
//! runner.add_rule(Box::new(NoCalculatedTables));
//! let issues = runner.run(&CanonicalModel::new());
//! ```

mod diagnostic;
mod rules;
mod runner;

pub use diagnostic::{Severity, ValidationIssue};
pub use rules::{LintRule, RuleConfig};
pub use runner::{LintConfig, LintConfigError, LintRunner};

use tmdl_core::CanonicalModel;

/// Run all default rules on a model
pub fn validate(model: &CanonicalModel) -> Vec<ValidationIssue> {
    let runner = LintRunner::new(LintConfig::default());
    runner.run(model)
}

/// Run validation with custom configuration
pub fn validate_with_config(model: &CanonicalModel, config: LintConfig) -> Vec<ValidationIssue> {
    let runner = LintRunner::new(config);
    runner.run(model)
}
