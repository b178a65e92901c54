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

//! Validation rules

use crate::diagnostic::ValidationIssue;
use std::collections::{HashMap, HashSet};
use tmdl_core::{CanonicalModel, Collection, Record, Value};

/// Configuration for a single rule
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Whether the rule is enabled
    pub enabled: bool,
    /// Whether to treat warnings as errors
    pub error: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            error: false,
        }
    }
}

/// Trait for validation rules
pub trait LintRule: Send + Sync {
    /// Rule identifier
    fn id(&self) -> &str;

    /// Rule description
    fn description(&self) -> &str;

    /// Run the rule on a model
    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue>;
}

/// Records of a model-level collection with their paths.
///
/// Normalization numbers every element of a collection, and elements that
/// are not objects go to `unrecognized` under their own slot, so those
/// slots are skipped here.
fn records_with_paths(
    model: &CanonicalModel,
    collection: Collection,
) -> impl Iterator<Item = (Vec<String>, &Record)> {
    let is_taken = move |slot: usize| {
        let slot = slot.to_string();
        model
            .unrecognized
            .get(&["model", collection.plural(), slot.as_str()])
            .is_some()
    };
    let mut slot = 0;
    model.records(collection).iter().map(move |record| {
        while is_taken(slot) {
            slot += 1;
        }
        let path = vec![
            "model".to_string(),
            collection.plural().to_string(),
            slot.to_string(),
        ];
        slot += 1;
        (path, record)
    })
}

fn child_path(parent: &[String], segments: &[&str]) -> Vec<String> {
    parent
        .iter()
        .cloned()
        .chain(segments.iter().map(|s| s.to_string()))
        .collect()
}

/// The record's `name` when it is a non-empty string.
fn record_name(record: &Record) -> Option<&str> {
    record
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Describe what is wrong with a record's `name`.
fn name_problem(record: &Record) -> Option<String> {
    match record.get("name") {
        None | Some(Value::Null) => Some("has no name".to_string()),
        Some(Value::String(s)) if s.is_empty() => Some("has an empty name".to_string()),
        Some(Value::String(_)) => None,
        Some(other) => Some(format!("name must be a string, found {}", other.type_name())),
    }
}

/// Records nested under `key` in a parent record, with their list index.
///
/// Items that are not maps are skipped; shape rules report them.
fn nested_records<'a>(record: &'a Record, key: &str) -> impl Iterator<Item = (usize, &'a Record)> {
    record
        .get(key)
        .and_then(Value::as_list)
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .filter_map(|(i, item)| item.as_map().map(|map| (i, map)))
}

/// Rule: top-level keys
pub struct TopLevelKeysRule;

impl LintRule for TopLevelKeysRule {
    fn id(&self) -> &str {
        "top-level-keys"
    }
    fn description(&self) -> &str {
        "Check the model name, compatibility level and model section"
    }

    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        match &model.name {
            None => issues.push(
                ValidationIssue::warning("model has no name", self.id()).with_path(["name"]),
            ),
            Some(Value::String(_)) => {}
            Some(other) => issues.push(
                ValidationIssue::error(
                    format!("name must be a string, found {}", other.type_name()),
                    self.id(),
                )
                .with_path(["name"]),
            ),
        }

        match &model.compatibility_level {
            None => issues.push(
                ValidationIssue::warning("model has no compatibilityLevel", self.id())
                    .with_path(["compatibilityLevel"]),
            ),
            Some(Value::Int(level)) if *level < 0 => issues.push(
                ValidationIssue::error(
                    format!("compatibilityLevel must not be negative, found {}", level),
                    self.id(),
                )
                .with_path(["compatibilityLevel"]),
            ),
            Some(Value::Int(_)) => {}
            Some(other) => issues.push(
                ValidationIssue::error(
                    format!(
                        "compatibilityLevel must be an integer, found {}",
                        other.type_name()
                    ),
                    self.id(),
                )
                .with_path(["compatibilityLevel"]),
            ),
        }

        if model.model.is_none() {
            issues.push(
                ValidationIssue::warning("document has no model section", self.id())
                    .with_path(["model"]),
            );
        }

        issues
    }
}

/// Rule: table shape
pub struct TableShapeRule;

impl TableShapeRule {
    fn check_columns(&self, table: &Record, path: &[String], issues: &mut Vec<ValidationIssue>) {
        let columns = match table.get("columns") {
            None => &[][..],
            Some(Value::List(items)) => items.as_slice(),
            Some(other) => {
                issues.push(
                    ValidationIssue::error(
                        format!("columns must be a list, found {}", other.type_name()),
                        self.id(),
                    )
                    .with_path(child_path(path, &["columns"])),
                );
                &[][..]
            }
        };

        let mut seen = HashSet::new();
        for (i, column) in columns.iter().enumerate() {
            let column_path = child_path(path, &["columns", &i.to_string()]);
            let Some(column) = column.as_map() else {
                issues.push(
                    ValidationIssue::error(
                        format!("column must be an object, found {}", column.type_name()),
                        self.id(),
                    )
                    .with_path(column_path),
                );
                continue;
            };
            if let Some(problem) = name_problem(column) {
                issues.push(
                    ValidationIssue::error(format!("column {}", problem), self.id())
                        .with_path(column_path),
                );
            } else if let Some(name) = record_name(column) {
                if !seen.insert(name) {
                    issues.push(
                        ValidationIssue::warning(
                            format!("duplicate column name '{}'", name),
                            self.id(),
                        )
                        .with_path(column_path),
                    );
                }
            }
        }

        match table.get("columnCount") {
            None | Some(Value::Int(0..)) => {}
            Some(Value::Int(n)) => issues.push(
                ValidationIssue::error(
                    format!("columnCount must not be negative, found {}", n),
                    self.id(),
                )
                .with_path(child_path(path, &["columnCount"])),
            ),
            Some(other) => issues.push(
                ValidationIssue::error(
                    format!("columnCount must be an integer, found {}", other.type_name()),
                    self.id(),
                )
                .with_path(child_path(path, &["columnCount"])),
            ),
        }
    }
}

impl LintRule for TableShapeRule {
    fn id(&self) -> &str {
        "table-shape"
    }
    fn description(&self) -> &str {
        "Check that tables and columns are named and unique"
    }

    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for (path, table) in records_with_paths(model, Collection::Tables) {
            if let Some(problem) = name_problem(table) {
                issues.push(
                    ValidationIssue::error(format!("table {}", problem), self.id())
                        .with_path(path.clone()),
                );
            } else if let Some(name) = record_name(table) {
                if !seen.insert(name) {
                    issues.push(
                        ValidationIssue::error(format!("duplicate table name '{}'", name), self.id())
                            .with_path(path.clone()),
                    );
                }
            }
            self.check_columns(table, &path, &mut issues);
        }

        issues
    }
}

/// A `Table.Column` style reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnRef {
    pub(crate) table: String,
    pub(crate) column: String,
}

/// Read a single-quoted name starting at `s`, with `''` as an escaped quote.
/// Returns the name and the rest after the closing quote.
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let body = s.strip_prefix('\'')?;
    let mut name = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                name.push('\'');
            } else {
                return Some((name, &body[i + 1..]));
            }
        } else {
            name.push(c);
        }
    }
    None
}

fn unquote_name(s: &str) -> Option<String> {
    let s = s.trim();
    if s.starts_with('\'') {
        match split_quoted(s)? {
            (name, "") => Some(name),
            _ => None,
        }
    } else if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse `Table.Column`, `'Table'.'Column'`, `Table[Column]` or
/// `'Table'[Column]`.
pub(crate) fn parse_column_ref(text: &str) -> Option<ColumnRef> {
    let text = text.trim();
    let (table, rest) = if text.starts_with('\'') {
        split_quoted(text)?
    } else {
        let end = text.find(['.', '['])?;
        (text[..end].trim().to_string(), &text[end..])
    };
    if table.is_empty() {
        return None;
    }

    let column = if let Some(inner) = rest.strip_prefix('[') {
        inner.strip_suffix(']')?.trim().to_string()
    } else {
        unquote_name(rest.strip_prefix('.')?)?
    };
    if column.is_empty() {
        return None;
    }
    Some(ColumnRef { table, column })
}

/// Rule: relationship references
pub struct RelationshipReferencesRule;

impl RelationshipReferencesRule {
    /// Resolve one end of a relationship from its `<side>Table` and
    /// `<side>Column` keys.
    fn end(record: &Record, side: &str) -> Option<ColumnRef> {
        let column = record.get(&format!("{}Column", side))?.as_text()?;
        match record.get(&format!("{}Table", side)).and_then(Value::as_text) {
            Some(table) => Some(ColumnRef {
                table: unquote_name(table)?,
                column: parse_column_ref(column)
                    .map(|r| r.column)
                    .or_else(|| unquote_name(column))?,
            }),
            None => parse_column_ref(column),
        }
    }
}

impl LintRule for RelationshipReferencesRule {
    fn id(&self) -> &str {
        "relationship-references"
    }
    fn description(&self) -> &str {
        "Check that relationships refer to tables and columns of the model"
    }

    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let relationships = model.records(Collection::Relationships);
        if relationships.is_empty() {
            return Vec::new();
        }

        let mut columns: HashMap<&str, HashSet<&str>> = HashMap::new();
        for table in model.records(Collection::Tables) {
            let Some(name) = record_name(table) else {
                continue;
            };
            let entry = columns.entry(name).or_default();
            entry.extend(nested_records(table, "columns").filter_map(|(_, c)| record_name(c)));
        }

        let mut issues = Vec::new();
        for (path, relationship) in records_with_paths(model, Collection::Relationships) {
            for side in ["from", "to"] {
                let Some(end) = Self::end(relationship, side) else {
                    issues.push(
                        ValidationIssue::warning(
                            format!("relationship has no resolvable {} column", side),
                            self.id(),
                        )
                        .with_path(child_path(&path, &[&format!("{}Column", side)])),
                    );
                    continue;
                };
                let message = match columns.get(end.table.as_str()) {
                    None => format!("table '{}' is not defined in this model", end.table),
                    Some(names) if !names.contains(end.column.as_str()) => format!(
                        "column '{}' is not defined in table '{}'",
                        end.column, end.table
                    ),
                    Some(_) => continue,
                };
                issues.push(
                    ValidationIssue::warning(message, self.id())
                        .with_path(child_path(&path, &[&format!("{}Column", side)])),
                );
            }
        }
        issues
    }
}

/// Rule: measure expressions
pub struct MeasureExpressionRule;

impl MeasureExpressionRule {
    fn check_measure(&self, measure: &Record, path: Vec<String>, issues: &mut Vec<ValidationIssue>) {
        if let Some(problem) = name_problem(measure) {
            issues.push(
                ValidationIssue::error(format!("measure {}", problem), self.id())
                    .with_path(path.clone()),
            );
        }
        let has_expression = measure
            .get("expression")
            .and_then(Value::as_text)
            .is_some_and(|text| !text.trim().is_empty());
        if !has_expression {
            let label = record_name(measure).unwrap_or("<unnamed>");
            issues.push(
                ValidationIssue::warning(
                    format!("measure '{}' has no expression", label),
                    self.id(),
                )
                .with_path(path),
            );
        }
    }
}

impl LintRule for MeasureExpressionRule {
    fn id(&self) -> &str {
        "measure-expression"
    }
    fn description(&self) -> &str {
        "Check that measures are named and have an expression"
    }

    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (path, measure) in records_with_paths(model, Collection::Measures) {
            self.check_measure(measure, path, &mut issues);
        }
        for (table_path, table) in records_with_paths(model, Collection::Tables) {
            for (i, measure) in nested_records(table, "measures") {
                let path = child_path(&table_path, &["measures", &i.to_string()]);
                self.check_measure(measure, path, &mut issues);
            }
        }
        issues
    }
}

/// Rule: named objects
pub struct NamedObjectsRule;

impl NamedObjectsRule {
    const COLLECTIONS: [Collection; 3] = [
        Collection::Roles,
        Collection::Partitions,
        Collection::Perspectives,
    ];
}

impl LintRule for NamedObjectsRule {
    fn id(&self) -> &str {
        "named-objects"
    }
    fn description(&self) -> &str {
        "Check that roles, partitions and perspectives are named"
    }

    fn check(&self, model: &CanonicalModel) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut report = |record: &Record, keyword: &str, path: Vec<String>| {
            if let Some(problem) = name_problem(record) {
                issues.push(
                    ValidationIssue::error(format!("{} {}", keyword, problem), self.id())
                        .with_path(path),
                );
            }
        };

        for collection in Self::COLLECTIONS {
            for (path, record) in records_with_paths(model, collection) {
                report(record, collection.keyword(), path);
            }
        }
        for (table_path, table) in records_with_paths(model, Collection::Tables) {
            for (i, partition) in nested_records(table, "partitions") {
                let path = child_path(&table_path, &["partitions", &i.to_string()]);
                report(partition, "partition", path);
            }
        }
        issues
    }
}

/// Get the default set of rules, in the order they run.
pub fn default_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(TopLevelKeysRule),
        Box::new(TableShapeRule),
        Box::new(RelationshipReferencesRule),
        Box::new(MeasureExpressionRule),
        Box::new(NamedObjectsRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdl_core::{ExprLanguage, Expression};

    fn record(entries: Vec<(&str, Value)>) -> Record {
        entries.into_iter().collect()
    }

    fn named(name: &str) -> Record {
        record(vec![("name", Value::from(name))])
    }

    fn model_with(collection: Collection, records: Vec<Record>) -> CanonicalModel {
        let mut model = CanonicalModel::new();
        model.name = Some(Value::from("M"));
        model.compatibility_level = Some(Value::Int(1550));
        model.model_mut().collection_mut(collection).extend(records);
        model
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.message()).collect()
    }

    // ==================== RuleConfig tests ====================

    #[test]
    fn test_rule_config_default() {
        let config = RuleConfig::default();
        assert!(config.enabled);
        assert!(!config.error);
    }

    // ==================== TopLevelKeysRule tests ====================

    #[test]
    fn test_top_level_keys_empty_model() {
        let issues = TopLevelKeysRule.check(&CanonicalModel::new());
        assert_eq!(issues.len(), 3);
        assert!(issues
            .iter()
            .all(|i| i.severity() == crate::Severity::Warning));
        assert_eq!(issues[0].path(), ["name"]);
        assert_eq!(issues[1].path(), ["compatibilityLevel"]);
        assert_eq!(issues[2].path(), ["model"]);
    }

    #[test]
    fn test_top_level_keys_wrong_types() {
        let mut model = CanonicalModel::new();
        model.name = Some(Value::Int(5));
        model.compatibility_level = Some(Value::from("high"));
        model.model_mut();
        let issues = TopLevelKeysRule.check(&model);
        assert_eq!(
            messages(&issues),
            vec![
                "name must be a string, found integer",
                "compatibilityLevel must be an integer, found string",
            ]
        );
        assert!(issues.iter().all(|i| i.severity() == crate::Severity::Error));
    }

    #[test]
    fn test_top_level_keys_negative_level() {
        let mut model = model_with(Collection::Tables, vec![]);
        model.compatibility_level = Some(Value::Int(-1));
        let issues = TopLevelKeysRule.check(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), crate::Severity::Error);
    }

    #[test]
    fn test_top_level_keys_valid() {
        let model = model_with(Collection::Tables, vec![]);
        assert!(TopLevelKeysRule.check(&model).is_empty());
    }

    // ==================== TableShapeRule tests ====================

    #[test]
    fn test_table_without_name() {
        let model = model_with(
            Collection::Tables,
            vec![record(vec![("isHidden", Value::Bool(true))])],
        );
        let issues = TableShapeRule.check(&model);
        assert_eq!(messages(&issues), vec!["table has no name"]);
        assert_eq!(issues[0].path(), ["model", "tables", "0"]);
    }

    #[test]
    fn test_paths_skip_unrecognized_slots() {
        let mut model = model_with(Collection::Tables, vec![named("Sales"), record(vec![])]);
        let slot = |i: &str| vec!["model".to_string(), "tables".to_string(), i.to_string()];
        model.unrecognized.insert(slot("0"), Value::from("loose"));
        model.unrecognized.insert(slot("2"), Value::Int(7));
        let issues = TableShapeRule.check(&model);
        assert_eq!(messages(&issues), vec!["table has no name"]);
        assert_eq!(issues[0].path(), ["model", "tables", "3"]);
    }

    #[test]
    fn test_duplicate_table_names() {
        let model = model_with(Collection::Tables, vec![named("Sales"), named("Sales")]);
        let issues = TableShapeRule.check(&model);
        assert_eq!(messages(&issues), vec!["duplicate table name 'Sales'"]);
        assert_eq!(issues[0].severity(), crate::Severity::Error);
        assert_eq!(issues[0].path(), ["model", "tables", "1"]);
    }

    #[test]
    fn test_column_checks() {
        let table = record(vec![
            ("name", Value::from("Sales")),
            (
                "columns",
                Value::List(vec![
                    Value::Map(named("Amount")),
                    Value::Map(named("Amount")),
                    Value::Map(record(vec![("dataType", Value::from("int64"))])),
                    Value::Int(3),
                ]),
            ),
            ("columnCount", Value::Int(-2)),
        ]);
        let issues = TableShapeRule.check(&model_with(Collection::Tables, vec![table]));
        assert_eq!(
            messages(&issues),
            vec![
                "duplicate column name 'Amount'",
                "column has no name",
                "column must be an object, found integer",
                "columnCount must not be negative, found -2",
            ]
        );
        assert_eq!(issues[0].severity(), crate::Severity::Warning);
        assert_eq!(issues[1].path(), ["model", "tables", "0", "columns", "2"]);
    }

    #[test]
    fn test_columns_must_be_list() {
        let table = record(vec![
            ("name", Value::from("Sales")),
            ("columns", Value::from("Amount")),
        ]);
        let issues = TableShapeRule.check(&model_with(Collection::Tables, vec![table]));
        assert_eq!(messages(&issues), vec!["columns must be a list, found string"]);
    }

    // ==================== column reference parsing ====================

    #[test]
    fn test_parse_column_ref_forms() {
        let expected = |t: &str, c: &str| {
            Some(ColumnRef {
                table: t.to_string(),
                column: c.to_string(),
            })
        };
        assert_eq!(parse_column_ref("Sales.ProductKey"), expected("Sales", "ProductKey"));
        assert_eq!(
            parse_column_ref("'Sales Order'.'Order Date'"),
            expected("Sales Order", "Order Date")
        );
        assert_eq!(
            parse_column_ref("'Sales Order'[Order Date]"),
            expected("Sales Order", "Order Date")
        );
        assert_eq!(parse_column_ref("Sales[Amount]"), expected("Sales", "Amount"));
        assert_eq!(
            parse_column_ref("'Bob''s'.Total"),
            expected("Bob's", "Total")
        );
        assert_eq!(parse_column_ref("ProductKey"), None);
        assert_eq!(parse_column_ref("'Sales"), None);
        assert_eq!(parse_column_ref("Sales."), None);
    }

    // ==================== RelationshipReferencesRule tests ====================

    fn star_model(relationship: Record) -> CanonicalModel {
        let sales = record(vec![
            ("name", Value::from("Sales")),
            ("columns", Value::List(vec![Value::Map(named("ProductKey"))])),
        ]);
        let product = record(vec![
            ("name", Value::from("Product")),
            ("columns", Value::List(vec![Value::Map(named("ProductKey"))])),
        ]);
        let mut model = model_with(Collection::Tables, vec![sales, product]);
        model.model_mut().relationships.push(relationship);
        model
    }

    #[test]
    fn test_relationship_qualified_columns_resolve() {
        let model = star_model(record(vec![
            ("fromColumn", Value::from("Sales.ProductKey")),
            ("toColumn", Value::from("'Product'[ProductKey]")),
        ]));
        assert!(RelationshipReferencesRule.check(&model).is_empty());
    }

    #[test]
    fn test_relationship_table_column_pairs_resolve() {
        let model = star_model(record(vec![
            ("fromTable", Value::from("Sales")),
            ("fromColumn", Value::from("ProductKey")),
            ("toTable", Value::from("'Product'")),
            ("toColumn", Value::from("ProductKey")),
        ]));
        assert!(RelationshipReferencesRule.check(&model).is_empty());
    }

    #[test]
    fn test_relationship_unknown_references() {
        let model = star_model(record(vec![
            ("fromColumn", Value::from("Orders.ProductKey")),
            ("toColumn", Value::from("Product.Key")),
        ]));
        let issues = RelationshipReferencesRule.check(&model);
        assert_eq!(
            messages(&issues),
            vec![
                "table 'Orders' is not defined in this model",
                "column 'Key' is not defined in table 'Product'",
            ]
        );
        assert!(issues
            .iter()
            .all(|i| i.severity() == crate::Severity::Warning));
        assert_eq!(issues[1].path(), ["model", "relationships", "0", "toColumn"]);
    }

    #[test]
    fn test_relationship_missing_end() {
        let model = star_model(record(vec![("fromColumn", Value::from("Sales.ProductKey"))]));
        let issues = RelationshipReferencesRule.check(&model);
        assert_eq!(messages(&issues), vec!["relationship has no resolvable to column"]);
    }

    // ==================== MeasureExpressionRule tests ====================

    #[test]
    fn test_measures_model_and_table_level() {
        let table = record(vec![
            ("name", Value::from("Sales")),
            (
                "measures",
                Value::List(vec![
                    Value::Map(record(vec![
                        ("name", Value::from("Total")),
                        (
                            "expression",
                            Value::Expression(Expression::new("SUM(x)", ExprLanguage::Dax)),
                        ),
                    ])),
                    Value::Map(named("Empty")),
                ]),
            ),
        ]);
        let mut model = model_with(Collection::Tables, vec![table]);
        model.model_mut().measures.push(record(vec![(
            "expression",
            Value::from("1"),
        )]));

        let issues = MeasureExpressionRule.check(&model);
        assert_eq!(
            messages(&issues),
            vec!["measure has no name", "measure 'Empty' has no expression"]
        );
        assert_eq!(issues[0].severity(), crate::Severity::Error);
        assert_eq!(issues[0].path(), ["model", "measures", "0"]);
        assert_eq!(issues[1].severity(), crate::Severity::Warning);
        assert_eq!(issues[1].path(), ["model", "tables", "0", "measures", "1"]);
    }

    // ==================== NamedObjectsRule tests ====================

    #[test]
    fn test_named_objects() {
        let table = record(vec![
            ("name", Value::from("Sales")),
            (
                "partitions",
                Value::List(vec![Value::Map(record(vec![("mode", Value::from("import"))]))]),
            ),
        ]);
        let mut model = model_with(Collection::Tables, vec![table]);
        model.model_mut().roles.push(named("Reader"));
        model.model_mut().perspectives.push(record(vec![("name", Value::from(""))]));

        let issues = NamedObjectsRule.check(&model);
        assert_eq!(
            messages(&issues),
            vec!["perspective has an empty name", "partition has no name"]
        );
        assert_eq!(issues[1].path(), ["model", "tables", "0", "partitions", "0"]);
    }

    #[test]
    fn test_default_rule_order() {
        let ids: Vec<String> = default_rules().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "top-level-keys",
                "table-shape",
                "relationship-references",
                "measure-expression",
                "named-objects",
            ]
        );
    }
}
