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

//! Keyword tables for the tabular object model.
//!
//! These tables drive routing in the normalizer, default property names in
//! the tree builder and the default expression language in the tokenizer.

/// Object collections held by a model section, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Tables,
    Relationships,
    Measures,
    Roles,
    Partitions,
    Perspectives,
    Cultures,
    Expressions,
    DataSources,
    Annotations,
}

impl Collection {
    pub const ALL: [Collection; 10] = [
        Collection::Tables,
        Collection::Relationships,
        Collection::Measures,
        Collection::Roles,
        Collection::Partitions,
        Collection::Perspectives,
        Collection::Cultures,
        Collection::Expressions,
        Collection::DataSources,
        Collection::Annotations,
    ];

    /// Declaration keyword (`table Sales`).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Tables => "table",
            Self::Relationships => "relationship",
            Self::Measures => "measure",
            Self::Roles => "role",
            Self::Partitions => "partition",
            Self::Perspectives => "perspective",
            Self::Cultures => "cultureInfo",
            Self::Expressions => "expression",
            Self::DataSources => "dataSource",
            Self::Annotations => "annotation",
        }
    }

    /// Key of the collection in JSON form and canonical output.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Relationships => "relationships",
            Self::Measures => "measures",
            Self::Roles => "roles",
            Self::Partitions => "partitions",
            Self::Perspectives => "perspectives",
            Self::Cultures => "cultures",
            Self::Expressions => "expressions",
            Self::DataSources => "dataSources",
            Self::Annotations => "annotations",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }

    pub fn from_plural(plural: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.plural() == plural)
    }
}

/// Properties recognized directly on the model object.
pub const MODEL_PROPERTIES: &[&str] = &[
    "name",
    "description",
    "culture",
    "collation",
    "defaultMode",
    "defaultDataView",
    "defaultPowerBIDataSourceVersion",
    "discourageImplicitMeasures",
    "sourceQueryCulture",
    "dataAccessOptions",
    "forceUniqueNames",
    "valueFilterBehavior",
    "dataSourceVariablesOverrideBehavior",
    "dataSourceDefaultMaxConnections",
    "disableAutoExists",
    "maxParallelismPerQuery",
    "maxParallelismPerRefresh",
    "directLakeBehavior",
    "automaticAggregationOptions",
];

pub fn is_model_property(key: &str) -> bool {
    MODEL_PROPERTIES.contains(&key)
}

/// Declaration keywords that may nest inside another object, with the key
/// their records are collected under.
const NESTED: &[(&str, &str)] = &[
    ("column", "columns"),
    ("measure", "measures"),
    ("partition", "partitions"),
    ("hierarchy", "hierarchies"),
    ("level", "levels"),
    ("annotation", "annotations"),
    ("extendedProperty", "extendedProperties"),
    ("calculationItem", "calculationItems"),
    ("tablePermission", "tablePermissions"),
    ("columnPermission", "columnPermissions"),
    ("member", "members"),
    ("variation", "variations"),
    ("perspectiveTable", "perspectiveTables"),
    ("perspectiveColumn", "perspectiveColumns"),
    ("perspectiveMeasure", "perspectiveMeasures"),
    ("perspectiveHierarchy", "perspectiveHierarchies"),
];

/// Plural key for a declaration nested inside another object.
pub fn nested_plural(keyword: &str) -> Option<&'static str> {
    NESTED
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, plural)| *plural)
}

/// Declaration keyword whose records are collected under `plural`.
pub fn nested_keyword(plural: &str) -> Option<&'static str> {
    NESTED
        .iter()
        .find(|(_, p)| *p == plural)
        .map(|(keyword, _)| *keyword)
}

/// Property that receives the value written after `=` on a declaration.
pub fn default_property(keyword: &str) -> &'static str {
    match keyword {
        "annotation" | "extendedProperty" => "value",
        "partition" => "type",
        _ => "expression",
    }
}

/// Whether the `=` value of this declaration names a kind rather than
/// holding code, so a single inline word is read as plain text.
pub fn default_is_word(keyword: &str) -> bool {
    default_property(keyword) == "type"
}

/// A single word as written after `=`: no whitespace and no fence.
pub fn is_default_word(text: &str) -> bool {
    !text.is_empty() && !text.starts_with('`') && !text.contains(char::is_whitespace)
}

/// Whether an `=` block on this declaration or property holds M code.
pub fn is_m_expression(keyword: Option<&str>, key: Option<&str>) -> bool {
    matches!(keyword, Some("expression"))
        || matches!(key, Some("source" | "query" | "mExpression"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trips_names() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_keyword(c.keyword()), Some(c));
            assert_eq!(Collection::from_plural(c.plural()), Some(c));
        }
        assert_eq!(Collection::from_keyword("column"), None);
    }

    #[test]
    fn test_nested_plural() {
        assert_eq!(nested_plural("column"), Some("columns"));
        assert_eq!(nested_plural("hierarchy"), Some("hierarchies"));
        assert_eq!(nested_plural("table"), None);
        assert_eq!(nested_keyword("perspectiveTables"), Some("perspectiveTable"));
        assert_eq!(nested_keyword("tables"), None);
    }

    #[test]
    fn test_default_property() {
        assert_eq!(default_property("measure"), "expression");
        assert_eq!(default_property("annotation"), "value");
        assert_eq!(default_property("partition"), "type");
        assert!(default_is_word("partition"));
        assert!(!default_is_word("measure"));
    }

    #[test]
    fn test_default_word() {
        assert!(is_default_word("m"));
        assert!(is_default_word("calculated"));
        assert!(!is_default_word("let x = 1 in x"));
        assert!(!is_default_word("```"));
        assert!(!is_default_word(""));
    }

    #[test]
    fn test_m_expression_detection() {
        assert!(is_m_expression(Some("expression"), None));
        assert!(is_m_expression(None, Some("source")));
        assert!(!is_m_expression(Some("measure"), None));
        assert!(!is_m_expression(None, Some("expression")));
    }
}
