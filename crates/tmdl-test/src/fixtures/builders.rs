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

//! Builder pattern for creating customizable test fixtures.
//!
//! This module provides fluent builders for constructing canonical models
//! and their records without going through the parser.

use tmdl_core::{CanonicalModel, Collection, ExprLanguage, Expression, Record, Value};

/// Builder for creating customizable [`CanonicalModel`] fixtures.
///
/// # Examples
///
/// ```
/// use tmdl_test::fixtures::builders::{ModelBuilder, RecordBuilder};
/// use tmdl_core::{Collection, Value};
///
/// let model = ModelBuilder::new()
///     .name("Sales")
///     .compatibility_level(1575)
///     .property("culture", Value::from("en-US"))
///     .record(Collection::Tables, RecordBuilder::named("Sales").build())
///     .build();
///
/// assert_eq!(model.name, Some(Value::from("Sales")));
/// assert_eq!(model.records(Collection::Tables).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    model: CanonicalModel,
}

impl ModelBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level `name`.
    pub fn name(mut self, name: &str) -> Self {
        self.model.name = Some(Value::from(name));
        self
    }

    /// Sets the top-level `compatibilityLevel`.
    pub fn compatibility_level(mut self, level: i64) -> Self {
        self.model.compatibility_level = Some(Value::Int(level));
        self
    }

    /// Adds a model property, creating the model section.
    pub fn property(mut self, key: &str, value: Value) -> Self {
        self.model.model_mut().properties.insert(key, value);
        self
    }

    /// Appends a record to a collection, creating the model section.
    pub fn record(mut self, collection: Collection, record: Record) -> Self {
        self.model.model_mut().collection_mut(collection).push(record);
        self
    }

    /// Creates an empty model section.
    pub fn section(mut self) -> Self {
        self.model.model_mut();
        self
    }

    /// Adds a value to the unrecognized bucket.
    pub fn unrecognized(mut self, path: &[&str], value: Value) -> Self {
        let path = path.iter().map(|s| s.to_string()).collect();
        self.model.unrecognized.insert(path, value);
        self
    }

    /// Builds the model.
    pub fn build(self) -> CanonicalModel {
        self.model
    }
}

/// Builder for a single ordered record.
///
/// # Examples
///
/// ```
/// use tmdl_test::fixtures::builders::RecordBuilder;
///
/// let measure = RecordBuilder::named("Total")
///     .dax("expression", "SUM(Sales[Amount])")
///     .text("formatString", "#,0.00")
///     .build();
/// assert_eq!(measure.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record whose first entry is `name`.
    pub fn named(name: &str) -> Self {
        Self::new().text("name", name)
    }

    /// Adds an arbitrary value.
    pub fn value(mut self, key: &str, value: Value) -> Self {
        self.record.insert(key, value);
        self
    }

    /// Adds a string value.
    pub fn text(self, key: &str, text: &str) -> Self {
        self.value(key, Value::from(text))
    }

    /// Adds an integer value.
    pub fn int(self, key: &str, n: i64) -> Self {
        self.value(key, Value::Int(n))
    }

    /// Adds a `true` flag.
    pub fn flag(self, key: &str) -> Self {
        self.value(key, Value::Bool(true))
    }

    /// Adds a DAX expression.
    pub fn dax(self, key: &str, text: &str) -> Self {
        self.value(key, Value::Expression(Expression::new(text, ExprLanguage::Dax)))
    }

    /// Adds an M expression.
    pub fn m(self, key: &str, text: &str) -> Self {
        self.value(key, Value::Expression(Expression::new(text, ExprLanguage::M)))
    }

    /// Adds a list of child records.
    pub fn children(self, key: &str, children: Vec<Record>) -> Self {
        let items = children.into_iter().map(Value::Map).collect();
        self.value(key, Value::List(items))
    }

    /// Builds the record.
    pub fn build(self) -> Record {
        self.record
    }
}
