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

//! Canonical, schema-shaped model produced by normalization.

use crate::schema::Collection;
use crate::value::{Map, Record, Value};
use std::collections::BTreeMap;

/// The `model` section: known properties plus ordered object collections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSection {
    pub properties: Map,
    pub tables: Vec<Record>,
    pub relationships: Vec<Record>,
    pub measures: Vec<Record>,
    pub roles: Vec<Record>,
    pub partitions: Vec<Record>,
    pub perspectives: Vec<Record>,
    pub cultures: Vec<Record>,
    pub expressions: Vec<Record>,
    pub data_sources: Vec<Record>,
    pub annotations: Vec<Record>,
}

impl ModelSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, collection: Collection) -> &[Record] {
        match collection {
            Collection::Tables => &self.tables,
            Collection::Relationships => &self.relationships,
            Collection::Measures => &self.measures,
            Collection::Roles => &self.roles,
            Collection::Partitions => &self.partitions,
            Collection::Perspectives => &self.perspectives,
            Collection::Cultures => &self.cultures,
            Collection::Expressions => &self.expressions,
            Collection::DataSources => &self.data_sources,
            Collection::Annotations => &self.annotations,
        }
    }

    pub fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Tables => &mut self.tables,
            Collection::Relationships => &mut self.relationships,
            Collection::Measures => &mut self.measures,
            Collection::Roles => &mut self.roles,
            Collection::Partitions => &mut self.partitions,
            Collection::Perspectives => &mut self.perspectives,
            Collection::Cultures => &mut self.cultures,
            Collection::Expressions => &mut self.expressions,
            Collection::DataSources => &mut self.data_sources,
            Collection::Annotations => &mut self.annotations,
        }
    }

    /// Non-empty collections in canonical order.
    pub fn collections(&self) -> impl Iterator<Item = (Collection, &[Record])> {
        Collection::ALL
            .into_iter()
            .map(move |c| (c, self.collection(c)))
            .filter(|(_, records)| !records.is_empty())
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        Collection::ALL
            .into_iter()
            .map(|c| self.collection(c).len())
            .sum()
    }
}

/// Values that did not map onto the schema, keyed by their path.
///
/// Paths are compared as a whole, so the bucket does not depend on the order
/// in which different paths were encountered. Values sharing a path keep
/// their source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unrecognized {
    entries: BTreeMap<Vec<String>, Vec<Value>>,
}

impl Unrecognized {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: Vec<String>, value: Value) {
        self.entries.entry(path).or_default().push(value);
    }

    /// First value recorded at a path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        self.get_all(path).and_then(|values| values.first())
    }

    pub fn get_all(&self, path: &[&str]) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(k, _)| k.iter().map(String::as_str).eq(path.iter().copied()))
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], &[Value])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all paths.
    pub fn value_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Dotted form of an unrecognized path, as used in JSON output.
pub fn path_key(path: &[String]) -> String {
    path.join(".")
}

/// A normalized TMDL document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalModel {
    pub name: Option<Value>,
    pub compatibility_level: Option<Value>,
    pub model: Option<ModelSection>,
    pub unrecognized: Unrecognized,
}

impl CanonicalModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model section, created on first use.
    pub fn model_mut(&mut self) -> &mut ModelSection {
        self.model.get_or_insert_with(ModelSection::new)
    }

    /// Records of a collection; empty when there is no model section.
    pub fn records(&self, collection: Collection) -> &[Record] {
        self.model
            .as_ref()
            .map_or(&[], |model| model.collection(collection))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{path_key, CanonicalModel, ModelSection, Unrecognized};
    use serde::ser::{SerializeMap, Serializer};
    use serde::Serialize;

    impl Serialize for ModelSection {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut out = serializer.serialize_map(None)?;
            for (k, v) in self.properties.iter() {
                out.serialize_entry(k, v)?;
            }
            for (collection, records) in self.collections() {
                out.serialize_entry(collection.plural(), records)?;
            }
            out.end()
        }
    }

    impl Serialize for Unrecognized {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut out = serializer.serialize_map(Some(self.len()))?;
            for (path, values) in self.iter() {
                out.serialize_entry(&path_key(path), values)?;
            }
            out.end()
        }
    }

    impl Serialize for CanonicalModel {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut out = serializer.serialize_map(None)?;
            if let Some(name) = &self.name {
                out.serialize_entry("name", name)?;
            }
            if let Some(level) = &self.compatibility_level {
                out.serialize_entry("compatibilityLevel", level)?;
            }
            if let Some(model) = &self.model {
                out.serialize_entry("model", model)?;
            }
            if !self.unrecognized.is_empty() {
                out.serialize_entry("unrecognized", &self.unrecognized)?;
            }
            out.end()
        }
    }
}
