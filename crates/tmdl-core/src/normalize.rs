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

//! Normalization of the generic parse tree into a [`CanonicalModel`].
//!
//! Normalization is total: every node lands either in a typed slot of the
//! model or in the unrecognized bucket under its path. The only failure is a
//! tree that is internally inconsistent (a keyless child inside an object or
//! a keyed child inside an array).
//!
//! # Paths
//!
//! Unrecognized values are keyed by the path of their canonical location:
//!
//! - root keys: `["extraFlag"]`
//! - database properties: `["database", "id"]`
//! - model keys: `["model", "queryGroup"]`
//! - collection elements that are not objects: `["model", "tables", "3"]`,
//!   where the index is the element's slot in the collection
//! - duplicates inside records: `["model", "tables", "0", "dataType"]`
//! - a non-object root: `[]`

use crate::canonical::{CanonicalModel, ModelSection, Unrecognized};
use crate::document::Document;
use crate::error::{TmdlError, TmdlErrorKind, TmdlResult};
use crate::lex::{classify, LiteralKind};
use crate::lex::scalar::parse_finite_f64;
use crate::node::{NodeValue, ParseNode, Scalar, ScalarKind};
use crate::schema::{self, Collection};
use crate::value::{Expression, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Coerce a scalar to a typed value.
///
/// Quoted strings, names and embedded expressions are never coerced. Bare
/// text is tried as boolean, null, integer and decimal in that order.
pub fn coerce_scalar(scalar: &Scalar) -> Value {
    match scalar.kind {
        ScalarKind::Quoted | ScalarKind::Name => Value::String(scalar.text.clone()),
        ScalarKind::Embedded(language) => {
            Value::Expression(Expression::new(scalar.text.clone(), language))
        }
        ScalarKind::Bare => coerce_bare(&scalar.text),
    }
}

fn coerce_bare(text: &str) -> Value {
    match classify(text) {
        LiteralKind::Boolean => Value::Bool(text == "true"),
        LiteralKind::Null => Value::Null,
        LiteralKind::Integer => match text.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::String(text.to_string()),
        },
        LiteralKind::Decimal => match parse_finite_f64(text) {
            Some(f) => Value::Float(f),
            None => Value::String(text.to_string()),
        },
        LiteralKind::Text => Value::String(text.to_string()),
    }
}

fn structural(message: impl Into<String>, node: &ParseNode) -> TmdlError {
    TmdlError::at(TmdlErrorKind::Structural, message, node.pos)
}

fn child_path(path: &[String], segment: impl Into<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(segment.into());
    out
}

fn key_of<'a>(child: &'a ParseNode, parent: &ParseNode) -> TmdlResult<&'a str> {
    child.key().ok_or_else(|| {
        structural(
            format!(
                "keyless {} inside an object started at line {}",
                child.value.type_name(),
                parent.pos.line()
            ),
            child,
        )
    })
}

/// Normalizer state for one document.
struct Normalizer {
    model: CanonicalModel,
    /// Next slot of each collection, counting records and non-object
    /// elements alike.
    slots: BTreeMap<Collection, usize>,
}

impl Normalizer {
    fn new() -> Self {
        Self {
            model: CanonicalModel::new(),
            slots: BTreeMap::new(),
        }
    }

    fn unrecognized(&mut self) -> &mut Unrecognized {
        &mut self.model.unrecognized
    }

    // ==================== Root ====================

    fn root(&mut self, root: &ParseNode) -> TmdlResult<()> {
        let NodeValue::Object(children) = &root.value else {
            let value = convert_value(root, &[], &mut self.model.unrecognized)?;
            self.unrecognized().insert(Vec::new(), value);
            return Ok(());
        };

        for child in children {
            let key = key_of(child, root)?;
            match key {
                "name" | "compatibilityLevel" => self.top_level_field(key, child, &[])?,
                "model" => match &child.value {
                    NodeValue::Object(_) => {
                        self.model.model_mut();
                        self.model_members(child)?;
                    }
                    _ => self.reject(child, &[], key)?,
                },
                "database" => self.database(child)?,
                _ => self.model_level(child, key, &[])?,
            }
        }
        Ok(())
    }

    /// `name` or `compatibilityLevel`: the first occurrence wins.
    fn top_level_field(&mut self, key: &str, node: &ParseNode, path: &[String]) -> TmdlResult<()> {
        let value = convert_value(node, &child_path(path, key), &mut self.model.unrecognized)?;
        let slot = match key {
            "name" => &mut self.model.name,
            _ => &mut self.model.compatibility_level,
        };
        if slot.is_none() {
            *slot = Some(value);
        } else {
            self.unrecognized().insert(child_path(path, key), value);
        }
        Ok(())
    }

    fn database(&mut self, node: &ParseNode) -> TmdlResult<()> {
        let NodeValue::Object(children) = &node.value else {
            return self.reject(node, &[], "database");
        };
        let base = vec!["database".to_string()];
        for child in children {
            let key = key_of(child, node)?;
            let absent = match key {
                "name" => self.model.name.is_none(),
                "compatibilityLevel" => self.model.compatibility_level.is_none(),
                _ => false,
            };
            if absent {
                self.top_level_field(key, child, &[])?;
            } else {
                self.reject(child, &base, key)?;
            }
        }
        Ok(())
    }

    // ==================== Model ====================

    fn model_members(&mut self, node: &ParseNode) -> TmdlResult<()> {
        let base = vec!["model".to_string()];
        for child in node.children() {
            let key = key_of(child, node)?;
            self.model_level(child, key, &base)?;
        }
        Ok(())
    }

    /// Route a key found at root or model level. Unknown keys are recorded
    /// under `path`.
    fn model_level(&mut self, node: &ParseNode, key: &str, path: &[String]) -> TmdlResult<()> {
        if let Some(collection) = Collection::from_keyword(key) {
            if node.is_object() {
                return self.push_element(collection, node);
            }
        }
        if let Some(collection) = Collection::from_plural(key) {
            if let NodeValue::Array(items) = &node.value {
                self.model.model_mut();
                for item in items {
                    if item.key.is_some() {
                        return Err(structural("keyed element inside an array", item));
                    }
                    self.push_element(collection, item)?;
                }
                return Ok(());
            }
        }
        if schema::is_model_property(key) && path.first().map(String::as_str) == Some("model") {
            let value = convert_value(node, &child_path(path, key), &mut self.model.unrecognized)?;
            let section = self.model.model_mut();
            if section.properties.contains_key(key) {
                self.unrecognized().insert(child_path(path, key), value);
            } else {
                section.properties.insert(key, value);
            }
            return Ok(());
        }
        self.reject(node, path, key)
    }

    /// Append one collection element: objects become records, anything
    /// else is kept under its slot.
    fn push_element(&mut self, collection: Collection, node: &ParseNode) -> TmdlResult<()> {
        let slot = self.slots.entry(collection).or_insert(0);
        let index = *slot;
        *slot += 1;

        let path = vec![
            "model".to_string(),
            collection.plural().to_string(),
            index.to_string(),
        ];
        match &node.value {
            NodeValue::Object(children) => {
                let record = convert_object(node, children, &path, &mut self.model.unrecognized)?;
                self.model.model_mut().collection_mut(collection).push(record);
            }
            _ => {
                let value = convert_value(node, &path, &mut self.model.unrecognized)?;
                self.model.model_mut();
                self.unrecognized().insert(path, value);
            }
        }
        Ok(())
    }

    fn reject(&mut self, node: &ParseNode, path: &[String], key: &str) -> TmdlResult<()> {
        let path = child_path(path, key);
        let value = convert_value(node, &path, &mut self.model.unrecognized)?;
        self.unrecognized().insert(path, value);
        Ok(())
    }
}

/// Convert any node to a value. Duplicates found inside objects are
/// recorded in `bucket` relative to `path`.
fn convert_value(node: &ParseNode, path: &[String], bucket: &mut Unrecognized) -> TmdlResult<Value> {
    match &node.value {
        NodeValue::Scalar(scalar) => Ok(coerce_scalar(scalar)),
        NodeValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                if item.key.is_some() {
                    return Err(structural("keyed element inside an array", item));
                }
                out.push(convert_value(item, &child_path(path, idx.to_string()), bucket)?);
            }
            Ok(Value::List(out))
        }
        NodeValue::Object(children) => Ok(Value::Map(convert_object(node, children, path, bucket)?)),
    }
}

/// Convert object members to an ordered map.
///
/// Nested declarations (`column X`) are collected under their plural key
/// (`columns`). A repeated key keeps its first value; later ones go to the
/// bucket.
fn convert_object(
    node: &ParseNode,
    children: &[ParseNode],
    path: &[String],
    bucket: &mut Unrecognized,
) -> TmdlResult<Map> {
    let mut map = Map::new();
    for child in children {
        let key = key_of(child, node)?;

        if let (Some(plural), NodeValue::Object(_)) = (schema::nested_plural(key), &child.value) {
            let index = match map.get(plural) {
                Some(Value::List(items)) => Some(items.len()),
                Some(_) => None,
                None => Some(0),
            };
            match index {
                Some(index) => {
                    let item_path = child_path(&child_path(path, plural), index.to_string());
                    let value = convert_value(child, &item_path, bucket)?;
                    match map.get_mut(plural) {
                        Some(Value::List(items)) => items.push(value),
                        _ => {
                            map.insert(plural, Value::List(vec![value]));
                        }
                    }
                }
                None => {
                    let item_path = child_path(path, key);
                    let value = convert_value(child, &item_path, bucket)?;
                    bucket.insert(item_path, value);
                }
            }
            continue;
        }

        let item_path = child_path(path, key);
        let value = convert_value(child, &item_path, bucket)?;
        if map.contains_key(key) {
            bucket.insert(item_path, value);
        } else {
            map.insert(key, value);
        }
    }
    Ok(map)
}

/// Normalize a parse tree.
pub fn normalize_tree(root: &ParseNode) -> TmdlResult<CanonicalModel> {
    let mut normalizer = Normalizer::new();
    normalizer.root(root)?;
    let model = normalizer.model;
    debug!(
        records = model.model.as_ref().map_or(0, ModelSection::record_count),
        unrecognized = model.unrecognized.value_count(),
        "normalized model"
    );
    Ok(model)
}

/// Normalize a parsed document.
pub fn normalize(doc: &Document) -> TmdlResult<CanonicalModel> {
    normalize_tree(&doc.root)
}
