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

//! Output layout.
//!
//! A [`CanonicalModel`] keeps unrecognized values apart from the typed
//! fields. Before writing, both are merged back into one ordered tree in
//! which keys may repeat, so that parsing the output routes every value to
//! the same place again.

use std::cmp::Ordering;
use tmdl_core::{path_key, CanonicalModel, Map, TmdlError, TmdlResult, Value};

/// Ordered output tree. Maps may hold the same key more than once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Layout {
    /// Any value other than a list or a map.
    Scalar(Value),
    Map(Vec<(String, Layout)>),
    List(Vec<Layout>),
}

impl Layout {
    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::List(items) => Self::List(items.iter().map(Self::from_value).collect()),
            Value::Map(map) => Self::from_map(map),
            other => Self::Scalar(other.clone()),
        }
    }

    pub(crate) fn from_map(map: &Map) -> Self {
        Self::Map(
            map.iter()
                .map(|(k, v)| (k.to_string(), Self::from_value(v)))
                .collect(),
        )
    }

    fn is_container(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

/// Order paths segment by segment, comparing numeric segments as numbers.
///
/// A path sorts before every path it is a prefix of.
pub(crate) fn compare_paths(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x.parse::<usize>(), y.parse::<usize>()) {
            (Ok(m), Ok(n)) => m.cmp(&n),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn unplaceable(path: &[String]) -> TmdlError {
    TmdlError::conversion(format!(
        "unrecognized value at '{}' has no container in the output",
        path_key(path)
    ))
}

fn canonical_root(model: &CanonicalModel) -> Layout {
    let mut entries = Vec::new();
    if let Some(name) = &model.name {
        entries.push(("name".to_string(), Layout::from_value(name)));
    }
    if let Some(level) = &model.compatibility_level {
        entries.push(("compatibilityLevel".to_string(), Layout::from_value(level)));
    }
    if let Some(section) = &model.model {
        let mut members: Vec<(String, Layout)> = section
            .properties
            .iter()
            .map(|(k, v)| (k.to_string(), Layout::from_value(v)))
            .collect();
        for (collection, records) in section.collections() {
            let items = records.iter().map(Layout::from_map).collect();
            members.push((collection.plural().to_string(), Layout::List(items)));
        }
        entries.push(("model".to_string(), Layout::Map(members)));
    }
    Layout::Map(entries)
}

/// Step into the container at `segment`, creating it when absent. A
/// created container is a list when the following segment is an index.
fn descend<'a>(
    node: &'a mut Layout,
    segment: &str,
    next: &str,
    path: &[String],
) -> TmdlResult<&'a mut Layout> {
    let fresh = || {
        if next.parse::<usize>().is_ok() {
            Layout::List(Vec::new())
        } else {
            Layout::Map(Vec::new())
        }
    };
    match node {
        Layout::Map(entries) => {
            let found = entries
                .iter()
                .rposition(|(k, v)| k == segment && v.is_container());
            let index = match found {
                Some(index) => index,
                None => {
                    entries.push((segment.to_string(), fresh()));
                    entries.len() - 1
                }
            };
            Ok(&mut entries[index].1)
        }
        Layout::List(items) => {
            let index = match segment.parse::<usize>() {
                Ok(index) if index < items.len() => index,
                _ => {
                    items.push(fresh());
                    items.len() - 1
                }
            };
            Ok(&mut items[index])
        }
        Layout::Scalar(_) => Err(unplaceable(path)),
    }
}

fn place(root: &mut Layout, path: &[String], value: Layout) -> TmdlResult<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(unplaceable(path));
    };
    let mut node = root;
    for (i, segment) in parents.iter().enumerate() {
        node = descend(node, segment, &path[i + 1], path)?;
    }
    match node {
        Layout::Map(entries) => entries.push((last.clone(), value)),
        Layout::List(items) => {
            let index = last
                .parse::<usize>()
                .map_or(items.len(), |i| i.min(items.len()));
            items.insert(index, value);
        }
        Layout::Scalar(_) => return Err(unplaceable(path)),
    }
    Ok(())
}

/// Merge the typed fields and the unrecognized bucket into one tree.
pub(crate) fn build(model: &CanonicalModel) -> TmdlResult<Layout> {
    let mut entries: Vec<(&[String], &[Value])> = model.unrecognized.iter().collect();
    entries.sort_by(|a, b| compare_paths(a.0, b.0));

    let mut root = match entries.first() {
        Some((path, values)) if path.is_empty() => {
            let has_fields =
                model.name.is_some() || model.compatibility_level.is_some() || model.model.is_some();
            match *values {
                [value] if !has_fields => Layout::from_value(value),
                _ => {
                    return Err(TmdlError::conversion(
                        "a non-object root cannot be combined with other content",
                    ))
                }
            }
        }
        _ => canonical_root(model),
    };

    for (path, values) in entries.into_iter().filter(|(path, _)| !path.is_empty()) {
        for value in values {
            place(&mut root, path, Layout::from_value(value))?;
        }
    }
    Ok(root)
}
