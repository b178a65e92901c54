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

//! Fixture counting utilities.
//!
//! Functions for counting records and expressions in canonical models.

use tmdl_core::{CanonicalModel, Value};

/// Count collection records, including nested records such as columns.
pub fn count_records(model: &CanonicalModel) -> usize {
    let Some(section) = &model.model else {
        return 0;
    };
    section
        .collections()
        .flat_map(|(_, records)| records)
        .map(|record| 1 + record.iter().map(|(_, v)| nested_records(v)).sum::<usize>())
        .sum()
}

fn nested_records(value: &Value) -> usize {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Map(map) => 1 + map.iter().map(|(_, v)| nested_records(v)).sum::<usize>(),
                other => nested_records(other),
            })
            .sum(),
        Value::Map(map) => map.iter().map(|(_, v)| nested_records(v)).sum(),
        _ => 0,
    }
}

/// Count embedded expressions anywhere in the model, including the
/// unrecognized bucket.
pub fn count_expressions(model: &CanonicalModel) -> usize {
    let mut count = 0;
    for value in [&model.name, &model.compatibility_level].into_iter().flatten() {
        count += expressions_in(value);
    }
    if let Some(section) = &model.model {
        count += section.properties.iter().map(|(_, v)| expressions_in(v)).sum::<usize>();
        for (_, records) in section.collections() {
            for record in records {
                count += record.iter().map(|(_, v)| expressions_in(v)).sum::<usize>();
            }
        }
    }
    for (_, values) in model.unrecognized.iter() {
        count += values.iter().map(expressions_in).sum::<usize>();
    }
    count
}

fn expressions_in(value: &Value) -> usize {
    match value {
        Value::Expression(_) => 1,
        Value::List(items) => items.iter().map(expressions_in).sum(),
        Value::Map(map) => map.iter().map(|(_, v)| expressions_in(v)).sum(),
        _ => 0,
    }
}
