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

//! CanonicalModel to JSON conversion

use std::io::Write;
use thiserror::Error;
use tmdl_core::CanonicalModel;

/// Errors raised while writing canonical JSON.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON serialization error: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.to_string())
        } else {
            Self::Serialize(e.to_string())
        }
    }
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct ToJsonConfig {
    /// Indent output with two spaces (default: false)
    pub pretty: bool,
}

impl ToJsonConfig {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Convert a canonical model to a JSON string.
///
/// Keys are emitted in canonical order: `name`, `compatibilityLevel`,
/// `model` (properties, then non-empty collections), `unrecognized`.
pub fn to_json(model: &CanonicalModel, config: &ToJsonConfig) -> Result<String, JsonError> {
    let out = if config.pretty {
        serde_json::to_string_pretty(model)?
    } else {
        serde_json::to_string(model)?
    };
    Ok(out)
}

/// Convert a canonical model to pretty-printed JSON.
pub fn to_json_pretty(model: &CanonicalModel) -> Result<String, JsonError> {
    to_json(model, &ToJsonConfig::pretty())
}

/// Write a canonical model as JSON to `writer`.
pub fn to_json_writer<W: Write>(
    model: &CanonicalModel,
    writer: W,
    config: &ToJsonConfig,
) -> Result<(), JsonError> {
    if config.pretty {
        serde_json::to_writer_pretty(writer, model)?;
    } else {
        serde_json::to_writer(writer, model)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdl_core::{ExprLanguage, Expression, ModelSection, Record, Value};

    fn sample() -> CanonicalModel {
        let mut model = CanonicalModel::new();
        model.compatibility_level = Some(Value::Int(1550));
        model.name = Some(Value::from("Sales Model"));
        let mut section = ModelSection::new();
        section.properties.insert("culture", Value::from("en-US"));
        let table: Record = vec![
            ("name", Value::from("Sales")),
            (
                "measures",
                Value::List(vec![Value::Map(
                    vec![
                        ("name", Value::from("Total")),
                        (
                            "expression",
                            Value::Expression(Expression::new("SUM(x)", ExprLanguage::Dax)),
                        ),
                    ]
                    .into_iter()
                    .collect(),
                )]),
            ),
        ]
        .into_iter()
        .collect();
        section.tables.push(table);
        model.model = Some(section);
        model
    }

    #[test]
    fn test_canonical_key_order() {
        let json = to_json(&sample(), &ToJsonConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Sales Model","compatibilityLevel":1550,"model":{"culture":"en-US","tables":[{"name":"Sales","measures":[{"name":"Total","expression":"SUM(x)"}]}]}}"#
        );
    }

    #[test]
    fn test_unrecognized_emitted_last() {
        let mut model = sample();
        model
            .unrecognized
            .insert(vec!["model".into(), "foo".into()], Value::Int(1));
        let json = to_json(&model, &ToJsonConfig::default()).unwrap();
        assert!(json.ends_with(r#""unrecognized":{"model.foo":[1]}}"#));
    }

    #[test]
    fn test_empty_model_is_empty_object() {
        let json = to_json(&CanonicalModel::new(), &ToJsonConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_pretty_and_writer_agree() {
        let model = sample();
        let pretty = to_json_pretty(&model).unwrap();
        assert!(pretty.contains("\n  \"name\": \"Sales Model\""));

        let mut buf = Vec::new();
        to_json_writer(&model, &mut buf, &ToJsonConfig::pretty()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), pretty);
    }
}
