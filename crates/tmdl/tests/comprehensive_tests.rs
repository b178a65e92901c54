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

//! Comprehensive tests for the tmdl facade
//!
//! End-to-end behaviour: strategy selection, normalization, error
//! reporting, file input and conversion back to TMDL and JSON.

use std::io::Write;
use tmdl::{
    normalize, parse, parse_file, parse_file_with_options, parse_model, parse_with_options,
    to_json, to_tmdl, validate, Collection, ExprLanguage, Expression, ParseOptions, ParsePath,
    SourceOrigin, TmdlErrorKind, Value,
};
use tmdl_test::fixtures::{self, errors};
use tmdl_test::{count_expressions, count_records};

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_typed_top_level_fields() {
    let model = parse_model("name: \"M\"\ncompatibilityLevel: 1575\n").unwrap();
    assert_eq!(model.name, Some(Value::from("M")));
    assert_eq!(model.compatibility_level, Some(Value::Int(1575)));
    assert_eq!(
        to_json(&model).unwrap(),
        r#"{"name":"M","compatibilityLevel":1575}"#
    );
}

#[test]
fn test_scenario_bare_list_with_comment_and_trailing_comma() {
    let plain = parse_model("name: M\ntables:\n\t- Sales\n\t- Product\n").unwrap();
    let noisy = parse_model(
        "name: M\ntables:\n\t- Sales,\n\t// the fact table comes first\n\t- Product,\n",
    )
    .unwrap();
    assert_eq!(noisy, plain);

    let flow = parse_model("name: M\ntables: [\n\tSales,\n\t// fact table\n\tProduct,\n]\n").unwrap();
    assert_eq!(flow, plain);
}

#[test]
fn test_scenario_unknown_key_is_kept() {
    let model = parse_model("name: M\nextraFlag: true\n").unwrap();
    assert_eq!(model.unrecognized.get(&["extraFlag"]), Some(&Value::Bool(true)));
    assert_eq!(model.unrecognized.len(), 1);
}

// =============================================================================
// Strategy Selection
// =============================================================================

#[test]
fn test_strict_and_relaxed_json_agree() {
    let strict = parse(fixtures::STRICT_JSON).unwrap();
    let relaxed = parse(fixtures::RELAXED_JSON).unwrap();
    assert_eq!(strict.path, ParsePath::Fast);
    assert_eq!(relaxed.path, ParsePath::Tolerant);
    assert_eq!(normalize(&strict).unwrap(), normalize(&relaxed).unwrap());
}

#[test]
fn test_fast_and_tolerant_agree_on_strict_json() {
    let fast = parse(fixtures::STRICT_JSON).unwrap();
    let opts = ParseOptions::builder().fast_path(false).build();
    let tolerant = parse_with_options(fixtures::STRICT_JSON, &opts).unwrap();
    assert_eq!(tolerant.path, ParsePath::Tolerant);
    assert_eq!(normalize(&fast).unwrap(), normalize(&tolerant).unwrap());
}

#[test]
fn test_negative_zero_agrees_on_both_paths() {
    let json = r#"{"name": "M", "a": -0, "b": -0.0, "c": 1e2}"#;
    let fast = parse(json).unwrap();
    assert_eq!(fast.path, ParsePath::Fast);
    let opts = ParseOptions::builder().fast_path(false).build();
    let tolerant = parse_with_options(json, &opts).unwrap();

    let model = normalize(&fast).unwrap();
    assert_eq!(model, normalize(&tolerant).unwrap());
    assert_eq!(model.unrecognized.get(&["a"]), Some(&Value::Int(0)));
    assert!(matches!(model.unrecognized.get(&["b"]), Some(Value::Float(f)) if *f == 0.0));
    assert!(matches!(model.unrecognized.get(&["c"]), Some(Value::Float(f)) if *f == 100.0));
}

#[test]
fn test_array_root_uses_tolerant_path() {
    let doc = parse(fixtures::ARRAY_ROOT_JSON).unwrap();
    assert_eq!(doc.path, ParsePath::Tolerant);
    let model = normalize(&doc).unwrap();
    assert_eq!(
        model.unrecognized.get(&[]),
        Some(&Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
    );
}

// =============================================================================
// Tolerance
// =============================================================================

#[test]
fn test_comments_and_trailing_commas_are_ignored() {
    let clean = "\
name: Sales
model:
\tculture: en-US
\ttable Sales
\t\tcolumn Amount
\t\t\tdataType: decimal
";
    let noisy = "\
// Sales model
name: Sales // model name
model:
\t# locale
\tculture: en-US,
\ttable Sales
\t\t// columns
\t\tcolumn Amount
\t\t\tdataType: decimal,
";
    assert_eq!(parse_model(noisy).unwrap(), parse_model(clean).unwrap());
}

#[test]
fn test_embedded_block_fidelity() {
    let source = "\
table Sales
\tmeasure Margin =
\t\t\tVAR cost: = \"a: b\"
\t\t\t    key: value
\t\t\t// not a comment here

\t\t\tRETURN cost
\tcolumn Amount
\t\tdataType: decimal
";
    let model = parse_model(source).unwrap();
    let table = &model.records(Collection::Tables)[0];
    let measures = table.get("measures").and_then(Value::as_list).unwrap();
    let margin = measures[0].as_map().unwrap();
    assert_eq!(
        margin.get("expression"),
        Some(&Value::Expression(Expression::new(
            "\t\t\tVAR cost: = \"a: b\"\n\t\t\t    key: value\n\t\t\t// not a comment here\n\n\t\t\tRETURN cost",
            ExprLanguage::Dax,
        )))
    );
    assert_eq!(margin.len(), 2);

    let columns = table.get("columns").and_then(Value::as_list).unwrap();
    assert_eq!(columns.len(), 1);
    assert!(model.unrecognized.is_empty());
}

#[test]
fn test_fenced_block_keeps_text() {
    let source = "expression Base = ```m\nlet\n  x: 1\nin\n  x\n```\n";
    let model = parse_model(source).unwrap();
    let base = &model.records(Collection::Expressions)[0];
    assert_eq!(
        base.get("expression"),
        Some(&Value::Expression(Expression::new(
            "let\n  x: 1\nin\n  x",
            ExprLanguage::M
        )))
    );
}

#[test]
fn test_partition_type_word_is_text() {
    let source = "table T\n\tpartition P = m\n\t\tmode: import\n\tpartition Q = SUMMARIZE(T, T[A])\n";
    let model = parse_model(source).unwrap();
    let table = &model.records(Collection::Tables)[0];
    let partitions = table.get("partitions").and_then(Value::as_list).unwrap();
    let first = partitions[0].as_map().unwrap();
    assert_eq!(first.get("type"), Some(&Value::from("m")));
    let second = partitions[1].as_map().unwrap();
    assert!(matches!(second.get("type"), Some(Value::Expression(_))));
    assert_eq!(count_expressions(&model), 1);

    let text = to_tmdl(&model).unwrap();
    assert!(text.contains("partition P = m\n"), "{}", text);
    assert_eq!(parse_model(&text).unwrap(), model);
}

#[test]
fn test_expression_with_fence_line_round_trips() {
    let model = parse_model("measure M =\n\t```\n").unwrap();
    let text = to_tmdl(&model).unwrap();
    assert!(text.contains("````"), "{}", text);
    assert_eq!(parse_model(&text).unwrap(), model);
}

#[test]
fn test_longer_fence_keeps_inner_fence() {
    let source = "expression Doc = ````m\n```\nlet x = 1 in x\n```\n````\n";
    let model = parse_model(source).unwrap();
    let doc = &model.records(Collection::Expressions)[0];
    assert_eq!(
        doc.get("expression"),
        Some(&Value::Expression(Expression::new(
            "```\nlet x = 1 in x\n```",
            ExprLanguage::M
        )))
    );
    assert_eq!(parse_model(&to_tmdl(&model).unwrap()).unwrap(), model);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_ambiguous_dedent_reports_line() {
    let err = parse("model:\n\ttable Sales\n\t\t\tcolumn A\n\t\tcolumn B\n").unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::Syntax);
    assert_eq!(err.line, 4);
}

#[test]
fn test_invalid_samples() {
    for sample in errors::invalid_tmdl_samples() {
        let err = parse(sample.source).unwrap_err();
        assert_eq!(err.kind, sample.kind, "{}", sample.name);
        assert_eq!(err.line, sample.line, "{}", sample.name);
    }
}

#[test]
fn test_oversized_samples() {
    for (name, source) in errors::oversized_samples() {
        let err = parse(&source).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Security, "{}", name);
    }
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_parse_file_sets_origin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(fixtures::complete_model().as_bytes()).unwrap();

    let doc = parse_file(file.path()).unwrap();
    assert_eq!(doc.origin, SourceOrigin::File(file.path().to_path_buf()));
    assert_eq!(
        normalize(&doc).unwrap(),
        parse_model(fixtures::complete_model()).unwrap()
    );
}

#[test]
fn test_parse_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("missing.tmdl")).unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::IO);
    assert!(err.context.unwrap().contains("missing.tmdl"));
}

#[test]
fn test_parse_file_size_limit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(fixtures::complete_model().as_bytes()).unwrap();
    let opts = ParseOptions::builder().max_file_size(16).build();
    let err = parse_file_with_options(file.path(), &opts).unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::Security);
}

#[test]
fn test_parse_file_syntax_error_has_context() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"name: \"Sales\n").unwrap();
    let err = parse_file(file.path()).unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::Syntax);
    assert_eq!(err.line, 1);
    assert!(err.context.is_some());
}

// =============================================================================
// Round Trip and Idempotence
// =============================================================================

#[test]
fn test_fixtures_round_trip() {
    for (name, source) in fixtures::all() {
        let model = parse_model(source()).unwrap();
        let text = to_tmdl(&model).unwrap();
        let reparsed = parse_model(&text).unwrap_or_else(|e| panic!("{}: {}\n{}", name, e, text));
        assert_eq!(reparsed, model, "{}", name);
    }
}

#[test]
fn test_record_and_expression_counts() {
    let model = parse_model(fixtures::shared_expression()).unwrap();
    assert_eq!(count_records(&model), 1);
    assert_eq!(count_expressions(&model), 1);

    // JSON strings never become embedded expressions, even under `expression`
    let model = parse_model(fixtures::STRICT_JSON).unwrap();
    assert_eq!(count_records(&model), 7);
    assert_eq!(count_expressions(&model), 0);

    let reread = parse_model(&to_tmdl(&model).unwrap()).unwrap();
    assert_eq!(count_expressions(&reread), 0);
}

#[test]
fn test_json_fixture_round_trips_through_tmdl() {
    let model = parse_model(fixtures::STRICT_JSON).unwrap();
    let text = to_tmdl(&model).unwrap();
    assert_eq!(parse_model(&text).unwrap(), model);
}

#[test]
fn test_normalize_is_idempotent() {
    for (name, source) in fixtures::all() {
        let first = parse_model(source()).unwrap();
        let second = parse_model(source()).unwrap();
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn test_complete_model_validates_clean() {
    let model = parse_model(fixtures::complete_model()).unwrap();
    assert!(validate(&model).is_empty());
}
