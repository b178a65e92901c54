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

//! Tolerant parsing of realistic TMDL documents through normalization.

use tmdl_core::{
    check_monotonic_positions, normalize, parse_tolerant, ExprLanguage, Expression, ParseOptions,
    TmdlErrorKind, Value,
};

const SALES_TABLE: &str = "\
/// Sales fact table
table Sales
\tlineageTag: 4b1e-9a

\tmeasure 'Total Sales' = SUM(Sales[Amount])
\t\tformatString: #,0.00
\t\tdisplayFolder: Totals

\tmeasure Margin =
\t\t\tVAR cost = SUM(Sales[Cost])
\t\t\tRETURN [Total Sales] - cost
\t\tformatString: 0.0%

\tcolumn Amount
\t\tdataType: decimal
\t\tisHidden
\t\tsummarizeBy: sum
\t\tsourceColumn: Amount

\tcolumn 'Order Date'
\t\tdataType: dateTime
\t\tsourceColumn: OrderDate

\tpartition Sales = m
\t\tmode: import
\t\tsource =
\t\t\t\tlet
\t\t\t\t    Source = Sql.Database(\"srv\", \"db\")
\t\t\t\tin
\t\t\t\t    Source

\tannotation PBI_ResultType = Table
";

fn parse(text: &str) -> tmdl_core::Document {
    parse_tolerant(text, &ParseOptions::default()).unwrap()
}

#[test]
fn test_table_file_normalizes() {
    let doc = parse(SALES_TABLE);
    check_monotonic_positions(&doc.root).unwrap();
    let model = normalize(&doc).unwrap();
    let section = model.model.as_ref().unwrap();
    assert_eq!(section.tables.len(), 1);

    let table = &section.tables[0];
    assert_eq!(table.get("name"), Some(&Value::from("Sales")));
    assert_eq!(table.get("description"), Some(&Value::from("Sales fact table")));
    assert_eq!(table.get("lineageTag"), Some(&Value::from("4b1e-9a")));

    let measures = table.get("measures").and_then(Value::as_list).unwrap();
    assert_eq!(measures.len(), 2);
    let total = measures[0].as_map().unwrap();
    assert_eq!(
        total.get("expression"),
        Some(&Value::Expression(Expression::new(
            "SUM(Sales[Amount])",
            ExprLanguage::Dax
        )))
    );
    assert_eq!(total.get("formatString"), Some(&Value::from("#,0.00")));

    let margin = measures[1].as_map().unwrap();
    assert_eq!(
        margin.get("expression").and_then(Value::as_text),
        Some("\t\t\tVAR cost = SUM(Sales[Cost])\n\t\t\tRETURN [Total Sales] - cost")
    );

    let columns = table.get("columns").and_then(Value::as_list).unwrap();
    let amount = columns[0].as_map().unwrap();
    assert_eq!(amount.get("isHidden"), Some(&Value::Bool(true)));
    assert_eq!(
        columns[1].as_map().unwrap().get("name"),
        Some(&Value::from("Order Date"))
    );

    let partitions = table.get("partitions").and_then(Value::as_list).unwrap();
    let partition = partitions[0].as_map().unwrap();
    assert_eq!(partition.get("type"), Some(&Value::from("m")));
    match partition.get("source") {
        Some(Value::Expression(expr)) => {
            assert_eq!(expr.language, ExprLanguage::M);
            assert!(expr.text.contains("Sql.Database(\"srv\", \"db\")"));
        }
        other => panic!("expected M expression, got {:?}", other),
    }

    let annotations = table.get("annotations").and_then(Value::as_list).unwrap();
    assert_eq!(
        annotations[0].as_map().unwrap().get("value").and_then(Value::as_text),
        Some("Table")
    );
}

#[test]
fn test_model_file_with_refs() {
    let text = "\
model Model
\tculture: en-US
\tdefaultPowerBIDataSourceVersion: powerBI_V3
\tdiscourageImplicitMeasures

ref table Sales
ref table Product
ref cultureInfo en-US
";
    let model = normalize(&parse(text)).unwrap();
    let section = model.model.unwrap();
    assert_eq!(section.properties.get("name"), Some(&Value::from("Model")));
    assert_eq!(
        section.properties.get("discourageImplicitMeasures"),
        Some(&Value::Bool(true))
    );
    assert_eq!(section.tables.len(), 2);
    assert_eq!(section.tables[0].get("ref"), Some(&Value::Bool(true)));
    assert_eq!(section.cultures.len(), 1);
}

#[test]
fn test_relationship_declarations() {
    let text = "\
relationship 3f2a-11
\tfromColumn: Sales.ProductKey
\ttoColumn: Product.ProductKey

relationship 9c1d-22
\tisActive: false
\tfromColumn: 'Sales Order'.'Order Date'
\ttoColumn: Date.Date
";
    let model = normalize(&parse(text)).unwrap();
    let section = model.model.unwrap();
    assert_eq!(section.relationships.len(), 2);
    assert_eq!(
        section.relationships[0].get("fromColumn"),
        Some(&Value::from("Sales.ProductKey"))
    );
    assert_eq!(
        section.relationships[1].get("isActive"),
        Some(&Value::Bool(false))
    );
    assert_eq!(
        section.relationships[1].get("fromColumn"),
        Some(&Value::from("'Sales Order'.'Order Date'"))
    );
}

#[test]
fn test_dash_item_value_is_text() {
    let text = "model:\n  culture: en-US\n  tables:\n    - name: Sales\n";
    // `- name: Sales` is a list item whose value is the bare text `name: Sales`
    let model = normalize(&parse(text)).unwrap();
    assert_eq!(
        model.unrecognized.get(&["model", "tables", "0"]),
        Some(&Value::from("name: Sales"))
    );
}

#[test]
fn test_mixed_indentation_rejected() {
    let err = parse_tolerant("model:\n\tculture: en-US\n  tables: []\n", &ParseOptions::default())
        .unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::Syntax);
    assert_eq!(err.line, 3);
}

#[test]
fn test_unterminated_fence_rejected() {
    let err = parse_tolerant("measure M = ```dax\nSUM(x)\n", &ParseOptions::default())
        .unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::Syntax);
}

#[test]
fn test_fenced_block_keeps_text() {
    let text = "measure M = ```dax\n  VAR x = 1\n\n  RETURN x\n```\nname: after\n";
    let doc = parse(text);
    let measure = doc.root.get("measure").unwrap();
    assert_eq!(
        measure.get("expression").unwrap().as_scalar().unwrap().text,
        "  VAR x = 1\n\n  RETURN x"
    );
    assert!(doc.root.get("name").is_some());
}

#[test]
fn test_comments_are_kept_when_requested() {
    let opts = ParseOptions::builder().keep_comments(true).build();
    let doc = parse_tolerant("# header\nname: Sales // trailing\n", &opts).unwrap();
    assert_eq!(doc.root.get("name").unwrap().comments, vec!["header", "trailing"]);
}

#[test]
fn test_shallow_comment_inside_embedded_block() {
    let text = "\
table Sales
\tmeasure Margin =
\t\t\tVAR cost = 1
\t\t# keep the cost term
\t\t\tRETURN cost
\t\t// format follows
\t\tformatString: 0.0%
";
    let model = normalize(&parse(text)).unwrap();
    let table = &model.model.as_ref().unwrap().tables[0];
    let measures = table.get("measures").and_then(Value::as_list).unwrap();
    let margin = measures[0].as_map().unwrap();
    assert_eq!(
        margin.get("expression"),
        Some(&Value::Expression(Expression::new(
            "\t\t\tVAR cost = 1\n\t\t# keep the cost term\n\t\t\tRETURN cost",
            ExprLanguage::Dax
        )))
    );
    assert_eq!(margin.get("formatString"), Some(&Value::from("0.0%")));
    assert_eq!(margin.len(), 3);
    assert!(model.unrecognized.is_empty());
}
