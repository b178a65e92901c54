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

//! TMDL source fixtures.
//!
//! Each fixture is a complete document in the indentation-based syntax, in
//! the shape Power BI writes model definition folders.

/// A table file with measures, columns, a partition and an annotation.
pub fn sales_table() -> &'static str {
    "\
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
"
}

/// A `model.tmdl` file with model properties and table references.
pub fn model_file() -> &'static str {
    "\
model Model
\tculture: en-US
\tdefaultPowerBIDataSourceVersion: powerBI_V3
\tdiscourageImplicitMeasures

ref table Sales
ref table Product
ref cultureInfo en-US
"
}

/// A `relationships.tmdl` file.
pub fn relationships() -> &'static str {
    "\
relationship 3f2a-11
\tfromColumn: Sales.ProductKey
\ttoColumn: Product.ProductKey

relationship 9c1d-22
\tisActive: false
\tfromColumn: 'Sales Order'.'Order Date'
\ttoColumn: Date.Date
"
}

/// A shared M expression followed by properties.
pub fn shared_expression() -> &'static str {
    "\
expression SalesBase =
\t\tlet
\t\t    Source = Sql.Database(\"srv\", \"db\")
\t\tin
\t\t    Source
\tlineageTag: 7d1a
\tqueryGroup: Staging
"
}

/// Roles with permissions and a perspective.
pub fn roles_and_perspectives() -> &'static str {
    "\
role Reader
\tmodelPermission: read

\ttablePermission Sales = [Region] = \"West\"

perspective Finance
\tperspectiveTable Sales
\t\tperspectiveMeasure 'Total Sales'
"
}

/// A whole model in one document.
pub fn complete_model() -> &'static str {
    "\
database Sales
\tcompatibilityLevel: 1575

model Model
\tculture: en-US

/// Sales fact table
table Sales
\tlineageTag: 1a2b

\tmeasure 'Total Sales' = SUM(Sales[Amount])
\t\tformatString: #,0.00

\tcolumn Amount
\t\tdataType: decimal
\t\tsourceColumn: Amount

\tcolumn ProductKey
\t\tdataType: int64
\t\tisHidden
\t\tsourceColumn: ProductKey

\tpartition Sales = m
\t\tmode: import
\t\tsource =
\t\t\t\tlet
\t\t\t\t    Source = Sql.Database(\"srv\", \"db\")
\t\t\t\tin
\t\t\t\t    Source

table Product
\tcolumn ProductKey
\t\tdataType: int64
\t\tsourceColumn: ProductKey

\tcolumn Name
\t\tdataType: string
\t\tsourceColumn: Name

relationship 3f2a-11
\tfromColumn: Sales.ProductKey
\ttoColumn: Product.ProductKey

role Reader
\tmodelPermission: read

\ttablePermission Sales = [Region] = \"West\"
"
}

/// An empty document.
pub fn empty() -> &'static str {
    ""
}
