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

//! JSON fixtures.
//!
//! [`STRICT_JSON`] decodes on the fast path. [`RELAXED_JSON`] holds the same
//! content with comments and trailing commas, so it needs the tolerant
//! parser; both normalize to the same model.

/// A model in strict JSON.
pub const STRICT_JSON: &str = r##"{
  "name": "Sales",
  "compatibilityLevel": 1575,
  "model": {
    "culture": "en-US",
    "tables": [
      {
        "name": "Sales",
        "columns": [
          {"name": "Amount", "dataType": "decimal", "isHidden": true},
          {"name": "ProductKey", "dataType": "int64"}
        ],
        "measures": [
          {"name": "Total Sales", "expression": "SUM(Sales[Amount])", "formatString": "#,0.00"}
        ]
      },
      {
        "name": "Product",
        "columns": [
          {"name": "ProductKey", "dataType": "int64"}
        ]
      }
    ],
    "relationships": [
      {"name": "r1", "fromColumn": "Sales.ProductKey", "toColumn": "Product.ProductKey"}
    ]
  }
}
"##;

/// [`STRICT_JSON`] with comments and trailing commas.
pub const RELAXED_JSON: &str = r##"// exported model
{
  "name": "Sales",
  "compatibilityLevel": 1575,
  "model": {
    "culture": "en-US",
    "tables": [
      {
        "name": "Sales",
        "columns": [
          {"name": "Amount", "dataType": "decimal", "isHidden": true},
          {"name": "ProductKey", "dataType": "int64"},
        ],
        // measures follow the columns
        "measures": [
          {"name": "Total Sales", "expression": "SUM(Sales[Amount])", "formatString": "#,0.00"},
        ],
      },
      {
        "name": "Product",
        "columns": [
          {"name": "ProductKey", "dataType": "int64"},
        ],
      },
    ],
    "relationships": [
      {"name": "r1", "fromColumn": "Sales.ProductKey", "toColumn": "Product.ProductKey"},
    ],
  },
}
"##;

/// Strict JSON whose root is not an object.
pub const ARRAY_ROOT_JSON: &str = "[1, 2, 3]";
