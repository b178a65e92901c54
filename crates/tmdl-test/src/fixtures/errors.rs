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

//! Error test fixtures.
//!
//! Invalid documents together with the error kind and line the tolerant
//! parser must report for them.

use tmdl_core::TmdlErrorKind;

/// An invalid document and the error it must produce.
#[derive(Debug, Clone, Copy)]
pub struct InvalidSample {
    pub name: &'static str,
    pub source: &'static str,
    pub kind: TmdlErrorKind,
    /// 1-based line of the error.
    pub line: usize,
}

const fn sample(
    name: &'static str,
    source: &'static str,
    kind: TmdlErrorKind,
    line: usize,
) -> InvalidSample {
    InvalidSample {
        name,
        source,
        kind,
        line,
    }
}

/// Invalid TMDL samples for parser error testing.
pub fn invalid_tmdl_samples() -> Vec<InvalidSample> {
    use TmdlErrorKind::Syntax;
    vec![
        sample("ambiguous_dedent", "model:\n    a: 1\n  b: 2\n", Syntax, 3),
        sample("indent_under_scalar", "name: Sales\n\tculture: en-US\n", Syntax, 2),
        sample("mixed_indentation", "model:\n\tculture: en-US\n  tables: []\n", Syntax, 3),
        sample("unterminated_fence", "measure M = ```dax\nSUM(x)\n", Syntax, 1),
        sample("unclosed_quote", "name: \"Sales\n", Syntax, 1),
        sample("unclosed_flow", "tables: [1, 2\n", Syntax, 1),
        sample("keyless_scalar", "model:\n\tculture: en-US\n\t42\n", Syntax, 3),
        sample("leading_indentation", "\tname: Sales\n", Syntax, 1),
        sample("text_after_quoted_value", "name: \"a\" b\n", Syntax, 1),
    ]
}

/// Documents that exceed the default security limits.
///
/// Returns (name, source) pairs; each must fail with a `Security` error.
pub fn oversized_samples() -> Vec<(&'static str, String)> {
    vec![
        ("deep_flow", format!("a: {}{}\n", "[".repeat(200), "]".repeat(200))),
        ("long_line", format!("a: {}\n", "x".repeat(2 * 1024 * 1024))),
    ]
}
