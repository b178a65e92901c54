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

//! Security limits for TMDL parsing.

/// Configurable limits for parser security.
///
/// These limits bound the resources consumed by a single parse call.
/// Exceeding any of them aborts the call with a `Security` error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input size in bytes (default: 256MB).
    pub max_file_size: usize,
    /// Maximum line length in bytes (default: 1MB).
    pub max_line_length: usize,
    /// Maximum number of open indentation levels (default: 64).
    pub max_indent_depth: usize,
    /// Maximum nesting of `[`/`{` flow values (default: 128).
    pub max_flow_depth: usize,
    /// Maximum size of a captured embedded block in bytes (default: 10MB).
    pub max_embedded_size: usize,
    /// Maximum number of parse nodes (default: 10M).
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024,    // 256MB
            max_line_length: 1024 * 1024,        // 1MB
            max_indent_depth: 64,
            max_flow_depth: 128,
            max_embedded_size: 10 * 1024 * 1024, // 10MB
            max_nodes: 10_000_000,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_file_size: usize::MAX,
            max_line_length: usize::MAX,
            max_indent_depth: usize::MAX,
            max_flow_depth: usize::MAX,
            max_embedded_size: usize::MAX,
            max_nodes: usize::MAX,
        }
    }
}
