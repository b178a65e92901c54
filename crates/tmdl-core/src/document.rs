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

//! Parsed document and its metadata.

use crate::node::ParseNode;
use std::fmt;
use std::path::PathBuf;

/// Where the parsed text came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceOrigin {
    #[default]
    Inline,
    File(PathBuf),
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => write!(f, "inline string"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Which parsing strategy produced the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsePath {
    /// Strict JSON decoding.
    Fast,
    /// Indentation-aware TMDL parsing.
    Tolerant,
}

impl fmt::Display for ParsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Tolerant => write!(f, "tolerant"),
        }
    }
}

/// A parsed TMDL document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: ParseNode,
    pub origin: SourceOrigin,
    pub path: ParsePath,
}

impl Document {
    pub fn new(root: ParseNode, path: ParsePath) -> Self {
        Self {
            root,
            origin: SourceOrigin::Inline,
            path,
        }
    }

    /// Set the origin of the document.
    pub fn with_origin(mut self, origin: SourceOrigin) -> Self {
        self.origin = origin;
        self
    }
}
