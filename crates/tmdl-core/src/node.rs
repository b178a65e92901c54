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

//! Generic parse tree.
//!
//! Both the JSON fast path and the tolerant parser produce this tree. It is
//! deliberately untyped: scalars keep their source text, and coercion to
//! typed values happens in the normalizer.

use crate::lex::{ExprLanguage, SourcePos};

/// How a scalar was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Unquoted text, subject to coercion.
    Bare,
    /// Double-quoted string.
    Quoted,
    /// Object name (declaration name or single-quoted text).
    Name,
    /// Raw embedded expression.
    Embedded(ExprLanguage),
}

/// Scalar text and its lexical kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub text: String,
    pub kind: ScalarKind,
}

impl Scalar {
    pub fn new(text: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn bare(text: impl Into<String>) -> Self {
        Self::new(text, ScalarKind::Bare)
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self::new(text, ScalarKind::Quoted)
    }

    pub fn name(text: impl Into<String>) -> Self {
        Self::new(text, ScalarKind::Name)
    }

    pub fn embedded(text: impl Into<String>, language: ExprLanguage) -> Self {
        Self::new(text, ScalarKind::Embedded(language))
    }
}

/// Value of a parse node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    /// Keyed children in source order.
    Object(Vec<ParseNode>),
    /// Keyless children in source order.
    Array(Vec<ParseNode>),
}

impl NodeValue {
    /// Short name of the variant for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

/// A node of the generic parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    /// Key within the parent object; `None` for array elements and the root.
    pub key: Option<String>,
    pub value: NodeValue,
    pub pos: SourcePos,
    /// Comments attached to this node (kept only when requested).
    pub comments: Vec<String>,
}

impl ParseNode {
    pub fn new(key: Option<String>, value: NodeValue, pos: SourcePos) -> Self {
        Self {
            key,
            value,
            pos,
            comments: Vec::new(),
        }
    }

    /// A keyed node.
    pub fn keyed(key: impl Into<String>, value: NodeValue, pos: SourcePos) -> Self {
        Self::new(Some(key.into()), value, pos)
    }

    /// A keyless node (array element or root).
    pub fn item(value: NodeValue, pos: SourcePos) -> Self {
        Self::new(None, value, pos)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.value {
            NodeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Children of an object or array; empty for scalars.
    pub fn children(&self) -> &[ParseNode] {
        match &self.value {
            NodeValue::Object(children) | NodeValue::Array(children) => children,
            NodeValue::Scalar(_) => &[],
        }
    }

    /// First child with the given key.
    pub fn get(&self, key: &str) -> Option<&ParseNode> {
        self.children().iter().find(|c| c.key() == Some(key))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self.value, NodeValue::Object(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.value, NodeValue::Array(_))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(ParseNode::count_nodes)
            .sum::<usize>()
    }
}
