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

//! Pre-order traversal of the parse tree.
//!
//! The visitor pattern separates the recursive walk from what is done at
//! each node. Implement [`NodeVisitor`] and override only the hooks you
//! need; [`traverse`] drives the walk.
//!
//! # Example
//!
//! ```text
//! use tmdl_core::traverse::{traverse, NodeVisitor, VisitorContext};
//!
//! struct KeyCounter(usize);
//!
//! impl NodeVisitor for KeyCounter {
//!     type Error = ();
//!
//!     fn enter_node(&mut self, node: &ParseNode, _ctx: &VisitorContext) -> Result<(), ()> {
//!         if node.key.is_some() {
//!             self.0 += 1;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::{TmdlError, TmdlErrorKind, TmdlResult};
use crate::lex::SourcePos;
use crate::node::{NodeValue, ParseNode, ScalarKind};

/// Context provided to visitors during traversal.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext<'a> {
    /// Current nesting depth (0 = root).
    pub depth: usize,
    /// Keys from the root to the current node; array elements contribute
    /// nothing.
    pub path: Vec<&'a str>,
}

impl<'a> VisitorContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a child node.
    pub fn child(&self, key: Option<&'a str>) -> Self {
        let mut path = self.path.clone();
        if let Some(key) = key {
            path.push(key);
        }
        Self {
            depth: self.depth + 1,
            path,
        }
    }

    /// The current path as a string (for error messages).
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join(".")
        }
    }
}

/// Hooks called during a pre-order walk.
pub trait NodeVisitor {
    /// Error type returned by visitor methods.
    type Error;

    /// Called before the node's children.
    fn enter_node(&mut self, _node: &ParseNode, _ctx: &VisitorContext) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after the node's children.
    fn leave_node(&mut self, _node: &ParseNode, _ctx: &VisitorContext) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `root` in pre-order.
pub fn traverse<V: NodeVisitor>(root: &ParseNode, visitor: &mut V) -> Result<(), V::Error> {
    walk(root, &VisitorContext::new(), visitor)
}

fn walk<'a, V: NodeVisitor>(
    node: &'a ParseNode,
    ctx: &VisitorContext<'a>,
    visitor: &mut V,
) -> Result<(), V::Error> {
    visitor.enter_node(node, ctx)?;
    for child in node.children() {
        walk(child, &ctx.child(child.key()), visitor)?;
    }
    visitor.leave_node(node, ctx)
}

struct MonotonicCheck {
    last: SourcePos,
}

impl NodeVisitor for MonotonicCheck {
    type Error = TmdlError;

    fn enter_node(&mut self, node: &ParseNode, ctx: &VisitorContext) -> Result<(), TmdlError> {
        if node.pos < self.last {
            return Err(TmdlError::at(
                TmdlErrorKind::Structural,
                format!(
                    "node at {} precedes previous node at {}",
                    node.pos, self.last
                ),
                node.pos,
            )
            .with_context(format!("at {}", ctx.path_string())));
        }
        self.last = node.pos;
        Ok(())
    }
}

/// Check that node positions never decrease in pre-order.
pub fn check_monotonic_positions(root: &ParseNode) -> TmdlResult<()> {
    let mut check = MonotonicCheck {
        last: SourcePos::start(),
    };
    traverse(root, &mut check)
}

/// Shape statistics of a parse tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub objects: usize,
    pub arrays: usize,
    pub scalars: usize,
    pub embedded: usize,
    pub max_depth: usize,
}

impl TreeStats {
    pub fn total(&self) -> usize {
        self.objects + self.arrays + self.scalars
    }
}

impl NodeVisitor for TreeStats {
    type Error = std::convert::Infallible;

    fn enter_node(&mut self, node: &ParseNode, ctx: &VisitorContext) -> Result<(), Self::Error> {
        self.max_depth = self.max_depth.max(ctx.depth);
        match &node.value {
            NodeValue::Object(_) => self.objects += 1,
            NodeValue::Array(_) => self.arrays += 1,
            NodeValue::Scalar(scalar) => {
                self.scalars += 1;
                if matches!(scalar.kind, ScalarKind::Embedded(_)) {
                    self.embedded += 1;
                }
            }
        }
        Ok(())
    }
}

/// Collect shape statistics for a tree.
pub fn tree_stats(root: &ParseNode) -> TreeStats {
    let mut stats = TreeStats::default();
    match traverse(root, &mut stats) {
        Ok(()) => stats,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::ExprLanguage;
    use crate::node::Scalar;

    fn scalar(key: &str, line: usize) -> ParseNode {
        ParseNode::keyed(
            key,
            NodeValue::Scalar(Scalar::bare("x")),
            SourcePos::new(line, 1),
        )
    }

    #[test]
    fn test_monotonic_positions_accepted() {
        let root = ParseNode::item(
            NodeValue::Object(vec![scalar("a", 1), scalar("b", 2), scalar("c", 2)]),
            SourcePos::start(),
        );
        assert!(check_monotonic_positions(&root).is_ok());
    }

    #[test]
    fn test_decreasing_position_rejected() {
        let root = ParseNode::item(
            NodeValue::Object(vec![scalar("a", 3), scalar("b", 2)]),
            SourcePos::start(),
        );
        let err = check_monotonic_positions(&root).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Structural);
        assert_eq!(err.line, 2);
        assert_eq!(err.context.as_deref(), Some("at b"));
    }

    #[test]
    fn test_visitor_sees_paths_and_depth() {
        struct Paths(Vec<String>);
        impl NodeVisitor for Paths {
            type Error = ();
            fn enter_node(&mut self, _: &ParseNode, ctx: &VisitorContext) -> Result<(), ()> {
                self.0.push(format!("{}@{}", ctx.path_string(), ctx.depth));
                Ok(())
            }
        }
        let root = ParseNode::item(
            NodeValue::Object(vec![ParseNode::keyed(
                "model",
                NodeValue::Object(vec![scalar("culture", 2)]),
                SourcePos::start(),
            )]),
            SourcePos::start(),
        );
        let mut paths = Paths(Vec::new());
        traverse(&root, &mut paths).unwrap();
        assert_eq!(paths.0, vec!["root@0", "model@1", "model.culture@2"]);
    }

    #[test]
    fn test_tree_stats() {
        let root = ParseNode::item(
            NodeValue::Object(vec![
                scalar("a", 1),
                ParseNode::keyed(
                    "e",
                    NodeValue::Scalar(Scalar::embedded("1", ExprLanguage::Dax)),
                    SourcePos::new(2, 1),
                ),
                ParseNode::keyed("l", NodeValue::Array(vec![]), SourcePos::new(3, 1)),
            ]),
            SourcePos::start(),
        );
        let stats = tree_stats(&root);
        assert_eq!(stats.objects, 1);
        assert_eq!(stats.arrays, 1);
        assert_eq!(stats.scalars, 2);
        assert_eq!(stats.embedded, 1);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.total(), 4);
    }
}
