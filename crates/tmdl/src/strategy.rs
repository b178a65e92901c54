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

//! Parse strategies, tried in order.

use tmdl_core::builder::{build_tree, BuilderOptions};
use tmdl_core::lex::Tokenizer;
use tmdl_core::{Document, ParseOptions, ParsePath, TmdlResult};
use tmdl_json::{decode_strict, FastPathOutcome};

/// Result of one strategy.
pub(crate) enum Attempt {
    Parsed(Document),
    /// The strategy does not apply to this input; the reason is logged.
    Declined(String),
}

pub(crate) trait ParseStrategy: Sync {
    fn name(&self) -> &'static str;

    fn enabled(&self, _options: &ParseOptions) -> bool {
        true
    }

    /// Parse `source`, which has already passed the input limits.
    fn attempt(&self, source: &str, options: &ParseOptions) -> TmdlResult<Attempt>;
}

/// Strict JSON decoding.
pub(crate) struct FastPath;

impl ParseStrategy for FastPath {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn enabled(&self, options: &ParseOptions) -> bool {
        options.fast_path
    }

    fn attempt(&self, source: &str, options: &ParseOptions) -> TmdlResult<Attempt> {
        Ok(match decode_strict(source, &options.limits)? {
            FastPathOutcome::Decoded(doc) => Attempt::Parsed(doc),
            FastPathOutcome::NotStrictDecodable(reason) => Attempt::Declined(reason),
        })
    }
}

/// Indentation-aware TMDL parsing. Accepts every input it can parse.
pub(crate) struct Tolerant;

impl ParseStrategy for Tolerant {
    fn name(&self) -> &'static str {
        "tolerant"
    }

    fn attempt(&self, source: &str, options: &ParseOptions) -> TmdlResult<Attempt> {
        let tokens = Tokenizer::with_limits(source, &options.limits);
        let root = build_tree(
            tokens,
            BuilderOptions {
                keep_comments: options.keep_comments,
                max_nodes: options.limits.max_nodes,
            },
        )?;
        Ok(Attempt::Parsed(Document::new(root, ParsePath::Tolerant)))
    }
}

pub(crate) const STRATEGIES: [&dyn ParseStrategy; 2] = [&FastPath, &Tolerant];
