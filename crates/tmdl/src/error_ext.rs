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

//! Error context helpers.
//!
//! [`TmdlResultExt`] annotates errors with where they happened as they
//! propagate, without changing their kind, message or position.
//!
//! # Examples
//!
//! ```rust
//! use tmdl::{parse, TmdlResultExt};
//!
//! fn load(name: &str, source: &str) -> tmdl::TmdlResult<tmdl::Document> {
//!     parse(source).with_context(|| format!("while parsing {}", name))
//! }
//!
//! let err = load("Sales.tmdl", "name: \"Sales\n").unwrap_err();
//! assert_eq!(err.context.as_deref(), Some("while parsing Sales.tmdl"));
//! ```
//!
//! I/O errors convert into [`TmdlErrorKind::IO`](crate::TmdlErrorKind::IO):
//!
//! ```rust
//! use tmdl::{TmdlErrorKind, TmdlResultExt};
//!
//! let err = std::fs::read_to_string("/no/such/file.tmdl")
//!     .context("reading model")
//!     .unwrap_err();
//! assert_eq!(err.kind, TmdlErrorKind::IO);
//! ```

use crate::{TmdlError, TmdlResult};
use std::fmt;

/// Extension trait for adding context to results.
pub trait TmdlResultExt<T> {
    /// Add context to an error.
    ///
    /// Context added later is placed in front of earlier context.
    fn context<C>(self, context: C) -> TmdlResult<T>
    where
        C: fmt::Display;

    /// Add context to an error, computing it only on the error path.
    fn with_context<C, F>(self, f: F) -> TmdlResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T> TmdlResultExt<T> for Result<T, TmdlError> {
    fn context<C>(self, context: C) -> TmdlResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context_to_error(e, context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> TmdlResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context_to_error(e, f().to_string()))
    }
}

impl<T> TmdlResultExt<T> for Result<T, std::io::Error> {
    fn context<C>(self, context: C) -> TmdlResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context_to_error(TmdlError::io(e.to_string()), context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> TmdlResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context_to_error(TmdlError::io(e.to_string()), f().to_string()))
    }
}

/// Prepend `new_context` to the error's context, separated by `; `.
fn add_context_to_error(mut error: TmdlError, new_context: String) -> TmdlError {
    if new_context.is_empty() {
        return error;
    }

    error.context = Some(match error.context {
        Some(existing) => format!("{}; {}", new_context, existing),
        None => new_context,
    });

    error
}
