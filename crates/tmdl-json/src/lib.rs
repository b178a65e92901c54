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

//! TMDL JSON Conversion
//!
//! Provides the strict JSON fast path and canonical JSON output.
//!
//! # Features
//!
//! - **Strict Fast Path**: Decode strict JSON straight into the parse tree,
//!   preserving member order and duplicate keys
//! - **Clean Fallback**: Anything that is not strict JSON is reported as
//!   not decodable instead of as an error
//! - **Canonical Output**: Deterministic key order for `CanonicalModel`
//! - **Security Limits**: Nesting depth and node count are bounded
//!
//! # Modules
//!
//! - [`fast_path`]: strict decoding into `tmdl_core::Document`
//! - [`to_json`](mod@to_json): `CanonicalModel` serialization
//!
//! # Examples
//!
//! ```rust
//! use tmdl_core::{normalize, Limits};
//! use tmdl_json::{decode_strict, to_json, FastPathOutcome, ToJsonConfig};
//!
//! let outcome = decode_strict(r#"{"name": "Sales", "model": {}}"#, &Limits::default()).unwrap();
//! if let FastPathOutcome::Decoded(doc) = outcome {
//!     let model = normalize(&doc).unwrap();
//!     let json = to_json(&model, &ToJsonConfig::default()).unwrap();
//!     assert_eq!(json, r#"{"name":"Sales","model":{}}"#);
//! }
//! ```

pub mod fast_path;
pub mod to_json;

pub use fast_path::{decode_strict, from_json, FastPathOutcome};
pub use to_json::{to_json, to_json_pretty, to_json_writer, JsonError, ToJsonConfig};
