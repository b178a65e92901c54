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

//! Strict JSON decoding into the generic parse tree.
//!
//! The decoder drives `serde_json` with a custom [`Visitor`] so that object
//! members keep their source order (decoding through `serde_json::Value`
//! would sort them). Any deviation from strict JSON is reported as
//! [`FastPathOutcome::NotStrictDecodable`]; the caller is expected to fall
//! back to the tolerant parser.
//!
//! JSON strings become `Quoted` scalars. Booleans and `null` become `Bare`
//! scalars holding their canonical text. Numbers become `Bare` scalars
//! holding their source lexeme (`-0` stays `-0`, `1e2` stays `1e2`), so the
//! normalizer coerces them exactly as it coerces tolerant-path input.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use std::collections::VecDeque;
use std::fmt;
use tmdl_core::{
    Document, Limits, NodeValue, ParseNode, ParsePath, Scalar, SourcePos, TmdlError,
    TmdlErrorKind, TmdlResult,
};

/// Result of a strict decode attempt.
#[derive(Debug, Clone)]
pub enum FastPathOutcome {
    /// The input was strict JSON with an object root.
    Decoded(Document),
    /// The input is not strict JSON; carries the reason.
    NotStrictDecodable(String),
}

impl FastPathOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    /// The decoded document, if any.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Decoded(doc) => Some(doc),
            Self::NotStrictDecodable(_) => None,
        }
    }
}

/// Limits and counters shared by all seeds of one decode.
struct DecodeState<'src> {
    max_depth: usize,
    max_nodes: usize,
    nodes: usize,
    /// Number literals of the source, in document order.
    numbers: VecDeque<&'src str>,
    /// Set when a limit aborted decoding; reported as a security error.
    limit_error: Option<TmdlError>,
}

impl DecodeState<'_> {
    /// Source text of the next number; `fallback` only runs on malformed
    /// input that serde_json is about to reject anyway.
    fn number_text(&mut self, fallback: impl FnOnce() -> String) -> String {
        self.numbers
            .pop_front()
            .map_or_else(fallback, str::to_string)
    }

    fn enter<E: de::Error>(&mut self, depth: usize) -> Result<(), E> {
        self.nodes += 1;
        if self.nodes > self.max_nodes {
            let err = TmdlError::security(
                format!("node count exceeds maximum {}", self.max_nodes),
                0,
            );
            self.limit_error = Some(err);
            return Err(E::custom("node limit exceeded"));
        }
        if depth > self.max_depth {
            let err = TmdlError::security(
                format!("nesting depth {} exceeds maximum {}", depth, self.max_depth),
                0,
            );
            self.limit_error = Some(err);
            return Err(E::custom("depth limit exceeded"));
        }
        Ok(())
    }
}

/// Decodes one JSON value into a keyless [`ParseNode`].
struct NodeSeed<'s, 'src> {
    state: &'s mut DecodeState<'src>,
    depth: usize,
}

impl<'de, 's, 'src> DeserializeSeed<'de> for NodeSeed<'s, 'src> {
    type Value = ParseNode;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<ParseNode, D::Error> {
        deserializer.deserialize_any(NodeVisitor {
            state: self.state,
            depth: self.depth,
        })
    }
}

struct NodeVisitor<'s, 'src> {
    state: &'s mut DecodeState<'src>,
    depth: usize,
}

fn scalar(scalar: Scalar) -> ParseNode {
    ParseNode::item(NodeValue::Scalar(scalar), SourcePos::start())
}

impl<'de, 's, 'src> Visitor<'de> for NodeVisitor<'s, 'src> {
    type Value = ParseNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::bare(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::bare(self.state.number_text(|| v.to_string()))))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::bare(self.state.number_text(|| v.to_string()))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        if !v.is_finite() {
            return Err(E::custom("non-finite number"));
        }
        Ok(scalar(Scalar::bare(self.state.number_text(|| v.to_string()))))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::quoted(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::quoted(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ParseNode, E> {
        self.state.enter(self.depth)?;
        Ok(scalar(Scalar::bare("null")))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ParseNode, A::Error> {
        self.state.enter(self.depth)?;
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(NodeSeed {
            state: &mut *self.state,
            depth: self.depth + 1,
        })? {
            items.push(item);
        }
        Ok(ParseNode::item(NodeValue::Array(items), SourcePos::start()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ParseNode, A::Error> {
        self.state.enter(self.depth)?;
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let mut member = map.next_value_seed(NodeSeed {
                state: &mut *self.state,
                depth: self.depth + 1,
            })?;
            member.key = Some(key);
            members.push(member);
        }
        Ok(ParseNode::item(NodeValue::Object(members), SourcePos::start()))
    }
}

/// Number literals of a JSON text in document order.
///
/// Everything outside string literals that starts with `-` or a digit is a
/// number in valid JSON; serde_json visits numbers in the same order.
fn number_lexemes(source: &str) -> VecDeque<&str> {
    let bytes = source.as_bytes();
    let mut out = VecDeque::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' | b'0'..=b'9' => {
                let start = i;
                while i < bytes.len()
                    && matches!(bytes[i], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
                {
                    i += 1;
                }
                out.push_back(&source[start..i]);
            }
            _ => i += 1,
        }
    }
    out
}

/// Attempt to decode `source` as a strict JSON document with an object
/// root.
///
/// Returns `Ok(NotStrictDecodable)` for any input that is not strict JSON;
/// only exceeding a limit is an error.
pub fn decode_strict(source: &str, limits: &Limits) -> TmdlResult<FastPathOutcome> {
    if !source.trim_start().starts_with('{') {
        return Ok(FastPathOutcome::NotStrictDecodable(
            "root is not a JSON object".to_string(),
        ));
    }

    let mut state = DecodeState {
        max_depth: limits.max_flow_depth,
        max_nodes: limits.max_nodes,
        nodes: 0,
        numbers: number_lexemes(source),
        limit_error: None,
    };
    let mut de = serde_json::Deserializer::from_str(source);
    let decoded = NodeSeed {
        state: &mut state,
        depth: 0,
    }
    .deserialize(&mut de)
    .and_then(|root| de.end().map(|()| root));

    if let Some(err) = state.limit_error {
        return Err(err);
    }
    match decoded {
        Ok(root) if root.is_object() => {
            Ok(FastPathOutcome::Decoded(Document::new(root, ParsePath::Fast)))
        }
        Ok(root) => Ok(FastPathOutcome::NotStrictDecodable(format!(
            "root is a JSON {}",
            root.value.type_name()
        ))),
        Err(e) => Ok(FastPathOutcome::NotStrictDecodable(e.to_string())),
    }
}

/// Decode strict JSON or fail with a syntax error.
pub fn from_json(source: &str, limits: &Limits) -> TmdlResult<Document> {
    match decode_strict(source, limits)? {
        FastPathOutcome::Decoded(doc) => Ok(doc),
        FastPathOutcome::NotStrictDecodable(reason) => {
            Err(TmdlError::new(TmdlErrorKind::Syntax, reason, 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdl_core::ScalarKind;

    fn decode(source: &str) -> FastPathOutcome {
        decode_strict(source, &Limits::default()).unwrap()
    }

    fn keys(node: &ParseNode) -> Vec<&str> {
        node.children().iter().filter_map(|c| c.key()).collect()
    }

    // ==================== Decoded ====================

    #[test]
    fn test_key_order_preserved() {
        let doc = decode(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#)
            .into_document()
            .unwrap();
        assert_eq!(keys(&doc.root), vec!["zeta", "alpha", "mid"]);
        assert_eq!(doc.path, ParsePath::Fast);
    }

    #[test]
    fn test_scalar_kinds() {
        let doc = decode(r#"{"s": "1575", "n": 1575, "f": 1.5, "b": true, "z": null}"#)
            .into_document()
            .unwrap();
        let s = doc.root.get("s").unwrap().as_scalar().unwrap();
        assert_eq!(s.kind, ScalarKind::Quoted);
        let n = doc.root.get("n").unwrap().as_scalar().unwrap();
        assert_eq!((n.kind, n.text.as_str()), (ScalarKind::Bare, "1575"));
        assert_eq!(doc.root.get("f").unwrap().as_scalar().unwrap().text, "1.5");
        assert_eq!(doc.root.get("b").unwrap().as_scalar().unwrap().text, "true");
        assert_eq!(doc.root.get("z").unwrap().as_scalar().unwrap().text, "null");
    }

    #[test]
    fn test_numbers_keep_source_text() {
        let source = r#"{"a": -0, "b": -0.0, "c": 1e2, "d": 1.50, "e": "-1",
            "f": [2E-3, 18446744073709551616]}"#;
        let doc = decode(source).into_document().unwrap();
        let text = |key: &str| doc.root.get(key).unwrap().as_scalar().unwrap().text.clone();
        assert_eq!(text("a"), "-0");
        assert_eq!(text("b"), "-0.0");
        assert_eq!(text("c"), "1e2");
        assert_eq!(text("d"), "1.50");
        assert_eq!(text("e"), "-1");
        let f: Vec<&str> = doc.root.get("f").unwrap().children()
            .iter()
            .map(|c| c.as_scalar().unwrap().text.as_str())
            .collect();
        assert_eq!(f, vec!["2E-3", "18446744073709551616"]);
    }

    #[test]
    fn test_number_lexemes_skip_strings() {
        let found: Vec<&str> = number_lexemes(r#"{"k-1": "a\"9", "n": -12.5e+3}"#).into();
        assert_eq!(found, vec!["-12.5e+3"]);
    }

    #[test]
    fn test_duplicate_keys_kept() {
        let doc = decode(r#"{"a": 1, "a": 2}"#).into_document().unwrap();
        assert_eq!(keys(&doc.root), vec!["a", "a"]);
    }

    #[test]
    fn test_nested_arrays() {
        let doc = decode(r#"{"tables": [{"name": "T"}, [1, 2]]}"#)
            .into_document()
            .unwrap();
        let tables = doc.root.get("tables").unwrap();
        assert!(tables.is_array());
        assert_eq!(tables.children()[1].children().len(), 2);
    }

    // ==================== Not strict ====================

    #[test]
    fn test_tmdl_text_is_not_strict() {
        assert!(!decode("model Model\n\tculture: en-US\n").is_decoded());
    }

    #[test]
    fn test_trailing_comma_is_not_strict() {
        assert!(!decode(r#"{"a": [1, 2,]}"#).is_decoded());
    }

    #[test]
    fn test_comment_is_not_strict() {
        assert!(!decode("{\n// c\n\"a\": 1}").is_decoded());
    }

    #[test]
    fn test_trailing_content_is_not_strict() {
        assert!(!decode(r#"{"a": 1} extra"#).is_decoded());
    }

    #[test]
    fn test_array_root_is_not_strict() {
        match decode("[1, 2]") {
            FastPathOutcome::NotStrictDecodable(reason) => assert!(reason.contains("object")),
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    // ==================== Limits ====================

    #[test]
    fn test_node_limit_is_security_error() {
        let limits = Limits {
            max_nodes: 3,
            ..Limits::default()
        };
        let err = decode_strict(r#"{"a": 1, "b": 2, "c": 3}"#, &limits).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Security);
    }

    #[test]
    fn test_depth_limit_is_security_error() {
        let limits = Limits {
            max_flow_depth: 2,
            ..Limits::default()
        };
        let err = decode_strict(r#"{"a": {"b": {"c": 1}}}"#, &limits).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Security);
    }

    #[test]
    fn test_from_json_rejects_tmdl() {
        let err = from_json("name: x", &Limits::default()).unwrap_err();
        assert_eq!(err.kind, TmdlErrorKind::Syntax);
    }
}
