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

//! Indentation-aware tree builder.
//!
//! Consumes the token stream and assembles the generic parse tree using an
//! explicit stack of frames, one per open indentation level. Each frame
//! collects the entries written at its width; a deeper line opens a frame
//! owned by the previous entry and a shallower line closes frames, handing
//! their entries to the owners.
//!
//! Entry lines take these shapes:
//!
//! ```text
//! culture: en-US              property
//! dataAccessOptions           bare word (keyed block when children follow)
//! ref table 'Sales'           declaration: modifiers, keyword, name
//! measure 'Total' = SUM(x)    declaration with default property
//! - Customer                  list item
//! { "a": 1 }                  keyless flow value
//! ```

use crate::error::{TmdlError, TmdlErrorKind, TmdlResult};
use crate::lex::{
    IndentChange, IndentMarker, LexResult, Punct, QuoteStyle, ScalarLiteral, SourcePos, Token,
    TokenKind,
};
use crate::node::{NodeValue, ParseNode, Scalar};
use crate::schema;
use std::iter::Peekable;
use tracing::trace;

/// Tree builder options.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Attach comments to the following node.
    pub keep_comments: bool,
    /// Maximum number of parse nodes.
    pub max_nodes: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            keep_comments: false,
            max_nodes: usize::MAX,
        }
    }
}

/// A word in the head of an entry line.
#[derive(Debug, Clone)]
struct Word {
    text: String,
    pos: SourcePos,
    /// `None` for identifiers.
    quote: Option<QuoteStyle>,
}

impl Word {
    fn into_scalar(self) -> Scalar {
        match self.quote {
            None | Some(QuoteStyle::Bare) => Scalar::bare(self.text),
            Some(QuoteStyle::Single) => Scalar::name(self.text),
            Some(QuoteStyle::Double) => Scalar::quoted(self.text),
        }
    }
}

#[derive(Debug)]
enum EntryKind {
    /// `key: value`, `key:` or `key = expr`.
    Property {
        key: String,
        value: Option<NodeValue>,
    },
    /// `modifier* keyword name [= expr]`.
    Declaration {
        keyword: String,
        name: Word,
        modifiers: Vec<Word>,
        default: Option<(Scalar, SourcePos)>,
    },
    /// A single word with no delimiter.
    Word(Word),
    /// `- value` or a lone `-`.
    Item(Option<NodeValue>),
    /// A keyless `[...]` or `{...}` value.
    Flow(ParseNode),
}

#[derive(Debug)]
struct Entry {
    pos: SourcePos,
    kind: EntryKind,
    comments: Vec<String>,
    description: Option<(String, SourcePos)>,
    children: Option<Vec<Entry>>,
}

impl Entry {
    fn can_have_children(&self) -> bool {
        match &self.kind {
            EntryKind::Property { value, .. } => value.is_none(),
            EntryKind::Declaration { .. } | EntryKind::Word(_) => true,
            EntryKind::Item(value) => value.is_none(),
            EntryKind::Flow(_) => false,
        }
    }

    fn has_key(&self) -> bool {
        match &self.kind {
            EntryKind::Property { .. } | EntryKind::Declaration { .. } => true,
            EntryKind::Word(_) => self.children.is_some(),
            EntryKind::Item(_) | EntryKind::Flow(_) => false,
        }
    }

    fn label(&self) -> String {
        match &self.kind {
            EntryKind::Property { key, .. } => format!("'{}'", key),
            EntryKind::Declaration { keyword, name, .. } => format!("{} '{}'", keyword, name.text),
            EntryKind::Word(w) => format!("'{}'", w.text),
            EntryKind::Item(_) => "list item".to_string(),
            EntryKind::Flow(_) => "inline value".to_string(),
        }
    }
}

/// Children of a block are either inferred from their keys or forced to
/// form an object (declarations and bare-word blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockShape {
    Inferred,
    Object,
}

/// One open indentation level.
#[derive(Debug)]
struct Frame {
    width: usize,
    entries: Vec<Entry>,
}

fn syntax(message: impl Into<String>, pos: SourcePos) -> TmdlError {
    TmdlError::at(TmdlErrorKind::Syntax, message, pos)
}

fn structural(message: impl Into<String>, pos: SourcePos) -> TmdlError {
    TmdlError::at(TmdlErrorKind::Structural, message, pos)
}

fn scalar_of(lit: ScalarLiteral) -> Scalar {
    match lit.quote {
        QuoteStyle::Bare => Scalar::bare(lit.text),
        QuoteStyle::Single => Scalar::name(lit.text),
        QuoteStyle::Double => Scalar::quoted(lit.text),
    }
}

/// Builds a parse tree from a token stream.
pub struct TreeBuilder<I: Iterator<Item = LexResult<Token>>> {
    tokens: Peekable<I>,
    options: BuilderOptions,
    frames: Vec<Frame>,
    pending_comments: Vec<String>,
    pending_description: Option<(String, SourcePos)>,
    node_count: usize,
}

impl<I: Iterator<Item = LexResult<Token>>> TreeBuilder<I> {
    pub fn new(tokens: I, options: BuilderOptions) -> Self {
        Self {
            tokens: tokens.peekable(),
            options,
            frames: vec![Frame {
                width: 0,
                entries: Vec::new(),
            }],
            pending_comments: Vec::new(),
            pending_description: None,
            node_count: 0,
        }
    }

    /// Consume the token stream and return the root node.
    pub fn build(mut self) -> TmdlResult<ParseNode> {
        while let Some(tok) = self.next_token()? {
            match tok.kind {
                TokenKind::Indent(marker) => {
                    self.apply_indent(marker, tok.pos)?;
                    self.parse_entry()?;
                }
                TokenKind::Comment(text) => {
                    if self.options.keep_comments {
                        self.pending_comments.push(text);
                    }
                }
                TokenKind::Description(text) => {
                    self.pending_description = Some(match self.pending_description.take() {
                        Some((prev, pos)) => (format!("{}\n{}", prev, text), pos),
                        None => (text, tok.pos),
                    });
                }
                TokenKind::Eof => break,
                other => {
                    return Err(structural(
                        format!("unexpected {} outside an entry", other.describe()),
                        tok.pos,
                    ));
                }
            }
        }
        self.finish()
    }

    fn next_token(&mut self) -> TmdlResult<Option<Token>> {
        match self.tokens.next() {
            None => Ok(None),
            Some(Ok(tok)) => Ok(Some(tok)),
            Some(Err(e)) => Err(e.into()),
        }
    }

    fn at_eof(&mut self) -> bool {
        match self.tokens.peek() {
            None => true,
            Some(Ok(tok)) => tok.kind == TokenKind::Eof,
            Some(Err(_)) => false,
        }
    }

    fn count_node(&mut self, pos: SourcePos) -> TmdlResult<()> {
        self.node_count += 1;
        if self.node_count > self.options.max_nodes {
            return Err(TmdlError::at(
                TmdlErrorKind::Security,
                format!("node count exceeds maximum {}", self.options.max_nodes),
                pos,
            ));
        }
        Ok(())
    }

    // ==================== Frames ====================

    fn apply_indent(&mut self, marker: IndentMarker, pos: SourcePos) -> TmdlResult<()> {
        match marker.change {
            IndentChange::Same => {}
            IndentChange::Deeper => {
                let owner = self
                    .frames
                    .last()
                    .and_then(|frame| frame.entries.last())
                    .ok_or_else(|| syntax("unexpected indentation", pos))?;
                if !owner.can_have_children() {
                    return Err(syntax(
                        format!(
                            "unexpected indentation: {} cannot contain nested entries",
                            owner.label()
                        ),
                        pos,
                    ));
                }
                trace!(width = marker.width, depth = self.frames.len(), "push frame");
                self.frames.push(Frame {
                    width: marker.width,
                    entries: Vec::new(),
                });
            }
            IndentChange::Shallower(levels) => {
                if levels >= self.frames.len() {
                    return Err(structural(
                        format!(
                            "dedent of {} levels with only {} open",
                            levels,
                            self.frames.len() - 1
                        ),
                        pos,
                    ));
                }
                for _ in 0..levels {
                    self.pop_frame(pos)?;
                }
            }
        }

        let width = self.frames.last().map_or(0, |f| f.width);
        if width != marker.width {
            return Err(structural(
                format!(
                    "indentation frames out of sync: frame width {}, line width {}",
                    width, marker.width
                ),
                pos,
            ));
        }
        Ok(())
    }

    fn pop_frame(&mut self, pos: SourcePos) -> TmdlResult<()> {
        let frame = match self.frames.pop() {
            Some(frame) if !self.frames.is_empty() => frame,
            _ => return Err(structural("cannot close the root frame", pos)),
        };
        trace!(width = frame.width, entries = frame.entries.len(), "pop frame");
        let owner = self
            .frames
            .last_mut()
            .and_then(|parent| parent.entries.last_mut())
            .ok_or_else(|| structural("closed frame has no owner", pos))?;
        owner.children = Some(frame.entries);
        Ok(())
    }

    fn finish(mut self) -> TmdlResult<ParseNode> {
        while self.frames.len() > 1 {
            self.pop_frame(SourcePos::start())?;
        }
        let mut entries = self
            .frames
            .pop()
            .map(|frame| frame.entries)
            .unwrap_or_default();

        let single_flow = entries.len() == 1 && matches!(entries[0].kind, EntryKind::Flow(_));
        let mut root = match entries.pop() {
            Some(entry) if single_flow => {
                let mut node = convert_entry(entry)?;
                node.key = None;
                node
            }
            Some(entry) => {
                entries.push(entry);
                ParseNode::item(
                    convert_block(entries, BlockShape::Inferred)?,
                    SourcePos::start(),
                )
            }
            None => ParseNode::item(NodeValue::Object(Vec::new()), SourcePos::start()),
        };

        // Comments and descriptions with no following entry stay on the root
        if let Some((text, _)) = self.pending_description.take() {
            root.comments.push(format!("/// {}", text));
        }
        root.comments.append(&mut self.pending_comments);
        Ok(root)
    }

    // ==================== Entry lines ====================

    /// Read the tokens of one entry line and add the entry to the current
    /// frame.
    fn parse_entry(&mut self) -> TmdlResult<()> {
        let mut line = Vec::new();
        let mut comments = std::mem::take(&mut self.pending_comments);
        while !self.at_eof() {
            let tok = match self.next_token()? {
                Some(tok) => tok,
                None => break,
            };
            match tok.kind {
                TokenKind::Punct(Punct::Newline) => break,
                TokenKind::Comment(text) => {
                    if self.options.keep_comments {
                        comments.push(text);
                    }
                }
                _ => line.push(tok),
            }
        }

        // Trailing commas are ignored structurally
        if line.last().map_or(false, |t| t.is_punct(Punct::Comma)) {
            line.pop();
        }
        let description = self.pending_description.take();
        let Some(first) = line.first() else {
            return Ok(());
        };
        let pos = first.pos;
        self.count_node(pos)?;

        let kind = self.interpret_line(line)?;
        let entry = Entry {
            pos,
            kind,
            comments,
            description,
            children: None,
        };
        match self.frames.last_mut() {
            Some(frame) => frame.entries.push(entry),
            None => return Err(structural("no open frame", pos)),
        }
        Ok(())
    }

    fn interpret_line(&mut self, line: Vec<Token>) -> TmdlResult<EntryKind> {
        let first_pos = line[0].pos;
        match &line[0].kind {
            TokenKind::Punct(Punct::Dash) => {
                let value = self.inline_value(&line[1..])?;
                return Ok(EntryKind::Item(value));
            }
            TokenKind::Punct(Punct::LBracket | Punct::LBrace) => {
                let (node, next) = self.parse_flow(&line, 0)?;
                if let Some(extra) = line.get(next) {
                    return Err(syntax(
                        format!("unexpected {} after value", extra.kind.describe()),
                        extra.pos,
                    ));
                }
                return Ok(EntryKind::Flow(node));
            }
            _ => {}
        }

        let mut words = Vec::new();
        let mut rest = line.into_iter();
        let mut delimiter = None;
        for tok in rest.by_ref() {
            match tok.kind {
                TokenKind::Identifier(text) => words.push(Word {
                    text,
                    pos: tok.pos,
                    quote: None,
                }),
                TokenKind::Scalar(lit) => words.push(Word {
                    text: lit.text,
                    pos: tok.pos,
                    quote: Some(lit.quote),
                }),
                _ => {
                    delimiter = Some(tok);
                    break;
                }
            }
        }
        let rest: Vec<Token> = rest.collect();

        if words.is_empty() {
            let tok = delimiter.map_or_else(|| "end of line".to_string(), |t| t.kind.describe());
            return Err(syntax(format!("unexpected {}", tok), first_pos));
        }

        match delimiter {
            None => Ok(Self::head_entry(words, None)),
            Some(tok) if tok.is_punct(Punct::Colon) => {
                if words.len() != 1 {
                    return Err(syntax("expected a single key before ':'", words[1].pos));
                }
                let value = self.inline_value(&rest)?;
                let key = words.remove(0).text;
                Ok(EntryKind::Property { key, value })
            }
            Some(tok) if tok.is_punct(Punct::Equals) => {
                let mut rest = rest.into_iter();
                let (block, pos) = match rest.next() {
                    Some(Token {
                        kind: TokenKind::Embedded(block),
                        pos,
                    }) => (block, pos),
                    _ => return Err(structural("'=' without an expression block", tok.pos)),
                };
                if let Some(extra) = rest.next() {
                    return Err(syntax(
                        format!("unexpected {} after expression", extra.kind.describe()),
                        extra.pos,
                    ));
                }
                let scalar = Scalar::embedded(block.text, block.language);
                if words.len() == 1 {
                    let key = words.remove(0).text;
                    Ok(EntryKind::Property {
                        key,
                        value: Some(NodeValue::Scalar(scalar)),
                    })
                } else {
                    Ok(Self::head_entry(words, Some((scalar, pos))))
                }
            }
            Some(tok) => Err(syntax(
                format!("unexpected {}", tok.kind.describe()),
                tok.pos,
            )),
        }
    }

    /// Entry made only of head words: a single word or a declaration.
    fn head_entry(mut words: Vec<Word>, default: Option<(Scalar, SourcePos)>) -> EntryKind {
        if words.len() == 1 && default.is_none() {
            return EntryKind::Word(words.remove(0));
        }
        // At least two words here: a lone word with '=' is a property
        let name = words.remove(words.len() - 1);
        let keyword = words.remove(words.len() - 1).text;
        EntryKind::Declaration {
            keyword,
            name,
            modifiers: words,
            default,
        }
    }

    /// Value after `:` or `-`: nothing, a scalar or a flow value.
    fn inline_value(&mut self, toks: &[Token]) -> TmdlResult<Option<NodeValue>> {
        let Some(first) = toks.first() else {
            return Ok(None);
        };
        let (value, next) = match &first.kind {
            TokenKind::Scalar(lit) => (NodeValue::Scalar(scalar_of(lit.clone())), 1),
            TokenKind::Identifier(text) => (NodeValue::Scalar(Scalar::bare(text.clone())), 1),
            TokenKind::Punct(Punct::LBracket | Punct::LBrace) => {
                let (node, next) = self.parse_flow(toks, 0)?;
                (node.value, next)
            }
            other => {
                return Err(syntax(
                    format!("expected a value, found {}", other.describe()),
                    first.pos,
                ))
            }
        };
        if let Some(extra) = toks.get(next) {
            return Err(syntax(
                format!("unexpected {} after value", extra.kind.describe()),
                extra.pos,
            ));
        }
        Ok(Some(value))
    }

    // ==================== Flow values ====================

    fn parse_flow(&mut self, toks: &[Token], start: usize) -> TmdlResult<(ParseNode, usize)> {
        let tok = toks
            .get(start)
            .ok_or_else(|| syntax("unexpected end of value", SourcePos::start()))?;
        self.count_node(tok.pos)?;
        let pos = tok.pos;
        match &tok.kind {
            TokenKind::Scalar(lit) => Ok((
                ParseNode::item(NodeValue::Scalar(scalar_of(lit.clone())), pos),
                start + 1,
            )),
            TokenKind::Identifier(text) => Ok((
                ParseNode::item(NodeValue::Scalar(Scalar::bare(text.clone())), pos),
                start + 1,
            )),
            TokenKind::Punct(Punct::LBracket) => {
                let mut items = Vec::new();
                let mut i = start + 1;
                loop {
                    if Self::punct_at(toks, i, Punct::RBracket) {
                        i += 1;
                        break;
                    }
                    let (item, next) = self.parse_flow(toks, i)?;
                    items.push(item);
                    i = next;
                    if Self::punct_at(toks, i, Punct::Comma) {
                        i += 1;
                    } else if Self::punct_at(toks, i, Punct::RBracket) {
                        i += 1;
                        break;
                    } else {
                        return Err(Self::expected(toks, i, "',' or ']'", pos));
                    }
                }
                Ok((ParseNode::item(NodeValue::Array(items), pos), i))
            }
            TokenKind::Punct(Punct::LBrace) => {
                let mut members = Vec::new();
                let mut i = start + 1;
                loop {
                    if Self::punct_at(toks, i, Punct::RBrace) {
                        i += 1;
                        break;
                    }
                    let (key, key_pos) = match toks.get(i) {
                        Some(Token {
                            kind: TokenKind::Scalar(lit),
                            pos,
                        }) => (lit.text.clone(), *pos),
                        Some(Token {
                            kind: TokenKind::Identifier(text),
                            pos,
                        }) => (text.clone(), *pos),
                        _ => return Err(Self::expected(toks, i, "a key", pos)),
                    };
                    if !Self::punct_at(toks, i + 1, Punct::Colon) {
                        return Err(Self::expected(toks, i + 1, "':'", pos));
                    }
                    let (mut member, next) = self.parse_flow(toks, i + 2)?;
                    member.key = Some(key);
                    member.pos = key_pos;
                    members.push(member);
                    i = next;
                    if Self::punct_at(toks, i, Punct::Comma) {
                        i += 1;
                    } else if Self::punct_at(toks, i, Punct::RBrace) {
                        i += 1;
                        break;
                    } else {
                        return Err(Self::expected(toks, i, "',' or '}'", pos));
                    }
                }
                Ok((ParseNode::item(NodeValue::Object(members), pos), i))
            }
            other => Err(syntax(
                format!("expected a value, found {}", other.describe()),
                pos,
            )),
        }
    }

    fn punct_at(toks: &[Token], i: usize, punct: Punct) -> bool {
        toks.get(i).map_or(false, |t| t.is_punct(punct))
    }

    fn expected(toks: &[Token], i: usize, what: &str, open: SourcePos) -> TmdlError {
        match toks.get(i) {
            Some(tok) => syntax(
                format!("expected {}, found {}", what, tok.kind.describe()),
                tok.pos,
            ),
            None => syntax(format!("expected {}", what), open),
        }
    }
}

// ==================== Entry to node conversion ====================

fn convert_block(entries: Vec<Entry>, shape: BlockShape) -> TmdlResult<NodeValue> {
    let object = shape == BlockShape::Object || entries.iter().any(Entry::has_key);
    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        if object && !entry.has_key() {
            nodes.push(convert_flag(entry)?);
        } else {
            nodes.push(convert_entry(entry)?);
        }
    }
    Ok(if object {
        NodeValue::Object(nodes)
    } else {
        NodeValue::Array(nodes)
    })
}

/// A keyless bare identifier inside an object is a flag: `isHidden` means
/// `isHidden: true`.
fn convert_flag(entry: Entry) -> TmdlResult<ParseNode> {
    match entry.kind {
        EntryKind::Word(Word {
            text, quote: None, ..
        }) => {
            let mut node =
                ParseNode::keyed(text, NodeValue::Scalar(Scalar::bare("true")), entry.pos);
            node.comments = entry.comments;
            Ok(node)
        }
        _ => Err(syntax(
            format!("{} without a key inside a mapping", entry.label()),
            entry.pos,
        )),
    }
}

fn convert_entry(entry: Entry) -> TmdlResult<ParseNode> {
    let Entry {
        pos,
        kind,
        comments,
        description,
        children,
    } = entry;

    let mut node = match kind {
        EntryKind::Property {
            key,
            value: Some(value),
        } => ParseNode::keyed(key, value, pos),
        EntryKind::Property { key, value: None } => {
            let value = match children {
                Some(children) => convert_block(children, BlockShape::Inferred)?,
                None => NodeValue::Object(Vec::new()),
            };
            ParseNode::keyed(key, value, pos)
        }
        EntryKind::Declaration {
            keyword,
            name,
            modifiers,
            default,
        } => {
            let mut members = Vec::new();
            for modifier in modifiers {
                members.push(ParseNode::keyed(
                    modifier.text,
                    NodeValue::Scalar(Scalar::bare("true")),
                    modifier.pos,
                ));
            }
            members.push(ParseNode::keyed(
                "name",
                NodeValue::Scalar(Scalar::name(name.text)),
                name.pos,
            ));
            if let Some((mut scalar, value_pos)) = default {
                if schema::default_is_word(&keyword) && schema::is_default_word(&scalar.text) {
                    scalar = Scalar::name(scalar.text);
                }
                members.push(ParseNode::keyed(
                    schema::default_property(&keyword),
                    NodeValue::Scalar(scalar),
                    value_pos,
                ));
            }
            if let Some(children) = children {
                match convert_block(children, BlockShape::Object)? {
                    NodeValue::Object(nodes) => members.extend(nodes),
                    other => {
                        return Err(structural(
                            format!("declaration body became {}", other.type_name()),
                            pos,
                        ))
                    }
                }
            }
            ParseNode::keyed(keyword, NodeValue::Object(members), pos)
        }
        EntryKind::Word(word) => match children {
            Some(children) => {
                ParseNode::keyed(word.text, convert_block(children, BlockShape::Object)?, pos)
            }
            None => ParseNode::item(NodeValue::Scalar(word.into_scalar()), pos),
        },
        EntryKind::Item(Some(value)) => ParseNode::item(value, pos),
        EntryKind::Item(None) => {
            let value = match children {
                Some(children) => convert_block(children, BlockShape::Inferred)?,
                None => NodeValue::Object(Vec::new()),
            };
            ParseNode::item(value, pos)
        }
        EntryKind::Flow(node) => node,
    };

    if let Some((text, desc_pos)) = description {
        match &mut node.value {
            NodeValue::Object(members) => {
                members.insert(
                    0,
                    ParseNode::keyed(
                        "description",
                        NodeValue::Scalar(Scalar::quoted(text)),
                        desc_pos,
                    ),
                );
                node.pos = desc_pos;
            }
            _ => node.comments.push(format!("/// {}", text)),
        }
    }
    node.comments.extend(comments);
    Ok(node)
}

/// Build a parse tree from any token stream.
pub fn build_tree<I>(tokens: I, options: BuilderOptions) -> TmdlResult<ParseNode>
where
    I: Iterator<Item = LexResult<Token>>,
{
    TreeBuilder::new(tokens, options).build()
}
