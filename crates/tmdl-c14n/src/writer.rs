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

//! TMDL writer.
//!
//! Every line the writer produces reads back through the tolerant parser
//! and the normalizer as the value it was written from. Where a compact
//! form (bare text, flags, declarations, inline expressions) would read
//! back differently, the writer falls back to an explicit one.

use crate::config::{C14nConfig, QuotingStrategy};
use crate::layout::{self, Layout};
use tmdl_core::lex::indent::indent_width;
use tmdl_core::lex::{classify, is_identifier, LiteralKind};
use tmdl_core::schema;
use tmdl_core::{CanonicalModel, Collection, ExprLanguage, Expression, TmdlError, TmdlResult, Value};

/// Pre-allocated output capacity.
const INITIAL_OUTPUT_BUFFER_CAPACITY: usize = 4096;

/// Maximum nesting depth of written values.
const MAX_NESTING_DEPTH: usize = 1000;

const FENCE: &str = "```";

/// Where a run of entries is written. Each scope reads back through a
/// different part of the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Document root.
    Root,
    /// Direct members of `database:`; routed one by one.
    Plain,
    /// Direct members of the `model:` section.
    Model,
    /// A `key:` or `-` block.
    Block,
    /// A declaration body, where keyless words are flags.
    Body,
}

/// A record that can be written as `keyword name`.
struct Declaration<'a> {
    description: Option<&'a str>,
    modifiers: Vec<&'a str>,
    name: &'a str,
    default: Option<DefaultValue<'a>>,
    body: &'a [(String, Layout)],
}

/// What follows `=` on a declaration line.
enum DefaultValue<'a> {
    Expression(&'a Expression),
    Word(&'a str),
}

/// Writer for TMDL output.
pub struct TmdlWriter {
    config: C14nConfig,
    out: String,
}

impl TmdlWriter {
    pub fn new(config: C14nConfig) -> Self {
        Self {
            config,
            out: String::with_capacity(INITIAL_OUTPUT_BUFFER_CAPACITY),
        }
    }

    /// Write a model and return the text.
    pub fn write_document(&mut self, model: &CanonicalModel) -> TmdlResult<String> {
        if !self.config.indent_is_valid() {
            return Err(TmdlError::conversion(format!(
                "invalid indent {:?}: expected tabs or spaces",
                self.config.indent
            )));
        }
        self.out.clear();
        match layout::build(model)? {
            Layout::Map(entries) => self.write_entries(&entries, 0, Scope::Root)?,
            Layout::List(items) if items.is_empty() => self.out.push_str("[]\n"),
            Layout::List(items) => self.write_items(&items, 0)?,
            Layout::Scalar(value) => {
                return Err(TmdlError::conversion(format!(
                    "cannot write a {} document root",
                    value.type_name()
                )))
            }
        }
        Ok(std::mem::take(&mut self.out))
    }

    // ==================== Entries ====================

    fn write_entries(
        &mut self,
        entries: &[(String, Layout)],
        depth: usize,
        scope: Scope,
    ) -> TmdlResult<()> {
        check_depth(depth)?;
        for (key, value) in entries {
            if scope == Scope::Root && key == "model" {
                if let Layout::Map(members) = value {
                    self.write_section(members, depth)?;
                    continue;
                }
            }
            if let Some((keyword, decls)) = self.declarations(key, value, scope) {
                for decl in decls {
                    self.write_declaration(keyword, &decl, depth)?;
                }
                continue;
            }
            self.write_entry(key, value, depth, scope)?;
        }
        Ok(())
    }

    fn write_section(&mut self, members: &[(String, Layout)], depth: usize) -> TmdlResult<()> {
        self.indent(depth);
        if members.is_empty() {
            self.out.push_str("model: {}\n");
            return Ok(());
        }
        self.out.push_str("model:\n");
        self.write_entries(members, depth + 1, Scope::Model)
    }

    fn write_entry(&mut self, key: &str, value: &Layout, depth: usize, scope: Scope) -> TmdlResult<()> {
        let key_text = format_key(key);
        match value {
            Layout::Scalar(Value::Expression(expr)) => {
                let default = property_language(key);
                self.write_expression(&key_text, expr, default, depth, false)
            }
            Layout::Scalar(Value::Bool(true)) if scope == Scope::Body && is_identifier(key) => {
                self.line(depth, &key_text);
                Ok(())
            }
            Layout::Scalar(scalar) => {
                let text = format!("{}: {}", key_text, self.format_scalar(scalar)?);
                self.line(depth, &text);
                Ok(())
            }
            Layout::Map(members) if members.is_empty() => {
                self.line(depth, &format!("{}: {{}}", key_text));
                Ok(())
            }
            Layout::Map(members) => {
                self.line(depth, &format!("{}:", key_text));
                let child = if scope == Scope::Root && key == "database" {
                    Scope::Plain
                } else {
                    Scope::Block
                };
                self.write_entries(members, depth + 1, child)
            }
            Layout::List(items) if items.is_empty() => {
                self.line(depth, &format!("{}: []", key_text));
                Ok(())
            }
            Layout::List(items) => {
                self.line(depth, &format!("{}:", key_text));
                self.write_items(items, depth + 1)
            }
        }
    }

    fn write_items(&mut self, items: &[Layout], depth: usize) -> TmdlResult<()> {
        check_depth(depth)?;
        for item in items {
            match item {
                // A list item cannot carry an expression block
                Layout::Scalar(Value::Expression(expr)) => {
                    let text = format!("- {}", quote(&expr.text));
                    self.line(depth, &text);
                }
                Layout::Scalar(scalar) => {
                    let text = format!("- {}", self.format_scalar(scalar)?);
                    self.line(depth, &text);
                }
                Layout::Map(members) if members.is_empty() => self.line(depth, "- {}"),
                Layout::Map(members) => {
                    self.line(depth, "-");
                    self.write_entries(members, depth + 1, Scope::Block)?;
                }
                Layout::List(inner) if inner.is_empty() => self.line(depth, "- []"),
                Layout::List(inner) => {
                    self.line(depth, "-");
                    self.write_items(inner, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    // ==================== Declarations ====================

    /// The declarations for a plural key, when every element can be
    /// written as one.
    fn declarations<'a>(
        &self,
        key: &str,
        value: &'a Layout,
        scope: Scope,
    ) -> Option<(&'static str, Vec<Declaration<'a>>)> {
        if !self.config.declarations {
            return None;
        }
        let keyword = match scope {
            Scope::Model => Collection::from_plural(key).map(|c| c.keyword()),
            Scope::Block | Scope::Body => schema::nested_keyword(key),
            Scope::Root | Scope::Plain => None,
        }?;
        let Layout::List(items) = value else {
            return None;
        };
        if items.is_empty() {
            return None;
        }
        let decls = items
            .iter()
            .map(|item| match item {
                Layout::Map(entries) => declaration(keyword, entries),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some((keyword, decls))
    }

    fn write_declaration(
        &mut self,
        keyword: &str,
        decl: &Declaration<'_>,
        depth: usize,
    ) -> TmdlResult<()> {
        if let Some(description) = decl.description {
            for line in description.split('\n') {
                if line.is_empty() {
                    self.line(depth, "///");
                } else {
                    self.line(depth, &format!("/// {}", line));
                }
            }
        }

        let mut head = String::new();
        for modifier in &decl.modifiers {
            head.push_str(modifier);
            head.push(' ');
        }
        head.push_str(keyword);
        head.push(' ');
        head.push_str(&format_name(decl.name));

        match decl.default {
            Some(DefaultValue::Expression(expr)) => {
                let has_body = !decl.body.is_empty();
                self.write_expression(&head, expr, declaration_language(keyword), depth, has_body)?;
            }
            Some(DefaultValue::Word(word)) => self.line(depth, &format!("{} = {}", head, word)),
            None => self.line(depth, &head),
        }
        self.write_entries(decl.body, depth + 1, Scope::Body)
    }

    // ==================== Expressions ====================

    /// Write `head = expression` in the most compact form that reads back
    /// exactly. `has_body` means deeper lines follow the expression.
    fn write_expression(
        &mut self,
        head: &str,
        expr: &Expression,
        default: ExprLanguage,
        depth: usize,
        has_body: bool,
    ) -> TmdlResult<()> {
        let text = expr.text.as_str();
        let native = expr.language == default;

        if native && is_inline(text) {
            self.line(depth, &format!("{} = {}", head, text));
            return Ok(());
        }

        let unit = self.config.indent_width();
        let floor = if has_body { (depth + 1) * unit } else { depth * unit };
        if native && is_indented_block(text, floor) {
            self.line(depth, &format!("{} =", head));
            self.out.push_str(text);
            self.out.push('\n');
            return Ok(());
        }

        if text.ends_with('\r') {
            return Err(TmdlError::conversion(format!(
                "expression for '{}' ends in a carriage return and cannot be written",
                head
            )));
        }
        let fence = fence_for(text);
        self.line(depth, &format!("{} = {}{}", head, fence, expr.language.tag()));
        self.out.push_str(text);
        self.out.push('\n');
        self.line(depth, &fence);
        Ok(())
    }

    // ==================== Scalars ====================

    fn format_scalar(&self, value: &Value) -> TmdlResult<String> {
        let text = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) if f.is_finite() => format!("{:?}", f),
            Value::Float(f) => {
                return Err(TmdlError::conversion(format!("non-finite number {}", f)))
            }
            Value::String(s) => match self.config.quoting {
                QuotingStrategy::Minimal if is_plain_text(s) => s.clone(),
                _ => quote(s),
            },
            Value::Expression(expr) => quote(&expr.text),
            Value::List(_) | Value::Map(_) => {
                return Err(TmdlError::conversion(format!(
                    "{} is not a scalar",
                    value.type_name()
                )))
            }
        };
        Ok(text)
    }

    // ==================== Output ====================

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(&self.config.indent);
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.indent(depth);
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn check_depth(depth: usize) -> TmdlResult<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(TmdlError::conversion(format!(
            "nesting depth {} exceeds maximum {}",
            depth, MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

/// Split a record into declaration parts, or `None` when writing it as a
/// declaration would read back differently.
fn declaration<'a>(keyword: &str, entries: &'a [(String, Layout)]) -> Option<Declaration<'a>> {
    let mut i = 0;
    let mut description = None;
    if let Some((key, Layout::Scalar(Value::String(text)))) = entries.first() {
        if key == "description" && is_description_text(text) {
            description = Some(text.as_str());
            i = 1;
        }
    }

    let mut modifiers = Vec::new();
    while let Some((key, Layout::Scalar(Value::Bool(true)))) = entries.get(i) {
        if !is_identifier(key) {
            return None;
        }
        modifiers.push(key.as_str());
        i += 1;
    }

    let name = match entries.get(i) {
        Some((key, Layout::Scalar(Value::String(name))))
            if key == "name" && !name.contains(['\n', '\r']) =>
        {
            name.as_str()
        }
        _ => return None,
    };
    i += 1;

    let default = match entries.get(i) {
        Some((key, Layout::Scalar(Value::Expression(expr))))
            if key == schema::default_property(keyword)
                && expr.language == declaration_language(keyword) =>
        {
            i += 1;
            Some(DefaultValue::Expression(expr))
        }
        Some((key, Layout::Scalar(Value::String(word))))
            if key == schema::default_property(keyword)
                && schema::default_is_word(keyword)
                && schema::is_default_word(word) =>
        {
            i += 1;
            Some(DefaultValue::Word(word))
        }
        _ => None,
    };

    Some(Declaration {
        description,
        modifiers,
        name,
        default,
        body: &entries[i..],
    })
}

fn declaration_language(keyword: &str) -> ExprLanguage {
    if schema::is_m_expression(Some(keyword), None) {
        ExprLanguage::M
    } else {
        ExprLanguage::Dax
    }
}

fn property_language(key: &str) -> ExprLanguage {
    if schema::is_m_expression(None, Some(key)) {
        ExprLanguage::M
    } else {
        ExprLanguage::Dax
    }
}

/// Description lines are written as `/// line` and read back trimmed.
fn is_description_text(text: &str) -> bool {
    !text.contains('\r') && text.split('\n').all(|line| line == line.trim_end())
}

fn is_inline(text: &str) -> bool {
    !text.is_empty()
        && !text.contains(['\n', '\r'])
        && text.trim_matches([' ', '\t']) == text
        && !text.starts_with(FENCE)
}

/// Whether `text` reads back unchanged as an indentation-delimited block
/// whose first line must be wider than `floor`.
fn is_indented_block(text: &str, floor: usize) -> bool {
    if text.contains('\r') {
        return false;
    }
    let mut lines = text.split('\n');
    let Some(first) = lines.next() else {
        return false;
    };
    if first.trim().is_empty() {
        return false;
    }
    let width = indent_width(first);
    if width <= floor {
        return false;
    }
    let last_is_blank = text.rsplit('\n').next().map_or(true, |l| l.trim().is_empty());
    !last_is_blank && lines.all(|line| line.trim().is_empty() || indent_width(line) >= width)
}

/// A fence one backtick longer than any backtick-only line of `text`.
fn fence_for(text: &str) -> String {
    let longest = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.bytes().all(|b| b == b'`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(FENCE.len()))
}

/// Text that reads back as the same string when written bare.
fn is_plain_text(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    !matches!(first, '"' | '\'' | '[' | '{')
        && s.trim() == s
        && !s.chars().any(char::is_control)
        && !s.contains("//")
        && !s.ends_with(',')
        && classify(s) == LiteralKind::Text
}

fn format_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn format_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// Double-quote with JSON escapes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
