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

//! Raw capture of embedded expression blocks.
//!
//! After an `=` the rest of the entry is foreign text (DAX or M) and is
//! captured verbatim in one of three forms:
//!
//! ```text
//! measure 'Total' = SUM(Sales[Amount])        inline
//!
//! measure 'Ratio' =
//!         VAR total = [Total]
//!         RETURN DIVIDE([Amount], total)      indentation-delimited
//!
//! expression Source = ```m
//!     let x = 1 in x
//!     ```                                     fenced
//! ```
//!
//! A fence is a run of three or more backticks and is closed by a line
//! holding exactly the same number of backticks, so a body containing a
//! ```` ``` ```` line is written with a longer fence.
//!
//! Captured text is an exact slice of the input: original line breaks and
//! whitespace are kept, the final line break and trailing blank lines are
//! not.

use super::error::{LexError, LexResult};
use super::reader::{line_end, SourceReader};
use super::span::SourcePos;
use super::token::{EmbeddedBlock, ExprLanguage};

/// Shortest fence.
const FENCE: &str = "```";

/// Length of the backtick run opening `text`, if it is long enough to be a
/// fence.
fn fence_len(text: &str) -> Option<usize> {
    let ticks = text.bytes().take_while(|&b| b == b'`').count();
    (ticks >= FENCE.len()).then_some(ticks)
}

/// Capture the block that follows an `=`.
///
/// `reader` is positioned just after the `=`. `entry_width` is the
/// indentation width of the line declaring the block. On success the reader
/// is left at the end of the captured text (before its line break) and the
/// position of the first captured character is returned with the block.
pub(crate) fn capture(
    reader: &mut SourceReader<'_>,
    language: ExprLanguage,
    entry_width: usize,
    max_size: usize,
) -> LexResult<(EmbeddedBlock, SourcePos)> {
    let eq_pos = reader.pos();
    let rest = reader.line_rest();
    let trimmed = rest.trim_matches(|c| c == ' ' || c == '\t');

    let (block, pos) = if let Some(ticks) = fence_len(trimmed) {
        let language = ExprLanguage::from_tag(&trimmed[ticks..]).unwrap_or(language);
        capture_fenced(reader, language, ticks, eq_pos)?
    } else if !trimmed.is_empty() {
        reader.skip_inline_ws();
        let pos = reader.pos();
        let start = reader.offset();
        reader.advance_to(start + trimmed.len());
        let block = EmbeddedBlock {
            language,
            text: trimmed.to_string(),
            fenced: false,
        };
        (block, pos)
    } else {
        capture_indented(reader, language, entry_width, eq_pos)?
    };

    if block.text.len() > max_size {
        return Err(LexError::EmbeddedTooLarge {
            size: block.text.len(),
            max: max_size,
            pos,
        });
    }
    Ok((block, pos))
}

fn capture_fenced(
    reader: &mut SourceReader<'_>,
    language: ExprLanguage,
    ticks: usize,
    open: SourcePos,
) -> LexResult<(EmbeddedBlock, SourcePos)> {
    let rest = reader.line_rest();
    reader.advance_to(reader.offset() + rest.len());
    if !reader.skip_line_break() {
        return Err(LexError::UnterminatedFence { pos: open });
    }

    let content_start = reader.offset();
    let pos = reader.pos();
    loop {
        if reader.is_eof() {
            return Err(LexError::UnterminatedFence { pos: open });
        }
        let line_start = reader.offset();
        let line = reader.line_rest();
        let candidate = line.trim();
        if candidate.len() == ticks && candidate.bytes().all(|b| b == b'`') {
            let raw = reader.slice(content_start, line_start);
            let raw = raw.strip_suffix('\n').unwrap_or(raw);
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            reader.advance_to(line_start + line.len());
            let block = EmbeddedBlock {
                language,
                text: raw.to_string(),
                fenced: true,
            };
            return Ok((block, pos));
        }
        reader.advance_to(line_start + line.len());
        if !reader.skip_line_break() {
            return Err(LexError::UnterminatedFence { pos: open });
        }
    }
}

fn capture_indented(
    reader: &mut SourceReader<'_>,
    language: ExprLanguage,
    entry_width: usize,
    eq_pos: SourcePos,
) -> LexResult<(EmbeddedBlock, SourcePos)> {
    let text = reader.text();
    let mut cursor = line_end(text, reader.offset());
    let mut block_width = None;
    let mut start = None;
    let mut end = None;

    while cursor < text.len() {
        // Skip the '\n' ending the previous line
        cursor += 1;
        let eol = line_end(text, cursor);
        let line = &text[cursor..eol];
        let content = line.strip_suffix('\r').unwrap_or(line);
        if !content.trim().is_empty() {
            let width = super::indent::indent_width(content);
            match block_width {
                None if width <= entry_width => break,
                None => {
                    block_width = Some(width);
                    start = Some(cursor);
                }
                Some(w) if width < w => {
                    // A shallow comment stays when the block continues after it
                    if !(is_comment(content) && resumes(text, eol, w)) {
                        break;
                    }
                }
                Some(_) => {}
            }
            end = Some(cursor + content.len());
        }
        cursor = eol;
    }

    let (Some(start), Some(end)) = (start, end) else {
        return Err(LexError::EmptyEmbeddedBlock { pos: eq_pos });
    };
    reader.advance_to(start);
    let pos = reader.pos();
    reader.advance_to(end);
    let block = EmbeddedBlock {
        language,
        text: text[start..end].to_string(),
        fenced: false,
    };
    Ok((block, pos))
}

fn is_comment(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("//") || line.starts_with('#')
}

/// Whether the first line after `cursor` that is neither blank nor a
/// comment is indented at least `width`.
fn resumes(text: &str, mut cursor: usize, width: usize) -> bool {
    while cursor < text.len() {
        cursor += 1;
        let eol = line_end(text, cursor);
        let line = &text[cursor..eol];
        let content = line.strip_suffix('\r').unwrap_or(line);
        if !content.trim().is_empty() && !is_comment(content) {
            return super::indent::indent_width(content) >= width;
        }
        cursor = eol;
    }
    false
}
