/*
 * text_extract.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Setaccio, an HTML sanitizing engine for
 * untrusted email content.
 *
 * Setaccio is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Setaccio is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Setaccio.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Plain text extraction from an HTML event stream: block boundaries become line
//! breaks, blockquote nesting becomes "> " line prefixes, pre content stays
//! verbatim, and link/image targets can be annotated inline as " [url] ". Text
//! runs are cleaned of pretty-printer artifacts and indentation before emission.

use tracing::debug;

use crate::entities;
use crate::handler::{attribute, HtmlHandler};
use crate::urlref;

/// Structurally significant tags, classified once so the event handlers stay
/// declarative.
#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    /// blockquote: break plus quote-depth change.
    Quote,
    /// div, p, tr, li, ol, ul: single break at each boundary.
    Boundary,
    /// h1..h6: break on open, double break on close.
    Heading,
    /// address: like a boundary with heading-style opening.
    Address,
    /// pre: verbatim text until the close, double break after.
    Pre,
    /// td: tab after the cell.
    Cell,
}

fn block_kind(tag: &str) -> Option<BlockKind> {
    match tag {
        "blockquote" => Some(BlockKind::Quote),
        "div" | "p" | "tr" | "li" | "ol" | "ul" => Some(BlockKind::Boundary),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(BlockKind::Heading),
        "address" => Some(BlockKind::Address),
        "pre" => Some(BlockKind::Pre),
        "td" => Some(BlockKind::Cell),
        _ => None,
    }
}

fn is_inline_markup(tag: &str) -> bool {
    matches!(tag, "b" | "i" | "em" | "strong")
}

/// Extracts a plain text rendition of an HTML document. One instance per pass.
pub struct TextExtractor {
    out: String,
    line_break: String,
    /// When set, link and image targets are appended inline as " [url] ".
    annotate: bool,
    base_url: Option<String>,
    inside_body: bool,
    /// Inside style or script content.
    ignore: bool,
    pre: bool,
    /// Between an anchor with an href and the decision on its first text run.
    anchor: bool,
    href: String,
    quote_depth: usize,
    /// The last tag event closed b/i/em/strong, so whitespace-only text that
    /// follows still carries meaning and is kept.
    last_inline: bool,
    /// At the beginning of a line (just after break and quote prefixes).
    bol: bool,
}

impl TextExtractor {
    /// Extract without link annotations.
    pub fn new() -> Self {
        Self {
            out: String::new(),
            line_break: "\r\n".to_string(),
            annotate: false,
            base_url: None,
            inside_body: false,
            ignore: false,
            pre: false,
            anchor: false,
            href: String::new(),
            quote_depth: 0,
            last_inline: false,
            bol: true,
        }
    }

    /// Extract with " [url] " annotations after links and images, resolving
    /// relative targets against `base_url` when given.
    pub fn with_annotations(base_url: Option<&str>) -> Self {
        let mut extractor = Self::new();
        extractor.annotate = true;
        extractor.base_url = base_url.map(|s| s.to_string());
        extractor
    }

    /// Line break sequence used at block boundaries (defaults to CRLF).
    pub fn set_line_break(&mut self, line_break: &str) {
        self.line_break = line_break.to_string();
    }

    /// The extracted text accumulated so far.
    pub fn plain_text(&self) -> &str {
        &self.out
    }

    pub fn into_plain_text(self) -> String {
        self.out
    }

    /// Clear the output buffer and quote depth for the next run. The body/ignore/
    /// pre/anchor flags are deliberately left as they are: a well-formed document
    /// returns them all to their initial state by its final close events, and
    /// callers resetting mid-document rely on the current position being kept.
    pub fn reset(&mut self) {
        self.out.clear();
        self.quote_depth = 0;
        self.bol = true;
    }

    /// Break the line and re-apply one "> " per open blockquote.
    fn newline(&mut self) {
        self.out.push_str(&self.line_break);
        for _ in 0..self.quote_depth {
            self.out.push_str("> ");
        }
        self.bol = true;
    }

    /// Break only when there is content on the current line.
    fn soft_newline(&mut self) {
        if !self.bol && !self.out.is_empty() {
            self.newline();
        }
    }

    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.out.push_str(text);
            self.bol = false;
        }
    }

    fn annotate_target(&mut self, target: &str) {
        let resolved = urlref::resolve(self.base_url.as_deref(), target);
        self.out.push_str(" [");
        self.out.push_str(&urlref::encode_annotation(&resolved));
        self.out.push_str("] ");
        self.bol = false;
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlHandler for TextExtractor {
    fn start_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        let name = tag.to_ascii_lowercase();
        match name.as_str() {
            "body" => {
                self.inside_body = true;
                self.last_inline = false;
                return;
            }
            "style" | "script" => {
                self.ignore = true;
                self.last_inline = false;
                return;
            }
            "a" => {
                if self.inside_body {
                    if let Some(href) = attribute(attributes, "href") {
                        if !href.is_empty() {
                            self.anchor = true;
                            self.href.clear();
                            self.href.push_str(href);
                        }
                    }
                }
            }
            _ => {}
        }
        if !self.inside_body {
            self.last_inline = false;
            return;
        }
        match block_kind(&name) {
            Some(BlockKind::Quote) => {
                self.quote_depth += 1;
                self.newline();
            }
            Some(BlockKind::Boundary) => self.soft_newline(),
            Some(BlockKind::Heading) | Some(BlockKind::Address) => self.soft_newline(),
            Some(BlockKind::Pre) => {
                self.soft_newline();
                self.pre = true;
            }
            Some(BlockKind::Cell) | None => {}
        }
        self.last_inline = false;
    }

    fn simple_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        let name = tag.to_ascii_lowercase();
        if !self.inside_body {
            self.last_inline = false;
            return;
        }
        match name.as_str() {
            "br" => self.newline(),
            "img" => {
                if let Some(alt) = attribute(attributes, "alt") {
                    if !alt.is_empty() {
                        self.out.push(' ');
                        self.out.push_str(alt);
                        self.out.push(' ');
                        self.bol = false;
                    }
                }
                if self.annotate {
                    if let Some(src) = attribute(attributes, "src") {
                        let is_cid =
                            src.len() >= 4 && src.as_bytes()[..4].eq_ignore_ascii_case(b"cid:");
                        if !src.is_empty() && !is_cid {
                            self.annotate_target(src);
                        }
                    }
                }
            }
            _ => {}
        }
        self.last_inline = false;
    }

    fn end_tag(&mut self, tag: &str) {
        let name = tag.to_ascii_lowercase();
        match name.as_str() {
            "body" => {
                self.inside_body = false;
                self.last_inline = false;
                return;
            }
            "style" | "script" => {
                self.ignore = false;
                self.last_inline = false;
                return;
            }
            "a" => {
                self.anchor = false;
                self.href.clear();
            }
            _ => {}
        }
        if !self.inside_body {
            self.last_inline = false;
            return;
        }
        match block_kind(&name) {
            Some(BlockKind::Quote) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.newline();
            }
            Some(BlockKind::Boundary) => self.soft_newline(),
            Some(BlockKind::Heading) => {
                self.newline();
                self.newline();
            }
            Some(BlockKind::Address) => self.soft_newline(),
            Some(BlockKind::Pre) => {
                self.pre = false;
                self.newline();
                self.newline();
            }
            Some(BlockKind::Cell) => {
                self.out.push('\t');
                self.bol = false;
            }
            None => {}
        }
        self.last_inline = is_inline_markup(&name);
    }

    fn text(&mut self, text: &str, ignorable: bool) {
        if !self.inside_body || self.ignore {
            return;
        }
        if self.pre {
            self.push_text(&entities::decode(text));
            self.last_inline = false;
            return;
        }
        if ignorable && !self.last_inline {
            return;
        }
        let trimmed = trim_wrap_artifact(text);
        let unfolded: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r' | '\u{c}'))
            .collect();
        let untabbed = unfolded.trim_start_matches('\t');
        if untabbed.is_empty() {
            // Tabs (or nothing) only. Normally discarded, but whitespace right
            // after inline markup still separates words.
            if self.last_inline && !text.is_empty() {
                self.push_text(" ");
            }
            self.last_inline = false;
            return;
        }
        let unindented = strip_leading_indent(untabbed);
        let collapsed = collapse_indent_runs(unindented);
        let normalized = normalize_signature(collapsed);
        let decoded = entities::decode(&normalized);
        self.push_text(&decoded);
        if self.annotate && self.anchor && !self.href.is_empty() {
            let visible = decoded.trim();
            if !visible.is_empty() {
                if visible != self.href.trim() && !urlref::looks_like_url(visible) {
                    let href = std::mem::take(&mut self.href);
                    self.annotate_target(&href);
                    self.href = href;
                }
                // First text run decides; later runs in the same anchor are plain.
                self.anchor = false;
            }
        }
        self.last_inline = false;
    }

    fn error(&mut self, message: &str) {
        debug!("parse error: {}", message);
    }
}

/// Remove a pretty-printer line-wrap artifact at the end of a run: a non-newline
/// character, an optional carriage return, a newline, then only spaces.
fn trim_wrap_artifact(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1] == b' ' {
        i -= 1;
    }
    if i == 0 || bytes[i - 1] != b'\n' {
        return text;
    }
    let mut j = i - 1;
    if j > 0 && bytes[j - 1] == b'\r' {
        j -= 1;
    }
    if j == 0 || bytes[j - 1] == b'\n' {
        return text;
    }
    &text[..j]
}

/// Strip a leading indentation run (any tabs, or two or more spaces). A single
/// leading space is meaningful and kept.
fn strip_leading_indent(s: &str) -> &str {
    let rest = s.trim_start_matches([' ', '\t']);
    let lead = &s[..s.len() - rest.len()];
    if lead.contains('\t') || lead.len() >= 2 {
        rest
    } else {
        s
    }
}

/// Collapse every interior tab/multi-space run to a single space.
fn collapse_indent_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c == ' ' || c == '\t' {
            in_run = true;
        } else {
            if in_run {
                out.push(' ');
                in_run = false;
            }
            out.push(c);
        }
    }
    if in_run {
        out.push(' ');
    }
    out
}

/// The signature delimiter, " -- " with trailing space variants and an optional
/// trailing non-breaking-space entity, normalizes to exactly "-- ".
fn normalize_signature(s: String) -> String {
    let candidate = s.strip_suffix("&nbsp;").unwrap_or(&s);
    if candidate.trim() == "--" && (candidate.ends_with(' ') || s.ends_with("&nbsp;")) {
        return "-- ".to_string();
    }
    s
}
