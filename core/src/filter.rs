/*
 * filter.rs
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

//! Whitelist filtering of an HTML event stream: only allow-listed tags, attributes,
//! and CSS properties are reconstructed into the output. Disallowed tags either lose
//! their whole subtree (script, Office namespace tags, anything before body) or only
//! their wrapping markers, keeping child content.
//!
//! Each open tag pushes one entry on a single bookkeeping stack (emitted, unwrapped,
//! or skipped) and the matching end event pops it, so subtree skipping and
//! wrapper-removal accounting cannot drift apart on unbalanced input.

use tracing::debug;

use crate::allowlist::{
    default_style_table, default_tag_table, is_numeric, AttrRule, StyleTable, TagRule, TagTable,
};
use crate::css;
use crate::entities;
use crate::handler::{attribute, HtmlHandler};

/// Tags removed together with their whole subtree even inside body.
const REMOVED_SUBTREE_PREFIXES: [&str; 4] = ["o:", "w:", "st1:", "x:"];

/// What happened to the tag that opened the current nesting level.
#[derive(Debug, Clone, Copy, PartialEq)]
enum OpenTag {
    /// Allow-listed; start marker written, end marker will be too.
    Emitted,
    /// Tag markers dropped, child content kept.
    Unwrapped,
    /// Whole subtree dropped.
    Skipped,
}

/// Reconstructs a document from parse events, keeping only allow-listed content.
/// One instance per pass; `reset()` allows sequential reuse.
pub struct WhitelistFilter<'a> {
    tags: &'a TagTable,
    styles: &'a StyleTable,
    out: String,
    open: Vec<OpenTag>,
    /// Number of Skipped entries on the open stack.
    skip: usize,
    body_open: bool,
    css_mode: bool,
    /// Scratch for CSS sanitizing, reused across attributes within this pass.
    css_buf: String,
}

impl WhitelistFilter<'static> {
    /// Filter against the built-in tag and style tables.
    pub fn new() -> Self {
        Self::with_tables(default_tag_table(), default_style_table())
    }
}

impl Default for WhitelistFilter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> WhitelistFilter<'a> {
    pub fn with_tables(tags: &'a TagTable, styles: &'a StyleTable) -> Self {
        Self {
            tags,
            styles,
            out: String::new(),
            open: Vec::new(),
            skip: 0,
            body_open: false,
            css_mode: false,
            css_buf: String::new(),
        }
    }

    /// The filtered document accumulated so far.
    pub fn html(&self) -> &str {
        &self.out
    }

    pub fn into_html(self) -> String {
        self.out
    }

    /// Clear all per-document state for reuse on the next document.
    pub fn reset(&mut self) {
        self.out.clear();
        self.open.clear();
        self.skip = 0;
        self.body_open = false;
        self.css_mode = false;
        self.css_buf.clear();
    }

    fn emit_tag(&mut self, name: &str, rule: &TagRule, attrs: &[(String, String)], simple: bool) {
        self.out.push('<');
        self.out.push_str(name);
        for (attr_name, value) in attrs {
            self.emit_attribute(rule, attr_name, value);
        }
        self.out.push_str(if simple { "/>" } else { ">" });
    }

    fn emit_attribute(&mut self, rule: &TagRule, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "style" => {
                if !css::contains_css_element(value) {
                    return;
                }
                let styles = self.styles;
                self.css_buf.clear();
                self.css_buf.push_str(value);
                css::check_css(&mut self.css_buf, styles, false);
                if !self.css_buf.is_empty() {
                    self.push_style_attribute();
                }
            }
            "class" | "id" => self.push_attribute(&name, value),
            _ => {
                if name == "background" && value.len() > css::MAX_CSS_LEN {
                    debug!("dropping oversized background attribute");
                    return;
                }
                match rule.attributes() {
                    None => {
                        if !dangerous_scheme(value) {
                            self.push_attribute(&name, value);
                        }
                    }
                    Some(table) => match table.get(&name) {
                        Some(AttrRule::Values(set)) => {
                            if set.contains(&value.to_ascii_lowercase()) {
                                self.push_attribute(&name, value);
                            }
                        }
                        Some(AttrRule::Numeric) => {
                            if is_numeric(value) {
                                self.push_attribute(&name, value.trim());
                            }
                        }
                        Some(AttrRule::Any) => {
                            if !dangerous_scheme(value) {
                                self.push_attribute(&name, value);
                            }
                        }
                        None => {}
                    },
                }
            }
        }
    }

    fn push_attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        entities::encode_to(value, &mut self.out);
        self.out.push('"');
    }

    /// Write the sanitized style value from the scratch buffer, picking a quote
    /// character that does not collide with quotes embedded in the value.
    fn push_style_attribute(&mut self) {
        let single = self.css_buf.contains('"') && !self.css_buf.contains('\'');
        let quote = if single { '\'' } else { '"' };
        self.out.push_str(" style=");
        self.out.push(quote);
        for ch in self.css_buf.chars() {
            match ch {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                '"' if quote == '"' => self.out.push_str("&quot;"),
                c => self.out.push(c),
            }
        }
        self.out.push(quote);
    }

    fn emit_end(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        match name {
            "body" => self.body_open = false,
            "style" => self.css_mode = false,
            _ => {}
        }
    }

    /// All original attributes, names as given, values escaped. Used for the
    /// http-equiv meta compatibility carve-out.
    fn emit_verbatim_tag(&mut self, name: &str, attrs: &[(String, String)], simple: bool) {
        self.out.push('<');
        self.out.push_str(name);
        for (attr_name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(attr_name);
            self.out.push_str("=\"");
            entities::encode_to(value, &mut self.out);
            self.out.push('"');
        }
        self.out.push_str(if simple { "/>" } else { ">" });
    }
}

/// meta tags whose http-equiv value is allow-listed bypass per-attribute filtering.
fn meta_bypass(rule: &TagRule, attrs: &[(String, String)]) -> bool {
    let value = match attribute(attrs, "http-equiv") {
        Some(v) => v,
        None => return false,
    };
    match rule.attribute("http-equiv") {
        Some(AttrRule::Values(set)) => set.contains(&value.to_ascii_lowercase()),
        Some(AttrRule::Any) => true,
        _ => false,
    }
}

fn forces_subtree_removal(name: &str) -> bool {
    name == "script" || REMOVED_SUBTREE_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Leading-whitespace-trimmed, case-insensitive match on the schemes that execute.
fn dangerous_scheme(value: &str) -> bool {
    let t = value.trim_start();
    starts_with_ci(t, "javascript:") || starts_with_ci(t, "vbscript:")
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

impl<'a> HtmlHandler for WhitelistFilter<'a> {
    fn xml_declaration(
        &mut self,
        version: Option<&str>,
        standalone: Option<bool>,
        encoding: Option<&str>,
    ) {
        if self.skip > 0 {
            return;
        }
        crate::handler::write_xml_declaration(&mut self.out, version, standalone, encoding);
    }

    fn comment(&mut self, text: &str) {
        if self.skip > 0 {
            return;
        }
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
    }

    fn doctype(&mut self, text: &str) {
        if self.skip > 0 {
            return;
        }
        if text.is_empty() {
            self.out.push_str("<!DOCTYPE>");
        } else {
            self.out.push_str("<!DOCTYPE ");
            self.out.push_str(text);
            self.out.push('>');
        }
    }

    fn start_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        let name = tag.to_ascii_lowercase();
        if self.skip > 0 {
            self.open.push(OpenTag::Skipped);
            self.skip += 1;
            return;
        }
        let tags = self.tags;
        match tags.rule(&name) {
            Some(rule) => {
                self.emit_tag(&name, rule, attributes, false);
                self.open.push(OpenTag::Emitted);
                match name.as_str() {
                    "body" => self.body_open = true,
                    "style" => self.css_mode = true,
                    _ => {}
                }
            }
            None => {
                if forces_subtree_removal(&name) || !self.body_open {
                    self.open.push(OpenTag::Skipped);
                    self.skip += 1;
                } else {
                    self.open.push(OpenTag::Unwrapped);
                }
            }
        }
    }

    fn simple_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        if self.skip > 0 {
            return;
        }
        let name = tag.to_ascii_lowercase();
        let tags = self.tags;
        if let Some(rule) = tags.rule(&name) {
            if name == "meta" && meta_bypass(rule, attributes) {
                self.emit_verbatim_tag(&name, attributes, true);
            } else {
                self.emit_tag(&name, rule, attributes, true);
            }
        }
    }

    fn end_tag(&mut self, tag: &str) {
        let name = tag.to_ascii_lowercase();
        match self.open.pop() {
            Some(OpenTag::Skipped) => self.skip -= 1,
            Some(OpenTag::Unwrapped) => {}
            Some(OpenTag::Emitted) => self.emit_end(&name),
            None => {
                // Close without a matching open. Emit only what could have been
                // legitimately open, so stray markup cannot smuggle anything out.
                if self.tags.contains(&name) && self.body_open {
                    self.emit_end(&name);
                }
            }
        }
    }

    fn cdata(&mut self, text: &str) {
        if self.skip > 0 {
            return;
        }
        self.out.push_str("<![CDATA[");
        if self.css_mode {
            let styles = self.styles;
            self.css_buf.clear();
            self.css_buf.push_str(text);
            css::check_css(&mut self.css_buf, styles, true);
            self.out.push_str(&self.css_buf);
        } else {
            self.out.push_str(text);
        }
        self.out.push_str("]]>");
    }

    fn text(&mut self, text: &str, _ignorable: bool) {
        if self.skip > 0 {
            return;
        }
        if self.css_mode {
            let styles = self.styles;
            self.css_buf.clear();
            self.css_buf.push_str(text);
            css::check_css(&mut self.css_buf, styles, true);
            self.out.push_str(&self.css_buf);
        } else {
            self.out.push_str(text);
        }
    }

    fn error(&mut self, message: &str) {
        debug!("parse error: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HtmlParser;

    fn filter_with_defaults(html: &str) -> String {
        let mut parser = HtmlParser::new(WhitelistFilter::new());
        parser.receive(html);
        parser.close();
        parser.into_inner().into_html()
    }

    #[test]
    fn allowlisted_tags_preserved_script_subtree_removed() {
        let mut tags = TagTable::new();
        tags.allow("p");
        tags.allow("b");
        let styles = StyleTable::new();
        let mut parser = HtmlParser::new(WhitelistFilter::with_tables(&tags, &styles));
        parser.receive("<p>Hi <b>there</b><script>evil()</script></p>");
        parser.close();
        assert_eq!(parser.into_inner().html(), "<p>Hi <b>there</b></p>");
    }

    #[test]
    fn unknown_tag_unwrapped_inside_body() {
        let out = filter_with_defaults("<body><blink>keep me</blink></body>");
        assert_eq!(out, "<body>keep me</body>");
    }

    #[test]
    fn unknown_tag_before_body_loses_subtree() {
        let out = filter_with_defaults("<title>secret</title><body>ok</body>");
        assert_eq!(out, "<body>ok</body>");
    }

    #[test]
    fn office_namespace_tags_lose_subtree() {
        let out = filter_with_defaults("<body>a<o:p>hidden</o:p>b</body>");
        assert_eq!(out, "<body>ab</body>");
    }

    #[test]
    fn dangerous_schemes_rejected() {
        let out = filter_with_defaults(
            r#"<body><a href="javascript:alert(1)">x</a><a href=" VBScript:bad">y</a></body>"#,
        );
        assert_eq!(out, "<body><a>x</a><a>y</a></body>");
    }

    #[test]
    fn numeric_rule_enforced() {
        let out =
            filter_with_defaults(r#"<body><img src="a.png" width="5" height="tall"></body>"#);
        assert_eq!(out, r#"<body><img src="a.png" width="5"/></body>"#);
    }

    #[test]
    fn enumerated_rule_enforced() {
        let out = filter_with_defaults(
            r#"<body><a href="x" target="_blank">a</a><a href="y" target="evil">b</a></body>"#,
        );
        assert_eq!(
            out,
            r#"<body><a href="x" target="_blank">a</a><a href="y">b</a></body>"#
        );
    }

    #[test]
    fn style_attribute_filtered() {
        let out =
            filter_with_defaults(r#"<body><p style="color: red; position: absolute">x</p></body>"#);
        assert_eq!(out, r#"<body><p style="color: red">x</p></body>"#);
    }

    #[test]
    fn style_attribute_dropped_when_nothing_survives() {
        let out = filter_with_defaults(r#"<body><p style="position: absolute">x</p></body>"#);
        assert_eq!(out, "<body><p>x</p></body>");
    }

    #[test]
    fn style_element_content_sanitized() {
        let out =
            filter_with_defaults("<style>body { position: fixed; color: red }</style><body>x</body>");
        assert_eq!(out, "<style>body { color: red }</style><body>x</body>");
    }

    #[test]
    fn meta_http_equiv_bypass_keeps_all_attributes() {
        let out = filter_with_defaults(
            r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8" charset="utf-8">"#,
        );
        assert_eq!(
            out,
            r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8" charset="utf-8"/>"#
        );
    }

    #[test]
    fn meta_without_bypass_is_attribute_filtered() {
        let out = filter_with_defaults(r#"<meta name="author" content="x" charset="utf-8">"#);
        assert_eq!(out, r#"<meta name="author" content="x"/>"#);
    }

    #[test]
    fn class_and_id_always_allowed_and_escaped() {
        let out = filter_with_defaults(r#"<body><p class="a&quot;b" id="p1">x</p></body>"#);
        assert_eq!(out, r#"<body><p class="a&quot;b" id="p1">x</p></body>"#);
    }

    #[test]
    fn comment_and_doctype_reconstructed() {
        let out = filter_with_defaults("<!DOCTYPE html><body><!-- note --></body>");
        assert_eq!(out, "<!DOCTYPE html><body><!-- note --></body>");
    }

    #[test]
    fn xml_declaration_recomputed() {
        let mut filter = WhitelistFilter::new();
        filter.xml_declaration(Some("1.0"), Some(true), Some("UTF-8"));
        assert_eq!(
            filter.html(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
        );
        filter.reset();
        filter.xml_declaration(None, None, None);
        assert_eq!(filter.html(), r#"<?xml version="1.0"?>"#);
    }

    #[test]
    fn nested_skipped_tags_stay_skipped() {
        // Driven directly: the raw-text parser never produces nested script tags,
        // but other drivers may.
        let mut filter = WhitelistFilter::new();
        filter.start_tag("body", &[]);
        filter.start_tag("script", &[]);
        filter.start_tag("script", &[]);
        filter.text("evil()", false);
        filter.end_tag("script");
        filter.text("still evil", false);
        filter.end_tag("script");
        filter.text("visible", false);
        filter.end_tag("body");
        assert_eq!(filter.html(), "<body>visible</body>");
    }

    #[test]
    fn unmatched_end_tag_outside_body_dropped() {
        let mut filter = WhitelistFilter::new();
        filter.end_tag("p");
        assert_eq!(filter.html(), "");
        filter.start_tag("body", &[]);
        filter.end_tag("p");
        assert_eq!(filter.html(), "<body></p>");
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = WhitelistFilter::new();
        filter.start_tag("script", &[]);
        filter.text("x", false);
        filter.reset();
        filter.start_tag("body", &[]);
        filter.text("y", false);
        filter.end_tag("body");
        assert_eq!(filter.html(), "<body>y</body>");
    }

    #[test]
    fn style_quote_choice_avoids_embedded_quotes() {
        let mut table = StyleTable::new();
        table.insert(
            "font-family",
            crate::allowlist::StyleRule::Values(["*".to_string()].into()),
        );
        let mut filter = WhitelistFilter::with_tables(default_tag_table(), &table);
        filter.start_tag(
            "p",
            &[("style".to_string(), "font-family: \"Comic Sans\"".to_string())],
        );
        assert_eq!(filter.html(), "<p style='font-family: \"Comic Sans\"'>");
    }
}
