/*
 * image_filter.rs
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

//! External-resource blocking: reconstructs the document verbatim except that any
//! attribute or CSS property that would make a rendering client fetch an external
//! resource is neutralized. Narrower than whitelist filtering; tags and attributes
//! are otherwise left alone. Whether anything was neutralized is reported through
//! `resource_found()`, so callers can offer a "load remote images" action.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::allowlist::{blocker_style_table, StyleTable};
use crate::css;
use crate::entities;
use crate::handler::{write_xml_declaration, HtmlHandler};
use crate::urlref::is_inline_image;

/// Generic "this value fetches something" pattern: scheme-qualified URL, bare
/// www. reference, or a CSS url() function.
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:[a-z][a-z0-9+.-]*://|www\.|url\s*\()").unwrap());

/// Reconstructs a document with external resource references blanked out.
/// One instance per pass; `reset()` allows sequential reuse.
pub struct ImageFilter<'a> {
    styles: &'a StyleTable,
    image_prefix: Option<String>,
    out: String,
    found: bool,
    css_mode: bool,
    css_buf: String,
}

impl ImageFilter<'static> {
    /// Block with the built-in blocker style table and no internal image prefix.
    pub fn new() -> Self {
        Self::with_style_table(blocker_style_table())
    }

    /// Like `new()`, with a same-origin prefix under which image paths are served
    /// inline (attachment parts) and therefore left alone.
    pub fn with_image_prefix(prefix: &str) -> Self {
        let mut filter = Self::new();
        filter.image_prefix = Some(prefix.to_string());
        filter
    }
}

impl Default for ImageFilter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ImageFilter<'a> {
    pub fn with_style_table(styles: &'a StyleTable) -> Self {
        Self {
            styles,
            image_prefix: None,
            out: String::new(),
            found: false,
            css_mode: false,
            css_buf: String::new(),
        }
    }

    /// The reconstructed document accumulated so far.
    pub fn html(&self) -> &str {
        &self.out
    }

    pub fn into_html(self) -> String {
        self.out
    }

    /// True if any external resource reference was neutralized during the pass.
    pub fn resource_found(&self) -> bool {
        self.found
    }

    /// Clear the found flag and output for reuse on the next document.
    pub fn reset(&mut self) {
        self.out.clear();
        self.found = false;
        self.css_mode = false;
        self.css_buf.clear();
    }

    fn emit_tag(&mut self, tag: &str, attrs: &[(String, String)], simple: bool) {
        let name = tag.to_ascii_lowercase();
        let is_image = name == "img" || name == "input";
        self.out.push('<');
        self.out.push_str(tag);
        let mut saw_src = false;
        for (attr_name, value) in attrs {
            let lname = attr_name.to_ascii_lowercase();
            match lname.as_str() {
                "src" if is_image => {
                    saw_src = true;
                    if value.is_empty() || is_inline_image(value, self.image_prefix.as_deref()) {
                        self.push_attribute(attr_name, value);
                    } else {
                        debug!("blanking external image source");
                        self.push_attribute(attr_name, "");
                        self.found = true;
                    }
                }
                "background" => {
                    if value.len() > css::MAX_CSS_LEN {
                        // Attribute dropped entirely rather than pattern-matched.
                        debug!("dropping oversized background attribute");
                        self.found = true;
                    } else if URL.is_match(value) {
                        self.push_attribute(attr_name, "");
                        self.found = true;
                    } else {
                        self.push_attribute(attr_name, value);
                    }
                }
                "style" => {
                    if css::contains_css_element(value) {
                        let styles = self.styles;
                        self.css_buf.clear();
                        self.css_buf.push_str(value);
                        if css::check_css(&mut self.css_buf, styles, false) {
                            self.found = true;
                        }
                        if !self.css_buf.is_empty() {
                            let sanitized = std::mem::take(&mut self.css_buf);
                            self.push_attribute(attr_name, &sanitized);
                            self.css_buf = sanitized;
                        }
                    } else {
                        self.push_attribute(attr_name, value);
                    }
                }
                _ => self.push_attribute(attr_name, value),
            }
        }
        if is_image && !saw_src {
            self.push_attribute("src", "");
        }
        self.out.push_str(if simple { "/>" } else { ">" });
    }

    fn push_attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        entities::encode_to(value, &mut self.out);
        self.out.push('"');
    }
}

impl<'a> HtmlHandler for ImageFilter<'a> {
    fn xml_declaration(
        &mut self,
        version: Option<&str>,
        standalone: Option<bool>,
        encoding: Option<&str>,
    ) {
        write_xml_declaration(&mut self.out, version, standalone, encoding);
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
    }

    fn doctype(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push_str("<!DOCTYPE>");
        } else {
            self.out.push_str("<!DOCTYPE ");
            self.out.push_str(text);
            self.out.push('>');
        }
    }

    fn start_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        self.emit_tag(tag, attributes, false);
        if tag.eq_ignore_ascii_case("style") {
            self.css_mode = true;
        }
    }

    fn simple_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        self.emit_tag(tag, attributes, true);
    }

    fn end_tag(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        if tag.eq_ignore_ascii_case("style") {
            self.css_mode = false;
        }
    }

    fn cdata(&mut self, text: &str) {
        self.out.push_str("<![CDATA[");
        if self.css_mode {
            let styles = self.styles;
            self.css_buf.clear();
            self.css_buf.push_str(text);
            if css::check_css(&mut self.css_buf, styles, true) {
                self.found = true;
            }
            self.out.push_str(&self.css_buf);
        } else {
            self.out.push_str(text);
        }
        self.out.push_str("]]>");
    }

    fn text(&mut self, text: &str, _ignorable: bool) {
        if self.css_mode {
            let styles = self.styles;
            self.css_buf.clear();
            self.css_buf.push_str(text);
            if css::check_css(&mut self.css_buf, styles, true) {
                self.found = true;
            }
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

    fn block(html: &str) -> (String, bool) {
        let mut parser = HtmlParser::new(ImageFilter::new());
        parser.receive(html);
        parser.close();
        let filter = parser.into_inner();
        let found = filter.resource_found();
        (filter.into_html(), found)
    }

    #[test]
    fn external_image_source_blanked() {
        let (out, found) = block(r#"<img src="http://evil.example/x.png">"#);
        assert_eq!(out, r#"<img src=""/>"#);
        assert!(found);
    }

    #[test]
    fn content_id_source_preserved() {
        let (out, found) = block(r#"<img src="cid:part1.abc@mail">"#);
        assert_eq!(out, r#"<img src="cid:part1.abc@mail"/>"#);
        assert!(!found);
    }

    #[test]
    fn bare_filename_source_preserved() {
        let (out, found) = block(r#"<img src="photo.jpeg">"#);
        assert_eq!(out, r#"<img src="photo.jpeg"/>"#);
        assert!(!found);
    }

    #[test]
    fn internal_prefix_source_preserved() {
        let mut parser = HtmlParser::new(ImageFilter::with_image_prefix("/ajax/image/"));
        parser.receive(r#"<img src="/ajax/image/mail?id=7"><img src="/other/x.png">"#);
        parser.close();
        let filter = parser.into_inner();
        assert!(filter.resource_found());
        assert_eq!(
            filter.html(),
            r#"<img src="/ajax/image/mail?id=7"/><img src=""/>"#
        );
    }

    #[test]
    fn missing_source_set_to_empty() {
        let (out, found) = block(r#"<img alt="x">"#);
        assert_eq!(out, r#"<img alt="x" src=""/>"#);
        assert!(!found);
    }

    #[test]
    fn input_source_blanked_too() {
        let (out, found) = block(r#"<input type="image" src="https://evil/x.gif">"#);
        assert_eq!(out, r#"<input type="image" src=""/>"#);
        assert!(found);
    }

    #[test]
    fn background_attribute_with_url_blanked() {
        let (out, found) = block(r#"<table background="http://evil/bg.png"><tr></tr></table>"#);
        assert_eq!(out, r#"<table background=""><tr></tr></table>"#);
        assert!(found);
    }

    #[test]
    fn background_attribute_without_url_kept() {
        let (out, found) = block(r#"<td background="gradient">x</td>"#);
        assert_eq!(out, r#"<td background="gradient">x</td>"#);
        assert!(!found);
    }

    #[test]
    fn oversized_background_attribute_dropped() {
        let html = format!(r#"<td background="{}">x</td>"#, "a".repeat(10_000));
        let (out, found) = block(&html);
        assert_eq!(out, "<td>x</td>");
        assert!(found);
    }

    #[test]
    fn style_attribute_background_image_stripped() {
        let (out, found) =
            block(r#"<div style="color: red; background-image: url(http://e/x.png)">t</div>"#);
        assert_eq!(out, r#"<div style="color: red">t</div>"#);
        assert!(found);
    }

    #[test]
    fn style_element_url_function_stripped() {
        let (out, found) = block(
            "<style>body { background: #fff url(http://evil/x.png); color: red }</style>",
        );
        assert_eq!(out, "<style>body { background: #fff; color: red }</style>");
        assert!(found);
    }

    #[test]
    fn style_without_resources_untouched_flag_clear() {
        let (out, found) = block("<style>p { color: red; margin: 0 }</style>");
        assert_eq!(out, "<style>p { color: red; margin: 0 }</style>");
        assert!(!found);
    }

    #[test]
    fn unrelated_markup_reconstructed_verbatim() {
        let (out, found) = block(r#"<div class="x" onclick="f()">hello <b>there</b></div>"#);
        assert_eq!(out, r#"<div class="x" onclick="f()">hello <b>there</b></div>"#);
        assert!(!found);
    }

    #[test]
    fn reset_clears_flag_and_output() {
        let mut filter = ImageFilter::new();
        filter.simple_tag(
            "img",
            &[("src".to_string(), "http://evil/x.png".to_string())],
        );
        assert!(filter.resource_found());
        filter.reset();
        assert!(!filter.resource_found());
        assert_eq!(filter.html(), "");
    }
}
