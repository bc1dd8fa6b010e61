/*
 * dumper.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Setaccio.
 *
 * Setaccio is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This file is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this file.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Diagnostic event dump: a best-effort literal reconstruction of the markup plus a
//! parallel human-readable trace of every event. No filtering; not part of the
//! hardened pipeline.

use std::fmt::Write;

use crate::entities;
use crate::handler::{write_xml_declaration, HtmlHandler};

/// Records every event verbatim. `html()` is the reconstruction, `trace()` the
/// one-line-per-event log.
#[derive(Debug, Default)]
pub struct DumpHandler {
    out: String,
    trace: String,
}

impl DumpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.out
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn reset(&mut self) {
        self.out.clear();
        self.trace.clear();
    }

    fn write_tag(&mut self, tag: &str, attributes: &[(String, String)], simple: bool) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            entities::encode_to(value, &mut self.out);
            self.out.push('"');
        }
        self.out.push_str(if simple { "/>" } else { ">" });
    }
}

impl HtmlHandler for DumpHandler {
    fn xml_declaration(
        &mut self,
        version: Option<&str>,
        standalone: Option<bool>,
        encoding: Option<&str>,
    ) {
        write_xml_declaration(&mut self.out, version, standalone, encoding);
        let _ = writeln!(
            self.trace,
            "xml-declaration version={:?} standalone={:?} encoding={:?}",
            version, standalone, encoding
        );
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
        let _ = writeln!(self.trace, "comment {:?}", text);
    }

    fn doctype(&mut self, text: &str) {
        self.out.push_str("<!DOCTYPE ");
        self.out.push_str(text);
        self.out.push('>');
        let _ = writeln!(self.trace, "doctype {:?}", text);
    }

    fn start_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        self.write_tag(tag, attributes, false);
        let _ = writeln!(self.trace, "start-tag {} {:?}", tag, attributes);
    }

    fn simple_tag(&mut self, tag: &str, attributes: &[(String, String)]) {
        self.write_tag(tag, attributes, true);
        let _ = writeln!(self.trace, "simple-tag {} {:?}", tag, attributes);
    }

    fn end_tag(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        let _ = writeln!(self.trace, "end-tag {}", tag);
    }

    fn cdata(&mut self, text: &str) {
        self.out.push_str("<![CDATA[");
        self.out.push_str(text);
        self.out.push_str("]]>");
        let _ = writeln!(self.trace, "cdata {:?}", text);
    }

    fn text(&mut self, text: &str, ignorable: bool) {
        self.out.push_str(text);
        let _ = writeln!(self.trace, "text {:?} ignorable={}", text, ignorable);
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.trace, "error {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HtmlParser;

    #[test]
    fn reconstruction_and_trace() {
        let mut parser = HtmlParser::new(DumpHandler::new());
        parser.receive(r#"<p align="center">Hi<br></p>"#);
        parser.close();
        let dump = parser.into_inner();
        assert_eq!(dump.html(), r#"<p align="center">Hi<br/></p>"#);
        let lines: Vec<&str> = dump.trace().lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("start-tag p"));
        assert!(lines[1].starts_with("text"));
        assert!(lines[2].starts_with("simple-tag br"));
        assert!(lines[3].starts_with("end-tag p"));
    }

    #[test]
    fn errors_only_reach_the_trace() {
        let mut dump = DumpHandler::new();
        dump.error("oops");
        assert_eq!(dump.html(), "");
        assert_eq!(dump.trace(), "error oops\n");
    }

    #[test]
    fn reset_clears_both_buffers() {
        let mut dump = DumpHandler::new();
        dump.text("x", false);
        dump.reset();
        assert_eq!(dump.html(), "");
        assert_eq!(dump.trace(), "");
    }
}
