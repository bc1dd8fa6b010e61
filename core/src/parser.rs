/*
 * parser.rs
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

//! Tolerant HTML tokenizer: receive(buffer) contract, consume complete constructs
//! only, leave any unterminated tail for the next call. close() flushes the tail.
//! Never fails on malformed input; problems surface as error events plus best-effort
//! recovery (a stray `<` becomes text).

use crate::entities;
use crate::handler::{attribute, HtmlHandler};

/// Elements whose content is raw text up to the matching close tag.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawElement {
    Script,
    Style,
}

impl RawElement {
    fn name(self) -> &'static str {
        match self {
            RawElement::Script => "script",
            RawElement::Style => "style",
        }
    }
}

/// Elements with no content model; always delivered as simple (self-closing) tags.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Event-driven HTML parser. Feed data via receive(); the handler gets callbacks.
/// Tag names are delivered lowercased; attribute names keep their case; attribute
/// values are entity-decoded. Text is delivered with entity references intact.
pub struct HtmlParser<H> {
    handler: H,
    /// Unconsumed tail carried over from the previous receive().
    carry: String,
    raw: Option<RawElement>,
}

impl<H: HtmlHandler> HtmlParser<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            carry: String::new(),
            raw: None,
        }
    }

    /// Process as much as possible. Complete constructs are delivered; an
    /// unterminated tail (text run, open tag, comment) is buffered for the next call.
    pub fn receive(&mut self, input: &str) {
        if input.is_empty() {
            return;
        }
        let mut data = std::mem::take(&mut self.carry);
        data.push_str(input);
        let consumed = self.process(&data, false);
        self.carry = data[consumed..].to_string();
    }

    /// End of input; flush any pending state.
    pub fn close(&mut self) {
        let data = std::mem::take(&mut self.carry);
        if !data.is_empty() {
            self.process(&data, true);
        }
        self.raw = None;
    }

    /// Return the handler (after close) for inspection.
    pub fn into_inner(self) -> H {
        self.handler
    }

    /// Returns the number of bytes consumed from `data`.
    fn process(&mut self, data: &str, at_end: bool) -> usize {
        let mut pos = 0;
        while pos < data.len() {
            if let Some(raw) = self.raw {
                match find_raw_end(data, pos, raw.name()) {
                    Some((text_end, after)) => {
                        if text_end > pos {
                            self.emit_text(&data[pos..text_end]);
                        }
                        self.handler.end_tag(raw.name());
                        self.raw = None;
                        pos = after;
                        continue;
                    }
                    None => {
                        if at_end {
                            self.emit_text(&data[pos..]);
                            self.handler.error("unterminated raw text element");
                            self.raw = None;
                            return data.len();
                        }
                        return pos;
                    }
                }
            }
            let lt = match data[pos..].find('<') {
                Some(rel) => pos + rel,
                None => {
                    if at_end {
                        self.emit_text(&data[pos..]);
                        return data.len();
                    }
                    return pos;
                }
            };
            if lt > pos {
                self.emit_text(&data[pos..lt]);
            }
            let rest = &data[lt..];
            if rest.len() < 2 {
                if at_end {
                    self.emit_text(rest);
                    return data.len();
                }
                return lt;
            }
            let second = rest.as_bytes()[1];
            pos = match second {
                b'!' => match self.process_declaration(rest, lt, at_end) {
                    Some(next) => next,
                    None => return lt,
                },
                b'?' => match rest.find("?>") {
                    Some(end) => {
                        self.process_instruction(&rest[2..end]);
                        lt + end + 2
                    }
                    None => {
                        if at_end {
                            self.handler.error("unterminated processing instruction");
                            return data.len();
                        }
                        return lt;
                    }
                },
                b'/' => match rest.find('>') {
                    Some(end) => {
                        let name = rest[2..end].trim();
                        if name.is_empty() || !name.chars().next().unwrap().is_ascii_alphabetic()
                        {
                            self.handler.error("malformed end tag");
                        } else {
                            let name = name.to_ascii_lowercase();
                            self.handler.end_tag(&name);
                        }
                        lt + end + 1
                    }
                    None => {
                        if at_end {
                            self.handler.error("unterminated end tag");
                            return data.len();
                        }
                        return lt;
                    }
                },
                b if (b as char).is_ascii_alphabetic() => match find_tag_end(rest) {
                    Some(end) => {
                        self.process_tag(&rest[1..end]);
                        lt + end + 1
                    }
                    None => {
                        if at_end {
                            self.handler.error("unterminated tag");
                            self.emit_text(rest);
                            return data.len();
                        }
                        return lt;
                    }
                },
                _ => {
                    self.handler.error("unexpected '<' in text");
                    self.emit_text("<");
                    lt + 1
                }
            };
        }
        data.len()
    }

    /// `<!...` constructs: comment, CDATA section, doctype, or an unsupported
    /// markup declaration. Returns the next position, or None when more input is
    /// needed (never when at_end).
    fn process_declaration(&mut self, rest: &str, lt: usize, at_end: bool) -> Option<usize> {
        if rest.len() < 9 && !at_end {
            // Not enough to tell <!-- from <![CDATA[ from <!DOCTYPE yet.
            return None;
        }
        if rest.starts_with("<!--") {
            return match rest[4..].find("-->") {
                Some(end) => {
                    self.handler.comment(&rest[4..4 + end]);
                    Some(lt + 4 + end + 3)
                }
                None => {
                    if at_end {
                        self.handler.error("unterminated comment");
                        self.handler.comment(&rest[4..]);
                        Some(lt + rest.len())
                    } else {
                        None
                    }
                }
            };
        }
        if starts_with_ci(rest, "<![cdata[") {
            return match rest[9..].find("]]>") {
                Some(end) => {
                    self.handler.cdata(&rest[9..9 + end]);
                    Some(lt + 9 + end + 3)
                }
                None => {
                    if at_end {
                        self.handler.error("unterminated CDATA section");
                        self.handler.cdata(&rest[9..]);
                        Some(lt + rest.len())
                    } else {
                        None
                    }
                }
            };
        }
        if starts_with_ci(rest, "<!doctype") {
            return match rest.find('>') {
                Some(end) => {
                    self.handler.doctype(rest[9..end].trim());
                    Some(lt + end + 1)
                }
                None => {
                    if at_end {
                        self.handler.error("unterminated doctype declaration");
                        Some(lt + rest.len())
                    } else {
                        None
                    }
                }
            };
        }
        match rest.find('>') {
            Some(end) => {
                self.handler.error("unsupported markup declaration");
                Some(lt + end + 1)
            }
            None => {
                if at_end {
                    self.handler.error("unsupported markup declaration");
                    Some(lt + rest.len())
                } else {
                    None
                }
            }
        }
    }

    /// `<?...?>`: an XML declaration is reported with its parsed pseudo-attributes;
    /// any other processing instruction is dropped with an error event.
    fn process_instruction(&mut self, content: &str) {
        let (name, attrs, _) = parse_tag_inner(content);
        if name == "xml" {
            let version = attribute(&attrs, "version");
            let encoding = attribute(&attrs, "encoding");
            let standalone = match attribute(&attrs, "standalone") {
                Some("yes") => Some(true),
                Some("no") => Some(false),
                _ => None,
            };
            self.handler.xml_declaration(version, standalone, encoding);
        } else {
            self.handler.error("processing instruction ignored");
        }
    }

    fn process_tag(&mut self, inner: &str) {
        let (name, attrs, self_closing) = parse_tag_inner(inner);
        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            self.handler.simple_tag(&name, &attrs);
            return;
        }
        self.handler.start_tag(&name, &attrs);
        match name.as_str() {
            "script" => self.raw = Some(RawElement::Script),
            "style" => self.raw = Some(RawElement::Style),
            _ => {}
        }
    }

    fn emit_text(&mut self, text: &str) {
        let ignorable = text.chars().all(char::is_whitespace);
        self.handler.text(text, ignorable);
    }
}

/// Locate the end of a raw text section: the position of `</name` (with the name
/// followed by whitespace or `>`) and the position just past the closing `>`.
fn find_raw_end(data: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = data.as_bytes();
    let mut i = from;
    loop {
        let lt = data[i..].find("</")? + i;
        let name_start = lt + 2;
        let name_end = name_start + name.len();
        if name_end <= data.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
        {
            let after = bytes.get(name_end).copied();
            if matches!(after, Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r'))
            {
                // The '>' may simply not have arrived yet; that is still incomplete.
                return data[name_end..].find('>').map(|gt| (lt, name_end + gt + 1));
            } else if after.is_none() {
                // "</name" at the very end: incomplete.
                return None;
            }
        } else if name_end > data.len() {
            return None;
        }
        i = lt + 1;
    }
}

/// Find the `>` closing a start tag, honoring quoted attribute values.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices().skip(1) {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '>' => return Some(i),
                '"' | '\'' => quote = Some(c),
                _ => {}
            },
        }
    }
    None
}

/// Parse the inside of a tag (`name attr=value ...`, without the angle brackets).
/// Returns (lowercased name, attributes, self_closing).
fn parse_tag_inner(inner: &str) -> (String, Vec<(String, String)>, bool) {
    let bytes = inner.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len && !is_ws(bytes[i]) && bytes[i] != b'/' {
        i += 1;
    }
    let name = inner[..i].to_ascii_lowercase();
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    loop {
        while i < len && is_ws(bytes[i]) {
            i += 1;
        }
        if i >= len {
            break;
        }
        if bytes[i] == b'/' {
            if inner[i..].trim() == "/" {
                self_closing = true;
                break;
            }
            i += 1;
            continue;
        }
        let start = i;
        while i < len && !is_ws(bytes[i]) && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        let attr_name = &inner[start..i];
        if attr_name.is_empty() {
            // Junk character (stray '=' or quote); skip it.
            i += 1;
            continue;
        }
        while i < len && is_ws(bytes[i]) {
            i += 1;
        }
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && is_ws(bytes[i]) {
                i += 1;
            }
            let value = if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i] as char;
                i += 1;
                let vstart = i;
                match inner[i..].find(q) {
                    Some(rel) => {
                        let v = &inner[vstart..vstart + rel];
                        i = vstart + rel + 1;
                        v
                    }
                    None => {
                        let v = &inner[vstart..];
                        i = len;
                        v
                    }
                }
            } else {
                let vstart = i;
                while i < len && !is_ws(bytes[i]) {
                    i += 1;
                }
                &inner[vstart..i]
            };
            attrs.push((attr_name.to_string(), entities::decode(value)));
        } else {
            attrs.push((attr_name.to_string(), String::new()));
        }
    }
    (name, attrs, self_closing)
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
