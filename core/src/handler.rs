/*
 * handler.rs
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

//! HTML handler trait: receives markup parse events (push model). The parser calls these
//! in document order; string data is valid only for the duration of the call.

/// Handler for HTML parsing events. All methods have no-op defaults so a consumer
/// implements only the events it cares about. Tag names arrive lowercased; attribute
/// names keep their original case and values arrive with entity references decoded.
pub trait HtmlHandler {
    fn xml_declaration(
        &mut self,
        _version: Option<&str>,
        _standalone: Option<bool>,
        _encoding: Option<&str>,
    ) {
    }

    fn comment(&mut self, _text: &str) {}

    fn doctype(&mut self, _text: &str) {}

    fn start_tag(&mut self, _tag: &str, _attributes: &[(String, String)]) {}

    /// Self-closing element (explicit `/>` or a void element such as `br` or `img`).
    fn simple_tag(&mut self, _tag: &str, _attributes: &[(String, String)]) {}

    fn end_tag(&mut self, _tag: &str) {}

    fn cdata(&mut self, _text: &str) {}

    /// Character data. `ignorable` is true when the run is whitespace only.
    fn text(&mut self, _text: &str, _ignorable: bool) {}

    /// Recoverable parse problem. Advisory only; the event stream continues.
    fn error(&mut self, _message: &str) {}
}

/// Reconstruct an XML declaration from its parsed parts (never echoed raw).
pub(crate) fn write_xml_declaration(
    out: &mut String,
    version: Option<&str>,
    standalone: Option<bool>,
    encoding: Option<&str>,
) {
    out.push_str("<?xml version=\"");
    out.push_str(version.unwrap_or("1.0"));
    out.push('"');
    if let Some(enc) = encoding {
        out.push_str(" encoding=\"");
        out.push_str(enc);
        out.push('"');
    }
    if let Some(sa) = standalone {
        out.push_str(" standalone=\"");
        out.push_str(if sa { "yes" } else { "no" });
        out.push('"');
    }
    out.push_str("?>");
}

/// Look up an attribute value by name, case-insensitively. Returns the first match
/// in document order.
pub fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup_is_case_insensitive() {
        let attrs = vec![
            ("SRC".to_string(), "a.png".to_string()),
            ("alt".to_string(), "logo".to_string()),
        ];
        assert_eq!(attribute(&attrs, "src"), Some("a.png"));
        assert_eq!(attribute(&attrs, "ALT"), Some("logo"));
        assert_eq!(attribute(&attrs, "title"), None);
    }

    #[test]
    fn attribute_first_match_wins() {
        let attrs = vec![
            ("href".to_string(), "first".to_string()),
            ("HREF".to_string(), "second".to_string()),
        ];
        assert_eq!(attribute(&attrs, "href"), Some("first"));
    }
}
