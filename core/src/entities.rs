/*
 * entities.rs
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

//! Character reference decoding and escaping for HTML text and attribute values.
//! Covers the XML core names, the Latin-1 set, the common typographic names seen
//! in mail bodies, and numeric references. Unrecognized references pass through.

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Longest reference we look for before giving up on a `&` (name + `#x` forms).
const MAX_REFERENCE_LEN: usize = 34;

/// The HTML 4 Latin-1 names, in code point order starting at U+00A0.
const LATIN1_NAMES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave", "Eacute",
    "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve", "Oacute",
    "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute",
    "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth", "ntilde",
    "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave", "uacute",
    "ucirc", "uuml", "yacute", "thorn", "yuml",
];

/// Decode one reference body (the part between `&` and `;`). None means "not a
/// reference we know"; the caller then emits the original characters unchanged.
fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return Some(char::from_u32(code).unwrap_or(REPLACEMENT_CHAR));
    }
    if let Some(i) = LATIN1_NAMES.iter().position(|&n| n == name) {
        return char::from_u32(0xA0 + i as u32);
    }
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "OElig" => '\u{152}',
        "oelig" => '\u{153}',
        "Scaron" => '\u{160}',
        "scaron" => '\u{161}',
        "Yuml" => '\u{178}',
        "fnof" => '\u{192}',
        "circ" => '\u{2C6}',
        "tilde" => '\u{2DC}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "zwnj" => '\u{200C}',
        "zwj" => '\u{200D}',
        "lrm" => '\u{200E}',
        "rlm" => '\u{200F}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201A}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "bdquo" => '\u{201E}',
        "dagger" => '\u{2020}',
        "Dagger" => '\u{2021}',
        "bull" => '\u{2022}',
        "hellip" => '\u{2026}',
        "permil" => '\u{2030}',
        "lsaquo" => '\u{2039}',
        "rsaquo" => '\u{203A}',
        "euro" => '\u{20AC}',
        "trade" => '\u{2122}',
        "minus" => '\u{2212}',
        "infin" => '\u{221E}',
        "ne" => '\u{2260}',
        "le" => '\u{2264}',
        "ge" => '\u{2265}',
        "larr" => '\u{2190}',
        "uarr" => '\u{2191}',
        "rarr" => '\u{2192}',
        "darr" => '\u{2193}',
        "harr" => '\u{2194}',
        "loz" => '\u{25CA}',
        "spades" => '\u{2660}',
        "clubs" => '\u{2663}',
        "hearts" => '\u{2665}',
        "diams" => '\u{2666}',
        _ => return None,
    };
    Some(ch)
}

/// Expand character references in the string. Unknown or malformed references are
/// copied through unchanged.
pub fn decode(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut pos = 0;
    while pos < s.len() {
        match s[pos..].find('&') {
            None => {
                out.push_str(&s[pos..]);
                break;
            }
            Some(rel) => {
                let amp = pos + rel;
                out.push_str(&s[pos..amp]);
                // Byte scan: the window cap may fall inside a multi-byte character.
                let window_end = (amp + MAX_REFERENCE_LEN).min(s.len());
                let semi = s.as_bytes()[amp..window_end]
                    .iter()
                    .position(|&b| b == b';')
                    .map(|i| amp + i);
                match semi {
                    Some(semi) if semi > amp + 1 => match decode_reference(&s[amp + 1..semi]) {
                        Some(ch) => {
                            out.push(ch);
                            pos = semi + 1;
                        }
                        None => {
                            out.push('&');
                            pos = amp + 1;
                        }
                    },
                    _ => {
                        out.push('&');
                        pos = amp + 1;
                    }
                }
            }
        }
    }
    out
}

/// Escape `& < > "` into `out`. Used when reconstructing attribute values and any
/// other markup-sensitive output.
pub fn encode_to(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Escape `& < > "`, returning a new string.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    encode_to(s, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_core_names() {
        assert_eq!(decode("a &amp; b &lt;c&gt; &quot;d&quot;"), "a & b <c> \"d\"");
    }

    #[test]
    fn decode_latin1_names() {
        assert_eq!(decode("&nbsp;"), "\u{a0}");
        assert_eq!(decode("&copy; 2026"), "\u{a9} 2026");
        assert_eq!(decode("gr&uuml;n"), "gr\u{fc}n");
    }

    #[test]
    fn decode_numeric_references() {
        assert_eq!(decode("&#65;&#x42;&#x63;"), "ABc");
        assert_eq!(decode("&#8212;"), "\u{2014}");
    }

    #[test]
    fn decode_invalid_code_point_becomes_replacement() {
        assert_eq!(decode("&#x110000;"), "\u{FFFD}");
    }

    #[test]
    fn unknown_reference_passes_through() {
        assert_eq!(decode("&bogus; &;"), "&bogus; &;");
        assert_eq!(decode("AT&T"), "AT&T");
    }

    #[test]
    fn unterminated_reference_passes_through() {
        assert_eq!(decode("a &amp b"), "a &amp b");
    }

    #[test]
    fn encode_escapes_markup() {
        assert_eq!(encode("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn encode_decode_round_trip() {
        let original = "x < y & \"z\"";
        assert_eq!(decode(&encode(original)), original);
    }
}
