/*
 * urlref.rs
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

//! URL reference resolution and classification for link/image handling: RFC 3986
//! reference resolution against an optional base, inline-image (content-id) detection,
//! and escaping for bracketed link annotations in extracted text.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

/// Characters that would break a `[url]` annotation open or glue it to neighbors.
const ANNOTATION: &AsciiSet = &CONTROLS.add(b' ').add(b'[').add(b']');

/// A bare attachment filename such as `photo.jpeg`: no path separators, no scheme,
/// a short alphanumeric extension.
static FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w .\-]+\.[A-Za-z0-9]{1,6}$").unwrap());

/// Return true if the string starts with a URI scheme (`letter (letter|digit|+|-|.)* :`).
pub fn has_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.' => {}
            _ => return false,
        }
    }
    false
}

/// Return true if the string already reads as a URL in running text, so a link
/// annotation would only repeat it.
pub fn looks_like_url(s: &str) -> bool {
    let t = s.trim();
    has_scheme(t) || t.starts_with("www.")
}

/// Classify an image reference as inline (no external fetch): a `cid:` content-id
/// reference, a bare attachment filename, or a path under the configured internal
/// image-serving prefix.
pub fn is_inline_image(value: &str, prefix: Option<&str>) -> bool {
    let v = value.trim();
    if v.len() >= 4 && v.as_bytes()[..4].eq_ignore_ascii_case(b"cid:") {
        return true;
    }
    if let Some(p) = prefix {
        if !p.is_empty() && v.starts_with(p) {
            return true;
        }
    }
    FILENAME.is_match(v)
}

/// Resolve a reference against an optional base URL (RFC 3986 merge with dot-segment
/// removal). Absolute references come back unchanged; anything unresolvable falls back
/// to the raw reference.
pub fn resolve(base: Option<&str>, reference: &str) -> String {
    let reference = reference.trim();
    if has_scheme(reference) {
        return reference.to_string();
    }
    let base = match base {
        Some(b) if !b.trim().is_empty() => b.trim(),
        _ => return reference.to_string(),
    };
    let (scheme, after_scheme) = match base.split_once("://") {
        Some((s, rest)) => (s, rest),
        None => return reference.to_string(),
    };
    let (authority, base_path) = match after_scheme.find('/') {
        Some(i) => (&after_scheme[..i], &after_scheme[i..]),
        None => (after_scheme, "/"),
    };
    if let Some(rest) = reference.strip_prefix("//") {
        return format!("{}://{}", scheme, rest);
    }
    let merged = if reference.starts_with('/') {
        reference.to_string()
    } else {
        // Merge with the base path directory.
        let dir = match base_path.rfind('/') {
            Some(i) => &base_path[..=i],
            None => "/",
        };
        format!("{}{}", dir, reference)
    };
    format!(
        "{}://{}{}",
        scheme,
        authority,
        remove_dot_segments(&merged)
    )
}

/// RFC 3986 section 5.2.4.
fn remove_dot_segments(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    let mut result = out.join("/");
    if (path.ends_with("/.") || path.ends_with("/..")) && !result.ends_with('/') {
        result.push('/');
    }
    if !result.starts_with('/') {
        result.insert(0, '/');
    }
    result
}

/// Percent-encode a resolved URL for inclusion in a `[url]` annotation.
pub fn encode_annotation(url: &str) -> String {
    utf8_percent_encode(url, ANNOTATION).to_string()
}
