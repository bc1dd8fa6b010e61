/*
 * css.rs
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

//! CSS rule sanitizing over style-rule strings: per-property filtering against a
//! style allow-list, token-level value filtering, and `selector { ... }` block
//! handling for style element content. The rewrite happens in place; the return
//! value reports whether anything was removed, which callers fold into their own
//! "something was neutralized" state.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::allowlist::{StyleRule, StyleTable};

/// Upper bound on CSS we are willing to pattern-match. Oversized input is dropped
/// wholesale rather than scanned.
pub(crate) const MAX_CSS_LEN: usize = 8 * 1024;

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{6})$|^rgb\(\s*\d{1,3}%?\s*,\s*\d{1,3}%?\s*,\s*\d{1,3}%?\s*\)$")
        .unwrap()
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[+-]?(?:\d+|\d*\.\d+)(?:%|px|pt|pc|em|ex|rem|cm|mm|in)?$").unwrap()
});

/// At least one `property: value` pair, where the value does not immediately look
/// like the `//` of a scheme-qualified URL.
static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[;{\s])[-a-z]+\s*:\s*[^;{}/][^;{}]*").unwrap());

/// True if the string reads as CSS declarations rather than, say, a bare URL.
pub fn contains_css_element(s: &str) -> bool {
    s.len() <= MAX_CSS_LEN && DECLARATION.is_match(s)
}

/// Sanitize a style-rule string in place against the table. With `preserve_blocks`,
/// `selector { declarations }` groups are kept (style element content); otherwise the
/// input is treated as a bare declaration list (style attribute value).
///
/// Returns true if any property, value token, or block was removed.
pub fn check_css(css: &mut String, table: &StyleTable, preserve_blocks: bool) -> bool {
    if css.len() > MAX_CSS_LEN {
        debug!(len = css.len(), "dropping oversized css input");
        css.clear();
        return true;
    }
    let (result, modified) = if preserve_blocks && css.contains('{') {
        filter_blocks(css, table)
    } else {
        filter_declarations(css, table)
    };
    *css = result;
    modified
}

fn filter_blocks(css: &str, table: &StyleTable) -> (String, bool) {
    let mut out = String::new();
    let mut modified = false;
    let mut rest = css;
    loop {
        match rest.find('{') {
            None => {
                if !rest.trim().is_empty() {
                    modified = true;
                }
                break;
            }
            Some(ob) => {
                let selector = rest[..ob].trim();
                match rest[ob + 1..].find('}') {
                    None => {
                        modified = true;
                        break;
                    }
                    Some(cb) => {
                        let body = &rest[ob + 1..ob + 1 + cb];
                        let (decls, m) = filter_declarations(body, table);
                        modified |= m;
                        if !decls.is_empty() && !selector.is_empty() {
                            if !out.is_empty() {
                                out.push('\n');
                            }
                            out.push_str(selector);
                            out.push_str(" { ");
                            out.push_str(&decls);
                            out.push_str(" }");
                        } else if !decls.is_empty() {
                            // Block without a selector is unusable; drop it.
                            modified = true;
                        }
                        rest = &rest[ob + 1 + cb + 1..];
                    }
                }
            }
        }
    }
    (out, modified)
}

fn filter_declarations(decls: &str, table: &StyleTable) -> (String, bool) {
    let mut out = String::new();
    let mut modified = false;
    for decl in split_level0(decls, ';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let (prop, value) = match decl.split_once(':') {
            Some(p) => p,
            None => {
                modified = true;
                continue;
            }
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            modified = true;
            continue;
        }
        match table.rule(&prop) {
            None => {
                if table.keeps_unlisted() {
                    push_declaration(&mut out, &prop, value);
                } else {
                    modified = true;
                }
            }
            Some(StyleRule::Strip) => modified = true,
            Some(StyleRule::Values(set)) => {
                let mut kept: Vec<&str> = Vec::new();
                for token in split_level0(value, ' ') {
                    if token.is_empty() {
                        continue;
                    }
                    if token_allowed(token, set) {
                        kept.push(token);
                    } else {
                        modified = true;
                    }
                }
                if !kept.is_empty() {
                    push_declaration(&mut out, &prop, &kept.join(" "));
                }
            }
        }
    }
    (out, modified)
}

fn push_declaration(out: &mut String, prop: &str, value: &str) {
    if !out.is_empty() {
        out.push_str("; ");
    }
    out.push_str(prop);
    out.push_str(": ");
    out.push_str(value);
}

/// Token acceptance under a value set: explicit member, or one of the markers
/// (`*` any non-URL token, `n` number with optional unit, `c` color literal,
/// `u` URL function). `expression(...)` never passes.
fn token_allowed(token: &str, set: &std::collections::HashSet<String>) -> bool {
    let t = token.to_ascii_lowercase();
    if t.contains("expression(") {
        return false;
    }
    if t.contains("url(") {
        return set.contains("u");
    }
    if set.contains(&t) {
        return true;
    }
    if set.contains("*") {
        return true;
    }
    if set.contains("n") && NUMBER.is_match(&t) {
        return true;
    }
    if set.contains("c") && COLOR.is_match(&t) {
        return true;
    }
    false
}

/// Split on `sep` at parenthesis depth zero, so `url(a;b)` and `rgb(1, 2, 3)`
/// stay whole. Splitting on space treats any whitespace as the separator.
fn split_level0(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && (c == sep || (sep == ' ' && c.is_whitespace())) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allowlist::{blocker_style_table, default_style_table, StyleTable};

    #[test]
    fn unlisted_property_dropped() {
        let mut css = "color: red; position: absolute".to_string();
        let modified = check_css(&mut css, default_style_table(), false);
        assert!(modified);
        assert_eq!(css, "color: red");
    }

    #[test]
    fn strip_rule_always_deletes() {
        let mut css = "background-image: url(http://x/y.png)".to_string();
        let modified = check_css(&mut css, blocker_style_table(), false);
        assert!(modified);
        assert_eq!(css, "");
    }

    #[test]
    fn url_token_stripped_keywords_kept() {
        let mut css = "background: #fff url(http://evil/x.png) no-repeat".to_string();
        let modified = check_css(&mut css, blocker_style_table(), false);
        assert!(modified);
        assert_eq!(css, "background: #fff no-repeat");
    }

    #[test]
    fn permissive_table_passes_unlisted_untouched() {
        let mut css = "color: red; font-size: 12px".to_string();
        let modified = check_css(&mut css, blocker_style_table(), false);
        assert!(!modified);
        assert_eq!(css, "color: red; font-size: 12px");
    }

    #[test]
    fn expression_never_passes() {
        let mut css = "width: expression(alert(1))".to_string();
        assert!(check_css(&mut css, default_style_table(), false));
        assert_eq!(css, "");
        // Even a permissive table only skips unlisted property names, and width
        // is value-checked under the default table.
        let mut table = StyleTable::new();
        table.insert("width", crate::allowlist::StyleRule::Values(["*".to_string()].into()));
        let mut css = "width: expression(alert(1))".to_string();
        assert!(check_css(&mut css, &table, false));
        assert_eq!(css, "");
    }

    #[test]
    fn color_and_number_markers() {
        let mut css = "color: #a0b1c2; margin: 4px auto".to_string();
        let modified = check_css(&mut css, default_style_table(), false);
        assert!(!modified);
        assert_eq!(css, "color: #a0b1c2; margin: 4px auto");
    }

    #[test]
    fn blocks_preserved_for_style_elements() {
        let mut css = "body { color: red; position: fixed }\np { margin: 0 }".to_string();
        let modified = check_css(&mut css, default_style_table(), true);
        assert!(modified);
        assert_eq!(css, "body { color: red }\np { margin: 0 }");
    }

    #[test]
    fn block_emptied_of_declarations_is_dropped() {
        let mut css = "p { position: fixed }".to_string();
        assert!(check_css(&mut css, default_style_table(), true));
        assert_eq!(css, "");
    }

    #[test]
    fn oversized_input_dropped_wholesale() {
        let mut css = format!("color: red; x: {}", "y".repeat(MAX_CSS_LEN));
        assert!(check_css(&mut css, default_style_table(), false));
        assert_eq!(css, "");
    }

    #[test]
    fn sanitized_output_is_a_fixed_point() {
        let mut css = "body { color:red;  position: absolute }".to_string();
        check_css(&mut css, default_style_table(), true);
        let first = css.clone();
        let modified = check_css(&mut css, default_style_table(), true);
        assert!(!modified);
        assert_eq!(css, first);
    }

    #[test]
    fn declaration_detection() {
        assert!(contains_css_element("color: red"));
        assert!(contains_css_element("font-size:12px; color: blue"));
        assert!(!contains_css_element("http://example.com/x.png"));
        assert!(!contains_css_element("just words"));
    }
}
