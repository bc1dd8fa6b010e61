/*
 * allowlist.rs
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

//! Tag and style allow-list tables. Tables are built once (static defaults or parsed
//! from an XML configuration document) and shared read-only across filter instances.
//! All XML reading goes through the quick_xml reader; no hand parsing.
//!
//! Configuration document shape:
//!
//! ```xml
//! <allowlist>
//!   <tag name="p"/>
//!   <tag name="a">
//!     <attr name="href"/>
//!     <attr name="target" values="_blank _self"/>
//!     <attr name="tabindex" numeric="true"/>
//!   </tag>
//!   <property name="color" values="c red blue"/>
//!   <property name="background-image" strip="true"/>
//! </allowlist>
//! ```
//!
//! A `<tag>` without `<attr>` children carries no attribute table: its attributes are
//! checked only against the generic rules (style/class/id plus scheme rejection).
//! Style value sets may contain the single-letter markers understood by the CSS
//! sanitizer: `*` (any non-URL token), `n` (number with optional unit), `c` (color
//! literal), `u` (URL function permitted).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Per-attribute validation rule.
#[derive(Debug, Clone)]
pub enum AttrRule {
    /// Any value, subject only to the dangerous-scheme rejection.
    Any,
    /// Lowercased value must be a member of the set.
    Values(HashSet<String>),
    /// Value must be all decimal digits after trimming.
    Numeric,
}

/// Per-CSS-property validation rule.
#[derive(Debug, Clone)]
pub enum StyleRule {
    /// Every value token must be acceptable under the set (members or markers).
    Values(HashSet<String>),
    /// Always delete the property, whatever its value.
    Strip,
}

/// Rule for one allow-listed tag: either no attribute table (generic rules only)
/// or a table of per-attribute rules.
#[derive(Debug, Clone)]
pub struct TagRule {
    attributes: Option<HashMap<String, AttrRule>>,
}

impl TagRule {
    /// The attribute table, or None when the tag carries none.
    pub fn attributes(&self) -> Option<&HashMap<String, AttrRule>> {
        self.attributes.as_ref()
    }

    /// Rule for one attribute (lowercase name), if the tag has a table and lists it.
    pub fn attribute(&self, name: &str) -> Option<&AttrRule> {
        self.attributes.as_ref()?.get(name)
    }
}

/// The tag allow-list: lowercase tag name to rule.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    tags: HashMap<String, TagRule>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a tag with no attribute table.
    pub fn allow(&mut self, tag: &str) {
        self.tags
            .insert(tag.to_ascii_lowercase(), TagRule { attributes: None });
    }

    /// Allow a tag with the given attribute rules (names lowercased).
    pub fn allow_attributes<'a, I>(&mut self, tag: &str, attrs: I)
    where
        I: IntoIterator<Item = (&'a str, AttrRule)>,
    {
        let table = attrs
            .into_iter()
            .map(|(name, rule)| (name.to_ascii_lowercase(), rule))
            .collect();
        self.tags.insert(
            tag.to_ascii_lowercase(),
            TagRule {
                attributes: Some(table),
            },
        );
    }

    /// Rule for a tag (lowercase name), or None when the tag is not allow-listed.
    pub fn rule(&self, tag: &str) -> Option<&TagRule> {
        self.tags.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Build a tag table from the `<tag>` elements of an `<allowlist>` document.
    pub fn from_xml(xml: &str) -> Result<TagTable, ConfigError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut table = TagTable::new();
        // Open <tag> element being read: (name, collected attribute rules).
        let mut current: Option<(String, Vec<(String, AttrRule)>)> = None;
        loop {
            let event = reader
                .read_event()
                .map_err(|e| ConfigError::with_source("malformed allowlist document", e))?;
            match event {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"allowlist" | b"property" => {}
                    b"tag" => {
                        if current.is_some() {
                            return Err(ConfigError::new("nested tag element"));
                        }
                        current = Some((required_attr(e, "name")?.to_ascii_lowercase(), Vec::new()));
                    }
                    b"attr" => match current.as_mut() {
                        Some((_, attrs)) => attrs.push(attr_rule(e)?),
                        None => return Err(ConfigError::new("attr element outside tag")),
                    },
                    other => {
                        return Err(ConfigError::new(format!(
                            "unknown element '{}'",
                            String::from_utf8_lossy(other)
                        )))
                    }
                },
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"allowlist" | b"property" => {}
                    b"tag" => {
                        let name = required_attr(e, "name")?;
                        table.allow(&name);
                    }
                    b"attr" => match current.as_mut() {
                        Some((_, attrs)) => attrs.push(attr_rule(e)?),
                        None => return Err(ConfigError::new("attr element outside tag")),
                    },
                    other => {
                        return Err(ConfigError::new(format!(
                            "unknown element '{}'",
                            String::from_utf8_lossy(other)
                        )))
                    }
                },
                Event::End(ref e) => {
                    if e.name().as_ref() == b"tag" {
                        if let Some((name, attrs)) = current.take() {
                            if attrs.is_empty() {
                                table.allow(&name);
                            } else {
                                table.allow_attributes(
                                    &name,
                                    attrs.iter().map(|(n, r)| (n.as_str(), r.clone())),
                                );
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        if current.is_some() {
            return Err(ConfigError::new("unterminated tag element"));
        }
        Ok(table)
    }
}

/// The style property allow-list. `keep_unlisted` selects the policy for properties
/// the table does not mention: drop them (whitelist filtering) or pass them through
/// untouched (the narrower resource-blocking transform).
#[derive(Debug, Clone)]
pub struct StyleTable {
    properties: HashMap<String, StyleRule>,
    keep_unlisted: bool,
}

impl StyleTable {
    /// Empty table that drops unlisted properties.
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
            keep_unlisted: false,
        }
    }

    /// Empty table that passes unlisted properties through untouched.
    pub fn permissive() -> Self {
        Self {
            properties: HashMap::new(),
            keep_unlisted: true,
        }
    }

    pub fn insert(&mut self, property: &str, rule: StyleRule) {
        self.properties.insert(property.to_ascii_lowercase(), rule);
    }

    pub fn rule(&self, property: &str) -> Option<&StyleRule> {
        self.properties.get(property)
    }

    pub fn keeps_unlisted(&self) -> bool {
        self.keep_unlisted
    }

    /// Build a style table from the `<property>` elements of an `<allowlist>` document.
    /// The result drops unlisted properties.
    pub fn from_xml(xml: &str) -> Result<StyleTable, ConfigError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut table = StyleTable::new();
        loop {
            let event = reader
                .read_event()
                .map_err(|e| ConfigError::with_source("malformed allowlist document", e))?;
            match event {
                Event::Empty(ref e) | Event::Start(ref e) => match e.name().as_ref() {
                    b"allowlist" | b"tag" | b"attr" => {}
                    b"property" => {
                        let name = required_attr(e, "name")?;
                        let values = optional_attr(e, "values")?;
                        let strip = optional_attr(e, "strip")?
                            .map(|v| v == "true")
                            .unwrap_or(false);
                        match (values, strip) {
                            (Some(_), true) => {
                                return Err(ConfigError::new(format!(
                                    "property '{}' has both values and strip",
                                    name
                                )))
                            }
                            (Some(v), false) => {
                                table.insert(&name, StyleRule::Values(value_set(&v)))
                            }
                            (None, true) => table.insert(&name, StyleRule::Strip),
                            (None, false) => {
                                return Err(ConfigError::new(format!(
                                    "property '{}' needs values or strip",
                                    name
                                )))
                            }
                        }
                    }
                    other => {
                        return Err(ConfigError::new(format!(
                            "unknown element '{}'",
                            String::from_utf8_lossy(other)
                        )))
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(table)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// True if the value is all decimal digits after trimming (the numeric attribute rule).
pub(crate) fn is_numeric(value: &str) -> bool {
    let t = value.trim();
    !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())
}

fn value_set(list: &str) -> HashSet<String> {
    list.split_whitespace()
        .map(|s| s.to_ascii_lowercase())
        .collect()
}

fn attr_rule(e: &BytesStart) -> Result<(String, AttrRule), ConfigError> {
    let name = required_attr(e, "name")?.to_ascii_lowercase();
    let values = optional_attr(e, "values")?;
    let numeric = optional_attr(e, "numeric")?
        .map(|v| v == "true")
        .unwrap_or(false);
    match (values, numeric) {
        (Some(_), true) => Err(ConfigError::new(format!(
            "attr '{}' has both values and numeric",
            name
        ))),
        (Some(v), false) => Ok((name, AttrRule::Values(value_set(&v)))),
        (None, true) => Ok((name, AttrRule::Numeric)),
        (None, false) => Ok((name, AttrRule::Any)),
    }
}

fn required_attr(e: &BytesStart, name: &str) -> Result<String, ConfigError> {
    optional_attr(e, name)?.ok_or_else(|| {
        ConfigError::new(format!(
            "element '{}' missing '{}' attribute",
            String::from_utf8_lossy(e.name().as_ref()),
            name
        ))
    })
}

fn optional_attr(e: &BytesStart, name: &str) -> Result<Option<String>, ConfigError> {
    match e.try_get_attribute(name) {
        Ok(Some(a)) => match a.unescape_value() {
            Ok(v) => Ok(Some(v.into_owned())),
            Err(err) => Err(ConfigError::with_source("bad attribute value", err)),
        },
        Ok(None) => Ok(None),
        Err(err) => Err(ConfigError::with_source("bad attribute", err)),
    }
}

fn values(list: &[&str]) -> AttrRule {
    AttrRule::Values(list.iter().map(|s| s.to_string()).collect())
}

fn style_values(list: &[&str]) -> StyleRule {
    StyleRule::Values(list.iter().map(|s| s.to_string()).collect())
}

const ALIGN: &[&str] = &["left", "center", "right", "justify"];
const VALIGN: &[&str] = &["top", "middle", "bottom", "baseline"];

static DEFAULT_TAGS: LazyLock<TagTable> = LazyLock::new(|| {
    let mut t = TagTable::new();
    for tag in [
        "html", "head", "style", "center", "b", "i", "u", "em", "strong", "small", "big", "sub",
        "sup", "s", "strike", "tt", "code", "kbd", "samp", "var", "cite", "abbr", "acronym",
        "dfn", "blockquote", "pre", "br", "hr", "span", "address", "caption", "thead", "tbody",
        "tfoot", "dl", "dt", "dd", "nobr",
    ] {
        t.allow(tag);
    }
    t.allow_attributes(
        "body",
        [
            ("bgcolor", AttrRule::Any),
            ("text", AttrRule::Any),
            ("link", AttrRule::Any),
            ("alink", AttrRule::Any),
            ("vlink", AttrRule::Any),
        ],
    );
    t.allow_attributes(
        "a",
        [
            ("href", AttrRule::Any),
            ("name", AttrRule::Any),
            ("title", AttrRule::Any),
            ("target", values(&["_blank", "_self", "_parent", "_top"])),
        ],
    );
    t.allow_attributes(
        "img",
        [
            ("src", AttrRule::Any),
            ("alt", AttrRule::Any),
            ("title", AttrRule::Any),
            ("width", AttrRule::Numeric),
            ("height", AttrRule::Numeric),
            ("border", AttrRule::Numeric),
            ("hspace", AttrRule::Numeric),
            ("vspace", AttrRule::Numeric),
            ("align", values(&["left", "right", "top", "middle", "bottom"])),
        ],
    );
    t.allow_attributes(
        "font",
        [
            ("color", AttrRule::Any),
            ("face", AttrRule::Any),
            (
                "size",
                values(&["1", "2", "3", "4", "5", "6", "7", "+1", "+2", "-1", "-2"]),
            ),
        ],
    );
    for tag in ["p", "div", "h1", "h2", "h3", "h4", "h5", "h6"] {
        t.allow_attributes(tag, [("align", values(ALIGN))]);
    }
    t.allow_attributes(
        "table",
        [
            ("width", AttrRule::Any),
            ("height", AttrRule::Any),
            ("border", AttrRule::Numeric),
            ("cellpadding", AttrRule::Numeric),
            ("cellspacing", AttrRule::Numeric),
            ("align", values(&["left", "center", "right"])),
            ("bgcolor", AttrRule::Any),
            ("summary", AttrRule::Any),
        ],
    );
    t.allow_attributes(
        "tr",
        [
            ("align", values(ALIGN)),
            ("valign", values(VALIGN)),
            ("bgcolor", AttrRule::Any),
            ("height", AttrRule::Any),
        ],
    );
    for tag in ["td", "th"] {
        t.allow_attributes(
            tag,
            [
                ("colspan", AttrRule::Numeric),
                ("rowspan", AttrRule::Numeric),
                ("width", AttrRule::Any),
                ("height", AttrRule::Any),
                ("align", values(ALIGN)),
                ("valign", values(VALIGN)),
                ("bgcolor", AttrRule::Any),
                ("nowrap", AttrRule::Any),
            ],
        );
    }
    for tag in ["col", "colgroup"] {
        t.allow_attributes(
            tag,
            [
                ("span", AttrRule::Numeric),
                ("width", AttrRule::Any),
                ("align", values(ALIGN)),
                ("valign", values(VALIGN)),
            ],
        );
    }
    t.allow_attributes(
        "ol",
        [("type", values(&["1", "a", "i"])), ("start", AttrRule::Numeric)],
    );
    t.allow_attributes("ul", [("type", values(&["disc", "circle", "square"]))]);
    t.allow_attributes(
        "li",
        [("type", AttrRule::Any), ("value", AttrRule::Numeric)],
    );
    t.allow_attributes(
        "meta",
        [
            ("http-equiv", values(&["content-type"])),
            ("name", AttrRule::Any),
            ("content", AttrRule::Any),
        ],
    );
    t
});

/// Background shorthand keywords safe without an URL function.
const BACKGROUND_KEYWORDS: &[&str] = &[
    "left", "right", "top", "bottom", "center", "repeat", "repeat-x", "repeat-y", "no-repeat",
    "scroll", "fixed", "transparent", "none", "n", "c",
];

static DEFAULT_STYLES: LazyLock<StyleTable> = LazyLock::new(|| {
    let mut t = StyleTable::new();
    let named_colors = [
        "aqua", "black", "blue", "fuchsia", "gray", "green", "lime", "maroon", "navy", "olive",
        "orange", "purple", "red", "silver", "teal", "white", "yellow", "transparent", "c",
    ];
    t.insert("color", style_values(&named_colors));
    t.insert("background-color", style_values(&named_colors));
    t.insert("background", style_values(BACKGROUND_KEYWORDS));
    t.insert(
        "background-position",
        style_values(&["left", "right", "top", "bottom", "center", "n"]),
    );
    t.insert(
        "background-repeat",
        style_values(&["repeat", "repeat-x", "repeat-y", "no-repeat"]),
    );
    t.insert("font-family", style_values(&["*"]));
    t.insert(
        "font-size",
        style_values(&[
            "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller",
            "larger", "n",
        ]),
    );
    t.insert(
        "font-weight",
        style_values(&["normal", "bold", "bolder", "lighter", "n"]),
    );
    t.insert("font-style", style_values(&["normal", "italic", "oblique"]));
    t.insert("text-align", style_values(ALIGN));
    t.insert(
        "text-decoration",
        style_values(&["none", "underline", "overline", "line-through"]),
    );
    t.insert("text-indent", style_values(&["n"]));
    t.insert("letter-spacing", style_values(&["n", "normal"]));
    t.insert("line-height", style_values(&["n", "normal"]));
    for prop in [
        "margin",
        "margin-top",
        "margin-right",
        "margin-bottom",
        "margin-left",
    ] {
        t.insert(prop, style_values(&["n", "auto"]));
    }
    for prop in [
        "padding",
        "padding-top",
        "padding-right",
        "padding-bottom",
        "padding-left",
    ] {
        t.insert(prop, style_values(&["n"]));
    }
    let border_tokens = [
        "n", "c", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
        "none", "hidden", "thin", "medium", "thick",
    ];
    for prop in [
        "border",
        "border-top",
        "border-right",
        "border-bottom",
        "border-left",
        "border-width",
        "border-color",
        "border-style",
        "border-collapse",
    ] {
        t.insert(prop, style_values(&border_tokens));
    }
    t.insert("width", style_values(&["n", "auto"]));
    t.insert("height", style_values(&["n", "auto"]));
    t.insert(
        "vertical-align",
        style_values(&[
            "top",
            "middle",
            "bottom",
            "baseline",
            "sub",
            "super",
            "text-top",
            "text-bottom",
            "n",
        ]),
    );
    t.insert("white-space", style_values(&["normal", "nowrap", "pre"]));
    t.insert(
        "display",
        style_values(&["block", "inline", "inline-block", "none", "list-item"]),
    );
    t.insert("float", style_values(&["left", "right", "none"]));
    t.insert("clear", style_values(&["left", "right", "both", "none"]));
    t.insert(
        "list-style-type",
        style_values(&[
            "disc",
            "circle",
            "square",
            "decimal",
            "lower-alpha",
            "upper-alpha",
            "lower-roman",
            "upper-roman",
            "none",
        ]),
    );
    t
});

static BLOCKER_STYLES: LazyLock<StyleTable> = LazyLock::new(|| {
    let mut t = StyleTable::permissive();
    t.insert("background", style_values(BACKGROUND_KEYWORDS));
    t.insert("background-image", StyleRule::Strip);
    t.insert(
        "background-position",
        style_values(&["left", "right", "top", "bottom", "center", "n"]),
    );
    t.insert(
        "background-repeat",
        style_values(&["repeat", "repeat-x", "repeat-y", "no-repeat"]),
    );
    t.insert("background-attachment", style_values(&["scroll", "fixed"]));
    t
});

/// The built-in tag allow-list for displaying untrusted mail bodies.
pub fn default_tag_table() -> &'static TagTable {
    &DEFAULT_TAGS
}

/// The built-in style allow-list used with [`default_tag_table`].
pub fn default_style_table() -> &'static StyleTable {
    &DEFAULT_STYLES
}

/// Style table for external-resource blocking: `background` keeps keyword values
/// only, `background-image` is always stripped, everything else passes through.
pub fn blocker_style_table() -> &'static StyleTable {
    &BLOCKER_STYLES
}

/// Configuration error: malformed allowlist document or unknown rule form.
/// Raised at construction time, before any document is processed.
#[derive(Debug)]
pub struct ConfigError {
    message: String,
    #[allow(dead_code)]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            source: None,
        }
    }

    pub fn with_source(
        msg: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: msg.into(),
            source: Some(source.into()),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_from_xml() {
        let xml = r#"<allowlist>
            <tag name="p"/>
            <tag name="a">
                <attr name="href"/>
                <attr name="target" values="_blank _self"/>
                <attr name="tabindex" numeric="true"/>
            </tag>
        </allowlist>"#;
        let table = TagTable::from_xml(xml).unwrap();
        assert!(table.contains("p"));
        assert!(table.rule("p").unwrap().attributes().is_none());
        let a = table.rule("a").unwrap();
        assert!(matches!(a.attribute("href"), Some(AttrRule::Any)));
        assert!(matches!(a.attribute("tabindex"), Some(AttrRule::Numeric)));
        match a.attribute("target") {
            Some(AttrRule::Values(set)) => {
                assert!(set.contains("_blank"));
                assert!(!set.contains("_parent"));
            }
            other => panic!("unexpected rule: {:?}", other),
        }
        assert!(!table.contains("script"));
    }

    #[test]
    fn tag_names_are_lowercased() {
        let table = TagTable::from_xml(r#"<allowlist><tag name="DIV"/></allowlist>"#).unwrap();
        assert!(table.contains("div"));
    }

    #[test]
    fn unknown_element_is_config_error() {
        let err = TagTable::from_xml(r#"<allowlist><wibble/></allowlist>"#).unwrap_err();
        assert!(err.to_string().contains("unknown element"));
    }

    #[test]
    fn attr_outside_tag_is_config_error() {
        assert!(TagTable::from_xml(r#"<allowlist><attr name="x"/></allowlist>"#).is_err());
    }

    #[test]
    fn missing_name_is_config_error() {
        assert!(TagTable::from_xml(r#"<allowlist><tag/></allowlist>"#).is_err());
    }

    #[test]
    fn style_table_from_xml() {
        let xml = r#"<allowlist>
            <property name="color" values="c red"/>
            <property name="background-image" strip="true"/>
        </allowlist>"#;
        let table = StyleTable::from_xml(xml).unwrap();
        assert!(matches!(table.rule("color"), Some(StyleRule::Values(_))));
        assert!(matches!(
            table.rule("background-image"),
            Some(StyleRule::Strip)
        ));
        assert!(table.rule("margin").is_none());
        assert!(!table.keeps_unlisted());
    }

    #[test]
    fn both_tables_read_from_one_document() {
        let xml = r#"<allowlist>
            <tag name="p"/>
            <tag name="a"><attr name="href"/></tag>
            <property name="color" values="c"/>
        </allowlist>"#;
        let tags = TagTable::from_xml(xml).unwrap();
        let styles = StyleTable::from_xml(xml).unwrap();
        assert!(tags.contains("a"));
        assert!(styles.rule("color").is_some());
    }

    #[test]
    fn style_table_rejects_unknown_element() {
        let err = StyleTable::from_xml(r#"<allowlist><wibble/></allowlist>"#).unwrap_err();
        assert!(err.to_string().contains("unknown element"));
    }

    #[test]
    fn property_with_values_and_strip_is_config_error() {
        let xml = r#"<allowlist><property name="x" values="a" strip="true"/></allowlist>"#;
        assert!(StyleTable::from_xml(xml).is_err());
    }

    #[test]
    fn property_without_rule_is_config_error() {
        assert!(StyleTable::from_xml(r#"<allowlist><property name="x"/></allowlist>"#).is_err());
    }

    #[test]
    fn defaults_cover_structural_tags() {
        let tags = default_tag_table();
        for tag in ["body", "style", "a", "img", "table", "p", "blockquote"] {
            assert!(tags.contains(tag), "missing {}", tag);
        }
        assert!(!tags.contains("script"));
        assert!(!tags.contains("iframe"));
        let styles = default_style_table();
        assert!(styles.rule("color").is_some());
        assert!(styles.rule("position").is_none());
        let blocker = blocker_style_table();
        assert!(blocker.keeps_unlisted());
        assert!(matches!(
            blocker.rule("background-image"),
            Some(StyleRule::Strip)
        ));
    }

    #[test]
    fn numeric_values() {
        assert!(is_numeric("42"));
        assert!(is_numeric(" 7 "));
        assert!(!is_numeric(""));
        assert!(!is_numeric("7px"));
        assert!(!is_numeric("-3"));
    }
}
