/*
 * lib.rs
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

//! Streaming HTML sanitizing engine for untrusted email content (push/handler model).
//!
//! A tolerant tokenizer drives [`HtmlHandler`] consumers one event at a time:
//! [`WhitelistFilter`] keeps only allow-listed tags/attributes/CSS,
//! [`ImageFilter`] blanks references that would fetch external resources,
//! [`TextExtractor`] renders quoted, indented plain text, and [`DumpHandler`]
//! records a diagnostic trace. One consumer instance per document; instances are
//! not thread-safe, but independent instances share only the read-only allow-list
//! tables.

pub mod allowlist;
pub mod css;
pub mod dumper;
pub mod entities;
pub mod filter;
pub mod handler;
pub mod image_filter;
pub mod parser;
pub mod text_extract;
pub mod urlref;

pub use allowlist::{
    blocker_style_table, default_style_table, default_tag_table, AttrRule, ConfigError, StyleRule,
    StyleTable, TagRule, TagTable,
};
pub use dumper::DumpHandler;
pub use filter::WhitelistFilter;
pub use handler::HtmlHandler;
pub use image_filter::ImageFilter;
pub use parser::HtmlParser;
pub use text_extract::TextExtractor;
