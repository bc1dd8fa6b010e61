/*
 * sanitize_integration.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Integration tests for the sanitizing engine: full documents driven through the
 * tokenizer into each consumer, covering the security properties end to end
 * (idempotence, whitelist soundness, script exclusion, scheme rejection,
 * resource blocking) including deliberately malformed and unbalanced markup.
 *
 * Run with:
 *   cargo test -p setaccio_core --test sanitize_integration
 */

use setaccio_core::{HtmlParser, ImageFilter, TextExtractor, WhitelistFilter};

fn sanitize(html: &str) -> String {
    let mut parser = HtmlParser::new(WhitelistFilter::new());
    parser.receive(html);
    parser.close();
    parser.into_inner().into_html()
}

fn block_images(html: &str) -> (String, bool) {
    let mut parser = HtmlParser::new(ImageFilter::new());
    parser.receive(html);
    parser.close();
    let filter = parser.into_inner();
    let found = filter.resource_found();
    (filter.into_html(), found)
}

fn extract(html: &str) -> String {
    let mut parser = HtmlParser::new(TextExtractor::new());
    parser.receive(html);
    parser.close();
    parser.into_inner().into_plain_text()
}

#[test]
fn sanitizing_is_idempotent() {
    let input = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE html>"#,
        r#"<html><head><title>t</title>"#,
        "<style>body { color: red; position: fixed }</style></head>",
        r##"<body bgcolor="#ffffff"><p align="center" style="color: blue; top: 0">Hi <b>x</b></p>"##,
        r#"<blink>unwrapped</blink><script>evil()</script>"#,
        r#"<img src="a.png" width="5" height="tall"><a href="javascript:x">l</a></body></html>"#,
    );
    let first = sanitize(input);
    let second = sanitize(&first);
    assert_eq!(first, second);
    assert!(first.contains("unwrapped"));
    assert!(!first.contains("evil"));
    assert!(!first.contains("blink"));
}

#[test]
fn disallowed_tag_attributes_never_survive_but_content_does() {
    let out = sanitize(r#"<body><widget onclick="steal()" data-x="1">inner text</widget></body>"#);
    assert_eq!(out, "<body>inner text</body>");
}

#[test]
fn script_content_never_survives_even_unterminated() {
    let out = sanitize("<body><div><script>bad1()</script></div><script>bad2()</body>");
    assert!(!out.contains("bad1"));
    assert!(!out.contains("bad2"));
}

#[test]
fn dangerous_schemes_never_survive() {
    let out = sanitize(concat!(
        r#"<body><a href="JavaScript:alert(1)">x</a>"#,
        r#"<a href="  vbscript:do">y</a>"#,
        r#"<a href="http://example.com/">z</a></body>"#,
    ));
    assert!(!out.to_ascii_lowercase().contains("javascript"));
    assert!(!out.to_ascii_lowercase().contains("vbscript"));
    assert!(out.contains(r#"href="http://example.com/""#));
}

#[test]
fn external_image_blocked_inline_image_kept() {
    let (out, found) = block_images(r#"<img src="http://evil.example/x.png">"#);
    assert!(out.contains(r#"src="""#));
    assert!(found);

    let (out, found) = block_images(r#"<img src="cid:abc">"#);
    assert!(out.contains(r#"src="cid:abc""#));
    assert!(!found);
}

#[test]
fn unbalanced_markup_cannot_leak_filtered_content() {
    let out = sanitize(concat!(
        "<body><p>a</p></div></div></div>",
        "<script>evil()</script><p>b</p></body>",
    ));
    assert!(!out.contains("evil"));
    assert!(out.contains("<p>a</p>"));
    assert!(out.contains("<p>b</p>"));
}

#[test]
fn end_tags_alone_cannot_open_an_emission_path() {
    // A close for a tag that was never opened, before any body, produces nothing.
    let out = sanitize("</div></p><body>x</body>");
    assert_eq!(out, "<body>x</body>");
}

#[test]
fn nested_blockquote_extraction() {
    let text = extract("<body><blockquote><blockquote>A</blockquote></blockquote></body>");
    let line = text.split("\r\n").find(|l| l.contains('A')).unwrap();
    assert_eq!(line, "> > A");
}

#[test]
fn two_paragraphs_two_lines() {
    let text = extract("<body><p>Hello</p><p>World</p></body>");
    assert_eq!(text, "Hello\r\nWorld\r\n");
}

#[test]
fn signature_delimiter_normalized_end_to_end() {
    assert_eq!(extract("<body> -- </body>"), "-- ");
    assert_eq!(extract("<body> --&nbsp;</body>"), "-- ");
}

#[test]
fn filter_instance_reusable_across_documents() {
    let mut parser = HtmlParser::new(WhitelistFilter::new());
    parser.receive("<body><p>first</p></body>");
    parser.close();
    let mut filter = parser.into_inner();
    assert_eq!(filter.html(), "<body><p>first</p></body>");

    filter.reset();
    let mut parser = HtmlParser::new(filter);
    parser.receive("<body><p>second</p></body>");
    parser.close();
    assert_eq!(parser.into_inner().html(), "<body><p>second</p></body>");
}

#[test]
fn blocker_flag_resets_between_documents() {
    let mut parser = HtmlParser::new(ImageFilter::new());
    parser.receive(r#"<img src="http://evil/x.png">"#);
    parser.close();
    let mut filter = parser.into_inner();
    assert!(filter.resource_found());

    filter.reset();
    let mut parser = HtmlParser::new(filter);
    parser.receive(r#"<img src="cid:ok">"#);
    parser.close();
    assert!(!parser.into_inner().resource_found());
}
