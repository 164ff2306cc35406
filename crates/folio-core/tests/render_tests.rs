mod common;

use folio_core::logging_facility::init_test_capture;
use folio_core::{PageDocument, PageTree, RenderFormat};
use serde_json::json;

use common::{node, standard_renderer};

#[test]
fn test_legacy_fallback_is_verbatim() {
    let out = standard_renderer().render_source("<h1>Hi</h1>");
    assert_eq!(out.html, "<h1>Hi</h1>");
    assert_eq!(out.format, RenderFormat::Legacy);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_empty_tree_is_structured_not_raw() {
    let source = r#"{"root":{},"content":[]}"#;
    let out = standard_renderer().render_source(source);
    assert_eq!(out.format, RenderFormat::Tree);
    assert_ne!(out.html, source);
    assert!(!out.html.contains("content"));
}

#[test]
fn test_legacy_shaped_tree_renders() {
    let source = r#"{"content":[{"type":"Heading","props":{"id":"Heading-1","text":"Old style"}}]}"#;
    let out = standard_renderer().render_source(source);
    assert_eq!(out.format, RenderFormat::Tree);
    assert!(out.html.contains("data-node-id=\"Heading-1\""));
    assert!(out.html.contains("Old style"));
}

#[test]
fn test_unknown_block_is_logged_and_isolated() {
    let capture = init_test_capture();
    let tree = PageTree::with_content(vec![
        node("h1", "Hero", json!({"title": "Welcome"})),
        node("u1", "RenderTestMarquee", json!({"speed": 3})),
        node("t1", "Text", json!({"body": "Still here"})),
    ]);

    let out = standard_renderer().render_tree(&tree);

    assert!(out.html.contains("Welcome"));
    assert!(out.html.contains("Still here"));
    assert!(out.html.contains("<!-- unknown block: RenderTestMarquee -->"));
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].block_type, "RenderTestMarquee");

    let degraded = capture.degraded_with("block_type", "RenderTestMarquee");
    assert_eq!(degraded.len(), 1);
    assert_eq!(degraded[0].op.as_deref(), Some("render_tree"));
}

#[test]
fn test_document_render_uses_tree_over_legacy_body() {
    let mut doc = PageDocument::new("/about", "About Us")
        .with_tree(PageTree::with_content(vec![node("h1", "Hero", json!({"title": "Welcome"}))]));
    doc.legacy_body = Some("<p>ignored</p>".to_string());

    let out = standard_renderer().render_document(&doc);
    assert!(out.html.contains("Welcome"));
    assert!(!out.html.contains("ignored"));
}

#[test]
fn test_props_are_escaped() {
    let tree = PageTree::with_content(vec![node(
        "b",
        "Button",
        json!({"label": "<img src=x onerror=alert(1)>", "url": "\" onclick=\"x"}),
    )]);
    let html = standard_renderer().render_tree(&tree).html;
    assert!(!html.contains("<img"));
    assert!(!html.contains("\" onclick"));
}
