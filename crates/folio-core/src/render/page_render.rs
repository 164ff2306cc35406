use std::sync::Arc;

use super::{RenderFormat, RenderOutput, RenderWarning};
use crate::log_degraded;
use crate::model::{ContentNode, PageDocument, PageTree};
use crate::registry::{BlockRender, Registry};

/// Wrapper element around a rendered tree
const PAGE_OPEN: &str = "<div class=\"folio-page\">";
const PAGE_CLOSE: &str = "</div>";

/// Dispatches content nodes to their registered blocks
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Arc<Registry>,
}

impl Renderer {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render a stored content string
    ///
    /// 1. Try to parse it as a tree.
    /// 2. Parsed: render the tree.
    /// 3. Not a tree: return the string unchanged as legacy markup.
    pub fn render_source(&self, source: &str) -> RenderOutput {
        match PageTree::parse(source) {
            Some(tree) => self.render_tree(&tree),
            None => RenderOutput {
                html: source.to_string(),
                format: RenderFormat::Legacy,
                warnings: Vec::new(),
            },
        }
    }

    /// Render a document: its tree when it has one, else its legacy body
    pub fn render_document(&self, doc: &PageDocument) -> RenderOutput {
        match (&doc.tree, &doc.legacy_body) {
            (Some(tree), _) => self.render_tree(tree),
            (None, Some(body)) => self.render_source(body),
            (None, None) => self.render_tree(&PageTree::new()),
        }
    }

    /// Render a tree; unknown block types degrade to a placeholder and a
    /// warning, never an error
    pub fn render_tree(&self, tree: &PageTree) -> RenderOutput {
        let mut html = String::from(PAGE_OPEN);
        let mut warnings = Vec::new();
        for node in &tree.content {
            self.render_node(node, &mut html, &mut warnings);
        }
        html.push_str(PAGE_CLOSE);
        RenderOutput {
            html,
            format: RenderFormat::Tree,
            warnings,
        }
    }

    fn render_node(&self, node: &ContentNode, out: &mut String, warnings: &mut Vec<RenderWarning>) {
        let mut children = String::new();
        for child in &node.children {
            self.render_node(child, &mut children, warnings);
        }

        let block = match self.registry.get(&node.block_type) {
            Ok(block) => block,
            Err(_) => {
                log_degraded!(
                    "render_tree",
                    "unknown block type",
                    block_type = node.block_type.as_str(),
                    node_id = node.id.as_str()
                );
                out.push_str(&format!(
                    "<!-- unknown block: {} -->",
                    comment_safe(&node.block_type)
                ));
                out.push_str(&children);
                warnings.push(RenderWarning {
                    node_id: node.id.clone(),
                    block_type: node.block_type.clone(),
                    message: format!("Unknown block type: {}", node.block_type),
                });
                return;
            }
        };

        let mut props = block.default_props();
        props.extend(node.props.clone());
        block.render(
            &BlockRender {
                node_id: &node.id,
                props: &props,
                children: &children,
            },
            out,
        );

        // a leaf block ignores its children; keep them visible after it
        if !block.accepts_children() && !node.children.is_empty() {
            log_degraded!(
                "render_tree",
                "children under a leaf block",
                block_type = node.block_type.as_str(),
                node_id = node.id.as_str()
            );
            out.push_str(&children);
            warnings.push(RenderWarning {
                node_id: node.id.clone(),
                block_type: node.block_type.clone(),
                message: format!("{} blocks cannot hold child blocks", node.block_type),
            });
        }
    }
}

/// Block type names come from stored data; keep only characters that
/// cannot close an HTML comment
fn comment_safe(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Props;
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::new(Arc::new(Registry::standard().unwrap()))
    }

    fn props(value: serde_json::Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_legacy_markup_is_verbatim() {
        let out = renderer().render_source("<h1>Hi</h1>");
        assert_eq!(out.html, "<h1>Hi</h1>");
        assert_eq!(out.format, RenderFormat::Legacy);
    }

    #[test]
    fn test_empty_tree_renders_structurally() {
        let source = r#"{"root":{},"content":[]}"#;
        let out = renderer().render_source(source);
        assert_eq!(out.format, RenderFormat::Tree);
        assert_eq!(out.html, format!("{}{}", PAGE_OPEN, PAGE_CLOSE));
        assert_ne!(out.html, source);
    }

    #[test]
    fn test_json_that_is_not_a_tree_is_legacy() {
        let out = renderer().render_source(r#"{"message":"hello"}"#);
        assert_eq!(out.format, RenderFormat::Legacy);
    }

    #[test]
    fn test_node_props_win_over_defaults() {
        let tree = PageTree::with_content(vec![ContentNode::new(
            "h1",
            "Hero",
            props(json!({"title": "Welcome"})),
        )]);
        let html = renderer().render_tree(&tree).html;
        assert!(html.contains("Welcome"));
        assert!(!html.contains(">Heading<"));
        // default variant still applied
        assert!(html.contains("hero--centered"));
    }

    #[test]
    fn test_unknown_block_keeps_siblings_and_descendants() {
        let tree = PageTree::with_content(vec![
            ContentNode::new("t1", "Text", props(json!({"body": "before"}))),
            ContentNode::new("x", "Carousel", Props::new()).with_children(vec![ContentNode::new(
                "t2",
                "Text",
                props(json!({"body": "inside"})),
            )]),
            ContentNode::new("t3", "Text", props(json!({"body": "after"}))),
        ]);
        let out = renderer().render_tree(&tree);

        assert!(out.html.contains("before"));
        assert!(out.html.contains("inside"));
        assert!(out.html.contains("after"));
        assert!(out.html.contains("<!-- unknown block: Carousel -->"));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].node_id, "x");
        assert!(out.is_degraded());
    }

    #[test]
    fn test_unknown_block_name_cannot_close_comment() {
        let tree = PageTree::with_content(vec![ContentNode::new("x", "--><script>", Props::new())]);
        let html = renderer().render_tree(&tree).html;
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_children_of_leaf_block_are_not_lost() {
        let tree = PageTree::with_content(vec![ContentNode::new("t", "Text", props(json!({"body": "own"})))
            .with_children(vec![ContentNode::new("c", "Text", props(json!({"body": "CHILD"})))])]);
        let out = renderer().render_tree(&tree);

        let own = out.html.find(">own<").unwrap();
        let child = out.html.find(">CHILD<").unwrap();
        assert!(own < child);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].node_id, "t");
        assert_eq!(out.warnings[0].block_type, "Text");
    }

    #[test]
    fn test_columns_render_children_in_order() {
        let tree = PageTree::with_content(vec![ContentNode::new("c", "Columns", Props::new())
            .with_children(vec![
                ContentNode::new("a", "Text", props(json!({"body": "A"}))),
                ContentNode::new("b", "Text", props(json!({"body": "B"}))),
            ])]);
        let html = renderer().render_tree(&tree).html;
        let a = html.find(">A<").unwrap();
        let b = html.find(">B<").unwrap();
        assert!(html.contains("block-columns"));
        assert!(a < b);
    }

    #[test]
    fn test_render_document_prefers_tree() {
        let r = renderer();
        let legacy = PageDocument::new("/old", "Old").with_legacy_body("<p>old</p>");
        assert_eq!(r.render_document(&legacy).html, "<p>old</p>");

        let current = PageDocument::new("/new", "New");
        assert_eq!(r.render_document(&current).format, RenderFormat::Tree);
    }
}
