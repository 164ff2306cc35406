use serde_json::json;

use super::{attr, open_tag, props_of, safe_url, text};
use crate::model::Props;
use crate::registry::fields::{prop_number, prop_str};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

pub struct Image;

impl BlockType for Image {
    fn name(&self) -> &'static str {
        "Image"
    }

    fn category(&self) -> Category {
        Category::Media
    }

    fn default_props(&self) -> Props {
        props_of(&[("url", json!("")), ("alt", json!("")), ("caption", json!(""))])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("url", "Image URL").placeholder("https://"),
            FieldSpec::text("alt", "Alt text"),
            FieldSpec::text("caption", "Caption"),
            FieldSpec::number("width", "Width (px)"),
        ]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        open_tag(out, "figure", "block-image", input.node_id);
        out.push('>');
        if let Some(url) = prop_str(props, "url").and_then(safe_url) {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\"",
                attr(url),
                attr(prop_str(props, "alt").unwrap_or(""))
            ));
            if let Some(width) = prop_number(props, "width").filter(|w| *w > 0.0) {
                out.push_str(&format!(" width=\"{}\"", width.round() as u64));
            }
            out.push('>');
        }
        if let Some(caption) = prop_str(props, "caption") {
            out.push_str(&format!("<figcaption>{}</figcaption>", text(caption)));
        }
        out.push_str("</figure>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(props: serde_json::Value) -> String {
        let props = props.as_object().cloned().unwrap_or_default();
        let mut out = String::new();
        Image.render(
            &BlockRender {
                node_id: "img",
                props: &props,
                children: "",
            },
            &mut out,
        );
        out
    }

    #[test]
    fn test_image_with_width_and_caption() {
        let html = render(json!({"url": "/cat.png", "alt": "A cat", "width": "320", "caption": "Cat"}));
        assert!(html.contains("<img src=\"/cat.png\" alt=\"A cat\" width=\"320\">"));
        assert!(html.contains("<figcaption>Cat</figcaption>"));
    }

    #[test]
    fn test_image_without_url_renders_empty_figure() {
        let html = render(json!({}));
        assert!(!html.contains("<img"));
        assert!(html.ends_with("></figure>"));
    }
}
