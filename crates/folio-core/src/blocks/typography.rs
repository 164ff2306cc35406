use serde_json::json;

use super::{align_field, open_tag, props_of, text, ALIGN_OPTIONS};
use crate::model::Props;
use crate::registry::fields::{discriminant, prop_str};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

const LEVELS: &[(&str, &str)] = &[("H1", "h1"), ("H2", "h2"), ("H3", "h3"), ("H4", "h4")];

pub struct Heading;

fn level_field() -> FieldSpec {
    FieldSpec::select("level", "Level", LEVELS)
}

fn align_class(props: &Props) -> &str {
    discriminant(props, &align_field(), ALIGN_OPTIONS[0].1)
}

impl BlockType for Heading {
    fn name(&self) -> &'static str {
        "Heading"
    }

    fn category(&self) -> Category {
        Category::Typography
    }

    fn default_props(&self) -> Props {
        props_of(&[
            ("text", json!("Heading")),
            ("level", json!("h2")),
            ("align", json!("left")),
        ])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![FieldSpec::text("text", "Text"), level_field(), align_field()]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        let tag = discriminant(props, &level_field(), "h2");
        open_tag(
            out,
            tag,
            &format!("block-heading align-{}", align_class(props)),
            input.node_id,
        );
        out.push('>');
        out.push_str(&text(prop_str(props, "text").unwrap_or("")));
        out.push_str(&format!("</{}>", tag));
    }
}

/// Paragraph text; blank lines split paragraphs
pub struct Text;

impl BlockType for Text {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn category(&self) -> Category {
        Category::Typography
    }

    fn default_props(&self) -> Props {
        props_of(&[("body", json!("")), ("align", json!("left"))])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![FieldSpec::textarea("body", "Text"), align_field()]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        open_tag(
            out,
            "div",
            &format!("block-text align-{}", align_class(props)),
            input.node_id,
        );
        out.push('>');
        let body = prop_str(props, "body").unwrap_or("");
        for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            out.push_str("<p>");
            out.push_str(&text(paragraph).replace('\n', "<br>"));
            out.push_str("</p>");
        }
        out.push_str("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn render(block: &dyn BlockType, props: Value) -> String {
        let props = props.as_object().cloned().unwrap_or_default();
        let mut out = String::new();
        block.render(
            &BlockRender {
                node_id: "n",
                props: &props,
                children: "",
            },
            &mut out,
        );
        out
    }

    #[test]
    fn test_heading_uses_level_tag() {
        let html = render(&Heading, json!({"text": "About us", "level": "h1"}));
        assert!(html.starts_with("<h1 "));
        assert!(html.ends_with(">About us</h1>"));
    }

    #[test]
    fn test_heading_rejects_arbitrary_tag() {
        let html = render(&Heading, json!({"text": "x", "level": "script"}));
        assert!(html.starts_with("<h2 "));
        assert!(html.ends_with("</h2>"));
    }

    #[test]
    fn test_text_splits_paragraphs() {
        let html = render(&Text, json!({"body": "one\n\ntwo\nlines", "align": "center"}));
        assert!(html.contains("align-center"));
        assert!(html.contains("<p>one</p><p>two<br>lines</p>"));
    }

    #[test]
    fn test_text_escapes_markup() {
        let html = render(&Text, json!({"body": "<script>alert(1)</script>"}));
        assert!(!html.contains("<script>"));
    }
}
