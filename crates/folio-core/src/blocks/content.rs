use serde_json::json;

use super::{attr, open_tag, props_of, safe_url, text};
use crate::model::Props;
use crate::registry::fields::{prop_bool, prop_str};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

/// Titled box; the image fields only apply once `has_image` is switched on
pub struct Card;

impl BlockType for Card {
    fn name(&self) -> &'static str {
        "Card"
    }

    fn category(&self) -> Category {
        Category::Content
    }

    fn default_props(&self) -> Props {
        props_of(&[
            ("title", json!("Card title")),
            ("body", json!("")),
            ("has_image", json!(false)),
        ])
    }

    fn fields(&self, props: &Props) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::text("title", "Title"),
            FieldSpec::textarea("body", "Body"),
            FieldSpec::boolean("has_image", "Show image"),
        ];
        if prop_bool(props, "has_image") {
            fields.push(FieldSpec::text("image_url", "Image URL").placeholder("https://"));
            fields.push(FieldSpec::text("image_alt", "Image description"));
        }
        fields
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        open_tag(out, "article", "block-card", input.node_id);
        out.push('>');
        if prop_bool(props, "has_image") {
            if let Some(url) = prop_str(props, "image_url").and_then(safe_url) {
                out.push_str(&format!(
                    "<img class=\"card__image\" src=\"{}\" alt=\"{}\">",
                    attr(url),
                    attr(prop_str(props, "image_alt").unwrap_or(""))
                ));
            }
        }
        if let Some(title) = prop_str(props, "title") {
            out.push_str(&format!("<h3>{}</h3>", text(title)));
        }
        if let Some(body) = prop_str(props, "body") {
            out.push_str(&format!("<p>{}</p>", text(body)));
        }
        out.push_str("</article>");
    }
}
