use serde_json::json;

use super::{attr, open_tag, props_of, safe_url, text};
use crate::model::Props;
use crate::registry::fields::{discriminant, prop_bool, prop_str};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

const STYLES: &[(&str, &str)] = &[
    ("Primary", "primary"),
    ("Secondary", "secondary"),
    ("Link", "link"),
];

pub struct Button;

fn style_field() -> FieldSpec {
    FieldSpec::select("style", "Style", STYLES)
}

impl BlockType for Button {
    fn name(&self) -> &'static str {
        "Button"
    }

    fn category(&self) -> Category {
        Category::Actions
    }

    fn default_props(&self) -> Props {
        props_of(&[
            ("label", json!("Click me")),
            ("url", json!("#")),
            ("style", json!("primary")),
            ("open_in_new_tab", json!(false)),
        ])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("label", "Label"),
            FieldSpec::text("url", "Link").placeholder("/contact"),
            style_field(),
            FieldSpec::boolean("open_in_new_tab", "Open in new tab"),
        ]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        let style = discriminant(props, &style_field(), "primary");
        open_tag(out, "a", &format!("block-button btn btn--{}", style), input.node_id);
        out.push_str(&format!(
            " href=\"{}\"",
            attr(prop_str(props, "url").and_then(safe_url).unwrap_or("#"))
        ));
        if prop_bool(props, "open_in_new_tab") {
            out.push_str(" target=\"_blank\" rel=\"noopener\"");
        }
        out.push('>');
        out.push_str(&text(prop_str(props, "label").unwrap_or("")));
        out.push_str("</a>");
    }
}
