use serde_json::json;

use super::{open_tag, props_of};
use crate::model::Props;
use crate::registry::fields::{discriminant, prop_number};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

const GAPS: &[(&str, &str)] = &[("Small", "sm"), ("Medium", "md"), ("Large", "lg")];

/// Grid container; the only built-in that lays out nested nodes
pub struct Columns;

fn gap_field() -> FieldSpec {
    FieldSpec::select("gap", "Gap", GAPS)
}

impl BlockType for Columns {
    fn name(&self) -> &'static str {
        "Columns"
    }

    fn category(&self) -> Category {
        Category::Layout
    }

    fn default_props(&self) -> Props {
        props_of(&[("columns", json!(2)), ("gap", json!("md"))])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![FieldSpec::number("columns", "Columns"), gap_field()]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        let columns = prop_number(props, "columns")
            .map(|n| n.round().clamp(1.0, 6.0) as u8)
            .unwrap_or(2);
        let gap = discriminant(props, &gap_field(), "md");
        open_tag(
            out,
            "div",
            &format!("block-columns cols-{} gap-{}", columns, gap),
            input.node_id,
        );
        out.push('>');
        out.push_str(input.children);
        out.push_str("</div>");
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

pub struct Spacer;

impl BlockType for Spacer {
    fn name(&self) -> &'static str {
        "Spacer"
    }

    fn category(&self) -> Category {
        Category::Layout
    }

    fn default_props(&self) -> Props {
        props_of(&[("height", json!(32))])
    }

    fn fields(&self, _props: &Props) -> Vec<FieldSpec> {
        vec![FieldSpec::number("height", "Height (px)")]
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let height = prop_number(input.props, "height")
            .filter(|h| *h >= 0.0)
            .map(|h| h.round() as u64)
            .unwrap_or(32);
        open_tag(out, "div", "block-spacer", input.node_id);
        out.push_str(&format!(" style=\"height:{}px\" aria-hidden=\"true\"></div>", height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(block: &dyn BlockType, props: serde_json::Value, children: &str) -> String {
        let props = props.as_object().cloned().unwrap_or_default();
        let mut out = String::new();
        block.render(
            &BlockRender {
                node_id: "x",
                props: &props,
                children,
            },
            &mut out,
        );
        out
    }

    #[test]
    fn test_columns_wraps_children_and_clamps_count() {
        let html = render(&Columns, json!({"columns": 12}), "<p>a</p>");
        assert!(html.contains("cols-6"));
        assert!(html.contains("gap-md"));
        assert!(html.contains("><p>a</p></div>"));
        assert!(Columns.accepts_children());
        assert!(!Spacer.accepts_children());
    }

    #[test]
    fn test_spacer_height() {
        assert!(render(&Spacer, json!({"height": 48}), "").contains("height:48px"));
        assert!(render(&Spacer, json!({"height": "oops"}), "").contains("height:32px"));
    }
}
