use serde_json::json;

use super::{attr, css_color, open_tag, props_of, safe_url, text};
use crate::model::Props;
use crate::registry::fields::{discriminant, prop_str};
use crate::registry::{BlockRender, BlockType, Category, FieldSpec};

const VARIANTS: &[(&str, &str)] = &[
    ("Centered", "centered"),
    ("Split with image", "split"),
    ("Background image", "background"),
];

const DEFAULT_VARIANT: &str = "centered";

/// Full-width banner whose layout variant decides which extra fields apply
///
/// - `centered`: secondary action
/// - `split`: image fields plus secondary action
/// - `background`: background image plus color overrides
pub struct Hero;

fn variant_field() -> FieldSpec {
    FieldSpec::select("variant", "Layout", VARIANTS)
}

fn variant(props: &Props) -> &str {
    discriminant(props, &variant_field(), DEFAULT_VARIANT)
}

fn secondary_action_fields() -> [FieldSpec; 2] {
    [
        FieldSpec::text("secondary_cta_label", "Secondary button label"),
        FieldSpec::text("secondary_cta_url", "Secondary button link").placeholder("/contact"),
    ]
}

impl BlockType for Hero {
    fn name(&self) -> &'static str {
        "Hero"
    }

    fn category(&self) -> Category {
        Category::Layout
    }

    fn default_props(&self) -> Props {
        props_of(&[
            ("title", json!("Heading")),
            ("subtitle", json!("")),
            ("variant", json!(DEFAULT_VARIANT)),
            ("cta_label", json!("")),
            ("cta_url", json!("")),
        ])
    }

    fn fields(&self, props: &Props) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::text("title", "Title"),
            FieldSpec::textarea("subtitle", "Subtitle"),
            variant_field(),
            FieldSpec::text("cta_label", "Button label"),
            FieldSpec::text("cta_url", "Button link").placeholder("/get-started"),
        ];

        match variant(props) {
            "split" => {
                fields.push(FieldSpec::text("image_url", "Image URL").placeholder("https://"));
                fields.push(FieldSpec::text("image_alt", "Image description"));
                fields.push(FieldSpec::select(
                    "image_side",
                    "Image side",
                    &[("Right", "right"), ("Left", "left")],
                ));
                fields.extend(secondary_action_fields());
            }
            "background" => {
                fields.push(FieldSpec::text("image_url", "Background image URL").placeholder("https://"));
                fields.push(FieldSpec::color("overlay_color", "Overlay color"));
                fields.push(FieldSpec::color("text_color", "Text color"));
            }
            _ => fields.extend(secondary_action_fields()),
        }

        fields
    }

    fn render(&self, input: &BlockRender<'_>, out: &mut String) {
        let props = input.props;
        let variant = variant(props);

        open_tag(out, "section", &format!("block-hero hero--{}", variant), input.node_id);
        if variant == "background" {
            let mut style = String::new();
            if let Some(url) = prop_str(props, "image_url").and_then(safe_url) {
                style.push_str(&format!("background-image:url('{}');", url.replace('\'', "%27")));
            }
            if let Some(color) = prop_str(props, "text_color").and_then(css_color) {
                style.push_str(&format!("color:{};", color));
            }
            if !style.is_empty() {
                out.push_str(&format!(" style=\"{}\"", attr(&style)));
            }
        }
        out.push('>');

        if variant == "background" {
            if let Some(color) = prop_str(props, "overlay_color").and_then(css_color) {
                out.push_str(&format!(
                    "<div class=\"hero__overlay\" style=\"background-color:{}\"></div>",
                    attr(color)
                ));
            }
        }

        let image_first = variant == "split" && prop_str(props, "image_side") == Some("left");
        if image_first {
            render_split_image(props, out);
        }

        out.push_str("<div class=\"hero__body\">");
        if let Some(title) = prop_str(props, "title") {
            out.push_str(&format!("<h1>{}</h1>", text(title)));
        }
        if let Some(subtitle) = prop_str(props, "subtitle") {
            out.push_str(&format!("<p class=\"hero__subtitle\">{}</p>", text(subtitle)));
        }

        let primary = action(props, "cta_label", "cta_url", "btn btn--primary");
        let secondary = if variant == "background" {
            None
        } else {
            action(props, "secondary_cta_label", "secondary_cta_url", "btn btn--secondary")
        };
        if primary.is_some() || secondary.is_some() {
            out.push_str("<div class=\"hero__actions\">");
            out.extend(primary);
            out.extend(secondary);
            out.push_str("</div>");
        }
        out.push_str("</div>");

        if variant == "split" && !image_first {
            render_split_image(props, out);
        }
        out.push_str("</section>");
    }
}

fn render_split_image(props: &Props, out: &mut String) {
    if let Some(url) = prop_str(props, "image_url").and_then(safe_url) {
        out.push_str(&format!(
            "<img class=\"hero__image\" src=\"{}\" alt=\"{}\">",
            attr(url),
            attr(prop_str(props, "image_alt").unwrap_or(""))
        ));
    }
}

fn action(props: &Props, label_key: &str, url_key: &str, class: &str) -> Option<String> {
    let label = prop_str(props, label_key)?;
    let url = prop_str(props, url_key).and_then(safe_url).unwrap_or("#");
    Some(format!(
        "<a class=\"{}\" href=\"{}\">{}</a>",
        class,
        attr(url),
        text(label)
    ))
}
