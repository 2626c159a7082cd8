//! Inline dimension styles to AMP layout attributes.
//!
//! A Bento component sized through its `style` attribute becomes an AMP component sized
//! through `width`/`height`/`layout`. Sizes coming from stylesheets are not considered.

use css::{CssLength, StyleMap, parse_aspect_ratio, parse_style_string};
use html::Node;

pub const STYLE_ATTRIBUTE: &str = "style";
pub const WIDTH_ATTRIBUTE: &str = "width";
pub const HEIGHT_ATTRIBUTE: &str = "height";
pub const LAYOUT_ATTRIBUTE: &str = "layout";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    FixedHeight,
    Responsive,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::FixedHeight => "fixed-height",
            Layout::Responsive => "responsive",
        }
    }
}

/// Layout attributes in the order they were first computed; later writes update in place.
#[derive(Debug, Default)]
struct LayoutAttributes(Vec<(&'static str, String)>);

impl LayoutAttributes {
    fn set(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }
}

/// Move `height`, `width` and `aspect-ratio` from the inline style into layout attributes.
///
/// Returns whether any layout attribute was set. Elements without a (non-empty) `style`
/// attribute are left untouched. A dimension that is not a valid length stays in the style.
pub fn adapt_layout_styles(element: &mut Node) -> bool {
    let Some(mut styles) = element
        .attr(STYLE_ATTRIBUTE)
        .filter(|style| !style.is_empty())
        .map(parse_style_string)
    else {
        return false;
    };

    let layout = compute_layout_attributes(&mut styles);
    if layout.0.is_empty() {
        return false;
    }

    element.set_attr(STYLE_ATTRIBUTE, styles.to_style_string());
    for (name, value) in layout.0 {
        element.set_attr(name, value);
    }
    true
}

fn compute_layout_attributes(styles: &mut StyleMap) -> LayoutAttributes {
    let mut layout = LayoutAttributes::default();

    if let Some(height) = styles.get("height").and_then(CssLength::parse) {
        layout.set(HEIGHT_ATTRIBUTE, height.to_attribute_value());
        styles.remove("height");
    }

    match styles.get("width") {
        None | Some("100%") => {
            layout.set(WIDTH_ATTRIBUTE, "auto");
            layout.set(LAYOUT_ATTRIBUTE, Layout::FixedHeight.as_str());
            styles.remove("width");
        }
        Some(width) => {
            if let Some(width) = CssLength::parse(width) {
                layout.set(WIDTH_ATTRIBUTE, width.to_attribute_value());
                styles.remove("width");
            }
        }
    }

    // Aspect ratio is applied last and wins over width/height derived above.
    if let Some(ratio) = styles.get("aspect-ratio").and_then(parse_aspect_ratio) {
        layout.set(HEIGHT_ATTRIBUTE, ratio.height_or_default());
        layout.set(WIDTH_ATTRIBUTE, ratio.width);
        layout.set(LAYOUT_ATTRIBUTE, Layout::Responsive.as_str());
        styles.remove("aspect-ratio");
    }

    layout
}
