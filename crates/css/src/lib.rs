//! Inline CSS handling: declaration parsing into an ordered style map, and the value
//! grammars AMP layout attributes are derived from.
pub mod syntax;
pub mod values;

// Re-exports so other crates can just use `css::...` nicely.
pub use syntax::{Declaration, StyleMap, parse_declarations, parse_style_string};
pub use values::{AspectRatio, CssLength, LengthUnit, parse_aspect_ratio};
