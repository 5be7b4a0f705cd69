//! Multi-line text layout with per-line alignment and styling.
//!
//! A [`TextBlock`] turns a string into glyph quads using any [`Font`]
//! implementation. Lines can be aligned left, right, centered, or justified,
//! and each line can override the block's alignment, offset, color,
//! boldness, and italics. The output is a plain triangle list
//! ([`Vertex`]) that any renderer can draw. The `wgpu` feature adds one
//! in [`renderer::text`].

mod block;
pub mod font;
mod layout;
mod quad;
mod rect;
pub mod renderer;
mod style;
mod text;
mod transform;

pub use block::TextBlock;
pub use font::{Font, Glyph, Style, TextureRegion, Weight};
pub use layout::{Layout, Line};
pub use quad::{Quad, QuadBuffer, QuadMut, Vertex, VERTICES_PER_QUAD};
pub use rect::Rect;
pub use renderer::{DrawCall, RenderSink};
pub use style::{
    default_color, Align, LayoutStyle, LineOverrides, LineStyle, ParseAlignError,
    DEFAULT_CHARACTER_SIZE, DEFAULT_ITALIC_SHEAR, DEFAULT_TAB_LENGTH,
};
pub use text::{Text, TextSection, TextStyle};
pub use transform::Transform;

pub use palette::Srgba;
