//! The font collaborator.
//!
//! `linesetter` neither loads nor rasterizes fonts. Glyph metrics, kerning
//! and atlas placement are queried through the [`Font`] trait, which the host
//! application implements on top of whatever font backend it already uses.

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// A font weight, indicating how dark it appears.
///
/// Layout only distinguishes bold from regular glyphs;
/// see [`Weight::is_bold`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl Default for Weight {
    fn default() -> Self {
        Self::Normal
    }
}

impl Weight {
    /// Whether glyphs of this weight are requested from the font as bold.
    pub fn is_bold(self) -> bool {
        self >= Weight::Bold
    }
}

/// Font style: normal or italic.
///
/// Italics are synthesized by shearing glyph quads, so we do not
/// distinguish oblique fonts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Normal,
    Italic,
}

impl Default for Style {
    fn default() -> Self {
        Self::Normal
    }
}

/// Placement of a glyph bitmap inside the font's texture atlas, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextureRegion {
    pub pos: UVec2,
    pub size: UVec2,
}

impl TextureRegion {
    pub fn new(pos: UVec2, size: UVec2) -> Self {
        Self { pos, size }
    }
}

/// Metrics of one glyph at a given character size and boldness.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Glyph {
    /// X distance to advance the pen after drawing
    pub advance: f32,
    /// Extent of the glyph relative to the pen position on the baseline.
    /// `bounds.pos.y` is negative for glyphs that rise above the baseline.
    pub bounds: Rect,
    /// Where the glyph bitmap lives in the texture returned by [`Font::texture`].
    pub texture_region: TextureRegion,
}

/// Source of glyph metrics for layout.
///
/// Implementations are treated as read-only for the duration of a layout pass.
pub trait Font {
    /// Handle to the atlas texture that glyph texture regions refer to.
    /// Only the rendering sink looks at it.
    type Texture;

    fn glyph(&self, c: char, size: u32, bold: bool) -> Glyph;

    /// Horizontal adjustment to apply between `first` and `second`.
    fn kerning(&self, first: char, second: char, size: u32, bold: bool) -> f32;

    /// Distance between two consecutive baselines.
    fn line_spacing(&self, size: u32) -> f32;

    fn texture(&self, size: u32) -> &Self::Texture;
}
