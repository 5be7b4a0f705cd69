use std::sync::Arc;

use glam::{vec2, Affine2, Vec2};
use palette::Srgba;

use crate::{
    font::{Font, Style, Weight},
    layout::{Layout, Line},
    quad::Vertex,
    renderer::{DrawCall, RenderSink},
    style::{Align, LayoutStyle, LineOverrides, LineStyle, DEFAULT_ITALIC_SHEAR},
    text::{Text, TextSection, TextStyle},
    transform::Transform,
    Rect,
};

macro_rules! style_accessors {
    ($($(#[$meta:meta])* $field:ident: $ty:ty => $set:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> $ty {
                self.style.$field
            }

            pub fn $set(&mut self, $field: $ty) -> &mut Self {
                if self.style.$field != $field {
                    self.style.$field = $field;
                    self.invalidate();
                }
                self
            }
        )*
    };
}

macro_rules! line_accessors {
    ($($field:ident: $ty:ty => $get:ident, $set:ident / $set_override:ident, $remove:ident / $remove_override:ident, $remove_all:ident / $clear_overrides:ident;)*) => {
        $(
            /// The value in effect for `line`: its override if set,
            /// otherwise the block-wide value.
            pub fn $get(&self, line: usize) -> $ty {
                self.line_style(line).$field
            }

            pub fn $set(&mut self, line: usize, $field: $ty) -> &mut Self {
                self.overrides.$set_override(line, $field);
                self.invalidate();
                self
            }

            pub fn $remove(&mut self, line: usize) -> &mut Self {
                self.overrides.$remove_override(line);
                self.invalidate();
                self
            }

            pub fn $remove_all(&mut self) -> &mut Self {
                self.overrides.$clear_overrides();
                self.invalidate();
                self
            }
        )*
    };
}

/// A block of text laid out into aligned lines of glyph quads.
///
/// Setters only record the new input. The layout is recomputed in full
/// the next time derived data is read (line count, bounds, vertices, or
/// drawing), and reused until another input changes.
///
/// Changing the [`Transform`] never invalidates the layout.
pub struct TextBlock<F> {
    font: Option<Arc<F>>,
    text: Vec<char>,
    style: LayoutStyle,
    overrides: LineOverrides,
    transform: Transform,

    /// `None` when an input changed since the last layout pass.
    layout: Option<Layout>,
}

impl<F> Clone for TextBlock<F> {
    fn clone(&self) -> Self {
        Self {
            font: self.font.clone(),
            text: self.text.clone(),
            style: self.style.clone(),
            overrides: self.overrides.clone(),
            transform: self.transform,
            layout: self.layout.clone(),
        }
    }
}

impl<F> Default for TextBlock<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> TextBlock<F> {
    /// An empty block without a font.
    pub fn new() -> Self {
        Self::with_style(LayoutStyle::default())
    }

    pub fn with_style(style: LayoutStyle) -> Self {
        Self {
            font: None,
            text: Vec::new(),
            style,
            overrides: LineOverrides::default(),
            transform: Transform::default(),

            layout: None,
        }
    }

    /// Creates a block from the first section's style and the
    /// characters of every section of `text`.
    pub fn from_text(font: Option<Arc<F>>, text: &Text) -> Self {
        let leading = text.leading_style();
        let mut block = Self::new();
        block.font = font;
        block.text = text.to_unstyled_string().chars().collect();
        block.style.character_size = text.leading_size();
        block.style.color = text.leading_color();
        block.style.bold = leading.is_bold();
        block.style.italic = leading.is_italic();
        block
    }

    /// Converts back into rich text with a single section.
    ///
    /// Per-line overrides have no rich text equivalent and are dropped.
    pub fn to_text(&self) -> Text {
        let style = TextStyle {
            color: Some(self.style.color),
            size: Some(self.style.character_size),
            weight: if self.style.bold {
                Weight::Bold
            } else {
                Weight::Normal
            },
            style: if self.style.italic {
                Style::Italic
            } else {
                Style::Normal
            },
        };
        let mut text = Text::from_sections([TextSection::new(&self.string(), style)]);
        text.set_default_size(self.style.character_size);
        text.set_default_color(self.style.color);
        text
    }

    /// Restores every input to its default value, including the transform.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn invalidate(&mut self) {
        self.layout = None;
    }

    /// Whether the next read of derived data will run a layout pass.
    pub fn is_dirty(&self) -> bool {
        self.layout.is_none()
    }

    pub fn font(&self) -> Option<&Arc<F>> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Arc<F>) -> &mut Self {
        let unchanged = matches!(&self.font, Some(current) if Arc::ptr_eq(current, &font));
        if !unchanged {
            self.font = Some(font);
            self.invalidate();
        }
        self
    }

    /// Removes the font. Without a font nothing is laid out.
    pub fn clear_font(&mut self) -> &mut Self {
        self.font = None;
        self.invalidate();
        self
    }

    pub fn string(&self) -> String {
        self.text.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn set_string(&mut self, string: &str) -> &mut Self {
        if !self.text.iter().copied().eq(string.chars()) {
            self.text = string.chars().collect();
            self.invalidate();
        }
        self
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    /// Replaces every block-wide style value at once.
    pub fn set_style(&mut self, style: LayoutStyle) -> &mut Self {
        if self.style != style {
            self.style = style;
            self.invalidate();
        }
        self
    }

    style_accessors! {
        /// Character size in pixels.
        character_size: u32 => set_character_size;
        align: Align => set_align;
        color: Srgba<u8> => set_color;
        bold: bool => set_bold;
        italic: bool => set_italic;
        /// Shear of italic glyphs, in radians.
        italic_shear: f32 => set_italic_shear;
        /// Width of a tab, in multiples of the space advance.
        tab_length: u32 => set_tab_length;
        min_width: f32 => set_min_width;
        /// Multiplier on the font's line spacing.
        line_height: f32 => set_line_height;
        /// Extra space after each character, as a multiple of the space advance.
        letter_spacing: f32 => set_letter_spacing;
        round_offsets: bool => set_round_offsets;
    }

    pub fn reset_italic_shear(&mut self) -> &mut Self {
        self.set_italic_shear(DEFAULT_ITALIC_SHEAR)
    }

    /// Sets boldness and italics from a font weight and style.
    pub fn set_font_style(&mut self, weight: Weight, style: Style) -> &mut Self {
        self.set_bold(weight.is_bold())
            .set_italic(style == Style::Italic)
    }

    /// The fully resolved style of `line`.
    pub fn line_style(&self, line: usize) -> LineStyle {
        self.style.resolve(&self.overrides, line)
    }

    pub fn line_overrides(&self) -> &LineOverrides {
        &self.overrides
    }

    line_accessors! {
        align: Align => line_align, set_line_align / set_align, remove_line_align / remove_align, remove_line_aligns / clear_align;
        offset: Vec2 => line_offset, set_line_offset / set_offset, remove_line_offset / remove_offset, remove_line_offsets / clear_offset;
        color: Srgba<u8> => line_color, set_line_color / set_color, remove_line_color / remove_color, remove_line_colors / clear_color;
        bold: bool => line_bold, set_line_bold / set_bold, remove_line_bold / remove_bold, remove_line_bolds / clear_bold;
        italic: bool => line_italic, set_line_italic / set_italic, remove_line_italic / remove_italic, remove_line_italics / clear_italic;
    }

    /// Sets a horizontal-only offset for `line`.
    pub fn set_line_offset_x(&mut self, line: usize, x: f32) -> &mut Self {
        self.set_line_offset(line, vec2(x, 0.))
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl<F: Font> TextBlock<F> {
    /// Distance between the baselines of two consecutive lines,
    /// or zero without a font.
    pub fn line_separation(&self) -> f32 {
        self.font.as_deref().map_or(0., |font| {
            font.line_spacing(self.style.character_size) * self.style.line_height
        })
    }

    /// Returns the up-to-date layout, running a layout pass if any input
    /// changed since the last one.
    pub fn layout(&mut self) -> &Layout {
        self.layout_with_font().0
    }

    fn layout_with_font(&mut self) -> (&Layout, Option<&F>) {
        let Self {
            font,
            text,
            style,
            overrides,
            layout,
            ..
        } = self;
        let font = font.as_deref();
        let layout = layout.get_or_insert_with(move || {
            Layout::compute(font, text.as_slice(), style, overrides)
        });
        (layout, font)
    }

    pub fn line_count(&mut self) -> usize {
        self.layout().lines().len()
    }

    pub fn lines(&mut self) -> &[Line] {
        self.layout().lines()
    }

    pub fn vertices(&mut self) -> &[Vertex] {
        self.layout().vertices()
    }

    /// Bounding box of the glyphs in local coordinates.
    pub fn local_bounds(&mut self) -> Rect {
        self.layout().bounds()
    }

    /// Bounding box of the glyphs after applying the block's transform.
    pub fn global_bounds(&mut self) -> Rect {
        let transform = self.transform.to_affine();
        self.local_bounds().bbox_transformed(transform)
    }

    /// Draws the block, with its own transform applied after `parent`.
    pub fn draw<S>(&mut self, sink: &mut S, parent: Affine2)
    where
        S: RenderSink<F::Texture>,
    {
        let transform = parent * self.transform.to_affine();
        let size = self.style.character_size;
        let (layout, font) = self.layout_with_font();
        sink.draw(DrawCall {
            vertices: layout.vertices(),
            transform,
            texture: font.map(|font| font.texture(size)),
        });
    }
}
