//! Global layout style, sparse per-line overrides, and the resolver
//! that merges the two.

use std::{fmt, str::FromStr};

use ahash::AHashMap;
use glam::Vec2;
use palette::Srgba;
use serde::{Deserialize, Serialize};

/// Character size used when none is configured.
pub const DEFAULT_CHARACTER_SIZE: u32 = 30;
/// Width of a tab, in multiples of the space advance.
pub const DEFAULT_TAB_LENGTH: u32 = 4;
/// 12 degrees, in radians.
pub const DEFAULT_ITALIC_SHEAR: f32 = 0.20944;

pub fn default_color() -> Srgba<u8> {
    Srgba::new(u8::MAX, u8::MAX, u8::MAX, u8::MAX)
}

/// Horizontal alignment of a line relative to the widest line
/// (or the configured minimum width).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    Left,
    Center,
    Right,
    /// Stretch the gaps between words so the line fills the target width.
    JustifyWhitespace,
    /// Spread the free space evenly between every glyph.
    JustifyCharacters,
}

impl Default for Align {
    fn default() -> Self {
        Align::Left
    }
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::JustifyWhitespace => "justify-whitespace",
            Align::JustifyCharacters => "justify-characters",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown text alignment '{0}'")]
pub struct ParseAlignError(String);

impl FromStr for Align {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            "justify-whitespace" => Ok(Align::JustifyWhitespace),
            "justify-characters" => Ok(Align::JustifyCharacters),
            _ => Err(ParseAlignError(s.to_owned())),
        }
    }
}

/// Style applied to every line that has no override for a given property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    /// Character size in pixels. Also the baseline of the first line.
    pub character_size: u32,
    pub align: Align,
    pub color: Srgba<u8>,
    pub bold: bool,
    pub italic: bool,
    /// Shear applied to italic glyphs, in radians.
    pub italic_shear: f32,
    /// Width of a tab, in multiples of the space advance.
    pub tab_length: u32,
    /// Lines are aligned against at least this width.
    pub min_width: f32,
    /// Multiplier on the font's line spacing.
    pub line_height: f32,
    /// Extra space after every character, as a multiple of the space advance.
    pub letter_spacing: f32,
    /// Round right and center alignment offsets to whole pixels.
    pub round_offsets: bool,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            character_size: DEFAULT_CHARACTER_SIZE,
            align: Align::default(),
            color: default_color(),
            bold: false,
            italic: false,
            italic_shear: DEFAULT_ITALIC_SHEAR,
            tab_length: DEFAULT_TAB_LENGTH,
            min_width: 0.,
            line_height: 1.,
            letter_spacing: 0.,
            round_offsets: false,
        }
    }
}

impl LayoutStyle {
    /// Resolves the style of line `line` by checking each
    /// override table before falling back to this style.
    pub fn resolve(&self, overrides: &LineOverrides, line: usize) -> LineStyle {
        LineStyle {
            align: overrides.align(line).unwrap_or(self.align),
            offset: overrides.offset(line).unwrap_or(Vec2::ZERO),
            color: overrides.color(line).unwrap_or(self.color),
            bold: overrides.bold(line).unwrap_or(self.bold),
            italic: overrides.italic(line).unwrap_or(self.italic),
        }
    }
}

/// The fully resolved style of a single line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub align: Align,
    /// Absolute offset configured for the line. Applied on top of alignment.
    pub offset: Vec2,
    pub color: Srgba<u8>,
    pub bold: bool,
    pub italic: bool,
}

macro_rules! override_fns {
    ($($field:ident: $ty:ty => $set:ident, $remove:ident, $clear:ident;)*) => {
        $(
            pub fn $field(&self, line: usize) -> Option<$ty> {
                self.$field.get(&line).copied()
            }

            pub fn $set(&mut self, line: usize, $field: $ty) {
                self.$field.insert(line, $field);
            }

            pub fn $remove(&mut self, line: usize) {
                self.$field.remove(&line);
            }

            pub fn $clear(&mut self) {
                self.$field.clear();
            }
        )*
    };
}

/// Sparse per-line style overrides, keyed by zero-based line index.
///
/// Lines without an entry use the [`LayoutStyle`] value. Entries for lines
/// that do not exist in the laid out text have no effect.
#[derive(Debug, Clone, Default)]
pub struct LineOverrides {
    align: AHashMap<usize, Align>,
    offset: AHashMap<usize, Vec2>,
    color: AHashMap<usize, Srgba<u8>>,
    bold: AHashMap<usize, bool>,
    italic: AHashMap<usize, bool>,
}

impl LineOverrides {
    override_fns! {
        align: Align => set_align, remove_align, clear_align;
        offset: Vec2 => set_offset, remove_offset, clear_offset;
        color: Srgba<u8> => set_color, remove_color, clear_color;
        bold: bool => set_bold, remove_bold, clear_bold;
        italic: bool => set_italic, remove_italic, clear_italic;
    }

    pub fn clear(&mut self) {
        self.clear_align();
        self.clear_offset();
        self.clear_color();
        self.clear_bold();
        self.clear_italic();
    }
}
