//! Rich text input.
//!
//! A [`TextBlock`](crate::TextBlock) styles whole lines rather than spans of
//! characters, so only the first section's style is honored when converting
//! from a [`Text`]. The remaining sections contribute their characters.

use palette::Srgba;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

use crate::{
    font::{Style, Weight},
    style::{default_color, DEFAULT_CHARACTER_SIZE},
};

/// Some rich text. Implemented as a list of [`TextSection`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    sections: SmallVec<[TextSection; 1]>,
    default_size: u32,
    default_color: Srgba<u8>,
}

impl Text {
    pub fn from_sections(sections: impl IntoIterator<Item = TextSection>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
            default_size: DEFAULT_CHARACTER_SIZE,
            default_color: default_color(),
        }
    }

    pub fn extend(&mut self, other: Text) {
        self.sections.extend(other.sections);
    }

    pub fn sections(&self) -> &[TextSection] {
        &self.sections
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn set_default_size(&mut self, size: u32) {
        self.default_size = size;
    }

    pub fn default_color(&self) -> Srgba<u8> {
        self.default_color
    }

    pub fn set_default_color(&mut self, color: Srgba<u8>) {
        self.default_color = color;
    }

    pub fn to_unstyled_string(&self) -> SmartString<LazyCompact> {
        let mut s = SmartString::new();
        for section in &self.sections {
            s.push_str(&section.text);
        }
        s
    }

    /// Style of the first section, or the default style for empty text.
    pub fn leading_style(&self) -> TextStyle {
        self.sections
            .first()
            .map(|section| section.style.clone())
            .unwrap_or_default()
    }

    /// Character size of the first section, falling back to the default size.
    pub fn leading_size(&self) -> u32 {
        self.leading_style().size.unwrap_or(self.default_size)
    }

    /// Color of the first section, falling back to the default color.
    pub fn leading_color(&self) -> Srgba<u8> {
        self.leading_style().color.unwrap_or(self.default_color)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::from(s.as_str())
    }
}

impl<'a> From<&'a str> for Text {
    fn from(s: &'a str) -> Self {
        Text::from_sections([TextSection {
            text: s.into(),
            style: Default::default(),
        }])
    }
}

impl AsRef<Text> for Text {
    fn as_ref(&self) -> &Text {
        self
    }
}

/// A block of text with the same style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSection {
    pub text: SmartString<LazyCompact>,
    pub style: TextStyle,
}

impl Eq for TextSection {}

impl TextSection {
    pub fn new(text: &str, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Style of a text section.
///
/// Optional fields use the containing [`Text`]'s defaults if set to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    /// Text color.
    pub color: Option<Srgba<u8>>,
    /// Character size in pixels.
    pub size: Option<u32>,
    pub weight: Weight,
    pub style: Style,
}

impl Eq for TextStyle {}

impl TextStyle {
    pub fn is_bold(&self) -> bool {
        self.weight.is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.style == Style::Italic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_style_and_defaults() {
        let mut text = Text::from_sections([
            TextSection::new(
                "Goodbye ",
                TextStyle {
                    size: Some(18),
                    weight: Weight::Bold,
                    ..Default::default()
                },
            ),
            TextSection::new("World", TextStyle::default()),
        ]);
        text.set_default_color(Srgba::new(1, 2, 3, 255));

        assert_eq!(text.to_unstyled_string().as_str(), "Goodbye World");
        assert_eq!(text.leading_size(), 18);
        assert_eq!(text.leading_color(), Srgba::new(1, 2, 3, 255));
        assert!(text.leading_style().is_bold());
        assert!(!text.leading_style().is_italic());
    }

    #[test]
    fn empty_text_uses_defaults() {
        let text = Text::from_sections(std::iter::empty());
        assert_eq!(text.leading_style(), TextStyle::default());
        assert_eq!(text.leading_size(), DEFAULT_CHARACTER_SIZE);
        assert_eq!(text.leading_color(), default_color());
    }
}
