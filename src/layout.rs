//! Layout implementation.
//!
//! A layout pass runs four stages in order:
//! 1. segmentation splits the text into lines and places a quad for every
//!    visible glyph at its unaligned pen position ([`segment`]);
//! 2. justification measures lines against the target width and computes
//!    per-line and per-glyph horizontal corrections ([`justify`]);
//! 3. emission moves every quad by its line's offset and paints it with the
//!    line's color;
//! 4. the bounding box of the result is computed.

use std::ops::Range;

use glam::{vec2, Vec2};
use palette::Srgba;

use crate::{
    font::Font,
    quad::{QuadBuffer, Vertex, VERTICES_PER_QUAD},
    style::{Align, LayoutStyle, LineOverrides, LineStyle},
    Rect,
};

use self::{
    justify::{justify, Justification},
    segment::Segmenter,
};

mod justify;
mod segment;

/// Spaces, tabs, and newlines advance the pen but produce no quad.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// A line of laid out text.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line {
    start: usize,
    len: usize,
    first_vertex: usize,
    quad_count: usize,
    width: f32,
    style: LineStyle,
    offset: Vec2,
}

impl Line {
    /// Index of the first character of the line.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of characters in the line, excluding the newline that ends it.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn char_range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn first_vertex(&self) -> usize {
        self.first_vertex
    }

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// The line's quads, as indices into the layout's [`QuadBuffer`].
    pub fn quad_range(&self) -> Range<usize> {
        let first = self.first_vertex / VERTICES_PER_QUAD;
        first..first + self.quad_count
    }

    pub fn vertex_range(&self) -> Range<usize> {
        self.first_vertex..self.first_vertex + self.quad_count * VERTICES_PER_QUAD
    }

    /// Width of the line as measured by the pen, before alignment.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn align(&self) -> Align {
        self.style.align
    }

    /// Offset applied to every glyph of the line: the configured
    /// absolute offset plus any right or center alignment shift.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn color(&self) -> Srgba<u8> {
        self.style.color
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }
}

/// The result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    lines: Vec<Line>,
    quads: QuadBuffer,
    bounds: Rect,
    target_width: f32,
    longest_line: Option<usize>,
}

impl Layout {
    pub(crate) fn empty(character_size: u32) -> Self {
        Self {
            lines: Vec::new(),
            quads: QuadBuffer::new(),
            bounds: empty_bounds(character_size),
            target_width: 0.,
            longest_line: None,
        }
    }

    pub(crate) fn compute<F: Font>(
        font: Option<&F>,
        text: &[char],
        style: &LayoutStyle,
        overrides: &LineOverrides,
    ) -> Self {
        let font = match font {
            Some(font) => font,
            None => {
                log::debug!("No font set; layout produces no geometry");
                return Self::empty(style.character_size);
            }
        };
        if text.is_empty() {
            return Self::empty(style.character_size);
        }

        let (mut lines, mut quads) = Segmenter::new(font, style, overrides).run(text);
        let Justification {
            target_width,
            longest_line,
            ..
        } = {
            let justification = justify(&lines, text, style);
            emit(&mut lines, &mut quads, &justification);
            justification
        };

        let bounds = Rect::enclosing(quads.vertices().iter().map(|v| v.pos))
            .unwrap_or_else(|| empty_bounds(style.character_size));

        log::trace!(
            "Laid out {} characters into {} lines and {} quads",
            text.len(),
            lines.len(),
            quads.quad_count()
        );

        Self {
            lines,
            quads,
            bounds,
            target_width,
            longest_line,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn quads(&self) -> &QuadBuffer {
        &self.quads
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.quads.vertices()
    }

    /// Tight bounding box of every emitted vertex.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Width lines were aligned against: the widest line or the minimum width.
    pub fn target_width(&self) -> f32 {
        self.target_width
    }

    /// The line that determined [`target_width`](Self::target_width), or
    /// `None` if no line was wider than the minimum width.
    pub fn longest_line(&self) -> Option<usize> {
        self.longest_line
    }
}

/// With nothing to draw, bounds still cover the first line's ascent.
fn empty_bounds(character_size: u32) -> Rect {
    Rect::new(Vec2::ZERO, vec2(0., character_size as f32))
}

/// Applies line offsets, glyph corrections, and line colors to the quads.
fn emit(lines: &mut [Line], quads: &mut QuadBuffer, justification: &Justification) {
    for (line, &line_offset) in lines.iter_mut().zip(&justification.line_offsets) {
        line.offset = line.style.offset + vec2(line_offset, 0.);

        let glyph_offsets = &justification.glyph_offsets[line.quad_range()];
        for (mut quad, &glyph_offset) in quads.quads_mut(line.quad_range()).zip(glyph_offsets) {
            quad.translate(line.offset + vec2(glyph_offset, 0.));
            quad.set_color(line.style.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use crate::font::testing::MonoFont;

    use super::*;

    fn lay_out(font: &MonoFont, text: &str, style: &LayoutStyle, overrides: &LineOverrides) -> Layout {
        let text: Vec<char> = text.chars().collect();
        Layout::compute(Some(font), &text, style, overrides)
    }

    fn simple(text: &str, style: &LayoutStyle) -> Layout {
        lay_out(&MonoFont::new(10.), text, style, &LineOverrides::default())
    }

    /// X position of the top-left corner of each quad.
    fn quad_xs(layout: &Layout) -> Vec<f32> {
        layout
            .vertices()
            .chunks_exact(VERTICES_PER_QUAD)
            .map(|quad| quad[0].pos.x)
            .collect()
    }

    #[test]
    fn single_line_left_aligned() {
        let font = MonoFont::new(10.).advance(' ', 8.);
        let layout = lay_out(&font, "ab cd", &LayoutStyle::default(), &LineOverrides::default());

        assert_eq!(layout.lines().len(), 1);
        let line = layout.lines()[0];
        assert_eq!(line.width(), 48.);
        assert_eq!(line.quad_count(), 4);
        assert_eq!(line.char_range(), 0..5);
        assert_eq!(line.offset(), Vec2::ZERO);
        assert_eq!(layout.vertices().len(), 24);
        assert_eq!(quad_xs(&layout), vec![0., 10., 28., 38.]);
    }

    #[test]
    fn right_alignment_against_longest_line() {
        let style = LayoutStyle {
            align: Align::Right,
            ..Default::default()
        };
        let layout = simple("hi\nworld", &style);

        let lines = layout.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width(), 20.);
        assert_eq!(lines[1].width(), 50.);
        assert_eq!(lines[0].offset(), vec2(30., 0.));
        assert_eq!(lines[1].offset(), vec2(0., 0.));
        assert_eq!(layout.longest_line(), Some(1));
        assert_eq!(quad_xs(&layout), vec![30., 40., 0., 10., 20., 30., 40.]);
    }

    #[test]
    fn min_width_wider_than_every_line() {
        let style = LayoutStyle {
            align: Align::Center,
            min_width: 100.,
            ..Default::default()
        };
        let layout = simple("hi\nworld", &style);

        assert_eq!(layout.target_width(), 100.);
        assert_eq!(layout.longest_line(), None);
        assert_eq!(layout.lines()[0].offset(), vec2(40., 0.));
        assert_eq!(layout.lines()[1].offset(), vec2(25., 0.));
    }

    #[test]
    fn rounding_alignment_offsets() {
        let mut style = LayoutStyle {
            align: Align::Center,
            ..Default::default()
        };
        let font = MonoFont::new(10.).advance('w', 15.);
        let overrides = LineOverrides::default();

        let layout = lay_out(&font, "a\nw", &style, &overrides);
        assert_eq!(layout.lines()[0].offset().x, 2.5);

        style.round_offsets = true;
        let layout = lay_out(&font, "a\nw", &style, &overrides);
        assert_eq!(layout.lines()[0].offset().x, 3.);
    }

    #[test]
    fn absolute_offset_applies_to_every_line() {
        let style = LayoutStyle {
            align: Align::Right,
            ..Default::default()
        };
        let mut overrides = LineOverrides::default();
        overrides.set_offset(0, vec2(5., 7.));
        overrides.set_offset(1, vec2(-1., 2.));
        let layout = lay_out(&MonoFont::new(10.), "hi\nworld", &style, &overrides);

        assert_eq!(layout.lines()[0].offset(), vec2(35., 7.));
        assert_eq!(layout.lines()[1].offset(), vec2(-1., 2.));
        assert_eq!(layout.vertices()[0].pos, vec2(35., 7.));
    }

    #[test]
    fn justify_whitespace_fills_target_width() {
        let font = MonoFont::new(10.).advance(' ', 8.);
        let mut overrides = LineOverrides::default();
        overrides.set_align(0, Align::JustifyWhitespace);
        let layout = lay_out(&font, "a b c\nabcdefgh", &LayoutStyle::default(), &overrides);

        // 46 wide against 80: two blocks share 34
        assert_eq!(layout.lines()[0].width(), 46.);
        assert_eq!(layout.lines()[0].offset(), Vec2::ZERO);
        let xs = quad_xs(&layout);
        assert_eq!(&xs[..3], &[0., 35., 70.]);
        assert_eq!(xs[2] + 10., layout.target_width());
    }

    #[test]
    fn justify_whitespace_without_blocks() {
        let style = LayoutStyle {
            align: Align::JustifyWhitespace,
            ..Default::default()
        };
        let layout = simple("abc\nabcdefgh", &style);
        assert_eq!(&quad_xs(&layout)[..3], &[0., 10., 20.]);
    }

    #[test]
    fn justify_characters() {
        let style = LayoutStyle {
            align: Align::JustifyCharacters,
            ..Default::default()
        };
        let layout = simple("abc\nabcdefgh\nx\nxy", &style);

        // 30 wide against 80: 50 over two gaps
        let xs = quad_xs(&layout);
        assert_eq!(&xs[..3], &[0., 35., 70.]);
        // the longest line is untouched
        assert_eq!(&xs[3..11], &[0., 10., 20., 30., 40., 50., 60., 70.]);
        // one and two glyph lines are untouched
        assert_eq!(&xs[11..], &[0., 0., 10.]);
    }

    #[test]
    fn justify_characters_across_whitespace() {
        let style = LayoutStyle {
            align: Align::JustifyCharacters,
            ..Default::default()
        };
        let layout = simple("a b\nabcdefgh\na  ", &style);

        // "a b" is 30 wide against 80: its two glyphs are 50 further apart
        assert_eq!(layout.lines()[0].len(), 3);
        assert_eq!(layout.lines()[0].quad_count(), 2);
        let xs = quad_xs(&layout);
        assert_eq!(&xs[..2], &[0., 70.]);
        // a lone glyph stays put
        assert_eq!(xs[10], 0.);
        assert!(xs.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn kerning_tabs_and_letter_spacing() {
        let font = MonoFont::new(10.)
            .advance(' ', 8.)
            .kerning_pair('A', 'V', -2.);
        let style = LayoutStyle {
            letter_spacing: 0.5,
            ..Default::default()
        };
        let layout = lay_out(&font, "AV\tb", &style, &LineOverrides::default());

        // letter spacing is half a space: 4
        // A at 0, V at 10 + 4 - 2, tab is 4 spaces + 4, b after it
        assert_eq!(quad_xs(&layout), vec![0., 12., 12. + 14. + 36.]);
        assert_eq!(layout.lines()[0].width(), 62. + 14.);
    }

    #[test]
    fn line_height_multiplier() {
        let font = MonoFont::new(10.).line_spacing_px(36.);
        let style = LayoutStyle {
            line_height: 2.,
            ..Default::default()
        };
        let layout = lay_out(&font, "a\nb", &style, &LineOverrides::default());

        // glyphs extend 30px above the baseline at size 30
        assert_eq!(layout.vertices()[0].pos.y, 0.);
        assert_eq!(layout.vertices()[6].pos.y, 72.);
    }

    #[test]
    fn italic_shear_on_one_line() {
        let font = MonoFont::new(10.).bounds(Rect::new(Vec2::ZERO, vec2(10., 20.)));
        let style = LayoutStyle {
            italic_shear: 0.25,
            ..Default::default()
        };
        let mut overrides = LineOverrides::default();
        overrides.set_italic(1, true);
        let layout = lay_out(&font, "a\na", &style, &overrides);

        let upright = &layout.vertices()[..6];
        let italic = &layout.vertices()[6..];
        assert_eq!(upright[1].pos.x - upright[0].pos.x, 0.);
        assert_eq!(italic[1].pos.x - italic[0].pos.x, -20. * 0.25);
        assert_eq!(italic[3].pos.x - italic[2].pos.x, -20. * 0.25);
        for (a, b) in upright.iter().zip(italic) {
            assert_eq!(a.tex_coords, b.tex_coords);
        }
    }

    #[test]
    fn bold_lines_use_bold_metrics() {
        let mut overrides = LineOverrides::default();
        overrides.set_bold(0, true);
        overrides.set_bold(2, true);
        let layout = lay_out(
            &MonoFont::new(10.),
            "a b\na b\na\tb",
            &LayoutStyle::default(),
            &overrides,
        );
        // bold glyphs and spaces are 12 wide, regular ones 10
        assert_eq!(layout.lines()[0].width(), 36.);
        assert_eq!(layout.lines()[1].width(), 30.);
        // a tab is four bold spaces
        assert_eq!(layout.lines()[2].width(), 12. + 48. + 12.);
    }

    #[test]
    fn line_colors() {
        let red = Srgba::new(255, 0, 0, 255);
        let mut overrides = LineOverrides::default();
        overrides.set_color(1, red);
        overrides.set_color(7, Srgba::new(0, 0, 255, 255));
        let layout = lay_out(
            &MonoFont::new(10.),
            "ab\ncd",
            &LayoutStyle::default(),
            &overrides,
        );

        let (first, second) = layout.vertices().split_at(12);
        assert!(first.iter().all(|v| v.color() == LayoutStyle::default().color));
        assert!(second.iter().all(|v| v.color() == red));
    }

    #[test]
    fn trailing_newline_does_not_open_a_line() {
        let layout = simple("ab\n", &LayoutStyle::default());
        assert_eq!(layout.lines().len(), 1);
        assert_eq!(layout.lines()[0].char_range(), 0..2);

        let layout = simple("ab\n\ncd", &LayoutStyle::default());
        assert_eq!(layout.lines().len(), 3);
        assert!(layout.lines()[1].is_empty());
        assert_eq!(layout.lines()[1].width(), 0.);
        assert_eq!(layout.lines()[2].char_range(), 4..6);
    }

    #[test]
    fn whitespace_only_line_has_width() {
        let style = LayoutStyle {
            align: Align::Right,
            ..Default::default()
        };
        let layout = simple("a\n      ", &style);

        let blank = layout.lines()[1];
        assert_eq!(blank.quad_count(), 0);
        assert_eq!(blank.width(), 60.);
        assert_eq!(layout.longest_line(), Some(1));
        assert_eq!(layout.lines()[0].offset().x, 50.);
    }

    #[test]
    fn trailing_whitespace_closes_the_last_line() {
        let layout = simple("ab  ", &LayoutStyle::default());
        assert_eq!(layout.lines().len(), 1);
        assert_eq!(layout.lines()[0].width(), 40.);
    }

    #[test]
    fn bounds() {
        let layout = simple("ab\nc", &LayoutStyle::default());
        assert_eq!(layout.bounds(), Rect::new(Vec2::ZERO, vec2(20., 66.)));

        let layout = simple("", &LayoutStyle::default());
        assert_eq!(layout.bounds(), Rect::new(Vec2::ZERO, vec2(0., 30.)));

        let layout = simple("   ", &LayoutStyle::default());
        assert_eq!(layout.lines().len(), 1);
        assert_eq!(layout.bounds(), Rect::new(Vec2::ZERO, vec2(0., 30.)));
    }

    #[test]
    fn no_font_means_no_geometry() {
        let text: Vec<char> = "hello".chars().collect();
        let layout = Layout::compute::<MonoFont>(
            None,
            &text,
            &LayoutStyle::default(),
            &LineOverrides::default(),
        );
        assert!(layout.lines().is_empty());
        assert!(layout.vertices().is_empty());
    }

    #[test]
    fn random_documents_keep_buffer_invariants() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let alphabet = ['a', 'b', 'W', ' ', '\t', '\n', 'x'];
        let aligns = [
            Align::Left,
            Align::Center,
            Align::Right,
            Align::JustifyWhitespace,
            Align::JustifyCharacters,
        ];

        for _ in 0..200 {
            let len = rng.usize(0..40);
            let text: Vec<char> = (0..len)
                .map(|_| alphabet[rng.usize(..alphabet.len())])
                .collect();
            let style = LayoutStyle {
                align: aligns[rng.usize(..aligns.len())],
                min_width: rng.f32() * 200.,
                ..Default::default()
            };
            let layout = Layout::compute(
                Some(&MonoFont::new(10.)),
                &text,
                &style,
                &LineOverrides::default(),
            );

            let visible = text.iter().filter(|&&c| !is_whitespace(c)).count();
            assert_eq!(layout.vertices().len() % VERTICES_PER_QUAD, 0);
            assert_eq!(layout.vertices().len(), visible * VERTICES_PER_QUAD);

            let newlines = text.iter().filter(|&&c| c == '\n').count();
            let expected_lines = match text.last() {
                None => 0,
                Some('\n') => newlines,
                Some(_) => newlines + 1,
            };
            assert_eq!(layout.lines().len(), expected_lines);

            let mut next_vertex = 0;
            let mut next_char = 0;
            for line in layout.lines() {
                assert_eq!(line.first_vertex(), next_vertex);
                assert_eq!(line.start(), next_char);
                next_vertex = line.vertex_range().end;
                next_char = line.char_range().end + 1;
            }
            assert_eq!(next_vertex, layout.vertices().len());

            if let Some(longest) = layout.longest_line() {
                let width = layout.lines()[longest].width();
                assert_eq!(width, layout.target_width());
                assert!(layout.lines()[..longest].iter().all(|l| l.width() < width));
            }
        }
    }
}
