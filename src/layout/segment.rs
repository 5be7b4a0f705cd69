use glam::{vec2, Vec2};

use crate::{
    font::Font,
    quad::{Quad, QuadBuffer, VERTICES_PER_QUAD},
    style::{LayoutStyle, LineOverrides, LineStyle},
};

use super::Line;

/// Splits text into lines and places one quad per visible glyph,
/// before any alignment is applied.
pub(super) struct Segmenter<'a, F> {
    font: &'a F,
    style: &'a LayoutStyle,
    overrides: &'a LineOverrides,

    pen: Vec2,
    previous: char,

    line_index: usize,
    line_style: LineStyle,
    line_start: usize,
    line_start_quad: usize,
    line_width: f32,

    space_advance: f32,
    letter_spacing: f32,
    line_separation: f32,

    lines: Vec<Line>,
    quads: QuadBuffer,
}

impl<'a, F: Font> Segmenter<'a, F> {
    pub fn new(font: &'a F, style: &'a LayoutStyle, overrides: &'a LineOverrides) -> Self {
        let line_style = style.resolve(overrides, 0);
        let mut segmenter = Self {
            font,
            style,
            overrides,

            pen: vec2(0., style.character_size as f32),
            previous: '\0',

            line_index: 0,
            line_style,
            line_start: 0,
            line_start_quad: 0,
            line_width: 0.,

            space_advance: 0.,
            letter_spacing: 0.,
            line_separation: font.line_spacing(style.character_size) * style.line_height,

            lines: Vec::new(),
            quads: QuadBuffer::new(),
        };
        segmenter.update_spacing();
        segmenter
    }

    /// Spacing depends on boldness, which can change from line to line.
    fn update_spacing(&mut self) {
        self.space_advance = self
            .font
            .glyph(' ', self.style.character_size, self.line_style.bold)
            .advance;
        self.letter_spacing = self.space_advance * self.style.letter_spacing;
    }

    fn finish_line(&mut self, end: usize) {
        let quad_count = self.quads.quad_count() - self.line_start_quad;
        self.lines.push(Line {
            start: self.line_start,
            len: end - self.line_start,
            first_vertex: self.line_start_quad * VERTICES_PER_QUAD,
            quad_count,
            width: self.line_width.max(self.pen.x),
            style: self.line_style,
            offset: self.line_style.offset,
        });
    }

    fn next_line(&mut self, start: usize) {
        self.pen.x = 0.;
        self.pen.y += self.line_separation;
        self.line_index += 1;
        self.line_style = self.style.resolve(self.overrides, self.line_index);
        self.line_start = start;
        self.line_start_quad = self.quads.quad_count();
        self.line_width = 0.;
        self.update_spacing();
    }

    fn place_glyph(&mut self, c: char) {
        let size = self.style.character_size;
        let glyph = self.font.glyph(c, size, self.line_style.bold);
        let shear = if self.line_style.italic {
            self.style.italic_shear
        } else {
            0.
        };
        self.quads.push(Quad::new(&glyph, self.pen, shear));
        self.pen.x += glyph.advance + self.letter_spacing;
    }

    pub fn run(mut self, text: &[char]) -> (Vec<Line>, QuadBuffer) {
        let size = self.style.character_size;
        for (i, &c) in text.iter().enumerate() {
            self.line_width = self.line_width.max(self.pen.x);

            self.pen.x += self
                .font
                .kerning(self.previous, c, size, self.line_style.bold);
            self.previous = c;

            match c {
                ' ' => self.pen.x += self.space_advance + self.letter_spacing,
                '\t' => {
                    self.pen.x +=
                        self.space_advance * self.style.tab_length as f32 + self.letter_spacing
                }
                '\n' => {
                    // A trailing newline closes its line without opening an empty one.
                    self.finish_line(i);
                    self.next_line(i + 1);
                    continue;
                }
                c => self.place_glyph(c),
            }

            if i == text.len() - 1 {
                self.finish_line(i + 1);
            }
        }

        (self.lines, self.quads)
    }
}
