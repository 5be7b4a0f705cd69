use std::iter;

use crate::style::{Align, LayoutStyle};

use super::{is_whitespace, Line};

/// Horizontal corrections computed from measured line widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct Justification {
    /// Width every line is aligned against.
    pub target_width: f32,
    /// The first line that set `target_width`, if any line exceeded the minimum width.
    pub longest_line: Option<usize>,
    /// Flat alignment offset of each line, excluding its absolute offset.
    pub line_offsets: Vec<f32>,
    /// Extra offset of each quad, indexed by quad.
    pub glyph_offsets: Vec<f32>,
}

pub(super) fn justify(lines: &[Line], text: &[char], style: &LayoutStyle) -> Justification {
    let (target_width, longest_line) = target_width(lines, style.min_width);
    let round = |x: f32| if style.round_offsets { x.round() } else { x };

    let quad_count: usize = lines.iter().map(|line| line.quad_count).sum();
    let mut justification = Justification {
        target_width,
        longest_line,
        line_offsets: Vec::with_capacity(lines.len()),
        glyph_offsets: Vec::with_capacity(quad_count),
    };

    for (i, line) in lines.iter().enumerate() {
        let free_space = if longest_line == Some(i) {
            0.
        } else {
            target_width - line.width
        };

        let line_offset = match line.style.align {
            Align::Right => round(free_space),
            Align::Center => round(free_space / 2.),
            Align::Left | Align::JustifyWhitespace | Align::JustifyCharacters => 0.,
        };
        justification.line_offsets.push(line_offset);

        let glyph_offsets = &mut justification.glyph_offsets;
        match line.style.align {
            Align::JustifyWhitespace => {
                whitespace_offsets(&text[line.char_range()], free_space, glyph_offsets)
            }
            Align::JustifyCharacters => {
                character_offsets(line.len, line.quad_count, free_space, glyph_offsets)
            }
            Align::Left | Align::Center | Align::Right => {
                glyph_offsets.extend(iter::repeat(0.).take(line.quad_count))
            }
        }
        debug_assert_eq!(
            justification.glyph_offsets.len(),
            line.quad_range().end,
            "glyph offsets out of step with quads"
        );
    }

    justification
}

/// Returns the width to align against and the line that set it.
///
/// Only a line strictly wider than everything before it (starting from
/// `min_width`) can become the longest line.
fn target_width(lines: &[Line], min_width: f32) -> (f32, Option<usize>) {
    let mut target = min_width;
    let mut longest = None;
    for (i, line) in lines.iter().enumerate() {
        if line.width > target {
            target = line.width;
            longest = Some(i);
        }
    }
    (target, longest)
}

/// Spreads `free_space` over the whitespace blocks of a line. A block is a
/// run of spaces and tabs followed by a glyph; each glyph after a block moves
/// by one more share than the glyphs before it.
fn whitespace_offsets(line: &[char], free_space: f32, out: &mut Vec<f32>) {
    let mut blocks = 0;
    let mut in_block = false;
    for &c in line {
        if is_whitespace(c) {
            in_block = true;
        } else if in_block {
            blocks += 1;
            in_block = false;
        }
    }

    let step = if blocks == 0 {
        0.
    } else {
        free_space / blocks as f32
    };

    let mut shift = 0.;
    let mut in_block = false;
    for &c in line {
        if is_whitespace(c) {
            in_block = true;
        } else {
            if in_block {
                shift += step;
                in_block = false;
            }
            out.push(shift);
        }
    }
}

/// Spreads `free_space` evenly between consecutive glyphs. Lines of two
/// or fewer characters, and lines with a single glyph, are left alone.
fn character_offsets(len: usize, quad_count: usize, free_space: f32, out: &mut Vec<f32>) {
    let step = if len <= 2 || quad_count <= 1 {
        0.
    } else {
        free_space / (quad_count - 1) as f32
    };
    out.extend((0..quad_count).map(|k| k as f32 * step));
}
