//! Glyph quads and the vertex buffer they live in.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec2};
use palette::Srgba;

use crate::font::Glyph;

/// Number of vertices emitted per glyph: two triangles sharing a diagonal.
pub const VERTICES_PER_QUAD: usize = 6;

/// A vertex of a glyph quad, ready to be uploaded as part of a triangle list.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub pos: Vec2,
    /// Texture coordinates in atlas pixels.
    pub tex_coords: Vec2,
    /// sRGB color with alpha, unpremultiplied.
    pub color: [u8; 4],
}

impl Vertex {
    pub fn color(&self) -> Srgba<u8> {
        let [r, g, b, a] = self.color;
        Srgba::new(r, g, b, a)
    }
}

/// The six vertices of one glyph.
///
/// Vertex order is top-left, bottom-left, top-right, bottom-right,
/// top-right, bottom-left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad([Vertex; VERTICES_PER_QUAD]);

impl Quad {
    /// Builds the quad for `glyph` drawn with its origin at `pen`.
    ///
    /// A nonzero `shear` slants the quad: each corner moves left by its
    /// glyph-local y coordinate times `shear`, while texture coordinates stay
    /// an upright rectangle.
    pub fn new(glyph: &Glyph, pen: Vec2, shear: f32) -> Self {
        let left = pen.x + glyph.bounds.pos.x;
        let right = left + glyph.bounds.size.x;
        let top = glyph.bounds.pos.y;
        let bottom = top + glyph.bounds.size.y;
        let shear_top = top * shear;
        let shear_bottom = bottom * shear;

        let region = glyph.texture_region;
        let tex_min = region.pos.as_f32();
        let tex_max = (region.pos + region.size).as_f32();

        let vertex = |pos: Vec2, tex_coords: Vec2| Vertex {
            pos,
            tex_coords,
            color: [u8::MAX; 4],
        };
        let top_left = vertex(vec2(left - shear_top, pen.y + top), tex_min);
        let bottom_left = vertex(
            vec2(left - shear_bottom, pen.y + bottom),
            vec2(tex_min.x, tex_max.y),
        );
        let top_right = vertex(
            vec2(right - shear_top, pen.y + top),
            vec2(tex_max.x, tex_min.y),
        );
        let bottom_right = vertex(vec2(right - shear_bottom, pen.y + bottom), tex_max);

        Self([
            top_left,
            bottom_left,
            top_right,
            bottom_right,
            top_right,
            bottom_left,
        ])
    }

    pub fn vertices(&self) -> &[Vertex; VERTICES_PER_QUAD] {
        &self.0
    }
}

/// A mutable view of one quad inside a [`QuadBuffer`].
pub struct QuadMut<'a>(&'a mut [Vertex]);

impl<'a> QuadMut<'a> {
    pub fn translate(&mut self, offset: Vec2) {
        for vertex in self.0.iter_mut() {
            vertex.pos += offset;
        }
    }

    pub fn set_color(&mut self, color: Srgba<u8>) {
        let (r, g, b, a) = color.into_components();
        for vertex in self.0.iter_mut() {
            vertex.color = [r, g, b, a];
        }
    }
}

/// A flat vertex buffer made of whole quads.
///
/// Quads can only be appended, or rewritten in place by quad range,
/// so the vertex count is always a multiple of [`VERTICES_PER_QUAD`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadBuffer {
    vertices: Vec<Vertex>,
}

impl QuadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: Quad) {
        self.vertices.extend_from_slice(&quad.0);
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertices of quad `index`, if it exists.
    pub fn quad(&self, index: usize) -> Option<&[Vertex]> {
        let start = index.checked_mul(VERTICES_PER_QUAD)?;
        self.vertices.get(start..start + VERTICES_PER_QUAD)
    }

    /// Mutable views of the quads in `range`, in buffer order.
    ///
    /// # Panics
    /// Panics if `range` extends past the last quad.
    pub fn quads_mut(&mut self, range: Range<usize>) -> impl Iterator<Item = QuadMut<'_>> + '_ {
        let vertices = &mut self.vertices
            [range.start * VERTICES_PER_QUAD..range.end * VERTICES_PER_QUAD];
        vertices.chunks_exact_mut(VERTICES_PER_QUAD).map(QuadMut)
    }
}
