//! Handing laid out text to a renderer.
//!
//! A [`TextBlock`](crate::TextBlock) draws itself by passing one [`DrawCall`]
//! to a [`RenderSink`]. Enable the `wgpu` feature for a sink that draws
//! onto a `wgpu` render pass.

use glam::Affine2;

use crate::quad::Vertex;

#[cfg(feature = "wgpu")]
pub mod text;

#[cfg(feature = "wgpu")]
pub use text::{AtlasTexture, PreparedTextBatch, TextBatch, TextRenderer};

/// Everything needed to draw one text block: a triangle list,
/// its transform, and the glyph atlas its texture coordinates refer to.
#[derive(Debug)]
pub struct DrawCall<'a, T> {
    pub vertices: &'a [Vertex],
    pub transform: Affine2,
    /// `None` when the block has no font.
    pub texture: Option<&'a T>,
}

impl<'a, T> Clone for DrawCall<'a, T> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices,
            transform: self.transform,
            texture: self.texture,
        }
    }
}

impl<'a, T> Copy for DrawCall<'a, T> {}

/// Consumes draw calls, e.g. by recording them into a GPU batch.
///
/// `T` is the font's texture handle type.
pub trait RenderSink<T> {
    fn draw(&mut self, call: DrawCall<'_, T>);
}
