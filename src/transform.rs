use glam::{Affine2, Vec2};

/// Position, rotation, and scale of a text block.
///
/// Transformations are applied around `origin`, which is given in the
/// block's local coordinates: the origin is moved to `position`,
/// then the block is scaled and rotated around it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vec2,
    origin: Vec2,
    /// In radians, clockwise in y-down screen space.
    rotation: f32,
    scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) -> &mut Self {
        self.position = position;
        self
    }

    /// Moves the position by `offset`.
    pub fn translate(&mut self, offset: Vec2) -> &mut Self {
        self.position += offset;
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) -> &mut Self {
        self.origin = origin;
        self
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) -> &mut Self {
        self.rotation = radians;
        self
    }

    pub fn rotate(&mut self, radians: f32) -> &mut Self {
        self.rotation += radians;
        self
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
            * Affine2::from_translation(-self.origin)
    }
}
