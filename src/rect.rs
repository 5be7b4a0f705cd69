use glam::{vec2, Affine2, Vec2};

/// A rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    /// The position of the top-left corner
    /// of this rectangle.
    pub pos: Vec2,
    /// The side lengths of this rectangle.
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// The smallest rectangle containing every point, or `None`
    /// if the iterator is empty.
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self {
            pos: min,
            size: max - min,
        })
    }

    /// The axis-aligned bounding box of this rectangle
    /// after applying `transform` to its corners.
    pub fn bbox_transformed(self, transform: Affine2) -> Self {
        let points = [
            self.pos,
            self.pos + vec2(0., self.size.y),
            self.pos + vec2(self.size.x, 0.),
            self.pos + self.size,
        ]
        .map(|p| transform.transform_point2(p));

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(-f32::INFINITY);
        for point in points {
            min = min.min(point);
            max = max.max(point);
        }

        Self {
            pos: min,
            size: max - min,
        }
    }
}
