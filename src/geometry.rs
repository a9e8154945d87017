//! Screen-space geometry shared by the clip engine, the text layout code and
//! the draw orchestrator.
//!
//! Points, vectors and sizes are euclid types tagged with [`ScreenSpace`] so
//! they cannot be mixed up with clip-space values by accident. [`Rect`] is our
//! own value type because the rendering core reasons in `left/top/right/bottom`
//! edges and truncates to whole pixels when clipping.

use euclid::{Point2D, Size2D, Transform3D, Vector2D};
use serde::{Deserialize, Serialize};

/// Unit type for screen space (pixels, origin top-left, Y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSpace;

/// Unit type for normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSpace;

/// Type aliases for clarity
pub type Point = Point2D<f32, ScreenSpace>;
pub type Vector = Vector2D<f32, ScreenSpace>;
pub type Size = Size2D<f32, ScreenSpace>;

/// Projection transform handed to the batching surface on every flush
pub type Projection = Transform3D<f32, ScreenSpace, ClipSpace>;

/// Build a top-left origin orthographic projection for a surface of the given size.
pub fn orthographic(width: f32, height: f32) -> Projection {
    Transform3D::ortho(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Axis-aligned rectangle in screen space.
///
/// `right == x + width` and `bottom == y + height` always hold. A rectangle
/// with a non-positive width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// The canonical empty rectangle
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_and_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Same size, moved by `offset`
    pub fn translate(&self, offset: Vector) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// True when `other` lies entirely inside `self` (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

impl From<euclid::Rect<f32, ScreenSpace>> for Rect {
    fn from(rect: euclid::Rect<f32, ScreenSpace>) -> Self {
        Self::from_origin_and_size(rect.origin, rect.size)
    }
}

impl From<Rect> for euclid::Rect<f32, ScreenSpace> {
    fn from(rect: Rect) -> Self {
        euclid::Rect::new(rect.origin(), rect.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_empty_rects() {
        assert!(Rect::ZERO.is_empty());
        assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(Rect::new(0.0, 0.0, -5.0, 10.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_euclid_conversion() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let e: euclid::Rect<f32, ScreenSpace> = rect.into();
        assert_eq!(e.max_x(), rect.right());
        assert_eq!(Rect::from(e), rect);
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0.0, 0.0, 200.0, 50.0);
        assert!(outer.contains_rect(&Rect::new(180.0, 0.0, 20.0, 50.0)));
        assert!(!outer.contains_rect(&Rect::new(180.0, 0.0, 50.0, 50.0)));
        assert!(outer.contains_point(Point::new(199.0, 49.0)));
        assert!(!outer.contains_point(Point::new(200.0, 10.0)));
    }

    #[test]
    fn test_orthographic_maps_corners() {
        let projection = orthographic(800.0, 600.0);
        let top_left = projection.transform_point2d(euclid::Point2D::new(0.0, 0.0)).unwrap();
        let bottom_right = projection
            .transform_point2d(euclid::Point2D::new(800.0, 600.0))
            .unwrap();
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }
}
