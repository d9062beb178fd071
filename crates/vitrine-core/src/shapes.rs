//! Decorative background shapes.

use crate::color::HexColor;
use crate::geometry::{frame_in, PercentPoint, PercentSize};
use crate::ids;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Unique identifier for background shapes.
pub type ShapeId = i64;

pub const MIN_SHAPE_SIZE: f64 = 1.0;
pub const MAX_SHAPE_SIZE: f64 = 100.0;

/// Geometric primitive of a background shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    /// Upward-pointing isosceles triangle inscribed in the footprint.
    Triangle,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
        }
    }
}

/// A positioned decorative primitive drawn behind the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundShape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub color: HexColor,
    pub position: PercentPoint,
    /// Percent of the container, used for both width and height.
    pub size: f64,
    pub opacity: f64,
}

impl BackgroundShape {
    /// Create a shape of `kind` with the editor's defaults and a fresh id.
    pub fn new(kind: ShapeKind) -> Self {
        Self::with_id(ids::next_id(), kind)
    }

    pub fn with_id(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            color: HexColor::black(),
            position: PercentPoint::new(50.0, 50.0),
            size: 10.0,
            opacity: 0.5,
        }
    }

    /// Clamp size to [1, 100] (NaN becomes 1).
    pub fn clamp_size(size: f64) -> f64 {
        if size.is_nan() {
            return MIN_SHAPE_SIZE;
        }
        size.clamp(MIN_SHAPE_SIZE, MAX_SHAPE_SIZE)
    }

    /// Clamp opacity to [0, 1] (NaN becomes fully opaque).
    pub fn clamp_opacity(opacity: f64) -> f64 {
        if opacity.is_nan() {
            return 1.0;
        }
        opacity.clamp(0.0, 1.0)
    }

    /// Re-establish the shape invariants after an edit.
    pub fn normalize(&mut self) {
        self.position = self.position.clamped();
        self.size = Self::clamp_size(self.size);
        self.opacity = Self::clamp_opacity(self.opacity);
    }

    /// Footprint in pixels. Triangles use the full square footprint for
    /// hit-testing even though the visible triangle covers about half of it.
    pub fn footprint(&self, container: Rect) -> Rect {
        frame_in(self.position, PercentSize::square(self.size), container)
    }

    pub fn hit_test(&self, point: Point, container: Rect) -> bool {
        self.footprint(container).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = BackgroundShape::new(ShapeKind::Triangle);
        assert_eq!(s.color.as_str(), "#000000");
        assert_eq!(s.position, PercentPoint::new(50.0, 50.0));
        assert_eq!(s.size, 10.0);
        assert_eq!(s.opacity, 0.5);
    }

    #[test]
    fn test_normalize() {
        let mut s = BackgroundShape::with_id(1, ShapeKind::Circle);
        s.size = 0.0;
        s.opacity = 1.7;
        s.position = PercentPoint::new(101.0, -3.0);
        s.normalize();
        assert_eq!(s.size, 1.0);
        assert_eq!(s.opacity, 1.0);
        assert_eq!(s.position, PercentPoint::new(100.0, 0.0));

        s.size = 250.0;
        s.opacity = -0.2;
        s.normalize();
        assert_eq!(s.size, 100.0);
        assert_eq!(s.opacity, 0.0);
    }

    #[test]
    fn test_triangle_footprint_is_square() {
        let container = Rect::new(0.0, 0.0, 200.0, 100.0);
        let mut s = BackgroundShape::with_id(1, ShapeKind::Triangle);
        s.position = PercentPoint::new(0.0, 0.0);
        s.size = 50.0;
        assert_eq!(s.footprint(container), Rect::new(0.0, 0.0, 100.0, 50.0));
        // Top-left corner lies outside the visible triangle but still hits.
        assert!(s.hit_test(Point::new(1.0, 1.0), container));
    }

    #[test]
    fn test_wire_format() {
        let s = BackgroundShape::with_id(3, ShapeKind::Square);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "square");
        assert_eq!(json["color"], "#000000");
    }
}
