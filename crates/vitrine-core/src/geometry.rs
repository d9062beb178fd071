//! Percentage-of-container geometry.
//!
//! Everything on the canvas is positioned relative to the container's current
//! pixel bounds. The bounds are passed in on every conversion so that a
//! resized container never desynchronizes what is drawn from what is stored.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Helpers for values expressed as a percentage of the container.
pub struct Percent;

impl Percent {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Clamp a value to [0, 100]. NaN collapses to 0.
    pub fn clamp(value: f64) -> f64 {
        if value.is_nan() {
            return Self::MIN;
        }
        value.clamp(Self::MIN, Self::MAX)
    }

    /// Convert a pixel length along an axis of `extent` pixels to a percentage.
    pub fn of(pixels: f64, extent: f64) -> f64 {
        if extent <= 0.0 {
            return Self::MIN;
        }
        pixels / extent * 100.0
    }

    /// Convert a percentage of `extent` pixels back to pixels.
    pub fn to_pixels(percent: f64, extent: f64) -> f64 {
        percent / 100.0 * extent
    }
}

/// A top-left position in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point with both axes clamped to [0, 100].
    pub fn clamped(self) -> Self {
        Self::new(Percent::clamp(self.x), Percent::clamp(self.y))
    }

    /// Absolute pixel position inside `container`.
    pub fn to_pixels(self, container: Rect) -> Point {
        Point::new(
            container.x0 + Percent::to_pixels(self.x, container.width()),
            container.y0 + Percent::to_pixels(self.y, container.height()),
        )
    }

    /// Position of an absolute pixel point relative to `container`, unclamped.
    pub fn from_pixels(point: Point, container: Rect) -> Self {
        Self::new(
            Percent::of(point.x - container.x0, container.width()),
            Percent::of(point.y - container.y0, container.height()),
        )
    }

    pub fn is_within_bounds(self) -> bool {
        (Percent::MIN..=Percent::MAX).contains(&self.x) && (Percent::MIN..=Percent::MAX).contains(&self.y)
    }
}

/// A width/height pair in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentSize {
    pub width: f64,
    pub height: f64,
}

impl PercentSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square footprint: `size` percent of each container axis.
    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    pub fn clamped(self) -> Self {
        Self::new(Percent::clamp(self.width), Percent::clamp(self.height))
    }

    pub fn to_pixels(self, container: Rect) -> Size {
        Size::new(
            Percent::to_pixels(self.width, container.width()),
            Percent::to_pixels(self.height, container.height()),
        )
    }
}

/// Pixel rectangle occupied by an item placed at `position` with `size`.
pub fn frame_in(position: PercentPoint, size: PercentSize, container: Rect) -> Rect {
    Rect::from_origin_size(position.to_pixels(container), size.to_pixels(container))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(Percent::clamp(-5.0), 0.0);
        assert_eq!(Percent::clamp(150.0), 100.0);
        assert_eq!(Percent::clamp(42.5), 42.5);
        assert_eq!(Percent::clamp(f64::NAN), 0.0);
    }

    #[test]
    fn test_pixels_follow_container() {
        let p = PercentPoint::new(50.0, 25.0);
        let small = Rect::new(0.0, 0.0, 200.0, 100.0);
        let large = Rect::new(10.0, 20.0, 810.0, 420.0);

        assert_eq!(p.to_pixels(small), Point::new(100.0, 25.0));
        assert_eq!(p.to_pixels(large), Point::new(410.0, 120.0));
        assert_eq!(PercentPoint::from_pixels(Point::new(410.0, 120.0), large), p);
    }

    #[test]
    fn test_zero_sized_container() {
        let empty = Rect::new(5.0, 5.0, 5.0, 5.0);
        let p = PercentPoint::from_pixels(Point::new(30.0, 30.0), empty);
        assert_eq!(p, PercentPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_frame_in() {
        let container = Rect::new(0.0, 0.0, 400.0, 300.0);
        let frame = frame_in(PercentPoint::new(10.0, 10.0), PercentSize::new(20.0, 10.0), container);
        assert_eq!(frame, Rect::new(40.0, 30.0, 120.0, 60.0));
    }
}
