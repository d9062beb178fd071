//! Content components placed on the display canvas.

use crate::geometry::{frame_in, PercentPoint, PercentSize};
use crate::ids;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Unique identifier for components.
pub type ComponentId = i64;

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
/// Image shown by freshly created image components.
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// What a component displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Literal text.
    Text,
    /// An image loaded from the URL in `content`.
    Image,
    /// A numeric string shown verbatim.
    Number,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Image => "image",
            ComponentKind::Number => "number",
        }
    }

    fn default_content(self) -> &'static str {
        match self {
            ComponentKind::Text => "New text",
            ComponentKind::Image => DEFAULT_IMAGE_URL,
            ComponentKind::Number => "0",
        }
    }

    fn default_size(self) -> PercentSize {
        match self {
            ComponentKind::Text => PercentSize::new(20.0, 10.0),
            ComponentKind::Image | ComponentKind::Number => PercentSize::new(20.0, 20.0),
        }
    }
}

/// A positioned content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub content: String,
    pub position: PercentPoint,
    pub size: PercentSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl Component {
    /// Create a component of `kind` with the editor's defaults and a fresh id.
    pub fn new(kind: ComponentKind) -> Self {
        Self::with_id(ids::next_id(), kind)
    }

    pub fn with_id(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            kind,
            content: kind.default_content().to_string(),
            position: PercentPoint::new(10.0, 10.0),
            size: kind.default_size(),
            font_size: Some(DEFAULT_FONT_SIZE),
            font_family: None,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size.filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Re-establish the geometry invariants after an edit.
    pub fn normalize(&mut self) {
        self.position = self.position.clamped();
        self.size = self.size.clamped();
        if self.font_size.is_some_and(|s| !(s > 0.0)) {
            self.font_size = Some(DEFAULT_FONT_SIZE);
        }
    }

    /// Pixel frame inside `container`.
    pub fn frame(&self, container: Rect) -> Rect {
        frame_in(self.position, self.size, container)
    }

    pub fn hit_test(&self, point: Point, container: Rect) -> bool {
        self.frame(container).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let text = Component::new(ComponentKind::Text);
        assert_eq!(text.content, "New text");
        assert_eq!(text.size, PercentSize::new(20.0, 10.0));
        assert_eq!(text.position, PercentPoint::new(10.0, 10.0));

        let image = Component::new(ComponentKind::Image);
        assert_eq!(image.content, DEFAULT_IMAGE_URL);
        assert_eq!(image.size, PercentSize::new(20.0, 20.0));

        let number = Component::new(ComponentKind::Number);
        assert_eq!(number.content, "0");
        assert_eq!(number.font_size(), 16.0);
        assert_eq!(number.font_family(), "sans-serif");
    }

    #[test]
    fn test_fresh_ids_differ() {
        let a = Component::new(ComponentKind::Text);
        let b = Component::new(ComponentKind::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_normalize_clamps() {
        let mut c = Component::with_id(1, ComponentKind::Text);
        c.position = PercentPoint::new(-10.0, 120.0);
        c.size = PercentSize::new(300.0, -1.0);
        c.font_size = Some(0.0);
        c.normalize();
        assert_eq!(c.position, PercentPoint::new(0.0, 100.0));
        assert_eq!(c.size, PercentSize::new(100.0, 0.0));
        assert_eq!(c.font_size, Some(DEFAULT_FONT_SIZE));
    }

    #[test]
    fn test_wire_format() {
        let c = Component::with_id(7, ComponentKind::Number);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["fontSize"], 16.0);
        assert!(json.get("fontFamily").is_none());
    }

    #[test]
    fn test_hit_test() {
        let c = Component::with_id(1, ComponentKind::Image);
        let container = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(c.hit_test(Point::new(15.0, 15.0), container));
        assert!(!c.hit_test(Point::new(5.0, 5.0), container));
    }
}
