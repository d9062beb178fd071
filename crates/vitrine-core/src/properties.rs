//! Page-level styling of a display.

use crate::color::HexColor;
use crate::shapes::{BackgroundShape, ShapeId};
use serde::{Deserialize, Serialize};

/// Background and text colors plus the ordered background shapes.
///
/// Shape order is paint order: later shapes draw on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProperties {
    pub background_color: HexColor,
    pub text_color: HexColor,
    #[serde(default)]
    pub background_shapes: Vec<BackgroundShape>,
}

impl Default for WebProperties {
    fn default() -> Self {
        Self {
            background_color: HexColor::new("#f0fff4"),
            text_color: HexColor::new("#2d3748"),
            background_shapes: Vec::new(),
        }
    }
}

impl WebProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape. Returns false (and leaves the list untouched) if a
    /// shape with the same id is already present.
    pub fn add_shape(&mut self, mut shape: BackgroundShape) -> bool {
        if self.shape(shape.id).is_some() {
            log::warn!("Ignoring duplicate background shape id {}", shape.id);
            return false;
        }
        shape.normalize();
        self.background_shapes.push(shape);
        true
    }

    pub fn shape(&self, id: ShapeId) -> Option<&BackgroundShape> {
        self.background_shapes.iter().find(|s| s.id == id)
    }

    /// Apply `edit` to the shape with `id`, then re-clamp it.
    /// Returns false if there is no such shape.
    pub fn update_shape(&mut self, id: ShapeId, edit: impl FnOnce(&mut BackgroundShape)) -> bool {
        match self.background_shapes.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                edit(shape);
                // Identity is not editable.
                shape.id = id;
                shape.normalize();
                true
            }
            None => false,
        }
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<BackgroundShape> {
        let index = self.background_shapes.iter().position(|s| s.id == id)?;
        Some(self.background_shapes.remove(index))
    }

    /// Check the no-duplicate-identity invariant.
    pub fn has_unique_shape_ids(&self) -> bool {
        let mut ids: Vec<ShapeId> = self.background_shapes.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.windows(2).all(|w| w[0] != w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    #[test]
    fn test_defaults() {
        let props = WebProperties::default();
        assert_eq!(props.background_color.as_str(), "#f0fff4");
        assert_eq!(props.text_color.as_str(), "#2d3748");
        assert!(props.background_shapes.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut props = WebProperties::default();
        assert!(props.add_shape(BackgroundShape::with_id(1, ShapeKind::Circle)));
        assert!(!props.add_shape(BackgroundShape::with_id(1, ShapeKind::Square)));
        assert_eq!(props.background_shapes.len(), 1);
        assert_eq!(props.background_shapes[0].kind, ShapeKind::Circle);
        assert!(props.has_unique_shape_ids());
    }

    #[test]
    fn test_update_clamps_and_keeps_id() {
        let mut props = WebProperties::default();
        props.add_shape(BackgroundShape::with_id(1, ShapeKind::Circle));
        assert!(props.update_shape(1, |s| {
            s.id = 99;
            s.size = 500.0;
            s.opacity = 3.0;
        }));
        let shape = props.shape(1).unwrap();
        assert_eq!(shape.size, 100.0);
        assert_eq!(shape.opacity, 1.0);
        assert!(!props.update_shape(2, |_| {}));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut props = WebProperties::default();
        for id in 1..=3 {
            props.add_shape(BackgroundShape::with_id(id, ShapeKind::Square));
        }
        assert!(props.remove_shape(2).is_some());
        assert!(props.remove_shape(2).is_none());
        let ids: Vec<_> = props.background_shapes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(WebProperties::default()).unwrap();
        assert_eq!(json["backgroundColor"], "#f0fff4");
        assert!(json["backgroundShapes"].as_array().unwrap().is_empty());
    }
}
