//! Editor selection.

use crate::components::ComponentId;
use crate::shapes::ShapeId;

/// What the editor currently has selected.
///
/// Components and background shapes are mutually exclusive: selecting one
/// category replaces any selection in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Component(ComponentId),
    Shape(ShapeId),
}

impl Selection {
    pub fn component(self) -> Option<ComponentId> {
        match self {
            Selection::Component(id) => Some(id),
            _ => None,
        }
    }

    pub fn shape(self) -> Option<ShapeId> {
        match self {
            Selection::Shape(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_component(self, id: ComponentId) -> bool {
        self.component() == Some(id)
    }

    pub fn is_shape(self, id: ShapeId) -> bool {
        self.shape() == Some(id)
    }

    pub fn is_none(self) -> bool {
        self == Selection::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let sel = Selection::Component(4);
        assert_eq!(sel.component(), Some(4));
        assert_eq!(sel.shape(), None);
        assert!(sel.is_component(4));
        assert!(!sel.is_shape(4));
        assert!(Selection::default().is_none());
    }
}
