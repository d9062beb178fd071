//! Layered visual tree produced by the renderer.
//!
//! Geometry stays in container percentages so one tree can be drawn at any
//! size. Colors are resolved once, when the tree is built.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape as _};
use peniko::Color;
use vitrine_core::geometry::{PercentPoint, PercentSize, frame_in};
use vitrine_core::{ComponentId, ComponentKind, ShapeId, ShapeKind};

/// Title shown above the received articles.
pub const ARTICLES_PANEL_TITLE: &str = "Received articles";

/// RGBA8 color as stored in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Swatch {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl From<Color> for Swatch {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Swatch> for Color {
    fn from(swatch: Swatch) -> Self {
        Color::from_rgba8(swatch.r, swatch.g, swatch.b, swatch.a)
    }
}

/// Outline of a background shape within its square footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeGeometry {
    /// Ellipse inscribed in the footprint.
    Circle,
    /// The footprint itself.
    Square,
    /// Apex at top-center, base along the bottom edge.
    Triangle,
}

impl ShapeGeometry {
    pub fn path(self, frame: Rect) -> BezPath {
        match self {
            ShapeGeometry::Circle => Ellipse::from_rect(frame).to_path(0.1),
            ShapeGeometry::Square => frame.to_path(0.1),
            ShapeGeometry::Triangle => {
                let mut path = BezPath::new();
                path.move_to(Point::new(frame.center().x, frame.y0));
                path.line_to(Point::new(frame.x1, frame.y1));
                path.line_to(Point::new(frame.x0, frame.y1));
                path.close_path();
                path
            }
        }
    }
}

impl From<ShapeKind> for ShapeGeometry {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Circle => ShapeGeometry::Circle,
            ShapeKind::Square => ShapeGeometry::Square,
            ShapeKind::Triangle => ShapeGeometry::Triangle,
        }
    }
}

/// A decorative background shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
    pub position: PercentPoint,
    /// Percentage of the container used for both width and height.
    pub size: f64,
    pub fill: Swatch,
    pub opacity: f64,
    pub selected: bool,
    pub draggable: bool,
}

impl ShapeNode {
    pub fn frame(&self, container: Rect) -> Rect {
        frame_in(self.position, PercentSize::square(self.size), container)
    }
}

/// What a component node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentContent {
    Text(String),
    /// Image URL as entered by the user. Backends resolve it through the
    /// image cache, which substitutes the placeholder on failure.
    Image(String),
    Number(String),
}

impl ComponentContent {
    pub fn new(kind: ComponentKind, content: &str) -> Self {
        match kind {
            ComponentKind::Text => ComponentContent::Text(content.to_string()),
            ComponentKind::Image => ComponentContent::Image(content.to_string()),
            ComponentKind::Number => ComponentContent::Number(content.to_string()),
        }
    }

    /// Text to draw, if this is a textual node.
    pub fn text(&self) -> Option<&str> {
        match self {
            ComponentContent::Text(text) | ComponentContent::Number(text) => Some(text),
            ComponentContent::Image(_) => None,
        }
    }
}

/// A content component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub id: ComponentId,
    pub content: ComponentContent,
    pub position: PercentPoint,
    pub size: PercentSize,
    pub font_size: f64,
    pub font_family: String,
    pub color: Swatch,
    pub selected: bool,
    pub draggable: bool,
}

impl ComponentNode {
    pub fn frame(&self, container: Rect) -> Rect {
        frame_in(self.position, self.size, container)
    }
}

/// Bottom-pinned list of received articles.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlesPanel {
    pub title: String,
    pub lines: Vec<String>,
    pub color: Swatch,
}

/// Complete visual description of one canvas.
///
/// Layers draw in field order: background, shapes, components, then the
/// articles panel. Within a layer later nodes draw on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    pub background: Swatch,
    pub text_color: Swatch,
    pub shapes: Vec<ShapeNode>,
    pub components: Vec<ComponentNode>,
    pub articles: Option<ArticlesPanel>,
}

impl RenderTree {
    pub fn component(&self, id: ComponentId) -> Option<&ComponentNode> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ShapeNode> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Image URLs referenced by the tree, in draw order.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|c| match &c.content {
            ComponentContent::Image(url) => Some(url.as_str()),
            ComponentContent::Text(_) | ComponentContent::Number(_) => None,
        })
    }
}
