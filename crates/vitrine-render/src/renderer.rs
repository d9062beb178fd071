//! Scene building and the renderer trait abstraction.

use crate::images::ImageCache;
use crate::tree::{
    ARTICLES_PANEL_TITLE, ArticlesPanel, ComponentContent, ComponentNode, RenderTree, ShapeGeometry, ShapeNode,
    Swatch,
};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;
use vitrine_core::{Article, Component, DragTarget, EditorTab, Selection, Studio, Template, WebProperties};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Build the tree for a canvas.
///
/// `articles` produces the bottom panel only when non-empty. Nothing is
/// selected or draggable; see [`EditorOverlay`] for the editor canvas.
pub fn render_scene(components: &[Component], web_properties: &WebProperties, articles: &[Article]) -> RenderTree {
    let text_color = Swatch::from(web_properties.text_color.to_color());

    let shapes = web_properties
        .background_shapes
        .iter()
        .map(|shape| ShapeNode {
            id: shape.id,
            geometry: ShapeGeometry::from(shape.kind),
            position: shape.position,
            size: shape.size,
            fill: shape.color.to_color().into(),
            opacity: shape.opacity,
            selected: false,
            draggable: false,
        })
        .collect();

    let components = components
        .iter()
        .map(|component| ComponentNode {
            id: component.id,
            content: ComponentContent::new(component.kind, &component.content),
            position: component.position,
            size: component.size,
            font_size: component.font_size(),
            font_family: component.font_family().to_string(),
            color: text_color,
            selected: false,
            draggable: false,
        })
        .collect();

    let articles = (!articles.is_empty()).then(|| ArticlesPanel {
        title: ARTICLES_PANEL_TITLE.to_string(),
        lines: articles.iter().map(Article::label).collect(),
        color: text_color,
    });

    RenderTree {
        background: web_properties.background_color.to_color().into(),
        text_color,
        shapes,
        components,
        articles,
    }
}

/// Tree for a saved template.
pub fn render_template(template: &Template, articles: &[Article]) -> RenderTree {
    render_scene(template.components(), template.web_properties(), articles)
}

/// Gallery thumbnail: the template without articles.
pub fn render_thumbnail(template: &Template) -> RenderTree {
    render_template(template, &[])
}

/// Advertising preview, fullscreen and secondary display.
pub fn render_presentation(template: &Template, articles: &[Article]) -> RenderTree {
    render_template(template, articles)
}

/// Editor canvas: the live state with selection and drag affordances, plus
/// the received articles.
pub fn render_editor(studio: &Studio) -> RenderTree {
    let mut tree = render_scene(studio.components(), studio.web_properties(), studio.articles());
    EditorOverlay::new(studio.selection(), studio.active_tab()).apply(&mut tree);
    tree
}

/// Marks the selected node and the nodes the active tab lets the user drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOverlay {
    pub selection: Selection,
    pub tab: EditorTab,
}

impl EditorOverlay {
    pub fn new(selection: Selection, tab: EditorTab) -> Self {
        Self { selection, tab }
    }

    pub fn apply(&self, tree: &mut RenderTree) {
        for node in &mut tree.shapes {
            node.selected = self.selection.is_shape(node.id);
            node.draggable = DragTarget::Shape(node.id).draggable_in(self.tab);
        }
        for node in &mut tree.components {
            node.selected = self.selection.is_component(node.id);
            node.draggable = DragTarget::Component(node.id).draggable_in(self.tab);
        }
    }
}

/// Context for drawing one tree.
pub struct RenderContext<'a> {
    /// The tree to draw.
    pub tree: &'a RenderTree,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Selection outline color.
    pub selection_color: Color,
    /// Load results for image components.
    pub images: Option<&'a ImageCache>,
}

impl<'a> RenderContext<'a> {
    pub fn new(tree: &'a RenderTree, viewport_size: Size) -> Self {
        Self {
            tree,
            viewport_size,
            scale_factor: 1.0,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            images: None,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_images(mut self, images: &'a ImageCache) -> Self {
        self.images = Some(images);
        self
    }

    /// Viewport in logical pixels.
    pub fn logical_size(&self) -> Size {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        Size::new(self.viewport_size.width / scale, self.viewport_size.height / scale)
    }

    /// Displayed URL for an image component.
    pub fn image_source<'u>(&self, url: &'u str) -> &'u str {
        match self.images {
            Some(images) => images.source_for(url),
            None if url.trim().is_empty() => crate::images::PLACEHOLDER_IMAGE_URL,
            None => url,
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Draw one frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.tree.background.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{ArticleMirror, ComponentKind, MouseButton, PointerEvent, RelayEvent, ShapeKind, TemplateStore};
    use kurbo::{Point, Rect};

    fn article(id: i64, name: &str, price: f64) -> Article {
        Article {
            id,
            name: name.into(),
            price,
        }
    }

    fn sample_studio() -> Studio {
        let mut studio = Studio::new();
        studio.add_shape(ShapeKind::Circle);
        studio.add_shape(ShapeKind::Triangle);
        let image = studio.add_component(ComponentKind::Image);
        studio
            .update_component(image, |c| c.content = "https://example.com/logo.png".into())
            .unwrap();
        studio.add_component(ComponentKind::Text);
        studio.add_component(ComponentKind::Number);
        studio
    }

    #[test]
    fn test_layers_follow_sequence_order() {
        let studio = sample_studio();
        let tree = render_scene(studio.components(), studio.web_properties(), &[]);

        let shape_ids: Vec<_> = tree.shapes.iter().map(|s| s.id).collect();
        let expected: Vec<_> = studio.web_properties().background_shapes.iter().map(|s| s.id).collect();
        assert_eq!(shape_ids, expected);
        assert_eq!(tree.shapes[1].geometry, ShapeGeometry::Triangle);

        assert!(matches!(tree.components[0].content, ComponentContent::Image(ref url) if url == "https://example.com/logo.png"));
        assert_eq!(tree.components[1].content, ComponentContent::Text("New text".into()));
        assert_eq!(tree.components[2].content, ComponentContent::Number("0".into()));
        assert_eq!(tree.background, Swatch::new(0xf0, 0xff, 0xf4, 255));
        assert_eq!(tree.components[1].color, Swatch::new(0x2d, 0x37, 0x48, 255));
        assert_eq!(tree.components[1].font_family, "sans-serif");
        assert!(tree.articles.is_none());
    }

    #[test]
    fn test_articles_panel() {
        let studio = sample_studio();
        let articles = vec![article(1, "Milk", 2.5), article(2, "Bread", 1.0)];
        let tree = render_scene(studio.components(), studio.web_properties(), &articles);
        let panel = tree.articles.unwrap();
        assert_eq!(panel.title, "Received articles");
        assert_eq!(panel.lines, vec!["Milk - $2.50".to_string(), "Bread - $1.00".to_string()]);
    }

    #[test]
    fn test_thumbnail_matches_presentation() {
        let mut studio = sample_studio();
        let id = studio.save_template("Weekly offers").unwrap();
        let template = studio.templates().get(&id).unwrap();

        assert_eq!(render_thumbnail(template), render_presentation(template, &[]));

        let articles = vec![article(1, "Milk", 2.5)];
        let mut presented = render_presentation(template, &articles);
        assert!(presented.articles.is_some());
        presented.articles = None;
        assert_eq!(render_thumbnail(template), presented);
    }

    #[test]
    fn test_template_tree_ignores_later_edits() {
        let mut store = TemplateStore::new();
        let studio = sample_studio();
        let template = store
            .create("Snapshot", studio.components(), studio.web_properties())
            .unwrap()
            .clone();
        let before = render_thumbnail(&template);

        let mut studio = studio;
        let first = studio.components()[0].id;
        studio.update_component(first, |c| c.size.width = 80.0).unwrap();
        assert_eq!(render_thumbnail(&template), before);
    }

    #[test]
    fn test_editor_overlay() {
        let mut studio = sample_studio();
        let canvas = Rect::new(0.0, 0.0, 1000.0, 500.0);
        let number = studio.components()[2].id;

        // All three components sit at (10%, 10%); the last one added is on top.
        studio.handle_pointer(
            PointerEvent::Down {
                position: Point::new(110.0, 60.0),
                button: MouseButton::Left,
            },
            canvas,
        );
        let tree = render_editor(&studio);
        let selected: Vec<_> = tree.components.iter().filter(|c| c.selected).map(|c| c.id).collect();
        assert_eq!(selected, vec![number]);
        assert!(tree.components.iter().all(|c| c.draggable));
        assert!(tree.shapes.iter().all(|s| !s.draggable && !s.selected));

        studio.set_active_tab(EditorTab::General);
        let tree = render_editor(&studio);
        assert!(tree.shapes.iter().all(|s| s.draggable));
        assert!(tree.components.iter().all(|c| !c.draggable));
    }

    #[test]
    fn test_editor_shows_received_articles() {
        let mut studio = sample_studio();
        assert!(render_editor(&studio).articles.is_none());

        studio.apply_relay_event(RelayEvent::ArticleAdded {
            article: article(1, "Milk", 2.5),
        });
        let panel = render_editor(&studio).articles.unwrap();
        assert_eq!(panel.lines, vec!["Milk - $2.50".to_string()]);

        studio.apply_relay_event(RelayEvent::ArticlesCleared);
        assert!(render_editor(&studio).articles.is_none());
    }

    #[test]
    fn test_mirror_feeds_panel() {
        let mut mirror = ArticleMirror::new();
        mirror.apply(RelayEvent::ArticleAdded {
            article: article(3, "Cheese", 7.25),
        });
        let tree = render_scene(&[], &WebProperties::default(), mirror.articles());
        assert_eq!(tree.articles.unwrap().lines, vec!["Cheese - $7.25".to_string()]);
    }
}
