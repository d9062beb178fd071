//! Vitrine Render Library
//!
//! Maps display state to a layered [`RenderTree`] and draws it through a
//! [`Renderer`] backend. The same tree feeds the editor canvas, gallery
//! thumbnails and the presentation view.

mod images;
mod renderer;
mod svg;
mod tree;

pub use images::{DecodedImage, ImageCache, ImageStatus, PLACEHOLDER_IMAGE_URL};
pub use renderer::{
    EditorOverlay, RenderContext, RenderError, RenderResult, Renderer, render_editor, render_presentation,
    render_scene, render_template, render_thumbnail,
};
pub use svg::SvgRenderer;
pub use tree::{
    ARTICLES_PANEL_TITLE, ArticlesPanel, ComponentContent, ComponentNode, RenderTree, ShapeGeometry, ShapeNode,
    Swatch,
};
