//! SVG backend.

use crate::renderer::{RenderContext, RenderError, RenderResult, Renderer};
use crate::tree::{ArticlesPanel, ComponentContent, ComponentNode, ShapeGeometry, ShapeNode, Swatch};
use kurbo::{Point, Rect};
use std::fmt::Write as _;

/// Padding around the articles panel, in logical pixels.
const PANEL_PADDING: f64 = 16.0;
const PANEL_FONT_SIZE: f64 = 16.0;
const PANEL_LINE_HEIGHT: f64 = PANEL_FONT_SIZE * 1.5;
const SELECTION_STROKE_WIDTH: f64 = 2.0;

/// Renders a tree to a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document produced by the last [`Renderer::build_scene`] call.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }

    fn push_shape(&mut self, node: &ShapeNode, container: Rect, ctx: &RenderContext) {
        let frame = node.frame(container);
        let fill = node.fill.to_hex();
        let opacity = node.opacity * node.fill.opacity();
        let _ = match node.geometry {
            ShapeGeometry::Circle => writeln!(
                self.output,
                r#"<ellipse cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" fill="{}" fill-opacity="{:.3}"{}/>"#,
                frame.center().x,
                frame.center().y,
                frame.width() / 2.0,
                frame.height() / 2.0,
                fill,
                opacity,
                drag_attr(node.draggable),
            ),
            ShapeGeometry::Square => writeln!(
                self.output,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.3}"{}/>"#,
                frame.x0,
                frame.y0,
                frame.width(),
                frame.height(),
                fill,
                opacity,
                drag_attr(node.draggable),
            ),
            ShapeGeometry::Triangle => {
                let points = [
                    Point::new(frame.center().x, frame.y0),
                    Point::new(frame.x1, frame.y1),
                    Point::new(frame.x0, frame.y1),
                ]
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
                writeln!(
                    self.output,
                    r#"<polygon points="{}" fill="{}" fill-opacity="{:.3}"{}/>"#,
                    points,
                    fill,
                    opacity,
                    drag_attr(node.draggable),
                )
            }
        };
        if node.selected {
            self.push_outline(frame, ctx);
        }
    }

    fn push_component(&mut self, node: &ComponentNode, container: Rect, ctx: &RenderContext) {
        let frame = node.frame(container);
        let _ = match &node.content {
            ComponentContent::Text(text) | ComponentContent::Number(text) => writeln!(
                self.output,
                r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" font-family="{}" fill="{}" dominant-baseline="hanging"{}>{}</text>"#,
                frame.x0,
                frame.y0,
                node.font_size,
                escape(&node.font_family),
                node.color.to_hex(),
                drag_attr(node.draggable),
                escape(text),
            ),
            ComponentContent::Image(url) => writeln!(
                self.output,
                r#"<image href="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid meet"{}/>"#,
                escape(ctx.image_source(url)),
                frame.x0,
                frame.y0,
                frame.width(),
                frame.height(),
                drag_attr(node.draggable),
            ),
        };
        if node.selected {
            self.push_outline(frame, ctx);
        }
    }

    fn push_outline(&mut self, frame: Rect, ctx: &RenderContext) {
        let _ = writeln!(
            self.output,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            frame.x0,
            frame.y0,
            frame.width(),
            frame.height(),
            Swatch::from(ctx.selection_color).to_hex(),
            SELECTION_STROKE_WIDTH,
        );
    }

    /// Pinned to the bottom edge, full width.
    fn push_articles(&mut self, panel: &ArticlesPanel, container: Rect) {
        let height = PANEL_PADDING * 2.0 + PANEL_LINE_HEIGHT * (panel.lines.len() + 1) as f64;
        let top = (container.y1 - height).max(container.y0);
        let color = panel.color.to_hex();
        let _ = writeln!(self.output, r#"<g class="articles">"#);
        let _ = writeln!(
            self.output,
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#ffffff" fill-opacity="0.8"/>"##,
            container.x0,
            top,
            container.width(),
            container.y1 - top,
        );
        let x = container.x0 + PANEL_PADDING;
        let mut y = top + PANEL_PADDING;
        let _ = writeln!(
            self.output,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" font-weight="bold" fill="{}" dominant-baseline="hanging">{}</text>"#,
            x,
            y,
            PANEL_FONT_SIZE,
            color,
            escape(&panel.title),
        );
        for line in &panel.lines {
            y += PANEL_LINE_HEIGHT;
            let _ = writeln!(
                self.output,
                r#"<text x="{:.2}" y="{:.2}" font-size="{}" fill="{}" dominant-baseline="hanging">{}</text>"#,
                x,
                y,
                PANEL_FONT_SIZE,
                color,
                escape(line),
            );
        }
        let _ = writeln!(self.output, "</g>");
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let size = ctx.logical_size();
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RenderError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        let container = Rect::from_origin_size(Point::ZERO, size);
        let tree = ctx.tree;

        self.output.clear();
        let _ = writeln!(
            self.output,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.2} {h:.2}">"#,
            w = size.width,
            h = size.height,
        );
        let _ = writeln!(
            self.output,
            r#"<rect x="0" y="0" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            size.width,
            size.height,
            Swatch::from(self.background_color(ctx)).to_hex(),
        );
        for node in &tree.shapes {
            self.push_shape(node, container, ctx);
        }
        for node in &tree.components {
            self.push_component(node, container, ctx);
        }
        if let Some(panel) = &tree.articles {
            self.push_articles(panel, container);
        }
        self.output.push_str("</svg>\n");

        log::debug!(
            "Rendered SVG: {} shapes, {} components",
            tree.shapes.len(),
            tree.components.len()
        );
        Ok(())
    }
}

fn drag_attr(draggable: bool) -> &'static str {
    if draggable { r#" style="cursor:move""# } else { "" }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
