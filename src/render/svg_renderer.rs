use std::fmt::Write as _;

use crate::error::ChartResult;
use crate::render::primitives::{Color, Primitive, TextHAlign};
use crate::render::surface::{DrawingSurface, MarkShape};
use crate::render::{Host, Renderer};

/// Serializes every surface of a host into a standalone SVG document.
///
/// Groups become translated `<g>` elements; layers draw in insertion order,
/// primitives before marks.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    documents: Vec<String>,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One document per surface from the last render, in surface order.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, host: &Host) -> ChartResult<()> {
        host.validate()?;
        self.documents = host.surfaces().iter().map(surface_to_svg).collect();
        Ok(())
    }
}

fn surface_to_svg(surface: &DrawingSurface) -> String {
    let viewport = surface.viewport();
    let mut svg = String::with_capacity(4096);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = viewport.width,
        h = viewport.height
    );
    for group in surface.groups() {
        let (dx, dy) = group.offset();
        let _ = writeln!(
            svg,
            r#"  <g class="{}" transform="translate({dx},{dy})">"#,
            escape(group.key())
        );
        for (key, layer) in group.layers() {
            let _ = writeln!(svg, r#"    <g class="{}">"#, escape(key));
            for primitive in layer.primitives() {
                let _ = writeln!(svg, "      {}", primitive_to_svg(primitive));
            }
            for mark in layer.marks() {
                let _ = writeln!(svg, "      {}", mark_to_svg(mark.shape));
            }
            svg.push_str("    </g>\n");
        }
        svg.push_str("  </g>\n");
    }
    svg.push_str("</svg>\n");
    svg
}

fn css(color: Color) -> String {
    if color.alpha >= 1.0 {
        color.to_hex()
    } else {
        format!(r#"{}" fill-opacity="{:.3}"#, color.to_hex(), color.alpha)
    }
}

fn stroke_css(color: Color) -> String {
    if color.alpha >= 1.0 {
        color.to_hex()
    } else {
        format!(r#"{}" stroke-opacity="{:.3}"#, color.to_hex(), color.alpha)
    }
}

fn primitive_to_svg(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Line(line) => format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            line.x1,
            line.y1,
            line.x2,
            line.y2,
            stroke_css(line.color),
            line.stroke_width
        ),
        Primitive::Rect(rect) => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            css(rect.fill)
        ),
        Primitive::Circle(circle) => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            circle.cx,
            circle.cy,
            circle.radius,
            css(circle.fill)
        ),
        Primitive::Polygon(polygon) => {
            let points = polygon
                .points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!(r#"<polygon points="{points}" fill="{}"/>"#, css(polygon.fill))
        }
        Primitive::Text(text) => {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            format!(
                r#"<text x="{}" y="{}" font-size="{}" text-anchor="{anchor}" fill="{}">{}</text>"#,
                text.x,
                text.y,
                text.font_size_px,
                css(text.color),
                escape(&text.text)
            )
        }
    }
}

fn mark_to_svg(shape: MarkShape) -> String {
    match shape {
        MarkShape::Circle(circle) => primitive_to_svg(&Primitive::Circle(circle)),
        MarkShape::Rect(rect) => primitive_to_svg(&Primitive::Rect(rect)),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::SvgRenderer;
    use crate::core::{Margin, Viewport};
    use crate::render::{
        Color, Host, LinePrimitive, Primitive, Renderer, TextHAlign, TextPrimitive, init_container,
        init_group,
    };

    #[test]
    fn renders_one_document_per_surface() {
        let mut host = Host::new();
        let surface = init_container(&mut host, Viewport::new(200.0, 100.0), false).expect("surface");
        let group = init_group(&mut host, surface, "panel-0", Margin::uniform(5.0), 0.0, 100.0, false)
            .expect("group");
        let layer = host.group_mut(&group).expect("group").layer_mut("grid");
        layer.push(Primitive::Line(LinePrimitive::new(
            0.0,
            0.0,
            10.0,
            0.0,
            1.0,
            Color::rgb(0.0, 0.0, 0.0),
        )));
        layer.push(Primitive::Text(TextPrimitive::new(
            "a<b",
            1.0,
            2.0,
            10.0,
            Color::rgb(0.0, 0.0, 0.0),
            TextHAlign::Center,
        )));
        init_container(&mut host, Viewport::new(200.0, 100.0), false).expect("second surface");

        let mut renderer = SvgRenderer::new();
        renderer.render(&host).expect("render");
        assert_eq!(renderer.documents().len(), 2);
        let first = &renderer.documents()[0];
        assert!(first.contains(r#"transform="translate(5,5)""#));
        assert!(first.contains("<line"));
        assert!(first.contains("a&lt;b"));
        assert!(first.contains(r#"text-anchor="middle""#));
    }
}
