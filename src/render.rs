use crate::config::RenderConfig;
use crate::scene::{EdgeShape, MarkerKind, NodeGeometry, NodeShape, Scene, TextShape};
use crate::theme::Theme;
use anyhow::Result;
use log::info;
use std::path::Path;

/// Camera applied around the scene content when rendering into a host frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Frame size in screen pixels.
    pub width: f32,
    pub height: f32,
}

/// Standalone SVG sized to the scene's viewBox.
pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = scene.width;
    let height = scene.height;
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\" font-family=\"{}\">",
        escape_xml(&theme.font_family)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));
    push_definitions(&mut svg, theme);
    push_content(&mut svg, scene, theme);
    svg.push_str("</svg>");
    svg
}

/// SVG framed at the host's size with the camera applied to the content group.
pub fn render_svg_with_transform(scene: &Scene, theme: &Theme, transform: &ViewTransform) -> String {
    let mut svg = String::new();
    let width = transform.width;
    let height = transform.height;
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\" font-family=\"{}\">",
        escape_xml(&theme.font_family)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));
    push_definitions(&mut svg, theme);
    svg.push_str(&format!(
        "<g class=\"c4-viewport\" transform=\"translate({:.2} {:.2}) scale({:.4})\">",
        transform.translate_x, transform.translate_y, transform.scale
    ));
    push_content(&mut svg, scene, theme);
    svg.push_str("</g></svg>");
    svg
}

fn push_definitions(svg: &mut String, theme: &Theme) {
    svg.push_str("<defs>");
    for marker in [MarkerKind::Solid, MarkerKind::Dashed] {
        svg.push_str(&format!(
            "<marker id=\"{}\" markerWidth=\"12\" markerHeight=\"12\" refX=\"11\" refY=\"6\" orient=\"auto\" markerUnits=\"userSpaceOnUse\"><polygon points=\"0 0, 12 6, 0 12\" fill=\"{}\"/></marker>",
            marker.id(),
            escape_xml(&theme.line_color)
        ));
    }
    svg.push_str("</defs>");
}

fn push_content(svg: &mut String, scene: &Scene, theme: &Theme) {
    for edge in &scene.edges {
        push_edge(svg, edge, theme);
    }
    for node in &scene.nodes {
        push_node(svg, node, theme);
    }
}

fn push_edge(svg: &mut String, edge: &EdgeShape, theme: &Theme) {
    svg.push_str(&format!(
        "<g class=\"c4-relationship\" data-id=\"{}\">",
        escape_xml(&edge.id)
    ));
    let dash = if edge.dashed { "5,5" } else { "0" };
    let color = escape_xml(&edge.color);
    svg.push_str(&format!(
        "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"{dash}\" marker-end=\"url(#{})\"/>",
        edge.start.0,
        edge.start.1,
        edge.end.0,
        edge.end.1,
        color,
        edge.thickness,
        edge.marker.id()
    ));
    if let Some(label) = &edge.label {
        let bg = &label.background;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            bg.x,
            bg.y,
            bg.width,
            bg.height,
            escape_xml(&theme.edge_label_background),
            color
        ));
        push_text(svg, &label.text);
        if let Some(technology) = &label.technology {
            push_text(svg, technology);
        }
    }
    svg.push_str("</g>");
}

fn push_node(svg: &mut String, node: &NodeShape, theme: &Theme) {
    svg.push_str(&format!(
        "<g class=\"c4-element\" data-id=\"{}\">",
        escape_xml(&node.id)
    ));
    if let Some(highlight) = &node.highlight {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" fill=\"none\" stroke=\"{}\" stroke-width=\"3\" stroke-dasharray=\"5,5\"/>",
            highlight.x,
            highlight.y,
            highlight.width,
            highlight.height,
            escape_xml(&theme.selection_color)
        ));
    }

    let b = &node.bounds;
    let fill = escape_xml(&node.fill);
    let stroke = escape_xml(&node.stroke);
    match &node.geometry {
        NodeGeometry::Person {
            head_center,
            head_radius,
            body,
        } => {
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{head_radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
                head_center.0, head_center.1, fill, stroke
            ));
            svg.push_str(&format!(
                "<path d=\"M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
                body[0].0,
                body[0].1,
                body[1].0,
                body[1].1,
                body[2].0,
                body[2].1,
                body[3].0,
                body[3].1,
                fill,
                stroke
            ));
        }
        NodeGeometry::Cylinder {
            center_x,
            rx,
            ry,
            top_y,
            bottom_y,
        } => {
            // Body fill sits under both ellipses and the side lines.
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{top_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"none\"/>",
                b.x,
                b.width,
                bottom_y - top_y,
                fill
            ));
            svg.push_str(&format!(
                "<ellipse cx=\"{center_x:.2}\" cy=\"{top_y:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
                fill, stroke
            ));
            for x in [b.x, b.right()] {
                svg.push_str(&format!(
                    "<line x1=\"{x:.2}\" y1=\"{top_y:.2}\" x2=\"{x:.2}\" y2=\"{bottom_y:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
                    stroke
                ));
            }
            svg.push_str(&format!(
                "<ellipse cx=\"{center_x:.2}\" cy=\"{bottom_y:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
                fill, stroke
            ));
        }
        NodeGeometry::Box { corner_radius } => {
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{corner_radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
                b.x, b.y, b.width, b.height, fill, stroke
            ));
        }
    }

    for text in &node.texts {
        push_text(svg, text);
    }
    svg.push_str("</g>");
}

fn push_text(svg: &mut String, text: &TextShape) {
    let mut attrs = String::new();
    if let Some(weight) = text.weight.svg_value() {
        attrs.push_str(&format!(" font-weight=\"{weight}\""));
    }
    if text.italic {
        attrs.push_str(" font-style=\"italic\"");
    }
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\"{attrs} fill=\"{}\">{}</text>",
        text.x,
        text.y,
        text.font_size,
        escape_xml(&text.fill),
        escape_xml(&text.content)
    ));
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            info!(path:% = path.display(), bytes = svg.len(); "Wrote SVG");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: theme.font_family.clone(),
        ..usvg::Options::default()
    };
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid PNG size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    info!(path:% = output.display(), width = size.width(), height = size.height(); "Wrote PNG");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
