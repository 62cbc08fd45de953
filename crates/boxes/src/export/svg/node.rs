//! Box and port drawing.
//!
//! A box is drawn in one of three ways:
//!
//! - compound: a rounded boundary with its title in the top-left corner
//! - full leaf: a multi-line label centred inside a box that fills the node
//! - compact leaf: a 50 px shape holding the name, with technology and
//!   description captions beneath it
//!
//! Every box is wrapped in a group translated to the node's absolute
//! position within the content area.

use svg::node::{Text as SvgText, element as svg_element};

use boxes_core::{
    draw::{LayeredOutput, RenderLayer},
    geometry::Point,
    semantic::{BoxNode, StyleDefaults},
};

use crate::{graph::PositionedNode, transform::COMPACT_SHAPE_HEIGHT};

/// Stroke used when a box names no colour.
pub const DEFAULT_STROKE: &str = "#1B2A4A";

/// Fill of actor shapes without an explicit background.
pub const ACTOR_FILL: &str = "#E8DAEF";

const PORT_RADIUS: f32 = 5.0;

/// Resolved paint for one box.
#[derive(Debug, Clone)]
struct BoxPaint {
    fill: String,
    stroke: String,
    stroke_width: f32,
}

impl BoxPaint {
    fn new(
        model: Option<&BoxNode>,
        defaults: &StyleDefaults,
        depth: usize,
        resolve_colour: &dyn Fn(&str) -> String,
    ) -> Self {
        let style = model.map(BoxNode::style);
        let fill = style
            .and_then(|style| style.background())
            .unwrap_or_else(|| defaults.background(depth));
        let stroke = style
            .and_then(|style| style.color())
            .unwrap_or(DEFAULT_STROKE);
        Self {
            fill: resolve_colour(fill),
            stroke: resolve_colour(stroke),
            stroke_width: defaults.border_weight(depth),
        }
    }
}

fn translated(origin: Point) -> svg_element::Group {
    svg_element::Group::new().set(
        "transform",
        format!("translate({}, {})", origin.x(), origin.y()),
    )
}

fn text(x: f32, y: f32, content: &str) -> svg_element::Text {
    svg_element::Text::new("")
        .set("x", x)
        .set("y", y)
        .add(SvgText::new(content))
}

fn centred_text(width: f32, y: f32, content: &str, font_size: f32) -> svg_element::Text {
    text(width / 2.0, y, content)
        .set("text-anchor", "middle")
        .set("font-size", font_size)
}

fn rounded_rect(
    width: f32,
    height: f32,
    radius: f32,
    paint: &BoxPaint,
    fill: &str,
) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("width", width)
        .set("height", height)
        .set("rx", radius)
        .set("ry", radius)
        .set("fill", fill)
        .set("stroke", paint.stroke.as_str())
        .set("stroke-width", paint.stroke_width)
}

/// Draws one positioned node (without its children) at `origin`.
///
/// `model` is the box the node was built from; a node without one is drawn
/// as an unnamed compact box. Colour names are mapped through
/// `resolve_colour`.
pub fn render_node(
    node: &PositionedNode,
    model: Option<&BoxNode>,
    defaults: &StyleDefaults,
    origin: Point,
    depth: usize,
    resolve_colour: &dyn Fn(&str) -> String,
) -> LayeredOutput {
    let paint = BoxPaint::new(model, defaults, depth, resolve_colour);
    let mut output = LayeredOutput::new();

    if node.is_compound() {
        output.add_to_layer(
            RenderLayer::Container,
            Box::new(render_compound(node, model, &paint, origin)),
        );
    } else if model.is_some_and(BoxNode::is_full_label) {
        output.add_to_layer(
            RenderLayer::Node,
            Box::new(render_full_leaf(node, model, &paint, origin)),
        );
    } else {
        output.add_to_layer(
            RenderLayer::Node,
            Box::new(render_compact_leaf(node, model, &paint, origin)),
        );
    }

    if !node.ports.is_empty() {
        let ports = node.ports.iter().fold(translated(origin), |group, port| {
            let center = port.center();
            group.add(
                svg_element::Circle::new()
                    .set("class", "port")
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", PORT_RADIUS)
                    .set("fill", paint.stroke.as_str())
                    .set("stroke", "white")
                    .set("stroke-width", 1.5),
            )
        });
        output.add_to_layer(RenderLayer::Port, Box::new(ports));
    }

    output
}

fn render_compound(
    node: &PositionedNode,
    model: Option<&BoxNode>,
    paint: &BoxPaint,
    origin: Point,
) -> svg_element::Group {
    let mut group = translated(origin).add(rounded_rect(
        node.width,
        node.height,
        6.0,
        paint,
        &paint.fill,
    ));

    let label = node.labels.first().map(String::as_str).unwrap_or_default();
    if !label.is_empty() {
        let title = label.split('\n').enumerate().fold(
            svg_element::Text::new("")
                .set("x", 12)
                .set("y", 22)
                .set("font-size", 13)
                .set("font-weight", "bold")
                .set("fill", paint.stroke.as_str()),
            |title, (index, line)| {
                title.add(
                    svg_element::TSpan::new("")
                        .set("x", 12)
                        .set("dy", if index == 0 { 0 } else { 16 })
                        .add(SvgText::new(line)),
                )
            },
        );
        group = group.add(title);
    }

    if let Some(zoom) = model.and_then(BoxNode::zoom) {
        let lines = label.split('\n').count() as f32;
        group = group.add(
            text(12.0, 22.0 + lines * 16.0 + 2.0, &format!("\u{2192} Zoom in: {zoom}"))
                .set("font-size", 10)
                .set("font-style", "italic")
                .set("fill", "#666"),
        );
    }
    group
}

fn render_full_leaf(
    node: &PositionedNode,
    model: Option<&BoxNode>,
    paint: &BoxPaint,
    origin: Point,
) -> svg_element::Group {
    let (width, height) = (node.width, node.height);
    let mut group = translated(origin).add(rounded_rect(width, height, 8.0, paint, &paint.fill));

    let label = model.map(BoxNode::label).unwrap_or_default();
    let lines: Vec<&str> = label.split('\n').collect();
    let line_height = 18.0;
    let start_y = (height - lines.len() as f32 * line_height) / 2.0 + 14.0;
    for (index, line) in lines.iter().enumerate() {
        let y = start_y + index as f32 * line_height;
        let line_text = match index {
            0 => centred_text(width, y, line, 14.0)
                .set("font-weight", "bold")
                .set("fill", paint.stroke.as_str()),
            1 => centred_text(width, y, line, 11.0).set("fill", "#555"),
            _ => centred_text(width, y, line, 10.0).set("fill", "#777"),
        };
        group = group.add(line_text);
    }

    if let Some(zoom) = model.and_then(BoxNode::zoom) {
        group = group.add(
            centred_text(width, height - 8.0, &format!("\u{2192} {zoom}"), 9.0)
                .set("font-style", "italic")
                .set("fill", "#666"),
        );
    }
    group
}

fn render_compact_leaf(
    node: &PositionedNode,
    model: Option<&BoxNode>,
    paint: &BoxPaint,
    origin: Point,
) -> svg_element::Group {
    let width = node.width;
    let shape_height = COMPACT_SHAPE_HEIGHT;
    let is_actor = model.is_some_and(BoxNode::is_actor);
    let explicit_fill = model.is_some_and(|model| model.style().background().is_some());

    let (radius, fill) = if is_actor {
        let fill = if explicit_fill { paint.fill.as_str() } else { ACTOR_FILL };
        ((shape_height / 2.0).min(20.0), fill)
    } else {
        (8.0, paint.fill.as_str())
    };
    let mut group =
        translated(origin).add(rounded_rect(width, shape_height, radius, paint, fill));

    let Some(model) = model else {
        return group;
    };

    if !model.name().is_empty() {
        group = group.add(
            centred_text(width, shape_height / 2.0 + 5.0, model.name(), 13.0)
                .set("font-weight", "bold")
                .set("fill", paint.stroke.as_str()),
        );
    }

    let mut below_y = shape_height + 15.0;
    if let Some(technology) = model.technology() {
        group = group.add(
            centred_text(width, below_y, &format!("[{technology}]"), 10.0)
                .set("font-style", "italic")
                .set("fill", "#666"),
        );
        below_y += 14.0;
    }

    let description_lines = model.description().map_or(0, |description| {
        description.split('\n').count()
    });
    if let Some(description) = model.description() {
        for (index, line) in description.split('\n').enumerate() {
            group = group.add(
                centred_text(width, below_y + index as f32 * 13.0, line, 10.0).set("fill", "#555"),
            );
        }
    }

    if let Some(zoom) = model.zoom() {
        let gap = if model.description().is_some() { 4.0 } else { 0.0 };
        let zoom_y = below_y + description_lines as f32 * 12.0 + gap;
        group = group.add(
            centred_text(width, zoom_y, &format!("\u{2192} {zoom}"), 9.0)
                .set("font-style", "italic")
                .set("fill", "#666"),
        );
    }
    group
}
