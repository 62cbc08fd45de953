//! Lowering from the raw document schema into the semantic model.
//!
//! Defaults live here: labels fall back to names, ports default to `in`,
//! the flow defaults to `LR`, the resolution to 150 dpi, and the style block
//! is merged over the built-in defaults field by field.

use log::{trace, warn};

use boxes_core::semantic::{
    BoxNode, BoxStyle, Diagram, Edge, EdgeEndpoint, EdgeStyle, FlowDirection, Legend, Metadata,
    Port, PortDirection, PortSide, StyleDefaults,
};

use crate::document::{
    OneOrMany, RawBox, RawBoxMap, RawDocument, RawEdge, RawEdgeStyle, RawMetadata, RawPort,
    RawStyle, Scalar,
};

/// Text of a scalar, treating an empty string like a missing value.
fn text(value: Option<Scalar>) -> Option<String> {
    value.map(|Scalar(text)| text).filter(|text| !text.is_empty())
}

pub(crate) fn lower_document(document: RawDocument) -> Diagram {
    let raw_boxes = document.boxes.unwrap_or_default();
    let actors = collect_actor_names(&raw_boxes);
    let boxes = lower_boxes(raw_boxes, 0);
    let edges = document
        .edges
        .unwrap_or_default()
        .into_iter()
        .map(lower_edge)
        .collect();

    let flow = text(document.flow)
        .map(|flow| FlowDirection::parse(&flow))
        .unwrap_or_default();
    let dpi = document
        .dpi
        .filter(|dpi| *dpi > 0)
        .unwrap_or(Diagram::DEFAULT_DPI);

    let legend = document
        .legend
        .map(|legend| {
            let edge_colours = legend
                .edge_colours
                .unwrap_or_default()
                .into_iter()
                .map(|(colour, Scalar(description))| (colour, description))
                .collect();
            Legend::new(edge_colours, legend.port_table.unwrap_or(false))
        })
        .unwrap_or_default();

    Diagram::new(text(document.diagram))
        .with_title(text(document.title))
        .with_flow(flow)
        .with_dpi(dpi)
        .with_style(lower_style(document.style))
        .with_boxes(boxes)
        .with_actors(actors)
        .with_edges(edges)
        .with_legend(legend)
        .with_metadata(document.metadata.map(lower_metadata))
}

fn lower_style(style: Option<RawStyle>) -> StyleDefaults {
    let defaults = StyleDefaults::default();
    let Some(style) = style else {
        return defaults;
    };

    let font = text(style.font).unwrap_or_else(|| defaults.font().to_string());
    let border_weights = style
        .border_weight
        .map(OneOrMany::into_vec)
        .unwrap_or_else(|| defaults.border_weights().to_vec());
    let backgrounds = style
        .backgrounds
        .map(|backgrounds| {
            backgrounds
                .into_vec()
                .into_iter()
                .map(|Scalar(background)| background)
                .collect()
        })
        .unwrap_or_else(|| defaults.backgrounds().to_vec());

    StyleDefaults::new(font, border_weights, backgrounds)
}

fn lower_boxes(raw: RawBoxMap, depth: usize) -> Vec<BoxNode> {
    raw.into_iter()
        .map(|(name, definition)| lower_box(name, definition.unwrap_or_default(), depth))
        .collect()
}

fn lower_box(name: String, raw: RawBox, depth: usize) -> BoxNode {
    let mut children = lower_boxes(raw.children.unwrap_or_default(), depth + 1);
    children.extend(lower_actor_entries(
        raw.actors.unwrap_or_default(),
        depth + 1,
    ));

    let ports = lower_ports(&name, raw.ports.unwrap_or_default());
    let style = raw.style.map(lower_box_style).unwrap_or_default();

    trace!(name, depth, children = children.len(); "Lowered box");

    BoxNode::new(name, depth)
        .with_label(text(raw.label))
        .with_description(text(raw.description))
        .with_technology(text(raw.technology))
        .with_zoom(text(raw.zoom))
        .with_style(style)
        .with_ports(ports)
        .with_children(children)
        .with_actor(raw.actor.unwrap_or(false))
}

/// Entries of a box's `actors` map become leaf children flagged as actors.
/// Actors carry no technology, zoom or children of their own.
fn lower_actor_entries(raw: RawBoxMap, depth: usize) -> Vec<BoxNode> {
    raw.into_iter()
        .map(|(name, definition)| {
            let raw = definition.unwrap_or_default();
            let ports = lower_ports(&name, raw.ports.unwrap_or_default());
            let style = raw.style.map(lower_box_style).unwrap_or_default();
            BoxNode::new(name, depth)
                .with_label(text(raw.label))
                .with_description(text(raw.description))
                .with_style(style)
                .with_ports(ports)
                .with_actor(true)
        })
        .collect()
}

fn lower_box_style(style: crate::document::RawBoxStyle) -> BoxStyle {
    BoxStyle::new(text(style.background), text(style.color))
}

fn lower_ports(
    box_name: &str,
    raw: indexmap::IndexMap<String, Option<RawPort>>,
) -> Vec<Port> {
    raw.into_iter()
        .map(|(id, definition)| {
            let raw = definition.unwrap_or_default();
            let direction = text(raw.dir)
                .map(|dir| PortDirection::parse(&dir))
                .unwrap_or_default();
            let side = text(raw.side).and_then(|side| match side.parse::<PortSide>() {
                Ok(side) => Some(side),
                Err(_) => {
                    warn!(box_name, port = id, side; "Ignoring unrecognised port side");
                    None
                }
            });
            let port = Port::new(id, direction).with_side(side);
            match text(raw.label) {
                Some(label) => port.with_label(label),
                None => port,
            }
        })
        .collect()
}

fn lower_edge(raw: RawEdge) -> Edge {
    let from = EdgeEndpoint::parse(&text(raw.from).unwrap_or_default());
    let to = EdgeEndpoint::parse(&text(raw.to).unwrap_or_default());

    let style = match raw.style {
        None => EdgeStyle::default(),
        Some(RawEdgeStyle::Keyword(keyword)) => match keyword.trim() {
            "dashed" => EdgeStyle::new(None, true),
            "solid" | "" => EdgeStyle::default(),
            other => {
                warn!(from:% = from, to:% = to, style = other; "Unknown edge style, drawing solid");
                EdgeStyle::default()
            }
        },
        Some(RawEdgeStyle::Options(options)) => {
            EdgeStyle::new(text(options.color), options.dashed.unwrap_or(false))
        }
    };

    Edge::new(from, to)
        .with_label(text(raw.label))
        .with_colour(text(raw.colour))
        .with_style(style)
}

fn lower_metadata(raw: RawMetadata) -> Metadata {
    Metadata {
        author: text(raw.author),
        date: text(raw.date),
        version: text(raw.version),
        status: text(raw.status),
        scope: text(raw.scope),
    }
}

/// Names of every actor in the document: boxes flagged `actor: true` and the
/// keys of every `actors` map, visited in document order.
fn collect_actor_names(raw: &RawBoxMap) -> Vec<String> {
    let mut names = Vec::new();
    for (name, definition) in raw {
        let Some(definition) = definition else {
            continue;
        };
        if definition.actor == Some(true) {
            names.push(name.clone());
        }
        if let Some(actors) = &definition.actors {
            names.extend(actors.keys().cloned());
        }
        if let Some(children) = &definition.children {
            names.extend(collect_actor_names(children));
        }
    }
    names
}
