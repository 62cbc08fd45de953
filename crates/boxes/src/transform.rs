//! Lowering of the semantic model into a layout graph.
//!
//! [`transform`] is pure: it maps the box tree onto layout nodes, infers a
//! boundary side for every port from the flow direction, estimates the size
//! of every leaf from its text, and resolves edge endpoints to node or port
//! ids. Endpoint existence is not checked here; validation does that.

use log::{debug, trace};

use boxes_core::{
    geometry::{Insets, Size},
    semantic::{BoxNode, Diagram, Edge, FlowDirection, Port, PortDirection, PortSide},
};

use crate::{
    config::LayoutConfig,
    graph::{
        LayoutEdge, LayoutGraph, LayoutNode, LayoutOptions, LayoutPort, ROOT_ID, format_insets,
        format_size, options,
    },
};

/// Edge length of the square port handles.
pub const PORT_SIZE: f32 = 8.0;

/// Height of the visible shape of a compact leaf; captions render below it.
pub const COMPACT_SHAPE_HEIGHT: f32 = 50.0;

/// Space reserved inside compound boxes around their children.
pub const COMPOUND_PADDING: Insets = Insets::new(70.0, 24.0, 60.0, 24.0);

/// Builds the layout request for a diagram.
///
/// # Examples
///
/// ```
/// # use boxes::{config::LayoutConfig, transform::transform};
/// let diagram = boxes_parser::parse("diagram: D\nboxes:\n  A:\n  B:\nedges:\n  - {from: A, to: B}\n").unwrap();
/// let graph = transform(&diagram, &LayoutConfig::default());
///
/// assert_eq!(graph.id, "root");
/// assert_eq!(graph.children.len(), 2);
/// assert_eq!(graph.edges[0].id, "e0");
/// assert_eq!(graph.options.get("elk.direction"), Some("RIGHT"));
/// ```
pub fn transform(diagram: &Diagram, config: &LayoutConfig) -> LayoutGraph {
    let flow = diagram.flow();
    let children: Vec<LayoutNode> = diagram
        .boxes()
        .iter()
        .map(|node| transform_box(node, flow))
        .collect();
    let edges: Vec<LayoutEdge> = diagram
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| transform_edge(index, edge))
        .collect();

    debug!(
        direction = direction_name(flow),
        nodes = children.iter().map(|child| child.iter().count()).sum::<usize>(),
        edges = edges.len();
        "Built layout graph"
    );

    LayoutGraph {
        id: ROOT_ID.to_string(),
        options: root_options(flow, config),
        children,
        edges,
    }
}

/// Layout direction for a flow; unknown flows lay out left to right.
pub fn direction_name(flow: &FlowDirection) -> &'static str {
    match flow {
        FlowDirection::LeftToRight | FlowDirection::Unknown(_) => "RIGHT",
        FlowDirection::RightToLeft => "LEFT",
        FlowDirection::TopToBottom => "DOWN",
        FlowDirection::BottomToTop => "UP",
    }
}

/// Side a port sits on: its explicit side, otherwise inputs face the
/// incoming flow and outputs the outgoing flow.
///
/// Unknown directions are treated as outputs.
///
/// # Examples
///
/// ```
/// # use boxes::transform::port_side;
/// # use boxes_core::semantic::{FlowDirection, Port, PortDirection, PortSide};
/// let input = Port::new("in", PortDirection::In);
/// assert_eq!(port_side(&input, &FlowDirection::LeftToRight), PortSide::West);
/// assert_eq!(port_side(&input, &FlowDirection::TopToBottom), PortSide::North);
///
/// let pinned = Port::new("out", PortDirection::Out).with_side(Some(PortSide::North));
/// assert_eq!(port_side(&pinned, &FlowDirection::LeftToRight), PortSide::North);
/// ```
pub fn port_side(port: &Port, flow: &FlowDirection) -> PortSide {
    if let Some(side) = port.side() {
        return side;
    }
    let horizontal = flow.is_horizontal();
    match (port.direction(), horizontal) {
        (PortDirection::In, true) => PortSide::West,
        (PortDirection::In, false) => PortSide::North,
        (_, true) => PortSide::East,
        (_, false) => PortSide::South,
    }
}

/// Size of a leaf whose multi-line label is drawn inside the box.
pub fn full_leaf_size(label: &str) -> Size {
    let lines: Vec<&str> = label.split('\n').collect();
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    Size::new(
        (longest as f32 * 9.0 + 50.0).max(160.0),
        lines.len() as f32 * 20.0 + 40.0,
    )
}

/// Size of a compact leaf: the fixed-height shape plus the technology and
/// description captions rendered beneath it.
///
/// # Examples
///
/// ```
/// # use boxes::transform::compact_leaf_size;
/// let bare = compact_leaf_size(Some("API"), None, None);
/// assert_eq!((bare.width(), bare.height()), (150.0, 50.0));
///
/// let captioned = compact_leaf_size(Some("API"), Some("Rust"), Some("one\ntwo"));
/// assert_eq!(captioned.height(), 50.0 + 18.0 + 30.0 + 4.0);
/// ```
pub fn compact_leaf_size(
    name: Option<&str>,
    technology: Option<&str>,
    description: Option<&str>,
) -> Size {
    let mut longest = name.map_or(10, |name| name.chars().count());
    if let Some(technology) = technology {
        longest = longest.max(technology.chars().count() + 2);
    }
    let mut height = COMPACT_SHAPE_HEIGHT;
    if technology.is_some() {
        height += 18.0;
    }
    if let Some(description) = description {
        let lines: Vec<&str> = description.split('\n').collect();
        for line in &lines {
            longest = longest.max(line.chars().count());
        }
        height += lines.len() as f32 * 15.0 + 4.0;
    }
    Size::new((longest as f32 * 8.0 + 40.0).max(150.0), height)
}

/// Estimated size of a leaf box.
pub fn leaf_size(node: &BoxNode) -> Size {
    if node.is_full_label() {
        full_leaf_size(node.label())
    } else {
        let name = Some(node.name()).filter(|name| !name.is_empty());
        compact_leaf_size(name, node.technology(), node.description())
    }
}

fn root_options(flow: &FlowDirection, config: &LayoutConfig) -> LayoutOptions {
    LayoutOptions::new()
        .with(options::ALGORITHM, "layered")
        .with(options::DIRECTION, direction_name(flow))
        .with(options::HIERARCHY_HANDLING, "INCLUDE_CHILDREN")
        .with(options::EDGE_ROUTING, "ORTHOGONAL")
        .with(options::FAVOR_STRAIGHT_EDGES, true)
        .with(options::SPACING_NODE_NODE, config.node_spacing())
        .with(options::SPACING_BETWEEN_LAYERS, config.layer_spacing())
        .with(options::SPACING_COMPONENT, config.component_spacing())
        .with(options::SPACING_EDGE_NODE, config.edge_node_spacing())
        .with(options::SPACING_EDGE_EDGE, config.edge_edge_spacing())
        .with(
            options::SPACING_EDGE_NODE_BETWEEN_LAYERS,
            config.edge_node_between_layers(),
        )
        .with(
            options::SPACING_EDGE_EDGE_BETWEEN_LAYERS,
            config.edge_edge_between_layers(),
        )
        .with(options::SPACING_EDGE_LABEL, config.edge_label_spacing())
        .with(options::EDGE_LABEL_SIDE, "SMART_UP")
        .with(options::EDGE_LABEL_CENTER_STRATEGY, "MEDIAN_LAYER")
        .with(options::CROSSING_MINIMIZATION, "LAYER_SWEEP")
        .with(options::GREEDY_SWITCH, "TWO_SIDED")
        .with(options::GREEDY_SWITCH_HIERARCHICAL, "TWO_SIDED")
        .with(options::THOROUGHNESS, 7)
        .with(options::NODE_PLACEMENT, "BRANDES_KOEPF")
        .with(options::BK_ALIGNMENT, "BALANCED")
        .with(options::POST_COMPACTION, "EDGE_LENGTH")
        .with(options::CONNECTED_COMPONENTS, true)
}

fn transform_port(port: &Port, node: &BoxNode, flow: &FlowDirection) -> LayoutPort {
    let side = port_side(port, flow);
    LayoutPort {
        id: node.id().port(port.id()).to_string(),
        side,
        label: port.label().to_string(),
        width: PORT_SIZE,
        height: PORT_SIZE,
        options: LayoutOptions::new().with(options::PORT_SIDE, side.layout_name()),
    }
}

fn transform_box(node: &BoxNode, flow: &FlowDirection) -> LayoutNode {
    let ports: Vec<LayoutPort> = node
        .ports()
        .iter()
        .map(|port| transform_port(port, node, flow))
        .collect();
    let children: Vec<LayoutNode> = node
        .children()
        .iter()
        .map(|child| transform_box(child, flow))
        .collect();

    let mut layout_options = LayoutOptions::new();
    if !ports.is_empty() {
        layout_options.set(options::PORT_CONSTRAINTS, "FIXED_SIDE");
        layout_options.set(options::PORT_ALIGNMENT, "DISTRIBUTED");
        layout_options.set(options::SPACING_PORT_PORT, 20);
        layout_options.set(options::PORT_LABELS_PLACEMENT, "OUTSIDE");
        layout_options.set(options::PORT_LABELS_NEXT_TO_PORT, true);
        layout_options.set(
            options::SPACING_PORTS_SURROUNDING,
            format_insets(Insets::uniform(10.0)),
        );
    }

    let (width, height) = if node.is_compound() {
        layout_options.set(options::PADDING, format_insets(COMPOUND_PADDING));
        (None, None)
    } else {
        let size = leaf_size(node);
        layout_options.set(options::NODE_SIZE_CONSTRAINTS, "MINIMUM_SIZE");
        layout_options.set(options::NODE_SIZE_MINIMUM, format_size(size));
        (Some(size.width()), Some(size.height()))
    };

    trace!(id:% = node.id(), compound = node.is_compound(), width:?, height:?; "Transformed box");

    LayoutNode {
        id: node.id().to_string(),
        labels: vec![node.label().to_string()],
        ports,
        children,
        width,
        height,
        options: layout_options,
    }
}

fn transform_edge(index: usize, edge: &Edge) -> LayoutEdge {
    LayoutEdge {
        id: format!("e{index}"),
        sources: vec![edge.from().node_id().to_string()],
        targets: vec![edge.to().node_id().to_string()],
        labels: edge.label().map(str::to_string).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    const MINIMAL: &str = r#"
diagram: Test.Context
flow: LR
boxes:
  Outer:
    children:
      Inner A:
      Inner B:
        ports:
          PortIn: { dir: in, label: Input }
          PortOut: { dir: out, label: Output }
edges:
  - from: Inner A
    to: "Inner B:PortIn"
    label: data flow
"#;

    fn graph(source: &str) -> LayoutGraph {
        let diagram = boxes_parser::parse(source).unwrap();
        transform(&diagram, &LayoutConfig::default())
    }

    #[test]
    fn test_minimal_structure() {
        let graph = graph(MINIMAL);
        let outer = &graph.children[0];
        assert_eq!(outer.id, "Outer");
        assert!(outer.width.is_none() && outer.height.is_none());
        assert_eq!(
            outer.options.get(options::PADDING),
            Some("[top=70,left=24,bottom=60,right=24]")
        );

        let inner_b = &outer.children[1];
        assert_eq!(graph.find_node("Inner_B").map(|n| n.id.as_str()), Some("Inner_B"));
        assert!(graph.find_node("Inner_B_PortIn").is_none());
        assert_eq!(inner_b.ports[0].id, "Inner_B_PortIn");
        assert_eq!(inner_b.ports[0].label, "Input");
        assert_eq!(inner_b.ports[0].side, PortSide::West);
        assert_eq!(inner_b.ports[1].side, PortSide::East);
        assert_eq!(inner_b.options.get(options::PORT_CONSTRAINTS), Some("FIXED_SIDE"));
        assert_eq!(
            inner_b.options.get(options::SPACING_PORTS_SURROUNDING),
            Some("[top=10,left=10,bottom=10,right=10]")
        );
    }

    #[test]
    fn test_minimal_edge() {
        let graph = graph(MINIMAL);
        let edge = &graph.edges[0];
        assert_eq!(edge.id, "e0");
        assert_eq!(edge.sources, ["Inner_A"]);
        assert_eq!(edge.targets, ["Inner_B_PortIn"]);
        assert_eq!(edge.labels, ["data flow"]);
    }

    #[test]
    fn test_vertical_flow_port_sides() {
        let source = "diagram: D\nflow: TB\nboxes:\n  Svc:\n    ports:\n      a: { dir: in }\n      b: { dir: out }\n";
        let graph = graph(source);
        let ports = &graph.children[0].ports;
        assert_eq!(ports[0].side, PortSide::North);
        assert_eq!(ports[1].side, PortSide::South);
        assert_eq!(ports[0].options.get(options::PORT_SIDE), Some("NORTH"));
        assert_eq!(graph.options.get(options::DIRECTION), Some("DOWN"));
    }

    #[test]
    fn test_unknown_flow_falls_back_to_right() {
        let graph = graph("diagram: D\nflow: DIAGONAL\n");
        assert_eq!(graph.options.get(options::DIRECTION), Some("RIGHT"));
    }

    #[test]
    fn test_global_options_follow_config() {
        let diagram = boxes_parser::parse("diagram: D\n").unwrap();
        let config = LayoutConfig::default().with_node_spacing(55.0);
        let graph = transform(&diagram, &config);
        assert_eq!(graph.options.get(options::SPACING_NODE_NODE), Some("55"));
        assert_eq!(graph.options.get(options::SPACING_BETWEEN_LAYERS), Some("160"));
        assert_eq!(graph.options.get(options::THOROUGHNESS), Some("7"));
        assert_eq!(graph.options.get(options::CONNECTED_COMPONENTS), Some("true"));
    }

    #[test]
    fn test_full_leaf_sizing() {
        let source = "diagram: D\nboxes:\n  API:\n    label: \"Public API\\nREST over HTTPS\\nv2\"\n";
        let graph = graph(source);
        let api = &graph.children[0];
        // longest line is 15 chars: max(160, 15*9+50) = 185; 3 lines: 3*20+40
        assert_approx_eq!(f32, api.width.unwrap(), 185.0);
        assert_approx_eq!(f32, api.height.unwrap(), 100.0);
        assert_eq!(api.options.get(options::NODE_SIZE_MINIMUM), Some("(185,100)"));
        assert_eq!(api.labels, ["Public API\nREST over HTTPS\nv2"]);
    }

    #[test]
    fn test_compact_leaf_sizing() {
        let source = "diagram: D\nboxes:\n  Orders Database Cluster:\n    technology: PostgreSQL\n    description: Stores orders\n";
        let graph = graph(source);
        let db = &graph.children[0];
        // name is 23 chars: 23*8+40 = 224
        assert_approx_eq!(f32, db.width.unwrap(), 224.0);
        assert_approx_eq!(f32, db.height.unwrap(), 50.0 + 18.0 + 15.0 + 4.0);
        assert_eq!(
            db.options.get(options::NODE_SIZE_CONSTRAINTS),
            Some("MINIMUM_SIZE")
        );
    }

    #[test]
    fn test_actor_is_compact_leaf() {
        let source = "diagram: D\nboxes:\n  Team:\n    actors:\n      Analyst:\n";
        let graph = graph(source);
        let analyst = &graph.children[0].children[0];
        assert_eq!(analyst.id, "Analyst");
        assert_approx_eq!(f32, analyst.width.unwrap(), 150.0);
        assert_approx_eq!(f32, analyst.height.unwrap(), 50.0);
    }

    proptest! {
        #[test]
        fn compact_size_is_monotonic(
            name in "[a-z ]{1,30}",
            extra in "[a-z]{1,10}",
            technology in proptest::option::of("[a-z]{1,20}"),
            description in proptest::option::of("[a-z\n]{1,40}"),
        ) {
            let base = compact_leaf_size(Some(&name), technology.as_deref(), description.as_deref());
            let longer_name = format!("{name}{extra}");
            let grown = compact_leaf_size(Some(&longer_name), technology.as_deref(), description.as_deref());
            prop_assert!(grown.width() >= base.width());
            prop_assert!(grown.height() >= base.height());

            let longer_description = format!("{}\n{extra}", description.clone().unwrap_or_default());
            let taller = compact_leaf_size(Some(&name), technology.as_deref(), Some(&longer_description));
            prop_assert!(taller.height() >= base.height());
            prop_assert!(taller.width() >= base.width());
        }

        #[test]
        fn full_size_is_monotonic(lines in proptest::collection::vec("[a-z]{0,30}", 1..6), extra in "[a-z]{1,10}") {
            let label = lines.join("\n");
            let base = full_leaf_size(&label);
            let wider = full_leaf_size(&format!("{label}{extra}"));
            let taller = full_leaf_size(&format!("{label}\n{extra}"));
            prop_assert!(wider.width() >= base.width());
            prop_assert!(taller.height() > base.height());
            prop_assert!(base.width() >= 160.0);
        }
    }
}
