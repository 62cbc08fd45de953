//! Layout graph types.
//!
//! The layout graph is the hand-off format between the transformer and a
//! [`LayoutEngine`](crate::layout::LayoutEngine). It follows the shape of the
//! ELK JSON graph format: a tree of nodes with ports, a flat edge list that
//! refers to node or port ids, and string key/value layout options at every
//! level.
//!
//! # Overview
//!
//! - [`LayoutGraph`], [`LayoutNode`], [`LayoutPort`], [`LayoutEdge`] - the request
//! - [`PositionedGraph`], [`PositionedNode`], [`PositionedPort`], [`PositionedEdge`] - the result
//! - [`LayoutOptions`] - ordered option map
//! - [`options`] - option keys understood by the built-in engine
//!
//! Positioned coordinates are relative: a node's `x`/`y` are measured from
//! its parent's origin, a port's from its node, and an edge's sections from
//! the node named by its `container` (the root when `None`).

use std::fmt;

use indexmap::IndexMap;

use boxes_core::{
    geometry::{Bounds, Insets, Point, Size},
    semantic::PortSide,
};

/// Id of the implicit root node.
pub const ROOT_ID: &str = "root";

/// Layout option keys.
pub mod options {
    pub const ALGORITHM: &str = "elk.algorithm";
    pub const DIRECTION: &str = "elk.direction";
    pub const HIERARCHY_HANDLING: &str = "elk.hierarchyHandling";
    pub const EDGE_ROUTING: &str = "elk.edgeRouting";
    pub const FAVOR_STRAIGHT_EDGES: &str = "elk.layered.nodePlacement.favorStraightEdges";
    pub const SPACING_NODE_NODE: &str = "elk.spacing.nodeNode";
    pub const SPACING_BETWEEN_LAYERS: &str = "elk.layered.spacing.nodeNodeBetweenLayers";
    pub const SPACING_COMPONENT: &str = "elk.spacing.componentComponent";
    pub const SPACING_EDGE_NODE: &str = "elk.spacing.edgeNode";
    pub const SPACING_EDGE_EDGE: &str = "elk.spacing.edgeEdge";
    pub const SPACING_EDGE_NODE_BETWEEN_LAYERS: &str =
        "elk.layered.spacing.edgeNodeBetweenLayers";
    pub const SPACING_EDGE_EDGE_BETWEEN_LAYERS: &str =
        "elk.layered.spacing.edgeEdgeBetweenLayers";
    pub const SPACING_EDGE_LABEL: &str = "elk.spacing.edgeLabel";
    pub const EDGE_LABEL_SIDE: &str = "elk.layered.edgeLabels.sideSelection";
    pub const EDGE_LABEL_CENTER_STRATEGY: &str =
        "elk.layered.edgeLabels.centerLabelPlacementStrategy";
    pub const CROSSING_MINIMIZATION: &str = "elk.layered.crossingMinimization.strategy";
    pub const GREEDY_SWITCH: &str = "elk.layered.crossingMinimization.greedySwitch.type";
    pub const GREEDY_SWITCH_HIERARCHICAL: &str =
        "elk.layered.crossingMinimization.greedySwitchHierarchical.type";
    pub const THOROUGHNESS: &str = "elk.layered.thoroughness";
    pub const NODE_PLACEMENT: &str = "elk.layered.nodePlacement.strategy";
    pub const BK_ALIGNMENT: &str = "elk.layered.nodePlacement.bk.fixedAlignment";
    pub const POST_COMPACTION: &str = "elk.layered.compaction.postCompaction.strategy";
    pub const CONNECTED_COMPONENTS: &str = "elk.layered.compaction.connectedComponents";

    pub const PORT_SIDE: &str = "elk.port.side";
    pub const PORT_CONSTRAINTS: &str = "elk.portConstraints";
    pub const PORT_ALIGNMENT: &str = "elk.portAlignment.default";
    pub const SPACING_PORT_PORT: &str = "elk.spacing.portPort";
    pub const PORT_LABELS_PLACEMENT: &str = "elk.portLabels.placement";
    pub const PORT_LABELS_NEXT_TO_PORT: &str = "elk.portLabels.nextToPortIfPossible";
    pub const SPACING_PORTS_SURROUNDING: &str = "elk.spacing.portsSurrounding";

    pub const PADDING: &str = "elk.padding";
    pub const NODE_SIZE_CONSTRAINTS: &str = "elk.nodeSize.constraints";
    pub const NODE_SIZE_MINIMUM: &str = "elk.nodeSize.minimum";
}

/// Ordered string key/value layout options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions(IndexMap<String, String>);

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, replacing any previous value but keeping its position.
    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Builder form of [`LayoutOptions::set`].
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parses an option as a number.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|value| value.trim().parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A port on a layout node.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPort {
    /// Globally unique id, `{boxId}_{portId}`.
    pub id: String,
    pub side: PortSide,
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub options: LayoutOptions,
}

/// A node of the layout request.
///
/// Leaves carry a width and height; compound nodes leave both unset and are
/// sized by the engine around their children.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub labels: Vec<String>,
    pub ports: Vec<LayoutPort>,
    pub children: Vec<LayoutNode>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub options: LayoutOptions,
}

impl LayoutNode {
    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }

    /// The `elk.nodeSize.minimum` option, if present and well formed.
    pub fn minimum_size(&self) -> Option<Size> {
        self.options
            .get(options::NODE_SIZE_MINIMUM)
            .and_then(parse_size)
    }

    /// The `elk.padding` option, if present and well formed.
    pub fn padding(&self) -> Option<Insets> {
        self.options.get(options::PADDING).and_then(parse_insets)
    }

    /// Iterates this node and all descendants, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// An edge of the layout request. Sources and targets name nodes or ports.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    /// `e{index}` in declaration order.
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub labels: Vec<String>,
}

/// The complete layout request.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGraph {
    pub id: String,
    pub options: LayoutOptions,
    pub children: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    /// Iterates every node in the graph, depth-first.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.children.iter().flat_map(LayoutNode::iter)
    }

    /// Finds a node by id anywhere in the tree.
    pub fn find_node(&self, id: &str) -> Option<&LayoutNode> {
        self.iter_nodes().find(|node| node.id == id)
    }

    /// Finds a port by its global id anywhere in the tree.
    pub fn find_port(&self, id: &str) -> Option<&LayoutPort> {
        self.iter_nodes()
            .flat_map(|node| node.ports.iter())
            .find(|port| port.id == id)
    }
}

/// A positioned port, relative to its node.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedPort {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PositionedPort {
    /// Centre of the port, relative to its node.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A positioned node, relative to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub labels: Vec<String>,
    pub ports: Vec<PositionedPort>,
    pub children: Vec<PositionedNode>,
}

impl PositionedNode {
    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(
            Point::new(self.x, self.y),
            Size::new(self.width, self.height),
        )
    }
}

/// One routed piece of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSection {
    pub start: Point,
    pub end: Point,
    pub bend_points: Vec<Point>,
}

impl EdgeSection {
    /// Start, bends and end, each moved by `offset`.
    pub fn points(&self, offset: Point) -> Vec<Point> {
        std::iter::once(self.start)
            .chain(self.bend_points.iter().copied())
            .chain(std::iter::once(self.end))
            .map(|point| point.add_point(offset))
            .collect()
    }
}

/// A routed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEdge {
    pub id: String,
    /// Node whose frame the sections are expressed in; `None` or `root` is the root frame.
    pub container: Option<String>,
    pub sections: Vec<EdgeSection>,
    pub labels: Vec<String>,
}

/// The result of running a layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionedGraph {
    pub width: f32,
    pub height: f32,
    pub children: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
}

impl PositionedGraph {
    /// Absolute origin of the node with the given id.
    ///
    /// `None` and `root` map to the root origin; an unknown id also falls
    /// back to the root origin.
    pub fn absolute_origin(&self, container: Option<&str>) -> Point {
        let Some(id) = container.filter(|id| *id != ROOT_ID) else {
            return Point::default();
        };
        find_origin(&self.children, id, Point::default()).unwrap_or_default()
    }

    /// Visits every node with its absolute origin, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a PositionedNode, Point, usize)) {
        fn walk_nodes<'a>(
            nodes: &'a [PositionedNode],
            origin: Point,
            depth: usize,
            visit: &mut dyn FnMut(&'a PositionedNode, Point, usize),
        ) {
            for node in nodes {
                let absolute = origin.add_point(Point::new(node.x, node.y));
                visit(node, absolute, depth);
                walk_nodes(&node.children, absolute, depth + 1, visit);
            }
        }
        walk_nodes(&self.children, Point::default(), 0, visit);
    }
}

fn find_origin(nodes: &[PositionedNode], id: &str, origin: Point) -> Option<Point> {
    nodes.iter().find_map(|node| {
        let absolute = origin.add_point(Point::new(node.x, node.y));
        if node.id == id {
            Some(absolute)
        } else {
            find_origin(&node.children, id, absolute)
        }
    })
}

/// Formats a size option value: `(w,h)`.
pub fn format_size(size: Size) -> String {
    format!("({},{})", size.width(), size.height())
}

/// Parses a `(w,h)` size option value.
pub fn parse_size(value: &str) -> Option<Size> {
    let inner = value.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (width, height) = inner.split_once(',')?;
    Some(Size::new(
        width.trim().parse().ok()?,
        height.trim().parse().ok()?,
    ))
}

/// Formats an insets option value: `[top=..,left=..,bottom=..,right=..]`.
pub fn format_insets(insets: Insets) -> String {
    format!(
        "[top={},left={},bottom={},right={}]",
        insets.top(),
        insets.left(),
        insets.bottom(),
        insets.right()
    )
}

/// Parses an insets option value. Missing sides are zero.
pub fn parse_insets(value: &str) -> Option<Insets> {
    let inner = value.trim().strip_prefix('[')?.strip_suffix(']')?;
    let (mut top, mut right, mut bottom, mut left) = (0.0, 0.0, 0.0, 0.0);
    for entry in inner.split(',').filter(|entry| !entry.trim().is_empty()) {
        let (key, number) = entry.split_once('=')?;
        let number: f32 = number.trim().parse().ok()?;
        match key.trim() {
            "top" => top = number,
            "right" => right = number,
            "bottom" => bottom = number,
            "left" => left = number,
            _ => return None,
        }
    }
    Some(Insets::new(top, right, bottom, left))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_size_option_round_trip() {
        let size = parse_size(&format_size(Size::new(160.0, 60.0))).unwrap();
        assert_approx_eq!(f32, size.width(), 160.0);
        assert_approx_eq!(f32, size.height(), 60.0);
        assert!(parse_size("160,60").is_none());
        assert!(parse_size("(a,b)").is_none());
    }

    #[test]
    fn test_insets_option() {
        let insets = parse_insets("[top=70,left=24,bottom=60,right=24]").unwrap();
        assert_approx_eq!(f32, insets.top(), 70.0);
        assert_approx_eq!(f32, insets.left(), 24.0);
        assert_approx_eq!(f32, insets.bottom(), 60.0);
        assert_approx_eq!(f32, insets.right(), 24.0);
        assert_eq!(
            format_insets(insets),
            "[top=70,left=24,bottom=60,right=24]"
        );
        assert!(parse_insets("[middle=3]").is_none());
    }

    #[test]
    fn test_options_keep_insertion_order() {
        let options = LayoutOptions::new()
            .with("b", 1)
            .with("a", "x")
            .with("b", 2);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(options.get("b"), Some("2"));
        assert_eq!(options.get_f32("b"), Some(2.0));
    }

    fn node(id: &str, x: f32, y: f32, children: Vec<PositionedNode>) -> PositionedNode {
        PositionedNode {
            id: id.to_string(),
            x,
            y,
            width: 10.0,
            height: 10.0,
            labels: Vec::new(),
            ports: Vec::new(),
            children,
        }
    }

    #[test]
    fn test_absolute_origin_accumulates() {
        let graph = PositionedGraph {
            width: 100.0,
            height: 100.0,
            children: vec![node(
                "outer",
                10.0,
                20.0,
                vec![node("inner", 5.0, 7.0, vec![])],
            )],
            edges: Vec::new(),
        };
        let origin = graph.absolute_origin(Some("inner"));
        assert_approx_eq!(f32, origin.x(), 15.0);
        assert_approx_eq!(f32, origin.y(), 27.0);
        assert_eq!(graph.absolute_origin(Some(ROOT_ID)), Point::default());
        assert_eq!(graph.absolute_origin(None), Point::default());
        assert_eq!(graph.absolute_origin(Some("missing")), Point::default());
    }

    #[test]
    fn test_walk_reports_depth() {
        let graph = PositionedGraph {
            children: vec![node("a", 0.0, 0.0, vec![node("b", 1.0, 1.0, vec![])])],
            ..Default::default()
        };
        let mut seen = Vec::new();
        graph.walk(&mut |node, _, depth| seen.push((node.id.clone(), depth)));
        assert_eq!(seen, vec![("a".to_string(), 0), ("b".to_string(), 1)]);
    }
}
