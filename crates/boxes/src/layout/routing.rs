//! Port placement and orthogonal edge routing.

use std::collections::HashMap;

use log::{trace, warn};

use boxes_core::{
    geometry::{Bounds, Point, Size},
    semantic::PortSide,
};

use crate::graph::{
    EdgeSection, LayoutGraph, LayoutNode, LayoutPort, PositionedEdge, PositionedGraph,
    PositionedPort, ROOT_ID,
};

const ALIGNED_TOLERANCE: f32 = 0.5;

/// Ancestry of every node in a layout graph.
///
/// Each node maps to the ids from the outermost box down to itself; a port
/// resolves through the node that declares it.
pub(super) struct Hierarchy<'a> {
    paths: HashMap<&'a str, Vec<&'a str>>,
    port_owners: HashMap<&'a str, &'a str>,
}

impl<'a> Hierarchy<'a> {
    pub(super) fn new(graph: &'a LayoutGraph) -> Self {
        let mut hierarchy = Self {
            paths: HashMap::new(),
            port_owners: HashMap::new(),
        };
        hierarchy.collect(&graph.children, &[]);
        hierarchy
    }

    fn collect(&mut self, nodes: &'a [LayoutNode], parent: &[&'a str]) {
        for node in nodes {
            let mut path = parent.to_vec();
            path.push(node.id.as_str());
            for port in &node.ports {
                self.port_owners.insert(port.id.as_str(), node.id.as_str());
            }
            self.collect(&node.children, &path);
            self.paths.insert(node.id.as_str(), path);
        }
    }

    /// Path of the node an endpoint (node or port id) belongs to.
    pub(super) fn path_of(&self, endpoint: &str) -> Option<&[&'a str]> {
        let node = self
            .port_owners
            .get(endpoint)
            .copied()
            .unwrap_or(endpoint);
        self.paths.get(node).map(Vec::as_slice)
    }

    fn is_port(&self, endpoint: &str) -> bool {
        self.port_owners.contains_key(endpoint)
    }
}

/// Deepest node containing both endpoints without being one of them.
///
/// `None` is the root.
fn lowest_common_container<'a>(source: &[&'a str], target: &[&'a str]) -> Option<&'a str> {
    let mut depth = source
        .iter()
        .zip(target)
        .take_while(|(a, b)| a == b)
        .count();
    if depth == source.len() || depth == target.len() {
        depth = depth.saturating_sub(1);
    }
    depth.checked_sub(1).map(|index| source[index])
}

/// Spreads the ports of each side evenly along it, centred on the boundary.
pub(super) fn place_ports(ports: &[LayoutPort], size: Size) -> Vec<PositionedPort> {
    ports
        .iter()
        .enumerate()
        .map(|(index, port)| {
            let count = ports.iter().filter(|other| other.side == port.side).count();
            let rank = ports[..index]
                .iter()
                .filter(|other| other.side == port.side)
                .count();
            let along = (rank + 1) as f32 / (count + 1) as f32;
            let center = match port.side {
                PortSide::North => Point::new(size.width() * along, 0.0),
                PortSide::South => Point::new(size.width() * along, size.height()),
                PortSide::West => Point::new(0.0, size.height() * along),
                PortSide::East => Point::new(size.width(), size.height() * along),
            };
            PositionedPort {
                id: port.id.clone(),
                x: center.x() - port.width / 2.0,
                y: center.y() - port.height / 2.0,
                width: port.width,
                height: port.height,
            }
        })
        .collect()
}

fn center(bounds: Bounds) -> Point {
    Point::new(
        bounds.min_x() + bounds.width() / 2.0,
        bounds.min_y() + bounds.height() / 2.0,
    )
}

/// Point on the node's boundary facing `toward` along the main axis.
fn boundary_anchor(bounds: Bounds, toward: Point, horizontal: bool) -> Point {
    let middle = center(bounds);
    if horizontal {
        let x = if toward.x() >= middle.x() {
            bounds.max_x()
        } else {
            bounds.min_x()
        };
        Point::new(x, middle.y())
    } else {
        let y = if toward.y() >= middle.y() {
            bounds.max_y()
        } else {
            bounds.min_y()
        };
        Point::new(middle.x(), y)
    }
}

/// Bends of an orthogonal route: none when the ends are aligned, otherwise
/// two at the midpoint of the main axis.
pub(super) fn orthogonal_bends(start: Point, end: Point, horizontal: bool) -> Vec<Point> {
    if horizontal {
        if (start.y() - end.y()).abs() < ALIGNED_TOLERANCE {
            return Vec::new();
        }
        let middle = (start.x() + end.x()) / 2.0;
        vec![Point::new(middle, start.y()), Point::new(middle, end.y())]
    } else {
        if (start.x() - end.x()).abs() < ALIGNED_TOLERANCE {
            return Vec::new();
        }
        let middle = (start.y() + end.y()) / 2.0;
        vec![Point::new(start.x(), middle), Point::new(end.x(), middle)]
    }
}

/// Routes every resolvable edge of `graph` over the positioned nodes.
///
/// Sections are expressed relative to the edge's container. Edges whose
/// endpoints cannot be found are skipped.
pub(super) fn route_edges(
    graph: &LayoutGraph,
    hierarchy: &Hierarchy<'_>,
    positioned: &PositionedGraph,
    horizontal: bool,
) -> Vec<PositionedEdge> {
    let mut node_bounds: HashMap<&str, Bounds> = HashMap::new();
    let mut port_centers: HashMap<&str, Point> = HashMap::new();
    positioned.walk(&mut |node, origin, _| {
        node_bounds.insert(
            node.id.as_str(),
            Bounds::new_from_top_left(origin, Size::new(node.width, node.height)),
        );
        for port in &node.ports {
            port_centers.insert(port.id.as_str(), origin.add_point(port.center()));
        }
    });

    let owner_bounds = |endpoint: &str| -> Option<Bounds> {
        let path = hierarchy.path_of(endpoint)?;
        node_bounds.get(path.last()?).copied()
    };

    let mut routed = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let (Some(source), Some(target)) = (edge.sources.first(), edge.targets.first()) else {
            warn!(edge = edge.id.as_str(); "Skipping edge without endpoints");
            continue;
        };
        let resolved = hierarchy
            .path_of(source)
            .zip(hierarchy.path_of(target))
            .zip(owner_bounds(source.as_str()).zip(owner_bounds(target.as_str())));
        let Some(((source_path, target_path), (source_bounds, target_bounds))) = resolved else {
            warn!(
                edge = edge.id.as_str(),
                source = source.as_str(),
                target = target.as_str();
                "Skipping edge with unresolved endpoint"
            );
            continue;
        };

        let start = if hierarchy.is_port(source) {
            port_centers.get(source.as_str()).copied()
        } else {
            None
        }
        .unwrap_or_else(|| boundary_anchor(source_bounds, center(target_bounds), horizontal));
        let end = if hierarchy.is_port(target) {
            port_centers.get(target.as_str()).copied()
        } else {
            None
        }
        .unwrap_or_else(|| boundary_anchor(target_bounds, center(source_bounds), horizontal));

        let container = lowest_common_container(source_path, target_path);
        let origin = positioned.absolute_origin(container);
        let bend_points = orthogonal_bends(start, end, horizontal)
            .into_iter()
            .map(|point| point.sub_point(origin))
            .collect();

        trace!(edge = edge.id.as_str(), container:?; "Routed edge");

        routed.push(PositionedEdge {
            id: edge.id.clone(),
            container: Some(container.unwrap_or(ROOT_ID).to_string()),
            sections: vec![EdgeSection {
                start: start.sub_point(origin),
                end: end.sub_point(origin),
                bend_points,
            }],
            labels: edge.labels.clone(),
        });
    }
    routed
}
