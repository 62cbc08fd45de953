//! Layered layout backed by `rust-sugiyama`.
//!
//! Containers are laid out bottom-up: the children of a box are sized first,
//! then ranked and ordered by the Sugiyama algorithm over the edges that run
//! between them, then packed into layers with the spacings requested in the
//! graph options. Ports and edge routes are computed once every node has its
//! final position.

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace};
use rust_sugiyama::configure::Config;

use boxes_core::geometry::{Point, Size};

use super::{
    LayoutEngine,
    routing::{Hierarchy, place_ports, route_edges},
};
use crate::{
    error::BoxesError,
    graph::{LayoutGraph, LayoutNode, LayoutOptions, PositionedGraph, PositionedNode, options},
};

const COORDINATE_TOLERANCE: f64 = 1e-6;

/// Flow of the layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("LEFT") => Self::Left,
            Some(value) if value.eq_ignore_ascii_case("DOWN") => Self::Down,
            Some(value) if value.eq_ignore_ascii_case("UP") => Self::Up,
            _ => Self::Right,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }

    fn is_reversed(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

/// Spacings read from the root options.
#[derive(Debug, Clone, Copy)]
struct Spacing {
    node: f32,
    layer: f32,
    component: f32,
}

impl Spacing {
    fn from_options(options: &LayoutOptions) -> Self {
        Self {
            node: options.get_f32(options::SPACING_NODE_NODE).unwrap_or(40.0),
            layer: options
                .get_f32(options::SPACING_BETWEEN_LAYERS)
                .unwrap_or(160.0),
            component: options.get_f32(options::SPACING_COMPONENT).unwrap_or(40.0),
        }
    }
}

/// Layers of one connected component, each listing child indices in cross-axis order.
type Ranks = Vec<Vec<usize>>;

/// The default layout engine.
///
/// # Examples
///
/// ```
/// # use boxes::{config::LayoutConfig, layout::{LayoutEngine, SugiyamaEngine}, transform::transform};
/// let diagram = boxes_parser::parse("diagram: D\nboxes:\n  A:\n  B:\nedges:\n  - {from: A, to: B}\n").unwrap();
/// let graph = transform(&diagram, &LayoutConfig::default());
///
/// let positioned = SugiyamaEngine::new().layout(&graph).unwrap();
/// let (a, b) = (&positioned.children[0], &positioned.children[1]);
/// assert!(b.x >= a.x + a.width);
/// ```
#[derive(Debug, Clone)]
pub struct SugiyamaEngine {
    vertex_spacing: f64,
}

impl Default for SugiyamaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SugiyamaEngine {
    pub fn new() -> Self {
        Self {
            vertex_spacing: 10.0,
        }
    }

    /// Sets the spacing `rust-sugiyama` uses between vertices of a layer.
    ///
    /// Only the relative order of the returned coordinates is used, so this
    /// rarely needs changing.
    pub fn with_vertex_spacing(mut self, spacing: f64) -> Self {
        self.vertex_spacing = spacing;
        self
    }

    /// Ranks `count` children connected by `edges`.
    ///
    /// Returns one entry per connected component, in order of the lowest
    /// child index they contain. Children without edges form singleton
    /// components.
    fn rank(&self, count: usize, edges: &[(u32, u32)]) -> Result<Vec<Ranks>, BoxesError> {
        let mut components: Vec<Ranks> = Vec::new();
        let mut seen = vec![false; count];

        if !edges.is_empty() {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: self.vertex_spacing,
                ..Default::default()
            };
            let owned_edges = edges.to_vec();
            let layouts = std::panic::catch_unwind(move || {
                rust_sugiyama::from_edges(&owned_edges, &config)
            })
            .map_err(|err| {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("Rust-sugiyama layout engine panicked: {panic_msg}")
                } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                    format!("Rust-sugiyama layout engine panicked: {panic_msg}")
                } else {
                    "Rust-sugiyama layout engine panicked with unknown error".to_string()
                };
                BoxesError::Layout(message)
            })?;

            for (coords, _, _) in layouts {
                let members: Vec<(usize, f64, f64)> = coords
                    .into_iter()
                    .filter(|&(id, _)| id < count && !seen[id])
                    .map(|(id, (x, y))| (id, x, y))
                    .collect();
                if members.is_empty() {
                    continue;
                }
                for &(id, _, _) in &members {
                    seen[id] = true;
                }
                components.push(ranks_from_coordinates(&members, edges));
            }
        }

        for (index, _) in seen.iter().enumerate().filter(|(_, seen)| !**seen) {
            components.push(vec![vec![index]]);
        }
        components.sort_by_key(|ranks| ranks.iter().flatten().min().copied().unwrap_or(usize::MAX));
        Ok(components)
    }
}

/// Turns `rust-sugiyama` coordinates into layers.
///
/// Layers are the distinct y values. They are flipped when most edges would
/// otherwise point backwards, so sources always come first.
fn ranks_from_coordinates(members: &[(usize, f64, f64)], edges: &[(u32, u32)]) -> Ranks {
    let mut levels: Vec<f64> = members.iter().map(|&(_, _, y)| y).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < COORDINATE_TOLERANCE);

    let level_of = |y: f64| {
        levels
            .iter()
            .position(|level| (level - y).abs() < COORDINATE_TOLERANCE)
            .unwrap_or(0)
    };
    let mut rank_of: HashMap<usize, usize> = members
        .iter()
        .map(|&(id, _, y)| (id, level_of(y)))
        .collect();

    let (forward, backward) = edges
        .iter()
        .filter_map(|&(source, target)| {
            Some((
                *rank_of.get(&(source as usize))?,
                *rank_of.get(&(target as usize))?,
            ))
        })
        .fold((0usize, 0usize), |(forward, backward), (source, target)| {
            match source.cmp(&target) {
                std::cmp::Ordering::Less => (forward + 1, backward),
                std::cmp::Ordering::Greater => (forward, backward + 1),
                std::cmp::Ordering::Equal => (forward, backward),
            }
        });
    if backward > forward {
        let last = levels.len() - 1;
        for rank in rank_of.values_mut() {
            *rank = last - *rank;
        }
    }

    let mut layers: Vec<Vec<(f64, usize)>> = vec![Vec::new(); levels.len()];
    for &(id, x, _) in members {
        if let Some(&rank) = rank_of.get(&id) {
            layers[rank].push((x, id));
        }
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            layer.into_iter().map(|(_, id)| id).collect()
        })
        .collect()
}

/// Per-call state shared by the recursive placement.
struct Placement<'e, 'g> {
    engine: &'e SugiyamaEngine,
    graph: &'g LayoutGraph,
    hierarchy: &'e Hierarchy<'g>,
    direction: Direction,
    spacing: Spacing,
}

impl<'g> Placement<'_, 'g> {
    fn main_size(&self, size: Size) -> f32 {
        if self.direction.is_horizontal() {
            size.width()
        } else {
            size.height()
        }
    }

    fn cross_size(&self, size: Size) -> f32 {
        if self.direction.is_horizontal() {
            size.height()
        } else {
            size.width()
        }
    }

    fn to_point(&self, main: f32, cross: f32) -> Point {
        if self.direction.is_horizontal() {
            Point::new(main, cross)
        } else {
            Point::new(cross, main)
        }
    }

    fn to_size(&self, main: f32, cross: f32) -> Size {
        if self.direction.is_horizontal() {
            Size::new(main, cross)
        } else {
            Size::new(cross, main)
        }
    }

    /// Edges between distinct children of the container at `path`, as child index pairs.
    fn project_edges(&self, path: &[&str], nodes: &[LayoutNode]) -> Vec<(u32, u32)> {
        let index_of: HashMap<&str, u32> = nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| Some((node.id.as_str(), u32::try_from(index).ok()?)))
            .collect();
        let depth = path.len();
        let child_of = |endpoint: &str| -> Option<u32> {
            let endpoint_path = self.hierarchy.path_of(endpoint)?;
            if endpoint_path.len() <= depth || !endpoint_path.starts_with(path) {
                return None;
            }
            index_of.get(endpoint_path[depth]).copied()
        };

        let mut seen = HashSet::new();
        let mut projected = Vec::new();
        for edge in &self.graph.edges {
            let (Some(source), Some(target)) = (edge.sources.first(), edge.targets.first()) else {
                continue;
            };
            let (Some(source), Some(target)) = (child_of(source.as_str()), child_of(target.as_str()))
            else {
                continue;
            };
            if source != target && seen.insert((source, target)) {
                projected.push((source, target));
            }
        }
        projected
    }

    /// Places the children of the container at `path`; returns them with the content size.
    fn place_children(
        &self,
        path: &[&'g str],
        nodes: &'g [LayoutNode],
    ) -> Result<(Vec<PositionedNode>, Size), BoxesError> {
        let mut placed = nodes
            .iter()
            .map(|node| self.place_node(path, node))
            .collect::<Result<Vec<_>, _>>()?;
        if placed.is_empty() {
            return Ok((placed, Size::default()));
        }

        let sizes: Vec<Size> = placed
            .iter()
            .map(|node| Size::new(node.width, node.height))
            .collect();
        let edges = self.project_edges(path, nodes);
        let components = self.engine.rank(nodes.len(), &edges)?;
        trace!(
            container = path.last().copied().unwrap_or("root"),
            edges = edges.len(),
            components = components.len();
            "Ranked container"
        );

        let mut positions = vec![(0.0f32, 0.0f32); nodes.len()];
        let mut main_extent: f32 = 0.0;
        let mut cross_offset: f32 = 0.0;
        for (index, ranks) in components.iter().enumerate() {
            if index > 0 {
                cross_offset += self.spacing.component;
            }
            let (main, cross) = self.pack_component(ranks, &sizes, cross_offset, &mut positions);
            main_extent = main_extent.max(main);
            cross_offset += cross;
        }

        for (node, (main, cross)) in placed.iter_mut().zip(positions) {
            let main = if self.direction.is_reversed() {
                main_extent - main - self.main_size(Size::new(node.width, node.height))
            } else {
                main
            };
            let point = self.to_point(main, cross);
            node.x = point.x();
            node.y = point.y();
        }

        Ok((placed, self.to_size(main_extent, cross_offset)))
    }

    /// Packs one component into layers starting at `cross_offset`.
    ///
    /// Writes each member's `(main, cross)` position and returns the
    /// component's `(main, cross)` extent. Layers are centred on the cross axis.
    fn pack_component(
        &self,
        ranks: &Ranks,
        sizes: &[Size],
        cross_offset: f32,
        positions: &mut [(f32, f32)],
    ) -> (f32, f32) {
        let thickness: Vec<f32> = ranks
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|&index| self.main_size(sizes[index]))
                    .fold(0.0, f32::max)
            })
            .collect();
        let stacks: Vec<f32> = ranks
            .iter()
            .map(|layer| {
                let total: f32 = layer.iter().map(|&index| self.cross_size(sizes[index])).sum();
                total + self.spacing.node * layer.len().saturating_sub(1) as f32
            })
            .collect();
        let cross_extent = stacks.iter().copied().fold(0.0, f32::max);

        let mut main = 0.0;
        for ((layer, &layer_thickness), &stack) in ranks.iter().zip(&thickness).zip(&stacks) {
            let mut cross = cross_offset + (cross_extent - stack) / 2.0;
            for &index in layer {
                let size = sizes[index];
                positions[index] = (main + (layer_thickness - self.main_size(size)) / 2.0, cross);
                cross += self.cross_size(size) + self.spacing.node;
            }
            main += layer_thickness + self.spacing.layer;
        }
        let main_extent = thickness.iter().sum::<f32>()
            + self.spacing.layer * thickness.len().saturating_sub(1) as f32;
        (main_extent, cross_extent)
    }

    fn place_node(
        &self,
        parent: &[&'g str],
        node: &'g LayoutNode,
    ) -> Result<PositionedNode, BoxesError> {
        let mut path = parent.to_vec();
        path.push(node.id.as_str());

        let (children, size) = if node.is_compound() {
            let (mut children, content) = self.place_children(&path, &node.children)?;
            let padding = node.padding().unwrap_or_default();
            for child in &mut children {
                child.x += padding.left();
                child.y += padding.top();
            }
            let mut size = content.add_padding(padding);
            if let Some(minimum) = node.minimum_size() {
                size = size.max(minimum);
            }
            (children, size)
        } else {
            let declared = Size::new(node.width.unwrap_or(0.0), node.height.unwrap_or(0.0));
            let size = node
                .minimum_size()
                .map_or(declared, |minimum| declared.max(minimum));
            (Vec::new(), size)
        };

        Ok(PositionedNode {
            id: node.id.clone(),
            x: 0.0,
            y: 0.0,
            width: size.width(),
            height: size.height(),
            labels: node.labels.clone(),
            ports: place_ports(&node.ports, size),
            children,
        })
    }
}

impl LayoutEngine for SugiyamaEngine {
    fn layout(&self, graph: &LayoutGraph) -> Result<PositionedGraph, BoxesError> {
        let direction = Direction::from_option(graph.options.get(options::DIRECTION));
        let hierarchy = Hierarchy::new(graph);
        let placement = Placement {
            engine: self,
            graph,
            hierarchy: &hierarchy,
            direction,
            spacing: Spacing::from_options(&graph.options),
        };
        debug!(direction:?, spacing:? = placement.spacing; "Running layered layout");

        let (children, size) = placement.place_children(&[], &graph.children)?;
        let mut positioned = PositionedGraph {
            width: size.width(),
            height: size.height(),
            children,
            edges: Vec::new(),
        };
        positioned.edges = route_edges(graph, &hierarchy, &positioned, direction.is_horizontal());

        info!(
            width = positioned.width,
            height = positioned.height,
            edges = positioned.edges.len();
            "Layout complete"
        );
        Ok(positioned)
    }
}
