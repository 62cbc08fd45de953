//! Top-level diagram structures.

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;

use crate::semantic::element::{BoxIter, BoxNode, Edge, PortDirection};

/// Primary direction in which edges flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    /// A value that is not one of `LR`, `RL`, `TB`, `BT`, kept for reporting.
    Unknown(String),
}

impl FlowDirection {
    /// Accepted spellings, in the order they are listed in error messages.
    pub const VALID: [&'static str; 4] = ["LR", "TB", "RL", "BT"];

    /// Parses a `flow` value. Matching is exact and case-sensitive.
    pub fn parse(text: &str) -> Self {
        match text {
            "LR" => Self::LeftToRight,
            "RL" => Self::RightToLeft,
            "TB" => Self::TopToBottom,
            "BT" => Self::BottomToTop,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
            Self::Unknown(text) => text,
        }
    }

    /// Returns `true` for `LR` and `RL`.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram-wide style defaults, indexed by nesting depth where relevant.
///
/// Lookups past the end of a per-depth list clamp to its last entry.
///
/// # Examples
///
/// ```
/// # use boxes_core::semantic::StyleDefaults;
/// let style = StyleDefaults::new(
///     "Helvetica".to_string(),
///     vec![3.0, 2.0],
///     vec!["white".to_string(), "#F4F6F7".to_string()],
/// );
/// assert_eq!(style.border_weight(0), 3.0);
/// assert_eq!(style.border_weight(5), 2.0);
/// assert_eq!(style.background(7), "#F4F6F7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    font: String,
    border_weights: Vec<f32>,
    backgrounds: Vec<String>,
}

impl StyleDefaults {
    pub fn new(font: String, border_weights: Vec<f32>, backgrounds: Vec<String>) -> Self {
        Self {
            font,
            border_weights,
            backgrounds,
        }
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn border_weights(&self) -> &[f32] {
        &self.border_weights
    }

    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    /// Stroke width for a box at `depth`; `1` when no weights are configured.
    pub fn border_weight(&self, depth: usize) -> f32 {
        match self.border_weights.len() {
            0 => 1.0,
            len => self.border_weights[depth.min(len - 1)],
        }
    }

    /// Fill for a box at `depth`; `white` when no backgrounds are configured.
    pub fn background(&self, depth: usize) -> &str {
        match self.backgrounds.len() {
            0 => "white",
            len => &self.backgrounds[depth.min(len - 1)],
        }
    }
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            border_weights: vec![3.0],
            backgrounds: vec!["white".to_string()],
        }
    }
}

/// Legend configuration: colour name → description plus the port table flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    edge_colours: IndexMap<String, String>,
    port_table: bool,
}

impl Legend {
    pub fn new(edge_colours: IndexMap<String, String>, port_table: bool) -> Self {
        Self {
            edge_colours,
            port_table,
        }
    }

    /// Colour entries in declaration order.
    pub fn edge_colours(&self) -> &IndexMap<String, String> {
        &self.edge_colours
    }

    pub fn port_table(&self) -> bool {
        self.port_table
    }
}

/// Document metadata shown under the title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub author: Option<String>,
    pub date: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
    pub scope: Option<String>,
}

impl Metadata {
    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.date.is_none()
            && self.version.is_none()
            && self.status.is_none()
            && self.scope.is_none()
    }

    /// The one-line summary: `status | v{version} | author | date | scope`,
    /// skipping unset fields.
    ///
    /// # Examples
    ///
    /// ```
    /// # use boxes_core::semantic::Metadata;
    /// let metadata = Metadata {
    ///     status: Some("Draft".to_string()),
    ///     version: Some("1.2".to_string()),
    ///     date: Some("2024-05-01".to_string()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(metadata.summary(), "Draft | v1.2 | 2024-05-01");
    /// ```
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = &self.status {
            parts.push(status.clone());
        }
        if let Some(version) = &self.version {
            parts.push(format!("v{version}"));
        }
        parts.extend(
            [&self.author, &self.date, &self.scope]
                .into_iter()
                .flatten()
                .cloned(),
        );
        parts.join(" | ")
    }
}

/// A port together with its owning box, as listed in the legend port table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortEntry<'a> {
    pub box_name: &'a str,
    pub port_label: &'a str,
    pub direction: &'a PortDirection,
}

/// A complete box diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    name: Option<String>,
    title: Option<String>,
    flow: FlowDirection,
    dpi: u32,
    style: StyleDefaults,
    boxes: Vec<BoxNode>,
    actors: Vec<String>,
    edges: Vec<Edge>,
    legend: Legend,
    metadata: Option<Metadata>,
}

impl Diagram {
    /// Default raster resolution.
    pub const DEFAULT_DPI: u32 = 150;

    /// Creates an empty diagram with the given `diagram` identifier.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            title: None,
            flow: FlowDirection::default(),
            dpi: Self::DEFAULT_DPI,
            style: StyleDefaults::default(),
            boxes: Vec::new(),
            actors: Vec::new(),
            edges: Vec::new(),
            legend: Legend::default(),
            metadata: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_flow(mut self, flow: FlowDirection) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_style(mut self, style: StyleDefaults) -> Self {
        self.style = style;
        self
    }

    pub fn with_boxes(mut self, boxes: Vec<BoxNode>) -> Self {
        self.boxes = boxes;
        self
    }

    pub fn with_actors(mut self, actors: Vec<String>) -> Self {
        self.actors = actors;
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Metadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// The `diagram` identifier; required by validation.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn flow(&self) -> &FlowDirection {
        &self.flow
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn style(&self) -> &StyleDefaults {
        &self.style
    }

    /// Top-level boxes.
    pub fn boxes(&self) -> &[BoxNode] {
        &self.boxes
    }

    /// Names of all actor boxes at any depth.
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Iterates every box in the tree, depth-first.
    pub fn iter_boxes(&self) -> BoxIter<'_> {
        BoxIter::from_roots(&self.boxes)
    }

    /// Every declared port in tree order, for the legend port table.
    pub fn all_ports(&self) -> Vec<PortEntry<'_>> {
        self.iter_boxes()
            .flat_map(|node| {
                node.ports().iter().map(move |port| PortEntry {
                    box_name: node.name(),
                    port_label: port.label(),
                    direction: port.direction(),
                })
            })
            .collect()
    }

    /// Builds an id → box lookup over the whole tree.
    pub fn box_index(&self) -> BoxIndex<'_> {
        BoxIndex::new(&self.boxes)
    }
}

/// Lookup table from sanitised box id to the box it names.
///
/// Built once per render and passed down explicitly. When ids collide the
/// box visited last wins; validation rejects such documents.
#[derive(Debug, Default)]
pub struct BoxIndex<'a> {
    boxes: HashMap<&'a str, &'a BoxNode>,
}

impl<'a> BoxIndex<'a> {
    pub fn new(roots: &'a [BoxNode]) -> Self {
        let boxes = BoxIter::from_roots(roots)
            .map(|node| (node.id().as_str(), node))
            .collect();
        Self { boxes }
    }

    pub fn get(&self, id: &str) -> Option<&'a BoxNode> {
        self.boxes.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
