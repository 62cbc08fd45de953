//! Diagram element types for the semantic model.

use std::{fmt, str::FromStr};

use crate::identifier::Id;

/// Direction of a port relative to its box.
///
/// Unrecognised directions are kept verbatim so the validator can report them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PortDirection {
    #[default]
    In,
    Out,
    Unknown(String),
}

impl PortDirection {
    /// Parses a `dir` value from a document. Matching is exact (`in` / `out`).
    pub fn parse(text: &str) -> Self {
        match text {
            "in" => Self::In,
            "out" => Self::Out,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the direction as written in the document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Unknown(text) => text,
        }
    }

    /// Short upper-case tag used in the legend port table.
    pub fn legend_tag(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out | Self::Unknown(_) => "OUT",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A side of a box's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSide {
    North,
    South,
    East,
    West,
}

impl PortSide {
    /// Upper-case name used as a layout option value.
    pub fn layout_name(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
        }
    }
}

impl FromStr for PortSide {
    type Err = &'static str;

    /// Parses `north`, `south`, `east` or `west`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            _ => Err("Invalid port side"),
        }
    }
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// A named connection point on a box.
///
/// # Examples
///
/// ```
/// # use boxes_core::semantic::{Port, PortDirection, PortSide};
/// let port = Port::new("PortIn", PortDirection::In).with_label("Input");
/// assert_eq!(port.label(), "Input");
/// assert_eq!(port.side(), None);
///
/// let bare = Port::new("PortOut", PortDirection::Out).with_side(Some(PortSide::South));
/// assert_eq!(bare.label(), "PortOut");
/// assert_eq!(bare.side(), Some(PortSide::South));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: String,
    direction: PortDirection,
    label: Option<String>,
    side: Option<PortSide>,
}

impl Port {
    pub fn new(id: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            id: id.into(),
            direction,
            label: None,
            side: None,
        }
    }

    /// Sets the display label. Without one the port id is shown.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets an explicit boundary side that overrides the direction-derived one.
    pub fn with_side(mut self, side: Option<PortSide>) -> Self {
        self.side = side;
        self
    }

    /// The port id, unique within its box.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> &PortDirection {
        &self.direction
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn side(&self) -> Option<PortSide> {
        self.side
    }
}

/// Per-box visual overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStyle {
    background: Option<String>,
    color: Option<String>,
}

impl BoxStyle {
    pub fn new(background: Option<String>, color: Option<String>) -> Self {
        Self { background, color }
    }

    /// Fill override.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Stroke and title colour override.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

/// A box in the diagram tree.
///
/// A box with children is *compound*; one without is a *leaf*. Leaves whose
/// label differs from the name and spans several lines are drawn as *full*
/// boxes with the label inside; every other leaf is drawn *compact*.
///
/// # Examples
///
/// ```
/// # use boxes_core::semantic::BoxNode;
/// let leaf = BoxNode::new("Inner A", 1);
/// assert_eq!(leaf.id(), "Inner_A");
/// assert_eq!(leaf.label(), "Inner A");
/// assert!(!leaf.is_compound());
///
/// let outer = BoxNode::new("Outer", 0).with_children(vec![leaf]);
/// assert!(outer.is_compound());
/// assert_eq!(outer.iter().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoxNode {
    id: Id,
    name: String,
    label: Option<String>,
    description: Option<String>,
    technology: Option<String>,
    depth: usize,
    zoom: Option<String>,
    style: BoxStyle,
    ports: Vec<Port>,
    children: Vec<BoxNode>,
    is_actor: bool,
}

impl BoxNode {
    /// Creates a leaf box at the given nesting depth; the id is derived from `name`.
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        let name = name.into();
        Self {
            id: Id::from_name(&name),
            name,
            label: None,
            description: None,
            technology: None,
            depth,
            zoom: None,
            style: BoxStyle::default(),
            ports: Vec::new(),
            children: Vec::new(),
            is_actor: false,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_technology(mut self, technology: Option<String>) -> Self {
        self.technology = technology;
        self
    }

    pub fn with_zoom(mut self, zoom: Option<String>) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_ports(mut self, ports: Vec<Port>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_children(mut self, children: Vec<BoxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_actor(mut self, is_actor: bool) -> Self {
        self.is_actor = is_actor;
        self
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display text; falls back to the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    /// Nesting depth; top-level boxes are at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Cross-reference to a more detailed diagram.
    pub fn zoom(&self) -> Option<&str> {
        self.zoom.as_deref()
    }

    pub fn style(&self) -> &BoxStyle {
        &self.style
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Child boxes followed by actor boxes.
    pub fn children(&self) -> &[BoxNode] {
        &self.children
    }

    pub fn is_actor(&self) -> bool {
        self.is_actor
    }

    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` for a leaf drawn with its multi-line label inside the shape.
    pub fn is_full_label(&self) -> bool {
        !self.is_compound()
            && self
                .label
                .as_deref()
                .is_some_and(|label| label != self.name && label.contains('\n'))
    }

    /// Looks up a declared port by id.
    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.id == port_id)
    }

    /// Iterates this box and all its descendants in depth-first pre-order.
    pub fn iter(&self) -> BoxIter<'_> {
        BoxIter { stack: vec![self] }
    }
}

impl fmt::Display for BoxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Depth-first pre-order iterator over a box subtree.
#[derive(Debug)]
pub struct BoxIter<'a> {
    stack: Vec<&'a BoxNode>,
}

impl<'a> BoxIter<'a> {
    pub(crate) fn from_roots(roots: &'a [BoxNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for BoxIter<'a> {
    type Item = &'a BoxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// One end of an edge: a box name and an optional port id.
///
/// # Examples
///
/// ```
/// # use boxes_core::semantic::EdgeEndpoint;
/// let endpoint = EdgeEndpoint::parse("Inner B:PortIn");
/// assert_eq!(endpoint.box_name(), "Inner B");
/// assert_eq!(endpoint.port(), Some("PortIn"));
/// assert_eq!(endpoint.node_id(), "Inner_B_PortIn");
///
/// // Only the last colon separates the port.
/// let nested = EdgeEndpoint::parse("db:primary:in");
/// assert_eq!(nested.box_name(), "db:primary");
/// assert_eq!(nested.port(), Some("in"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEndpoint {
    box_name: String,
    port: Option<String>,
}

impl EdgeEndpoint {
    pub fn new(box_name: impl Into<String>, port: Option<String>) -> Self {
        Self {
            box_name: box_name.into(),
            port,
        }
    }

    /// Splits a `"Box Name[:Port]"` reference at its last colon.
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once(':') {
            Some((box_name, port)) => Self::new(box_name, Some(port.to_string())),
            None => Self::new(reference, None),
        }
    }

    pub fn box_name(&self) -> &str {
        &self.box_name
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// Sanitised id of the referenced box.
    pub fn box_id(&self) -> Id {
        Id::from_name(&self.box_name)
    }

    /// Id of the layout element the edge attaches to: the port if one is
    /// given, otherwise the box.
    pub fn node_id(&self) -> Id {
        let box_id = self.box_id();
        match &self.port {
            Some(port) => box_id.port(port),
            None => box_id,
        }
    }
}

impl fmt::Display for EdgeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.port {
            Some(port) => write!(f, "{}:{}", self.box_name, port),
            None => f.write_str(&self.box_name),
        }
    }
}

/// Stroke options for an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    color: Option<String>,
    dashed: bool,
}

impl EdgeStyle {
    pub fn new(color: Option<String>, dashed: bool) -> Self {
        Self { color, dashed }
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn is_dashed(&self) -> bool {
        self.dashed
    }
}

/// A directed connection between two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    from: EdgeEndpoint,
    to: EdgeEndpoint,
    label: Option<String>,
    colour: Option<String>,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(from: EdgeEndpoint, to: EdgeEndpoint) -> Self {
        Self {
            from,
            to,
            label: None,
            colour: None,
            style: EdgeStyle::default(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_colour(mut self, colour: Option<String>) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn from(&self) -> &EdgeEndpoint {
        &self.from
    }

    pub fn to(&self) -> &EdgeEndpoint {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    /// The colour name used to stroke this edge. `style.color` takes
    /// precedence over the top-level `colour` key.
    pub fn colour_name(&self) -> Option<&str> {
        self.style.color().or(self.colour.as_deref())
    }
}
