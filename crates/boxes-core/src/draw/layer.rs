//! Layer-based rendering for SVG output.
//!
//! # Overview
//!
//! - [`RenderLayer`]: the rendering layers, bottom to top
//! - [`LayeredOutput`]: collects SVG nodes per layer and emits them in order
//!
//! # Example
//!
//! ```
//! # use boxes_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Path, Rectangle};
//!
//! let mut output = LayeredOutput::new();
//!
//! // Added first, but edges render above containers.
//! output.add_to_layer(RenderLayer::Edge, Box::new(Path::new()));
//! output.add_to_layer(RenderLayer::Container, Box::new(Rectangle::new()));
//!
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers for a box diagram.
///
/// The `Ord` derive uses declaration order: the first variant renders first
/// (bottom), the last renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background, title and metadata line
    Background,
    /// Compound boxes (boundary rectangles and titles)
    Container,
    /// Leaf boxes and their captions
    Node,
    /// Port circles on box boundaries
    Port,
    /// Edge paths
    Edge,
    /// Edge label backgrounds and text
    Label,
    /// Legend panel
    Legend,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Container => "container",
            Self::Node => "node",
            Self::Port => "port",
            Self::Edge => "edge",
            Self::Label => "label",
            Self::Legend => "legend",
        }
    }
}

/// SVG nodes grouped by rendering layer.
///
/// Nodes within a layer keep their insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    ///
    /// # Example
    ///
    /// ```
    /// # use boxes_core::draw::{RenderLayer, LayeredOutput};
    /// # use svg::node::element::Rectangle;
    ///
    /// let mut output1 = LayeredOutput::new();
    /// output1.add_to_layer(RenderLayer::Node, Box::new(Rectangle::new()));
    ///
    /// let mut output2 = LayeredOutput::new();
    /// output2.add_to_layer(RenderLayer::Label, Box::new(Rectangle::new()));
    ///
    /// output1.merge(output2);
    /// assert_eq!(output1.render().len(), 2);
    /// ```
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g>` with a `data-layer` attribute.
    /// Empty layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable: keeps insertion order within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
