//! Configuration types for Boxes diagram rendering.
//!
//! This module provides the structures that control how diagrams are laid
//! out and styled. All types implement [`serde::Deserialize`] so they can be
//! loaded from a TOML file; every field is optional and falls back to the
//! defaults listed below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Spacings handed to the layout engine and the renderer.
//! - [`StyleConfig`] - Colour table additions and the default edge colour.
//!
//! # Example
//!
//! ```
//! # use boxes::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().node_spacing(), 40.0);
//! assert!(config.style().colour_table().is_ok());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use boxes_core::color::{Color, ColourTable};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Spacing and geometry settings.
///
/// The spacing values become options of the layout graph and are honoured by
/// the layout engine; `corner_radius`, `canvas_padding` and `label_padding`
/// are used by the SVG renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_spacing: f32,
    layer_spacing: f32,
    component_spacing: f32,
    edge_node_spacing: f32,
    edge_edge_spacing: f32,
    edge_node_between_layers: f32,
    edge_edge_between_layers: f32,
    edge_label_spacing: f32,
    corner_radius: f32,
    canvas_padding: f32,
    label_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 40.0,
            layer_spacing: 160.0,
            component_spacing: 40.0,
            edge_node_spacing: 35.0,
            edge_edge_spacing: 25.0,
            edge_node_between_layers: 50.0,
            edge_edge_between_layers: 30.0,
            edge_label_spacing: 10.0,
            corner_radius: 12.0,
            canvas_padding: 60.0,
            label_padding: 4.0,
        }
    }
}

impl LayoutConfig {
    /// Gap between sibling boxes in the same layer.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Gap between consecutive layers along the flow direction.
    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    /// Gap between disconnected parts of the same container.
    pub fn component_spacing(&self) -> f32 {
        self.component_spacing
    }

    pub fn edge_node_spacing(&self) -> f32 {
        self.edge_node_spacing
    }

    pub fn edge_edge_spacing(&self) -> f32 {
        self.edge_edge_spacing
    }

    pub fn edge_node_between_layers(&self) -> f32 {
        self.edge_node_between_layers
    }

    pub fn edge_edge_between_layers(&self) -> f32 {
        self.edge_edge_between_layers
    }

    pub fn edge_label_spacing(&self) -> f32 {
        self.edge_label_spacing
    }

    /// Maximum radius used to round edge bends.
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Blank margin around the laid-out content.
    pub fn canvas_padding(&self) -> f32 {
        self.canvas_padding
    }

    /// Minimum clearance between edge labels.
    pub fn label_padding(&self) -> f32 {
        self.label_padding
    }

    /// Returns a copy with a different node spacing.
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Returns a copy with a different layer spacing.
    pub fn with_layer_spacing(mut self, spacing: f32) -> Self {
        self.layer_spacing = spacing;
        self
    }

    /// Returns a copy with a different corner radius.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}

/// Visual styling configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Extra or overriding colour names, e.g. `teal = "#008080"`.
    colours: IndexMap<String, String>,

    /// Stroke colour for edges that name no colour.
    default_edge_colour: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            colours: IndexMap::new(),
            default_edge_colour: "#555".to_string(),
        }
    }
}

impl StyleConfig {
    /// Adds or overrides a named colour.
    pub fn with_colour(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.colours.insert(name.into(), value.into());
        self
    }

    /// Builds the colour table: the built-in names plus the configured entries.
    ///
    /// # Errors
    ///
    /// Returns an error naming the entry when a configured value is not a
    /// valid CSS color.
    pub fn colour_table(&self) -> Result<ColourTable, String> {
        let mut table = ColourTable::default();
        for (name, value) in &self.colours {
            table
                .insert(name, value)
                .map_err(|err| format!("Invalid colour `{name}` in config: {err}"))?;
        }
        Ok(table)
    }

    /// Returns the parsed default edge colour.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid CSS color.
    pub fn default_edge_colour(&self) -> Result<Color, String> {
        Color::new(&self.default_edge_colour)
            .map_err(|err| format!("Invalid default edge colour in config: {err}"))
    }
}
