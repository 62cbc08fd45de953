//! Boxes - architecture diagrams from YAML.
//!
//! A Boxes document describes nested boxes with ports and the edges between
//! them. This crate runs the pipeline from the parsed model to a picture:
//! the model is turned into a layout graph ([`transform`]), positioned by a
//! [`LayoutEngine`](layout::LayoutEngine) ([`layout`]) and drawn as SVG or
//! PNG ([`export`]).

pub mod config;
pub mod export;
pub mod graph;
pub mod layout;
pub mod transform;

mod error;

pub use boxes_core::{color, geometry, identifier, semantic};

pub use error::BoxesError;

use log::{debug, info, trace};

use config::AppConfig;
use graph::{LayoutGraph, PositionedGraph};
use layout::{LayoutEngine, SugiyamaEngine};

/// Builder for parsing and rendering Boxes diagrams.
///
/// # Examples
///
/// ```rust
/// use boxes::{DiagramBuilder, config::AppConfig};
///
/// let source = "diagram: Demo\nboxes:\n  Web:\n  API:\nedges:\n  - {from: Web, to: API}\n";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.contains("<svg"));
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    engine: Box<dyn LayoutEngine>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder using the built-in layout engine.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engine: Box::new(SugiyamaEngine::new()),
        }
    }

    /// Replaces the layout engine.
    pub fn with_engine(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a YAML document into a semantic diagram.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Parse`] carrying the source text when the
    /// document is not valid YAML or not a mapping.
    pub fn parse(&self, source: &str) -> Result<semantic::Diagram, BoxesError> {
        info!("Parsing diagram");
        let diagram = boxes_parser::parse(source)
            .map_err(|err| BoxesError::new_parse_error(err, source))?;
        debug!(name:? = diagram.name(); "Diagram parsed successfully");
        Ok(diagram)
    }

    /// Check a diagram against the document schema.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Validation`] with every problem found.
    pub fn validate(&self, diagram: &semantic::Diagram) -> Result<(), BoxesError> {
        let errors = boxes_parser::validate(diagram);
        if errors.is_empty() {
            debug!("Diagram is valid");
            Ok(())
        } else {
            info!(count = errors.len(); "Diagram failed validation");
            Err(BoxesError::Validation(errors))
        }
    }

    /// Build the layout graph for a diagram.
    pub fn transform(&self, diagram: &semantic::Diagram) -> LayoutGraph {
        let graph = transform::transform(diagram, self.config.layout());
        debug!(
            nodes = graph.iter_nodes().count(),
            edges = graph.edges.len();
            "Layout graph built"
        );
        trace!(graph:?; "Layout graph");
        graph
    }

    /// Position a layout graph with the configured engine.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Layout`] when the engine fails.
    pub fn layout(&self, graph: &LayoutGraph) -> Result<PositionedGraph, BoxesError> {
        self.engine.layout(graph)
    }

    /// Validate, lay out and draw a diagram as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Validation`] for schema errors,
    /// [`BoxesError::Config`] for invalid configured colours and
    /// [`BoxesError::Layout`] when the engine fails.
    pub fn render_svg(&self, diagram: &semantic::Diagram) -> Result<String, BoxesError> {
        self.validate(diagram)?;

        let colours = self
            .config
            .style()
            .colour_table()
            .map_err(BoxesError::Config)?;
        let default_edge_colour = self
            .config
            .style()
            .default_edge_colour()
            .map_err(BoxesError::Config)?;

        info!("Building layout graph");
        let graph = self.transform(diagram);

        info!("Calculating layout");
        let positioned = self.layout(&graph)?;
        info!(width = positioned.width, height = positioned.height; "Layout calculated");

        let svg = export::svg::SvgBuilder::new(diagram)
            .with_layout_config(self.config.layout())
            .with_colours(colours)
            .with_default_edge_colour(default_edge_colour)
            .build()
            .render_to_string(&positioned);

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }

    /// Rasterise a rendered SVG document to PNG at `dpi`.
    ///
    /// # Errors
    ///
    /// Returns [`BoxesError::Export`] when rasterisation fails.
    #[cfg(feature = "png")]
    pub fn render_png(&self, svg: &str, dpi: u32) -> Result<Vec<u8>, BoxesError> {
        info!(dpi; "Rendering PNG");
        Ok(export::raster::export_png(svg, dpi)?)
    }
}
