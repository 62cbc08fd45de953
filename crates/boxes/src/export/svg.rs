//! SVG rendering of positioned diagrams.
//!
//! [`Svg`] draws a [`PositionedGraph`] together with the [`Diagram`] it was
//! laid out from. The canvas holds, bottom to top: a white background with
//! the title and metadata line, the arrowhead definitions, the content group
//! (boxes, ports, edge paths, then edge labels) and the legend.
//!
//! # Submodules
//!
//! - [`path`] - rounded edge path data
//! - [`label_placement`] - collision-avoiding edge label positions
//! - [`markers`] - per-colour arrowheads
//! - [`legend`] - the legend panel
//!
//! # Example
//!
//! ```
//! # use boxes::{config::LayoutConfig, export::svg::SvgBuilder, layout::{LayoutEngine, SugiyamaEngine}, transform::transform};
//! let diagram = boxes_parser::parse("diagram: D\ntitle: Demo\nboxes:\n  A:\n  B:\nedges:\n  - {from: A, to: B, label: calls}\n").unwrap();
//! let positioned = SugiyamaEngine::new()
//!     .layout(&transform(&diagram, &LayoutConfig::default()))
//!     .unwrap();
//!
//! let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);
//! // text content is written on its own line
//! assert!(svg.lines().any(|line| line.trim() == "Demo"));
//! assert!(svg.lines().any(|line| line.trim() == "calls"));
//! ```

pub mod label_placement;
pub mod legend;
pub mod markers;
mod node;
pub mod path;

use log::{debug, warn};
use svg::node::{Text as SvgText, element as svg_element};

use boxes_core::{
    color::{Color, ColourTable},
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
    semantic::{Diagram, Edge},
};

use crate::{
    config::LayoutConfig,
    graph::{PositionedEdge, PositionedGraph},
};
use label_placement::{PlacedRects, find_label_position, label_size};

/// Edge stroke when neither the document nor the configuration names one.
pub const DEFAULT_EDGE_COLOUR: &str = "#555";

const TITLE_BAND: f32 = 40.0;
const METADATA_BAND: f32 = 20.0;
const TITLE_STRIP_HEIGHT: f32 = 50.0;

/// Builder for [`Svg`].
#[derive(Debug, Clone)]
pub struct SvgBuilder<'a> {
    diagram: &'a Diagram,
    layout: LayoutConfig,
    colours: ColourTable,
    default_edge_colour: Option<Color>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(diagram: &'a Diagram) -> Self {
        Self {
            diagram,
            layout: LayoutConfig::default(),
            colours: ColourTable::default(),
            default_edge_colour: None,
        }
    }

    /// Uses the corner radius, canvas padding and label padding of `layout`.
    pub fn with_layout_config(mut self, layout: &LayoutConfig) -> Self {
        self.layout = layout.clone();
        self
    }

    /// Replaces the table used to resolve colour names.
    pub fn with_colours(mut self, colours: ColourTable) -> Self {
        self.colours = colours;
        self
    }

    pub fn with_default_edge_colour(mut self, colour: Color) -> Self {
        self.default_edge_colour = Some(colour);
        self
    }

    pub fn build(self) -> Svg<'a> {
        let default_edge_colour = self
            .default_edge_colour
            .map_or_else(|| DEFAULT_EDGE_COLOUR.to_string(), |colour| colour.to_string());
        Svg {
            diagram: self.diagram,
            colours: self.colours,
            default_edge_colour,
            corner_radius: self.layout.corner_radius(),
            canvas_padding: self.layout.canvas_padding(),
            label_padding: self.layout.label_padding(),
        }
    }
}

/// SVG renderer for one diagram.
#[derive(Debug, Clone)]
pub struct Svg<'a> {
    diagram: &'a Diagram,
    colours: ColourTable,
    default_edge_colour: String,
    corner_radius: f32,
    canvas_padding: f32,
    label_padding: f32,
}

/// An edge ready to draw.
struct EdgePaint<'g> {
    edge: &'g PositionedEdge,
    model: Option<&'g Edge>,
    colour: String,
    points: Vec<Vec<Point>>,
}

impl<'a> Svg<'a> {
    /// Resolves a colour name through the table; unknown names are used verbatim.
    fn paint(&self, name: &str) -> String {
        match self.colours.resolve(name) {
            Some(colour) => colour.to_string(),
            None => {
                warn!(name; "Unknown colour name, using it verbatim");
                name.to_string()
            }
        }
    }

    fn model_edge(&self, edge: &PositionedEdge) -> Option<&'a Edge> {
        let index: usize = edge.id.strip_prefix('e')?.parse().ok()?;
        self.diagram.edges().get(index)
    }

    fn prepare_edges<'g>(&self, positioned: &'g PositionedGraph) -> Vec<EdgePaint<'g>>
    where
        'a: 'g,
    {
        positioned
            .edges
            .iter()
            .filter(|edge| !edge.sections.is_empty())
            .map(|edge| {
                let model = self.model_edge(edge);
                let colour = model
                    .and_then(Edge::colour_name)
                    .map_or_else(|| self.default_edge_colour.clone(), |name| self.paint(name));
                let origin = positioned.absolute_origin(edge.container.as_deref());
                let points = edge
                    .sections
                    .iter()
                    .map(|section| section.points(origin))
                    .collect();
                EdgePaint {
                    edge,
                    model,
                    colour,
                    points,
                }
            })
            .collect()
    }

    /// Title strips of compound boxes, in content coordinates.
    fn title_strips(positioned: &PositionedGraph) -> Vec<Bounds> {
        let mut strips = Vec::new();
        positioned.walk(&mut |node, origin, _| {
            if node.is_compound() && node.width > 0.0 && node.height > 0.0 {
                strips.push(Bounds::new_from_top_left(
                    origin,
                    Size::new(node.width, node.height.min(TITLE_STRIP_HEIGHT)),
                ));
            }
        });
        strips
    }

    fn render_edges(&self, edges: &[EdgePaint<'_>], placed: &mut PlacedRects) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for paint in edges {
            let dashed = paint.model.is_some_and(|edge| edge.style().is_dashed());
            for points in &paint.points {
                let mut path = svg_element::Path::new()
                    .set("d", path::rounded_path_data(points, self.corner_radius))
                    .set("fill", "none")
                    .set("stroke", paint.colour.as_str())
                    .set("stroke-width", 2)
                    .set(
                        "marker-end",
                        format!("url(#{})", markers::marker_id(&paint.colour)),
                    );
                if dashed {
                    path = path.set("stroke-dasharray", "6,3");
                }
                output.add_to_layer(RenderLayer::Edge, Box::new(path));
            }

            let label = paint
                .edge
                .labels
                .first()
                .map(String::as_str)
                .or_else(|| paint.model.and_then(Edge::label))
                .filter(|label| !label.is_empty());
            let (Some(label), Some(points)) = (label, paint.points.first()) else {
                continue;
            };

            let size = label_size(label);
            let placement = find_label_position(points, size, placed);
            placed.push(placement.rect);

            output.add_to_layer(
                RenderLayer::Label,
                Box::new(
                    svg_element::Rectangle::new()
                        .set("x", placement.rect.min_x())
                        .set("y", placement.rect.min_y())
                        .set("width", size.width())
                        .set("height", size.height())
                        .set("fill", "white")
                        .set("opacity", 0.85)
                        .set("rx", 2)
                        .set("ry", 2),
                ),
            );
            output.add_to_layer(
                RenderLayer::Label,
                Box::new(label_text(label, placement.anchor, &paint.colour)),
            );
        }
        output
    }

    /// Draws the diagram.
    pub fn render(&self, positioned: &PositionedGraph) -> svg::Document {
        let padding = self.canvas_padding;
        let metadata = self.diagram.metadata().filter(|metadata| !metadata.is_empty());
        let title_height = self.diagram.title().map_or(0.0, |_| TITLE_BAND)
            + metadata.map_or(0.0, |_| METADATA_BAND);
        let content_width = positioned.width + padding * 2.0;
        let content_height = positioned.height + padding * 2.0 + title_height;

        let index = self.diagram.box_index();
        let style = self.diagram.style();
        let resolve_colour = |name: &str| self.paint(name);
        let mut content = LayeredOutput::new();
        positioned.walk(&mut |node, origin, depth| {
            content.merge(node::render_node(
                node,
                index.get(&node.id),
                style,
                origin,
                depth,
                &resolve_colour,
            ));
        });

        let mut placed = PlacedRects::new(self.label_padding);
        for strip in Self::title_strips(positioned) {
            placed.push(strip);
        }
        let edges = self.prepare_edges(positioned);
        content.merge(self.render_edges(&edges, &mut placed));

        let ports = self.diagram.all_ports();
        let legend = legend::render_legend(
            self.diagram.legend(),
            &ports,
            content_height - padding,
            resolve_colour,
        );
        let legend_height = legend.as_ref().map_or(0.0, |panel| panel.height);

        let width = legend
            .as_ref()
            .map_or(content_width, |panel| content_width.max(panel.required_width()));
        let height = content_height + legend_height;
        debug!(width, height, placed_labels = placed.len(); "Rendering SVG");

        let mut background = LayeredOutput::new();
        background.add_to_layer(
            RenderLayer::Background,
            Box::new(
                svg_element::Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "white"),
            ),
        );
        if let Some(title) = self.diagram.title() {
            background.add_to_layer(
                RenderLayer::Background,
                Box::new(
                    centred_text(width / 2.0, 28.0, title)
                        .set("font-size", 18)
                        .set("font-weight", "bold")
                        .set("fill", "#1B2A4A"),
                ),
            );
        }
        if let Some(metadata) = metadata {
            background.add_to_layer(
                RenderLayer::Background,
                Box::new(
                    centred_text(width / 2.0, 46.0, &metadata.summary())
                        .set("font-size", 10)
                        .set("fill", "#888"),
                ),
            );
        }

        let marker_colours = std::iter::once(self.default_edge_colour.as_str())
            .chain(edges.iter().map(|paint| paint.colour.as_str()));

        let mut doc = svg::Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("font-family", format!("{}, Arial, sans-serif", style.font()));
        for node in background.render() {
            doc = doc.add(node);
        }
        doc = doc.add(markers::marker_definitions(marker_colours));

        let content_group = content.render().into_iter().fold(
            svg_element::Group::new().set(
                "transform",
                format!("translate({}, {})", padding, padding + title_height),
            ),
            |group, node| group.add(node),
        );
        doc = doc.add(content_group);

        if let Some(panel) = legend {
            for node in panel.output.render() {
                doc = doc.add(node);
            }
        }
        doc
    }

    /// Draws the diagram and serialises it.
    pub fn render_to_string(&self, positioned: &PositionedGraph) -> String {
        self.render(positioned).to_string()
    }
}

/// Text node contents of a serialised document, trimmed, in document order.
#[cfg(test)]
fn text_nodes(svg: &str) -> Vec<&str> {
    svg.split('>')
        .filter_map(|chunk| chunk.split('<').next())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

fn centred_text(x: f32, y: f32, content: &str) -> svg_element::Text {
    svg_element::Text::new("")
        .set("x", x)
        .set("y", y)
        .set("text-anchor", "middle")
        .add(SvgText::new(content))
}

/// Label text at `anchor`; multi-line labels grow upwards from it.
fn label_text(label: &str, anchor: Point, colour: &str) -> svg_element::Text {
    let lines: Vec<&str> = label.split('\n').collect();
    if lines.len() == 1 {
        return centred_text(anchor.x(), anchor.y() - 2.0, label)
            .set("font-size", 10)
            .set("fill", colour);
    }

    let start_y = anchor.y() - (lines.len() - 1) as f32 * 14.0 + 2.0;
    lines.iter().enumerate().fold(
        svg_element::Text::new("")
            .set("x", anchor.x())
            .set("y", start_y)
            .set("text-anchor", "middle")
            .set("font-size", 10)
            .set("fill", colour),
        |text, (index, line)| {
            text.add(
                svg_element::TSpan::new("")
                    .set("x", anchor.x())
                    .set("dy", if index == 0 { 0 } else { 14 })
                    .add(SvgText::new(*line)),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeSection, PositionedNode};

    fn leaf(id: &str, x: f32, y: f32) -> PositionedNode {
        PositionedNode {
            id: id.to_string(),
            x,
            y,
            width: 150.0,
            height: 50.0,
            labels: vec![id.to_string()],
            ports: Vec::new(),
            children: Vec::new(),
        }
    }

    fn two_boxes(edge_yaml: &str) -> (Diagram, PositionedGraph) {
        let source = format!("diagram: D\nboxes:\n  A:\n  B:\nedges:\n  - {edge_yaml}\n");
        let diagram = boxes_parser::parse(&source).unwrap();
        let positioned = PositionedGraph {
            width: 460.0,
            height: 50.0,
            children: vec![leaf("A", 0.0, 0.0), leaf("B", 310.0, 0.0)],
            edges: vec![PositionedEdge {
                id: "e0".to_string(),
                container: Some("root".to_string()),
                sections: vec![EdgeSection {
                    start: Point::new(150.0, 25.0),
                    end: Point::new(310.0, 25.0),
                    bend_points: Vec::new(),
                }],
                labels: Vec::new(),
            }],
        };
        (diagram, positioned)
    }

    #[test]
    fn test_canvas_dimensions() {
        let (diagram, positioned) = two_boxes("{from: A, to: B}");
        let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);
        assert!(svg.contains("width=\"580\""));
        assert!(svg.contains("height=\"170\""));
        assert!(svg.contains("viewBox=\"0 0 580 170\""));
        assert!(svg.contains("font-family=\"Helvetica, Arial, sans-serif\""));
        assert!(svg.contains("translate(60, 60)"));
    }

    #[test]
    fn test_straight_edge_and_default_marker() {
        let (diagram, positioned) = two_boxes("{from: A, to: B}");
        let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);
        assert!(svg.contains("d=\"M 150 25 L 310 25\""));
        assert!(svg.contains("stroke=\"#555\""));
        assert!(svg.contains("marker-end=\"url(#arrow-555)\""));
        assert!(svg.contains("id=\"arrow-555\""));
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_coloured_dashed_edge() {
        let (diagram, positioned) =
            two_boxes("{from: A, to: B, label: async, style: {color: blue, dashed: true}}");
        let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);
        assert!(svg.contains("stroke=\"#2E86C1\""));
        assert!(svg.contains("stroke-dasharray=\"6,3\""));
        assert!(svg.contains("id=\"arrow-2E86C1\""));
        assert!(svg.contains("id=\"arrow-555\""));
        assert!(text_nodes(&svg).contains(&"async"));
        assert!(svg.contains("opacity=\"0.85\""));
        // label anchored at the path midpoint, text 2 px above it
        assert!(svg.contains("x=\"230\""));
        assert!(svg.contains("y=\"23\""));
    }

    #[test]
    fn test_configured_default_edge_colour() {
        let (diagram, positioned) = two_boxes("{from: A, to: B}");
        let svg = SvgBuilder::new(&diagram)
            .with_default_edge_colour(Color::new("#123456").unwrap())
            .build()
            .render_to_string(&positioned);
        assert!(svg.contains("stroke=\"#123456\""));
        assert!(svg.contains("id=\"arrow-123456\""));
    }

    #[test]
    fn test_multi_line_label_tspans() {
        let text = label_text("one\ntwo\nthree", Point::new(100.0, 100.0), "#555").to_string();
        assert!(text.contains("y=\"74\""));
        assert_eq!(text.matches("<tspan").count(), 3);
        assert!(text.contains("dy=\"14\""));
    }

    #[test]
    fn test_title_metadata_and_legend_extend_canvas() {
        let source = "diagram: D\ntitle: Payments\nmetadata:\n  status: draft\n  version: 2\nlegend:\n  edgeColours:\n    blue: sync\nboxes:\n  A:\n";
        let diagram = boxes_parser::parse(source).unwrap();
        let positioned = PositionedGraph {
            width: 150.0,
            height: 50.0,
            children: vec![leaf("A", 0.0, 0.0)],
            edges: Vec::new(),
        };
        let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);

        // 50 + 120 + 40 + 20 = 230 content, legend 20 + 8 + 20 + 15 + 20 = 83
        assert!(svg.contains("height=\"313\""));
        // the 260 px legend at x = 20 is wider than the 270 px content
        assert!(svg.contains("width=\"300\""));
        assert!(svg.contains("x=\"150\""));
        assert!(svg.contains("translate(60, 120)"));
        let texts = text_nodes(&svg);
        assert!(texts.contains(&"Payments"));
        assert!(texts.contains(&"draft | v2"));
        assert!(texts.contains(&"LEGEND"));
        assert!(texts.contains(&"blue: sync"));
    }

    #[test]
    fn test_canvas_fits_wide_legend() {
        let description = "x".repeat(60);
        let source = format!(
            "diagram: D\nlegend:\n  edgeColours:\n    red: {description}\nboxes:\n  A:\n"
        );
        let diagram = boxes_parser::parse(&source).unwrap();
        let positioned = PositionedGraph {
            width: 150.0,
            height: 50.0,
            children: vec![leaf("A", 0.0, 0.0)],
            edges: Vec::new(),
        };
        let svg = SvgBuilder::new(&diagram).build().render_to_string(&positioned);

        // "red: " + 60 chars = 65 chars, 65 * 6.5 + 50 = 472.5 wide at x = 20
        assert!(svg.contains("width=\"472.5\""));
        assert!(svg.contains("width=\"512.5\""));
        assert!(svg.contains("viewBox=\"0 0 512.5 "));
    }

    #[test]
    fn test_label_avoids_compound_title_strip() {
        let source = "diagram: D\nboxes:\n  Outer:\n    children:\n      A:\n      B:\nedges:\n  - {from: A, to: B, label: x}\n";
        let diagram = boxes_parser::parse(source).unwrap();
        let mut outer = leaf("Outer", 0.0, 0.0);
        outer.width = 400.0;
        outer.height = 200.0;
        outer.children = vec![leaf("A", 20.0, 20.0), leaf("B", 230.0, 20.0)];
        let positioned = PositionedGraph {
            width: 400.0,
            height: 200.0,
            children: vec![outer],
            edges: vec![PositionedEdge {
                id: "e0".to_string(),
                container: Some("Outer".to_string()),
                sections: vec![EdgeSection {
                    start: Point::new(170.0, 45.0),
                    end: Point::new(230.0, 45.0),
                    bend_points: Vec::new(),
                }],
                labels: vec!["x".to_string()],
            }],
        };
        let svg = Svg {
            label_padding: 4.0,
            ..SvgBuilder::new(&diagram).build()
        };
        let edges = svg.prepare_edges(&positioned);
        let mut placed = PlacedRects::new(4.0);
        let strip = Svg::title_strips(&positioned)[0];
        placed.push(strip);
        svg.render_edges(&edges, &mut placed);

        let label = *placed.iter().last().unwrap();
        assert!(!label.intersects(&strip, 4.0));
    }
}
