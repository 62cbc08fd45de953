//! The legend panel below the diagram.
//!
//! Lists the edge colours the document describes and, when requested, every
//! port with its direction. Its width grows with the longest entry.

use svg::node::{Text as SvgText, element as svg_element};

use boxes_core::{
    draw::{LayeredOutput, RenderLayer},
    semantic::{Legend, PortEntry},
};

const PADDING: f32 = 15.0;
const LINE_HEIGHT: f32 = 20.0;
const LEFT: f32 = 20.0;
const CHAR_WIDTH: f32 = 6.5;
const MIN_WIDTH: f32 = 260.0;

/// A drawn legend and the vertical space it claims on the canvas.
#[derive(Debug)]
pub struct LegendPanel {
    pub output: LayeredOutput,
    /// Panel height plus the margin above it.
    pub height: f32,
    pub width: f32,
}

impl LegendPanel {
    /// Canvas width that shows the whole panel with its left margin repeated
    /// on the right.
    pub fn required_width(&self) -> f32 {
        self.width + LEFT * 2.0
    }
}

fn legend_text(x: f32, y: f32, content: &str, font_size: f32) -> svg_element::Text {
    svg_element::Text::new("")
        .set("x", x)
        .set("y", y)
        .set("font-size", font_size)
        .set("fill", "#333")
        .add(SvgText::new(content))
}

fn port_row(port: &PortEntry<'_>) -> String {
    format!(
        "{} / {} ({})",
        port.box_name,
        port.port_label,
        port.direction.legend_tag()
    )
}

/// Width of a panel holding the given rows.
///
/// Port rows are measured with the longer `(OUT)` suffix.
pub fn legend_width(legend: &Legend, ports: &[PortEntry<'_>]) -> f32 {
    let colour_rows = legend
        .edge_colours()
        .iter()
        .map(|(name, description)| format!("{name}: {description}").chars().count());
    let port_rows = ports
        .iter()
        .map(|port| format!("{} / {} (OUT)", port.box_name, port.port_label).chars().count());
    let longest = colour_rows.chain(port_rows).fold(10, usize::max);
    (longest as f32 * CHAR_WIDTH + PADDING * 2.0 + 20.0).max(MIN_WIDTH)
}

/// Draws the legend with its top `start_y + 10` below the canvas origin.
///
/// Returns `None` when there is nothing to show: no colour entries, and
/// either the port table is off or no box declares a port. `paint` maps a
/// colour name to the value drawn in its swatch.
pub fn render_legend(
    legend: &Legend,
    ports: &[PortEntry<'_>],
    start_y: f32,
    paint: impl Fn(&str) -> String,
) -> Option<LegendPanel> {
    let ports: &[PortEntry<'_>] = if legend.port_table() { ports } else { &[] };
    if legend.edge_colours().is_empty() && ports.is_empty() {
        return None;
    }

    let width = legend_width(legend, ports);
    let top = start_y + 10.0;

    let mut y = LINE_HEIGHT;
    let title_y = y;
    y += 8.0;

    let mut rows: Vec<svg_element::Text> = Vec::new();
    let mut swatches: Vec<svg_element::Circle> = Vec::new();
    for (name, description) in legend.edge_colours() {
        y += LINE_HEIGHT;
        swatches.push(
            svg_element::Circle::new()
                .set("cx", LEFT + PADDING + 6.0)
                .set("cy", top + y - 4.0)
                .set("r", 6)
                .set("fill", paint(name)),
        );
        rows.push(legend_text(
            LEFT + PADDING + 18.0,
            top + y,
            &format!("{name}: {description}"),
            10.0,
        ));
    }

    if !ports.is_empty() {
        y += LINE_HEIGHT + 4.0;
        rows.push(legend_text(LEFT + PADDING, top + y, "Ports", 11.0).set("font-weight", "bold"));
        for port in ports {
            y += LINE_HEIGHT;
            rows.push(legend_text(LEFT + PADDING, top + y, &port_row(port), 10.0));
        }
    }
    let panel_height = y + PADDING;

    let mut output = LayeredOutput::new();
    output.add_to_layer(
        RenderLayer::Legend,
        Box::new(
            svg_element::Rectangle::new()
                .set("x", LEFT)
                .set("y", top)
                .set("width", width)
                .set("height", panel_height)
                .set("rx", 4)
                .set("ry", 4)
                .set("fill", "#FAFAFA")
                .set("stroke", "#CCC")
                .set("stroke-width", 1),
        ),
    );
    output.add_to_layer(
        RenderLayer::Legend,
        Box::new(legend_text(LEFT + PADDING, top + title_y, "LEGEND", 11.0).set("font-weight", "bold")),
    );
    for swatch in swatches {
        output.add_to_layer(RenderLayer::Legend, Box::new(swatch));
    }
    for row in rows {
        output.add_to_layer(RenderLayer::Legend, Box::new(row));
    }

    Some(LegendPanel {
        output,
        height: panel_height + 20.0,
        width,
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use indexmap::IndexMap;

    use super::*;
    use crate::export::svg::text_nodes;
    use boxes_core::semantic::PortDirection;

    fn colours(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect()
    }

    fn render(panel: LegendPanel) -> String {
        panel
            .output
            .render()
            .into_iter()
            .fold(svg::Document::new(), |doc, node| doc.add(node))
            .to_string()
    }

    #[test]
    fn test_empty_legend_is_omitted() {
        let legend = Legend::new(IndexMap::new(), false);
        assert!(render_legend(&legend, &[], 100.0, str::to_string).is_none());

        // port table on, but no ports anywhere
        let legend = Legend::new(IndexMap::new(), true);
        assert!(render_legend(&legend, &[], 100.0, str::to_string).is_none());
    }

    #[test]
    fn test_colour_entries() {
        let legend = Legend::new(colours(&[("blue", "sync call"), ("grey dashed", "async")]), false);
        let panel = render_legend(&legend, &[], 100.0, |name| {
            if name == "blue" { "#2E86C1".to_string() } else { name.to_string() }
        })
        .unwrap();

        // 20 (title) + 8 + 2 * 20 + 15 = 83, plus the 20 px margin
        assert_approx_eq!(f32, panel.height, 103.0);
        assert_approx_eq!(f32, panel.width, 260.0);
        assert_approx_eq!(f32, panel.required_width(), 300.0);

        let svg = render(panel);
        let texts = text_nodes(&svg);
        assert!(texts.contains(&"LEGEND"));
        assert!(svg.contains("fill=\"#2E86C1\""));
        assert!(texts.contains(&"blue: sync call"));
        assert!(svg.contains("y=\"110\""));
    }

    #[test]
    fn test_port_table() {
        let direction_in = PortDirection::In;
        let direction_out = PortDirection::Out;
        let ports = [
            PortEntry {
                box_name: "Inner B",
                port_label: "Input",
                direction: &direction_in,
            },
            PortEntry {
                box_name: "Inner B",
                port_label: "Output",
                direction: &direction_out,
            },
        ];
        let legend = Legend::new(IndexMap::new(), true);
        let panel = render_legend(&legend, &ports, 0.0, str::to_string).unwrap();
        // 20 + 8 + 24 + 2 * 20 + 15 = 107
        assert_approx_eq!(f32, panel.height, 127.0);

        let svg = render(panel);
        let texts = text_nodes(&svg);
        assert!(texts.contains(&"Ports"));
        assert!(texts.contains(&"Inner B / Input (IN)"));
        assert!(texts.contains(&"Inner B / Output (OUT)"));
    }

    #[test]
    fn test_ports_hidden_without_port_table() {
        let direction = PortDirection::Out;
        let ports = [PortEntry {
            box_name: "A",
            port_label: "p",
            direction: &direction,
        }];
        let legend = Legend::new(colours(&[("red", "errors")]), false);
        let svg = render(render_legend(&legend, &ports, 0.0, str::to_string).unwrap());
        assert!(!svg.contains("Ports"));
    }

    #[test]
    fn test_width_grows_with_text() {
        let long = "x".repeat(60);
        let legend = Legend::new(colours(&[("red", long.as_str())]), false);
        // "red: " + 60 chars = 65 chars
        assert_approx_eq!(f32, legend_width(&legend, &[]), 65.0 * 6.5 + 50.0);
    }
}
