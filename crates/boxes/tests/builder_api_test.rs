//! Integration tests for the DiagramBuilder API

use boxes::{
    BoxesError, DiagramBuilder,
    config::{AppConfig, LayoutConfig, StyleConfig},
    graph::{LayoutGraph, PositionedGraph},
    layout::LayoutEngine,
};

const SIMPLE: &str = "diagram: Demo\nboxes:\n  Web:\n  API:\nedges:\n  - {from: Web, to: API}\n";

/// Text content is serialised on a line of its own.
fn has_text(svg: &str, text: &str) -> bool {
    svg.lines().any(|line| line.trim() == text)
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_render_simple_diagram() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SIMPLE).expect("Failed to parse diagram");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(has_text(&svg, "Web"));
    assert!(has_text(&svg, "API"));
    assert!(svg.contains("<path"));
}

#[test]
fn test_parse_invalid_yaml_keeps_source() {
    let source = "boxes: [unclosed";
    let builder = DiagramBuilder::default();
    match builder.parse(source) {
        Err(BoxesError::Parse { src, .. }) => assert_eq!(src, source),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_render_rejects_invalid_diagram() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse("boxes:\n  A:\n").unwrap();
    match builder.render_svg(&diagram) {
        Err(BoxesError::Validation(errors)) => {
            assert!(errors.iter().any(|err| err.contains("diagram")));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_invalid_configured_colour() {
    let config = AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default().with_colour("teal", "not a colour"),
    );
    let builder = DiagramBuilder::new(config);
    let diagram = builder.parse(SIMPLE).unwrap();
    assert!(matches!(
        builder.render_svg(&diagram),
        Err(BoxesError::Config(_))
    ));
}

#[test]
fn test_configured_colour_names() {
    let config = AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default().with_colour("teal", "#008080"),
    );
    let builder = DiagramBuilder::new(config);
    let diagram = builder
        .parse("diagram: D\nboxes:\n  A:\n  B:\nedges:\n  - {from: A, to: B, colour: teal}\n")
        .unwrap();
    let svg = builder.render_svg(&diagram).unwrap();
    assert!(svg.contains("stroke=\"#008080\""));
    assert!(svg.contains("id=\"arrow-008080\""));
}

struct FailingEngine;

impl LayoutEngine for FailingEngine {
    fn layout(&self, _graph: &LayoutGraph) -> Result<PositionedGraph, BoxesError> {
        Err(BoxesError::Layout("no room".to_string()))
    }
}

#[test]
fn test_custom_engine_errors_propagate() {
    let builder = DiagramBuilder::default().with_engine(Box::new(FailingEngine));
    let diagram = builder.parse(SIMPLE).unwrap();
    assert!(matches!(
        builder.render_svg(&diagram),
        Err(BoxesError::Layout(message)) if message == "no room"
    ));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();
    let first = builder.parse(SIMPLE).unwrap();
    let second = builder
        .parse("diagram: Other\nflow: TB\nboxes:\n  Only:\n")
        .unwrap();

    let svg1 = builder.render_svg(&first).unwrap();
    let svg2 = builder.render_svg(&second).unwrap();
    assert!(has_text(&svg1, "Web"));
    assert!(has_text(&svg2, "Only"));
    assert_ne!(svg1, svg2);
}

#[cfg(feature = "png")]
#[test]
fn test_render_png() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SIMPLE).unwrap();
    let svg = builder.render_svg(&diagram).unwrap();
    let png = builder.render_png(&svg, 150).unwrap();
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
}
