//! Unit tests for reading Boxes documents into the semantic model.

use boxes_core::semantic::{Diagram, FlowDirection, PortDirection, PortSide};

use crate::{ParseError, parse};

const MINIMAL: &str = r#"
diagram: Test.Context
title: Minimal Test
flow: LR
dpi: 150
boxes:
  Outer:
    children:
      Inner A:
      Inner B:
        ports:
          PortIn: { dir: in, label: Input }
          PortOut: { dir: out, label: Output }
edges:
  - from: Inner A
    to: "Inner B:PortIn"
    label: data flow
legend:
  edgeColours:
    Blue: Data flow
  portTable: true
"#;

fn parse_ok(source: &str) -> Diagram {
    match parse(source) {
        Ok(diagram) => diagram,
        Err(err) => panic!("Expected parsing to succeed, but got error: {err}"),
    }
}

#[test]
fn test_minimal_document() {
    let diagram = parse_ok(MINIMAL);

    assert_eq!(diagram.name(), Some("Test.Context"));
    assert_eq!(diagram.title(), Some("Minimal Test"));
    assert_eq!(diagram.flow(), &FlowDirection::LeftToRight);
    assert_eq!(diagram.dpi(), 150);

    let outer = &diagram.boxes()[0];
    assert_eq!(outer.id(), "Outer");
    assert_eq!(outer.depth(), 0);
    assert_eq!(outer.children().len(), 2);

    let inner_b = &outer.children()[1];
    assert_eq!(inner_b.id(), "Inner_B");
    assert_eq!(inner_b.depth(), 1);
    assert_eq!(inner_b.ports().len(), 2);
    assert_eq!(inner_b.ports()[0].label(), "Input");
    assert_eq!(inner_b.ports()[1].direction(), &PortDirection::Out);
}

#[test]
fn test_minimal_edges_and_legend() {
    let diagram = parse_ok(MINIMAL);

    let edge = &diagram.edges()[0];
    assert_eq!(edge.from().box_name(), "Inner A");
    assert_eq!(edge.from().port(), None);
    assert_eq!(edge.to().node_id(), "Inner_B_PortIn");
    assert_eq!(edge.label(), Some("data flow"));

    assert_eq!(
        diagram.legend().edge_colours().get("Blue").map(String::as_str),
        Some("Data flow")
    );
    assert!(diagram.legend().port_table());
}

#[test]
fn test_defaults_applied() {
    let diagram = parse_ok("diagram: Bare\n");
    assert_eq!(diagram.flow(), &FlowDirection::LeftToRight);
    assert_eq!(diagram.dpi(), 150);
    assert_eq!(diagram.style().font(), "Helvetica");
    assert_eq!(diagram.style().border_weights(), &[3.0]);
    assert_eq!(diagram.style().backgrounds(), &["white".to_string()]);
    assert!(diagram.boxes().is_empty());
    assert!(diagram.edges().is_empty());
    assert!(diagram.metadata().is_none());
    assert!(!diagram.legend().port_table());
}

#[test]
fn test_style_partial_override_merges() {
    let diagram = parse_ok("diagram: D\nstyle:\n  backgrounds: [white, \"#EEE\"]\n");
    assert_eq!(diagram.style().font(), "Helvetica");
    assert_eq!(diagram.style().border_weights(), &[3.0]);
    assert_eq!(diagram.style().background(1), "#EEE");
}

#[test]
fn test_port_defaults() {
    let diagram = parse_ok("diagram: D\nboxes:\n  API:\n    ports:\n      http:\n");
    let port = &diagram.boxes()[0].ports()[0];
    assert_eq!(port.id(), "http");
    assert_eq!(port.label(), "http");
    assert_eq!(port.direction(), &PortDirection::In);
    assert_eq!(port.side(), None);
}

#[test]
fn test_port_side_parsing() {
    let source = "diagram: D\nboxes:\n  API:\n    ports:\n      a: { dir: in, side: North }\n      b: { dir: out, side: upwards }\n";
    let diagram = parse_ok(source);
    let ports = diagram.boxes()[0].ports();
    assert_eq!(ports[0].side(), Some(PortSide::North));
    assert_eq!(ports[1].side(), None);
}

#[test]
fn test_unknown_values_are_preserved_for_validation() {
    let source = "diagram: D\nflow: DIAGONAL\nboxes:\n  API:\n    ports:\n      a: { dir: both }\n";
    let diagram = parse_ok(source);
    assert_eq!(
        diagram.flow(),
        &FlowDirection::Unknown("DIAGONAL".to_string())
    );
    assert_eq!(
        diagram.boxes()[0].ports()[0].direction(),
        &PortDirection::Unknown("both".to_string())
    );
}

#[test]
fn test_actors_become_children() {
    let source = r#"
diagram: D
boxes:
  Platform:
    children:
      Warehouse:
        technology: Snowflake
        zoom: Warehouse.Container
    actors:
      Data Engineer:
        description: Builds pipelines
  Analyst:
    actor: true
"#;
    let diagram = parse_ok(source);
    let platform = &diagram.boxes()[0];
    assert_eq!(platform.children().len(), 2);

    let warehouse = &platform.children()[0];
    assert!(!warehouse.is_actor());
    assert_eq!(warehouse.technology(), Some("Snowflake"));
    assert_eq!(warehouse.zoom(), Some("Warehouse.Container"));

    let engineer = &platform.children()[1];
    assert!(engineer.is_actor());
    assert_eq!(engineer.id(), "Data_Engineer");
    assert_eq!(engineer.depth(), 1);
    assert_eq!(engineer.description(), Some("Builds pipelines"));
    assert_eq!(engineer.technology(), None);

    assert!(diagram.boxes()[1].is_actor());
    assert_eq!(diagram.actors(), &["Data Engineer", "Analyst"]);
}

#[test]
fn test_edge_reference_splits_at_last_colon() {
    let source = "diagram: D\nedges:\n  - from: \"ns:db:out\"\n    to: plain\n";
    let diagram = parse_ok(source);
    let edge = &diagram.edges()[0];
    assert_eq!(edge.from().box_name(), "ns:db");
    assert_eq!(edge.from().port(), Some("out"));
    assert_eq!(edge.to().port(), None);
}

#[test]
fn test_edge_styles() {
    let source = r#"
diagram: D
edges:
  - { from: A, to: B, style: dashed }
  - { from: A, to: B, style: { color: Dark Blue, dashed: true } }
  - { from: A, to: B, colour: green }
"#;
    let diagram = parse_ok(source);
    let edges = diagram.edges();

    assert!(edges[0].style().is_dashed());
    assert_eq!(edges[0].colour_name(), None);

    assert!(edges[1].style().is_dashed());
    assert_eq!(edges[1].colour_name(), Some("Dark Blue"));

    assert!(!edges[2].style().is_dashed());
    assert_eq!(edges[2].colour_name(), Some("green"));
}

#[test]
fn test_metadata_scalars() {
    let source = "diagram: D\nmetadata:\n  author: Ana\n  version: 2\n  status: Draft\n";
    let diagram = parse_ok(source);
    let metadata = diagram.metadata().unwrap();
    assert_eq!(metadata.summary(), "Draft | v2 | Ana");
}

#[test]
fn test_empty_label_falls_back_to_name() {
    let diagram = parse_ok("diagram: D\nboxes:\n  API:\n    label: \"\"\n");
    assert_eq!(diagram.boxes()[0].label(), "API");
}

#[test]
fn test_top_level_must_be_mapping() {
    assert!(matches!(parse("- a\n- b\n"), Err(ParseError::NotAMapping)));
    assert!(matches!(parse(""), Err(ParseError::NotAMapping)));
    assert!(matches!(parse("just text"), Err(ParseError::NotAMapping)));
}

#[test]
fn test_malformed_yaml_reports_offset() {
    let err = parse("diagram: D\nboxes: {A: [\n").unwrap_err();
    assert!(matches!(err, ParseError::Yaml { .. }));
    assert!(err.offset().is_some());
}

#[test]
fn test_wrong_shape_is_yaml_error() {
    let err = parse("diagram: D\nedges: not-a-list\n").unwrap_err();
    assert!(matches!(err, ParseError::Yaml { .. }));
}
