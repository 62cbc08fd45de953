//! Schema validation for parsed diagrams.
//!
//! [`validate`] never fails: it walks the whole diagram and returns every
//! problem it finds as a human-readable message. An empty list means the
//! diagram can be laid out and rendered.
//!
//! Checks, in reporting order:
//!
//! 1. the `diagram` identifier is present
//! 2. `flow` is one of `LR`, `TB`, `RL`, `BT`
//! 3. every port `dir` is `in` or `out`
//! 4. no two boxes sanitise to the same id
//! 5. every edge endpoint names an existing box, and an existing port on it

use std::collections::HashMap;

use log::debug;

use boxes_core::semantic::{BoxIndex, BoxNode, Diagram, EdgeEndpoint, FlowDirection, PortDirection};

/// Validates a diagram, returning all schema errors found.
///
/// # Examples
///
/// ```
/// use boxes_parser::{parse, validate};
///
/// let diagram = parse("diagram: Demo\nflow: DIAGONAL\n").unwrap();
/// let errors = validate(&diagram);
/// assert_eq!(errors.len(), 1);
/// assert!(errors[0].contains("flow"));
/// assert!(errors[0].contains("DIAGONAL"));
/// ```
pub fn validate(diagram: &Diagram) -> Vec<String> {
    let mut errors = Vec::new();

    if diagram.name().is_none_or(|name| name.trim().is_empty()) {
        errors.push("Missing required field: \"diagram\"".to_string());
    }

    if let FlowDirection::Unknown(flow) = diagram.flow() {
        errors.push(format!(
            "Invalid flow direction: \"{flow}\" (must be one of: {})",
            FlowDirection::VALID.join(", ")
        ));
    }

    validate_ports(diagram, &mut errors);
    validate_unique_ids(diagram, &mut errors);
    validate_edges(diagram, &mut errors);

    debug!(errors = errors.len(); "Validation finished");
    errors
}

fn validate_ports(diagram: &Diagram, errors: &mut Vec<String>) {
    for node in diagram.iter_boxes() {
        for port in node.ports() {
            if let PortDirection::Unknown(dir) = port.direction() {
                errors.push(format!(
                    "Box \"{}\", port \"{}\": invalid dir \"{dir}\" (must be one of: in, out)",
                    node.name(),
                    port.id()
                ));
            }
        }
    }
}

fn validate_unique_ids(diagram: &Diagram, errors: &mut Vec<String>) {
    let mut seen: HashMap<&str, &BoxNode> = HashMap::new();
    for node in diagram.iter_boxes() {
        if let Some(first) = seen.get(node.id().as_str()) {
            errors.push(format!(
                "Boxes \"{}\" and \"{}\" share the id \"{}\"",
                first.name(),
                node.name(),
                node.id()
            ));
        } else {
            seen.insert(node.id().as_str(), node);
        }
    }
}

fn validate_edges(diagram: &Diagram, errors: &mut Vec<String>) {
    let index = diagram.box_index();
    for (position, edge) in diagram.edges().iter().enumerate() {
        for (end, endpoint) in [("from", edge.from()), ("to", edge.to())] {
            if let Some(problem) = check_endpoint(&index, endpoint) {
                errors.push(format!("Edge {position} ({end} \"{endpoint}\"): {problem}"));
            }
        }
    }
}

fn check_endpoint(index: &BoxIndex<'_>, endpoint: &EdgeEndpoint) -> Option<String> {
    if endpoint.box_name().trim().is_empty() {
        return Some("missing box reference".to_string());
    }
    let Some(node) = index.get(endpoint.box_id().as_str()) else {
        return Some(format!("unknown box \"{}\"", endpoint.box_name()));
    };
    match endpoint.port() {
        Some(port) if node.port(port).is_none() => Some(format!(
            "box \"{}\" has no port \"{port}\"",
            node.name()
        )),
        _ => None,
    }
}
