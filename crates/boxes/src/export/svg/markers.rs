//! Arrowhead markers, one per edge colour.

use svg::node::element as svg_element;

/// Marker id for arrowheads painted `colour`: `arrow-` followed by the
/// colour's ASCII letters and digits.
///
/// # Examples
///
/// ```
/// # use boxes::export::svg::markers::marker_id;
/// assert_eq!(marker_id("#2E86C1"), "arrow-2E86C1");
/// assert_eq!(marker_id("rgb(1, 2, 3)"), "arrow-rgb123");
/// ```
pub fn marker_id(colour: &str) -> String {
    let safe: String = colour
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("arrow-{safe}")
}

/// A filled triangular arrowhead sized in stroke widths.
pub fn arrow_marker(colour: &str) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", marker_id(colour))
        .set("markerWidth", 10)
        .set("markerHeight", 7)
        .set("refX", 10)
        .set("refY", 3.5)
        .set("orient", "auto")
        .set("markerUnits", "strokeWidth")
        .add(
            svg_element::Polygon::new()
                .set("points", "0 0, 10 3.5, 0 7")
                .set("fill", colour),
        )
}

/// Collects the distinct colours in first-seen order.
pub fn distinct_colours<'a>(colours: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut distinct: Vec<&str> = Vec::new();
    for colour in colours {
        if !distinct.contains(&colour) {
            distinct.push(colour);
        }
    }
    distinct
}

/// A `<defs>` block with one marker per distinct colour.
pub fn marker_definitions<'a>(colours: impl IntoIterator<Item = &'a str>) -> svg_element::Definitions {
    distinct_colours(colours)
        .into_iter()
        .fold(svg_element::Definitions::new(), |defs, colour| {
            defs.add(arrow_marker(colour))
        })
}
