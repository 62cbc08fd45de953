//! Edge path data with rounded bends.

use boxes_core::geometry::Point;

/// Builds SVG path data through `points`, rounding every bend.
///
/// Each interior point is replaced by a quadratic curve whose radius is at
/// most `radius` and at most half of either adjacent segment. A bend with a
/// zero-length neighbour segment stays sharp.
///
/// # Examples
///
/// ```
/// # use boxes::export::svg::path::rounded_path_data;
/// # use boxes_core::geometry::Point;
/// let straight = rounded_path_data(&[Point::new(0.0, 0.0), Point::new(10.0, 5.0)], 12.0);
/// assert_eq!(straight, "M 0 0 L 10 5");
///
/// let bent = rounded_path_data(
///     &[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
///     12.0,
/// );
/// assert_eq!(bent, "M 0 0 L 88 0 Q 100 0, 100 12 L 100 100");
/// ```
pub fn rounded_path_data(points: &[Point], radius: f32) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let mut data = format!("M {} {}", first.x(), first.y());
    if points.len() > 2 {
        for window in points.windows(3) {
            let [previous, current, next] = [window[0], window[1], window[2]];
            let incoming = current.sub_point(previous);
            let outgoing = next.sub_point(current);
            let incoming_length = previous.distance(current);
            let outgoing_length = current.distance(next);

            if incoming_length == 0.0 || outgoing_length == 0.0 {
                data.push_str(&format!(" L {} {}", current.x(), current.y()));
                continue;
            }

            let r = radius.min(incoming_length / 2.0).min(outgoing_length / 2.0);
            let before = Point::new(
                current.x() - incoming.x() / incoming_length * r,
                current.y() - incoming.y() / incoming_length * r,
            );
            let after = Point::new(
                current.x() + outgoing.x() / outgoing_length * r,
                current.y() + outgoing.y() / outgoing_length * r,
            );
            data.push_str(&format!(
                " L {} {} Q {} {}, {} {}",
                before.x(),
                before.y(),
                current.x(),
                current.y(),
                after.x(),
                after.y()
            ));
        }
    }
    data.push_str(&format!(" L {} {}", last.x(), last.y()));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_single_segment() {
        let data = rounded_path_data(&[Point::new(1.5, 2.0), Point::new(40.0, 2.0)], 12.0);
        assert_eq!(data, "M 1.5 2 L 40 2");
        assert!(!data.contains('Q'));
    }

    #[test]
    fn test_radius_limited_by_short_segment() {
        let data = rounded_path_data(
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 50.0),
            ],
            12.0,
        );
        assert_eq!(data, "M 0 0 L 5 0 Q 10 0, 10 5 L 10 50");
    }

    #[test]
    fn test_zero_length_segment_stays_sharp() {
        let data = rounded_path_data(
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(30.0, 0.0),
            ],
            12.0,
        );
        assert_eq!(data, "M 0 0 L 0 0 L 30 0");
    }

    #[test]
    fn test_two_bends() {
        let data = rounded_path_data(
            &[
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 40.0),
                Point::new(100.0, 40.0),
            ],
            12.0,
        );
        assert_eq!(data.matches('Q').count(), 2);
        assert!(data.starts_with("M 0 0 L 38 0 Q 50 0, 50 12"));
        assert!(data.ends_with("L 100 40"));
    }

    #[test]
    fn test_empty_points() {
        assert!(rounded_path_data(&[], 12.0).is_empty());
    }
}
