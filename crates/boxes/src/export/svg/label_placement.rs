//! Edge label placement with collision avoidance.
//!
//! Labels are placed one edge at a time. Each candidate position is tested
//! against the rectangles accepted so far (earlier labels and the title
//! strips of compound boxes); the first free one wins. The search is
//! bounded: a fixed set of fractions along the path, then a fixed set of
//! nudges around three reference points, then the midpoint regardless.

use boxes_core::geometry::{Bounds, Point, Size};

/// Positions along the path tried first, in order.
const FRACTIONS: [f32; 7] = [0.5, 0.35, 0.65, 0.25, 0.75, 0.15, 0.85];

/// Reference positions the nudges are applied to.
const NUDGE_FRACTIONS: [f32; 3] = [0.5, 0.3, 0.7];

/// Offsets tried around each reference position, in order.
const NUDGES: [(f32, f32); 30] = [
    (0.0, -20.0),
    (0.0, 20.0),
    (30.0, 0.0),
    (-30.0, 0.0),
    (0.0, -40.0),
    (0.0, 40.0),
    (50.0, 0.0),
    (-50.0, 0.0),
    (30.0, -20.0),
    (-30.0, 20.0),
    (0.0, -60.0),
    (0.0, 60.0),
    (70.0, 0.0),
    (-70.0, 0.0),
    (50.0, -30.0),
    (-50.0, 30.0),
    (0.0, -80.0),
    (0.0, 80.0),
    (90.0, 0.0),
    (-90.0, 0.0),
    (0.0, -100.0),
    (0.0, 100.0),
    (110.0, 0.0),
    (-110.0, 0.0),
    (80.0, -40.0),
    (-80.0, 40.0),
    (0.0, -120.0),
    (0.0, 120.0),
    (130.0, 0.0),
    (-130.0, 0.0),
];

/// Estimated size of a label box: 7 px per character of the longest line
/// plus 16, and 14 px per line plus 8.
pub fn label_size(text: &str) -> Size {
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    Size::new(longest as f32 * 7.0 + 16.0, lines.len() as f32 * 14.0 + 8.0)
}

/// Point at `fraction` of the total length of a polyline.
///
/// Falls back to the midpoint of the first and last points when the path has
/// no length.
///
/// # Examples
///
/// ```
/// # use boxes::export::svg::label_placement::point_at_fraction;
/// # use boxes_core::geometry::Point;
/// let path = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
/// assert_eq!(point_at_fraction(&path, 0.5), Point::new(100.0, 0.0));
/// assert_eq!(point_at_fraction(&path, 0.25), Point::new(50.0, 0.0));
/// ```
pub fn point_at_fraction(points: &[Point], fraction: f32) -> Point {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Point::default();
    };
    let total: f32 = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum();
    let target = total * fraction;

    let mut walked = 0.0;
    for pair in points.windows(2) {
        let length = pair[0].distance(pair[1]);
        if walked + length >= target && length > 0.0 {
            return pair[0].lerp(pair[1], (target - walked) / length);
        }
        walked += length;
    }
    first.midpoint(last)
}

/// Rectangle occupied by a label of `size` anchored at `anchor`.
///
/// The anchor sits on the text baseline: the box extends `size.height() - 2`
/// above it and is centred horizontally.
pub fn label_rect(anchor: Point, size: Size) -> Bounds {
    Bounds::new_from_top_left(
        Point::new(
            anchor.x() - size.width() / 2.0,
            anchor.y() - size.height() + 2.0,
        ),
        size,
    )
}

/// Rectangles already claimed in one render.
#[derive(Debug, Clone, Default)]
pub struct PlacedRects {
    rects: Vec<Bounds>,
    padding: f32,
}

impl PlacedRects {
    /// Creates an empty set; rectangles closer than `padding` count as overlapping.
    pub fn new(padding: f32) -> Self {
        Self {
            rects: Vec::new(),
            padding,
        }
    }

    pub fn push(&mut self, rect: Bounds) {
        self.rects.push(rect);
    }

    pub fn is_free(&self, rect: &Bounds) -> bool {
        !self
            .rects
            .iter()
            .any(|placed| rect.intersects(placed, self.padding))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bounds> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Chosen label position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Text anchor.
    pub anchor: Point,
    /// Background rectangle.
    pub rect: Bounds,
}

/// Finds a free position for a label of `size` along `points`.
///
/// The result is not recorded in `placed`; the caller appends it.
pub fn find_label_position(points: &[Point], size: Size, placed: &PlacedRects) -> LabelPlacement {
    let candidate = |anchor: Point| LabelPlacement {
        anchor,
        rect: label_rect(anchor, size),
    };

    let along_path = FRACTIONS
        .iter()
        .map(|&fraction| candidate(point_at_fraction(points, fraction)));
    let nudged = NUDGE_FRACTIONS.iter().flat_map(|&fraction| {
        let reference = point_at_fraction(points, fraction);
        NUDGES
            .iter()
            .map(move |&(dx, dy)| candidate(reference.add_point(Point::new(dx, dy))))
    });

    along_path
        .chain(nudged)
        .find(|placement| placed.is_free(&placement.rect))
        .unwrap_or_else(|| candidate(point_at_fraction(points, 0.5)))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn horizontal(length: f32) -> Vec<Point> {
        vec![Point::new(0.0, 100.0), Point::new(length, 100.0)]
    }

    #[test]
    fn test_label_size() {
        let size = label_size("data flow");
        assert_approx_eq!(f32, size.width(), 9.0 * 7.0 + 16.0);
        assert_approx_eq!(f32, size.height(), 22.0);

        let multi = label_size("a\nlonger line");
        assert_approx_eq!(f32, multi.width(), 11.0 * 7.0 + 16.0);
        assert_approx_eq!(f32, multi.height(), 36.0);
    }

    #[test]
    fn test_zero_length_path_uses_midpoint() {
        let point = point_at_fraction(&[Point::new(5.0, 5.0), Point::new(5.0, 5.0)], 0.3);
        assert_eq!(point, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_label_rect_geometry() {
        let rect = label_rect(Point::new(100.0, 50.0), Size::new(40.0, 22.0));
        assert_approx_eq!(f32, rect.min_x(), 80.0);
        assert_approx_eq!(f32, rect.min_y(), 30.0);
        assert_approx_eq!(f32, rect.max_y(), 52.0);
    }

    #[test]
    fn test_first_label_at_midpoint() {
        let placed = PlacedRects::new(4.0);
        let placement = find_label_position(&horizontal(400.0), label_size("x"), &placed);
        assert_eq!(placement.anchor, Point::new(200.0, 100.0));
    }

    #[test]
    fn test_second_label_moves_along_path() {
        let path = horizontal(400.0);
        let size = label_size("x");
        let mut placed = PlacedRects::new(4.0);
        let first = find_label_position(&path, size, &placed);
        placed.push(first.rect);

        let second = find_label_position(&path, size, &placed);
        assert_eq!(second.anchor, Point::new(140.0, 100.0));
        assert!(placed.is_free(&second.rect));
    }

    #[test]
    fn test_nudged_when_path_exhausted() {
        // a short path: every fraction collides with the first label
        let path = horizontal(20.0);
        let size = label_size("label");
        let mut placed = PlacedRects::new(4.0);
        placed.push(find_label_position(&path, size, &placed).rect);

        let second = find_label_position(&path, size, &placed);
        assert_eq!(second.anchor, Point::new(10.0, 60.0));
        assert!(placed.is_free(&second.rect));
    }

    #[test]
    fn test_title_strip_is_avoided() {
        let path = horizontal(400.0);
        let mut placed = PlacedRects::new(4.0);
        placed.push(Bounds::new_from_top_left(
            Point::new(0.0, 60.0),
            Size::new(400.0, 50.0),
        ));
        let placement = find_label_position(&path, label_size("x"), &placed);
        assert!(placed.is_free(&placement.rect));
    }

    #[test]
    fn test_fallback_is_midpoint() {
        let path = horizontal(100.0);
        let mut placed = PlacedRects::new(4.0);
        placed.push(Bounds::new_from_top_left(
            Point::new(-1000.0, -1000.0),
            Size::new(3000.0, 3000.0),
        ));
        let placement = find_label_position(&path, label_size("x"), &placed);
        assert_eq!(placement.anchor, Point::new(50.0, 100.0));
    }

    proptest! {
        #[test]
        fn labels_never_overlap_when_space_exists(
            lengths in proptest::collection::vec(200.0f32..800.0, 1..6),
            texts in proptest::collection::vec("[a-z]{1,12}", 6),
        ) {
            let mut placed = PlacedRects::new(4.0);
            let mut accepted: Vec<Bounds> = Vec::new();
            for (index, length) in lengths.iter().enumerate() {
                let path = vec![
                    Point::new(0.0, index as f32 * 300.0),
                    Point::new(*length, index as f32 * 300.0),
                ];
                let placement = find_label_position(&path, label_size(&texts[index]), &placed);
                prop_assert!(placed.is_free(&placement.rect));
                placed.push(placement.rect);
                accepted.push(placement.rect);
            }
            for (i, a) in accepted.iter().enumerate() {
                for b in &accepted[i + 1..] {
                    prop_assert!(!a.intersects(b, 4.0));
                }
            }
        }
    }
}
