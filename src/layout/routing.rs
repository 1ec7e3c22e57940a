use super::LayoutEntry;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl EdgeRoute {
    pub fn midpoint(&self) -> (f32, f32) {
        (
            (self.start.0 + self.end.0) / 2.0,
            (self.start.1 + self.end.1) / 2.0,
        )
    }
}

/// Straight route between two boxes, anchored on each box's boundary. The
/// destination anchor is pulled `arrow_offset` inside its box so the marker
/// tip lands on the edge.
pub fn route_edge(source: &LayoutEntry, destination: &LayoutEntry, arrow_offset: f32) -> EdgeRoute {
    EdgeRoute {
        start: connection_point(source, destination, 0.0),
        end: connection_point(destination, source, arrow_offset),
    }
}

/// Where the line from `from`'s center toward `to`'s center crosses `from`'s
/// boundary, moved `inset` units back toward the center along that line.
pub fn connection_point(from: &LayoutEntry, to: &LayoutEntry, inset: f32) -> (f32, f32) {
    let (from_cx, from_cy) = from.center();
    let (to_cx, to_cy) = to.center();
    let dx = to_cx - from_cx;
    let dy = to_cy - from_cy;

    let angle = dy.atan2(dx);
    let tan = angle.tan();
    let box_ratio = from.height / from.width;

    if tan.abs() < box_ratio {
        // Left or right edge.
        let x = if dx > 0.0 {
            from.right() - inset
        } else {
            from.x + inset
        };
        (x, from_cy + (x - from_cx) * tan)
    } else {
        // Top or bottom edge.
        let y = if dy > 0.0 {
            from.bottom() - inset
        } else {
            from.y + inset
        };
        let x = if tan.abs() <= f32::EPSILON {
            from_cx
        } else {
            from_cx + (y - from_cy) / tan
        };
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32) -> LayoutEntry {
        LayoutEntry::new(x, y, 200.0, 150.0)
    }

    #[test]
    fn horizontal_neighbours_use_side_edges() {
        let a = boxed(0.0, 0.0);
        let b = boxed(320.0, 0.0);
        let route = route_edge(&a, &b, 12.0);
        assert_approx_eq!(f32, route.start.0, 200.0);
        assert_approx_eq!(f32, route.start.1, 75.0);
        assert_approx_eq!(f32, route.end.0, 332.0);
        assert_approx_eq!(f32, route.end.1, 75.0, epsilon = 1e-3);
    }

    #[test]
    fn vertical_neighbours_use_top_and_bottom() {
        let a = boxed(0.0, 0.0);
        let b = boxed(0.0, 330.0);
        let route = route_edge(&a, &b, 12.0);
        assert_approx_eq!(f32, route.start.0, 100.0, epsilon = 1e-3);
        assert_approx_eq!(f32, route.start.1, 150.0);
        assert_approx_eq!(f32, route.end.1, 342.0);
        assert_approx_eq!(f32, route.end.0, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn diagonal_exits_through_the_solved_boundary_point() {
        // Center (100, 75) toward (400, 475): slope 4/3 exceeds 150/200.
        let a = boxed(0.0, 0.0);
        let b = boxed(300.0, 400.0);
        let start = connection_point(&a, &b, 0.0);
        assert_approx_eq!(f32, start.1, 150.0);
        assert_approx_eq!(f32, start.0, 100.0 + 75.0 * 0.75, epsilon = 1e-3);
    }

    #[test]
    fn midpoint_is_mean_of_anchors() {
        let route = EdgeRoute {
            start: (0.0, 10.0),
            end: (20.0, 30.0),
        };
        assert_eq!(route.midpoint(), (10.0, 20.0));
    }

    #[test]
    fn coincident_boxes_stay_finite() {
        let a = boxed(50.0, 50.0);
        let point = connection_point(&a, &a, 12.0);
        assert!(point.0.is_finite() && point.1.is_finite());
    }

    fn entry_strategy() -> impl Strategy<Value = LayoutEntry> {
        (-2000.0f32..2000.0, -2000.0f32..2000.0, 1.0f32..400.0, 1.0f32..400.0)
            .prop_map(|(x, y, w, h)| LayoutEntry::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn source_anchor_lies_on_box_boundary(a in entry_strategy(), b in entry_strategy()) {
            let (x, y) = connection_point(&a, &b, 0.0);
            prop_assert!(x.is_finite() && y.is_finite());
            let tol = 0.05 * (a.width + a.height);
            let on_vertical = (x - a.x).abs() < tol || (x - a.right()).abs() < tol;
            let on_horizontal = (y - a.y).abs() < tol || (y - a.bottom()).abs() < tol;
            prop_assert!(on_vertical || on_horizontal, "({x}, {y}) not on {a:?}");
        }
    }
}
