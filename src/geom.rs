//! Planar geometry on grid coordinates.
//!
//! All predicates work on integer coordinates widened to `i64`, so they are
//! exact for any `u16` grid position.

use crate::game::Coord;

/// Euclidean distance between two grid positions.
#[must_use]
pub fn dist(a: Coord, b: Coord) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    dx.hypot(dy)
}

/// Twice the signed area of the triangle `a, b, c`.
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero when
/// the three points are collinear.
#[must_use]
pub fn orient2d(a: Coord, b: Coord, c: Coord) -> i64 {
    let (ax, ay) = widen(a);
    let (bx, by) = widen(b);
    let (cx, cy) = widen(c);
    (bx - ax) * (cy - ay) - (cx - ax) * (by - ay)
}

/// Whether three points lie on one line.
#[must_use]
pub fn colinear(a: Coord, b: Coord, c: Coord) -> bool {
    orient2d(a, b, c) == 0
}

/// Open segment intersection test.
///
/// True only when each segment's endpoints lie strictly on opposite sides of
/// the other segment. Shared endpoints, touching and collinear overlap do
/// not count.
#[must_use]
pub fn intersect(j: (Coord, Coord), k: (Coord, Coord)) -> bool {
    let (j1, j2) = j;
    let (k1, k2) = k;
    orient2d(k1, k2, j1).signum() * orient2d(k1, k2, j2).signum() < 0
        && orient2d(j1, j2, k1).signum() * orient2d(j1, j2, k2).signum() < 0
}

/// Whether `p` lies on the closed segment `a..b`.
#[must_use]
pub fn on_segment(a: Coord, b: Coord, p: Coord) -> bool {
    let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
    let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
    (x0..=x1).contains(&p.x) && (y0..=y1).contains(&p.y) && colinear(a, b, p)
}

/// Top-left fill rule bias for the edge `p0 -> p1`.
fn bias(p0: Coord, p1: Coord) -> i64 {
    if (p0.y == p1.y && p0.x > p1.x) || p0.y > p1.y {
        0
    } else {
        -1
    }
}

/// Rasterize a triangle into the grid cells it covers.
///
/// The vertices are reordered to a non-negative winding first, then every
/// cell of the bounding box is tested against the three edge functions with
/// a top-left bias. Two triangles sharing an edge never both claim a cell on
/// that edge. Cells come out row by row, bottom to top.
#[must_use]
pub fn render(points: [Coord; 3]) -> Vec<Coord> {
    let [mut v0, mut v1, v2] = points;
    if orient2d(v0, v1, v2) < 0 {
        std::mem::swap(&mut v0, &mut v1);
    }

    let x0 = v0.x.min(v1.x).min(v2.x);
    let x1 = v0.x.max(v1.x).max(v2.x);
    let y0 = v0.y.min(v1.y).min(v2.y);
    let y1 = v0.y.max(v1.y).max(v2.y);

    let (b12, b20, b01) = (bias(v1, v2), bias(v2, v0), bias(v0, v1));

    let mut cells = Vec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Coord::new(x, y);
            let w0 = orient2d(v1, v2, p) + b12;
            let w1 = orient2d(v2, v0, p) + b20;
            let w2 = orient2d(v0, v1, p) + b01;
            if w0 >= 0 && w1 >= 0 && w2 >= 0 {
                cells.push(p);
            }
        }
    }
    cells
}

fn widen(c: Coord) -> (i64, i64) {
    (i64::from(c.x), i64::from(c.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn c(x: u16, y: u16) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_orient2d_signs() {
        assert!(orient2d(c(0, 0), c(0, 1), c(1, 0)) < 0);
        assert!(orient2d(c(0, 1), c(1, 0), c(0, 0)) < 0);
        assert!(orient2d(c(1, 0), c(0, 0), c(0, 1)) < 0);
        assert!(orient2d(c(0, 1), c(0, 0), c(1, 0)) > 0);
        assert!(orient2d(c(1, 0), c(0, 1), c(0, 0)) > 0);
        assert!(orient2d(c(0, 0), c(1, 0), c(0, 1)) > 0);
        assert!(colinear(c(0, 0), c(2, 2), c(5, 5)));
    }

    #[test]
    fn test_intersect_open() {
        assert!(!intersect((c(0, 0), c(2, 2)), (c(4, 1), c(1, 4))));
        // Touching at (2, 2) is not a crossing
        assert!(!intersect((c(0, 0), c(2, 2)), (c(3, 1), c(1, 3))));
        assert!(intersect((c(0, 0), c(2, 2)), (c(2, 1), c(1, 2))));
        // Shared endpoint
        assert!(!intersect((c(2, 2), c(8, 2)), (c(8, 2), c(8, 8))));
        // Collinear overlap
        assert!(!intersect((c(0, 0), c(4, 0)), (c(2, 0), c(6, 0))));
    }

    #[test]
    fn test_on_segment() {
        assert!(on_segment(c(2, 2), c(8, 8), c(5, 5)));
        assert!(!on_segment(c(2, 2), c(8, 8), c(9, 9)));
        assert!(!on_segment(c(2, 2), c(8, 8), c(5, 6)));
    }

    #[test]
    fn test_render_small_triangle() {
        let cells = render([c(2, 2), c(6, 2), c(2, 6)]);
        let expected = [c(2, 3), c(3, 3), c(4, 3), c(2, 4), c(3, 4), c(2, 5)];
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_render_is_winding_independent() {
        let a: HashSet<Coord> = render([c(2, 2), c(8, 2), c(2, 8)]).into_iter().collect();
        let b: HashSet<Coord> = render([c(8, 2), c(2, 8), c(2, 2)]).into_iter().collect();
        let d: HashSet<Coord> = render([c(2, 8), c(8, 2), c(2, 2)]).into_iter().collect();
        assert_eq!(a.len(), 15);
        assert_eq!(a, b);
        assert_eq!(a, d);
    }

    #[test]
    fn test_render_shared_edge_partition() {
        let lower: HashSet<Coord> = render([c(0, 0), c(5, 0), c(0, 5)]).into_iter().collect();
        let upper: HashSet<Coord> = render([c(5, 5), c(5, 0), c(0, 5)]).into_iter().collect();

        assert_eq!(lower.len(), 10);
        assert_eq!(upper.len(), 15);
        assert!(lower.is_disjoint(&upper));

        // Every cell strictly inside the shared hypotenuse goes to exactly one side
        for x in 1..5 {
            let p = c(x, 5 - x);
            assert!(lower.contains(&p) ^ upper.contains(&p), "{p} claimed twice or never");
        }
    }

    #[test]
    fn test_render_degenerate() {
        assert!(render([c(1, 1), c(3, 3), c(5, 5)]).is_empty());
    }

    #[test]
    fn test_dist() {
        assert!((dist(c(0, 0), c(3, 4)) - 5.0).abs() < f64::EPSILON);
    }
}
