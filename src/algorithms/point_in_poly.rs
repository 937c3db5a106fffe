/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::structures::Point2D;

/// The permitted delta when comparing doubles.
pub const SLACK: f64 = 1e-14;

/// Tests whether two doubles are within `SLACK` of one another.
///
/// The relation is reflexive and symmetric but not transitive: `a ~ b` and
/// `b ~ c` do not imply `a ~ c`.
pub fn dbl_equals(left: f64, right: f64) -> bool {
    (left - right).abs() <= SLACK
}

/// Tests if a point is Left|On|Right of an infinite line,
/// based on http://geomalgorithms.com/a03-_inclusion.html.
///
/// Input:  three points P0, P1, and P2
///
/// Return: 1 for P2 left of the line through P0 and P1
///         0 for P2 on the line (to within `SLACK`)
///        -1 for P2 right of the line
pub fn is_left(p0: &Point2D, p1: &Point2D, p2: &Point2D) -> i32 {
    let part1 = (p1.x - p0.x) * (p2.y - p0.y);
    let part2 = (p2.x - p0.x) * (p1.y - p0.y);
    if dbl_equals(part1, part2) {
        0
    } else if part1 > part2 {
        1
    } else {
        -1
    }
}

/// Calculates the signed winding number of a ring around a point.
///
/// The ring is treated as closed; the edge from the last vertex back to the
/// first is always tested, so the first point need not be repeated at the end.
/// An empty ring has a winding number of zero.
///
/// Input:   p = a point,
///          ring[] = vertex points of the ring
///
/// Return:  wn = the winding number (=0 only when p is outside)
pub fn winding_number(ring: &[Point2D], p: &Point2D) -> i32 {
    let mut wn = 0i32;
    let n = ring.len();
    // loop through all edges of the ring
    for i in 0..n {
        let cur = &ring[i];
        let next = &ring[(i + 1) % n];
        if cur.y <= p.y {
            if next.y > p.y {
                // an upward crossing
                if is_left(cur, next, p) > 0 {
                    wn += 1i32;
                }
            }
        } else if next.y <= p.y {
            // a downward crossing
            if is_left(cur, next, p) < 0 {
                wn -= 1i32;
            }
        }
    }
    wn
}

/// A ring encloses the point when it winds clockwise around it, which is how
/// Shapefiles order the vertices of an outer boundary.
pub fn ring_contains(ring: &[Point2D], p: &Point2D) -> bool {
    winding_number(ring, p) < 0
}

/// Tests whether a multi-ring polygon contains a point.
///
/// At least one ring must wind clockwise around the point and no ring may wind
/// counter-clockwise around it. Holes are not subtracted even-odd style, so a
/// point inside a hole that is itself wound clockwise still reports as contained.
pub fn polygon_contains(rings: &[Vec<Point2D>], p: &Point2D) -> bool {
    let mut at_least_one_contained = false;
    let mut no_left_circles = true;
    for ring in rings {
        let wn = winding_number(ring, p);
        no_left_circles &= wn <= 0;
        at_least_one_contained |= wn < 0;
    }
    no_left_circles && at_least_one_contained
}
