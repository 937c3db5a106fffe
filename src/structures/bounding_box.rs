/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// An axis-aligned rectangle. Boxes decoded from a Shapefile are taken as
/// stored; `min_x <= max_x` is not enforced, and Null shapes carry a zeroed box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// A degenerate box covering a single coordinate.
    pub fn from_point(x: f64, y: f64) -> BoundingBox {
        BoundingBox {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Boxes order by their minimum x, with ties broken by minimum y.
impl PartialOrd for BoundingBox {
    fn partial_cmp(&self, other: &BoundingBox) -> Option<Ordering> {
        if self.min_x == other.min_x {
            self.min_y.partial_cmp(&other.min_y)
        } else {
            self.min_x.partial_cmp(&other.min_x)
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "( {:<12.8} , {:<12.8} ) to ( {:<12.8} , {:<12.8} )",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;

    #[test]
    fn test_ordering() {
        let a = BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        let b = BoundingBox { min_y: 0.5, ..a };
        let c = BoundingBox {
            min_x: -1.0,
            min_y: 9.0,
            max_x: 1.0,
            max_y: 10.0,
        };
        assert!(a < b);
        assert!(c < a);
        let mut boxes = vec![b, a, c];
        boxes.sort_by(|l, r| l.partial_cmp(r).unwrap());
        assert_eq!(boxes, vec![c, a, b]);
    }

    #[test]
    fn test_from_point() {
        let bb = BoundingBox::from_point(1.5, -2.0);
        assert_eq!(bb.min_x, bb.max_x);
        assert_eq!(bb.min_y, -2.0);
        assert_eq!(bb.max_y, -2.0);
    }
}
