/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use serde::Serialize;
use std::fmt;

/// A 2-D point, with x and y fields.
#[derive(Default, Copy, Clone, Debug, Serialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    /// Creates a new Point2D.
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x: x, y: y }
    }
}

// Exact comparison; use `algorithms::dbl_equals` for tolerant checks.
impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

