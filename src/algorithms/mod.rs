/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
// private sub-module defined in other files
mod point_in_poly;

// exports identifiers from private sub-modules in the current module namespace
pub use self::point_in_poly::{
    dbl_equals, is_left, polygon_contains, ring_contains, winding_number, SLACK,
};
