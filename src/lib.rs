/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: Decodes the geometry of ESRI Shapefiles and answers point-in-polygon
queries against the decoded shapes.
*/
pub mod algorithms;
pub mod configs;
pub mod error;
pub mod structures;
pub mod utils;
pub mod vector;

pub use crate::configs::{get_configs, PointLayout, ShapefileConfigs};
pub use crate::error::{Result, ShapefileError};
pub use crate::structures::{BoundingBox, Point2D};
pub use crate::vector::{
    AttributeField, AttributeTable, DbfTable, FieldType, Shape, ShapeGeometry, ShapeType,
    Shapefile, ShapefileHeader,
};
