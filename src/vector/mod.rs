/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

/*
Eventually this could support other vector formats but
for now it's just Shapefiles.
*/

pub mod shapefile;

// exports identifiers from sub-modules in the current module namespace
pub use self::shapefile::attributes::{
    AttributeField, AttributeHeader, AttributeTable, DbfTable, FieldType,
};
pub use self::shapefile::geometry::{build_shape, Ring, Shape, ShapeGeometry, ShapeType};
pub use self::shapefile::header::ShapefileHeader;
pub use self::shapefile::Shapefile;
