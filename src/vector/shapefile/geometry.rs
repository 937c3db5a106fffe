/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: Decoded Shapefile records and the decoders that build them from the
raw content of each record.
*/
use crate::algorithms::{dbl_equals, polygon_contains};
use crate::configs::PointLayout;
use crate::error::{Result, ShapefileError};
use crate::structures::{BoundingBox, Point2D};
use crate::utils::{ByteOrderReader, Endianness};
use std::fmt;
use tracing::debug;

/// One part of a PolyLine or Polygon. The first point need not repeat at the end.
pub type Ring = Vec<Point2D>;

/// A decoded Shapefile record.
///
/// The record number comes from the record prefix in the stream, not from
/// the record content. Shapes are immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    record_number: i32,
    shape_type: ShapeType,
    bounding_box: BoundingBox,
    geometry: ShapeGeometry,
}

/// The payload of a decoded record.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    Null,
    Point(Point2D),
    PolyLine(Vec<Ring>),
    Polygon(Vec<Ring>),
    /// An unrecognised shape type, or one this reader does not decode.
    Invalid,
}

impl Shape {
    pub fn null(record_number: i32) -> Shape {
        Shape {
            record_number: record_number,
            shape_type: ShapeType::Null,
            bounding_box: BoundingBox::default(),
            geometry: ShapeGeometry::Null,
        }
    }

    pub fn invalid(record_number: i32) -> Shape {
        Shape {
            record_number: record_number,
            shape_type: ShapeType::Invalid,
            bounding_box: BoundingBox::default(),
            geometry: ShapeGeometry::Invalid,
        }
    }

    pub fn point(record_number: i32, p: Point2D) -> Shape {
        Shape {
            record_number: record_number,
            shape_type: ShapeType::Point,
            bounding_box: BoundingBox::from_point(p.x, p.y),
            geometry: ShapeGeometry::Point(p),
        }
    }

    pub fn polyline(record_number: i32, bounding_box: BoundingBox, lines: Vec<Ring>) -> Shape {
        Shape {
            record_number: record_number,
            shape_type: ShapeType::PolyLine,
            bounding_box: bounding_box,
            geometry: ShapeGeometry::PolyLine(lines),
        }
    }

    pub fn polygon(record_number: i32, bounding_box: BoundingBox, rings: Vec<Ring>) -> Shape {
        Shape {
            record_number: record_number,
            shape_type: ShapeType::Polygon,
            bounding_box: bounding_box,
            geometry: ShapeGeometry::Polygon(rings),
        }
    }

    pub fn record_number(&self) -> i32 {
        self.record_number
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    /// The PolyLine parts or Polygon rings of the shape; empty for other variants.
    pub fn parts(&self) -> &[Ring] {
        match &self.geometry {
            ShapeGeometry::PolyLine(parts) | ShapeGeometry::Polygon(parts) => parts,
            _ => &[],
        }
    }

    pub fn num_points(&self) -> usize {
        match &self.geometry {
            ShapeGeometry::Point(_) => 1,
            ShapeGeometry::PolyLine(parts) | ShapeGeometry::Polygon(parts) => {
                parts.iter().map(|r| r.len()).sum()
            }
            _ => 0,
        }
    }

    /// The zero-based index of the matching row in the attribute table.
    /// Shape records count from one, attribute rows from zero.
    pub fn attribute_index(&self) -> Option<usize> {
        if self.record_number < 1 {
            return None;
        }
        Some(self.record_number as usize - 1)
    }

    /// Tests whether the shape contains a point.
    ///
    /// Points match on coordinate equality to within `SLACK`; polygons use the
    /// winding-number rule in `algorithms::polygon_contains`. Null, Invalid and
    /// PolyLine shapes never contain anything.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        match &self.geometry {
            ShapeGeometry::Point(p) => dbl_equals(p.x, x) && dbl_equals(p.y, y),
            ShapeGeometry::Polygon(rings) => polygon_contains(rings, &Point2D::new(x, y)),
            ShapeGeometry::Null | ShapeGeometry::PolyLine(_) | ShapeGeometry::Invalid => false,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "record: {} type: {} parts: {} points: {} bounding box: {}",
            self.record_number,
            self.shape_type,
            self.parts().len(),
            self.num_points(),
            self.bounding_box
        )
    }
}

/// Builds a shape from the raw content of one record.
///
/// Returns `Ok(None)` when the content is too short to hold a shape type.
/// Shape types this reader does not decode produce an Invalid shape rather
/// than an error.
pub fn build_shape(record_number: i32, buffer: &[u8], point_layout: PointLayout) -> Result<Option<Shape>> {
    if buffer.len() < 4 {
        return Ok(None);
    }
    let mut bor = ByteOrderReader::new(buffer, Endianness::LittleEndian);
    let shape_type_code = bor.read_i32()?;
    let content = &buffer[4..];

    let shape = match ShapeType::from_int(shape_type_code) {
        ShapeType::Null => Shape::null(record_number),
        ShapeType::Point => decode_point(record_number, content, point_layout)?,
        ShapeType::PolyLine => {
            let (bounding_box, parts) = decode_parts(content, "polyline")?;
            Shape::polyline(record_number, bounding_box, parts)
        }
        ShapeType::Polygon => {
            let (bounding_box, rings) = decode_parts(content, "polygon")?;
            Shape::polygon(record_number, bounding_box, rings)
        }
        other => {
            debug!(
                record = record_number,
                shape_type = shape_type_code,
                "Shape type {} is not decoded; record treated as invalid",
                other
            );
            Shape::invalid(record_number)
        }
    };
    Ok(Some(shape))
}

fn decode_point(record_number: i32, buffer: &[u8], point_layout: PointLayout) -> Result<Shape> {
    if buffer.len() < 8 {
        return Err(ShapefileError::Format(format!(
            "Insufficient bytes for point shape in record {}",
            record_number
        )));
    }
    let mut bor = ByteOrderReader::new(buffer, Endianness::LittleEndian);
    let x = bor.read_f64()?;
    let y_offset = match point_layout {
        PointLayout::Standard => 8,
        PointLayout::Legacy => 4,
    };
    bor.seek(y_offset)?;
    let y = bor.read_f64()?;
    Ok(Shape::point(record_number, Point2D::new(x, y)))
}

/// Decodes the shared PolyLine/Polygon layout: bounding box, part and point
/// counts, the part-index array and the flat point array.
fn decode_parts(buffer: &[u8], kind: &str) -> Result<(BoundingBox, Vec<Ring>)> {
    if buffer.len() < 40 {
        return Err(ShapefileError::Format(format!(
            "Insufficient bytes for {} shape",
            kind
        )));
    }
    let mut bor = ByteOrderReader::new(buffer, Endianness::LittleEndian);
    let bounding_box = BoundingBox {
        min_x: bor.read_f64()?,
        min_y: bor.read_f64()?,
        max_x: bor.read_f64()?,
        max_y: bor.read_f64()?,
    };
    let num_parts = bor.read_i32()?;
    let num_points = bor.read_i32()?;
    if num_parts < 0 || num_points < 0 {
        return Err(ShapefileError::Format(format!(
            "Negative part ({}) or point ({}) count in {} shape",
            num_parts, num_points, kind
        )));
    }
    let num_parts = num_parts as usize;
    let num_points = num_points as usize;
    // Both counts fit in 31 bits, so the size cannot overflow a u64 even
    // where usize is 32 bits wide.
    let declared_size = 40 + 4 * num_parts as u64 + 8 * num_points as u64;
    if (buffer.len() as u64) < declared_size {
        return Err(ShapefileError::Format(format!(
            "Exceeded structure size reading points of {} shape",
            kind
        )));
    }

    // Each part index is the start of that part in the flat point array, so
    // a part's length is the distance to the next start (or to num_points).
    let mut starts = Vec::with_capacity(num_parts);
    for _ in 0..num_parts {
        starts.push(bor.read_i32()?);
    }
    let mut counts = Vec::with_capacity(num_parts);
    for (i, &start) in starts.iter().enumerate() {
        let end = if i + 1 < num_parts {
            starts[i + 1] as i64
        } else {
            num_points as i64
        };
        if (i == 0 && start != 0) || start < 0 || (start as i64) > end {
            return Err(ShapefileError::Format(format!(
                "Invalid part index {} for part {} of {} shape with {} points",
                start, i, kind, num_points
            )));
        }
        counts.push((end - start as i64) as usize);
    }

    let mut parts: Vec<Ring> = Vec::with_capacity(num_parts);
    for count in counts {
        let mut ring: Ring = Vec::with_capacity(count);
        for _ in 0..count {
            let x = bor.read_f64()?;
            let y = bor.read_f64()?;
            ring.push(Point2D::new(x, y));
        }
        parts.push(ring);
    }

    Ok((bounding_box, parts))
}

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
    Invalid = 255,
}

impl ShapeType {
    /// Maps a stored shape type code to a ShapeType. Unknown codes map to
    /// `ShapeType::Invalid`.
    pub fn from_int(value: i32) -> ShapeType {
        match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => ShapeType::Invalid,
        }
    }

    pub fn to_int(&self) -> i32 {
        *self as i32
    }
}

/// Prints the name used in reports, e.g. "POLYGON Z".
impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "NULL",
            ShapeType::Point => "POINT",
            ShapeType::PolyLine => "POLYLINE",
            ShapeType::Polygon => "POLYGON",
            ShapeType::MultiPoint => "MULTIPOINT",
            ShapeType::PointZ => "POINT Z",
            ShapeType::PolyLineZ => "POLYLINE Z",
            ShapeType::PolygonZ => "POLYGON Z",
            ShapeType::MultiPointZ => "MULTIPOINT Z",
            ShapeType::PointM => "POINT M",
            ShapeType::PolyLineM => "POLYLINE M",
            ShapeType::PolygonM => "POLYGON M",
            ShapeType::MultiPointM => "MULTIPOINT M",
            ShapeType::MultiPatch => "MULTIPATCH",
            ShapeType::Invalid => "INVALID",
        };
        write!(f, "{}", printable)
    }
}
