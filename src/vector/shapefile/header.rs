/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: The fixed 100-byte header at the start of every .shp file.
*/
use super::geometry::ShapeType;
use crate::error::{Result, ShapefileError};
use crate::structures::BoundingBox;
use crate::utils::{ByteOrderReader, Endianness};
use serde::Serialize;
use std::fmt;

/// The size of the main file header, in bytes.
pub const HEADER_SIZE: usize = 100;

/// The file code every Shapefile is expected to carry.
pub const FILE_CODE: i32 = 9994;

/// The only Shapefile version in use.
pub const VERSION: i32 = 1000;

// 100 bytes in size
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ShapefileHeader {
    pub file_code: i32,        // BigEndian; value is 9994
    pub unused: [i32; 5],      // BigEndian
    pub file_length: i64,      // BigEndian; stored in 16-bit words, held here in bytes
    pub version: i32,          // LittleEndian
    pub shape_type_code: i32,  // LittleEndian
    pub bounding_box: BoundingBox, // LittleEndian
    pub z_min: f64,            // LittleEndian; 0f64 if shapeType not z or measured
    pub z_max: f64,            // LittleEndian; 0f64 if shapeType not z or measured
    pub m_min: f64,            // LittleEndian; 0f64 if shapeType not measured
    pub m_max: f64,            // LittleEndian; 0f64 if shapeType not measured
}

impl ShapefileHeader {
    /// Decodes the header from the first 100 bytes of `buffer`.
    pub fn decode(buffer: &[u8]) -> Result<ShapefileHeader> {
        if buffer.len() < HEADER_SIZE {
            return Err(ShapefileError::Format(format!(
                "Insufficient bytes to gather shape file header: expected {} but found {}",
                HEADER_SIZE,
                buffer.len()
            )));
        }

        // The header mixes byte orders: the first seven words are big-endian
        // sign-magnitude integers and the rest is little-endian.
        let mut bor = ByteOrderReader::new(&buffer[0..HEADER_SIZE], Endianness::BigEndian);
        let mut header = ShapefileHeader::default();
        header.file_code = bor.read_sign_magnitude_i32()?;
        for i in 0..5 {
            header.unused[i] = bor.read_sign_magnitude_i32()?;
        }
        header.file_length = 2 * bor.read_sign_magnitude_i32()? as i64;

        bor.set_byte_order(Endianness::LittleEndian);
        header.version = bor.read_i32()?;
        header.shape_type_code = bor.read_i32()?;
        header.bounding_box = BoundingBox {
            min_x: bor.read_f64()?,
            min_y: bor.read_f64()?,
            max_x: bor.read_f64()?,
            max_y: bor.read_f64()?,
        };
        header.z_min = bor.read_f64()?;
        header.z_max = bor.read_f64()?;
        header.m_min = bor.read_f64()?;
        header.m_max = bor.read_f64()?;

        Ok(header)
    }

    /// The declared shape type of the file's records.
    pub fn shape_type(&self) -> ShapeType {
        ShapeType::from_int(self.shape_type_code)
    }

    /// Checks the file code and version against the published constants.
    pub fn validate(&self) -> Result<()> {
        if self.file_code != FILE_CODE {
            return Err(ShapefileError::Format(format!(
                "Unexpected file code {}; a Shapefile carries {}",
                self.file_code, FILE_CODE
            )));
        }
        if self.version != VERSION {
            return Err(ShapefileError::Format(format!(
                "Unsupported Shapefile version {}",
                self.version
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "fileCode =     {}
fileLength =   {} (actual bytes)
version =      {}
shapeType =    {} ({})
bounding box = {}
Zmin =         {:<12.8}
Zmax =         {:<12.8}
Mmin =         {:<12.8}
Mmax =         {:<12.8}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type_code,
            self.shape_type(),
            self.bounding_box,
            self.z_min,
            self.z_max,
            self.m_min,
            self.m_max
        )
    }
}
