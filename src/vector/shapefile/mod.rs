/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: The logic behind reading the ESRI Shapefile main (.shp) file. Records
are pulled sequentially from any byte stream and decoded into shapes that the
reader owns until they are taken.
*/
pub mod attributes;
pub mod geometry;
pub mod header;

pub use self::attributes::{
    AttributeField, AttributeHeader, AttributeTable, DbfTable, FieldType,
};
pub use self::geometry::{build_shape, Ring, Shape, ShapeGeometry, ShapeType};
pub use self::header::{ShapefileHeader, FILE_CODE, HEADER_SIZE, VERSION};
use crate::configs::ShapefileConfigs;
use crate::error::{Result, ShapefileError};
use crate::utils::{ByteOrderReader, Endianness};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// The size of the record number and content length that precede each record.
const RECORD_PREFIX_SIZE: usize = 8;

pub struct Shapefile {
    header: ShapefileHeader,
    num_records: usize,
    shapes: Vec<Shape>,
}

impl Shapefile {
    /// Opens and reads the .shp file at `path`.
    pub fn read<P: AsRef<Path>>(path: P, configs: &ShapefileConfigs) -> Result<Shapefile> {
        let path = path.as_ref();
        debug!(file = %path.display(), "opening shapefile");
        let f = File::open(path)?;
        Shapefile::from_reader(BufReader::new(f), configs)
    }

    /// Reads the header and every record from `reader`. Any error ends the
    /// read and no partially read Shapefile is returned.
    pub fn from_reader<R: Read>(mut reader: R, configs: &ShapefileConfigs) -> Result<Shapefile> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        let n = fill_buffer(&mut reader, &mut header_bytes)?;
        let header = ShapefileHeader::decode(&header_bytes[0..n])?;
        if configs.strict {
            header.validate()?;
        }
        debug!(
            file_code = header.file_code,
            file_length = header.file_length,
            shape_type = %header.shape_type(),
            "read shapefile header"
        );

        let mut sf = Shapefile {
            header: header,
            num_records: 0,
            shapes: Vec::with_capacity(configs.shapes_reserve),
        };

        // One scratch buffer serves every record.
        let mut buffer = vec![0u8; configs.max_record_size];
        let mut prefix = [0u8; RECORD_PREFIX_SIZE];
        loop {
            let ordinal = sf.num_records + 1;
            let n = fill_buffer(&mut reader, &mut prefix)?;
            if n == 0 {
                break;
            }
            if n < RECORD_PREFIX_SIZE {
                return Err(ShapefileError::Truncation {
                    record: ordinal,
                    expected: RECORD_PREFIX_SIZE,
                    found: n,
                });
            }

            let mut bor = ByteOrderReader::new(&prefix, Endianness::BigEndian);
            let record_number = bor.read_sign_magnitude_i32()?;
            let length_words = bor.read_sign_magnitude_i32()?;
            if length_words < 0 {
                return Err(ShapefileError::Format(format!(
                    "Record {} declares a negative content length ({} words)",
                    record_number, length_words
                )));
            }
            let content_length = (length_words as usize).saturating_mul(2);
            if content_length > configs.max_record_size {
                return Err(ShapefileError::Size {
                    record: ordinal,
                    length: content_length,
                    max: configs.max_record_size,
                });
            }

            let content = &mut buffer[0..content_length];
            let n = fill_buffer(&mut reader, content)?;
            if n < content_length {
                return Err(ShapefileError::Truncation {
                    record: ordinal,
                    expected: content_length,
                    found: n,
                });
            }
            sf.num_records += 1;

            match build_shape(record_number, content, configs.point_layout)? {
                Some(shape) => {
                    debug!(
                        record = record_number,
                        shape_type = %shape.shape_type(),
                        bytes = content_length,
                        "decoded record"
                    );
                    sf.shapes.push(shape);
                }
                None => {
                    warn!(
                        record = record_number,
                        bytes = content_length,
                        "record too short to hold a shape type; skipped"
                    );
                }
            }
        }

        info!(
            records = sf.num_records,
            shapes = sf.shapes.len(),
            shape_type = %sf.header.shape_type(),
            "finished reading shapefile"
        );
        Ok(sf)
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    /// The decoded shapes, in stream order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Moves the decoded shapes out of the reader. Later calls return an
    /// empty vector.
    pub fn take_shapes(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }

    /// The number of complete records read from the stream, including those
    /// that were too short to produce a shape.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn get_record(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_total_num_parts(&self) -> usize {
        self.shapes.iter().map(|s| s.parts().len()).sum()
    }

    pub fn get_total_num_points(&self) -> usize {
        self.shapes.iter().map(|s| s.num_points()).sum()
    }

    /// Returns every shape containing (x, y), in stream order. Shapes are
    /// tested in parallel.
    pub fn find_containing(&self, x: f64, y: f64) -> Vec<&Shape> {
        self.shapes
            .par_iter()
            .filter(|s| s.contains_point(x, y))
            .collect()
    }
}

/// Reads until `buf` is full or the stream ends, returning the number of
/// bytes read.
fn fill_buffer<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(total)
}

#[cfg(test)]
pub(crate) mod test {
    use super::Shapefile;
    use crate::configs::ShapefileConfigs;
    use crate::error::ShapefileError;
    use crate::vector::shapefile::geometry::{ShapeGeometry, ShapeType};
    use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
    use std::io::Cursor;

    pub(crate) fn header_bytes(shape_type: i32, length_words: u32) -> Vec<u8> {
        let mut buf = vec![];
        buf.write_u32::<BigEndian>(9994).unwrap();
        for _ in 0..5 {
            buf.write_u32::<BigEndian>(0).unwrap();
        }
        buf.write_u32::<BigEndian>(length_words).unwrap();
        buf.write_i32::<LittleEndian>(1000).unwrap();
        buf.write_i32::<LittleEndian>(shape_type).unwrap();
        for _ in 0..8 {
            buf.write_f64::<LittleEndian>(0f64).unwrap();
        }
        buf
    }

    pub(crate) fn push_record(buf: &mut Vec<u8>, record_number: u32, content: &[u8]) {
        buf.write_u32::<BigEndian>(record_number).unwrap();
        buf.write_u32::<BigEndian>((content.len() / 2) as u32).unwrap();
        buf.extend_from_slice(content);
    }

    pub(crate) fn point_content(x: f64, y: f64) -> Vec<u8> {
        let mut content = vec![];
        content.write_i32::<LittleEndian>(1).unwrap();
        content.write_f64::<LittleEndian>(x).unwrap();
        content.write_f64::<LittleEndian>(y).unwrap();
        content
    }

    fn square_content(min: f64, max: f64) -> Vec<u8> {
        let mut content = vec![];
        content.write_i32::<LittleEndian>(5).unwrap();
        for v in [min, min, max, max] {
            content.write_f64::<LittleEndian>(v).unwrap();
        }
        content.write_i32::<LittleEndian>(1).unwrap();
        content.write_i32::<LittleEndian>(5).unwrap();
        content.write_i32::<LittleEndian>(0).unwrap();
        // clockwise
        for (x, y) in [(min, min), (min, max), (max, max), (max, min), (min, min)] {
            content.write_f64::<LittleEndian>(x).unwrap();
            content.write_f64::<LittleEndian>(y).unwrap();
        }
        content
    }

    #[test]
    fn test_read_points() {
        let mut buf = header_bytes(1, 50);
        push_record(&mut buf, 1, &point_content(1.0, 2.0));
        push_record(&mut buf, 2, &point_content(3.0, 4.0));
        let mut sf = Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()).unwrap();
        assert_eq!(sf.header().shape_type(), ShapeType::Point);
        assert_eq!(sf.num_records(), 2);
        assert_eq!(sf.shapes().len(), 2);
        assert_eq!(sf.shapes()[1].record_number(), 2);
        assert_eq!(sf.get_total_num_points(), 2);
        assert_eq!(sf.get_total_num_parts(), 0);

        let shapes = sf.take_shapes();
        assert_eq!(shapes.len(), 2);
        assert!(sf.take_shapes().is_empty());
        assert!(sf.shapes().is_empty());
    }

    #[test]
    fn test_header_only() {
        let buf = header_bytes(5, 50);
        let sf = Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()).unwrap();
        assert_eq!(sf.num_records(), 0);
        assert!(sf.shapes().is_empty());
    }

    #[test]
    fn test_short_header() {
        let buf = header_bytes(5, 50);
        match Shapefile::from_reader(Cursor::new(buf[0..60].to_vec()), &ShapefileConfigs::new()) {
            Err(ShapefileError::Format(_)) => {}
            Err(e) => panic!("expected a format error, got {:?}", e),
            Ok(_) => panic!("expected a format error"),
        }
    }

    #[test]
    fn test_strict_header() {
        let mut buf = header_bytes(1, 50);
        buf[0] = 0x80; // negative file code
        let configs = ShapefileConfigs::new();
        assert!(Shapefile::from_reader(Cursor::new(buf.clone()), &configs).is_ok());
        let strict = ShapefileConfigs {
            strict: true,
            ..ShapefileConfigs::new()
        };
        assert!(Shapefile::from_reader(Cursor::new(buf), &strict).is_err());
    }

    #[test]
    fn test_oversized_record() {
        let mut buf = header_bytes(1, 50);
        push_record(&mut buf, 1, &point_content(1.0, 2.0));
        push_record(&mut buf, 2, &[0u8; 64]);
        let configs = ShapefileConfigs {
            max_record_size: 32,
            ..ShapefileConfigs::new()
        };
        match Shapefile::from_reader(Cursor::new(buf), &configs) {
            Err(ShapefileError::Size { record, length, max }) => {
                assert_eq!(record, 2);
                assert_eq!(length, 64);
                assert_eq!(max, 32);
            }
            Err(e) => panic!("expected a size error, got {:?}", e),
            Ok(_) => panic!("expected a size error"),
        }
    }

    #[test]
    fn test_truncated_prefix() {
        for extra in 1..8 {
            let mut buf = header_bytes(1, 50);
            push_record(&mut buf, 1, &point_content(1.0, 2.0));
            buf.extend_from_slice(&[0u8; 8][0..extra]);
            match Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()) {
                Err(ShapefileError::Truncation {
                    record,
                    expected,
                    found,
                }) => {
                    assert_eq!(record, 2);
                    assert_eq!(expected, 8);
                    assert_eq!(found, extra);
                }
                Err(e) => panic!("expected a truncation error, got {:?}", e),
                Ok(_) => panic!("expected a truncation error for {} bytes", extra),
            }
        }
    }

    #[test]
    fn test_truncated_content() {
        let mut buf = header_bytes(1, 50);
        push_record(&mut buf, 1, &point_content(1.0, 2.0));
        buf.truncate(buf.len() - 3);
        match Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()) {
            Err(ShapefileError::Truncation {
                record,
                expected,
                found,
            }) => {
                assert_eq!(record, 1);
                assert_eq!(expected, 20);
                assert_eq!(found, 17);
            }
            Err(e) => panic!("expected a truncation error, got {:?}", e),
            Ok(_) => panic!("expected a truncation error"),
        }
    }

    #[test]
    fn test_negative_content_length() {
        let mut buf = header_bytes(1, 50);
        buf.write_u32::<BigEndian>(1).unwrap();
        buf.write_u32::<BigEndian>(0x8000_000A).unwrap();
        match Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()) {
            Err(ShapefileError::Format(_)) => {}
            Err(e) => panic!("expected a format error, got {:?}", e),
            Ok(_) => panic!("expected a format error"),
        }
    }

    #[test]
    fn test_indeterminate_records_are_skipped() {
        let mut buf = header_bytes(1, 50);
        push_record(&mut buf, 1, &[]);
        push_record(&mut buf, 2, &[1u8, 0]);
        push_record(&mut buf, 3, &point_content(5.0, 6.0));
        let sf = Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()).unwrap();
        assert_eq!(sf.num_records(), 3);
        assert_eq!(sf.shapes().len(), 1);
        assert_eq!(sf.shapes()[0].record_number(), 3);
        assert_eq!(sf.get_record(0).map(|s| s.record_number()), Some(3));
        assert!(sf.get_record(1).is_none());
    }

    #[test]
    fn test_find_containing() {
        let mut buf = header_bytes(5, 50);
        push_record(&mut buf, 1, &square_content(0.0, 10.0));
        push_record(&mut buf, 2, &square_content(20.0, 30.0));
        push_record(&mut buf, 3, &square_content(-5.0, 15.0));
        let mut null_content = vec![];
        null_content.write_i32::<LittleEndian>(0).unwrap();
        push_record(&mut buf, 4, &null_content);
        let sf = Shapefile::from_reader(Cursor::new(buf), &ShapefileConfigs::new()).unwrap();
        assert_eq!(sf.shapes().len(), 4);
        assert_eq!(*sf.shapes()[3].geometry(), ShapeGeometry::Null);
        assert_eq!(sf.get_total_num_parts(), 3);
        assert_eq!(sf.get_total_num_points(), 15);

        let found: Vec<i32> = sf
            .find_containing(5.0, 5.0)
            .iter()
            .map(|s| s.record_number())
            .collect();
        assert_eq!(found, vec![1, 3]);
        assert!(sf.find_containing(100.0, 100.0).is_empty());
    }
}
