/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

NOTE: Structures and functions for reading the Shapefile attribute table
contained with the associated .dbf file. Only the field descriptors and the
raw bytes of each record are exposed; the values are not decoded.
*/
use crate::error::{Result, ShapefileError};
use crate::utils::{ByteOrderReader, Endianness};
use chrono::NaiveDate;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// The size of the fixed part of the table header and of each field descriptor.
const DESCRIPTOR_SIZE: usize = 32;

/// Marks the end of the field descriptor array.
const DESCRIPTOR_TERMINATOR: u8 = 0x0d;

/// The source of attribute rows joined to decoded shapes.
pub trait AttributeTable {
    /// The field descriptors, in table order.
    fn fields(&self) -> &[AttributeField];

    fn num_records(&self) -> usize;

    /// The raw, fixed-length bytes of a record, including the leading
    /// deletion flag. `index` counts from zero.
    fn record_bytes(&mut self, index: usize) -> Result<&[u8]>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FieldType {
    Text,
    Number,
    Logical,
    Invalid,
}

impl FieldType {
    pub fn from_char(c: char) -> FieldType {
        match c {
            'C' | 'c' => FieldType::Text,
            'N' | 'n' => FieldType::Number,
            'L' | 'l' => FieldType::Logical,
            _ => FieldType::Invalid,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            FieldType::Text => "TEXT",
            FieldType::Number => "NUMBER",
            FieldType::Logical => "LOGICAL",
            FieldType::Invalid => "INVALID",
        };
        write!(f, "{}", printable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeField {
    pub name: String,
    pub field_type: FieldType,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(name: &str, field_type: FieldType, field_length: u8, decimal_count: u8) -> AttributeField {
        AttributeField {
            name: name.to_string(),
            field_type: field_type,
            field_length: field_length,
            decimal_count: decimal_count,
        }
    }

    /// Decodes one 32-byte field descriptor.
    fn decode(buffer: &[u8]) -> Result<AttributeField> {
        if buffer.len() != DESCRIPTOR_SIZE {
            return Err(ShapefileError::Attribute(format!(
                "Expected a field descriptor of {} bytes, but got {}",
                DESCRIPTOR_SIZE,
                buffer.len()
            )));
        }
        // The name is at most 10 characters, NUL padded.
        let name_bytes = &buffer[0..10];
        let name_len = name_bytes.iter().position(|b| *b == 0).unwrap_or(10);
        let name = String::from_utf8_lossy(&name_bytes[0..name_len]).to_string();
        Ok(AttributeField {
            name: name,
            field_type: FieldType::from_char(char::from(buffer[11])),
            field_length: buffer[16],
            decimal_count: buffer[17],
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct AttributeHeader {
    pub version: u8,
    pub last_update: Option<NaiveDate>,
    pub num_records: u32,
    pub bytes_in_header: u16,
    pub bytes_in_record: u16,
}

/// A dBASE table read on demand from any seekable source.
pub struct DbfTable<R: Read + Seek> {
    reader: R,
    pub header: AttributeHeader,
    fields: Vec<AttributeField>,
    record_buffer: Vec<u8>,
}

impl DbfTable<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<DbfTable<BufReader<File>>> {
        let f = File::open(path)?;
        DbfTable::new(BufReader::new(f))
    }
}

impl<R: Read + Seek> DbfTable<R> {
    pub fn new(mut reader: R) -> Result<DbfTable<R>> {
        let mut fixed = [0u8; DESCRIPTOR_SIZE];
        read_exact_or(&mut reader, &mut fixed, "Not able to read the table header")?;
        let mut bor = ByteOrderReader::new(&fixed, Endianness::LittleEndian);
        let mut header = AttributeHeader::default();
        header.version = bor.read_u8()?;
        let year = 1900 + bor.read_u8()? as i32;
        let month = bor.read_u8()? as u32;
        let day = bor.read_u8()? as u32;
        header.last_update = NaiveDate::from_ymd_opt(year, month, day);
        header.num_records = bor.read_u32()?;
        header.bytes_in_header = bor.read_u16()?;
        header.bytes_in_record = bor.read_u16()?;

        // the field descriptors follow the fixed header
        let mut fields = vec![];
        let mut descriptor = [0u8; DESCRIPTOR_SIZE];
        let mut pos = DESCRIPTOR_SIZE;
        while pos < header.bytes_in_header as usize {
            // the terminator can end the array on a single byte
            let mut first = [0u8; 1];
            read_exact_or(
                &mut reader,
                &mut first,
                &format!("Unable to read field {}", fields.len() + 1),
            )?;
            if first[0] == DESCRIPTOR_TERMINATOR {
                break;
            }
            descriptor[0] = first[0];
            read_exact_or(
                &mut reader,
                &mut descriptor[1..],
                &format!("Unable to read field {}", fields.len() + 1),
            )?;
            fields.push(AttributeField::decode(&descriptor)?);
            pos += DESCRIPTOR_SIZE;
        }

        Ok(DbfTable {
            reader: reader,
            record_buffer: vec![0u8; header.bytes_in_record as usize],
            header: header,
            fields: fields,
        })
    }

    pub fn version(&self) -> u8 {
        self.header.version
    }

    pub fn record_size(&self) -> usize {
        self.header.bytes_in_record as usize
    }

    /// Returns the index of the field with the given name.
    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl<R: Read + Seek> AttributeTable for DbfTable<R> {
    fn fields(&self) -> &[AttributeField] {
        &self.fields
    }

    fn num_records(&self) -> usize {
        self.header.num_records as usize
    }

    fn record_bytes(&mut self, index: usize) -> Result<&[u8]> {
        if index >= self.num_records() {
            return Err(ShapefileError::Attribute(format!(
                "Record {} requested from a table of {} records",
                index,
                self.num_records()
            )));
        }
        let position = self.header.bytes_in_header as u64 + index as u64 * self.record_size() as u64;
        self.reader.seek(SeekFrom::Start(position))?;
        read_exact_or(
            &mut self.reader,
            &mut self.record_buffer,
            &format!("Failure to read record {} from file", index),
        )?;
        Ok(&self.record_buffer)
    }
}

fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], msg: &str) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(ShapefileError::Attribute(msg.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
