/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapefileError {
    /// A header or record payload is too short for its declared structure.
    #[error("Format error: {0}")]
    Format(String),
    /// The stream ended part way through a record.
    #[error("Truncated record {record}: expected {expected} bytes but found {found}")]
    Truncation {
        record: usize,
        expected: usize,
        found: usize,
    },
    /// A record declares more content than the reader is configured to buffer.
    #[error("Record {record} declares {length} content bytes, exceeding the maximum record size of {max}")]
    Size {
        record: usize,
        length: usize,
        max: usize,
    },
    #[error("Attribute table error: {0}")]
    Attribute(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShapefileError>;
