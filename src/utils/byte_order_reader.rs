/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::error::{Result, ShapefileError};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// A cursor over a borrowed byte buffer. Every read checks the remaining
/// length first and reports a `ShapefileError::Format` rather than panicking.
///
/// The Shapefile format mixes big- and little-endian fields, so the byte
/// order can be switched between reads.
pub struct ByteOrderReader<'a> {
    pub byte_order: Endianness,
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> ByteOrderReader<'a> {
    pub fn new(buffer: &'a [u8], byte_order: Endianness) -> ByteOrderReader<'a> {
        ByteOrderReader {
            buffer: buffer,
            byte_order: byte_order,
            pos: 0usize,
        }
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.byte_order = byte_order;
    }

    /// Moves the cursor to an absolute position. Seeking past the end is an error.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.buffer.len() {
            return Err(ShapefileError::Format(format!(
                "Cannot seek to byte {} of a {} byte buffer",
                position,
                self.buffer.len()
            )));
        }
        self.pos = position;
        Ok(())
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8]> {
        if length > self.remaining() {
            return Err(ShapefileError::Format(format!(
                "Attempted to read {} bytes at offset {} of a {} byte buffer",
                length,
                self.pos,
                self.buffer.len()
            )));
        }
        let buf = &self.buffer[self.pos..self.pos + length];
        self.pos += length;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        // There's really no need for endian issues when reading single bytes.
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let buf = self.take(2)?;
        if self.byte_order == Endianness::LittleEndian {
            Ok(LittleEndian::read_u16(buf))
        } else {
            Ok(BigEndian::read_u16(buf))
        }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let buf = self.take(4)?;
        if self.byte_order == Endianness::LittleEndian {
            Ok(LittleEndian::read_u32(buf))
        } else {
            Ok(BigEndian::read_u32(buf))
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let buf = self.take(4)?;
        if self.byte_order == Endianness::LittleEndian {
            Ok(LittleEndian::read_i32(buf))
        } else {
            Ok(BigEndian::read_i32(buf))
        }
    }

    /// Reads the big-endian integers that lead the Shapefile header and each
    /// record prefix. The top bit of the first byte is a sign flag and the low
    /// 31 bits hold the magnitude; this is not two's complement. The current
    /// byte order is ignored.
    pub fn read_sign_magnitude_i32(&mut self) -> Result<i32> {
        let mut word = [0u8; 4];
        word.copy_from_slice(self.take(4)?);
        Ok(sign_magnitude_i32(&word))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let buf = self.take(8)?;
        if self.byte_order == Endianness::LittleEndian {
            Ok(LittleEndian::read_f64(buf))
        } else {
            Ok(BigEndian::read_f64(buf))
        }
    }
}

/// Decodes a 4-byte big-endian sign-magnitude integer.
pub fn sign_magnitude_i32(buf: &[u8; 4]) -> i32 {
    let magnitude = (BigEndian::read_u32(buf) & 0x7FFF_FFFF) as i32;
    if buf[0] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

#[cfg(test)]
mod test {
    use super::{sign_magnitude_i32, ByteOrderReader, Endianness};
    use crate::error::ShapefileError;

    #[test]
    fn test_sign_magnitude() {
        assert_eq!(sign_magnitude_i32(&[0x00, 0x00, 0x27, 0x0A]), 9994);
        assert_eq!(sign_magnitude_i32(&[0x80, 0x00, 0x00, 0x05]), -5);
        // two's complement -1 is not -1 here
        assert_eq!(sign_magnitude_i32(&[0xFF, 0xFF, 0xFF, 0xFF]), -0x7FFF_FFFF);
        assert_eq!(sign_magnitude_i32(&[0x80, 0x00, 0x00, 0x00]), 0);
    }

    #[test]
    fn test_sign_magnitude_reads() {
        let buf = [0x80u8, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x27, 0x0A, 0x01];
        let mut bor = ByteOrderReader::new(&buf, Endianness::LittleEndian);
        assert_eq!(bor.read_sign_magnitude_i32().unwrap(), -10);
        assert_eq!(bor.read_sign_magnitude_i32().unwrap(), 9994);
        // too few bytes left for another word
        assert!(bor.read_sign_magnitude_i32().is_err());
        assert_eq!(bor.pos(), 8);
    }

    #[test]
    fn test_switching_byte_order() {
        let buf = [0u8, 0, 0, 1, 1, 0, 0, 0];
        let mut bor = ByteOrderReader::new(&buf, Endianness::BigEndian);
        assert_eq!(bor.read_i32().unwrap(), 1);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 1);
        assert_eq!(bor.remaining(), 0);
    }

    #[test]
    fn test_reads_are_bounds_checked() {
        let buf = [0u8; 6];
        let mut bor = ByteOrderReader::new(&buf, Endianness::LittleEndian);
        assert!(bor.read_i32().is_ok());
        match bor.read_f64() {
            Err(ShapefileError::Format(_)) => {}
            other => panic!("expected a format error, got {:?}", other),
        }
        // a failed read leaves the cursor where it was
        assert_eq!(bor.pos(), 4);
        assert!(bor.read_u16().is_ok());
        assert!(bor.read_u8().is_err());
        assert!(bor.seek(7).is_err());
    }
}
