//! Position-tracking byte streams for the container format.
//!
//! All multi-byte values are little-endian. Reads that run out of bytes
//! inside a field report the field name and the stream position.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::util::{Error, Result};

/// Output stream that counts bytes written.
pub struct OStream<W: Write> {
    writer: W,
    pos: u64,
}

impl<W: Write> OStream<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.pos += 1;
        Ok(())
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write an i32 value (little-endian).
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write a u32 length prefix followed by the raw bytes.
    pub fn write_prefixed(&mut self, data: &[u8], field: &'static str) -> Result<()> {
        let len = u32::try_from(data.len())
            .map_err(|_| Error::TooLarge { field, len: data.len() })?;
        self.write_u32(len)?;
        self.write_bytes(data)
    }

    /// Write a u32 element count followed by packed i32 values.
    pub fn write_i32_array(&mut self, values: &[i32], field: &'static str) -> Result<()> {
        let count = u32::try_from(values.len())
            .map_err(|_| Error::TooLarge { field, len: values.len() })?;
        self.write_u32(count)?;
        for &v in values {
            self.write_i32(v)?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and give back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// Input stream that counts bytes consumed.
pub struct IStream<R: Read> {
    reader: R,
    pos: u64,
}

impl<R: Read> IStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pos: 0 }
    }

    /// Get the current read position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Read one byte, or `None` on a clean end of stream.
    pub fn read_u8_or_eof(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let value = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| self.field_error(e, field))?;
        self.pos += 4;
        Ok(value)
    }

    /// Read an i32 value (little-endian).
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        let value = self
            .reader
            .read_i32::<LittleEndian>()
            .map_err(|e| self.field_error(e, field))?;
        self.pos += 4;
        Ok(value)
    }

    /// Read exactly `len` bytes.
    ///
    /// The buffer grows with the data actually present, so a corrupt length
    /// cannot force a huge allocation up front.
    pub fn read_exact_vec(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = {
            let mut limited = (&mut self.reader).take(len as u64);
            limited.read_to_end(&mut buf)
        };
        let got = read.map_err(|e| self.field_error(e, field))?;
        self.pos += got as u64;
        if got < len {
            return Err(Error::UnexpectedEof { field, pos: self.pos });
        }
        Ok(buf)
    }

    /// Read a u32 length prefix followed by that many bytes.
    pub fn read_prefixed(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let len = self.read_u32(field)? as usize;
        self.read_exact_vec(len, field)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let bytes = self.read_prefixed(field)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Read a u32 element count followed by packed i32 values.
    pub fn read_i32_array(&mut self, field: &'static str) -> Result<Vec<i32>> {
        let count = self.read_u32(field)? as usize;
        let byte_len = count
            .checked_mul(4)
            .ok_or_else(|| Error::invalid(format!("{field} count {count} overflows")))?;
        let bytes = self.read_exact_vec(byte_len, field)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn field_error(&self, err: io::Error, field: &'static str) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof { field, pos: self.pos }
        } else {
            Error::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_layout() -> Result<()> {
        let mut out = OStream::new(Vec::new());
        out.write_prefixed(b"abc", "name")?;
        out.write_i32(-2)?;
        assert_eq!(out.pos(), 11);
        let bytes = out.into_inner()?;
        assert_eq!(bytes, [3, 0, 0, 0, b'a', b'b', b'c', 0xFE, 0xFF, 0xFF, 0xFF]);
        Ok(())
    }

    #[test]
    fn test_clean_eof() -> Result<()> {
        let mut input = IStream::new(&[b'G'][..]);
        assert_eq!(input.read_u8_or_eof()?, Some(b'G'));
        assert_eq!(input.read_u8_or_eof()?, None);
        assert_eq!(input.pos(), 1);
        Ok(())
    }

    #[test]
    fn test_truncated_u32() {
        let mut input = IStream::new(&[1u8, 2][..]);
        let err = input.read_u32("owner name").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { field: "owner name", pos: 0 }));
    }

    #[test]
    fn test_truncated_payload_reports_position() {
        // Declares 10 bytes, provides 2.
        let data = [10u8, 0, 0, 0, b'h', b'i'];
        let mut input = IStream::new(&data[..]);
        let err = input.read_prefixed("blob").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { field: "blob", pos: 6 }));
    }

    #[test]
    fn test_i32_array() -> Result<()> {
        let mut out = OStream::new(Vec::new());
        out.write_i32_array(&[3, -1, i32::MAX], "ids")?;
        let bytes = out.into_inner()?;
        assert_eq!(bytes.len(), 4 + 12);

        let mut input = IStream::new(&bytes[..]);
        assert_eq!(input.read_i32_array("ids")?, vec![3, -1, i32::MAX]);
        Ok(())
    }
}
