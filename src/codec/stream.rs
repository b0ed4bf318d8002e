//! Streaming packed buffers to and from byte streams

use crate::codec::buffer::PackedBuffer;
use crate::error::{CodecError, Result};
use crate::format::constants::TF16_ELEMENT_SIZE;
use crate::format::endian;
use crate::tensor::TensorLayout;
use std::io::{Read, Write};

/// Writes packed TF16 buffers to an underlying writer
#[derive(Debug)]
pub struct PackedWriter<W> {
    writer: W,
    position: u64,
}

impl<W: Write> PackedWriter<W> {
    /// Create a new packed writer
    pub fn new(writer: W) -> Self {
        Self { writer, position: 0 }
    }

    /// Write a whole packed buffer, returning the bytes written
    pub fn write_packed(&mut self, packed: &PackedBuffer) -> Result<usize> {
        self.writer.write_all(packed.as_bytes())?;
        self.position += packed.len() as u64;
        Ok(packed.len())
    }

    /// Write individual codes in big-endian order
    pub fn write_codes(&mut self, codes: &[u16]) -> Result<usize> {
        endian::write_codes(&mut self.writer, codes)?;
        let written = codes.len() * TF16_ELEMENT_SIZE;
        self.position += written as u64;
        Ok(written)
    }

    /// Bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(CodecError::from)
    }

    /// Get the underlying writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads packed TF16 buffers from an underlying reader
#[derive(Debug)]
pub struct PackedReader<R> {
    reader: R,
    position: u64,
}

impl<R: Read> PackedReader<R> {
    /// Create a new packed reader
    pub fn new(reader: R) -> Self {
        Self { reader, position: 0 }
    }

    /// Read exactly the bytes `layout` describes
    pub fn read_packed(&mut self, layout: &TensorLayout) -> Result<PackedBuffer> {
        let size = usize::try_from(layout.total_bytes()).map_err(|_| {
            CodecError::MalformedBuffer(format!(
                "layout of {} bytes does not fit in memory",
                layout.total_bytes()
            ))
        })?;

        let mut bytes = vec![0u8; size];
        self.reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => CodecError::MalformedBuffer(format!(
                "stream ended before {} bytes were read",
                size
            )),
            _ => CodecError::Io(e),
        })?;
        self.position += size as u64;
        Ok(PackedBuffer::new(bytes))
    }

    /// Read whatever remains of the stream
    pub fn read_to_end(&mut self) -> Result<PackedBuffer> {
        let mut bytes = Vec::new();
        let read = self.reader.read_to_end(&mut bytes)?;
        self.position += read as u64;
        Ok(PackedBuffer::new(bytes))
    }

    /// Read `count` codes
    pub fn read_codes(&mut self, count: usize) -> Result<Vec<u16>> {
        let size = count.checked_mul(TF16_ELEMENT_SIZE).ok_or_else(|| {
            CodecError::MalformedBuffer(format!("{} codes do not fit in memory", count))
        })?;
        let codes = endian::read_codes(&mut self.reader, count)?;
        self.position += size as u64;
        Ok(codes)
    }

    /// Bytes read so far
    pub fn position(&self) -> u64 {
        self.position
    }
}
