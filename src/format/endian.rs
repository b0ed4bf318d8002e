//! Big-endian byte operations for packed TF16 codes
//!
//! Every packed buffer stores the most significant byte of a code first,
//! regardless of the host byte order.

use crate::error::{CodecError, Result};
use crate::format::constants::TF16_ELEMENT_SIZE;
use std::io::{Read, Write};

/// Compose a code from its high and low bytes
#[inline]
pub fn compose_u16(high: u8, low: u8) -> u16 {
    (u16::from(high) << 8) | u16::from(low)
}

/// Read a u16 in big-endian format
pub fn read_u16_be<R: Read>(reader: &mut R) -> Result<u16> {
    let mut buf = [0u8; TF16_ELEMENT_SIZE];
    reader.read_exact(&mut buf).map_err(CodecError::from)?;
    Ok(compose_u16(buf[0], buf[1]))
}

/// Write a u16 in big-endian format
pub fn write_u16_be<W: Write>(writer: &mut W, value: u16) -> Result<()> {
    writer.write_all(&value.to_be_bytes()).map_err(CodecError::from)
}

/// Pack codes into a big-endian byte buffer
pub fn pack_codes(codes: &[u16]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(codes.len() * TF16_ELEMENT_SIZE);
    for code in codes {
        packed.extend_from_slice(&code.to_be_bytes());
    }
    packed
}

/// Unpack a big-endian byte buffer into codes
pub fn unpack_codes(packed: &[u8]) -> Result<Vec<u16>> {
    if packed.len() % TF16_ELEMENT_SIZE != 0 {
        return Err(CodecError::MalformedBuffer(format!(
            "buffer length {} is not a multiple of {}",
            packed.len(),
            TF16_ELEMENT_SIZE
        )));
    }

    Ok(packed.chunks_exact(TF16_ELEMENT_SIZE).map(|pair| compose_u16(pair[0], pair[1])).collect())
}

/// Write a whole packed buffer of codes to a stream
pub fn write_codes<W: Write>(writer: &mut W, codes: &[u16]) -> Result<()> {
    for &code in codes {
        write_u16_be(writer, code)?;
    }
    Ok(())
}

/// Read `count` codes from a stream
pub fn read_codes<R: Read>(reader: &mut R, count: usize) -> Result<Vec<u16>> {
    let mut codes = Vec::with_capacity(count);
    for _ in 0..count {
        codes.push(read_u16_be(reader)?);
    }
    Ok(codes)
}
