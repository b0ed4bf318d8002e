//! Packed TF16 byte buffers

use crate::error::Result;
use crate::format::constants::TF16_ELEMENT_SIZE;
use crate::format::endian::{compose_u16, unpack_codes};

/// Raw big-endian TF16 codes, one per element, in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedBuffer(Vec<u8>);

impl PackedBuffer {
    /// Wrap raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Zero-filled buffer of `size` bytes, ready for a transport to fill
    pub fn zeroed(size: usize) -> Self {
        Self(vec![0u8; size])
    }

    /// Get the bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the bytes as a mutable slice
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Take ownership of the bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of whole codes in the buffer
    pub fn element_count(&self) -> usize {
        self.0.len() / TF16_ELEMENT_SIZE
    }

    /// Code at `index`, if present
    pub fn code(&self, index: usize) -> Option<u16> {
        let start = index.checked_mul(TF16_ELEMENT_SIZE)?;
        let pair = self.0.get(start..start.checked_add(TF16_ELEMENT_SIZE)?)?;
        Some(compose_u16(pair[0], pair[1]))
    }

    /// All codes; fails on an odd-length buffer
    pub fn codes(&self) -> Result<Vec<u16>> {
        unpack_codes(&self.0)
    }
}

impl From<Vec<u8>> for PackedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
