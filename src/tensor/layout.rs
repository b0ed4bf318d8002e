//! Byte layout of a packed tensor

use crate::error::{CodecError, Result};
use crate::format::constants::TF16_ELEMENT_SIZE;
use crate::tensor::shape::TensorShape;
use serde::{Deserialize, Serialize};

/// Byte strides and total size of a row-major tensor buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LayoutRepr")]
pub struct TensorLayout {
    strides: Vec<u64>,
    total_bytes: u64,
    element_size: usize,
}

#[derive(Deserialize)]
struct LayoutRepr {
    strides: Vec<u64>,
    total_bytes: u64,
    element_size: usize,
}

impl TryFrom<LayoutRepr> for TensorLayout {
    type Error = CodecError;

    /// Recover the dimensions from the strides and resolve them again, so a
    /// deserialized layout is always one `resolve` could have produced.
    fn try_from(repr: LayoutRepr) -> Result<Self> {
        let inconsistent = || {
            CodecError::InvalidShape(format!(
                "strides {:?} with {} bytes of {}-byte elements is not a row-major layout",
                repr.strides, repr.total_bytes, repr.element_size
            ))
        };

        let mut dims = Vec::with_capacity(repr.strides.len());
        let mut outer = repr.total_bytes;
        for &stride in &repr.strides {
            if stride == 0 || outer % stride != 0 {
                return Err(inconsistent());
            }
            dims.push(outer / stride);
            outer = stride;
        }
        if outer != repr.element_size as u64 {
            return Err(inconsistent());
        }

        Self::resolve(&TensorShape::new(dims)?, repr.element_size)
    }
}

impl TensorLayout {
    /// Resolve the layout of `shape` with `element_size` bytes per element.
    ///
    /// The last dimension is contiguous: its stride is `element_size`, and
    /// every earlier stride is the next stride times the next extent.
    pub fn resolve(shape: &TensorShape, element_size: usize) -> Result<Self> {
        if element_size == 0 {
            return Err(CodecError::InvalidShape("Element size must be positive".to_string()));
        }

        let element_bytes = element_size as u64;
        let total_bytes = shape.element_count().checked_mul(element_bytes).ok_or_else(|| {
            CodecError::InvalidShape(format!("Byte size of {} overflows", shape))
        })?;
        // Every stride is at most the total size, so these cannot overflow
        let strides: Vec<u64> = shape.calculate_strides().iter().map(|s| s * element_bytes).collect();

        Ok(Self { strides, total_bytes, element_size })
    }

    /// Resolve the layout of a packed TF16 tensor from raw dimensions
    pub fn tf16(dims: &[u64]) -> Result<Self> {
        Self::resolve(&TensorShape::try_from(dims)?, TF16_ELEMENT_SIZE)
    }

    /// Byte stride of each dimension
    pub fn strides(&self) -> &[u64] {
        &self.strides
    }

    /// Size of the whole buffer in bytes
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Bytes per element
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of elements the buffer holds
    pub fn element_count(&self) -> u64 {
        self.total_bytes / self.element_size as u64
    }

    /// Check that a buffer of `len` bytes fits this layout exactly
    pub fn check_buffer_len(&self, len: usize) -> Result<()> {
        if len as u64 != self.total_bytes {
            return Err(CodecError::MalformedBuffer(format!(
                "buffer holds {} bytes, layout expects {}",
                len, self.total_bytes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_image_layout() {
        let layout = TensorLayout::tf16(&[1, 224, 224, 3]).unwrap();
        assert_eq!(layout.strides(), &[301_056, 1_344, 6, 2]);
        assert_eq!(layout.total_bytes(), 301_056);
        assert_eq!(layout.element_count(), 150_528);
    }

    #[test]
    fn test_resolve_vector_layout() {
        let layout = TensorLayout::tf16(&[1001]).unwrap();
        assert_eq!(layout.strides(), &[2]);
        assert_eq!(layout.total_bytes(), 2002);
    }

    #[test]
    fn test_resolve_other_element_size() {
        let shape = TensorShape::new(vec![2, 3]).unwrap();
        let layout = TensorLayout::resolve(&shape, 4).unwrap();
        assert_eq!(layout.strides(), &[12, 4]);
        assert_eq!(layout.total_bytes(), 24);
        assert!(TensorLayout::resolve(&shape, 0).is_err());
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(TensorLayout::tf16(&[]), Err(CodecError::InvalidShape(_))));
        assert!(matches!(TensorLayout::tf16(&[4, 0, 2]), Err(CodecError::InvalidShape(_))));
        assert!(matches!(TensorLayout::tf16(&[u64::MAX / 2, 3]), Err(CodecError::InvalidShape(_))));
    }

    #[test]
    fn test_check_buffer_len() {
        let layout = TensorLayout::tf16(&[2, 2]).unwrap();
        assert!(layout.check_buffer_len(8).is_ok());
        assert!(matches!(layout.check_buffer_len(6), Err(CodecError::MalformedBuffer(_))));
    }

    #[test]
    fn test_layout_deserialize_is_validated() {
        let layout = TensorLayout::tf16(&[2, 3, 4]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(serde_json::from_str::<TensorLayout>(&json).unwrap(), layout);

        let zero_size = r#"{"strides":[0],"total_bytes":0,"element_size":0}"#;
        assert!(serde_json::from_str::<TensorLayout>(zero_size).is_err());

        let empty = r#"{"strides":[],"total_bytes":8,"element_size":2}"#;
        assert!(serde_json::from_str::<TensorLayout>(empty).is_err());

        let bad_stride = r#"{"strides":[5,2],"total_bytes":10,"element_size":2}"#;
        assert!(serde_json::from_str::<TensorLayout>(bad_stride).is_err());

        let wrong_total = r#"{"strides":[6,2],"total_bytes":13,"element_size":2}"#;
        assert!(serde_json::from_str::<TensorLayout>(wrong_total).is_err());
    }
}
