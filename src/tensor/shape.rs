//! Tensor shape and dimension handling

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Represents the shape of a tensor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct TensorShape {
    /// Dimensions of the tensor, outermost first
    dimensions: Vec<u64>,
}

impl TensorShape {
    /// Create a new tensor shape from dimensions
    pub fn new(dimensions: Vec<u64>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(CodecError::InvalidShape("Tensor shape cannot be empty".to_string()));
        }

        if let Some(axis) = dimensions.iter().position(|&d| d == 0) {
            return Err(CodecError::InvalidShape(format!(
                "Dimension {} of {:?} must be positive",
                axis, dimensions
            )));
        }

        let shape = Self { dimensions };
        shape.checked_element_count()?;
        Ok(shape)
    }

    /// Create a vector tensor (1D)
    pub fn vector(size: u64) -> Result<Self> {
        Self::new(vec![size])
    }

    /// Get the number of dimensions
    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// Get the dimensions as a slice
    pub fn dims(&self) -> &[u64] {
        &self.dimensions
    }

    /// Get a specific dimension
    pub fn dim(&self, index: usize) -> Option<u64> {
        self.dimensions.get(index).copied()
    }

    /// Total number of elements
    pub fn element_count(&self) -> u64 {
        // Every constructor, including deserialization, rejects overflowing shapes
        self.dimensions.iter().product()
    }

    fn checked_element_count(&self) -> Result<u64> {
        self.dimensions.iter().try_fold(1u64, |acc, &dim| acc.checked_mul(dim)).ok_or_else(|| {
            CodecError::InvalidShape(format!("Element count of {:?} overflows", self.dimensions))
        })
    }

    /// Calculate element strides for C-style (row-major) ordering
    pub fn calculate_strides(&self) -> Vec<u64> {
        let mut strides = vec![1u64; self.ndim()];

        for i in (0..self.ndim().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dimensions[i + 1];
        }

        strides
    }

    /// Get a string representation of the shape
    pub fn shape_string(&self) -> String {
        format!("({})", self.dimensions.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", "))
    }
}

impl std::fmt::Display for TensorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.shape_string())
    }
}

impl TryFrom<Vec<u64>> for TensorShape {
    type Error = CodecError;

    fn try_from(dimensions: Vec<u64>) -> Result<Self> {
        TensorShape::new(dimensions)
    }
}

impl TryFrom<&[u64]> for TensorShape {
    type Error = CodecError;

    fn try_from(dimensions: &[u64]) -> Result<Self> {
        TensorShape::new(dimensions.to_vec())
    }
}

impl From<TensorShape> for Vec<u64> {
    fn from(shape: TensorShape) -> Self {
        shape.dimensions
    }
}

impl AsRef<[u64]> for TensorShape {
    fn as_ref(&self) -> &[u64] {
        &self.dimensions
    }
}

impl std::ops::Index<usize> for TensorShape {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.dimensions[index]
    }
}
