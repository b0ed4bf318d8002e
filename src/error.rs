//! Error types for the TF16 codec

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = core::result::Result<T, CodecError>;

/// Error types that can occur while quantizing, packing or decoding tensors
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error occurred while streaming a packed buffer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dimension list
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Nothing to quantize
    #[error("Cannot quantize an empty input")]
    EmptyInput,

    /// Odd-length packed buffer or a size that disagrees with the tensor layout
    #[error("Malformed buffer: {0}")]
    MalformedBuffer(String),

    /// Decode attempted without encoding parameters
    #[error("Missing quantization encoding for tensor '{0}'")]
    MissingEncoding(String),

    /// Input contains NaN or an infinity
    #[error("Non-finite value {value} at index {index}")]
    NonFiniteValue { index: usize, value: f32 },

    /// Finite input whose range cannot be covered by finite f32 parameters
    #[error("Value range [{min}, {max}] has no finite encoding")]
    UnrepresentableRange { min: f64, max: f64 },

    /// Number of values disagrees with the tensor shape
    #[error("Element count mismatch: shape holds {expected} elements, got {actual}")]
    ElementCountMismatch { expected: u64, actual: u64 },

    /// Bitwidth cannot be packed into a 16-bit code
    #[error("Unsupported bitwidth: {0} (expected 1..=16)")]
    UnsupportedBitwidth(u8),

    /// Codec configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Executor does not know the requested tensor
    #[error("Tensor not found: {0}")]
    TensorNotFound(String),

    /// Opaque execution call failed
    #[error("Execution failed: {0}")]
    Execution(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let errors = vec![
            CodecError::InvalidShape("empty".to_string()),
            CodecError::EmptyInput,
            CodecError::MalformedBuffer("odd length 3".to_string()),
            CodecError::MissingEncoding("prob".to_string()),
            CodecError::NonFiniteValue { index: 2, value: f32::NAN },
            CodecError::UnrepresentableRange { min: -3.4e38, max: 3.4e38 },
            CodecError::ElementCountMismatch { expected: 4, actual: 3 },
            CodecError::UnsupportedBitwidth(17),
        ];

        for error in errors {
            assert!(!format!("{}", error).is_empty());
            assert!(!format!("{:?}", error).is_empty());
        }
    }

    #[test]
    fn test_io_error_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let error: CodecError = io_error.into();
        assert!(matches!(error, CodecError::Io(_)));
        assert!(error.source().is_some());
        assert!(CodecError::EmptyInput.source().is_none());
    }

    #[test]
    fn test_missing_encoding_names_tensor() {
        let message = CodecError::MissingEncoding("softmax:0".to_string()).to_string();
        assert!(message.contains("softmax:0"));
    }
}
