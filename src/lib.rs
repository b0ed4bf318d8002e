//! # tf16-codec - 16-bit affine quantization for fixed-point tensor I/O
//!
//! This library derives per-tensor affine encodings from float data, packs
//! the quantized codes into big-endian 16-bit buffers for an accelerator,
//! and decodes returned buffers back into floats.
//!
//! ```
//! use tf16_codec::prelude::*;
//!
//! let (encoding, packed) = encode(&[-1.0, 0.0, 2.0, 3.0])?;
//! assert_eq!(packed.len(), 8);
//!
//! let decoded = decode(packed.as_bytes(), &encoding)?;
//! assert!((decoded[3] - 3.0).abs() <= encoding.scale());
//! # Ok::<(), tf16_codec::CodecError>(())
//! ```

// Public modules
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod tensor;

// Re-export main types for convenience
pub use error::{CodecError, Result};

// Re-export commonly used items in prelude
pub mod prelude {
    pub use crate::codec::{decode, decode_tensor, encode, Encoder, EncodedTensor, PackedBuffer};
    pub use crate::codec::{PackedReader, PackedWriter};
    pub use crate::config::CodecConfig;
    pub use crate::error::{CodecError, Result};
    pub use crate::format::constants::{TF16_BITWIDTH, TF16_ELEMENT_SIZE, TF16_MIN_RANGE};
    pub use crate::pipeline::{top_k, Executor, Pipeline, UserBuffer, UserBufferMap};
    pub use crate::tensor::{QuantizationEncoding, TensorLayout, TensorParams, TensorShape};
}
