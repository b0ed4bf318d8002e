//! TF16 quantization codec
//!
//! This module turns float tensors into packed big-endian 16-bit codes and
//! back. Every call is independent: nothing is cached between calls.

pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod stream;

pub use buffer::*;
pub use decoder::*;
pub use encoder::*;
pub use stream::*;
