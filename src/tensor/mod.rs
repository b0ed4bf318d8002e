//! Tensor shapes, layouts and quantization encodings
//!
//! This module provides the metadata that travels alongside a packed TF16
//! buffer: its shape, byte layout, encoding and registration parameters.

pub mod encoding;
pub mod layout;
pub mod params;
pub mod shape;

pub use encoding::*;
pub use layout::*;
pub use params::*;
pub use shape::*;
