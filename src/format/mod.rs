//! TF16 wire format
//!
//! Constants and big-endian byte helpers shared by the encoder and decoder.

pub mod constants;
pub mod endian;

pub use constants::*;
