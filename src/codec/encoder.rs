//! Float to TF16 encoding

use crate::codec::buffer::PackedBuffer;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::format::constants::TF16_ELEMENT_SIZE;
use crate::tensor::{QuantizationEncoding, TensorLayout, TensorParams, TensorShape};
use tracing::debug;

/// A quantized tensor ready to hand to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTensor {
    /// Encoding the codes were produced with; keep it for the paired decode
    pub encoding: QuantizationEncoding,
    /// Byte layout of `packed`
    pub layout: TensorLayout,
    /// Registration parameters for the transport
    pub params: TensorParams,
    /// Packed big-endian codes
    pub packed: PackedBuffer,
}

/// Quantizes float arrays into packed TF16 buffers
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    /// Create an encoder, rejecting an invalid configuration
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Derive an encoding for `values` and pack them with it
    pub fn encode(&self, values: &[f32]) -> Result<(QuantizationEncoding, PackedBuffer)> {
        let encoding =
            QuantizationEncoding::derive_with(values, self.config.bitwidth, self.config.min_range)?;
        let packed = pack_with(values, &encoding);

        debug!(
            elements = values.len(),
            scale = encoding.scale(),
            offset = encoding.offset(),
            min = encoding.min(),
            max = encoding.max(),
            "encoded tensor"
        );

        Ok((encoding, packed))
    }

    /// Encode `values` laid out as `shape`, with layout and registration params
    pub fn encode_tensor(&self, shape: &TensorShape, values: &[f32]) -> Result<EncodedTensor> {
        let expected = shape.element_count();
        if expected != values.len() as u64 {
            return Err(CodecError::ElementCountMismatch { expected, actual: values.len() as u64 });
        }

        let layout = TensorLayout::resolve(shape, TF16_ELEMENT_SIZE)?;
        let (encoding, packed) = self.encode(values)?;
        layout.check_buffer_len(packed.len())?;
        let params = TensorParams::for_input(&layout, &encoding);

        Ok(EncodedTensor { encoding, layout, params, packed })
    }
}

/// Encode `values` as 16-bit codes with the default configuration
pub fn encode(values: &[f32]) -> Result<(QuantizationEncoding, PackedBuffer)> {
    Encoder::default().encode(values)
}

/// Pack `values` with an existing encoding
pub fn pack_with(values: &[f32], encoding: &QuantizationEncoding) -> PackedBuffer {
    let mut bytes = Vec::with_capacity(values.len() * TF16_ELEMENT_SIZE);
    for &value in values {
        bytes.extend_from_slice(&encoding.quantize(value).to_be_bytes());
    }
    PackedBuffer::new(bytes)
}
