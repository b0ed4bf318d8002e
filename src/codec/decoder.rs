//! TF16 to float decoding

use crate::error::{CodecError, Result};
use crate::format::constants::TF16_ELEMENT_SIZE;
use crate::format::endian::compose_u16;
use crate::tensor::{QuantizationEncoding, TensorLayout};
use tracing::debug;

/// Decode a packed buffer with the encoding it was produced with.
///
/// The range is never re-derived from the bytes; a mismatched encoding
/// yields wrong values without any error.
pub fn decode(packed: &[u8], encoding: &QuantizationEncoding) -> Result<Vec<f32>> {
    if packed.len() % TF16_ELEMENT_SIZE != 0 {
        return Err(CodecError::MalformedBuffer(format!(
            "odd buffer length {} cannot hold whole 16-bit codes",
            packed.len()
        )));
    }

    let values: Vec<f32> = packed
        .chunks_exact(TF16_ELEMENT_SIZE)
        .map(|pair| encoding.dequantize(compose_u16(pair[0], pair[1])))
        .collect();

    debug!(
        elements = values.len(),
        scale = encoding.scale(),
        min = encoding.min(),
        "decoded tensor"
    );

    Ok(values)
}

/// Decode a buffer that must match `layout` exactly
pub fn decode_tensor(
    packed: &[u8],
    layout: &TensorLayout,
    encoding: &QuantizationEncoding,
) -> Result<Vec<f32>> {
    layout.check_buffer_len(packed.len())?;
    decode(packed, encoding)
}

/// Decode a named tensor whose encoding may not have been supplied
pub fn decode_named(
    name: &str,
    packed: &[u8],
    encoding: Option<&QuantizationEncoding>,
) -> Result<Vec<f32>> {
    let encoding = encoding.ok_or_else(|| CodecError::MissingEncoding(name.to_string()))?;
    decode(packed, encoding)
}
