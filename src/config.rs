//! Codec configuration

use crate::error::{CodecError, Result};
use crate::format::constants::{
    TF16_BITWIDTH, TF16_MIN_RANGE, TF16_OUTPUT_STEP_EXACTLY_0, TF16_OUTPUT_STEP_SIZE,
};
use serde::{Deserialize, Serialize};

/// Parameters shared by the encoder, decoder and pipeline driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Bits per quantized code; codes always occupy two bytes on the wire
    pub bitwidth: u8,
    /// Smallest range a derived encoding may span
    pub min_range: f32,
    /// Step index registered for output tensors
    pub output_step_exactly_0: i32,
    /// Step size registered for output tensors
    pub output_step_size: f32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            bitwidth: TF16_BITWIDTH,
            min_range: TF16_MIN_RANGE,
            output_step_exactly_0: TF16_OUTPUT_STEP_EXACTLY_0,
            output_step_size: TF16_OUTPUT_STEP_SIZE,
        }
    }
}

impl CodecConfig {
    /// Reject settings the codec cannot honor
    pub fn validate(&self) -> Result<()> {
        validate_bitwidth(self.bitwidth)?;

        if !self.min_range.is_finite() || self.min_range <= 0.0 {
            return Err(CodecError::InvalidConfig(format!(
                "min_range must be positive and finite, got {}",
                self.min_range
            )));
        }

        if !self.output_step_size.is_finite() || self.output_step_size <= 0.0 {
            return Err(CodecError::InvalidConfig(format!(
                "output_step_size must be positive and finite, got {}",
                self.output_step_size
            )));
        }

        if self.output_step_exactly_0 < 0 {
            return Err(CodecError::InvalidConfig(format!(
                "output_step_exactly_0 must not be negative, got {}",
                self.output_step_exactly_0
            )));
        }

        Ok(())
    }
}

pub(crate) fn validate_bitwidth(bitwidth: u8) -> Result<()> {
    if bitwidth == 0 || bitwidth > TF16_BITWIDTH {
        return Err(CodecError::UnsupportedBitwidth(bitwidth));
    }
    Ok(())
}
