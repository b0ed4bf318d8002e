//! Registration parameters for fixed-point user buffers

use crate::config::CodecConfig;
use crate::error::Result;
use crate::tensor::encoding::QuantizationEncoding;
use crate::tensor::layout::TensorLayout;
use serde::{Deserialize, Serialize};

/// Everything a transport needs to register a TF16 user buffer.
///
/// Built in one step from a layout and an encoding, so the step fields are
/// never observable in a default state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorParams {
    /// Buffer size in bytes
    pub size: u64,
    /// Byte stride of each dimension
    pub strides: Vec<u64>,
    /// Code that represents exact zero
    pub step_exactly_0: i32,
    /// Size of one quantization step
    pub step_size: f32,
}

impl TensorParams {
    /// Parameters for an input tensor quantized with `encoding`
    pub fn for_input(layout: &TensorLayout, encoding: &QuantizationEncoding) -> Self {
        Self {
            size: layout.total_bytes(),
            strides: layout.strides().to_vec(),
            step_exactly_0: encoding.step_exactly_0(),
            step_size: encoding.scale(),
        }
    }

    /// Parameters for an output tensor, using the configured step defaults
    pub fn for_output(layout: &TensorLayout, config: &CodecConfig) -> Self {
        Self {
            size: layout.total_bytes(),
            strides: layout.strides().to_vec(),
            step_exactly_0: config.output_step_exactly_0,
            step_size: config.output_step_size,
        }
    }

    /// Encoding implied by the registered step parameters
    pub fn encoding(&self, bitwidth: u8) -> Result<QuantizationEncoding> {
        QuantizationEncoding::from_step(self.step_exactly_0, self.step_size, bitwidth)
    }
}
