//! TF16 wire-format constants

/// Bitwidth of a TF16 quantized code
pub const TF16_BITWIDTH: u8 = 16;

/// Size of one packed TF16 element in bytes
pub const TF16_ELEMENT_SIZE: usize = 2;

/// Smallest range a derived encoding may span
pub const TF16_MIN_RANGE: f32 = 0.1;

/// Step index registered for output tensors before the accelerator reports its own
pub const TF16_OUTPUT_STEP_EXACTLY_0: i32 = 0;

/// Step size registered for output tensors before the accelerator reports its own
pub const TF16_OUTPUT_STEP_SIZE: f32 = 0.1;

/// Number of quantization steps for a bitwidth (`2^bitwidth - 1`)
pub const fn num_steps(bitwidth: u8) -> u32 {
    (1u32 << bitwidth) - 1
}
