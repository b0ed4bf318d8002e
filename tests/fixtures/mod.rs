//! Test fixtures for TF16 codec tests

#![allow(dead_code)]

use tf16_codec::prelude::*;

/// Deterministic pseudo-image in `[-1, 1)` with `count` values
pub fn sample_values(count: usize) -> Vec<f32> {
    (0..count).map(|i| ((i * 37 + 11) % 200) as f32 / 100.0 - 1.0).collect()
}

/// Maximum tolerated decode error for an encoding
pub fn tolerance(encoding: &QuantizationEncoding) -> f32 {
    // Summed in f64 so ranges near f32::MAX do not overflow to infinity
    let magnitude = f64::from(encoding.min().abs()) + f64::from(encoding.max().abs());
    (f64::from(encoding.scale()) * 0.5 + magnitude * 1e-6 + 1e-7) as f32
}

/// Executor that applies a softmax to its single input, re-encoding the
/// result the way an accelerator reports outputs: raw bytes plus the minimum
/// and step size of the output encoding.
pub struct SoftmaxExecutor {
    pub input: String,
    pub output: String,
    pub input_dims: Vec<u64>,
    pub output_dims: Vec<u64>,
    pub executions: usize,
    pub truncate_output: bool,
}

impl SoftmaxExecutor {
    pub fn new(classes: u64) -> Self {
        Self {
            input: "data".to_string(),
            output: "prob".to_string(),
            input_dims: vec![1, classes],
            output_dims: vec![1, classes],
            executions: 0,
            truncate_output: false,
        }
    }
}

impl Executor for SoftmaxExecutor {
    fn tensor_dims(&self, name: &str) -> Result<Vec<u64>> {
        if name == self.input {
            Ok(self.input_dims.clone())
        } else if name == self.output {
            Ok(self.output_dims.clone())
        } else {
            Err(CodecError::TensorNotFound(name.to_string()))
        }
    }

    fn execute(&mut self, inputs: &UserBufferMap, outputs: &mut UserBufferMap) -> Result<()> {
        self.executions += 1;

        let input = inputs.get(&self.input).ok_or_else(|| CodecError::TensorNotFound(self.input.clone()))?;
        // Only the registered step parameters cross the boundary
        let encoding = input.params.encoding(TF16_BITWIDTH)?;
        let logits = decode(input.packed.as_bytes(), &encoding)?;

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
        let sum: f32 = exps.iter().sum();
        let probs: Vec<f32> = exps.iter().map(|e| e / sum).collect();

        let (out_encoding, packed) = encode(&probs)?;
        let output =
            outputs.get_mut(&self.output).ok_or_else(|| CodecError::TensorNotFound(self.output.clone()))?;

        let mut bytes = packed.into_bytes();
        if self.truncate_output {
            bytes.pop();
        }
        output.packed = PackedBuffer::new(bytes);
        output.encoding = Some(QuantizationEncoding::from_min_and_step(
            out_encoding.min(),
            out_encoding.scale(),
            TF16_BITWIDTH,
        )?);
        Ok(())
    }
}

