//! Inference pipeline driver
//!
//! Thin glue around an opaque [`Executor`]: resolves tensor layouts, encodes
//! the input, registers buffers, runs the executor and decodes the output.
//! Any codec or executor failure aborts the whole call.

use crate::codec::{decode_named, Encoder, PackedBuffer};
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::tensor::{QuantizationEncoding, TensorLayout, TensorParams, TensorShape};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A fixed-point buffer registered with the executor
#[derive(Debug, Clone, PartialEq)]
pub struct UserBuffer {
    /// Tensor name
    pub name: String,
    /// Registration parameters
    pub params: TensorParams,
    /// Packed codes
    pub packed: PackedBuffer,
    /// Encoding of `packed`; the executor attaches it to outputs
    pub encoding: Option<QuantizationEncoding>,
}

/// Map from tensor name to registered buffer
pub type UserBufferMap = HashMap<String, UserBuffer>;

/// The accelerator seen from the codec: shapes in, bytes in, bytes out
pub trait Executor {
    /// Dimensions of a named input or output tensor
    fn tensor_dims(&self, name: &str) -> Result<Vec<u64>>;

    /// Run the network. Output buffers arrive zero-filled at their registered
    /// size; the executor overwrites their bytes and attaches their encoding.
    fn execute(&mut self, inputs: &UserBufferMap, outputs: &mut UserBufferMap) -> Result<()>;
}

/// Drives one encode, execute, decode round per call
#[derive(Debug)]
pub struct Pipeline<E> {
    executor: E,
    encoder: Encoder,
}

impl<E: Executor> Pipeline<E> {
    /// Create a pipeline around `executor`
    pub fn new(executor: E, config: CodecConfig) -> Result<Self> {
        Ok(Self { executor, encoder: Encoder::new(config)? })
    }

    /// The wrapped executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Take the executor back
    pub fn into_executor(self) -> E {
        self.executor
    }

    fn resolve_shape(&self, name: &str) -> Result<TensorShape> {
        TensorShape::new(self.executor.tensor_dims(name)?)
    }

    /// Quantize `values` into a buffer registered for input `name`
    pub fn prepare_input(&self, name: &str, values: &[f32]) -> Result<UserBuffer> {
        let shape = self.resolve_shape(name)?;
        let tensor = self.encoder.encode_tensor(&shape, values)?;
        debug!(tensor = name, shape = %shape, bytes = tensor.packed.len(), "prepared input");

        Ok(UserBuffer {
            name: name.to_string(),
            params: tensor.params,
            packed: tensor.packed,
            encoding: Some(tensor.encoding),
        })
    }

    /// Allocate a zeroed buffer registered for output `name`
    pub fn prepare_output(&self, name: &str) -> Result<UserBuffer> {
        let shape = self.resolve_shape(name)?;
        let layout = TensorLayout::tf16(shape.dims())?;
        let params = TensorParams::for_output(&layout, self.encoder.config());
        let size = usize::try_from(params.size).map_err(|_| {
            CodecError::MalformedBuffer(format!("output '{}' of {} bytes does not fit in memory", name, params.size))
        })?;
        debug!(tensor = name, shape = %shape, bytes = size, "prepared output");

        Ok(UserBuffer { name: name.to_string(), params, packed: PackedBuffer::zeroed(size), encoding: None })
    }

    /// Encode `values` into `input`, execute, and decode `output`
    pub fn run(&mut self, input: &str, values: &[f32], output: &str) -> Result<Vec<f32>> {
        let mut inputs = UserBufferMap::new();
        inputs.insert(input.to_string(), self.prepare_input(input, values)?);

        let mut outputs = UserBufferMap::new();
        outputs.insert(output.to_string(), self.prepare_output(output)?);

        self.executor.execute(&inputs, &mut outputs).map_err(|e| {
            warn!(error = %e, "execution failed");
            e
        })?;

        let buffer = outputs.get(output).ok_or_else(|| CodecError::TensorNotFound(output.to_string()))?;
        if buffer.packed.len() as u64 != buffer.params.size {
            return Err(CodecError::MalformedBuffer(format!(
                "output '{}' came back with {} bytes, registered {}",
                output,
                buffer.packed.len(),
                buffer.params.size
            )));
        }

        let values = decode_named(output, buffer.packed.as_bytes(), buffer.encoding.as_ref())?;
        info!(input, output, elements = values.len(), "inference complete");
        Ok(values)
    }

    /// Run and return the `k` highest-scoring output indices
    pub fn classify(
        &mut self,
        input: &str,
        values: &[f32],
        output: &str,
        k: usize,
    ) -> Result<Vec<(usize, f32)>> {
        let scores = self.run(input, values, output)?;
        Ok(top_k(&scores, k))
    }
}

/// The `k` largest values with their indices, highest first; ties keep the
/// lower index first.
pub fn top_k(values: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = values.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(k);
    ranked
}
