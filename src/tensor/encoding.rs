//! Affine quantization encoding
//!
//! A real value `v` maps to the code `round(v / scale - offset)` and a code
//! `c` maps back to `min + c * scale`, where `min = scale * offset`. The
//! offset is chosen so that real zero lands exactly on a code whenever the
//! range includes zero, which it always does after range estimation.
//!
//! Rounding is half away from zero. Codes are never negative, so this is the
//! same as rounding half up.

use crate::config::validate_bitwidth;
use crate::error::{CodecError, Result};
use crate::format::constants::{num_steps, TF16_BITWIDTH, TF16_MIN_RANGE};
use serde::{Deserialize, Serialize};

/// Per-tensor quantization parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EncodingRepr")]
pub struct QuantizationEncoding {
    scale: f32,
    offset: i32,
    min: f32,
    max: f32,
    bitwidth: u8,
}

/// Serialized form, checked before it becomes an encoding
#[derive(Deserialize)]
struct EncodingRepr {
    scale: f32,
    offset: i32,
    min: f32,
    max: f32,
    bitwidth: u8,
}

impl TryFrom<EncodingRepr> for QuantizationEncoding {
    type Error = CodecError;

    fn try_from(repr: EncodingRepr) -> Result<Self> {
        let encoding = Self::from_min_and_step(repr.min, repr.scale, repr.bitwidth)?;
        if encoding.offset != repr.offset || encoding.max != repr.max {
            return Err(CodecError::InvalidConfig(format!(
                "offset {} and max {} do not follow from min {} and scale {}",
                repr.offset, repr.max, repr.min, repr.scale
            )));
        }
        Ok(encoding)
    }
}

impl QuantizationEncoding {
    /// Derive a TF16 encoding from `values`
    pub fn derive(values: &[f32]) -> Result<Self> {
        Self::derive_with(values, TF16_BITWIDTH, TF16_MIN_RANGE)
    }

    /// Derive an encoding for `bitwidth`-bit codes spanning at least `min_range`.
    ///
    /// Range arithmetic runs in `f64`, so finite inputs never overflow while
    /// the span is measured. A range whose parameters would not be finite in
    /// `f32` fails with [`CodecError::UnrepresentableRange`].
    pub fn derive_with(values: &[f32], bitwidth: u8, min_range: f32) -> Result<Self> {
        validate_bitwidth(bitwidth)?;
        if !min_range.is_finite() || min_range <= 0.0 {
            return Err(CodecError::InvalidConfig(format!(
                "min_range must be positive and finite, got {}",
                min_range
            )));
        }
        let (lowest, highest) = value_range(values)?;

        let raw_min = f64::from(lowest.min(0.0));
        let mut raw_max = f64::from(highest.max(0.0));
        if raw_max - raw_min < f64::from(min_range) {
            raw_max = raw_min + f64::from(min_range);
        }
        let unrepresentable = || CodecError::UnrepresentableRange { min: raw_min, max: raw_max };

        let steps_f = f64::from(num_steps(bitwidth));
        let scale = ((raw_max - raw_min) / steps_f) as f32;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(unrepresentable());
        }
        let step = f64::from(scale);

        let offset = if raw_min < 0.0 && raw_max > 0.0 {
            let zero = (-raw_min / step).round().clamp(0.0, steps_f);
            -(zero as i32)
        } else {
            // One-sided range: zero sits on the first or the last code
            (raw_min / step).round().clamp(-steps_f, 0.0) as i32
        };

        Self::from_parts(scale, offset, bitwidth).map_err(|_| unrepresentable())
    }

    /// Rebuild an encoding from transport step parameters: the code that
    /// represents exact zero and the size of one step.
    pub fn from_step(step_exactly_0: i32, step_size: f32, bitwidth: u8) -> Result<Self> {
        validate_bitwidth(bitwidth)?;
        check_step_size(step_size)?;

        if step_exactly_0 < 0 || step_exactly_0 as u32 > num_steps(bitwidth) {
            return Err(CodecError::InvalidConfig(format!(
                "step_exactly_0 {} is outside 0..={}",
                step_exactly_0,
                num_steps(bitwidth)
            )));
        }

        Self::from_parts(step_size, -step_exactly_0, bitwidth)
    }

    /// Rebuild an encoding from the minimum and step size an accelerator
    /// reports for an output tensor. `min` is kept as reported.
    pub fn from_min_and_step(min: f32, step_size: f32, bitwidth: u8) -> Result<Self> {
        validate_bitwidth(bitwidth)?;
        check_step_size(step_size)?;

        if !min.is_finite() {
            return Err(CodecError::InvalidConfig(format!("min must be finite, got {}", min)));
        }

        let offset = (f64::from(min) / f64::from(step_size)).round() as i32;
        Self::with_min(step_size, offset, min, bitwidth)
    }

    fn from_parts(scale: f32, offset: i32, bitwidth: u8) -> Result<Self> {
        let min = (f64::from(scale) * f64::from(offset)) as f32;
        Self::with_min(scale, offset, min, bitwidth)
    }

    fn with_min(scale: f32, offset: i32, min: f32, bitwidth: u8) -> Result<Self> {
        let max = f64::from(min) + f64::from(scale) * f64::from(num_steps(bitwidth));
        if !min.is_finite() || !(max as f32).is_finite() {
            let min = f64::from(scale) * f64::from(offset);
            return Err(CodecError::UnrepresentableRange { min, max });
        }
        Ok(Self { scale, offset, min, max: max as f32, bitwidth })
    }

    /// Size of one quantization step
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Offset added to a code before scaling; never positive for derived encodings
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Code that represents exact zero
    pub fn step_exactly_0(&self) -> i32 {
        -self.offset
    }

    /// Smallest representable value
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Largest representable value
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Bits per code
    pub fn bitwidth(&self) -> u8 {
        self.bitwidth
    }

    /// Largest code (`2^bitwidth - 1`)
    pub fn num_steps(&self) -> u32 {
        num_steps(self.bitwidth)
    }

    /// Quantize one value, clamping it into `[min, max]` first
    pub fn quantize(&self, value: f32) -> u16 {
        let clamped = value.max(self.min).min(self.max);
        let code = (f64::from(clamped) / f64::from(self.scale) - f64::from(self.offset)).round();
        code.clamp(0.0, f64::from(self.num_steps())) as u16
    }

    /// Map a code back to a real value
    pub fn dequantize(&self, code: u16) -> f32 {
        (f64::from(self.min) + f64::from(code) * f64::from(self.scale)) as f32
    }
}

fn check_step_size(step_size: f32) -> Result<()> {
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(CodecError::InvalidConfig(format!(
            "step size must be positive and finite, got {}",
            step_size
        )));
    }
    Ok(())
}

fn value_range(values: &[f32]) -> Result<(f32, f32)> {
    if values.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut lowest = f32::INFINITY;
    let mut highest = f32::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(CodecError::NonFiniteValue { index, value });
        }
        lowest = lowest.min(value);
        highest = highest.max(value);
    }

    Ok((lowest, highest))
}
