//! Property-based tests for the TF16 codec

mod fixtures;

use fixtures::tolerance;
use proptest::prelude::*;
use tf16_codec::prelude::*;

// Strategy for generating valid tensor shapes
fn tensor_shape_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..16, 1..4)
}

// Strategy for generating finite f32 data
fn f32_data_strategy() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0f32, 1..512)
}

// Strategy for finite f32 data across the whole magnitude range,
// subnormals and zeros included
fn wide_f32_data_strategy() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(
        prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO,
        1..64,
    )
}

proptest! {
    #[test]
    fn test_round_trip_error_bound(values in f32_data_strategy()) {
        let (encoding, packed) = encode(&values).unwrap();
        let decoded = decode(packed.as_bytes(), &encoding).unwrap();

        prop_assert_eq!(decoded.len(), values.len());
        let tol = tolerance(&encoding);
        for (original, restored) in values.iter().zip(decoded.iter()) {
            prop_assert!(
                (original - restored).abs() <= tol,
                "{} decoded as {} (tolerance {})", original, restored, tol
            );
        }
    }

    #[test]
    fn test_zero_is_representable(values in f32_data_strategy()) {
        let (encoding, _) = encode(&values).unwrap();

        prop_assert!(encoding.min() <= 0.0);
        prop_assert!(encoding.max() >= -1e-6);

        let zero_code = encoding.quantize(0.0);
        prop_assert_eq!(i32::from(zero_code), encoding.step_exactly_0());
        prop_assert!(encoding.dequantize(zero_code).abs() <= encoding.min().abs() * 1e-6 + 1e-7);
    }

    #[test]
    fn test_codes_stay_in_range(values in f32_data_strategy(), bitwidth in 1u8..=16) {
        let encoder = Encoder::new(CodecConfig { bitwidth, ..Default::default() }).unwrap();
        let (encoding, packed) = encoder.encode(&values).unwrap();

        let limit = (1u32 << bitwidth) - 1;
        prop_assert_eq!(encoding.num_steps(), limit);
        for code in packed.codes().unwrap() {
            prop_assert!(u32::from(code) <= limit);
        }
    }

    #[test]
    fn test_buffer_length(values in f32_data_strategy()) {
        let (encoding, packed) = encode(&values).unwrap();
        prop_assert_eq!(packed.len(), values.len() * 2);

        let mut odd = packed.into_bytes();
        odd.push(0);
        let is_malformed = matches!(decode(&odd, &encoding), Err(CodecError::MalformedBuffer(_)));
        prop_assert!(is_malformed);
    }

    #[test]
    fn test_constant_arrays(value in -100.0f32..100.0f32, len in 1usize..64) {
        let values = vec![value; len];
        let (encoding, packed) = encode(&values).unwrap();

        prop_assert!(encoding.max() - encoding.min() >= TF16_MIN_RANGE * (1.0 - 1e-5));

        let decoded = decode(packed.as_bytes(), &encoding).unwrap();
        let first = decoded[0];
        prop_assert!(decoded.iter().all(|&v| v == first));
        prop_assert!((first - value).abs() <= tolerance(&encoding));
    }

    #[test]
    fn test_layout_matches_encoded_size(dims in tensor_shape_strategy()) {
        let shape = TensorShape::new(dims.clone()).unwrap();
        let count = shape.element_count() as usize;
        let values: Vec<f32> = (0..count).map(|i| i as f32 * 0.25 - 3.0).collect();

        let tensor = Encoder::default().encode_tensor(&shape, &values).unwrap();
        prop_assert_eq!(tensor.layout.total_bytes(), (count * 2) as u64);
        prop_assert_eq!(*tensor.layout.strides().last().unwrap(), 2);

        for i in 0..dims.len() - 1 {
            prop_assert_eq!(tensor.layout.strides()[i], tensor.layout.strides()[i + 1] * dims[i + 1]);
        }
    }

    #[test]
    fn test_wide_range_round_trip_or_typed_failure(values in wide_f32_data_strategy()) {
        match encode(&values) {
            Ok((encoding, packed)) => {
                prop_assert!(encoding.scale().is_finite() && encoding.scale() > 0.0);
                prop_assert!(encoding.min().is_finite() && encoding.max().is_finite());

                let decoded = decode(packed.as_bytes(), &encoding).unwrap();
                let tol = tolerance(&encoding);
                for (original, restored) in values.iter().zip(decoded.iter()) {
                    prop_assert!(restored.is_finite());
                    prop_assert!(
                        (f64::from(*original) - f64::from(*restored)).abs() <= f64::from(tol),
                        "{} decoded as {} (tolerance {})", original, restored, tol
                    );
                }

                let zero_code = encoding.quantize(0.0);
                prop_assert_eq!(i32::from(zero_code), encoding.step_exactly_0());
            }
            Err(error) => {
                let is_range_error = matches!(error, CodecError::UnrepresentableRange { .. });
                prop_assert!(is_range_error, "unexpected error {}", error);
            }
        }
    }

    #[test]
    fn test_wide_range_codes_stay_in_range(values in wide_f32_data_strategy(), bitwidth in 1u8..=16) {
        let encoder = Encoder::new(CodecConfig { bitwidth, ..Default::default() }).unwrap();
        if let Ok((encoding, packed)) = encoder.encode(&values) {
            let limit = (1u32 << bitwidth) - 1;
            prop_assert_eq!(encoding.num_steps(), limit);
            for code in packed.codes().unwrap() {
                prop_assert!(u32::from(code) <= limit);
            }
        }
    }
}
