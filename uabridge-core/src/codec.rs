//! # Variant <-> JSON Codec
//!
//! This module converts OPC UA [`Variant`] values to `serde_json::Value` and back.
//!
//! ## How it works
//!
//! 1. **Encoder (Variant -> JSON)**:
//!    - Every element is serialized with the rule of its built-in type (see [`scalar`]).
//!    - Arrays become JSON arrays.
//!    - Matrices are folded from their flat row-major storage into nested JSON arrays, one
//!      nesting level per dimension.
//!
//! 2. **Decoder (JSON -> Variant)**:
//!    - JSON carries no type information, so the caller supplies the expected [`DataType`] and
//!      [`ValueRank`] (usually taken from a method's argument definition).
//!    - The nesting depth of the JSON value decides between scalar, array and matrix, and is
//!      checked against the declared value rank before any element is parsed.
//!
//! `Int64` and `UInt64` are written as a `[high, low]` pair of unsigned 32-bit words so that no
//! precision is lost in JSON consumers limited to doubles. That pair consumes one nesting level.
mod scalar;
mod shape;

use crate::session::CallMethodResult;
use crate::types::{DataType, StatusCode, ValueRank, Variant, VariantError, VariantValue};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Data type {0} is not supported")]
    UnsupportedType(DataType),

    #[error("Value rank {0} requires an array value")]
    ArrayExpected(ValueRank),

    #[error("Value has {depth} dimension(s) but value rank {value_rank} was declared")]
    RankMismatch { value_rank: ValueRank, depth: usize },

    #[error("Value rank -1 requires a scalar value")]
    ScalarExpected,

    #[error(
        "Value rank {value_rank} requires a scalar or a one dimensional array, got {depth} dimensions"
    )]
    ScalarOr1DExpected { value_rank: ValueRank, depth: usize },

    #[error(
        "Array is not rectangular: dimensions {dimensions:?} do not match at nesting level {level}"
    )]
    DimensionMismatch { dimensions: Vec<usize>, level: usize },

    #[error("{data_type} component {index} must be an integer between 0 and 4294967295")]
    ComponentRange { data_type: DataType, index: usize },

    #[error("{data_type} must be {expected} between {min} and {max}")]
    RangeError {
        data_type: DataType,
        expected: &'static str,
        min: String,
        max: String,
    },

    #[error("Invalid {data_type} '{value}': {reason}")]
    FormatError {
        data_type: DataType,
        value: String,
        reason: String,
    },

    #[error("{data_type} must be {expected}")]
    UnexpectedJson {
        data_type: DataType,
        expected: &'static str,
    },

    #[error(transparent)]
    Variant(#[from] VariantError),
}

/// Coarse classification of [`CodecError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The JSON nesting does not match the declared value rank, or is not rectangular.
    Shape,
    /// A scalar lies outside the domain of its type.
    Range,
    /// A string or JSON value is not in the form the type requires.
    Format,
    /// The type cannot be transcoded at all.
    Unsupported,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnsupportedType(_) => ErrorKind::Unsupported,
            CodecError::ArrayExpected(_)
            | CodecError::RankMismatch { .. }
            | CodecError::ScalarExpected
            | CodecError::ScalarOr1DExpected { .. }
            | CodecError::DimensionMismatch { .. }
            | CodecError::Variant(_) => ErrorKind::Shape,
            CodecError::ComponentRange { .. } | CodecError::RangeError { .. } => ErrorKind::Range,
            CodecError::FormatError { .. } | CodecError::UnexpectedJson { .. } => ErrorKind::Format,
        }
    }
}

/// Serializes a variant to JSON.
///
/// The empty variant becomes `null`. Fails with [`CodecError::UnsupportedType`] for values the
/// codec cannot render, such as still-encoded structures.
pub fn to_json(variant: &Variant) -> Result<Value, CodecError> {
    match variant.value() {
        VariantValue::Empty => Ok(Value::Null),
        VariantValue::Scalar(value) => scalar::serialize(value),
        VariantValue::Array(values) => serialize_all(values).map(Value::Array),
        VariantValue::Matrix { dimensions, values } => {
            Ok(shape::fold(serialize_all(values)?, dimensions))
        }
    }
}

fn serialize_all(values: &[crate::types::Scalar]) -> Result<Vec<Value>, CodecError> {
    values.iter().map(scalar::serialize).collect()
}

/// Builds a variant of `data_type` from JSON, enforcing the shape described by `value_rank`.
///
/// # Returns
///
/// * `Ok(Variant)` - A scalar for non-array JSON, an array for one level of nesting and a matrix
///   for two or more levels.
/// * `Err(CodecError)` - The shape contradicts the value rank, the nesting is ragged, or an
///   element is not a valid value of `data_type`.
pub fn from_json(
    value: &Value,
    data_type: DataType,
    value_rank: ValueRank,
) -> Result<Variant, CodecError> {
    scalar::ensure_parsable(data_type)?;

    let mut depth = shape::depth(value);

    if data_type.is_64bit_integer() {
        depth = depth.saturating_sub(1);
    }

    let rank = value_rank.get();

    tracing::trace!(%data_type, %value_rank, depth, "Converting JSON value to variant");

    match depth {
        0 => {
            if rank >= 0 {
                return Err(CodecError::ArrayExpected(value_rank));
            }

            Ok(Variant::scalar(scalar::parse(value, data_type)?))
        }
        1 => {
            if rank > 1 {
                return Err(CodecError::RankMismatch { value_rank, depth });
            }

            if rank == ValueRank::SCALAR.get() {
                return Err(CodecError::ScalarExpected);
            }

            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();

            let values = items
                .iter()
                .map(|item| scalar::parse(item, data_type))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Variant::array(data_type, values)?)
        }
        depth => {
            if rank > 0 && rank as usize != depth {
                return Err(CodecError::RankMismatch { value_rank, depth });
            }

            if value_rank == ValueRank::SCALAR || value_rank == ValueRank::SCALAR_OR_ONE_DIMENSION {
                return Err(CodecError::ScalarOr1DExpected { value_rank, depth });
            }

            let (dimensions, elements) = shape::flatten(value, depth)?;

            let values = elements
                .into_iter()
                .map(|item| scalar::parse(item, data_type))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Variant::matrix(data_type, dimensions, values)?)
        }
    }
}

/// Renders a status code as `{name, value, description}`.
pub fn status_code_to_json(code: StatusCode) -> Value {
    json!({
        "name": code.name(),
        "value": code.bits(),
        "description": code.description(),
    })
}

/// Renders the result of a method call, converting every output argument with [`to_json`].
pub fn call_result_to_json(result: &CallMethodResult) -> Result<Value, CodecError> {
    let input_argument_results: Vec<Value> = result
        .input_argument_results
        .iter()
        .copied()
        .map(status_code_to_json)
        .collect();

    let output_arguments = result
        .output_arguments
        .iter()
        .map(to_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(json!({
        "statusCode": status_code_to_json(result.status_code),
        "inputArgumentResults": input_argument_results,
        "outputArguments": output_arguments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArrayType, Scalar};

    fn int32_matrix(dimensions: Vec<u32>, count: i32) -> Variant {
        Variant::matrix(
            DataType::Int32,
            dimensions,
            (0..count).map(Scalar::Int32).collect(),
        )
        .unwrap()
    }

    #[test]
    fn matrix_folds_last_dimension_innermost() {
        let json = to_json(&int32_matrix(vec![2, 3, 4], 24)).unwrap();

        assert_eq!(
            json,
            json!([
                [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11]],
                [[12, 13, 14, 15], [16, 17, 18, 19], [20, 21, 22, 23]]
            ])
        );
    }

    #[test]
    fn matrix_with_zero_dimension_keeps_outer_shape() {
        let json = to_json(&int32_matrix(vec![2, 0], 0)).unwrap();
        assert_eq!(json, json!([[], []]));
    }

    #[test]
    fn parses_two_levels_into_matrix() {
        let variant = from_json(
            &json!([[10, 11, 12], [13, 14, 15]]),
            DataType::Int32,
            ValueRank::dimensions(2),
        )
        .unwrap();

        assert_eq!(variant.array_type(), ArrayType::Matrix);
        assert_eq!(variant.dimensions(), Some(&[2, 3][..]));
        assert_eq!(
            variant.values(),
            (10..16).map(Scalar::Int32).collect::<Vec<_>>().as_slice()
        );
    }

    #[test]
    fn two_levels_are_rejected_for_scalar_ranks() {
        let value = json!([[10, 11, 12], [13, 14, 15]]);

        for rank in [ValueRank::SCALAR, ValueRank::SCALAR_OR_ONE_DIMENSION] {
            let err = from_json(&value, DataType::Int32, rank).unwrap_err();
            assert!(matches!(err, CodecError::ScalarOr1DExpected { depth: 2, .. }));
            assert_eq!(err.kind(), ErrorKind::Shape);
        }
    }

    #[test]
    fn scalar_rank_rules() {
        let scalar = from_json(&json!(5050), DataType::Int32, ValueRank::SCALAR).unwrap();
        assert_eq!(scalar, Variant::scalar(5050i32));

        let err = from_json(
            &json!(5050),
            DataType::Int32,
            ValueRank::ONE_OR_MORE_DIMENSIONS,
        )
        .unwrap_err();
        assert_eq!(err, CodecError::ArrayExpected(ValueRank::ONE_OR_MORE_DIMENSIONS));
    }

    #[test]
    fn one_level_rank_rules() {
        let value = json!([1, 2, 3]);

        assert_eq!(
            from_json(&value, DataType::Int32, ValueRank::SCALAR).unwrap_err(),
            CodecError::ScalarExpected
        );
        assert!(matches!(
            from_json(&value, DataType::Int32, ValueRank::dimensions(2)).unwrap_err(),
            CodecError::RankMismatch { depth: 1, .. }
        ));

        for rank in [
            ValueRank::SCALAR_OR_ONE_DIMENSION,
            ValueRank::ANY,
            ValueRank::ONE_OR_MORE_DIMENSIONS,
            ValueRank::dimensions(1),
        ] {
            let variant = from_json(&value, DataType::Int32, rank).unwrap();
            assert_eq!(variant.array_type(), ArrayType::Array);
        }
    }

    #[test]
    fn empty_array_is_one_dimensional() {
        let variant = from_json(&json!([]), DataType::String, ValueRank::ANY).unwrap();
        assert_eq!(variant.array_type(), ArrayType::Array);
        assert!(variant.values().is_empty());
    }

    #[test]
    fn exact_rank_must_match_depth() {
        let err = from_json(
            &json!([[[1]]]),
            DataType::Byte,
            ValueRank::dimensions(2),
        )
        .unwrap_err();

        assert!(matches!(err, CodecError::RankMismatch { depth: 3, .. }));
    }

    #[test]
    fn any_rank_accepts_every_depth() {
        for value in [json!(1), json!([1]), json!([[1]]), json!([[[1]]])] {
            assert!(from_json(&value, DataType::Byte, ValueRank::ANY).is_ok());
        }
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        let err = from_json(
            &json!([[1, 2], [3], [4, 5, 6]]),
            DataType::Int32,
            ValueRank::ANY,
        )
        .unwrap_err();

        assert!(matches!(err, CodecError::DimensionMismatch { level: 1, .. }));
    }

    #[test]
    fn uint64_pair_consumes_one_level() {
        let scalar = from_json(&json!([1, 0]), DataType::UInt64, ValueRank::SCALAR).unwrap();
        assert_eq!(scalar, Variant::scalar(1u64 << 32));
        assert_eq!(to_json(&scalar).unwrap(), json!([1, 0]));

        let array = from_json(
            &json!([[0, 1], [0, 2]]),
            DataType::UInt64,
            ValueRank::dimensions(1),
        )
        .unwrap();
        assert_eq!(array.values(), &[Scalar::UInt64(1), Scalar::UInt64(2)]);

        let matrix = from_json(
            &json!([[[0, 1]], [[0, 2]]]),
            DataType::Int64,
            ValueRank::dimensions(2),
        )
        .unwrap();
        assert_eq!(matrix.dimensions(), Some(&[2, 1][..]));
    }

    #[test]
    fn uint64_component_out_of_range() {
        let err = from_json(&json!([-1, 0]), DataType::UInt64, ValueRank::SCALAR).unwrap_err();

        assert_eq!(
            err,
            CodecError::ComponentRange {
                data_type: DataType::UInt64,
                index: 0
            }
        );
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn status_code_is_serialize_only() {
        let json = to_json(&Variant::scalar(StatusCode::GOOD)).unwrap();
        assert_eq!(
            json,
            json!({"name": "Good", "value": 0, "description": "No Error"})
        );

        let err = from_json(&json, DataType::StatusCode, ValueRank::SCALAR).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedType(DataType::StatusCode));
    }

    #[test]
    fn nested_variants_are_inferred_and_serialized_recursively() {
        let variant = from_json(
            &json!([1, "two", 3.5, true, null]),
            DataType::Variant,
            ValueRank::ANY,
        )
        .unwrap();

        assert_eq!(variant.data_type(), DataType::Variant);
        assert_eq!(
            variant.values()[0],
            Scalar::Variant(Box::new(Variant::scalar(1i32)))
        );
        assert_eq!(
            to_json(&variant).unwrap(),
            json!([1, "two", 3.5, true, null])
        );
    }

    #[test]
    fn call_result_is_rendered_with_status_objects() {
        let result = CallMethodResult {
            status_code: StatusCode::GOOD,
            input_argument_results: vec![StatusCode::GOOD],
            output_arguments: vec![Variant::scalar(121u32), Variant::scalar(30.0f64)],
        };

        assert_eq!(
            call_result_to_json(&result).unwrap(),
            json!({
                "statusCode": {"name": "Good", "value": 0, "description": "No Error"},
                "inputArgumentResults": [{"name": "Good", "value": 0, "description": "No Error"}],
                "outputArguments": [121, 30.0],
            })
        );
    }
}
