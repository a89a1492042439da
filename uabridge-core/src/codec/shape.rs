//! Nesting depth, flattening and folding of N-dimensional JSON arrays.
use super::CodecError;
use serde_json::Value;

/// Depth of array nesting, following the first element of every level.
///
/// A non-array is `0` and an empty array is `1`.
pub(super) fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, depth),
        _ => 0,
    }
}

/// Flattens the first `levels` nesting levels of `value` into row-major order.
///
/// The dimensions are taken from the first element of every level. Every other sub-array must
/// have the same length as its level's dimension.
pub(super) fn flatten(value: &Value, levels: usize) -> Result<(Vec<u32>, Vec<&Value>), CodecError> {
    let mut dimensions = Vec::with_capacity(levels);
    let mut cursor = Some(value);

    for _ in 0..levels {
        let len = match cursor {
            Some(Value::Array(items)) => {
                cursor = items.first();
                items.len()
            }
            _ => 0,
        };

        dimensions.push(len);
    }

    let mut elements = Vec::new();
    collect(value, &dimensions, 0, &mut elements)?;

    let dimensions = dimensions
        .iter()
        .map(|dim| u32::try_from(*dim))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CodecError::DimensionMismatch {
            dimensions: dimensions.clone(),
            level: 0,
        })?;

    Ok((dimensions, elements))
}

fn collect<'a>(
    value: &'a Value,
    dimensions: &[usize],
    level: usize,
    out: &mut Vec<&'a Value>,
) -> Result<(), CodecError> {
    let Some(expected) = dimensions.get(level) else {
        out.push(value);
        return Ok(());
    };

    match value {
        Value::Array(items) if items.len() == *expected => {
            for item in items {
                collect(item, dimensions, level + 1, out)?;
            }

            Ok(())
        }
        _ => Err(CodecError::DimensionMismatch {
            dimensions: dimensions.to_vec(),
            level,
        }),
    }
}

/// Folds a flat row-major sequence into nested arrays, one level per dimension.
///
/// The sequence is partitioned by the last dimension first, then the resulting groups by the
/// dimension before it, until the outermost level holds `dimensions[0]` items.
pub(super) fn fold(values: Vec<Value>, dimensions: &[u32]) -> Value {
    let mut current = values;

    for level in (1..dimensions.len()).rev() {
        let size = dimensions[level] as usize;
        let groups: usize = dimensions[..level].iter().map(|dim| *dim as usize).product();

        let mut items = current.into_iter();

        current = (0..groups)
            .map(|_| Value::Array(items.by_ref().take(size).collect()))
            .collect();
    }

    Value::Array(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn depth_follows_first_elements() {
        assert_eq!(depth(&json!(1)), 0);
        assert_eq!(depth(&json!([])), 1);
        assert_eq!(depth(&json!([[], [1]])), 2);
        assert_eq!(depth(&json!([[[1, 2]], 3])), 3);
    }

    #[test]
    fn flatten_derives_dimensions_per_level() {
        let value = json!([[[1, 2], [3, 4], [5, 6]], [[7, 8], [9, 10], [11, 12]]]);

        let (dimensions, elements) = flatten(&value, 3).unwrap();

        assert_eq!(dimensions, vec![2, 3, 2]);
        assert_eq!(
            elements.into_iter().cloned().collect::<Vec<_>>(),
            (1..=12).map(|v| json!(v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn flatten_stops_at_requested_level() {
        let value = json!([[[0, 1], [0, 2]]]);

        let (dimensions, elements) = flatten(&value, 2).unwrap();

        assert_eq!(dimensions, vec![1, 2]);
        assert_eq!(elements, vec![&json!([0, 1]), &json!([0, 2])]);
    }

    #[test]
    fn flatten_rejects_non_array_sibling() {
        let err = flatten(&json!([[1, 2], 3]), 2).unwrap_err();
        assert!(matches!(err, CodecError::DimensionMismatch { level: 1, .. }));
    }

    #[test]
    fn fold_inverts_flatten() {
        let value = json!([[1, 2, 3], [4, 5, 6]]);
        let (dimensions, elements) = flatten(&value, 2).unwrap();

        let folded = fold(elements.into_iter().cloned().collect(), &dimensions);

        assert_eq!(folded, value);
    }

    #[test]
    fn fold_single_dimension_is_flat() {
        assert_eq!(fold(vec![json!(1), json!(2)], &[2]), json!([1, 2]));
    }
}
