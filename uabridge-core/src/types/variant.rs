use super::{
    ArgumentDescriptor, DataType, DateTime, ExpandedNodeId, LocalizedText, NodeId, QualifiedName,
    StatusCode,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    #[error("Element {index} is a {found} but the variant holds {expected} values")]
    ElementType {
        index: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("Matrix dimensions {dimensions:?} describe {expected} elements but {actual} were given")]
    DimensionMismatch {
        dimensions: Vec<u32>,
        expected: u64,
        actual: usize,
    },

    #[error("A matrix needs at least two dimensions, got {0:?}")]
    TooFewDimensions(Vec<u32>),
}

/// The shape of a variant's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    Scalar,
    Array,
    Matrix,
}

/// A structure value. Only the `Argument` structure is decoded; any other is kept as the
/// encoded body the session handed over.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionObject {
    Argument(ArgumentDescriptor),
    Encoded { type_id: NodeId, body: Vec<u8> },
}

/// A single value of one of the built-in types.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime),
    Guid(Uuid),
    ByteString(Vec<u8>),
    XmlElement(String),
    NodeId(NodeId),
    ExpandedNodeId(ExpandedNodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    ExtensionObject(ExtensionObject),
    Variant(Box<Variant>),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Boolean(_) => DataType::Boolean,
            Scalar::SByte(_) => DataType::SByte,
            Scalar::Byte(_) => DataType::Byte,
            Scalar::Int16(_) => DataType::Int16,
            Scalar::UInt16(_) => DataType::UInt16,
            Scalar::Int32(_) => DataType::Int32,
            Scalar::UInt32(_) => DataType::UInt32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::UInt64(_) => DataType::UInt64,
            Scalar::Float(_) => DataType::Float,
            Scalar::Double(_) => DataType::Double,
            Scalar::String(_) => DataType::String,
            Scalar::DateTime(_) => DataType::DateTime,
            Scalar::Guid(_) => DataType::Guid,
            Scalar::ByteString(_) => DataType::ByteString,
            Scalar::XmlElement(_) => DataType::XmlElement,
            Scalar::NodeId(_) => DataType::NodeId,
            Scalar::ExpandedNodeId(_) => DataType::ExpandedNodeId,
            Scalar::StatusCode(_) => DataType::StatusCode,
            Scalar::QualifiedName(_) => DataType::QualifiedName,
            Scalar::LocalizedText(_) => DataType::LocalizedText,
            Scalar::ExtensionObject(_) => DataType::ExtensionObject,
            Scalar::Variant(_) => DataType::Variant,
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime => DateTime,
    Uuid => Guid,
    NodeId => NodeId,
    ExpandedNodeId => ExpandedNodeId,
    StatusCode => StatusCode,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<Variant> for Scalar {
    fn from(value: Variant) -> Self {
        Scalar::Variant(Box::new(value))
    }
}

/// The payload of a [`Variant`].
#[derive(Debug, Clone, PartialEq)]
pub enum VariantValue {
    /// The null variant.
    Empty,
    Scalar(Scalar),
    Array(Vec<Scalar>),
    /// A rectangular array stored flat in row-major order, outermost dimension first.
    Matrix {
        dimensions: Vec<u32>,
        values: Vec<Scalar>,
    },
}

/// The OPC UA union value: a built-in type tag plus a scalar, array or matrix payload.
///
/// Constructors guarantee that every element matches the type tag and that a matrix holds
/// exactly `product(dimensions)` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    data_type: DataType,
    value: VariantValue,
}

impl Default for Variant {
    fn default() -> Self {
        Self::empty()
    }
}

impl Variant {
    pub fn empty() -> Self {
        Self {
            data_type: DataType::Null,
            value: VariantValue::Empty,
        }
    }

    pub fn scalar(value: impl Into<Scalar>) -> Self {
        let value = value.into();
        Self {
            data_type: value.data_type(),
            value: VariantValue::Scalar(value),
        }
    }

    pub fn array(data_type: DataType, values: Vec<Scalar>) -> Result<Self, VariantError> {
        check_elements(data_type, &values)?;

        Ok(Self {
            data_type,
            value: VariantValue::Array(values),
        })
    }

    pub fn matrix(
        data_type: DataType,
        dimensions: Vec<u32>,
        values: Vec<Scalar>,
    ) -> Result<Self, VariantError> {
        if dimensions.len() < 2 {
            return Err(VariantError::TooFewDimensions(dimensions));
        }

        let expected = dimensions
            .iter()
            .try_fold(1u64, |acc, dim| acc.checked_mul(u64::from(*dim)));

        if expected != Some(values.len() as u64) {
            return Err(VariantError::DimensionMismatch {
                dimensions,
                expected: expected.unwrap_or(u64::MAX),
                actual: values.len(),
            });
        }

        check_elements(data_type, &values)?;

        Ok(Self {
            data_type,
            value: VariantValue::Matrix { dimensions, values },
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn array_type(&self) -> ArrayType {
        match self.value {
            VariantValue::Empty | VariantValue::Scalar(_) => ArrayType::Scalar,
            VariantValue::Array(_) => ArrayType::Array,
            VariantValue::Matrix { .. } => ArrayType::Matrix,
        }
    }

    pub fn value(&self) -> &VariantValue {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.value, VariantValue::Empty)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.value {
            VariantValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The matrix dimensions. `None` for scalars and arrays.
    pub fn dimensions(&self) -> Option<&[u32]> {
        match &self.value {
            VariantValue::Matrix { dimensions, .. } => Some(dimensions),
            _ => None,
        }
    }

    /// Every element of the payload in storage order.
    pub fn values(&self) -> &[Scalar] {
        match &self.value {
            VariantValue::Empty => &[],
            VariantValue::Scalar(value) => std::slice::from_ref(value),
            VariantValue::Array(values) | VariantValue::Matrix { values, .. } => values,
        }
    }
}

fn check_elements(data_type: DataType, values: &[Scalar]) -> Result<(), VariantError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, value)| value.data_type() != data_type)
    {
        Some((index, value)) => Err(VariantError::ElementType {
            index,
            expected: data_type,
            found: value.data_type(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_takes_the_type_of_its_value() {
        let variant = Variant::scalar(5050i32);
        assert_eq!(variant.data_type(), DataType::Int32);
        assert_eq!(variant.array_type(), ArrayType::Scalar);
        assert_eq!(variant.dimensions(), None);
        assert_eq!(variant.values(), &[Scalar::Int32(5050)]);
    }

    #[test]
    fn array_rejects_mixed_elements() {
        let err = Variant::array(
            DataType::Int32,
            vec![Scalar::Int32(1), Scalar::Double(2.0)],
        )
        .unwrap_err();

        assert_eq!(
            err,
            VariantError::ElementType {
                index: 1,
                expected: DataType::Int32,
                found: DataType::Double,
            }
        );
    }

    #[test]
    fn matrix_requires_product_of_dimensions() {
        let values: Vec<Scalar> = (0..6).map(Scalar::Int32).collect();

        let matrix = Variant::matrix(DataType::Int32, vec![2, 3], values.clone()).unwrap();
        assert_eq!(matrix.array_type(), ArrayType::Matrix);
        assert_eq!(matrix.dimensions(), Some(&[2, 3][..]));

        let err = Variant::matrix(DataType::Int32, vec![4, 2], values).unwrap_err();
        assert!(matches!(
            err,
            VariantError::DimensionMismatch {
                expected: 8,
                actual: 6,
                ..
            }
        ));
    }

    #[test]
    fn matrix_requires_two_dimensions() {
        assert_eq!(
            Variant::matrix(DataType::Int32, vec![], vec![Scalar::Int32(7)]).unwrap_err(),
            VariantError::TooFewDimensions(vec![])
        );
        assert_eq!(
            Variant::matrix(DataType::Int32, vec![2], vec![Scalar::Int32(1), Scalar::Int32(2)])
                .unwrap_err(),
            VariantError::TooFewDimensions(vec![2])
        );
    }

    #[test]
    fn empty_matrix_dimensions_are_allowed() {
        let matrix = Variant::matrix(DataType::Boolean, vec![2, 0], vec![]).unwrap();
        assert!(matrix.values().is_empty());
    }
}
