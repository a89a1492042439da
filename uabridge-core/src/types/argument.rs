use super::{DataType, LocalizedText, NodeId, NotBuiltInType};
use std::fmt;

/// The declared array shape of a value.
///
/// * `-3`: a scalar or a one dimensional array.
/// * `-2`: a scalar or an array of any rank.
/// * `-1`: a scalar.
/// * `0`: an array of one or more dimensions.
/// * `n >= 1`: an array of exactly `n` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRank(pub i32);

impl ValueRank {
    pub const SCALAR_OR_ONE_DIMENSION: Self = Self(-3);
    pub const ANY: Self = Self(-2);
    pub const SCALAR: Self = Self(-1);
    pub const ONE_OR_MORE_DIMENSIONS: Self = Self(0);

    /// An array of exactly `rank` dimensions.
    pub const fn dimensions(rank: u32) -> Self {
        Self(rank as i32)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for ValueRank {
    fn default() -> Self {
        Self::SCALAR
    }
}

impl From<i32> for ValueRank {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ValueRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The definition of one formal method parameter, as stored in the `InputArguments` and
/// `OutputArguments` properties of a method node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    pub name: String,
    /// The NodeId of the argument's data type. Built-in types live in namespace 0 with ids `0..=25`.
    pub data_type: NodeId,
    pub value_rank: ValueRank,
    pub array_dimensions: Vec<u32>,
    pub description: LocalizedText,
}

impl ArgumentDescriptor {
    pub fn new(name: impl Into<String>, data_type: DataType, value_rank: ValueRank) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.node_id(),
            value_rank,
            array_dimensions: Vec::new(),
            description: LocalizedText::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = description.into();
        self
    }

    /// Resolves the declared data type to a built-in one.
    pub fn built_in_type(&self) -> Result<DataType, NotBuiltInType> {
        DataType::try_from(&self.data_type)
    }
}
