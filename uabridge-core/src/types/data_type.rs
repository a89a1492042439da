use super::NodeId;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Data type '{0}' is not a built-in type")]
pub struct NotBuiltInType(pub String);

/// The built-in data types of OPC UA, with their protocol-level identifiers.
///
/// Each built-in type is also a node of namespace 0 whose numeric id is the discriminant,
/// e.g. `Int32` is `ns=0;i=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    Null = 0,
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

impl DataType {
    pub const ALL: [DataType; 26] = [
        DataType::Null,
        DataType::Boolean,
        DataType::SByte,
        DataType::Byte,
        DataType::Int16,
        DataType::UInt16,
        DataType::Int32,
        DataType::UInt32,
        DataType::Int64,
        DataType::UInt64,
        DataType::Float,
        DataType::Double,
        DataType::String,
        DataType::DateTime,
        DataType::Guid,
        DataType::ByteString,
        DataType::XmlElement,
        DataType::NodeId,
        DataType::ExpandedNodeId,
        DataType::StatusCode,
        DataType::QualifiedName,
        DataType::LocalizedText,
        DataType::ExtensionObject,
        DataType::DataValue,
        DataType::Variant,
        DataType::DiagnosticInfo,
    ];

    pub const fn id(self) -> u32 {
        self as u32
    }

    pub fn node_id(self) -> NodeId {
        NodeId::numeric(0, self.id())
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataType::Null => "Null",
            DataType::Boolean => "Boolean",
            DataType::SByte => "SByte",
            DataType::Byte => "Byte",
            DataType::Int16 => "Int16",
            DataType::UInt16 => "UInt16",
            DataType::Int32 => "Int32",
            DataType::UInt32 => "UInt32",
            DataType::Int64 => "Int64",
            DataType::UInt64 => "UInt64",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::String => "String",
            DataType::DateTime => "DateTime",
            DataType::Guid => "Guid",
            DataType::ByteString => "ByteString",
            DataType::XmlElement => "XmlElement",
            DataType::NodeId => "NodeId",
            DataType::ExpandedNodeId => "ExpandedNodeId",
            DataType::StatusCode => "StatusCode",
            DataType::QualifiedName => "QualifiedName",
            DataType::LocalizedText => "LocalizedText",
            DataType::ExtensionObject => "ExtensionObject",
            DataType::DataValue => "DataValue",
            DataType::Variant => "Variant",
            DataType::DiagnosticInfo => "DiagnosticInfo",
        }
    }

    /// `Int64` and `UInt64` travel as a `[hi, lo]` pair of 32-bit words on the JSON side.
    pub const fn is_64bit_integer(self) -> bool {
        matches!(self, DataType::Int64 | DataType::UInt64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for DataType {
    type Error = NotBuiltInType;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        DataType::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| NotBuiltInType(NodeId::numeric(0, id).to_string()))
    }
}

impl TryFrom<&NodeId> for DataType {
    type Error = NotBuiltInType;

    /// Only namespace 0 numeric ids in `0..=25` are built-in; structures, enumerations and
    /// vendor types are not.
    fn try_from(node_id: &NodeId) -> Result<Self, Self::Error> {
        node_id
            .as_ns0_numeric()
            .and_then(|id| DataType::try_from(id).ok())
            .ok_or_else(|| NotBuiltInType(node_id.to_string()))
    }
}

impl FromStr for DataType {
    type Err = NotBuiltInType;

    /// Accepts a type name (`Int32`), a numeric id (`6`) or a NodeId (`ns=0;i=6`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(data_type) = DataType::ALL.iter().find(|t| t.name() == s) {
            return Ok(*data_type);
        }

        if let Ok(id) = s.parse::<u32>() {
            return DataType::try_from(id);
        }

        match s.parse::<NodeId>() {
            Ok(node_id) => DataType::try_from(&node_id),
            Err(_) => Err(NotBuiltInType(s.to_string())),
        }
    }
}
