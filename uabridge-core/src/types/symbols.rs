//! Well-known symbolic names of namespace 0 nodes.
//!
//! Lets callers write `ObjectsFolder` or `HasProperty` wherever a [`NodeId`](super::NodeId) is
//! expected instead of the numeric `ns=0;i=85` form.

/// Reference type linking a node to its properties.
pub const HAS_PROPERTY: u32 = 46;

/// Symbolic name to numeric identifier, namespace 0.
const SYMBOLS: &[(&str, u32)] = &[
    // Built-in data types
    ("Boolean", 1),
    ("SByte", 2),
    ("Byte", 3),
    ("Int16", 4),
    ("UInt16", 5),
    ("Int32", 6),
    ("UInt32", 7),
    ("Int64", 8),
    ("UInt64", 9),
    ("Float", 10),
    ("Double", 11),
    ("String", 12),
    ("DateTime", 13),
    ("Guid", 14),
    ("ByteString", 15),
    ("XmlElement", 16),
    ("NodeId", 17),
    ("ExpandedNodeId", 18),
    ("StatusCode", 19),
    ("QualifiedName", 20),
    ("LocalizedText", 21),
    ("Structure", 22),
    ("DataValue", 23),
    ("BaseDataType", 24),
    ("DiagnosticInfo", 25),
    ("Number", 26),
    ("Integer", 27),
    ("UInteger", 28),
    ("Enumeration", 29),
    ("Argument", 296),
    // Reference types
    ("References", 31),
    ("NonHierarchicalReferences", 32),
    ("HierarchicalReferences", 33),
    ("HasChild", 34),
    ("Organizes", 35),
    ("HasEventSource", 36),
    ("HasModellingRule", 37),
    ("HasEncoding", 38),
    ("HasDescription", 39),
    ("HasTypeDefinition", 40),
    ("GeneratesEvent", 41),
    ("Aggregates", 44),
    ("HasSubtype", 45),
    ("HasProperty", HAS_PROPERTY),
    ("HasComponent", 47),
    ("HasNotifier", 48),
    ("HasOrderedComponent", 49),
    // Object and variable types
    ("BaseObjectType", 58),
    ("FolderType", 61),
    ("BaseVariableType", 62),
    ("BaseDataVariableType", 63),
    ("PropertyType", 68),
    // Standard folders and objects
    ("RootFolder", 84),
    ("ObjectsFolder", 85),
    ("TypesFolder", 86),
    ("ViewsFolder", 87),
    ("ObjectTypesFolder", 88),
    ("VariableTypesFolder", 89),
    ("DataTypesFolder", 90),
    ("ReferenceTypesFolder", 91),
    ("Server", 2253),
];

/// Returns the namespace 0 numeric identifier of a well-known symbolic name.
pub fn resolve(name: &str) -> Option<u32> {
    SYMBOLS
        .iter()
        .find(|(symbol, _)| *symbol == name)
        .map(|(_, id)| *id)
}
