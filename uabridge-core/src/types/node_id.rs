use super::symbols;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdParseError {
    #[error(
        "Invalid NodeId '{0}': expected 'ns=<namespace>;<i|s|g|b>=<value>' or a well-known symbolic name"
    )]
    InvalidSyntax(String),

    #[error("Invalid namespace index in NodeId '{0}'")]
    InvalidNamespace(String),

    #[error("Invalid {kind} identifier in NodeId '{input}'")]
    InvalidIdentifier { kind: &'static str, input: String },

    #[error("Invalid server index in ExpandedNodeId '{0}'")]
    InvalidServerIndex(String),
}

/// The identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={v}"),
            Identifier::Guid(v) => write!(f, "g={:X}", v.hyphenated()),
            Identifier::Opaque(v) => write!(f, "b={}", STANDARD.encode(v)),
        }
    }
}

/// A namespace qualified node identifier.
///
/// The `Display` output (`ns=<namespace>;<identifier>`) always spells out the namespace and is
/// the canonical string used as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    namespace: u16,
    identifier: Identifier,
}

impl NodeId {
    pub fn new(namespace: u16, identifier: Identifier) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    pub fn numeric(namespace: u16, value: u32) -> Self {
        Self::new(namespace, Identifier::Numeric(value))
    }

    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self::new(namespace, Identifier::String(value.into()))
    }

    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self::new(namespace, Identifier::Guid(value))
    }

    pub fn opaque(namespace: u16, value: Vec<u8>) -> Self {
        Self::new(namespace, Identifier::Opaque(value))
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Returns the numeric identifier of a namespace 0 node.
    pub fn as_ns0_numeric(&self) -> Option<u32> {
        match (self.namespace, &self.identifier) {
            (0, Identifier::Numeric(v)) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns={};{}", self.namespace, self.identifier)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    /// Parses `ns=<namespace>;<kind>=<value>`, `<kind>=<value>` (namespace 0) or a well-known
    /// symbolic name such as `ObjectsFolder`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = symbols::resolve(s) {
            return Ok(NodeId::numeric(0, id));
        }

        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (namespace, rest) = rest
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::InvalidSyntax(s.to_string()))?;

                let namespace = namespace
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(s.to_string()))?;

                (namespace, rest)
            }
            None => (0, s),
        };

        Ok(NodeId::new(namespace, parse_identifier(rest, s)?))
    }
}

fn parse_identifier(value: &str, input: &str) -> Result<Identifier, NodeIdParseError> {
    let (kind, value) = value
        .split_once('=')
        .ok_or_else(|| NodeIdParseError::InvalidSyntax(input.to_string()))?;

    let invalid = |kind| NodeIdParseError::InvalidIdentifier {
        kind,
        input: input.to_string(),
    };

    match kind {
        "i" => value
            .parse::<u32>()
            .map(Identifier::Numeric)
            .map_err(|_| invalid("numeric")),
        "s" => Ok(Identifier::String(value.to_string())),
        "g" => Uuid::parse_str(value)
            .map(Identifier::Guid)
            .map_err(|_| invalid("guid")),
        "b" => STANDARD
            .decode(value)
            .map(Identifier::Opaque)
            .map_err(|_| invalid("opaque")),
        _ => Err(NodeIdParseError::InvalidSyntax(input.to_string())),
    }
}

/// A [`NodeId`] that may point into another server or use a namespace URI instead of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedNodeId {
    node_id: NodeId,
    namespace_uri: Option<String>,
    server_index: u32,
}

impl ExpandedNodeId {
    /// A namespace URI replaces the namespace index, which is then stored as 0.
    pub fn new(node_id: NodeId, namespace_uri: Option<String>, server_index: u32) -> Self {
        let node_id = match namespace_uri {
            Some(_) => NodeId::new(0, node_id.identifier),
            None => node_id,
        };

        Self {
            node_id,
            namespace_uri,
            server_index,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn server_index(&self) -> u32 {
        self.server_index
    }

    /// Returns the inner [`NodeId`] when it refers to a node of the local server.
    pub fn into_local(self) -> Option<NodeId> {
        (self.server_index == 0 && self.namespace_uri.is_none()).then_some(self.node_id)
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::new(node_id, None, 0)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }

        match &self.namespace_uri {
            Some(uri) => write!(f, "nsu={uri};{}", self.node_id.identifier),
            None => write!(f, "{}", self.node_id),
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (server_index, rest) = match s.strip_prefix("svr=") {
            Some(rest) => {
                let (index, rest) = rest
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::InvalidSyntax(s.to_string()))?;

                let index = index
                    .parse::<u32>()
                    .map_err(|_| NodeIdParseError::InvalidServerIndex(s.to_string()))?;

                (index, rest)
            }
            None => (0, s),
        };

        match rest.strip_prefix("nsu=") {
            Some(rest) => {
                let (uri, identifier) = rest
                    .split_once(';')
                    .ok_or_else(|| NodeIdParseError::InvalidSyntax(s.to_string()))?;

                let node_id = NodeId::new(0, parse_identifier(identifier, s)?);

                Ok(Self::new(node_id, Some(uri.to_string()), server_index))
            }
            None => Ok(Self::new(rest.parse()?, None, server_index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_always_includes_namespace() {
        assert_eq!(NodeId::numeric(0, 1234).to_string(), "ns=0;i=1234");
        assert_eq!(NodeId::string(1, "Pump").to_string(), "ns=1;s=Pump");
        assert_eq!(NodeId::opaque(2, vec![1, 2, 3]).to_string(), "ns=2;b=AQID");
    }

    #[test]
    fn parses_every_identifier_kind() {
        let numeric: NodeId = "ns=1;i=123".parse().unwrap();
        assert_eq!(numeric, NodeId::numeric(1, 123));

        let string: NodeId = "ns=1;s=TestNodeId".parse().unwrap();
        assert_eq!(string, NodeId::string(1, "TestNodeId"));

        let guid: NodeId = "ns=3;g=72962B91-FA75-4AE6-8D28-B404DC7DAF63"
            .parse()
            .unwrap();
        assert!(matches!(guid.identifier(), Identifier::Guid(_)));
        assert_eq!(
            guid.to_string(),
            "ns=3;g=72962B91-FA75-4AE6-8D28-B404DC7DAF63"
        );

        let opaque: NodeId = "ns=2;b=AQID".parse().unwrap();
        assert_eq!(opaque, NodeId::opaque(2, vec![1, 2, 3]));

        let implicit_ns: NodeId = "i=85".parse().unwrap();
        assert_eq!(implicit_ns, NodeId::numeric(0, 85));
    }

    #[test]
    fn parses_symbolic_names() {
        let node: NodeId = "ObjectsFolder".parse().unwrap();
        assert_eq!(node, NodeId::numeric(0, 85));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!(
            "invalid".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidSyntax(_))
        ));
        assert!(matches!(
            "ns=0".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidSyntax(_))
        ));
        assert!(matches!(
            "ns=x;i=1".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidNamespace(_))
        ));
        assert!(matches!(
            "ns=1;i=abc".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidIdentifier { kind: "numeric", .. })
        ));
        assert!(matches!(
            "ns=1;q=1".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn expanded_node_id_round_trips() {
        let plain: ExpandedNodeId = "ns=1;i=5".parse().unwrap();
        assert_eq!(plain.to_string(), "ns=1;i=5");
        assert_eq!(plain.clone().into_local(), Some(NodeId::numeric(1, 5)));

        let remote: ExpandedNodeId = "svr=2;nsu=urn:test;s=Motor".parse().unwrap();
        assert_eq!(remote.server_index(), 2);
        assert_eq!(remote.namespace_uri(), Some("urn:test"));
        assert_eq!(remote.to_string(), "svr=2;nsu=urn:test;s=Motor");
        assert_eq!(remote.into_local(), None);
    }

    #[test]
    fn namespace_uri_replaces_namespace_index() {
        let id = ExpandedNodeId::new(NodeId::numeric(3, 7), Some("urn:x".to_string()), 0);

        assert_eq!(id.node_id(), &NodeId::numeric(0, 7));
        assert_eq!(id.to_string(), "nsu=urn:x;i=7");
        assert_eq!(id.to_string().parse::<ExpandedNodeId>().unwrap(), id);
    }
}
