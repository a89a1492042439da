//! # Session
//!
//! The boundary between this crate and an OPC UA client stack.
//!
//! Encoding, secure channels and subscriptions belong to the client stack. This crate only needs
//! three of the services a session offers, all of them batched:
//!
//! * **Browse**: follow the references of a node (used to find a method's `InputArguments`).
//! * **Read**: read attributes of nodes (used to fetch the argument definitions).
//! * **Call**: invoke methods.
//!
//! Every service must answer with exactly one result per request item, in request order.
use crate::BoxError;
use crate::types::{DateTime, ExpandedNodeId, NodeId, QualifiedName, StatusCode, Variant};
use std::future::Future;
use std::sync::Arc;

/// A connected OPC UA session, as seen by this crate.
pub trait Session {
    type Error: Into<BoxError>;

    fn browse(
        &self,
        nodes_to_browse: &[BrowseDescription],
    ) -> impl Future<Output = Result<Vec<BrowseResult>, Self::Error>> + Send;

    fn read(
        &self,
        nodes_to_read: &[ReadValueId],
    ) -> impl Future<Output = Result<Vec<DataValue>, Self::Error>> + Send;

    fn call(
        &self,
        methods_to_call: &[CallMethodRequest],
    ) -> impl Future<Output = Result<Vec<CallMethodResult>, Self::Error>> + Send;
}

impl<S> Session for Arc<S>
where
    S: Session + Send + Sync,
{
    type Error = S::Error;

    fn browse(
        &self,
        nodes_to_browse: &[BrowseDescription],
    ) -> impl Future<Output = Result<Vec<BrowseResult>, Self::Error>> + Send {
        (**self).browse(nodes_to_browse)
    }

    fn read(
        &self,
        nodes_to_read: &[ReadValueId],
    ) -> impl Future<Output = Result<Vec<DataValue>, Self::Error>> + Send {
        (**self).read(nodes_to_read)
    }

    fn call(
        &self,
        methods_to_call: &[CallMethodRequest],
    ) -> impl Future<Output = Result<Vec<CallMethodResult>, Self::Error>> + Send {
        (**self).call(methods_to_call)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseDirection {
    Forward,
    Inverse,
    Both,
}

/// The class of a node. The discriminants are the bits used in node class masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum NodeClass {
    Unspecified = 0,
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl NodeClass {
    pub const fn mask(self) -> u32 {
        self as u32
    }
}

/// Which fields of a [`ReferenceDescription`] the server should fill in.
pub mod result_mask {
    pub const REFERENCE_TYPE: u32 = 1;
    pub const IS_FORWARD: u32 = 2;
    pub const NODE_CLASS: u32 = 4;
    pub const BROWSE_NAME: u32 = 8;
    pub const DISPLAY_NAME: u32 = 16;
    pub const TYPE_DEFINITION: u32 = 32;
    pub const ALL: u32 = 63;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseDescription {
    pub node_id: NodeId,
    pub browse_direction: BrowseDirection,
    pub reference_type_id: NodeId,
    pub include_subtypes: bool,
    /// Bitwise OR of [`NodeClass::mask`] values, `0` for all classes.
    pub node_class_mask: u32,
    /// Bitwise OR of [`result_mask`] values.
    pub result_mask: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDescription {
    pub reference_type_id: NodeId,
    pub is_forward: bool,
    pub node_id: ExpandedNodeId,
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResult {
    pub status_code: StatusCode,
    pub references: Vec<ReferenceDescription>,
}

/// Node attributes. The discriminants are the protocol attribute ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: AttributeId,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status_code: StatusCode,
    pub source_timestamp: Option<DateTime>,
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    pub fn new(value: Variant) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn bad(status_code: StatusCode) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallMethodRequest {
    pub object_id: NodeId,
    pub method_id: NodeId,
    pub input_arguments: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallMethodResult {
    pub status_code: StatusCode,
    pub input_argument_results: Vec<StatusCode>,
    pub output_arguments: Vec<Variant>,
}
