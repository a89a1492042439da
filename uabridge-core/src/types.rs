//! # Data Model
//!
//! The OPC UA values exchanged with a server, in the subset this crate needs to transcode:
//! identifiers ([`NodeId`], [`ExpandedNodeId`]), names ([`QualifiedName`], [`LocalizedText`]),
//! [`StatusCode`], the built-in [`DataType`] table and the [`Variant`] union itself.
//!
//! The identifier and name types implement `Display`/`FromStr` using the textual syntax of OPC UA
//! (`ns=1;i=123`, `1:Temperature`, ...), which is also the syntax used on the JSON side.
mod argument;
mod data_type;
mod localized_text;
mod node_id;
mod qualified_name;
mod status_code;
pub mod symbols;
mod variant;

pub use argument::*;
pub use data_type::*;
pub use localized_text::*;
pub use node_id::*;
pub use qualified_name::*;
pub use status_code::*;
pub use variant::*;

/// The `DateTime` built-in type. Resolution is kept at whatever the session decoded.
pub type DateTime = chrono::DateTime<chrono::Utc>;
