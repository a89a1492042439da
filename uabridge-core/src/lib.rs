//! # uabridge Core
//!
//! `uabridge-core` is the foundational library powering the uabridge CLI. It converts OPC UA
//! [`Variant`](types::Variant) values to and from JSON and drives remote method calls whose
//! input arguments arrive as untyped JSON.
//!
//! ## Key Components
//!
//! * **[`codec`]:** Bidirectional `Variant` <-> `serde_json::Value` transcoding for every built-in
//!   scalar kind, for one dimensional arrays and for rectangular matrices of any rank.
//! * **[`ArgumentTypeCache`](arguments::ArgumentTypeCache):** A process-lifetime cache of the
//!   `InputArguments` property of methods, fetched from the server in batches.
//! * **[`MethodInvoker`](client::MethodInvoker):** Validates call requests against the declared
//!   argument types, builds typed variants and forwards the whole batch in a single call.
//!
//! ## The Session
//!
//! The wire protocol is not implemented here. Every remote interaction goes through the
//! [`Session`](session::Session) trait, which exposes the three batched services this crate needs:
//! `Browse`, `Read` and `Call`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use uabridge_core::client::{CallRequest, MethodInvoker};
//! use uabridge_core::session::Session;
//!
//! # async fn run<S: Session>(session: S) -> Result<(), Box<dyn std::error::Error>> {
//! let invoker = MethodInvoker::new(session);
//!
//! let request = CallRequest {
//!     object_id: "ns=1;i=5000".parse()?,
//!     method_id: "ns=1;i=5040".parse()?,
//!     input_arguments: Some(vec![serde_json::json!(1.5), serde_json::json!(20)]),
//! };
//!
//! let result = invoker.call_method(request).await?;
//! println!("{}", uabridge_core::codec::call_result_to_json(&result)?);
//! # Ok(())
//! # }
//! ```
pub mod arguments;
pub mod client;
pub mod codec;
pub mod session;
pub mod types;

/// Type alias for the standard boxed error used to carry session failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
