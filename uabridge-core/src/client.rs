//! # Method Invoker
//!
//! Calls OPC UA methods whose input arguments are given as untyped JSON.
//!
//! ## How it works
//!
//! 1. **Resolve**: The input argument definitions of every requested method are taken from the
//!    [`ArgumentTypeCache`], which fetches the missing ones in one batch.
//! 2. **Validate & Convert**: Each request's JSON arguments are paired positionally with the
//!    definitions and converted into typed [`Variant`](crate::types::Variant)s with
//!    [`codec::from_json`].
//! 3. **Call**: The converted batch is forwarded to the session in a single `Call` request.
//!
//! A validation failure in any request aborts the whole batch before the `Call` is issued. Partial
//! batches are never sent.
use crate::BoxError;
use crate::arguments::{ArgumentTypeCache, ArgumentTypeError};
use crate::codec::{self, CodecError};
use crate::session::{CallMethodRequest, CallMethodResult, Session};
use crate::types::{ArgumentDescriptor, NodeId, NotBuiltInType};
use serde_json::Value;
use std::sync::Arc;

/// A method call with untyped arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    /// The object or object type the method is called on.
    pub object_id: NodeId,
    pub method_id: NodeId,
    /// One JSON value per declared input argument. `None` and an empty list are equivalent.
    pub input_arguments: Option<Vec<Value>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MethodCallError {
    #[error("Method '{method_id}' expects {expected} input argument(s) but none were given")]
    MissingArguments { method_id: NodeId, expected: usize },

    #[error("Method '{method_id}' expects {expected} input argument(s) but {actual} were given")]
    ArgumentCount {
        method_id: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("Input argument {index} of method '{method_id}' has an unsupported type: '{source}'")]
    UnsupportedArgumentType {
        method_id: NodeId,
        index: usize,
        #[source]
        source: NotBuiltInType,
    },

    #[error("Invalid input argument {index} of method '{method_id}': '{source}'")]
    InvalidArgument {
        method_id: NodeId,
        index: usize,
        #[source]
        source: CodecError,
    },

    #[error("Failed to resolve input argument types: '{0}'")]
    ArgumentTypes(#[from] ArgumentTypeError),

    #[error("Session call failed: '{0}'")]
    Session(#[source] BoxError),

    #[error("Session returned {actual} call results for {expected} requests")]
    ResultCountMismatch { expected: usize, actual: usize },
}

/// Validates and executes method calls through a [`Session`].
///
/// All operations take `&self`; wrap the invoker in an `Arc` to share it between tasks.
#[derive(Debug)]
pub struct MethodInvoker<S> {
    session: S,
    cache: Arc<ArgumentTypeCache>,
}

impl<S> MethodInvoker<S>
where
    S: Session,
{
    /// Creates an invoker with an empty argument type cache of its own.
    pub fn new(session: S) -> Self {
        Self::with_cache(session, Arc::new(ArgumentTypeCache::new()))
    }

    /// Creates an invoker sharing `cache` with other invokers talking to the same server.
    pub fn with_cache(session: S, cache: Arc<ArgumentTypeCache>) -> Self {
        Self { session, cache }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn cache(&self) -> &Arc<ArgumentTypeCache> {
        &self.cache
    }

    /// Executes a single method call.
    pub async fn call_method(
        &self,
        request: CallRequest,
    ) -> Result<CallMethodResult, MethodCallError> {
        let mut results = self.call_methods(vec![request]).await?;

        results
            .pop()
            .ok_or(MethodCallError::ResultCountMismatch {
                expected: 1,
                actual: 0,
            })
    }

    /// Executes a batch of method calls in a single remote `Call`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CallMethodResult>)` - The session's results, one per request in request order.
    ///   A method that failed on the server reports it through its own status code.
    /// * `Err(MethodCallError)` - If any request fails validation (nothing is sent in that case),
    ///   the argument definitions cannot be resolved or the session call fails.
    pub async fn call_methods(
        &self,
        requests: Vec<CallRequest>,
    ) -> Result<Vec<CallMethodResult>, MethodCallError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let method_ids: Vec<NodeId> = requests.iter().map(|r| r.method_id.clone()).collect();

        let descriptors = self
            .cache
            .get_descriptors(&self.session, &method_ids)
            .await?;

        let methods_to_call = requests
            .into_iter()
            .zip(&descriptors)
            .map(|(request, descriptors)| build_call(request, descriptors))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = methods_to_call.len(), "Calling methods");

        let results = self
            .session
            .call(&methods_to_call)
            .await
            .map_err(|e| MethodCallError::Session(e.into()))?;

        if results.len() != methods_to_call.len() {
            return Err(MethodCallError::ResultCountMismatch {
                expected: methods_to_call.len(),
                actual: results.len(),
            });
        }

        for (request, result) in methods_to_call.iter().zip(&results) {
            if !result.status_code.is_good() {
                tracing::warn!(
                    method_id = %request.method_id,
                    status = %result.status_code,
                    "Method call failed"
                );
            }
        }

        Ok(results)
    }
}

/// Converts the JSON arguments of `request` into the variants declared by `descriptors`.
fn build_call(
    request: CallRequest,
    descriptors: &[ArgumentDescriptor],
) -> Result<CallMethodRequest, MethodCallError> {
    let CallRequest {
        object_id,
        method_id,
        input_arguments,
    } = request;

    let arguments = input_arguments.unwrap_or_default();

    if arguments.is_empty() && !descriptors.is_empty() {
        return Err(MethodCallError::MissingArguments {
            method_id,
            expected: descriptors.len(),
        });
    }

    if arguments.len() != descriptors.len() {
        return Err(MethodCallError::ArgumentCount {
            method_id,
            expected: descriptors.len(),
            actual: arguments.len(),
        });
    }

    let mut input_arguments = Vec::with_capacity(arguments.len());

    for (index, (value, descriptor)) in arguments.iter().zip(descriptors).enumerate() {
        let data_type = match descriptor.built_in_type() {
            Ok(data_type) => data_type,
            Err(source) => {
                return Err(MethodCallError::UnsupportedArgumentType {
                    method_id,
                    index,
                    source,
                });
            }
        };

        tracing::trace!(
            %method_id,
            index,
            name = %descriptor.name,
            %data_type,
            value_rank = %descriptor.value_rank,
            "Converting input argument"
        );

        match codec::from_json(value, data_type, descriptor.value_rank) {
            Ok(variant) => input_arguments.push(variant),
            Err(source) => {
                return Err(MethodCallError::InvalidArgument {
                    method_id,
                    index,
                    source,
                });
            }
        }
    }

    Ok(CallMethodRequest {
        object_id,
        method_id,
        input_arguments,
    })
}
