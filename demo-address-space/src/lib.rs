//! # Demo Address Space
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide an in-memory
//! [`Session`] for integration testing `uabridge-core`.
//! It is not intended for production use.
//!
//! Methods are registered together with their `InputArguments` property and a handler that
//! computes the output arguments. Every service call is recorded so tests can assert on the
//! number and content of the remote round trips.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uabridge_core::session::{
    AttributeId, BrowseDescription, BrowseResult, CallMethodRequest, CallMethodResult, DataValue,
    NodeClass, ReadValueId, ReferenceDescription, Session,
};
use uabridge_core::types::{
    ArgumentDescriptor, DataType, ExtensionObject, NodeId, QualifiedName, Scalar, StatusCode,
    ValueRank, Variant, symbols,
};

/// Namespace of the demo nodes.
pub const NAMESPACE: u16 = 1;

type Handler = Arc<dyn Fn(&[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("The demo session is unavailable")]
    Unavailable,
}

struct MethodNode {
    property: Option<NodeId>,
    handler: Handler,
    browse_status: StatusCode,
}

/// The requests every service received, one entry per batch.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub browse: Vec<Vec<BrowseDescription>>,
    pub read: Vec<Vec<ReadValueId>>,
    pub call: Vec<Vec<CallMethodRequest>>,
}

#[derive(Default)]
pub struct DemoAddressSpace {
    methods: HashMap<String, MethodNode>,
    properties: HashMap<String, DataValue>,
    recorded: Mutex<Recorded>,
    unavailable: AtomicBool,
    truncated: AtomicBool,
}

pub fn object_id() -> NodeId {
    NodeId::string(NAMESPACE, "Demo")
}

pub fn method_id(name: &str) -> NodeId {
    NodeId::string(NAMESPACE, format!("Demo.{name}"))
}

impl DemoAddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// An address space with a handful of ready-made methods:
    ///
    /// * `Multiply(a: Double, b: Double) -> Double`
    /// * `Sum(values: Int32[]) -> Int64`
    /// * `Hello(name: String) -> String`
    /// * `Reset() -> Boolean`
    /// * `Transpose(matrix: Double[][]) -> Double[][]`
    pub fn standard() -> Self {
        Self::new()
            .with_method(
                method_id("Multiply"),
                vec![
                    ArgumentDescriptor::new("a", DataType::Double, ValueRank::SCALAR),
                    ArgumentDescriptor::new("b", DataType::Double, ValueRank::SCALAR),
                ],
                |inputs| {
                    let [a, b] = inputs else {
                        return Err(StatusCode::BAD_ARGUMENTS_MISSING);
                    };

                    Ok(vec![Variant::scalar(double(a)? * double(b)?)])
                },
            )
            .with_method(
                method_id("Sum"),
                vec![ArgumentDescriptor::new(
                    "values",
                    DataType::Int32,
                    ValueRank::dimensions(1),
                )],
                |inputs| {
                    let total = inputs
                        .first()
                        .ok_or(StatusCode::BAD_ARGUMENTS_MISSING)?
                        .values()
                        .iter()
                        .map(|value| match value {
                            Scalar::Int32(v) => Ok(i64::from(*v)),
                            _ => Err(StatusCode::BAD_TYPE_MISMATCH),
                        })
                        .sum::<Result<i64, _>>()?;

                    Ok(vec![Variant::scalar(total)])
                },
            )
            .with_method(
                method_id("Hello"),
                vec![ArgumentDescriptor::new(
                    "name",
                    DataType::String,
                    ValueRank::SCALAR,
                )],
                |inputs| match inputs.first().and_then(Variant::as_scalar) {
                    Some(Scalar::String(name)) => {
                        Ok(vec![Variant::scalar(format!("Hello, {name}!"))])
                    }
                    _ => Err(StatusCode::BAD_TYPE_MISMATCH),
                },
            )
            .with_method_without_arguments(method_id("Reset"), |_| {
                Ok(vec![Variant::scalar(true)])
            })
            .with_method(
                method_id("Transpose"),
                vec![ArgumentDescriptor::new(
                    "matrix",
                    DataType::Double,
                    ValueRank::dimensions(2),
                )],
                |inputs| {
                    let matrix = inputs.first().ok_or(StatusCode::BAD_ARGUMENTS_MISSING)?;

                    let Some(&[rows, columns]) = matrix.dimensions() else {
                        return Err(StatusCode::BAD_TYPE_MISMATCH);
                    };

                    let values = matrix.values();
                    let transposed = (0..columns as usize)
                        .flat_map(|c| (0..rows as usize).map(move |r| (r, c)))
                        .map(|(r, c)| values[r * columns as usize + c].clone())
                        .collect();

                    Variant::matrix(DataType::Double, vec![columns, rows], transposed)
                        .map(|v| vec![v])
                        .map_err(|_| StatusCode::BAD_INTERNAL_ERROR)
                },
            )
    }

    /// Registers a method whose `InputArguments` property lists `arguments`.
    pub fn with_method<F>(
        self,
        method_id: NodeId,
        arguments: Vec<ArgumentDescriptor>,
        handler: F,
    ) -> Self
    where
        F: Fn(&[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync + 'static,
    {
        let values = arguments
            .into_iter()
            .map(|argument| Scalar::ExtensionObject(ExtensionObject::Argument(argument)))
            .collect();

        let value = match Variant::array(DataType::ExtensionObject, values) {
            Ok(variant) => DataValue::new(variant),
            Err(_) => DataValue::bad(StatusCode::BAD_INTERNAL_ERROR),
        };

        self.with_property_value(method_id, value, handler)
    }

    /// Registers a method with no `InputArguments` property at all.
    pub fn with_method_without_arguments<F>(mut self, method_id: NodeId, handler: F) -> Self
    where
        F: Fn(&[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync + 'static,
    {
        self.methods.insert(
            method_id.to_string(),
            MethodNode {
                property: None,
                handler: Arc::new(handler),
                browse_status: StatusCode::GOOD,
            },
        );
        self
    }

    /// Registers a method whose `InputArguments` property reads as `value`, verbatim.
    pub fn with_property_value<F>(
        mut self,
        method_id: NodeId,
        value: DataValue,
        handler: F,
    ) -> Self
    where
        F: Fn(&[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync + 'static,
    {
        let property = NodeId::string(NAMESPACE, format!("{method_id}.InputArguments"));

        self.properties.insert(property.to_string(), value);
        self.methods.insert(
            method_id.to_string(),
            MethodNode {
                property: Some(property),
                handler: Arc::new(handler),
                browse_status: StatusCode::GOOD,
            },
        );
        self
    }

    /// Makes every browse of `method_id` answer with `status`.
    pub fn with_browse_status(mut self, method_id: &NodeId, status: StatusCode) -> Self {
        if let Some(method) = self.methods.get_mut(&method_id.to_string()) {
            method.browse_status = status;
        }
        self
    }

    /// Makes every following service call fail at the transport level.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes every following service call answer one result short.
    pub fn set_truncated(&self, truncated: bool) {
        self.truncated.store(truncated, Ordering::SeqCst);
    }

    pub fn recorded(&self) -> Recorded {
        self.lock().clone()
    }

    pub fn browse_count(&self) -> usize {
        self.lock().browse.len()
    }

    pub fn read_count(&self) -> usize {
        self.lock().read.len()
    }

    pub fn call_count(&self) -> usize {
        self.lock().call.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_available(&self) -> Result<(), DemoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DemoError::Unavailable);
        }

        Ok(())
    }

    fn respond<T>(&self, mut results: Vec<T>) -> Vec<T> {
        if self.truncated.load(Ordering::SeqCst) {
            results.pop();
        }

        results
    }

    fn browse_one(&self, description: &BrowseDescription) -> BrowseResult {
        let Some(method) = self.methods.get(&description.node_id.to_string()) else {
            return BrowseResult {
                status_code: StatusCode::BAD_NODE_ID_UNKNOWN,
                references: Vec::new(),
            };
        };

        let has_property = NodeId::numeric(0, symbols::HAS_PROPERTY);

        let references = method
            .property
            .iter()
            .filter(|_| description.reference_type_id == has_property)
            .map(|property| ReferenceDescription {
                reference_type_id: has_property.clone(),
                is_forward: true,
                node_id: property.clone().into(),
                browse_name: QualifiedName::new(0, "InputArguments"),
                node_class: NodeClass::Variable,
            })
            .collect();

        BrowseResult {
            status_code: method.browse_status,
            references,
        }
    }

    fn read_one(&self, item: &ReadValueId) -> DataValue {
        if item.attribute_id != AttributeId::Value {
            return DataValue::bad(StatusCode::BAD_ATTRIBUTE_ID_INVALID);
        }

        self.properties
            .get(&item.node_id.to_string())
            .cloned()
            .unwrap_or_else(|| DataValue::bad(StatusCode::BAD_NODE_ID_UNKNOWN))
    }

    fn call_one(&self, request: &CallMethodRequest) -> CallMethodResult {
        let Some(method) = self.methods.get(&request.method_id.to_string()) else {
            return CallMethodResult {
                status_code: StatusCode::BAD_METHOD_INVALID,
                ..Default::default()
            };
        };

        match (method.handler)(&request.input_arguments) {
            Ok(output_arguments) => CallMethodResult {
                status_code: StatusCode::GOOD,
                input_argument_results: vec![StatusCode::GOOD; request.input_arguments.len()],
                output_arguments,
            },
            Err(status_code) => CallMethodResult {
                status_code,
                ..Default::default()
            },
        }
    }
}

fn double(value: &Variant) -> Result<f64, StatusCode> {
    match value.as_scalar() {
        Some(Scalar::Double(v)) => Ok(*v),
        _ => Err(StatusCode::BAD_TYPE_MISMATCH),
    }
}

impl Session for DemoAddressSpace {
    type Error = DemoError;

    async fn browse(
        &self,
        nodes_to_browse: &[BrowseDescription],
    ) -> Result<Vec<BrowseResult>, DemoError> {
        self.ensure_available()?;
        self.lock().browse.push(nodes_to_browse.to_vec());

        // Give concurrent callers a chance to interleave with this round trip.
        tokio::task::yield_now().await;

        Ok(self.respond(nodes_to_browse.iter().map(|d| self.browse_one(d)).collect()))
    }

    async fn read(&self, nodes_to_read: &[ReadValueId]) -> Result<Vec<DataValue>, DemoError> {
        self.ensure_available()?;
        self.lock().read.push(nodes_to_read.to_vec());

        tokio::task::yield_now().await;

        Ok(self.respond(nodes_to_read.iter().map(|item| self.read_one(item)).collect()))
    }

    async fn call(
        &self,
        methods_to_call: &[CallMethodRequest],
    ) -> Result<Vec<CallMethodResult>, DemoError> {
        self.ensure_available()?;
        self.lock().call.push(methods_to_call.to_vec());

        Ok(self.respond(methods_to_call.iter().map(|r| self.call_one(r)).collect()))
    }
}
