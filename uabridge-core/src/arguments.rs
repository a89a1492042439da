//! # Argument Type Cache
//!
//! Methods declare their formal input parameters in an `InputArguments` property: a variable
//! holding an array of `Argument` structures. Building typed variants out of JSON needs those
//! definitions, so they are fetched from the server once per method and kept for the lifetime of
//! the process.
//!
//! ## How it works
//!
//! 1. The requested method ids are split into cached and uncached ones.
//! 2. The uncached ids (deduplicated) are resolved with a single batched remote fetch:
//!    - **Browse**: the forward `HasProperty` references of every method, restricted to variables.
//!    - **Read**: the `Value` attribute of every `InputArguments` property found, in one round
//!      trip. Methods without the property resolve to an empty list.
//! 3. Fetched lists are inserted keyed by the canonical NodeId string and the answer is assembled
//!    in request order.
//!
//! Entries are never mutated or evicted. Two overlapping fetches for the same method insert the
//! same definitions, so the second insert is a no-op in effect.
use crate::BoxError;
use crate::session::{
    AttributeId, BrowseDescription, BrowseDirection, DataValue, NodeClass, ReadValueId, Session,
    result_mask,
};
use crate::types::{
    ArgumentDescriptor, ArrayType, ExtensionObject, NodeId, Scalar, StatusCode, Variant, symbols,
};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Browse name of the property holding a method's input argument definitions.
const INPUT_ARGUMENTS: &str = "InputArguments";

#[derive(Debug, thiserror::Error)]
pub enum ArgumentTypeError {
    #[error("Failed to browse the properties of method '{method_id}': {status}")]
    RemoteBrowseError {
        method_id: NodeId,
        status: StatusCode,
    },

    #[error("Failed to read the input arguments of method '{method_id}': {status}")]
    RemoteReadError {
        method_id: NodeId,
        status: StatusCode,
    },

    #[error("The input arguments of method '{0}' are not a list of Argument structures")]
    InvalidArgumentsValue(NodeId),

    #[error("Session returned {actual} results for {expected} requests")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("Session request failed: '{0}'")]
    Session(#[source] BoxError),
}

/// A concurrent, append-only map from method id to its ordered input argument definitions.
#[derive(Debug, Default)]
pub struct ArgumentTypeCache {
    entries: DashMap<String, Arc<[ArgumentDescriptor]>>,
}

impl ArgumentTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the input argument definitions of every method in `method_ids`, in the same order.
    ///
    /// Only the ids missing from the cache are fetched, all of them in a single batch.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Arc<[ArgumentDescriptor]>>)` - One list per requested id. A method without an
    ///   `InputArguments` property has an empty list.
    /// * `Err(ArgumentTypeError)` - If the session fails or reports a bad status for any method.
    ///   Nothing from a failed batch is cached.
    pub async fn get_descriptors<S: Session>(
        &self,
        session: &S,
        method_ids: &[NodeId],
    ) -> Result<Vec<Arc<[ArgumentDescriptor]>>, ArgumentTypeError> {
        let mut resolved = HashMap::with_capacity(method_ids.len());
        let mut uncached = Vec::new();

        for id in method_ids {
            let key = id.to_string();

            if resolved.contains_key(&key) {
                continue;
            }

            match self.cached(id) {
                Some(descriptors) => {
                    resolved.insert(key, descriptors);
                }
                None if uncached.contains(id) => {}
                None => uncached.push(id.clone()),
            }
        }

        tracing::debug!(
            requested = method_ids.len(),
            misses = uncached.len(),
            "Resolving input argument definitions"
        );

        if !uncached.is_empty() {
            let lists = fetch(session, &uncached).await?;

            for (method_id, descriptors) in uncached.iter().zip(lists) {
                let key = method_id.to_string();
                let descriptors: Arc<[ArgumentDescriptor]> = descriptors.into();

                self.entries.insert(key.clone(), Arc::clone(&descriptors));
                resolved.insert(key, descriptors);
            }
        }

        // `fetch` answers every uncached id or fails, so each requested key is resolved here.
        Ok(method_ids
            .iter()
            .map(|id| Arc::clone(&resolved[&id.to_string()]))
            .collect())
    }

    /// Returns the cached definitions of `method_id` without contacting the server.
    pub fn cached(&self, method_id: &NodeId) -> Option<Arc<[ArgumentDescriptor]>> {
        self.entries
            .get(&method_id.to_string())
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetches the definitions of every method in `method_ids`, one list per id in the same order.
async fn fetch<S: Session>(
    session: &S,
    method_ids: &[NodeId],
) -> Result<Vec<Vec<ArgumentDescriptor>>, ArgumentTypeError> {
    let has_property = NodeId::numeric(0, symbols::HAS_PROPERTY);

    let nodes_to_browse: Vec<BrowseDescription> = method_ids
        .iter()
        .map(|method_id| BrowseDescription {
            node_id: method_id.clone(),
            browse_direction: BrowseDirection::Forward,
            reference_type_id: has_property.clone(),
            include_subtypes: true,
            node_class_mask: NodeClass::Variable.mask(),
            result_mask: result_mask::BROWSE_NAME,
        })
        .collect();

    let browse_results = session
        .browse(&nodes_to_browse)
        .await
        .map_err(|e| ArgumentTypeError::Session(e.into()))?;

    ensure_count(nodes_to_browse.len(), browse_results.len())?;

    // (position in `method_ids`, property node)
    let mut properties = Vec::new();

    for (index, (method_id, result)) in method_ids.iter().zip(browse_results).enumerate() {
        if !result.status_code.is_good() {
            tracing::warn!(%method_id, status = %result.status_code, "Browse failed");

            return Err(ArgumentTypeError::RemoteBrowseError {
                method_id: method_id.clone(),
                status: result.status_code,
            });
        }

        let property = result
            .references
            .into_iter()
            .filter(|reference| {
                reference.browse_name.namespace_index == 0
                    && reference.browse_name.name == INPUT_ARGUMENTS
            })
            .find_map(|reference| reference.node_id.into_local());

        if let Some(property) = property {
            properties.push((index, property));
        }
    }

    let mut lists = vec![Vec::new(); method_ids.len()];

    if properties.is_empty() {
        tracing::debug!("No method declares input arguments, skipping read");
        return Ok(lists);
    }

    let nodes_to_read: Vec<ReadValueId> = properties
        .iter()
        .map(|(_, node_id)| ReadValueId {
            node_id: node_id.clone(),
            attribute_id: AttributeId::Value,
        })
        .collect();

    tracing::debug!(count = nodes_to_read.len(), "Reading input argument properties");

    let values = session
        .read(&nodes_to_read)
        .await
        .map_err(|e| ArgumentTypeError::Session(e.into()))?;

    ensure_count(nodes_to_read.len(), values.len())?;

    for ((index, _), data_value) in properties.into_iter().zip(values) {
        let method_id = &method_ids[index];

        lists[index] = descriptors_of(method_id, data_value)?;
    }

    Ok(lists)
}

fn ensure_count(expected: usize, actual: usize) -> Result<(), ArgumentTypeError> {
    if expected != actual {
        return Err(ArgumentTypeError::ResultCountMismatch { expected, actual });
    }

    Ok(())
}

/// Extracts the `Argument` structures out of the value of an `InputArguments` property.
fn descriptors_of(
    method_id: &NodeId,
    data_value: DataValue,
) -> Result<Vec<ArgumentDescriptor>, ArgumentTypeError> {
    if !data_value.status_code.is_good() {
        tracing::warn!(%method_id, status = %data_value.status_code, "Read failed");

        return Err(ArgumentTypeError::RemoteReadError {
            method_id: method_id.clone(),
            status: data_value.status_code,
        });
    }

    let Some(variant) = data_value.value else {
        return Ok(Vec::new());
    };

    arguments_in(variant).ok_or_else(|| ArgumentTypeError::InvalidArgumentsValue(method_id.clone()))
}

fn arguments_in(variant: Variant) -> Option<Vec<ArgumentDescriptor>> {
    if variant.array_type() == ArrayType::Matrix {
        return None;
    }

    variant
        .values()
        .iter()
        .map(|value| match value {
            Scalar::ExtensionObject(ExtensionObject::Argument(argument)) => Some(argument.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, ValueRank};

    fn argument(name: &str) -> Scalar {
        Scalar::ExtensionObject(ExtensionObject::Argument(ArgumentDescriptor::new(
            name,
            DataType::Double,
            ValueRank::SCALAR,
        )))
    }

    #[test]
    fn arguments_are_taken_from_arrays_and_scalars() {
        let array = Variant::array(DataType::ExtensionObject, vec![argument("a"), argument("b")])
            .unwrap();
        let names: Vec<_> = arguments_in(array)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["a", "b"]);

        let scalar = Variant::scalar(match argument("c") {
            Scalar::ExtensionObject(object) => object,
            _ => unreachable!(),
        });
        assert_eq!(arguments_in(scalar).unwrap().len(), 1);

        assert_eq!(arguments_in(Variant::empty()), Some(Vec::new()));
    }

    #[test]
    fn other_values_are_rejected() {
        assert_eq!(arguments_in(Variant::scalar(1.5f64)), None);

        let encoded = Variant::scalar(ExtensionObject::Encoded {
            type_id: NodeId::numeric(2, 1),
            body: Vec::new(),
        });
        assert_eq!(arguments_in(encoded), None);
    }

    #[test]
    fn bad_read_status_names_the_method() {
        let method_id = NodeId::numeric(1, 5040);

        let err = descriptors_of(&method_id, DataValue::bad(StatusCode::BAD_NOT_READABLE))
            .unwrap_err();

        assert!(matches!(
            err,
            ArgumentTypeError::RemoteReadError { method_id: ref id, .. } if *id == method_id
        ));
    }

    #[test]
    fn null_value_is_an_empty_list() {
        let descriptors = descriptors_of(&NodeId::numeric(1, 1), DataValue::default()).unwrap();
        assert!(descriptors.is_empty());
    }
}
