//! Typed extraction of definition entries from raw documents.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::isa::ast::END_MARKER;
use crate::isa::error::DefError;

use super::store::RawDocument;

/// Deserializes every entry of a mapping in declaration order, skipping the end marker.
pub fn entries<T: DeserializeOwned>(
    doc: &RawDocument,
    section: &str,
    map: &Map<String, Value>,
) -> Result<Vec<(String, T)>, DefError> {
    map.iter()
        .filter(|(id, _)| id.as_str() != END_MARKER)
        .map(|(id, value)| {
            let entry = T::deserialize(value).map_err(|err| {
                DefError::load(doc.name(), format!("{section} entry '{id}': {err}"))
            })?;
            Ok((id.clone(), entry))
        })
        .collect()
}

/// Returns the verbatim descriptors of a mapping in declaration order, skipping the end
/// marker.
pub fn descriptors(map: &Map<String, Value>) -> Vec<(String, Value)> {
    map.iter()
        .filter(|(id, _)| id.as_str() != END_MARKER)
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect()
}

/// Deserializes a single required record stored under `data.<key>`.
pub fn record<T: DeserializeOwned>(doc: &RawDocument, key: &str) -> Result<T, DefError> {
    let value = doc
        .value(key)
        .ok_or_else(|| DefError::load(doc.name(), format!("missing '{key}' template")))?;
    T::deserialize(value).map_err(|err| DefError::load(doc.name(), format!("'{key}': {err}")))
}

/// Reads an optional list of document names stored under `data.<key>`.
pub fn name_list(doc: &RawDocument, key: &str) -> Result<Option<Vec<String>>, DefError> {
    doc.value(key)
        .map(|value| {
            Vec::<String>::deserialize(value)
                .map_err(|err| DefError::load(doc.name(), format!("'{key}': {err}")))
        })
        .transpose()
}
