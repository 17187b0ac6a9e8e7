//! Manifest list merge function.
//!
//! The request/response adapter around [`crate::manifest::merge`]: decodes
//! the two manifest lists out of the dynamic arguments, runs the merge, and
//! re-encodes each merged manifest as a JSON string. Heterogeneous results
//! cross the wire as a list of per-element string encodings.

use serde_json::Value;

use crate::error::FunctionError;
use crate::functions::{Arguments, Function};
use crate::manifest::{self, Manifest};
use crate::schema::{FunctionSignature, Parameter, ParameterType};

/// `merge_manifests`: deep-merge two lists of Kubernetes manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeManifests;

#[async_trait::async_trait]
impl Function for MergeManifests {
    fn name(&self) -> &'static str {
        "merge_manifests"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new("Merge two lists of Kubernetes manifests")
            .with_description(
                "Merges two lists of Kubernetes manifests. Objects are merged when \
                 apiVersion, kind, and metadata.name match.",
            )
            .with_parameter(
                Parameter::dynamic("manifests1")
                    .with_description("First list of manifest objects."),
            )
            .with_parameter(
                Parameter::dynamic("manifests2")
                    .with_description("Second list of manifest objects."),
            )
            .returns(ParameterType::list(ParameterType::String))
    }

    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError> {
        let base = decode_manifest_list(arguments.get_list(0)?, 0)?;
        let overlay = decode_manifest_list(arguments.get_list(1)?, 1)?;

        let merged = manifest::merge(&base, &overlay);

        let mut encoded = Vec::with_capacity(merged.len());
        for manifest in &merged {
            encoded.push(Value::String(serde_json::to_string(manifest)?));
        }
        Ok(Value::Array(encoded))
    }
}

/// Require every list element to be a keyed record. The merge core assumes
/// well-typed input and does not re-validate structure.
fn decode_manifest_list(values: &[Value], argument: usize) -> Result<Vec<Manifest>, FunctionError> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(FunctionError::InvalidType(
                argument,
                format!("element {} is not an object", i),
            )),
        })
        .collect()
}
