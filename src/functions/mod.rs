//! Provider-defined functions.
//!
//! Each function is a stateless unit implementing [`Function`]: a name, a
//! [`FunctionSignature`](crate::schema::FunctionSignature), and an async
//! `call`. Arguments arrive already decoded from the wire as positional
//! [`serde_json::Value`]s; the [`Arguments`] wrapper provides typed getters
//! producing the adapter error taxonomy.

pub mod delay;
pub mod get_env;
pub mod github;
pub mod merge_manifests;

pub use delay::DelayValue;
pub use get_env::GetEnvironmentVariable;
pub use github::{GetGithubOwner, GetGithubRepoName};
pub use merge_manifests::MergeManifests;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::FunctionError;
use crate::schema::FunctionSignature;

/// A single provider-defined function.
#[async_trait::async_trait]
pub trait Function: Send + Sync + 'static {
    /// The function name as exposed to callers.
    fn name(&self) -> &'static str;

    /// The function's signature (parameters and return type).
    fn signature(&self) -> FunctionSignature;

    /// Run the function against decoded, validated arguments.
    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError>;
}

/// Positional arguments for a single function call.
///
/// Getters return the adapter errors of the protocol: an absent position is
/// [`FunctionError::MissingArgument`], a null value is
/// [`FunctionError::NullOrUnknownInput`], and a present non-null value of the
/// wrong shape is [`FunctionError::InvalidType`].
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Wrap a decoded argument list.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments supplied.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the raw value at `index`, rejecting absent and null values.
    pub fn get(&self, index: usize) -> Result<&Value, FunctionError> {
        let value = self
            .values
            .get(index)
            .ok_or(FunctionError::MissingArgument(index))?;
        if value.is_null() {
            return Err(FunctionError::NullOrUnknownInput(index));
        }
        Ok(value)
    }

    /// Get the string at `index`.
    pub fn get_string(&self, index: usize) -> Result<&str, FunctionError> {
        let value = self.get(index)?;
        value.as_str().ok_or_else(|| {
            FunctionError::InvalidType(index, mismatch("string", value))
        })
    }

    /// Get the list at `index`.
    pub fn get_list(&self, index: usize) -> Result<&[Value], FunctionError> {
        let value = self.get(index)?;
        match value {
            Value::Array(items) => Ok(items),
            other => Err(FunctionError::InvalidType(index, mismatch("list", other))),
        }
    }
}

fn mismatch(expected: &str, got: &Value) -> String {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    };
    format!("expected {}, got {}", expected, got)
}

/// Build a name-keyed registry from a function list.
///
/// A duplicated name keeps the later registration and logs a warning.
pub(crate) fn build_registry(
    functions: Vec<Arc<dyn Function>>,
) -> HashMap<String, Arc<dyn Function>> {
    let mut registry = HashMap::with_capacity(functions.len());
    for function in functions {
        let name = function.name().to_string();
        if registry.insert(name.clone(), function).is_some() {
            warn!(function = %name, "Duplicate function registration, keeping the later one");
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_rejects_absent_and_null() {
        let arguments = Arguments::new(vec![json!("ok"), json!(null)]);

        assert!(arguments.get(0).is_ok());
        assert!(matches!(
            arguments.get(1),
            Err(FunctionError::NullOrUnknownInput(1))
        ));
        assert!(matches!(
            arguments.get(2),
            Err(FunctionError::MissingArgument(2))
        ));
    }

    #[test]
    fn test_typed_getters() {
        let arguments = Arguments::new(vec![json!("text"), json!([1, 2]), json!(7)]);

        assert_eq!(arguments.get_string(0).unwrap(), "text");
        assert_eq!(arguments.get_list(1).unwrap().len(), 2);

        match arguments.get_string(2) {
            Err(FunctionError::InvalidType(2, message)) => {
                assert_eq!(message, "expected string, got number");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            arguments.get_list(0),
            Err(FunctionError::InvalidType(0, _))
        ));
    }

    #[test]
    fn test_registry_keeps_later_duplicate() {
        let functions: Vec<Arc<dyn Function>> = vec![
            Arc::new(GetEnvironmentVariable),
            Arc::new(GetEnvironmentVariable),
        ];
        let registry = build_registry(functions);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains_key("get_env"));
    }
}
