//! Environment variable lookup.

use serde_json::Value;

use crate::error::FunctionError;
use crate::functions::{Arguments, Function};
use crate::schema::{FunctionSignature, Parameter};

/// `get_env`: return the value of an environment variable by name.
///
/// Absent and non-UTF-8 variables both yield the empty string; the lookup
/// itself never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetEnvironmentVariable;

#[async_trait::async_trait]
impl Function for GetEnvironmentVariable {
    fn name(&self) -> &'static str {
        "get_env"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new(
            "Return the value of an environment variable given the variable name.",
        )
        .with_description("Get the value of an environment variable.")
        .with_parameter(
            Parameter::string("name").with_description("The name of an environment variable."),
        )
    }

    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError> {
        let name = arguments.get_string(0)?;
        let value = std::env::var(name).unwrap_or_default();
        Ok(Value::String(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_returns_variable_value() {
        std::env::set_var("HEMMER_UTILITIES_TEST_VAR", "hello");
        let result = GetEnvironmentVariable
            .call(&Arguments::new(vec![json!("HEMMER_UTILITIES_TEST_VAR")]))
            .await
            .unwrap();
        assert_eq!(result, json!("hello"));
    }

    #[tokio::test]
    async fn test_missing_variable_is_empty_string() {
        let result = GetEnvironmentVariable
            .call(&Arguments::new(vec![json!(
                "HEMMER_UTILITIES_DOES_NOT_EXIST"
            )]))
            .await
            .unwrap();
        assert_eq!(result, json!(""));
    }

    #[tokio::test]
    async fn test_non_string_argument_rejected() {
        let err = GetEnvironmentVariable
            .call(&Arguments::new(vec![json!(42)]))
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidType(0, _)));
    }
}
