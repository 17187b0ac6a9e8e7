//! Argument validation helpers.
//!
//! This module validates decoded `serde_json::Value` arguments against a
//! [`FunctionSignature`] before a function runs, so functions can assume
//! well-typed input and validation failures carry the offending argument
//! index back to the caller.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_utilities::schema::{FunctionSignature, Parameter};
//! use hemmer_provider_utilities::validation::validate_arguments;
//! use serde_json::json;
//!
//! let signature = FunctionSignature::new("example")
//!     .with_parameter(Parameter::string("name"));
//!
//! assert!(validate_arguments(&signature, &[json!("ok")]).is_ok());
//! assert!(validate_arguments(&signature, &[json!(42)]).is_err());
//! assert!(validate_arguments(&signature, &[]).is_err());
//! ```

use crate::error::FunctionError;
use crate::schema::{FunctionSignature, Parameter, ParameterType};
use serde_json::Value;

/// Validate a decoded argument list against a signature.
///
/// Checks, in order:
/// - arity: every declared parameter must have an argument
///   ([`FunctionError::MissingArgument`]);
/// - nullability: null arguments are rejected unless the parameter allows
///   them ([`FunctionError::NullOrUnknownInput`]);
/// - shape: the argument must conform to the declared type, recursing
///   through lists, maps, and objects ([`FunctionError::InvalidType`]).
///
/// Surplus arguments beyond the declared parameters are rejected as well.
pub fn validate_arguments(
    signature: &FunctionSignature,
    arguments: &[Value],
) -> Result<(), FunctionError> {
    if arguments.len() > signature.parameters.len() {
        return Err(FunctionError::InvalidType(
            signature.parameters.len(),
            format!(
                "expected {} arguments, got {}",
                signature.parameters.len(),
                arguments.len()
            ),
        ));
    }

    for (index, parameter) in signature.parameters.iter().enumerate() {
        let value = arguments
            .get(index)
            .ok_or(FunctionError::MissingArgument(index))?;
        validate_argument(parameter, value, index)?;
    }

    Ok(())
}

/// Validate a single argument against its declared parameter.
pub fn validate_argument(
    parameter: &Parameter,
    value: &Value,
    index: usize,
) -> Result<(), FunctionError> {
    if value.is_null() {
        if parameter.allow_null_value {
            return Ok(());
        }
        return Err(FunctionError::NullOrUnknownInput(index));
    }

    check_type(&parameter.param_type, value)
        .map_err(|message| FunctionError::InvalidType(index, message))
}

fn check_type(expected: &ParameterType, value: &Value) -> Result<(), String> {
    match expected {
        ParameterType::String => match value {
            Value::String(_) => Ok(()),
            other => Err(mismatch("string", other)),
        },
        ParameterType::Number => match value {
            Value::Number(_) => Ok(()),
            other => Err(mismatch("number", other)),
        },
        ParameterType::Bool => match value {
            Value::Bool(_) => Ok(()),
            other => Err(mismatch("bool", other)),
        },
        ParameterType::List(element) => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_type(element, item)
                        .map_err(|message| format!("element {}: {}", i, message))?;
                }
                Ok(())
            }
            other => Err(mismatch("list", other)),
        },
        ParameterType::Map(element) => match value {
            Value::Object(entries) => {
                for (key, entry) in entries {
                    check_type(element, entry)
                        .map_err(|message| format!("key {:?}: {}", key, message))?;
                }
                Ok(())
            }
            other => Err(mismatch("map", other)),
        },
        ParameterType::Object(attributes) => match value {
            Value::Object(entries) => {
                for (name, attr_type) in attributes {
                    match entries.get(name) {
                        Some(entry) => check_type(attr_type, entry)
                            .map_err(|message| format!("attribute {:?}: {}", name, message))?,
                        None => return Err(format!("missing attribute {:?}", name)),
                    }
                }
                Ok(())
            }
            other => Err(mismatch("object", other)),
        },
        // Dynamic accepts anything; null was handled above.
        ParameterType::Dynamic => Ok(()),
    }
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {}, got {}", expected, value_type_name(got))
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FunctionSignature;
    use serde_json::json;

    fn two_string_params() -> FunctionSignature {
        FunctionSignature::new("test")
            .with_parameter(Parameter::string("delay"))
            .with_parameter(Parameter::string("value"))
    }

    #[test]
    fn test_valid_arguments() {
        let signature = two_string_params();
        assert!(validate_arguments(&signature, &[json!("5"), json!("v")]).is_ok());
    }

    #[test]
    fn test_missing_argument() {
        let signature = two_string_params();
        let err = validate_arguments(&signature, &[json!("5")]).unwrap_err();
        assert!(matches!(err, FunctionError::MissingArgument(1)));
    }

    #[test]
    fn test_surplus_arguments_rejected() {
        let signature = two_string_params();
        let err =
            validate_arguments(&signature, &[json!("a"), json!("b"), json!("c")]).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidType(2, _)));
    }

    #[test]
    fn test_null_rejected_unless_allowed() {
        let signature = two_string_params();
        let err = validate_arguments(&signature, &[json!(null), json!("v")]).unwrap_err();
        assert!(matches!(err, FunctionError::NullOrUnknownInput(0)));

        let signature = FunctionSignature::new("test")
            .with_parameter(Parameter::string("name").allow_null());
        assert!(validate_arguments(&signature, &[json!(null)]).is_ok());
    }

    #[test]
    fn test_wrong_scalar_type() {
        let signature = two_string_params();
        let err = validate_arguments(&signature, &[json!(5), json!("v")]).unwrap_err();
        match err {
            FunctionError::InvalidType(0, message) => {
                assert_eq!(message, "expected string, got number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_elements_checked_recursively() {
        let signature = FunctionSignature::new("test").with_parameter(Parameter::new(
            "items",
            ParameterType::list(ParameterType::Number),
        ));

        assert!(validate_arguments(&signature, &[json!([1, 2, 3])]).is_ok());

        let err = validate_arguments(&signature, &[json!([1, "two"])]).unwrap_err();
        match err {
            FunctionError::InvalidType(0, message) => {
                assert_eq!(message, "element 1: expected number, got string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_object_attributes_checked() {
        let mut attributes = std::collections::HashMap::new();
        attributes.insert("name".to_string(), ParameterType::String);
        let signature = FunctionSignature::new("test")
            .with_parameter(Parameter::new("spec", ParameterType::object(attributes)));

        assert!(validate_arguments(&signature, &[json!({"name": "x"})]).is_ok());
        assert!(validate_arguments(&signature, &[json!({})]).is_err());
        assert!(validate_arguments(&signature, &[json!({"name": 1})]).is_err());
    }

    #[test]
    fn test_dynamic_accepts_any_non_null() {
        let signature =
            FunctionSignature::new("test").with_parameter(Parameter::dynamic("anything"));

        assert!(validate_arguments(&signature, &[json!([{"a": 1}])]).is_ok());
        assert!(validate_arguments(&signature, &[json!("s")]).is_ok());
        assert!(validate_arguments(&signature, &[json!(null)]).is_err());
    }
}
