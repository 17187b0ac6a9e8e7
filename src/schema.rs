//! Signature types describing provider functions.
//!
//! Signatures describe the parameters and return type of each function the
//! provider exposes. They enable argument validation, documentation
//! generation, and the `GetFunctions` protocol response.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The type of a function parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// A string value.
    String,
    /// A 64-bit number (integer or float).
    Number,
    /// A boolean value.
    Bool,
    /// A list of values of a single type.
    List(Box<ParameterType>),
    /// A map from string keys to values of a single type.
    Map(Box<ParameterType>),
    /// An object with a fixed set of attributes.
    Object(HashMap<String, ParameterType>),
    /// A dynamic type that can hold any value (use sparingly).
    Dynamic,
}

impl ParameterType {
    /// Create a list type.
    pub fn list(element_type: ParameterType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create a map type.
    pub fn map(element_type: ParameterType) -> Self {
        Self::Map(Box::new(element_type))
    }

    /// Create an object type.
    pub fn object(attributes: HashMap<String, ParameterType>) -> Self {
        Self::Object(attributes)
    }
}

/// Describes a single positional parameter of a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name (documentation only; arguments are positional).
    pub name: String,
    /// The type of the parameter.
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Human-readable description of the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a null argument is accepted for this parameter.
    #[serde(default)]
    pub allow_null_value: bool,
}

impl Parameter {
    /// Create a new parameter with the given name and type.
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: None,
            allow_null_value: false,
        }
    }

    /// Create a string parameter.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::String)
    }

    /// Create a dynamic parameter.
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Dynamic)
    }

    /// Set the description for this parameter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Accept null arguments for this parameter.
    pub fn allow_null(mut self) -> Self {
        self.allow_null_value = true;
        self
    }
}

/// The full signature of a provider function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// A short summary of what the function does.
    pub summary: String,
    /// A longer description of the function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The positional parameters, in order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// The type of the return value.
    pub return_type: ParameterType,
}

impl FunctionSignature {
    /// Create a new signature with the given summary, no parameters, and a
    /// string return type.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: None,
            parameters: Vec::new(),
            return_type: ParameterType::String,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a positional parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the return type.
    pub fn returns(mut self, return_type: ParameterType) -> Self {
        self.return_type = return_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_constructors() {
        let list = ParameterType::list(ParameterType::String);
        assert!(matches!(list, ParameterType::List(_)));

        let map = ParameterType::map(ParameterType::Number);
        assert!(matches!(map, ParameterType::Map(_)));
    }

    #[test]
    fn test_parameter_builders() {
        let param = Parameter::string("name")
            .with_description("The name of an environment variable.")
            .allow_null();

        assert_eq!(param.name, "name");
        assert_eq!(param.param_type, ParameterType::String);
        assert_eq!(
            param.description,
            Some("The name of an environment variable.".to_string())
        );
        assert!(param.allow_null_value);
    }

    #[test]
    fn test_signature_builder() {
        let signature = FunctionSignature::new("Merge two lists of manifests")
            .with_description("Objects merge when apiVersion, kind and metadata.name match.")
            .with_parameter(Parameter::dynamic("manifests1"))
            .with_parameter(Parameter::dynamic("manifests2"))
            .returns(ParameterType::list(ParameterType::String));

        assert_eq!(signature.parameters.len(), 2);
        assert_eq!(signature.parameters[0].name, "manifests1");
        assert_eq!(
            signature.return_type,
            ParameterType::List(Box::new(ParameterType::String))
        );
    }

    #[test]
    fn test_parameter_type_serialization() {
        let ty = ParameterType::list(ParameterType::Dynamic);
        let json = serde_json::to_string(&ty).unwrap();
        let back: ParameterType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}
