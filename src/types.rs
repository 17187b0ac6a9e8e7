//! Convenience types for the provider surface.
//!
//! These types provide a more ergonomic API over the raw protobuf types.

use serde::{Deserialize, Serialize};

use crate::schema::{FunctionSignature, Parameter, ParameterType};

/// Provider metadata returned by GetMetadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// The provider name.
    pub name: String,
    /// List of exposed function names.
    pub functions: Vec<String>,
}

/// The protocol version for the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// The handshake prefix output by providers.
pub const HANDSHAKE_PREFIX: &str = "HEMMER_PROVIDER";

impl From<Parameter> for crate::generated::Parameter {
    fn from(parameter: Parameter) -> Self {
        Self {
            name: parameter.name,
            r#type: serde_json::to_vec(&parameter.param_type).unwrap_or_default(),
            description: parameter.description.unwrap_or_default(),
            allow_null_value: parameter.allow_null_value,
        }
    }
}

impl From<crate::generated::Parameter> for Parameter {
    fn from(proto: crate::generated::Parameter) -> Self {
        Self {
            name: proto.name,
            param_type: serde_json::from_slice(&proto.r#type).unwrap_or(ParameterType::Dynamic),
            description: if proto.description.is_empty() {
                None
            } else {
                Some(proto.description)
            },
            allow_null_value: proto.allow_null_value,
        }
    }
}

impl From<FunctionSignature> for crate::generated::FunctionSignature {
    fn from(signature: FunctionSignature) -> Self {
        Self {
            summary: signature.summary,
            description: signature.description.unwrap_or_default(),
            parameters: signature.parameters.into_iter().map(Into::into).collect(),
            return_type: serde_json::to_vec(&signature.return_type).unwrap_or_default(),
        }
    }
}

impl From<crate::generated::FunctionSignature> for FunctionSignature {
    fn from(proto: crate::generated::FunctionSignature) -> Self {
        Self {
            summary: proto.summary,
            description: if proto.description.is_empty() {
                None
            } else {
                Some(proto.description)
            },
            parameters: proto.parameters.into_iter().map(Into::into).collect(),
            return_type: serde_json::from_slice(&proto.return_type)
                .unwrap_or(ParameterType::Dynamic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_proto_round_trip() {
        let parameter = Parameter::string("name").with_description("A repository name.");

        let proto: crate::generated::Parameter = parameter.clone().into();
        assert_eq!(proto.name, "name");
        assert!(!proto.allow_null_value);

        let back: Parameter = proto.into();
        assert_eq!(back, parameter);
    }

    #[test]
    fn test_signature_proto_round_trip() {
        let signature = FunctionSignature::new("Merge manifests")
            .with_parameter(Parameter::dynamic("manifests1"))
            .with_parameter(Parameter::dynamic("manifests2"))
            .returns(ParameterType::list(ParameterType::String));

        let proto: crate::generated::FunctionSignature = signature.clone().into();
        assert_eq!(proto.parameters.len(), 2);

        let back: FunctionSignature = proto.into();
        assert_eq!(back, signature);
    }

    #[test]
    fn test_empty_description_maps_to_none() {
        let proto = crate::generated::Parameter {
            name: "value".to_string(),
            r#type: serde_json::to_vec(&ParameterType::String).unwrap(),
            description: String::new(),
            allow_null_value: false,
        };
        let parameter: Parameter = proto.into();
        assert!(parameter.description.is_none());
    }

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, 1);
        assert_eq!(HANDSHAKE_PREFIX, "HEMMER_PROVIDER");
    }
}
