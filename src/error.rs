//! Error types for provider functions.

use thiserror::Error;

/// Errors that can occur when decoding arguments for or running a provider
/// function.
///
/// The merge core itself is total; every error here originates at the
/// request/response boundary or inside one of the simple utility functions.
/// All errors are terminal for the single invocation: there is no partial
/// result and no retry.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The requested function is not exposed by this provider.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A required argument was absent from the call.
    #[error("Missing required argument at position {0}")]
    MissingArgument(usize),

    /// An argument was present but not of the declared type.
    #[error("Invalid type for argument {0}: {1}")]
    InvalidType(usize, String),

    /// An argument was null or not yet determined at evaluation time.
    /// Such values must be rejected rather than guessed at.
    #[error("Argument {0} cannot be null or unknown")]
    NullOrUnknownInput(usize),

    /// A well-typed argument was rejected by the function itself.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An argument or result could not be (de)serialized.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

impl FunctionError {
    /// The index of the offending argument, when the error is
    /// argument-specific.
    pub fn argument(&self) -> Option<i64> {
        match self {
            Self::MissingArgument(index)
            | Self::InvalidType(index, _)
            | Self::NullOrUnknownInput(index) => Some(*index as i64),
            _ => None,
        }
    }
}

impl From<FunctionError> for crate::generated::FunctionError {
    fn from(err: FunctionError) -> Self {
        Self {
            function_argument: err.argument(),
            text: err.to_string(),
        }
    }
}

impl From<FunctionError> for tonic::Status {
    fn from(err: FunctionError) -> Self {
        match err {
            FunctionError::UnknownFunction(msg) => tonic::Status::not_found(msg),
            FunctionError::MissingArgument(_)
            | FunctionError::InvalidType(_, _)
            | FunctionError::NullOrUnknownInput(_)
            | FunctionError::InvalidArgument(_) => {
                tonic::Status::invalid_argument(err.to_string())
            }
            FunctionError::Encoding(err) => {
                tonic::Status::invalid_argument(format!("Encoding error: {}", err))
            }
            FunctionError::Transport(err) => {
                tonic::Status::unavailable(format!("Transport error: {}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FunctionError::UnknownFunction("frobnicate".to_string());
        assert_eq!(format!("{}", err), "Unknown function: frobnicate");

        let err = FunctionError::MissingArgument(1);
        assert_eq!(
            format!("{}", err),
            "Missing required argument at position 1"
        );

        let err = FunctionError::InvalidType(0, "expected string, got number".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid type for argument 0: expected string, got number"
        );

        let err = FunctionError::NullOrUnknownInput(2);
        assert_eq!(format!("{}", err), "Argument 2 cannot be null or unknown");
    }

    #[test]
    fn test_argument_index() {
        assert_eq!(FunctionError::MissingArgument(3).argument(), Some(3));
        assert_eq!(
            FunctionError::InvalidType(1, "bad".to_string()).argument(),
            Some(1)
        );
        assert_eq!(FunctionError::NullOrUnknownInput(0).argument(), Some(0));
        assert_eq!(
            FunctionError::InvalidArgument("bad".to_string()).argument(),
            None
        );
        assert_eq!(
            FunctionError::UnknownFunction("f".to_string()).argument(),
            None
        );
    }

    #[test]
    fn test_error_to_proto() {
        let proto: crate::generated::FunctionError = FunctionError::NullOrUnknownInput(1).into();
        assert_eq!(proto.text, "Argument 1 cannot be null or unknown");
        assert_eq!(proto.function_argument, Some(1));

        let proto: crate::generated::FunctionError =
            FunctionError::InvalidArgument("bad delay".to_string()).into();
        assert_eq!(proto.text, "Invalid argument: bad delay");
        assert_eq!(proto.function_argument, None);
    }

    #[test]
    fn test_error_to_status() {
        let err = FunctionError::UnknownFunction("f".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let err = FunctionError::MissingArgument(0);
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let err = FunctionError::InvalidArgument("bad".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
