//! Hemmer Utilities Provider
//!
//! A Hemmer provider exposing five stateless utility functions over the
//! provider-function plugin protocol:
//!
//! - **`get_env`**: look up an environment variable (empty string when absent)
//! - **`get_github_owner`** / **`get_github_repo_name`**: split an
//!   `"owner/repo"` string and return one segment
//! - **`delay_value`**: wait a number of seconds, then return a value
//!   unchanged
//! - **`merge_manifests`**: deep-merge two lists of Kubernetes manifests by
//!   the (apiVersion, kind, metadata.name) triple
//!
//! The merge algorithm lives in [`manifest`] and is usable as a plain
//! library function; everything else is provider-framework plumbing around
//! it.
//!
//! # Quick Start
//!
//! ```ignore
//! use hemmer_provider_utilities::{init_logging, serve, UtilitiesProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(UtilitiesProvider::new()).await
//! }
//! ```
//!
//! # Handshake Protocol
//!
//! When the provider starts via [`serve`], it outputs a handshake string to
//! stdout:
//!
//! ```text
//! HEMMER_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `HEMMER_PROVIDER|<protocol_version>|<address>`
//!
//! This allows Hemmer to spawn the provider as a subprocess and connect via
//! gRPC.
//!
//! # Provider Protocol
//!
//! The provider implements the function plugin protocol:
//!
//! - **GetMetadata**: Returns the provider name and exposed function names
//! - **GetFunctions**: Returns full signatures for every function
//! - **CallFunction**: Invokes one function; errors are reported in-band
//! - **Stop**: Gracefully shuts down the provider

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod functions;
pub mod logging;
pub mod manifest;
pub mod provider;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

// Re-export main types at crate root
pub use error::FunctionError;
pub use functions::{Arguments, Function};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use manifest::{deep_merge, merge, Manifest, ManifestIdentity};
pub use provider::UtilitiesProvider;
pub use schema::{FunctionSignature, Parameter, ParameterType};
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION};
pub use validation::{validate_argument, validate_arguments};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tonic;
pub use tracing;
