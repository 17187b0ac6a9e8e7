//! Testing utilities for provider implementations.
//!
//! This module provides utilities to test [`ProviderService`] implementations
//! without spinning up a full gRPC server.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_utilities::testing::FunctionTester;
//! use hemmer_provider_utilities::UtilitiesProvider;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let tester = FunctionTester::new(UtilitiesProvider::new());
//!
//! let owner = tester
//!     .call("get_github_owner", vec![json!("acme/widgets")])
//!     .await
//!     .unwrap();
//! assert_eq!(owner, json!("acme"));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FunctionError;
use crate::functions::{build_registry, Arguments, Function};
use crate::schema::FunctionSignature;
use crate::server::ProviderService;
use crate::validation::validate_arguments;

/// A test harness for provider implementations.
///
/// This wraps a [`ProviderService`] implementation and runs function calls
/// through the same validation path as the gRPC server, minus the wire
/// encoding.
pub struct FunctionTester<P: ProviderService> {
    provider: P,
    registry: HashMap<String, Arc<dyn Function>>,
}

impl<P: ProviderService> FunctionTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        let registry = build_registry(provider.functions());
        Self { provider, registry }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The names of the registered functions, sorted.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.registry.keys().cloned().collect();
        names.sort();
        names
    }

    /// The signature of a registered function, if present.
    pub fn signature(&self, name: &str) -> Option<FunctionSignature> {
        self.registry.get(name).map(|f| f.signature())
    }

    /// Validate and run a function call.
    pub async fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value, FunctionError> {
        let function = self
            .registry
            .get(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))?;

        validate_arguments(&function.signature(), &arguments)?;
        function.call(&Arguments::new(arguments)).await
    }

    /// Stop the provider.
    pub async fn stop(&self) -> Result<(), FunctionError> {
        self.provider.stop().await
    }
}
