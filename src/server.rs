//! Server helpers for running the provider.
//!
//! This module provides the `ProviderService` trait that providers implement,
//! and the `serve` function to start a gRPC server with the handshake
//! protocol.
//!
//! # Signal Handling
//!
//! The server automatically handles OS signals (SIGTERM, SIGINT) for graceful
//! shutdown. When a signal is received, the server:
//! 1. Stops accepting new connections
//! 2. Waits for in-flight requests to complete (with configurable timeout)
//! 3. Calls the provider's `stop()` method
//! 4. Exits cleanly

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::{debug, error, info, instrument, warn};

use crate::error::FunctionError;
use crate::functions::{build_registry, Arguments, Function};
use crate::types::{ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION};
use crate::validation::validate_arguments;

/// Trait that provider implementations must implement.
///
/// This provides a higher-level API than the raw gRPC trait, using ergonomic
/// Rust types instead of protobuf types.
///
/// # Example
///
/// ```ignore
/// use hemmer_provider_utilities::{Function, ProviderService};
/// use std::sync::Arc;
///
/// struct MyProvider;
///
/// #[async_trait::async_trait]
/// impl ProviderService for MyProvider {
///     fn name(&self) -> &'static str {
///         "my_provider"
///     }
///
///     fn functions(&self) -> Vec<Arc<dyn Function>> {
///         vec![]
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// The provider name reported by GetMetadata.
    fn name(&self) -> &'static str;

    /// The functions this provider exposes, in registration order.
    fn functions(&self) -> Vec<Arc<dyn Function>>;

    /// Return provider metadata. By default, this is derived from the
    /// function list.
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.name().to_string(),
            functions: self.functions().iter().map(|f| f.name().to_string()).collect(),
        }
    }

    /// Stop the provider gracefully.
    async fn stop(&self) -> Result<(), FunctionError> {
        Ok(())
    }
}

/// Wrapper that implements the generated gRPC trait.
struct FunctionGrpcService<P: ProviderService> {
    provider: Arc<P>,
    registry: HashMap<String, Arc<dyn Function>>,
}

impl<P: ProviderService> FunctionGrpcService<P> {
    fn new(provider: Arc<P>) -> Self {
        let registry = build_registry(provider.functions());
        Self { provider, registry }
    }

    /// Decode, validate, and run a single function call.
    ///
    /// An empty argument payload marks a value not yet determined by the
    /// caller; it is rejected before JSON decoding.
    async fn call(&self, name: &str, raw_arguments: &[Vec<u8>]) -> Result<Value, FunctionError> {
        let function = self
            .registry
            .get(name)
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))?;

        let mut values = Vec::with_capacity(raw_arguments.len());
        for (index, raw) in raw_arguments.iter().enumerate() {
            if raw.is_empty() {
                return Err(FunctionError::NullOrUnknownInput(index));
            }
            values.push(serde_json::from_slice(raw)?);
        }

        validate_arguments(&function.signature(), &values)?;
        function.call(&Arguments::new(values)).await
    }
}

#[tonic::async_trait]
impl<P: ProviderService> crate::generated::function_provider_server::FunctionProvider
    for FunctionGrpcService<P>
{
    #[instrument(skip(self, _request), name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: tonic::Request<crate::generated::GetMetadataRequest>,
    ) -> Result<tonic::Response<crate::generated::GetMetadataResponse>, tonic::Status> {
        debug!("GetMetadata called");
        let metadata = self.provider.metadata();
        info!(
            provider = %metadata.name,
            functions = metadata.functions.len(),
            "GetMetadata completed"
        );
        Ok(tonic::Response::new(
            crate::generated::GetMetadataResponse {
                provider_name: metadata.name,
                protocol_version: PROTOCOL_VERSION,
                functions: metadata.functions,
            },
        ))
    }

    #[instrument(skip(self, _request), name = "grpc.get_functions")]
    async fn get_functions(
        &self,
        _request: tonic::Request<crate::generated::GetFunctionsRequest>,
    ) -> Result<tonic::Response<crate::generated::GetFunctionsResponse>, tonic::Status> {
        debug!("GetFunctions called");
        let functions: HashMap<String, crate::generated::FunctionSignature> = self
            .registry
            .iter()
            .map(|(name, function)| (name.clone(), function.signature().into()))
            .collect();
        info!(functions = functions.len(), "GetFunctions completed");
        Ok(tonic::Response::new(
            crate::generated::GetFunctionsResponse { functions },
        ))
    }

    #[instrument(skip(self, request), name = "grpc.call_function")]
    async fn call_function(
        &self,
        request: tonic::Request<crate::generated::CallFunctionRequest>,
    ) -> Result<tonic::Response<crate::generated::CallFunctionResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(function = %req.name, arguments = req.arguments.len(), "CallFunction called");

        let response = match self.call(&req.name, &req.arguments).await {
            Ok(result) => match serde_json::to_vec(&result) {
                Ok(encoded) => {
                    info!(function = %req.name, "CallFunction completed successfully");
                    crate::generated::CallFunctionResponse {
                        result: encoded,
                        error: None,
                    }
                }
                Err(err) => {
                    let err = FunctionError::from(err);
                    error!(function = %req.name, error = %err, "CallFunction result encoding failed");
                    crate::generated::CallFunctionResponse {
                        result: vec![],
                        error: Some(err.into()),
                    }
                }
            },
            Err(err) => {
                error!(function = %req.name, error = %err, "CallFunction failed");
                crate::generated::CallFunctionResponse {
                    result: vec![],
                    error: Some(err.into()),
                }
            }
        };

        Ok(tonic::Response::new(response))
    }

    #[instrument(skip(self, _request), name = "grpc.stop")]
    async fn stop(
        &self,
        _request: tonic::Request<crate::generated::StopRequest>,
    ) -> Result<tonic::Response<crate::generated::StopResponse>, tonic::Status> {
        info!("Stop called");
        match self.provider.stop().await {
            Ok(()) => {
                info!("Stop completed successfully");
                Ok(tonic::Response::new(crate::generated::StopResponse {
                    error: String::new(),
                }))
            }
            Err(e) => {
                error!(error = %e, "Stop failed");
                Ok(tonic::Response::new(crate::generated::StopResponse {
                    error: e.to_string(),
                }))
            }
        }
    }
}

/// Options for configuring the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Timeout for graceful shutdown. After receiving a shutdown signal,
    /// the server will wait this long for in-flight requests to complete.
    /// Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Create new serve options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// On Unix, this waits for SIGTERM or SIGINT.
/// On Windows, this waits for CTRL+C.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM, initiating graceful shutdown...");
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT, initiating graceful shutdown...");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
        eprintln!("Received CTRL+C, initiating graceful shutdown...");
    }

    #[cfg(not(any(unix, windows)))]
    {
        // Fallback: just wait forever (no signal handling)
        std::future::pending::<()>().await;
    }
}

/// Serve a provider implementation as a gRPC server.
///
/// This function:
/// 1. Finds an available port
/// 2. Starts the gRPC server
/// 3. Outputs the handshake string to stdout
/// 4. Handles shutdown signals (SIGTERM/SIGINT) gracefully
///
/// The handshake format is: `HEMMER_PROVIDER|<version>|<address>`
///
/// For custom configuration, use [`serve_with_options`].
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// Serve a provider with custom options.
///
/// See [`serve`] for details. This function allows configuring
/// shutdown behavior via [`ServeOptions`].
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    // Find an available port by binding to port 0
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    serve_on_listener(provider, listener, addr, options).await
}

/// Serve a provider on a specific address.
///
/// Unlike [`serve`], this function binds to the specified address rather than
/// finding an available port.
pub async fn serve_on<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    serve_on_with_options(provider, addr, ServeOptions::default()).await
}

/// Serve a provider on a specific address with custom options.
pub async fn serve_on_with_options<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    serve_on_listener(provider, listener, actual_addr, options).await
}

/// Internal function to serve on an already-bound listener.
async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    // Output the handshake
    println!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr);

    info!(address = %addr, "Provider server starting");

    // Share the provider between the gRPC service and the shutdown handler
    let provider = Arc::new(provider);
    let provider_for_shutdown = Arc::clone(&provider);

    // Create the gRPC service
    let grpc_service = FunctionGrpcService::new(provider);
    let server =
        crate::generated::function_provider_server::FunctionProviderServer::new(grpc_service);

    // Run the server with graceful shutdown
    // The shutdown_timeout limits how long we wait for in-flight requests to complete
    let server_future = Server::builder()
        .add_service(server)
        .serve_with_incoming_shutdown(
            tokio_stream::wrappers::TcpListenerStream::new(listener),
            async {
                wait_for_shutdown_signal().await;
            },
        );

    // Apply shutdown timeout - if the server doesn't shut down in time, we proceed anyway
    let shutdown_result = tokio::time::timeout(options.shutdown_timeout, server_future).await;

    match shutdown_result {
        Ok(Ok(())) => {
            info!("Server shutdown complete");
        }
        Ok(Err(e)) => {
            error!(error = %e, "Server error during shutdown");
            return Err(e.into());
        }
        Err(_) => {
            warn!(
                timeout = ?options.shutdown_timeout,
                "Shutdown timeout exceeded, forcing shutdown"
            );
        }
    }

    // Call the provider's stop() method
    debug!("Calling provider stop()");
    if let Err(e) = provider_for_shutdown.stop().await {
        warn!(error = %e, "Provider stop() returned error");
    }

    info!("Provider shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::UtilitiesProvider;
    use serde_json::json;

    fn service() -> FunctionGrpcService<UtilitiesProvider> {
        FunctionGrpcService::new(Arc::new(UtilitiesProvider::new()))
    }

    fn encode(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[tokio::test]
    async fn test_call_decodes_and_dispatches() {
        let result = service()
            .call("get_github_owner", &[encode(json!("owner/repo"))])
            .await
            .unwrap();
        assert_eq!(result, json!("owner"));
    }

    #[tokio::test]
    async fn test_call_unknown_function() {
        let err = service().call("nope", &[]).await.unwrap_err();
        assert!(matches!(err, FunctionError::UnknownFunction(_)));
    }

    #[tokio::test]
    async fn test_call_rejects_unknown_payload() {
        // An empty payload marks a value not yet determined by the caller.
        let err = service()
            .call("get_env", &[Vec::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::NullOrUnknownInput(0)));
    }

    #[tokio::test]
    async fn test_call_rejects_null_argument() {
        let err = service()
            .call("get_env", &[encode(json!(null))])
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::NullOrUnknownInput(0)));
    }

    #[tokio::test]
    async fn test_call_rejects_missing_arguments() {
        let err = service().call("delay_value", &[]).await.unwrap_err();
        assert!(matches!(err, FunctionError::MissingArgument(0)));
    }

    #[tokio::test]
    async fn test_call_rejects_undecodable_payload() {
        let err = service()
            .call("get_env", &[b"{not json".to_vec()])
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_call_merge_manifests_end_to_end() {
        let result = service()
            .call(
                "merge_manifests",
                &[
                    encode(json!([{
                        "apiVersion": "v1",
                        "kind": "Pod",
                        "metadata": { "name": "a" },
                        "spec": { "x": 1 },
                    }])),
                    encode(json!([{
                        "apiVersion": "v1",
                        "kind": "Pod",
                        "metadata": { "name": "a" },
                        "spec": { "y": 2 },
                    }])),
                ],
            )
            .await
            .unwrap();

        let items = result.as_array().unwrap();
        assert_eq!(items.len(), 1);
        let merged: Value = serde_json::from_str(items[0].as_str().unwrap()).unwrap();
        assert_eq!(merged["spec"], json!({ "x": 1, "y": 2 }));
    }

    #[test]
    fn test_metadata_lists_functions_in_registration_order() {
        let metadata = UtilitiesProvider::new().metadata();
        assert_eq!(metadata.name, "utilities");
        assert_eq!(metadata.functions.len(), 5);
        assert_eq!(metadata.functions[0], "get_env");
        assert_eq!(metadata.functions[4], "merge_manifests");
    }
}
