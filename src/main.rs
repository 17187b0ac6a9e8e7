//! Binary entry point for the utilities provider.

use hemmer_provider_utilities::{init_logging, serve, UtilitiesProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!("Starting utilities provider");
    serve(UtilitiesProvider::new()).await
}
