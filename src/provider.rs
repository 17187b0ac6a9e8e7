//! The utilities provider.

use std::sync::Arc;

use crate::error::FunctionError;
use crate::functions::{
    DelayValue, Function, GetEnvironmentVariable, GetGithubOwner, GetGithubRepoName,
    MergeManifests,
};
use crate::server::ProviderService;

/// Provider exposing the stateless utility functions.
///
/// Carries no configuration and no state; every function is a pure (or
/// time-only) operation over its arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct UtilitiesProvider;

impl UtilitiesProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ProviderService for UtilitiesProvider {
    fn name(&self) -> &'static str {
        "utilities"
    }

    fn functions(&self) -> Vec<Arc<dyn Function>> {
        vec![
            Arc::new(GetEnvironmentVariable),
            Arc::new(GetGithubOwner),
            Arc::new(GetGithubRepoName),
            Arc::new(DelayValue),
            Arc::new(MergeManifests),
        ]
    }

    async fn stop(&self) -> Result<(), FunctionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_all_five_functions() {
        let names: Vec<_> = UtilitiesProvider::new()
            .functions()
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(
            names,
            [
                "get_env",
                "get_github_owner",
                "get_github_repo_name",
                "delay_value",
                "merge_manifests",
            ]
        );
    }

    #[test]
    fn test_every_function_declares_a_signature() {
        for function in UtilitiesProvider::new().functions() {
            let signature = function.signature();
            assert!(!signature.summary.is_empty(), "{}", function.name());
            assert!(!signature.parameters.is_empty(), "{}", function.name());
        }
    }
}
