//! GitHub repository name parsing.
//!
//! Both functions split an `"owner/repo"` string on `/` and pick one
//! segment; anything that does not split into exactly two segments is
//! rejected.

use serde_json::Value;

use crate::error::FunctionError;
use crate::functions::{Arguments, Function};
use crate::schema::{FunctionSignature, Parameter};

fn split_repository(name: &str) -> Result<(&str, &str), FunctionError> {
    let mut segments = name.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(repo), None) => Ok((owner, repo)),
        _ => Err(FunctionError::InvalidArgument(
            "invalid repository name, expected format is owner/repo".to_string(),
        )),
    }
}

fn repository_parameter() -> Parameter {
    Parameter::string("name").with_description("The name of a repository.")
}

/// `get_github_owner`: the owner segment of an `"owner/repo"` string.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetGithubOwner;

#[async_trait::async_trait]
impl Function for GetGithubOwner {
    fn name(&self) -> &'static str {
        "get_github_owner"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new("Get repository owner")
            .with_description("Get the repository owner.")
            .with_parameter(repository_parameter())
    }

    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError> {
        let (owner, _) = split_repository(arguments.get_string(0)?)?;
        Ok(Value::String(owner.to_string()))
    }
}

/// `get_github_repo_name`: the repository segment of an `"owner/repo"`
/// string.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetGithubRepoName;

#[async_trait::async_trait]
impl Function for GetGithubRepoName {
    fn name(&self) -> &'static str {
        "get_github_repo_name"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new("Get repository name")
            .with_description("Get the repository name.")
            .with_parameter(repository_parameter())
    }

    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError> {
        let (_, repo) = split_repository(arguments.get_string(0)?)?;
        Ok(Value::String(repo.to_string()))
    }
}
