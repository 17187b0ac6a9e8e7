//! Timed pass-through.

use std::time::Duration;

use serde_json::Value;

use crate::error::FunctionError;
use crate::functions::{Arguments, Function};
use crate::schema::{FunctionSignature, Parameter};

/// `delay_value`: wait a whole number of seconds, then return the provided
/// value unchanged.
///
/// The delay is parsed from a string; a non-integer is rejected. Delays of
/// zero or less return immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelayValue;

#[async_trait::async_trait]
impl Function for DelayValue {
    fn name(&self) -> &'static str {
        "delay_value"
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature::new("Return the provided value after waiting for a specified time.")
            .with_description(
                "Wait for a specified delay (in seconds) before returning the provided value.",
            )
            .with_parameter(
                Parameter::string("delay")
                    .with_description("The delay time in seconds before returning the value."),
            )
            .with_parameter(
                Parameter::string("value")
                    .with_description("The value to return after the delay."),
            )
    }

    async fn call(&self, arguments: &Arguments) -> Result<Value, FunctionError> {
        let delay: i64 = arguments.get_string(0)?.parse().map_err(|err| {
            FunctionError::InvalidArgument(format!(
                "invalid delay value, expected an integer: {}",
                err
            ))
        })?;
        let value = arguments.get_string(1)?.to_string();

        if delay > 0 {
            tokio::time::sleep(Duration::from_secs(delay as u64)).await;
        }

        Ok(Value::String(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_waits_then_returns_value_unchanged() {
        let start = tokio::time::Instant::now();
        let result = DelayValue
            .call(&Arguments::new(vec![json!("2"), json!("payload")]))
            .await
            .unwrap();

        assert_eq!(result, json!("payload"));
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_and_negative_delays_return_immediately() {
        for delay in ["0", "-5"] {
            let start = tokio::time::Instant::now();
            let result = DelayValue
                .call(&Arguments::new(vec![json!(delay), json!("v")]))
                .await
                .unwrap();
            assert_eq!(result, json!("v"));
            assert!(start.elapsed() < Duration::from_secs(1));
        }
    }

    #[tokio::test]
    async fn test_non_integer_delay_rejected() {
        let err = DelayValue
            .call(&Arguments::new(vec![json!("soon"), json!("v")]))
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_missing_value_argument() {
        let err = DelayValue
            .call(&Arguments::new(vec![json!("1")]))
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::MissingArgument(1)));
    }
}
