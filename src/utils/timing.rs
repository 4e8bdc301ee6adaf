use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::utils::logging::TIMING_TARGET;

/// Identifies one provider round trip in the timing log.
#[derive(Debug, Clone, Copy)]
pub struct LlmCall<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub operation: &'a str,
}

/// Runs `call` once and records `llm_request` / `llm_response` events on the timing target.
pub async fn log_llm_timing<T, E, F, Fut>(
    descriptor: LlmCall<'_>,
    metadata: Option<JsonValue>,
    call: F,
) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let metadata = metadata.unwrap_or(JsonValue::Null);
    info!(
        target: TIMING_TARGET,
        event = "llm_request",
        provider = descriptor.provider,
        model = descriptor.model,
        operation = descriptor.operation,
        metadata = %metadata,
    );

    let started = Instant::now();
    let result = call().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => info!(
            target: TIMING_TARGET,
            event = "llm_response",
            provider = descriptor.provider,
            model = descriptor.model,
            operation = descriptor.operation,
            elapsed_ms,
            status = "success",
        ),
        Err(err) => warn!(
            target: TIMING_TARGET,
            event = "llm_response",
            provider = descriptor.provider,
            model = descriptor.model,
            operation = descriptor.operation,
            elapsed_ms,
            status = "error",
            error = %err,
        ),
    }

    result
}
