//! Error types for the toolstream domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Provider failures are
//! fatal for the in-flight exchange; tool failures are always recovered by
//! the orchestrator and fed back to the model as structured error results.

use thiserror::Error;

/// Errors from the completion session layer.
///
/// A `ProviderError` surfaced while establishing or reading a stream aborts
/// the current `run` invocation — it is never retried internally.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from a tool executor.
///
/// These never escape the orchestrator loop: each one is converted into an
/// `{"error": ...}` result delivered to both the event consumer and the
/// model's next turn.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
